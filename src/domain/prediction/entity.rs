//! Prediction entities

use serde::{Deserialize, Serialize};

/// Number of features the classifier consumes
pub const FEATURE_COUNT: usize = 4;

/// A validated feature vector: exactly four non-negative, finite values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features([f64; FEATURE_COUNT]);

impl Features {
    pub(super) fn new_unchecked(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Body of `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub features: Vec<f64>,
}

/// Raw classifier output for a single sample
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPrediction {
    pub class: usize,
    pub probabilities: Vec<f64>,
}

impl ClassPrediction {
    /// Build a prediction by taking the arg-max of a probability vector
    pub fn from_probabilities(probabilities: Vec<f64>) -> Option<Self> {
        let class = probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)?;

        Some(Self {
            class,
            probabilities,
        })
    }
}

/// Body returned by `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: usize,
    pub probability: Vec<f64>,
    pub model_version: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_probabilities_picks_argmax() {
        let prediction = ClassPrediction::from_probabilities(vec![0.1, 0.7, 0.2]).unwrap();
        assert_eq!(prediction.class, 1);
        assert_eq!(prediction.probabilities.len(), 3);
    }

    #[test]
    fn test_from_probabilities_empty() {
        assert!(ClassPrediction::from_probabilities(vec![]).is_none());
    }

    #[test]
    fn test_response_serialization() {
        let response = PredictionResponse {
            prediction: 0,
            probability: vec![1.0, 0.0, 0.0],
            model_version: "1.0.0".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["prediction"], 0);
        assert_eq!(json["model_version"], "1.0.0");
        assert_eq!(json["probability"].as_array().unwrap().len(), 3);
    }
}
