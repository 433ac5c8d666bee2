//! Feature vector validation

use std::fmt;

use super::entity::{Features, FEATURE_COUNT};
use crate::domain::DomainError;

/// Feature validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValidationError {
    /// Wrong number of features
    WrongLength { length: usize, expected: usize },
    /// A feature is below zero
    Negative { index: usize, value: f64 },
    /// A feature is NaN or infinite
    NotFinite { index: usize },
}

impl fmt::Display for FeatureValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { length, expected } => write!(
                f,
                "Exactly {} features are required, got {}",
                expected, length
            ),
            Self::Negative { index, value } => write!(
                f,
                "Feature values must be non-negative: feature {} is {}",
                index, value
            ),
            Self::NotFinite { index } => write!(f, "Feature {} is not a finite number", index),
        }
    }
}

impl std::error::Error for FeatureValidationError {}

impl From<FeatureValidationError> for DomainError {
    fn from(err: FeatureValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validate a raw feature vector
pub fn validate_features(values: &[f64]) -> Result<Features, FeatureValidationError> {
    let array: [f64; FEATURE_COUNT] =
        values
            .try_into()
            .map_err(|_| FeatureValidationError::WrongLength {
                length: values.len(),
                expected: FEATURE_COUNT,
            })?;

    for (index, &value) in array.iter().enumerate() {
        if !value.is_finite() {
            return Err(FeatureValidationError::NotFinite { index });
        }

        if value < 0.0 {
            return Err(FeatureValidationError::Negative { index, value });
        }
    }

    Ok(Features::new_unchecked(array))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_features() {
        let features = validate_features(&[5.1, 3.5, 1.4, 0.2]).unwrap();
        assert_eq!(features.as_slice(), &[5.1, 3.5, 1.4, 0.2]);
    }

    #[test]
    fn test_zero_is_allowed() {
        assert!(validate_features(&[0.0, 0.0, 0.0, 0.0]).is_ok());
    }

    #[test]
    fn test_wrong_length() {
        for values in [vec![], vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0, 4.0, 5.0]] {
            let err = validate_features(&values).unwrap_err();
            assert_eq!(
                err,
                FeatureValidationError::WrongLength {
                    length: values.len(),
                    expected: 4
                }
            );
        }
    }

    #[test]
    fn test_negative_value() {
        let err = validate_features(&[5.1, -0.5, 1.4, 0.2]).unwrap_err();
        assert_eq!(
            err,
            FeatureValidationError::Negative {
                index: 1,
                value: -0.5
            }
        );
    }

    #[test]
    fn test_non_finite_value() {
        let err = validate_features(&[5.1, f64::NAN, 1.4, 0.2]).unwrap_err();
        assert_eq!(err, FeatureValidationError::NotFinite { index: 1 });
    }

    #[test]
    fn test_converts_to_domain_validation_error() {
        let err: DomainError = validate_features(&[1.0]).unwrap_err().into();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
