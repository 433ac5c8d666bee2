//! Gini decision tree used as the forest's base learner

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Minimum impurity decrease for a split to be kept
const MIN_GAIN: f64 = 1e-12;

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node holding the class distribution of its training samples
    Leaf { distribution: Vec<f64> },
    /// Internal node: samples with `feature <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features sampled as split candidates at each node
    pub max_features: usize,
}

/// Classification tree over dense `f64` features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: TreeNode,
    n_classes: usize,
}

impl DecisionTree {
    /// Grow a tree on the rows of `x` selected by `indices`
    pub fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        indices: &[usize],
        n_classes: usize,
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = x.first().map(|row| row.len()).unwrap_or(0);
        let builder = TreeBuilder {
            x,
            y,
            n_classes,
            n_features,
            params,
        };

        let mut indices = indices.to_vec();
        let root = builder.build(&mut indices, 0, rng);

        Self { root, n_classes }
    }

    /// Class distribution of the leaf `features` falls into
    ///
    /// `None` when a split reads a feature the sample does not have.
    pub fn predict_distribution(&self, features: &[f64]) -> Option<&[f64]> {
        let mut node = &self.root;

        loop {
            match node {
                TreeNode::Leaf { distribution } => return Some(distribution),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if *features.get(*feature)? <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Check that every split reads a feature below `n_features` and every
    /// leaf holds exactly `n_classes` probabilities
    pub fn check_shape(&self, n_features: usize) -> Result<(), String> {
        let mut stack = vec![&self.root];

        while let Some(node) = stack.pop() {
            match node {
                TreeNode::Leaf { distribution } => {
                    if distribution.len() != self.n_classes {
                        return Err(format!(
                            "leaf has {} probabilities for {} classes",
                            distribution.len(),
                            self.n_classes
                        ));
                    }
                }
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "split on feature {} of a {}-feature input",
                            feature, n_features
                        ));
                    }
                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        Ok(())
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn depth(&self) -> usize {
        fn depth_of(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + depth_of(left).max(depth_of(right)),
            }
        }
        depth_of(&self.root)
    }
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    n_classes: usize,
    n_features: usize,
    params: TreeParams,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl TreeBuilder<'_> {
    fn build(&self, indices: &mut [usize], depth: usize, rng: &mut StdRng) -> TreeNode {
        let counts = self.class_counts(indices);
        let n = indices.len();

        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        if depth >= self.params.max_depth || n < self.params.min_samples_split || is_pure {
            return self.leaf(&counts, n);
        }

        let Some(split) = self.best_split(indices, &counts, rng) else {
            return self.leaf(&counts, n);
        };

        let (left_idx, right_idx) = partition(indices, |i| {
            self.x[i][split.feature] <= split.threshold
        });

        if left_idx.is_empty() || right_idx.is_empty() {
            return self.leaf(&counts, n);
        }

        let mut left_idx = left_idx;
        let mut right_idx = right_idx;

        TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(self.build(&mut left_idx, depth + 1, rng)),
            right: Box::new(self.build(&mut right_idx, depth + 1, rng)),
        }
    }

    fn leaf(&self, counts: &[usize], n: usize) -> TreeNode {
        let total = n.max(1) as f64;
        TreeNode::Leaf {
            distribution: counts.iter().map(|&c| c as f64 / total).collect(),
        }
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += 1;
        }
        counts
    }

    fn best_split(
        &self,
        indices: &mut [usize],
        parent_counts: &[usize],
        rng: &mut StdRng,
    ) -> Option<BestSplit> {
        let n = indices.len() as f64;
        let parent_impurity = gini(parent_counts, indices.len());

        let mut candidates: Vec<usize> = (0..self.n_features).collect();
        candidates.shuffle(rng);
        candidates.truncate(self.params.max_features.clamp(1, self.n_features.max(1)));

        let mut best: Option<BestSplit> = None;

        for feature in candidates {
            indices.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let mut left_counts = vec![0usize; self.n_classes];
            let mut right_counts = parent_counts.to_vec();

            for pos in 0..indices.len() - 1 {
                let label = self.y[indices[pos]];
                left_counts[label] += 1;
                right_counts[label] -= 1;

                let current = self.x[indices[pos]][feature];
                let next = self.x[indices[pos + 1]][feature];
                if current >= next {
                    continue;
                }

                let n_left = pos + 1;
                let n_right = indices.len() - n_left;
                let weighted = (n_left as f64 / n) * gini(&left_counts, n_left)
                    + (n_right as f64 / n) * gini(&right_counts, n_right);
                let gain = parent_impurity - weighted;

                if gain > MIN_GAIN && best.as_ref().is_none_or(|b| gain > b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (current + next) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let total = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

fn partition(indices: &[usize], goes_left: impl Fn(usize) -> bool) -> (Vec<usize>, Vec<usize>) {
    indices.iter().partition(|&&i| goes_left(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            min_samples_split: 2,
            max_features: 2,
        }
    }

    #[test]
    fn test_separable_data_is_learned() {
        let x = vec![
            vec![1.0, 0.0],
            vec![1.5, 0.0],
            vec![2.0, 0.0],
            vec![8.0, 0.0],
            vec![8.5, 0.0],
            vec![9.0, 0.0],
        ];
        let y = vec![0, 0, 0, 1, 1, 1];
        let indices: Vec<usize> = (0..x.len()).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(&x, &y, &indices, 2, params(5), &mut rng);

        assert_eq!(tree.predict_distribution(&[1.2, 0.0]), Some(&[1.0, 0.0][..]));
        assert_eq!(tree.predict_distribution(&[8.7, 0.0]), Some(&[0.0, 1.0][..]));
        assert_eq!(tree.depth(), 1);
        assert!(tree.check_shape(2).is_ok());
    }

    #[test]
    fn test_max_depth_zero_is_a_single_leaf() {
        let x = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]];
        let y = vec![0, 0, 1, 1];
        let indices: Vec<usize> = (0..x.len()).collect();
        let mut rng = StdRng::seed_from_u64(1);

        let tree = DecisionTree::fit(&x, &y, &indices, 2, params(0), &mut rng);

        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict_distribution(&[0.0, 0.0]), Some(&[0.5, 0.5][..]));
    }

    #[test]
    fn test_out_of_range_split_is_detected() {
        let tree = DecisionTree {
            root: TreeNode::Split {
                feature: 7,
                threshold: 1.0,
                left: Box::new(TreeNode::Leaf {
                    distribution: vec![1.0, 0.0],
                }),
                right: Box::new(TreeNode::Leaf {
                    distribution: vec![0.0, 1.0],
                }),
            },
            n_classes: 2,
        };

        assert!(tree.check_shape(4).is_err());
        assert!(tree.predict_distribution(&[0.0; 4]).is_none());
    }

    #[test]
    fn test_short_leaf_distribution_is_detected() {
        let tree = DecisionTree {
            root: TreeNode::Leaf {
                distribution: vec![1.0, 0.0],
            },
            n_classes: 3,
        };

        assert!(tree.check_shape(4).is_err());
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[5, 0], 5), 0.0);
        assert!((gini(&[2, 2], 4) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[0, 0], 0), 0.0);
    }
}
