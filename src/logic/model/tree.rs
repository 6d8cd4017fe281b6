//! Decision Tree (Gini)
//!
//! Binary CART-style tree over projected feature vectors. Samples with
//! `value <= threshold` go left.

use serde::{Deserialize, Serialize};

use crate::logic::threat::TrafficClass;
use super::error::{ModelError, ModelResult};
use super::types::{check_vectors, LabeledVector};

/// Tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeNode {
    Leaf {
        label: TrafficClass,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn node_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    fn route(&self, values: &[f64]) -> TrafficClass {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { label, .. } => return *label,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if values[*feature] <= *threshold { left.as_ref() } else { right.as_ref() };
                }
            }
        }
    }
}

/// Fitted decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    max_depth: usize,
    min_samples: usize,
    feature_count: usize,
    root: TreeNode,
}

impl DecisionTree {
    /// Grow a tree on labelled vectors
    ///
    /// Growth stops at `max_depth`, below `min_samples`, or on a pure node.
    pub fn fit(samples: &[LabeledVector], max_depth: usize, min_samples: usize) -> ModelResult<Self> {
        let feature_count = check_vectors(samples)?;
        let refs: Vec<&LabeledVector> = samples.iter().collect();

        let builder = TreeBuilder {
            max_depth,
            min_samples,
            feature_count,
        };
        let root = builder.build(&refs, 0);

        Ok(Self {
            max_depth,
            min_samples,
            feature_count,
            root,
        })
    }

    /// Predict the class of one vector
    pub fn predict(&self, values: &[f64]) -> ModelResult<TrafficClass> {
        if values.len() != self.feature_count {
            return Err(ModelError::FeatureLengthMismatch {
                expected: self.feature_count,
                got: values.len(),
            });
        }
        Ok(self.root.route(values))
    }

    /// Caller guarantees `values.len() == feature_count()`
    pub(crate) fn predict_unchecked(&self, values: &[f64]) -> TrafficClass {
        self.root.route(values)
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Number of split levels (a lone leaf has depth 0)
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn min_samples(&self) -> usize {
        self.min_samples
    }
}

// ============================================================================
// GROWTH
// ============================================================================

struct TreeBuilder {
    max_depth: usize,
    min_samples: usize,
    feature_count: usize,
}

struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl TreeBuilder {
    fn build(&self, samples: &[&LabeledVector], depth: usize) -> TreeNode {
        let counts = class_counts(samples.iter().copied());
        let distinct = counts.iter().filter(|&&c| c > 0).count();

        if depth >= self.max_depth || samples.len() < self.min_samples || distinct <= 1 {
            return leaf(&counts, samples.len());
        }

        let Some(split) = self.best_split(samples) else {
            return leaf(&counts, samples.len());
        };

        let (left, right): (Vec<&LabeledVector>, Vec<&LabeledVector>) = samples
            .iter()
            .copied()
            .partition(|s| s.values[split.feature] <= split.threshold);

        TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(self.build(&left, depth + 1)),
            right: Box::new(self.build(&right, depth + 1)),
        }
    }

    /// Lowest weighted Gini over every feature and every midpoint between
    /// consecutive distinct values; first candidate wins on equal impurity
    fn best_split(&self, samples: &[&LabeledVector]) -> Option<Split> {
        let total = samples.len() as f64;
        let mut best: Option<Split> = None;

        for feature in 0..self.feature_count {
            let mut values: Vec<f64> = samples.iter().map(|s| s.values[feature]).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;

                let mut left = [0usize; 3];
                let mut right = [0usize; 3];
                for sample in samples {
                    let side = if sample.values[feature] <= threshold { &mut left } else { &mut right };
                    side[sample.label.index()] += 1;
                }

                let left_n: usize = left.iter().sum();
                let right_n: usize = right.iter().sum();
                if left_n == 0 || right_n == 0 {
                    continue;
                }

                let impurity =
                    (left_n as f64 * gini(&left, left_n) + right_n as f64 * gini(&right, right_n)) / total;

                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(Split {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best
    }
}

fn class_counts<'a, I: Iterator<Item = &'a LabeledVector>>(samples: I) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for sample in samples {
        counts[sample.label.index()] += 1;
    }
    counts
}

/// Gini impurity: 1 − Σ p²
pub fn gini(counts: &[usize; 3], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

/// Majority label; ties go to the higher class index (Ddos, then Suspicious)
fn majority(counts: &[usize; 3]) -> TrafficClass {
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] >= counts[best] {
            best = i;
        }
    }
    TrafficClass::from_index(best).unwrap_or(TrafficClass::Normal)
}

fn leaf(counts: &[usize; 3], samples: usize) -> TreeNode {
    TreeNode::Leaf {
        label: majority(counts),
        samples,
    }
}
