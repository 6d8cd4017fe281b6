//! Random Forest Classifier
//!
//! Bagged Gini trees over the forest layout. One bootstrap resample
//! (with replacement, same size as the input) per tree; one vote per tree.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureLayout, FeatureVector, LayoutInfo, ProcessedFeatures};
use crate::logic::threat::ClassProbabilities;
use crate::logic::validation;
use super::error::{ModelError, ModelResult};
use super::tree::DecisionTree;
use super::types::{project_training_set, Classifier, LabeledVector, ModelInfo, Trainable, TrainingData};

/// Forest hyperparameters (the untrained classifier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    pub n_trees: usize,
    pub max_depth: usize,
    /// Nodes with fewer samples become leaves
    pub min_samples: usize,
    pub seed: Option<u64>,
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self {
            n_trees: 10,
            max_depth: 5,
            min_samples: 2,
            seed: None,
        }
    }
}

impl RandomForestClassifier {
    pub fn new(n_trees: usize, max_depth: usize, min_samples: usize) -> Self {
        Self {
            n_trees,
            max_depth,
            min_samples,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "n_trees": self.n_trees,
            "max_depth": self.max_depth,
            "min_samples": self.min_samples,
            "feature_count": FeatureLayout::Forest.len(),
        })
    }
}

impl Trainable for RandomForestClassifier {
    type Model = TrainedForest;

    const NAME: &'static str = "RandomForest";

    fn train(&self, data: &[TrainingData]) -> ModelResult<TrainedForest> {
        validation::validate_forest_config(self).into_result(Self::NAME)?;
        let samples = project_training_set(FeatureLayout::Forest, data)?;

        log::info!(
            "Training Random Forest: {} trees on {} samples",
            self.n_trees,
            samples.len()
        );

        let mut rng = crate::logic::seeded_rng(self.seed);
        let mut trees = Vec::with_capacity(self.n_trees);

        for i in 0..self.n_trees {
            let bootstrap: Vec<LabeledVector> = (0..samples.len())
                .map(|_| samples[rng.gen_range(0..samples.len())].clone())
                .collect();

            let tree = DecisionTree::fit(&bootstrap, self.max_depth, self.min_samples)?;
            log::debug!(
                "Tree {}/{}: depth {}, {} nodes",
                i + 1,
                self.n_trees,
                tree.depth(),
                tree.node_count()
            );
            trees.push(tree);
        }

        log::info!("Random Forest training completed");

        Ok(TrainedForest {
            config: self.clone(),
            layout: LayoutInfo::current(FeatureLayout::Forest),
            trees,
        })
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo::new(Self::NAME, self.parameters(), false)
    }
}

/// Fitted forest
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedForest {
    config: RandomForestClassifier,
    /// Layout the trees were grown on
    layout: LayoutInfo,
    trees: Vec<DecisionTree>,
}

impl TrainedForest {
    /// Vote counts indexed like `TrafficClass::ALL`
    pub fn votes(&self, values: &[f64]) -> ModelResult<[usize; 3]> {
        let expected = FeatureLayout::Forest.len();
        if values.len() != expected {
            return Err(ModelError::FeatureLengthMismatch {
                expected,
                got: values.len(),
            });
        }

        let mut votes = [0usize; 3];
        for tree in &self.trees {
            votes[tree.predict_unchecked(values).index()] += 1;
        }
        Ok(votes)
    }

    /// Vote counts for a versioned vector, rejecting foreign layouts
    pub fn votes_for(&self, vector: &FeatureVector) -> ModelResult<[usize; 3]> {
        self.layout.check(vector.layout, vector.version, vector.layout_hash)?;
        self.votes(vector.as_slice())
    }

    pub fn layout(&self) -> &LayoutInfo {
        &self.layout
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn config(&self) -> &RandomForestClassifier {
        &self.config
    }
}

impl Classifier for TrainedForest {
    fn probabilities(&self, features: &ProcessedFeatures) -> ClassProbabilities {
        match self.votes_for(&FeatureVector::forest(features)) {
            Ok(votes) => ClassProbabilities::from_votes(votes),
            Err(e) => {
                log::warn!("Forest voting failed, falling back to uniform: {}", e);
                ClassProbabilities::uniform()
            }
        }
    }

    fn model_info(&self) -> ModelInfo {
        let mut parameters = self.config.parameters();
        let total_depth: usize = self.trees.iter().map(DecisionTree::depth).sum();
        parameters["mean_depth"] = serde_json::json!(total_depth as f64 / self.trees.len().max(1) as f64);
        parameters["feature_version"] = serde_json::json!(self.layout.version);
        parameters["layout_hash"] = serde_json::json!(format!("{:08x}", self.layout.hash));
        ModelInfo::new(RandomForestClassifier::NAME, parameters, true)
    }
}
