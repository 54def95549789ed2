//! Tree ensemble families
//!
//! Decision trees are stored recursively in the artifact. The random forest
//! averages per-tree leaf probabilities; gradient boosting sums leaf margins
//! on top of a base score and squashes through the logistic function.

use serde::{Deserialize, Serialize};

use common::{Error, Result};
use feature_schema::FeatureFrame;

use crate::encoder::RowEncoder;
use crate::linear::sigmoid;
use crate::model::Classifier;

/// A node of a decision tree over encoded rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Interior split: rows with `encoded[feature] <= threshold` go left
    Split {
        /// Column of the encoded row the split tests
        feature: usize,
        /// Split threshold
        threshold: f64,
        /// Subtree for rows at or below the threshold
        left: Box<TreeNode>,
        /// Subtree for rows above the threshold
        right: Box<TreeNode>,
    },
    /// Terminal leaf carrying the tree's output for the row
    Leaf {
        /// Leaf output: a probability for forests, a margin for boosting
        value: f64,
    },
}

impl TreeNode {
    /// Walks the tree for one encoded row.
    ///
    /// Split indices are checked against the encoded width at load time, so
    /// traversal itself cannot leave the row.
    fn score(&self, encoded: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if encoded[*feature] <= *threshold {
                    left.score(encoded)
                } else {
                    right.score(encoded)
                }
            }
        }
    }

    fn validate(&self, width: usize) -> Result<()> {
        match self {
            TreeNode::Leaf { .. } => Ok(()),
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => {
                if *feature >= width {
                    return Err(Error::ModelLoad(format!(
                        "tree split references column {feature}, encoded rows have {width}"
                    )));
                }
                left.validate(width)?;
                right.validate(width)
            }
        }
    }

    fn validate_leaf_probabilities(&self) -> Result<()> {
        match self {
            TreeNode::Leaf { value } => {
                if !(0.0..=1.0).contains(value) {
                    return Err(Error::ModelLoad(format!(
                        "forest leaf probability {value} is outside [0, 1]"
                    )));
                }
                Ok(())
            }
            TreeNode::Split { left, right, .. } => {
                left.validate_leaf_probabilities()?;
                right.validate_leaf_probabilities()
            }
        }
    }
}

/// A single decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Root node
    pub root: TreeNode,
}

impl DecisionTree {
    fn score(&self, encoded: &[f64]) -> f64 {
        self.root.score(encoded)
    }
}

/// Random forest churn model
pub struct RandomForestModel {
    encoder: RowEncoder,
    trees: Vec<DecisionTree>,
}

impl RandomForestModel {
    /// Creates the model, validating every tree against the encoded width
    /// and every leaf as a probability
    pub fn new(encoder: RowEncoder, trees: Vec<DecisionTree>) -> Result<Self> {
        if trees.is_empty() {
            return Err(Error::ModelLoad("random forest artifact has no trees".to_string()));
        }

        for tree in &trees {
            tree.root.validate(encoder.width())?;
            tree.root.validate_leaf_probabilities()?;
        }

        Ok(Self { encoder, trees })
    }

    fn score_row(&self, encoded: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.score(encoded)).sum();
        total / self.trees.len() as f64
    }
}

impl Classifier for RandomForestModel {
    fn algorithm(&self) -> &'static str {
        "random_forest"
    }

    fn predict_probability(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        frame
            .rows()
            .iter()
            .map(|row| Ok(self.score_row(&self.encoder.encode_row(row)?)))
            .collect()
    }
}

/// Gradient boosting churn model
pub struct GradientBoostingModel {
    encoder: RowEncoder,
    base_score: f64,
    trees: Vec<DecisionTree>,
}

impl GradientBoostingModel {
    /// Creates the model, validating every tree against the encoded width
    pub fn new(encoder: RowEncoder, base_score: f64, trees: Vec<DecisionTree>) -> Result<Self> {
        if trees.is_empty() {
            return Err(Error::ModelLoad(
                "gradient boosting artifact has no trees".to_string(),
            ));
        }

        for tree in &trees {
            tree.root.validate(encoder.width())?;
        }

        Ok(Self {
            encoder,
            base_score,
            trees,
        })
    }

    fn score_row(&self, encoded: &[f64]) -> f64 {
        let margin: f64 = self.trees.iter().map(|tree| tree.score(encoded)).sum();
        sigmoid(self.base_score + margin)
    }
}

impl Classifier for GradientBoostingModel {
    fn algorithm(&self) -> &'static str {
        "gradient_boosting"
    }

    fn predict_probability(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        frame
            .rows()
            .iter()
            .map(|row| Ok(self.score_row(&self.encoder.encode_row(row)?)))
            .collect()
    }
}
