//! Binary decision tree over named features
//!
//! Stand-in for an external classifier runtime. Split nodes compare one
//! attribute against a threshold (`<=` goes to `le`, `>` to `gt`); leaves
//! carry a direction label.

use serde::{Deserialize, Serialize};

use super::{Label, PredictError, Predictor};
use crate::features::{FeatureSchema, FeatureVector};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Split {
        attribute: String,
        threshold: f64,
        le: Box<TreeNode>,
        gt: Box<TreeNode>,
    },
    Leaf {
        label: String,
    },
}

impl TreeNode {
    pub fn split(attribute: &str, threshold: f64, le: TreeNode, gt: TreeNode) -> Self {
        TreeNode::Split {
            attribute: attribute.to_string(),
            threshold,
            le: Box::new(le),
            gt: Box::new(gt),
        }
    }

    pub fn leaf(label: &str) -> Self {
        TreeNode::Leaf {
            label: label.to_string(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { le, gt, .. } => 1 + le.depth().max(gt.depth()),
        }
    }

    fn attributes<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let TreeNode::Split {
            attribute, le, gt, ..
        } = self
        {
            out.push(attribute);
            le.attributes(out);
            gt.attributes(out);
        }
    }
}

/// A decision tree model bound to one feature schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub model_id: String,
    pub schema: FeatureSchema,
    pub root: TreeNode,
}

impl DecisionTree {
    pub fn new(model_id: impl Into<String>, schema: FeatureSchema, root: TreeNode) -> Self {
        Self {
            model_id: model_id.into(),
            schema,
            root,
        }
    }

    /// Hand-built tree on the `safety` schema: head for the food, vertical
    /// axis first, sidestep when the preferred move is flagged unsafe.
    pub fn greedy_baseline() -> Self {
        use TreeNode as N;

        let sidestep_vertical = || N::split("up_safe", 0.5, N::leaf("DOWN"), N::leaf("UP"));

        let food_above = N::split(
            "up_safe",
            0.5,
            N::split("left_safe", 0.5, N::leaf("RIGHT"), N::leaf("LEFT")),
            N::leaf("UP"),
        );
        let food_below = N::split(
            "down_safe",
            0.5,
            N::split("left_safe", 0.5, N::leaf("RIGHT"), N::leaf("LEFT")),
            N::leaf("DOWN"),
        );
        let same_row = N::split(
            "horizontal_distance",
            0.0,
            N::split("left_safe", 0.5, sidestep_vertical(), N::leaf("LEFT")),
            N::split("right_safe", 0.5, sidestep_vertical(), N::leaf("RIGHT")),
        );

        let root = N::split(
            "vertical_distance",
            -1.0,
            food_above,
            N::split("vertical_distance", 0.0, same_row, food_below),
        );

        Self::new("greedy-baseline", FeatureSchema::Safety, root)
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Check every split attribute exists in the schema
    pub fn validate(&self) -> Result<(), String> {
        let mut used = Vec::new();
        self.root.attributes(&mut used);
        for name in used {
            if self.schema.index_of(name).is_none() {
                return Err(format!(
                    "attribute '{}' is not part of the '{}' schema",
                    name,
                    self.schema.name()
                ));
            }
        }
        Ok(())
    }

    /// Walk the tree for one feature vector
    pub fn classify(&self, features: &FeatureVector) -> Result<&str, PredictError> {
        if features.schema() != self.schema {
            return Err(PredictError::SchemaMismatch {
                expected: self.schema,
                got: features.schema(),
            });
        }

        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { label } => return Ok(label.as_str()),
                TreeNode::Split {
                    attribute,
                    threshold,
                    le,
                    gt,
                } => {
                    let value = features.get(attribute).ok_or_else(|| {
                        PredictError::Backend(format!("unknown attribute '{attribute}'"))
                    })?;
                    node = if value <= *threshold { &**le } else { &**gt };
                }
            }
        }
    }
}

impl Predictor for DecisionTree {
    fn predict(&self, model_id: &str, features: &FeatureVector) -> Result<Label, PredictError> {
        if model_id != self.model_id {
            return Err(PredictError::UnknownModel(model_id.to_string()));
        }
        self.classify(features)
            .map(|label| Label::Name(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, test_state};

    fn predict_direction(tree: &DecisionTree, state: &crate::game::GameState) -> Option<Direction> {
        let features = FeatureVector::build(state, tree.schema);
        tree.predict(&tree.model_id, &features)
            .ok()
            .and_then(|label| label.to_direction())
    }

    #[test]
    fn test_baseline_is_valid() {
        let tree = DecisionTree::greedy_baseline();
        assert!(tree.validate().is_ok());
        assert!(tree.depth() >= 3);
    }

    #[test]
    fn test_baseline_heads_for_food() {
        let tree = DecisionTree::greedy_baseline();
        let body = [(100, 50), (90, 50), (80, 50)];

        let below = test_state(&body, Direction::Right, (100, 90));
        assert_eq!(predict_direction(&tree, &below), Some(Direction::Down));

        let above = test_state(&body, Direction::Right, (300, 10));
        assert_eq!(predict_direction(&tree, &above), Some(Direction::Up));

        let ahead = test_state(&body, Direction::Right, (300, 50));
        assert_eq!(predict_direction(&tree, &ahead), Some(Direction::Right));
    }

    #[test]
    fn test_baseline_sidesteps_unsafe_move() {
        let tree = DecisionTree::greedy_baseline();
        // Food behind the head on the same row: LEFT is the neck.
        let state = test_state(&[(100, 50), (90, 50), (80, 50)], Direction::Right, (20, 50));
        assert_eq!(predict_direction(&tree, &state), Some(Direction::Up));
    }

    #[test]
    fn test_unknown_model_id() {
        let tree = DecisionTree::greedy_baseline();
        let state = test_state(&[(100, 50)], Direction::Right, (300, 300));
        let features = FeatureVector::build(&state, FeatureSchema::Safety);

        assert_eq!(
            tree.predict("other", &features),
            Err(PredictError::UnknownModel("other".into()))
        );
    }

    #[test]
    fn test_schema_mismatch() {
        let tree = DecisionTree::greedy_baseline();
        let state = test_state(&[(100, 50)], Direction::Right, (300, 300));
        let features = FeatureVector::build(&state, FeatureSchema::Basic);

        assert!(matches!(
            tree.predict(&tree.model_id, &features),
            Err(PredictError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_foreign_attribute() {
        let tree = DecisionTree::new(
            "t",
            FeatureSchema::Basic,
            TreeNode::split("left_safe", 0.5, TreeNode::leaf("UP"), TreeNode::leaf("DOWN")),
        );
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_json_shape() {
        let tree = DecisionTree::new(
            "t",
            FeatureSchema::Basic,
            TreeNode::split("score", 0.0, TreeNode::leaf("UP"), TreeNode::leaf("DOWN")),
        );
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["schema"], "basic");
        assert_eq!(json["root"]["type"], "split");
        assert_eq!(json["root"]["le"]["label"], "UP");
    }
}
