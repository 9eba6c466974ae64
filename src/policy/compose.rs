use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{
    AreaMaximizingPolicy, AxisGreedyPolicy, AxisPriority, ManualPolicy, ModelPolicy, Policy,
    SafeguardedPolicy,
};
use crate::predictor::{DeadlinePredictor, DecisionTree, Predictor, load_model};

/// Policy selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Keyboard control
    Manual,
    /// Chase the food one axis at a time
    AxisGreedy,
    /// Keep the most room to move
    AreaMax,
    /// Decision tree model
    Model,
}

/// Options shared by every policy kind
#[derive(Debug, Clone, Default)]
pub struct PolicySettings {
    pub axis_priority: AxisPriority,
    /// Wrap the policy in `SafeguardedPolicy`
    pub safeguard: bool,
    /// Saved decision tree; the built-in baseline when unset
    pub model_path: Option<PathBuf>,
    /// Per-call prediction budget; unbounded when unset
    pub model_timeout: Option<Duration>,
}

/// Build the policy for `kind`
pub fn build_policy(kind: PolicyKind, settings: &PolicySettings) -> Result<Box<dyn Policy>> {
    let policy: Box<dyn Policy> = match kind {
        PolicyKind::Manual => Box::new(ManualPolicy::new()),
        PolicyKind::AxisGreedy => Box::new(AxisGreedyPolicy::new(settings.axis_priority)),
        PolicyKind::AreaMax => Box::new(AreaMaximizingPolicy::new()),
        PolicyKind::Model => {
            let tree = match &settings.model_path {
                Some(path) => {
                    let (tree, metadata) = load_model(path)?;
                    tracing::info!(
                        model = %metadata.model_id,
                        schema = metadata.schema.name(),
                        depth = metadata.depth,
                        "loaded model from {:?}",
                        path
                    );
                    tree
                }
                None => DecisionTree::greedy_baseline(),
            };
            let model_id = tree.model_id.clone();
            let schema = tree.schema;

            let predictor: Box<dyn Predictor> = match settings.model_timeout {
                Some(timeout) => Box::new(
                    DeadlinePredictor::new(tree, timeout)
                        .context("Failed to start the prediction worker")?,
                ),
                None => Box::new(tree),
            };
            Box::new(ModelPolicy::new(predictor, model_id, schema))
        }
    };

    if settings.safeguard {
        Ok(Box::new(SafeguardedPolicy::new(policy)))
    } else {
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSchema;
    use crate::game::{Direction, test_state};
    use crate::predictor::{TreeNode, save_model};
    use tempfile::tempdir;

    #[test]
    fn test_builds_every_kind() {
        let settings = PolicySettings::default();
        assert_eq!(build_policy(PolicyKind::Manual, &settings).unwrap().name(), "manual");
        assert_eq!(
            build_policy(PolicyKind::AxisGreedy, &settings).unwrap().name(),
            "axis-greedy"
        );
        assert_eq!(build_policy(PolicyKind::AreaMax, &settings).unwrap().name(), "area-max");
        assert_eq!(
            build_policy(PolicyKind::Model, &settings).unwrap().name(),
            "model:greedy-baseline"
        );
    }

    #[test]
    fn test_safeguard_wraps() {
        let settings = PolicySettings {
            safeguard: true,
            ..Default::default()
        };
        let policy = build_policy(PolicyKind::Manual, &settings).unwrap();
        assert_eq!(policy.name(), "manual (safeguarded)");
        assert!(!policy.is_autonomous());
    }

    #[test]
    fn test_loads_saved_model_with_deadline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("always_up.json");
        let tree = DecisionTree::new("always-up", FeatureSchema::Basic, TreeNode::leaf("UP"));
        save_model(&tree, &path).unwrap();

        let settings = PolicySettings {
            model_path: Some(path),
            model_timeout: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        let mut policy = build_policy(PolicyKind::Model, &settings).unwrap();
        let state = test_state(&[(100, 50), (90, 50), (80, 50)], Direction::Right, (100, 90));

        assert_eq!(policy.name(), "model:always-up");
        assert_eq!(policy.decide(&state), Direction::Up);
    }

    #[test]
    fn test_missing_model_is_error() {
        let dir = tempdir().unwrap();
        let settings = PolicySettings {
            model_path: Some(dir.path().join("missing.json")),
            ..Default::default()
        };
        assert!(build_policy(PolicyKind::Model, &settings).is_err());
    }
}
