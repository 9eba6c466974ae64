//! Saving and loading decision tree models
//!
//! A model is stored as two JSON files:
//! - `<path>` - the tree itself
//! - `<path>.meta.json` - metadata used to check compatibility on load

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::DecisionTree;
use crate::features::FeatureSchema;

/// Metadata saved next to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Identifier the policy passes to `predict`
    pub model_id: String,

    /// Feature schema the tree was built for
    pub schema: FeatureSchema,

    /// Schema version at save time
    pub schema_version: u32,

    /// Tree depth, informational
    pub depth: usize,

    /// Crate version that wrote the model
    pub version: String,
}

impl ModelMetadata {
    pub fn for_tree(tree: &DecisionTree) -> Self {
        Self {
            model_id: tree.model_id.clone(),
            schema: tree.schema,
            schema_version: tree.schema.version(),
            depth: tree.depth(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Save a tree and its metadata. Creates parent directories if needed.
pub fn save_model(tree: &DecisionTree, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let tree_json = serde_json::to_string_pretty(tree).context("Failed to serialize model")?;
    std::fs::write(path, tree_json)
        .with_context(|| format!("Failed to write model to {:?}", path))?;

    let meta_path = path.with_extension("meta.json");
    let meta_json = serde_json::to_string_pretty(&ModelMetadata::for_tree(tree))
        .context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load a tree and its metadata, rejecting models whose schema no longer matches
pub fn load_model(path: &Path) -> Result<(DecisionTree, ModelMetadata)> {
    let meta_path = path.with_extension("meta.json");
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: ModelMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    let tree_json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model from {:?}", path))?;
    let tree: DecisionTree =
        serde_json::from_str(&tree_json).context("Failed to deserialize model")?;

    if tree.model_id != metadata.model_id || tree.schema != metadata.schema {
        bail!(
            "model {:?} does not match its metadata ({} / {})",
            path,
            metadata.model_id,
            metadata.schema.name()
        );
    }
    if metadata.schema_version != tree.schema.version() {
        bail!(
            "model {:?} was saved with schema version {}, current is {}",
            path,
            metadata.schema_version,
            tree.schema.version()
        );
    }
    if let Err(msg) = tree.validate() {
        bail!("invalid model {:?}: {}", path, msg);
    }

    Ok((tree, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::TreeNode;
    use tempfile::TempDir;

    #[test]
    fn test_metadata_creation() {
        let tree = DecisionTree::greedy_baseline();
        let metadata = ModelMetadata::for_tree(&tree);

        assert_eq!(metadata.model_id, "greedy-baseline");
        assert_eq!(metadata.schema, FeatureSchema::Safety);
        assert_eq!(metadata.schema_version, 2);
        assert_eq!(metadata.depth, tree.depth());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models").join("tree.json");
        let tree = DecisionTree::greedy_baseline();

        save_model(&tree, &path).unwrap();
        assert!(path.with_extension("meta.json").exists());

        let (loaded, metadata) = load_model(&path).unwrap();
        assert_eq!(loaded, tree);
        assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_load_without_metadata_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(load_model(&path).is_err());
    }

    #[test]
    fn test_load_rejects_mismatched_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        let tree = DecisionTree::greedy_baseline();
        save_model(&tree, &path).unwrap();

        let mut metadata = ModelMetadata::for_tree(&tree);
        metadata.schema_version = 1;
        std::fs::write(
            path.with_extension("meta.json"),
            serde_json::to_string(&metadata).unwrap(),
        )
        .unwrap();

        assert!(load_model(&path).is_err());
    }

    #[test]
    fn test_load_rejects_invalid_tree() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        let tree = DecisionTree::new(
            "bad",
            FeatureSchema::Basic,
            TreeNode::split("up_safe", 0.5, TreeNode::leaf("UP"), TreeNode::leaf("DOWN")),
        );
        save_model(&tree, &path).unwrap();

        let err = load_model(&path).unwrap_err();
        assert!(err.to_string().contains("up_safe"));
    }
}
