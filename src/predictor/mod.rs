//! Predictor boundary for learned-model policies
//!
//! A predictor maps a `FeatureVector` to a categorical `Label`. The label is
//! turned back into a `Direction` with a fixed lookup; anything the lookup
//! does not recognise is left for the caller to handle.
//!
//! Provides:
//! - `Predictor` trait and `PredictError`
//! - `FixedPredictor`, a stub that always answers the same label
//! - `DecisionTree`, an in-process tree model loaded from JSON
//! - `DeadlinePredictor`, a wrapper that bounds the time spent per call

pub mod deadline;
pub mod decision_tree;
pub mod persistence;

pub use deadline::DeadlinePredictor;
pub use decision_tree::{DecisionTree, TreeNode};
pub use persistence::{ModelMetadata, load_model, save_model};

use std::time::Duration;

use thiserror::Error;

use crate::features::{FeatureSchema, FeatureVector};
use crate::game::Direction;

/// Failure modes of a prediction call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("unknown model id: {0}")]
    UnknownModel(String),
    #[error("feature schema mismatch: model expects {expected:?}, got {got:?}")]
    SchemaMismatch {
        expected: FeatureSchema,
        got: FeatureSchema,
    },
    #[error("prediction timed out after {0:?}")]
    Timeout(Duration),
    #[error("predictor worker disconnected")]
    Disconnected,
    #[error("predictor failed: {0}")]
    Backend(String),
}

/// Categorical answer of a predictor: a direction name or a small integer code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Name(String),
    Code(i64),
}

impl Label {
    /// Fixed 4-entry lookup.
    ///
    /// Names: `UP`, `DOWN`, `LEFT`, `RIGHT` (any case, optional quotes).
    /// Codes: 0 = UP, 1 = DOWN, 2 = LEFT, 3 = RIGHT.
    pub fn to_direction(&self) -> Option<Direction> {
        match self {
            Label::Name(name) => {
                let name = name.trim().trim_matches(|c| c == '"' || c == '\'');
                match name.to_ascii_uppercase().as_str() {
                    "UP" => Some(Direction::Up),
                    "DOWN" => Some(Direction::Down),
                    "LEFT" => Some(Direction::Left),
                    "RIGHT" => Some(Direction::Right),
                    _ => None,
                }
            }
            Label::Code(code) => match code {
                0 => Some(Direction::Up),
                1 => Some(Direction::Down),
                2 => Some(Direction::Left),
                3 => Some(Direction::Right),
                _ => None,
            },
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Name(name) => f.write_str(name),
            Label::Code(code) => write!(f, "{code}"),
        }
    }
}

impl From<Direction> for Label {
    fn from(direction: Direction) -> Self {
        Label::Name(direction.label().to_string())
    }
}

/// A classifier over feature vectors
pub trait Predictor {
    fn predict(&self, model_id: &str, features: &FeatureVector) -> Result<Label, PredictError>;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, model_id: &str, features: &FeatureVector) -> Result<Label, PredictError> {
        (**self).predict(model_id, features)
    }
}

impl<P: Predictor + ?Sized> Predictor for std::sync::Arc<P> {
    fn predict(&self, model_id: &str, features: &FeatureVector) -> Result<Label, PredictError> {
        (**self).predict(model_id, features)
    }
}

/// Always answers the same label, for any model id
#[derive(Debug, Clone)]
pub struct FixedPredictor {
    label: Label,
}

impl FixedPredictor {
    pub fn new(label: Label) -> Self {
        Self { label }
    }
}

impl Predictor for FixedPredictor {
    fn predict(&self, _model_id: &str, _features: &FeatureVector) -> Result<Label, PredictError> {
        Ok(self.label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup() {
        assert_eq!(Label::Name("UP".into()).to_direction(), Some(Direction::Up));
        assert_eq!(Label::Name("down".into()).to_direction(), Some(Direction::Down));
        assert_eq!(Label::Name("\"LEFT\"".into()).to_direction(), Some(Direction::Left));
        assert_eq!(Label::Name(" Right ".into()).to_direction(), Some(Direction::Right));
        assert_eq!(Label::Name("NORTH".into()).to_direction(), None);
        assert_eq!(Label::Name(String::new()).to_direction(), None);
    }

    #[test]
    fn test_code_lookup() {
        assert_eq!(Label::Code(0).to_direction(), Some(Direction::Up));
        assert_eq!(Label::Code(1).to_direction(), Some(Direction::Down));
        assert_eq!(Label::Code(2).to_direction(), Some(Direction::Left));
        assert_eq!(Label::Code(3).to_direction(), Some(Direction::Right));
        assert_eq!(Label::Code(4).to_direction(), None);
        assert_eq!(Label::Code(-1).to_direction(), None);
    }

    #[test]
    fn test_direction_round_trip() {
        for dir in Direction::SCAN_ORDER {
            assert_eq!(Label::from(dir).to_direction(), Some(dir));
        }
    }

    #[test]
    fn test_fixed_predictor() {
        let predictor = FixedPredictor::new(Label::Code(2));
        let features = FeatureVector::from_values(FeatureSchema::Basic, vec![0.0; 8]).unwrap();
        assert_eq!(predictor.predict("any", &features), Ok(Label::Code(2)));

        let boxed: Box<dyn Predictor> = Box::new(predictor);
        assert_eq!(boxed.predict("any", &features), Ok(Label::Code(2)));
    }
}
