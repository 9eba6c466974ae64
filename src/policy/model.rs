use super::Policy;
use crate::features::{FeatureSchema, FeatureVector};
use crate::game::{Direction, GameState};
use crate::predictor::Predictor;

/// Policy driven by an external predictor.
///
/// The predicted direction is applied as-is, without a safety check. Any
/// prediction failure or unrecognised label keeps the current direction.
pub struct ModelPolicy<P> {
    predictor: P,
    model_id: String,
    schema: FeatureSchema,
    failures: u64,
}

impl<P: Predictor> ModelPolicy<P> {
    pub fn new(predictor: P, model_id: impl Into<String>, schema: FeatureSchema) -> Self {
        Self {
            predictor,
            model_id: model_id.into(),
            schema,
            failures: 0,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    /// Ticks where the predictor gave no usable answer
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

impl<P: Predictor> Policy for ModelPolicy<P> {
    fn name(&self) -> String {
        format!("model:{}", self.model_id)
    }

    fn decide(&mut self, state: &GameState) -> Direction {
        let current = state.direction();
        let features = FeatureVector::build(state, self.schema);

        match self.predictor.predict(&self.model_id, &features) {
            Ok(label) => match label.to_direction() {
                Some(direction) => direction,
                None => {
                    self.failures += 1;
                    tracing::warn!(%label, model = %self.model_id, "unrecognised label, keeping {}", current);
                    current
                }
            },
            Err(e) => {
                self.failures += 1;
                tracing::warn!(error = %e, model = %self.model_id, "prediction failed, keeping {}", current);
                current
            }
        }
    }
}
