use super::Policy;
use crate::analysis::{is_safe, safe_set};
use crate::game::{Direction, GameState};

/// Wraps a policy and replaces an unsafe choice with the first safe
/// direction in scan order. With nothing safe the inner choice stands.
pub struct SafeguardedPolicy<P> {
    inner: P,
    overrides: u64,
}

impl<P: Policy> SafeguardedPolicy<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, overrides: 0 }
    }

    /// Times the inner choice was replaced
    pub fn overrides(&self) -> u64 {
        self.overrides
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Policy> Policy for SafeguardedPolicy<P> {
    fn name(&self) -> String {
        format!("{} (safeguarded)", self.inner.name())
    }

    fn decide(&mut self, state: &GameState) -> Direction {
        let chosen = self.inner.decide(state);
        if is_safe(state, chosen) {
            return chosen;
        }

        match safe_set(state).first_safe() {
            Some(replacement) => {
                self.overrides += 1;
                tracing::debug!(%chosen, %replacement, "unsafe choice replaced");
                replacement
            }
            None => chosen,
        }
    }

    fn steer(&mut self, requested: Direction) {
        self.inner.steer(requested);
    }

    fn is_autonomous(&self) -> bool {
        self.inner.is_autonomous()
    }
}
