//! Board analysis used by the scripted policies
//!
//! Both analyzers are pure queries over a `GameState`.

pub mod reachability;
pub mod safety;

pub use reachability::reachable_area;
pub use safety::{SafeMoves, is_safe, safe_set};
