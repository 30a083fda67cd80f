//! Detection confidence scoring.
//!
//! Four independent dimensions (feature match, classification certainty,
//! boundary clarity, context consistency) are averaged with fixed weights and
//! bucketed into low/medium/high.

pub mod params;
pub mod scorer;
pub mod types;

pub use params::*;
pub use scorer::*;
pub use types::*;
