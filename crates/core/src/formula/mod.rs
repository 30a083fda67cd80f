//! Display vs inline formula classification.
//!
//! This module contains:
//! - Formula layout types (FormulaType, FormulaTypeResult, Reason)
//! - Classification parameters (FormulaTypeParams, RuleWeights)
//! - The geometric rule table and the vote-tally classifier

pub mod classifier;
pub mod params;
pub mod reason;
pub(crate) mod rules;
pub mod types;

pub use classifier::*;
pub use params::*;
pub use reason::*;
pub use types::*;
