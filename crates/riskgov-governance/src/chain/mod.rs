//! Appetite chain completeness: every taxonomy category should reach an
//! appetite entry and an active tolerance metric.

mod evaluate;
mod validator;

pub use evaluate::{evaluate_chain, ChainInputs};
pub use validator::ChainValidator;
