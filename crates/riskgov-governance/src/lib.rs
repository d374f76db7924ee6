//! # riskgov-governance
//!
//! Service layer over the appetite/tolerance lifecycle.
//!
//! ## Services
//! - [`AppetiteService`]: statement create, edit, approve, supersede, delete
//! - [`CategoryService`]: appetite categories under a statement
//! - [`ToleranceService`]: tolerance metrics, activation, supersede, classification
//! - [`ChainValidator`]: taxonomy → appetite → tolerance completeness
//! - [`dime`]: control-effectiveness scoring
//!
//! Services validate input and check the caller's capabilities before
//! delegating to the storage traits, whose procedures re-check every
//! lifecycle rule inside their own transaction.

pub mod appetite;
pub mod chain;
pub mod dime;
mod outcome;
pub mod tolerance;
mod validate;

pub use appetite::{AppetiteService, CategoryService};
pub use chain::ChainValidator;
pub use tolerance::ToleranceService;
