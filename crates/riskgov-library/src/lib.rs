//! # riskgov-library
//!
//! Copies reusable root causes, impacts, controls, KRIs, and KCIs from the
//! shared seed catalog into an organization's library tables.
//!
//! [`matcher`] is pure filtering; [`LibraryGenerator`] wires it to storage.

pub mod catalog;
pub mod generator;
pub mod matcher;

pub use generator::LibraryGenerator;
