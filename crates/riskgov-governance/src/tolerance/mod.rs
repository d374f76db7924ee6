//! Tolerance metrics: the quantitative side of appetite.

mod service;

pub use service::ToleranceService;
