//! Appetite statements and their categories.

mod category_service;
mod statement_service;

pub use category_service::CategoryService;
pub use statement_service::AppetiteService;
