//! Governance lifecycle rules.
//!
//! Pure predicates over already-fetched rows. The storage procedures evaluate
//! them inside the same transaction that performs the write, so a check and
//! its mutation can never interleave with another writer.

mod category;
mod metric;
mod statement;

pub use category::{category_delete_check, ensure_category_editable};
pub use metric::{
    ensure_can_activate, ensure_can_deactivate, ensure_can_supersede_metric,
    ensure_metric_editable, metric_delete_check, successor_metric,
};
pub use statement::{
    ensure_can_approve, ensure_can_create_statement, ensure_can_supersede_statement,
    ensure_statement_editable, statement_delete_check,
};
