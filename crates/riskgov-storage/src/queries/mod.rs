//! Query modules, one per table family. Each function takes a borrowed
//! connection so it composes inside procedure transactions.

pub mod audit_ops;
pub mod category_ops;
pub mod invitation_ops;
pub mod library_ops;
pub mod metric_ops;
pub mod organization_ops;
pub mod regulator_ops;
pub mod row;
pub mod statement_ops;
pub mod structure_ops;
pub mod taxonomy_ops;
pub mod user_ops;
