/// riskgov system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Actor recorded on audit entries written by the system itself.
pub const SYSTEM_ACTOR: &str = "system";

/// Default page size for audit-trail queries.
pub const DEFAULT_AUDIT_QUERY_LIMIT: usize = 100;

/// Hard cap on rows returned by a single audit-trail query.
pub const MAX_AUDIT_QUERY_LIMIT: usize = 1000;

/// Highest score on any DIME axis.
pub const DIME_MAX_SCORE: u8 = 3;

/// Maximum length of a statement text.
pub const MAX_STATEMENT_TEXT_LEN: usize = 20_000;

/// Maximum length of a name field (categories, metrics, organizations).
pub const MAX_NAME_LEN: usize = 200;
