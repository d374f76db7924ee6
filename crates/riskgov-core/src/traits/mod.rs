mod admin_storage;
mod appetite_storage;
mod audit_storage;
mod chain_source;
mod library_storage;
mod taxonomy_storage;
mod tolerance_storage;

pub use admin_storage::IAdminStorage;
pub use appetite_storage::IAppetiteStorage;
pub use audit_storage::IAuditStorage;
pub use chain_source::IChainSource;
pub use library_storage::ILibraryStorage;
pub use taxonomy_storage::ITaxonomyStorage;
pub use tolerance_storage::IToleranceStorage;
