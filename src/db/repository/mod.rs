//! Repository Module
//!
//! CRUD operations per table. Every mutation is a single-document
//! read-modify-write; nothing here spans multiple records atomically.

pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID convention: "table:id" strings everywhere above the repository layer
// =============================================================================

/// Parse an id that may or may not carry its table prefix into a RecordId
pub(crate) fn record_id(table: &str, id: &str) -> RecordId {
    match id.parse::<RecordId>() {
        Ok(rid) if rid.table() == table => rid,
        _ => RecordId::from_table_key(table, strip_table_prefix(table, id)),
    }
}

/// Strip an optional "table:" prefix from an id string
pub(crate) fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(&format!("{table}:"))
        .unwrap_or(id)
        .trim_start_matches(['⟨', '⟩'])
        .trim_end_matches('⟩')
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
