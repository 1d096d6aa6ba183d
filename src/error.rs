//! Error types.
//!
//! The application layer (CLI, config, migrations) uses `anyhow` so that
//! failures carry context about what was being attempted. The domain layers
//! return the typed errors below, which convert into the application error
//! with `?`.

use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A rejected form submission. One variant per rule so callers can log the
/// specific failure; the CLI surfaces them under a single generic banner.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be blank")]
    BlankName,
    #[error("amount must not be blank")]
    BlankAmount,
    #[error("'{0}' is not a valid amount")]
    BadAmount(String),
    #[error("amount must not be negative, got '{0}'")]
    NegativeAmount(String),
    #[error("category must not be blank")]
    BlankCategory,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("date must not be blank")]
    BlankDate,
    #[error("'{0}' is not a valid date, expected yyyy-mm-dd")]
    BadDate(String),
}

/// A failure in the expense store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The id named by an update does not exist in the store.
    #[error("expense {0} does not exist")]
    NotFound(i64),

    /// A stored row could not be decoded back into an `Expense`.
    #[error("stored expense {id} could not be read: {detail}")]
    Corrupt { id: i64, detail: String },

    /// The underlying SQLite store failed.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
