//! This module is responsible for reading, writing and managing the SQLite database.
//!
//! `Db` is the access layer for expense records: it owns the connection pool
//! and translates typed operations into SQL. It is constructed once (by
//! [`Config`](crate::Config)) and passed around by handle; there is no
//! process-wide database state.

mod migrations;

use crate::error::StoreError;
use crate::model::{Amount, Category, Expense, ExpenseDraft};
use crate::Result;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// The schema version this build of the program works against.
const SCHEMA_VERSION: i32 = 1;

/// A raw row from the expenses table, before field parsing.
type ExpenseRow = (i64, String, String, String, String);

#[derive(Debug, Clone)]
pub(crate) struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Bootstraps version bookkeeping and migrates the schema up to the
    ///   current version
    pub(crate) async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database already exists at {}", path.display());
        }
        let pool = connect(path, true).await?;

        // A brand-new database starts at version 0 with only the bookkeeping
        // table, then migrates up like any out-of-date database.
        sqlx::query("CREATE TABLE schema_version (version INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .context("Failed to create schema_version table")?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
            .execute(&pool)
            .await
            .context("Failed to insert initial schema version")?;

        migrations::run(&pool, 0, SCHEMA_VERSION).await?;
        debug!("Created database at {}", path.display());
        Ok(Self { pool })
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Connects and updates the schema with migrations if it is out-of-date
    pub(crate) async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!(
                "No database found at {}, run `spendlog init` first",
                path.display()
            );
        }
        let pool = connect(path, false).await?;
        let current = schema_version(&pool).await?;
        migrations::run(&pool, current, SCHEMA_VERSION).await?;
        Ok(Self { pool })
    }

    /// Persists a draft. The store assigns the id; the persisted record is
    /// returned so the caller observes exactly what was written.
    pub(crate) async fn insert_expense(
        &self,
        draft: &ExpenseDraft,
    ) -> Result<Expense, StoreError> {
        let result =
            sqlx::query("INSERT INTO expenses (name, amount, category, date) VALUES (?, ?, ?, ?)")
                .bind(&draft.name)
                .bind(draft.amount.to_string())
                .bind(draft.category.to_string())
                .bind(draft.date.to_string())
                .execute(&self.pool)
                .await?;
        Ok(draft.clone().into_expense(result.last_insert_rowid()))
    }

    /// Returns the full current contents of the store, ordered by id.
    pub(crate) async fn fetch_expenses(&self) -> Result<Vec<Expense>, StoreError> {
        let rows: Vec<ExpenseRow> =
            sqlx::query_as("SELECT id, name, amount, category, date FROM expenses ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(decode_row).collect()
    }

    /// Looks up a single record by id.
    pub(crate) async fn get_expense(&self, id: i64) -> Result<Option<Expense>, StoreError> {
        let row: Option<ExpenseRow> =
            sqlx::query_as("SELECT id, name, amount, category, date FROM expenses WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(decode_row).transpose()
    }

    /// Replaces the stored record matching `expense.id` with the given field
    /// values. Returns `StoreError::NotFound` if the id does not exist.
    pub(crate) async fn update_expense(&self, expense: &Expense) -> Result<Expense, StoreError> {
        let result =
            sqlx::query("UPDATE expenses SET name = ?, amount = ?, category = ?, date = ? WHERE id = ?")
                .bind(&expense.name)
                .bind(expense.amount.to_string())
                .bind(expense.category.to_string())
                .bind(expense.date.to_string())
                .bind(expense.id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(expense.id));
        }
        Ok(expense.clone())
    }

    /// Removes the record matching `id`. Returns whether a row was removed;
    /// deleting an id that is not present is not an error.
    pub(crate) async fn delete_expense(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Parses a raw expenses row back into an `Expense`.
fn decode_row((id, name, amount, category, date): ExpenseRow) -> Result<Expense, StoreError> {
    let corrupt = |detail: String| StoreError::Corrupt { id, detail };
    let amount = Amount::from_str(&amount)
        .map_err(|e| corrupt(format!("bad amount '{amount}': {e}")))?;
    let category = Category::from_str(&category)
        .map_err(|e| corrupt(format!("bad category '{category}': {e}")))?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|e| corrupt(format!("bad date '{date}': {e}")))?;
    Ok(Expense {
        id,
        name,
        amount,
        category,
        date,
    })
}

async fn connect(path: &Path, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .context("Failed to parse SQLite connection string")?
        .create_if_missing(create);

    // One connection is plenty for a single-user store and sidesteps SQLite
    // writer contention.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Unable to open the SQLite database at {}", path.display()))
}

async fn schema_version(pool: &SqlitePool) -> Result<i32> {
    let row: (i32,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .context("Failed to query schema version")?;
    Ok(row.0)
}
