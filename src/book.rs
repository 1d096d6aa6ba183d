//! The coordinator between presentation code and the expense store.
//!
//! `ExpenseBook` owns the store handle and a continuously-refreshed snapshot
//! of the current records, published through a `tokio::sync::watch` channel.
//! Presentation code subscribes for snapshots and calls the mutation methods;
//! every mutation is awaited, returns a typed result, and ends by publishing
//! a fresh snapshot. Dropping the book closes the channel, which ends all
//! subscriptions with it.

use crate::db::Db;
use crate::error::StoreError;
use crate::model::{Expense, ExpenseDraft};
use crate::{Config, Result};
use tokio::sync::watch;
use tracing::debug;

pub struct ExpenseBook {
    db: Db,
    snapshot: watch::Sender<Vec<Expense>>,
}

impl ExpenseBook {
    /// Opens the book over the configured store and loads the initial
    /// snapshot.
    pub async fn open(config: &Config) -> Result<Self> {
        let db = config.db().clone();
        let initial = db.fetch_expenses().await?;
        let (snapshot, _) = watch::channel(initial);
        Ok(Self { db, snapshot })
    }

    /// Subscribes to snapshots of the current records. The receiver is
    /// marked changed after every successful mutation and sees the full
    /// contents each time.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Expense>> {
        self.snapshot.subscribe()
    }

    /// Returns a copy of the current snapshot.
    pub fn expenses(&self) -> Vec<Expense> {
        self.snapshot.borrow().clone()
    }

    /// Looks up a single record by id, straight from the store.
    pub async fn get_expense(&self, id: i64) -> Result<Option<Expense>, StoreError> {
        self.db.get_expense(id).await
    }

    /// Persists a validated draft and returns the stored record with its
    /// assigned id.
    pub async fn add_expense(&self, draft: ExpenseDraft) -> Result<Expense, StoreError> {
        let expense = self.db.insert_expense(&draft).await?;
        debug!("Recorded expense {}", expense.id);
        self.refresh().await?;
        Ok(expense)
    }

    /// Replaces the stored record matching `expense.id`. Fails with
    /// `StoreError::NotFound` when there is no such record.
    pub async fn update_expense(&self, expense: Expense) -> Result<Expense, StoreError> {
        let expense = self.db.update_expense(&expense).await?;
        debug!("Updated expense {}", expense.id);
        self.refresh().await?;
        Ok(expense)
    }

    /// Removes the record matching `id`, returning whether anything was
    /// removed. An absent id is a no-op, not an error.
    pub async fn delete_expense(&self, id: i64) -> Result<bool, StoreError> {
        let removed = self.db.delete_expense(id).await?;
        if removed {
            debug!("Deleted expense {id}");
            self.refresh().await?;
        }
        Ok(removed)
    }

    /// Re-reads the store and publishes the result to all subscribers.
    async fn refresh(&self) -> Result<(), StoreError> {
        let current = self.db.fetch_expenses().await?;
        self.snapshot.send_replace(current);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_snapshot_starts_with_store_contents() {
        let env = TestEnv::new().await;
        let book = env.book().await;
        book.add_expense(TestEnv::draft("Coffee", "4.50", "food", "2024-01-05"))
            .await
            .unwrap();
        drop(book);

        // A freshly-opened book sees what is already stored.
        let book = env.book().await;
        assert_eq!(book.expenses().len(), 1);
        assert_eq!(book.expenses()[0].name, "Coffee");
    }

    #[tokio::test]
    async fn test_subscribers_observe_each_mutation() {
        let env = TestEnv::new().await;
        let book = env.book().await;
        let mut rx = book.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        let added = book
            .add_expense(TestEnv::draft("Coffee", "4.50", "food", "2024-01-05"))
            .await
            .unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        let mut edited = added.clone();
        edited.name = "Espresso".to_string();
        book.update_expense(edited).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update()[0].name, "Espresso");

        book.delete_expense(added.id).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn test_no_op_delete_publishes_nothing() {
        let env = TestEnv::new().await;
        let book = env.book().await;
        let mut rx = book.subscribe();
        rx.borrow_and_update();

        let removed = book.delete_expense(12345).await.unwrap();
        assert!(!removed);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let env = TestEnv::new().await;
        let book = env.book().await;
        let phantom = Expense {
            id: 9,
            name: "Ghost".to_string(),
            amount: "1.00".parse().unwrap(),
            category: crate::Category::Others,
            date: "2024-01-05".parse().unwrap(),
        };
        let err = book.update_expense(phantom).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(9)));
    }

    #[tokio::test]
    async fn test_dropping_the_book_closes_subscriptions() {
        let env = TestEnv::new().await;
        let book = env.book().await;
        let rx = book.subscribe();
        drop(book);
        assert!(rx.has_changed().is_err());
    }
}
