//! The expense record and its unpersisted forms.

use crate::error::ValidationError;
use crate::model::{Amount, Category};
use crate::validate::validate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A persisted expense record. The `id` is assigned by the store on insert
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub amount: Amount,
    pub category: Category,
    pub date: NaiveDate,
}

/// An expense that has passed validation but has not been persisted yet.
/// The store assigns the id when the draft is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpenseDraft {
    pub name: String,
    pub amount: Amount,
    pub category: Category,
    pub date: NaiveDate,
}

impl ExpenseDraft {
    /// Attaches a store-assigned id, turning the draft into a record.
    pub(crate) fn into_expense(self, id: i64) -> Expense {
        Expense {
            id,
            name: self.name,
            amount: self.amount,
            category: self.category,
            date: self.date,
        }
    }
}

/// Field overrides for editing a stored expense. Every field is raw text,
/// exactly as the user typed it; `apply` merges them over the stored record
/// and re-runs the same validation as a fresh submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseUpdates {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl ExpenseUpdates {
    /// True when no field override was provided.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    /// Seeds an edit draft from `current`, overlays the provided fields and
    /// validates the result. An unparsable amount or date rejects the whole
    /// edit; nothing falls back to a default value.
    pub fn apply(&self, current: &Expense) -> Result<Expense, ValidationError> {
        let name = self.name.as_deref().unwrap_or(&current.name);
        let amount = match &self.amount {
            Some(text) => text.clone(),
            None => current.amount.to_string(),
        };
        let category = match &self.category {
            Some(text) => text.clone(),
            None => current.category.to_string(),
        };
        let date = match &self.date {
            Some(text) => text.clone(),
            None => current.date.to_string(),
        };
        let draft = validate(name, &amount, &category, &date)?;
        Ok(draft.into_expense(current.id))
    }
}
