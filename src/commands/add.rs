//! Add command handler.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::Expense;
use crate::validate::validate;
use crate::{Config, ExpenseBook, Result};
use anyhow::Context;

/// Records a new expense in the local database.
///
/// The raw field text goes through the validation rules first; nothing is
/// written unless every field checks out. The date defaults to today when not
/// provided. The store assigns the id, and the persisted record is returned.
///
/// # Errors
/// - Returns a validation error when a field is blank or unparsable; nothing
///   is persisted in that case.
/// - Returns an error if a database operation fails.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Expense>> {
    let date = match &args.date {
        Some(date) => date.clone(),
        None => chrono::Local::now().date_naive().to_string(),
    };
    let draft = validate(&args.name, &args.amount, &args.category, &date)
        .context("please fill out all fields correctly")?;

    let book = ExpenseBook::open(&config).await?;
    let expense = book
        .add_expense(draft)
        .await
        .context("Unable to record the expense")?;

    let message = format!(
        "Recorded expense {}: {} {} ({}) on {}",
        expense.id, expense.name, expense.amount, expense.category, expense.date
    );
    Ok(Out::new(message, expense))
}
