//! Edit command handler.

use crate::args::EditArgs;
use crate::commands::Out;
use crate::model::{Expense, ExpenseUpdates};
use crate::{Config, ExpenseBook, Result};
use anyhow::{bail, Context};

/// Edits a recorded expense in place.
///
/// The edit starts from the record's current values, overlays the fields the
/// user passed, and re-validates the merged result before anything is
/// written. An unparsable amount or date therefore rejects the whole edit
/// and leaves the stored record untouched.
///
/// # Errors
/// - Returns an error when no field was passed, when the id does not exist,
///   when the merged record fails validation, or when a database operation
///   fails.
pub async fn edit(config: Config, args: EditArgs) -> Result<Out<Expense>> {
    let updates = ExpenseUpdates {
        name: args.name,
        amount: args.amount,
        category: args.category,
        date: args.date,
    };
    if updates.is_empty() {
        bail!(
            "Nothing to change for expense {}: pass at least one of --name, --amount, \
             --category, --date",
            args.id
        );
    }

    let book = ExpenseBook::open(&config).await?;
    let current = book
        .get_expense(args.id)
        .await?
        .with_context(|| format!("Expense {} does not exist", args.id))?;

    let updated = updates
        .apply(&current)
        .context("please fill out all fields correctly")?;
    let saved = book
        .update_expense(updated)
        .await
        .context("Unable to save the edited expense")?;

    let message = format!(
        "Updated expense {}: {} {} ({}) on {}",
        saved.id, saved.name, saved.amount, saved.category, saved.date
    );
    Ok(Out::new(message, saved))
}
