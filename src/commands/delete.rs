//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::{Config, ExpenseBook, Result};
use anyhow::Context;

/// Deletes a recorded expense by id.
///
/// Deleting an id that does not exist is not an error; the message says that
/// nothing was removed.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<bool>> {
    let book = ExpenseBook::open(&config).await?;
    let removed = book
        .delete_expense(args.id)
        .await
        .context("Unable to delete the expense")?;

    let message = if removed {
        format!("Deleted expense {}", args.id)
    } else {
        format!("Expense {} was not found, nothing was deleted", args.id)
    };
    Ok(Out::new(message, removed))
}
