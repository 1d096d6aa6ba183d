//! List command handler.

use crate::commands::Out;
use crate::model::Expense;
use crate::{Config, ExpenseBook, Result};
use rust_decimal::Decimal;

/// Lists every recorded expense, oldest first, with a total at the end.
pub async fn list(config: Config) -> Result<Out<Vec<Expense>>> {
    let book = ExpenseBook::open(&config).await?;
    let expenses = book.expenses();
    let message = render(&expenses);
    Ok(Out::new(message, expenses))
}

/// Renders the expense listing as plain text, one row per record.
fn render(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses recorded yet".to_string();
    }

    let mut lines = Vec::with_capacity(expenses.len() + 1);
    for expense in expenses {
        lines.push(format!(
            "{:>5}  {}  {:<9}  {:>10}  {}",
            expense.id,
            expense.date,
            expense.category.to_string(),
            expense.amount.to_string(),
            expense.name
        ));
    }

    let total: Decimal = expenses.iter().map(|e| e.amount.value()).sum();
    let count = expenses.len();
    lines.push(format!(
        "{} expense{} totalling {}",
        count,
        if count == 1 { "" } else { "s" },
        total
    ));
    lines.join("\n")
}
