//! Validation rules for the add and edit flows.
//!
//! A submission only reaches the store as a typed [`ExpenseDraft`], and the
//! only way to build one is through [`validate`], so every record in the
//! store has passed the same rules.

use crate::error::ValidationError;
use crate::model::{Amount, Category, ExpenseDraft};
use chrono::NaiveDate;
use std::str::FromStr;

/// The date format the form produces.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Checks the raw text of a submission and produces a draft ready to insert.
///
/// The rules:
/// - `name` must be non-blank after trimming.
/// - `amount` must parse as a decimal number and must not be negative.
/// - `category` must name one of the fixed categories (case-insensitive).
/// - `date` must parse as `yyyy-mm-dd`.
///
/// The returned draft carries the trimmed name and the parsed field values.
pub fn validate(
    name: &str,
    amount: &str,
    category: &str,
    date: &str,
) -> Result<ExpenseDraft, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankName);
    }

    let amount_text = amount.trim();
    if amount_text.is_empty() {
        return Err(ValidationError::BlankAmount);
    }
    let amount = Amount::from_str(amount_text)
        .map_err(|_| ValidationError::BadAmount(amount_text.to_string()))?;
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount(amount_text.to_string()));
    }

    let category_text = category.trim();
    if category_text.is_empty() {
        return Err(ValidationError::BlankCategory);
    }
    let category = Category::from_str(&category_text.to_lowercase())
        .map_err(|_| ValidationError::UnknownCategory(category_text.to_string()))?;

    let date_text = date.trim();
    if date_text.is_empty() {
        return Err(ValidationError::BlankDate);
    }
    let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT)
        .map_err(|_| ValidationError::BadDate(date_text.to_string()))?;

    Ok(ExpenseDraft {
        name: name.to_string(),
        amount,
        category,
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_submission() {
        let draft = validate("Coffee", "4.50", "food", "2024-01-05").unwrap();
        assert_eq!(draft.name, "Coffee");
        assert_eq!(draft.amount, Amount::from_str("4.50").unwrap());
        assert_eq!(draft.category, Category::Food);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let draft = validate("  Coffee  ", " 4.50 ", " food ", " 2024-01-05 ").unwrap();
        assert_eq!(draft.name, "Coffee");
        assert_eq!(draft.amount, Amount::from_str("4.50").unwrap());
    }

    #[test]
    fn test_category_is_case_insensitive() {
        let draft = validate("Rent", "800", "Apartment", "2024-01-01").unwrap();
        assert_eq!(draft.category, Category::Apartment);
        let draft = validate("Rent", "800", "APARTMENT", "2024-01-01").unwrap();
        assert_eq!(draft.category, Category::Apartment);
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = validate("", "4.50", "food", "2024-01-05").unwrap_err();
        assert_eq!(err, ValidationError::BlankName);
        let err = validate("   ", "4.50", "food", "2024-01-05").unwrap_err();
        assert_eq!(err, ValidationError::BlankName);
    }

    #[test]
    fn test_blank_amount_rejected() {
        let err = validate("Coffee", "  ", "food", "2024-01-05").unwrap_err();
        assert_eq!(err, ValidationError::BlankAmount);
    }

    #[test]
    fn test_unparsable_amount_rejected() {
        let err = validate("Coffee", "four-fifty", "food", "2024-01-05").unwrap_err();
        assert_eq!(err, ValidationError::BadAmount("four-fifty".to_string()));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = validate("Refund", "-4.50", "food", "2024-01-05").unwrap_err();
        assert_eq!(err, ValidationError::NegativeAmount("-4.50".to_string()));
    }

    #[test]
    fn test_zero_amount_accepted() {
        let draft = validate("Freebie", "0", "others", "2024-01-05").unwrap();
        assert!(draft.amount.is_zero());
    }

    #[test]
    fn test_blank_category_rejected() {
        let err = validate("Coffee", "4.50", "", "2024-01-05").unwrap_err();
        assert_eq!(err, ValidationError::BlankCategory);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = validate("Coffee", "4.50", "groceries", "2024-01-05").unwrap_err();
        assert_eq!(err, ValidationError::UnknownCategory("groceries".to_string()));
    }

    #[test]
    fn test_blank_date_rejected() {
        let err = validate("Coffee", "4.50", "food", "").unwrap_err();
        assert_eq!(err, ValidationError::BlankDate);
    }

    #[test]
    fn test_malformed_date_rejected() {
        let err = validate("Coffee", "4.50", "food", "05/01/2024").unwrap_err();
        assert_eq!(err, ValidationError::BadDate("05/01/2024".to_string()));
        let err = validate("Coffee", "4.50", "food", "2024-13-40").unwrap_err();
        assert_eq!(err, ValidationError::BadDate("2024-13-40".to_string()));
    }
}
