use chrono::Utc;
use shared::{Expense, ExpenseDraft};
use uuid::Uuid;

use crate::domain::expense_aggregator::parse_timestamp;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpenseValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Amount '{0}' is not a valid number")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Date '{0}' is not a valid date")]
    InvalidDate(String),
}

/// A draft that passed validation, with its amount parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub draft: ExpenseDraft,
    pub amount: f64,
    pub created_at: String,
}

pub fn generate_id() -> String {
    format!("expense::{}", Uuid::new_v4())
}

/// Check a draft before it is allowed anywhere near the store
pub fn validate_draft(draft: &ExpenseDraft) -> Result<ValidatedDraft, ExpenseValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ExpenseValidationError::EmptyTitle);
    }

    let amount = draft
        .amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| ExpenseValidationError::InvalidAmount(draft.amount.clone()))?;
    if amount <= 0.0 {
        return Err(ExpenseValidationError::NonPositiveAmount);
    }

    let created_at = if draft.created_at.trim().is_empty() {
        Utc::now().date_naive().format("%Y-%m-%d").to_string()
    } else if parse_timestamp(&draft.created_at).is_some() {
        draft.created_at.trim().to_string()
    } else {
        return Err(ExpenseValidationError::InvalidDate(draft.created_at.clone()));
    };

    Ok(ValidatedDraft {
        draft: draft.clone(),
        amount,
        created_at,
    })
}

impl ValidatedDraft {
    /// Build the row to persist. `is_recurring` is derived from the recurring type.
    pub fn into_expense(self, id: String, user_id: String) -> Expense {
        let ValidatedDraft {
            draft,
            amount,
            created_at,
        } = self;

        Expense {
            id,
            user_id,
            title: draft.title,
            amount,
            category: draft.category,
            subcategory: draft.subcategory,
            description: draft.description,
            created_at,
            is_recurring: draft.recurring_type.is_recurring(),
            recurring_type: draft.recurring_type,
            mode_of_payment: draft.mode_of_payment,
        }
    }
}
