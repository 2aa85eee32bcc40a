//! Add/edit expense form.
//!
//! `Closed` -> `CreateOpen` via `open_create`, `Closed` -> `EditOpen(id)` via
//! `open_edit`. Submitting closes the form only when the write succeeds.
use chrono::NaiveDate;
use log::{debug, warn};
use shared::{Expense, ExpenseDraft, FormMode, FormPatch, FormView, PaymentMode, RecurringType};

use crate::domain::category_catalog::{resolve_subcategory, SelectionTrigger};
use crate::domain::expense_ledger::{ExpenseLedgerController, LedgerError};
use crate::domain::models::expense::validate_draft;
use crate::storage::Connection;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("The expense form is not open")]
    NotOpen,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormFields {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub created_at: String,
    pub recurring_type: RecurringType,
    pub mode_of_payment: Option<PaymentMode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditFormState {
    mode: FormMode,
    fields: FormFields,
    /// Subcategories fetched for the current category
    subcategory_options: Vec<String>,
    error: Option<String>,
}

impl Default for EditFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditFormState {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Closed,
            fields: FormFields::default(),
            subcategory_options: Vec::new(),
            error: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    /// Open an empty form dated `today`
    pub fn open_create(&mut self, today: NaiveDate) {
        self.mode = FormMode::CreateOpen;
        self.fields = FormFields {
            created_at: today.format("%Y-%m-%d").to_string(),
            ..FormFields::default()
        };
        self.subcategory_options.clear();
        self.error = None;
    }

    /// Open the form pre-filled from `expense`. The stored subcategory is
    /// kept even if it is no longer offered for the category.
    pub fn open_edit(&mut self, expense: &Expense) {
        self.mode = FormMode::EditOpen(expense.id.clone());
        self.fields = FormFields {
            title: expense.title.clone(),
            amount: format_amount(expense.amount),
            category: expense.category.clone(),
            subcategory: expense.subcategory.clone(),
            description: expense.description.clone().unwrap_or_default(),
            created_at: expense
                .created_at
                .get(0..10)
                .unwrap_or(&expense.created_at)
                .to_string(),
            recurring_type: expense.recurring_type,
            mode_of_payment: expense.mode_of_payment,
        };
        self.subcategory_options.clear();
        self.error = None;
    }

    /// Discard edits and close
    pub fn close(&mut self) {
        *self = Self::new();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.fields.title = title.into();
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.fields.amount = amount.into();
    }

    pub fn set_subcategory(&mut self, subcategory: impl Into<String>) {
        self.fields.subcategory = subcategory.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.fields.description = description.into();
    }

    pub fn set_created_at(&mut self, created_at: impl Into<String>) {
        self.fields.created_at = created_at.into();
    }

    pub fn set_recurring_type(&mut self, recurring_type: RecurringType) {
        self.fields.recurring_type = recurring_type;
    }

    pub fn set_mode_of_payment(&mut self, mode_of_payment: Option<PaymentMode>) {
        self.fields.mode_of_payment = mode_of_payment;
    }

    pub fn apply_patch(&mut self, patch: FormPatch) {
        if let Some(title) = patch.title {
            self.set_title(title);
        }
        if let Some(amount) = patch.amount {
            self.set_amount(amount);
        }
        if let Some(subcategory) = patch.subcategory {
            self.set_subcategory(subcategory);
        }
        if let Some(description) = patch.description {
            self.set_description(description);
        }
        if let Some(created_at) = patch.created_at {
            self.set_created_at(created_at);
        }
        if let Some(recurring_type) = patch.recurring_type {
            self.set_recurring_type(recurring_type);
        }
        if let Some(mode) = patch.mode_of_payment {
            self.set_mode_of_payment(Some(mode));
        }
    }

    /// Set the category and the subcategories fetched for it
    pub fn apply_category_selection(&mut self, category: &str, options: Vec<String>, trigger: SelectionTrigger) {
        self.fields.category = category.to_string();
        self.fields.subcategory = resolve_subcategory(trigger, &self.fields.subcategory);
        self.subcategory_options = options;
    }

    /// Fetched options, plus the current subcategory when it is not among them
    pub fn subcategory_choices(&self) -> Vec<String> {
        let mut choices = self.subcategory_options.clone();
        let current = &self.fields.subcategory;
        if !current.is_empty() && !choices.iter().any(|c| c == current) {
            choices.push(current.clone());
        }
        choices
    }

    pub fn to_draft(&self) -> ExpenseDraft {
        let description = self.fields.description.trim();
        ExpenseDraft {
            title: self.fields.title.clone(),
            amount: self.fields.amount.clone(),
            category: self.fields.category.clone(),
            subcategory: self.fields.subcategory.clone(),
            description: (!description.is_empty()).then(|| self.fields.description.clone()),
            created_at: self.fields.created_at.clone(),
            recurring_type: self.fields.recurring_type,
            mode_of_payment: self.fields.mode_of_payment,
        }
    }

    pub fn view(&self) -> FormView {
        FormView {
            mode: self.mode.clone(),
            title: self.fields.title.clone(),
            amount: self.fields.amount.clone(),
            category: self.fields.category.clone(),
            subcategory: self.fields.subcategory.clone(),
            description: self.fields.description.clone(),
            created_at: self.fields.created_at.clone(),
            recurring_type: self.fields.recurring_type,
            mode_of_payment: self.fields.mode_of_payment,
            subcategory_choices: self.subcategory_choices(),
            error: self.error.clone(),
        }
    }

    /// Write the form through the ledger.
    ///
    /// On failure the form stays open with its fields and the error message.
    pub async fn submit<C: Connection>(
        &mut self,
        ledger: &ExpenseLedgerController<C>,
        user_id: &str,
    ) -> Result<Expense, FormError> {
        if !self.is_open() {
            return Err(FormError::NotOpen);
        }
        let draft = self.to_draft();

        if let Err(e) = validate_draft(&draft) {
            debug!("Form rejected: {}", e);
            self.error = Some(e.to_string());
            return Err(FormError::Ledger(e.into()));
        }

        let result = match &self.mode {
            FormMode::Closed => return Err(FormError::NotOpen),
            FormMode::CreateOpen => ledger.create(user_id, draft).await,
            FormMode::EditOpen(expense_id) => ledger.update(expense_id, draft).await,
        };

        match result {
            Ok(expense) => {
                self.close();
                Ok(expense)
            }
            Err(e) => {
                warn!("Saving expense from form failed: {}", e);
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}

fn format_amount(amount: f64) -> String {
    if amount.is_finite() {
        amount.to_string()
    } else {
        String::new()
    }
}
