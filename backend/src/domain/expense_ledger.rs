//! Expense ledger for the dashboard.
//!
//! Owns the in-memory list of the user's expenses and every write to the
//! expenses table. Each write is followed by a refresh of the list; a refresh
//! that fails leaves the previous list in place.
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use shared::{AggregateTotals, Expense, ExpenseDraft};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::expense_aggregator::ExpenseAggregator;
use crate::domain::models::expense::{generate_id, validate_draft, ExpenseValidationError};
use crate::storage::{Connection, ExpenseStorage};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ExpenseValidationError),
    #[error("Error saving expense: {0:#}")]
    Store(#[source] anyhow::Error),
    #[error("Expense {0} not found")]
    NotFound(String),
}

#[derive(Debug, Default)]
struct LedgerState {
    user_id: Option<String>,
    expenses: Vec<Expense>,
    /// Generation of the refresh whose result is currently held
    applied_generation: u64,
}

#[derive(Clone)]
pub struct ExpenseLedgerController<C: Connection> {
    expense_repository: C::ExpenseRepository,
    state: Arc<RwLock<LedgerState>>,
    next_generation: Arc<AtomicU64>,
}

impl<C: Connection> ExpenseLedgerController<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            expense_repository: connection.create_expense_repository(),
            state: Arc::new(RwLock::new(LedgerState::default())),
            next_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Reload the user's expenses, newest first.
    ///
    /// Responses are applied in request order: if a newer refresh has already
    /// landed, an older response is returned to the caller but not kept.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Expense>, LedgerError> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let expenses = self
            .expense_repository
            .list_expenses(user_id)
            .await
            .map_err(LedgerError::Store)?;

        let mut state = self.write_state();
        if generation > state.applied_generation {
            state.applied_generation = generation;
            state.user_id = Some(user_id.to_string());
            state.expenses = expenses.clone();
        } else {
            debug!(
                "Discarding refresh #{} for {}; #{} already applied",
                generation, user_id, state.applied_generation
            );
        }

        Ok(expenses)
    }

    pub async fn create(&self, user_id: &str, draft: ExpenseDraft) -> Result<Expense, LedgerError> {
        let validated = validate_draft(&draft)?;
        let expense = validated.into_expense(generate_id(), user_id.to_string());

        self.expense_repository
            .store_expense(&expense)
            .await
            .map_err(LedgerError::Store)?;
        info!("Created expense {} ({:.2}) for {}", expense.id, expense.amount, user_id);

        self.refresh(user_id).await;
        Ok(expense)
    }

    pub async fn update(&self, expense_id: &str, draft: ExpenseDraft) -> Result<Expense, LedgerError> {
        let validated = validate_draft(&draft)?;

        let existing = self
            .expense_repository
            .get_expense(expense_id)
            .await
            .map_err(LedgerError::Store)?
            .ok_or_else(|| LedgerError::NotFound(expense_id.to_string()))?;

        let expense = validated.into_expense(existing.id, existing.user_id);
        let updated = self
            .expense_repository
            .update_expense(&expense)
            .await
            .map_err(LedgerError::Store)?;
        if !updated {
            return Err(LedgerError::NotFound(expense_id.to_string()));
        }
        info!("Updated expense {}", expense.id);

        self.refresh(&expense.user_id).await;
        Ok(expense)
    }

    /// Delete by ID. Deleting an expense that does not exist is not an error.
    pub async fn delete(&self, expense_id: &str) -> Result<(), LedgerError> {
        let removed = self
            .expense_repository
            .delete_expense(expense_id)
            .await
            .map_err(LedgerError::Store)?;

        let user_id = match removed {
            Some(expense) => {
                info!("Deleted expense {}", expense.id);
                Some(expense.user_id)
            }
            None => {
                debug!("Delete of unknown expense {}", expense_id);
                self.read_state().user_id.clone()
            }
        };

        if let Some(user_id) = user_id {
            self.refresh(&user_id).await;
        }
        Ok(())
    }

    /// Current in-memory list
    pub fn expenses(&self) -> Vec<Expense> {
        self.read_state().expenses.clone()
    }

    /// The first `count` expenses of the current list
    pub fn recent(&self, count: usize) -> Vec<Expense> {
        self.read_state().expenses.iter().take(count).cloned().collect()
    }

    pub fn find(&self, expense_id: &str) -> Option<Expense> {
        self.read_state()
            .expenses
            .iter()
            .find(|e| e.id == expense_id)
            .cloned()
    }

    /// Point read from the store, for expenses not in the loaded list
    pub async fn fetch(&self, expense_id: &str) -> Result<Option<Expense>, LedgerError> {
        self.expense_repository
            .get_expense(expense_id)
            .await
            .map_err(LedgerError::Store)
    }

    /// User whose expenses are currently loaded
    pub fn loaded_user(&self) -> Option<String> {
        self.read_state().user_id.clone()
    }

    pub fn totals(&self, as_of: NaiveDateTime) -> AggregateTotals {
        ExpenseAggregator::aggregate(&self.read_state().expenses, as_of)
    }

    /// Totals of the current list as of now (UTC)
    pub fn totals_now(&self) -> AggregateTotals {
        ExpenseAggregator::aggregate_now(&self.read_state().expenses)
    }

    async fn refresh(&self, user_id: &str) {
        if let Err(e) = self.list(user_id).await {
            warn!("Failed to refresh expenses for {}: {}", user_id, e);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
