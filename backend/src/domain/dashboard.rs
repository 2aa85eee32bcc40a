//! The dashboard page: ties the session, seeding, catalog, ledger and form
//! together.
//!
//! `mount` resolves the user, seeds the taxonomy once per process, then loads
//! the catalog and the ledger concurrently. Seeding always finishes before the
//! catalog is first read, so a new user never sees a half-seeded list.
use chrono::Utc;
use log::{info, warn};
use shared::{Category, DashboardResponse, Expense, ExpenseDraft, FormPatch, FormView, Subcategory, User};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use crate::domain::category_catalog::{CategoryCatalog, SelectionTrigger};
use crate::domain::currency::currency_sign;
use crate::domain::edit_form::{EditFormState, FormError};
use crate::domain::expense_ledger::{ExpenseLedgerController, LedgerError};
use crate::domain::taxonomy_seeder::TaxonomySeeder;
use crate::session::SessionProvider;
use crate::storage::{Connection, UserStorage};

/// Number of expenses shown in the dashboard's recent list
pub const RECENT_EXPENSE_COUNT: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("User not found. Please log in again.")]
    Unauthenticated,
    #[error("Could not resolve the current session: {0:#}")]
    Session(#[source] anyhow::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),
}

pub struct Dashboard<C: Connection, S: SessionProvider> {
    session: Arc<S>,
    user_repository: C::UserRepository,
    seeder: TaxonomySeeder<C>,
    catalog: CategoryCatalog<C>,
    ledger: ExpenseLedgerController<C>,
    seeding: OnceCell<()>,
    form: Mutex<EditFormState>,
}

impl<C: Connection, S: SessionProvider> Dashboard<C, S> {
    pub fn new(connection: Arc<C>, session: Arc<S>) -> Self {
        Self {
            session,
            user_repository: connection.create_user_repository(),
            seeder: TaxonomySeeder::new(connection.clone()),
            catalog: CategoryCatalog::new(connection.clone()),
            ledger: ExpenseLedgerController::new(connection),
            seeding: OnceCell::new(),
            form: Mutex::new(EditFormState::new()),
        }
    }

    pub fn ledger(&self) -> &ExpenseLedgerController<C> {
        &self.ledger
    }

    pub fn catalog(&self) -> &CategoryCatalog<C> {
        &self.catalog
    }

    /// Load everything the page shows. Returns the signed-in user's ID.
    pub async fn mount(&self) -> Result<String, DashboardError> {
        let user_id = self.require_user().await?;

        self.seeding
            .get_or_init(|| self.seed_once(&user_id))
            .await;

        let (categories, expenses) = tokio::join!(
            self.catalog.list_categories(&user_id),
            self.ledger.list(&user_id)
        );
        match expenses {
            Ok(expenses) => info!(
                "Dashboard mounted for {}: {} categories, {} expenses",
                user_id,
                categories.len(),
                expenses.len()
            ),
            Err(e) => warn!("Dashboard mounted for {} without expenses: {}", user_id, e),
        }

        Ok(user_id)
    }

    async fn seed_once(&self, user_id: &str) {
        match self.user_repository.get_user(user_id).await {
            Ok(Some(user)) if user.has_presets => {
                info!("Presets already seeded for {}", user_id);
                return;
            }
            Ok(_) => {}
            Err(e) => warn!("Could not read user {} before seeding: {:#}", user_id, e),
        }

        let report = self.seeder.seed_if_needed(user_id).await;
        if !report.is_complete() {
            warn!(
                "Seeding for {} finished with {} failure(s)",
                user_id,
                report.failures.len()
            );
        }
    }

    /// What the dashboard renders, from the currently loaded state
    pub async fn snapshot(&self) -> Result<DashboardResponse, DashboardError> {
        let user_id = self.require_user().await?;
        let currency_code = self.currency_code(&user_id).await;

        Ok(DashboardResponse {
            totals: self.ledger.totals_now(),
            currency_sign: currency_sign(&currency_code).to_string(),
            currency_code,
            recent_expenses: self.ledger.recent(RECENT_EXPENSE_COUNT),
            categories: self.catalog.categories(),
        })
    }

    /// Reload the expense list. A failed read falls back to the last list loaded.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>, DashboardError> {
        let user_id = self.require_user().await?;
        match self.ledger.list(&user_id).await {
            Ok(expenses) => Ok(expenses),
            Err(e) => {
                warn!("Serving cached expenses for {}: {}", user_id, e);
                Ok(self.ledger.expenses())
            }
        }
    }

    pub async fn categories(&self) -> Result<Vec<Category>, DashboardError> {
        let user_id = self.require_user().await?;
        Ok(self.catalog.list_categories(&user_id).await)
    }

    pub async fn subcategories(&self, category_id: &str) -> Result<Vec<Subcategory>, DashboardError> {
        self.require_user().await?;
        Ok(self.catalog.list_subcategories(category_id).await)
    }

    pub async fn create_expense(&self, draft: ExpenseDraft) -> Result<Expense, DashboardError> {
        let user_id = self.require_user().await?;
        Ok(self.ledger.create(&user_id, draft).await?)
    }

    pub async fn update_expense(&self, expense_id: &str, draft: ExpenseDraft) -> Result<Expense, DashboardError> {
        self.require_user().await?;
        Ok(self.ledger.update(expense_id, draft).await?)
    }

    pub async fn delete_expense(&self, expense_id: &str) -> Result<(), DashboardError> {
        self.require_user().await?;
        Ok(self.ledger.delete(expense_id).await?)
    }

    pub async fn form(&self) -> FormView {
        self.form.lock().await.view()
    }

    pub async fn open_create_form(&self) -> FormView {
        let mut form = self.form.lock().await;
        form.open_create(Utc::now().date_naive());
        form.view()
    }

    /// Open the form on an expense, keeping its subcategory selected.
    /// Falls back to the store when the expense is not in the loaded list.
    pub async fn open_edit_form(&self, expense_id: &str) -> Result<FormView, DashboardError> {
        let user_id = self.require_user().await?;
        let expense = match self.ledger.find(expense_id) {
            Some(expense) => Some(expense),
            None => self.ledger.fetch(expense_id).await?,
        }
        .filter(|e| e.user_id == user_id)
        .ok_or_else(|| DashboardError::ExpenseNotFound(expense_id.to_string()))?;
        let options = self.subcategory_options(&user_id, &expense.category).await;

        let mut form = self.form.lock().await;
        form.open_edit(&expense);
        form.apply_category_selection(&expense.category, options, SelectionTrigger::LoadedForEdit);
        Ok(form.view())
    }

    pub async fn select_form_category(&self, category: &str) -> Result<FormView, DashboardError> {
        let user_id = self.require_user().await?;
        let options = self.subcategory_options(&user_id, category).await;

        let mut form = self.form.lock().await;
        if !form.is_open() {
            return Err(FormError::NotOpen.into());
        }
        form.apply_category_selection(category, options, SelectionTrigger::UserSelection);
        Ok(form.view())
    }

    /// Subcategory names for a category, reloading the catalog when the name is not cached
    async fn subcategory_options(&self, user_id: &str, category: &str) -> Vec<String> {
        if self.catalog.find_category(category).is_none() {
            self.catalog.list_categories(user_id).await;
        }
        self.catalog.subcategories_for(category).await
    }

    pub async fn patch_form(&self, patch: FormPatch) -> Result<FormView, DashboardError> {
        let mut form = self.form.lock().await;
        if !form.is_open() {
            return Err(FormError::NotOpen.into());
        }
        form.apply_patch(patch);
        Ok(form.view())
    }

    pub async fn submit_form(&self) -> Result<Expense, DashboardError> {
        let user_id = self.require_user().await?;
        let mut form = self.form.lock().await;
        Ok(form.submit(&self.ledger, &user_id).await?)
    }

    pub async fn close_form(&self) -> FormView {
        let mut form = self.form.lock().await;
        form.close();
        form.view()
    }

    async fn require_user(&self) -> Result<String, DashboardError> {
        self.session
            .current_user_id()
            .await
            .map_err(DashboardError::Session)?
            .ok_or(DashboardError::Unauthenticated)
    }

    async fn currency_code(&self, user_id: &str) -> String {
        match self.user_repository.get_user(user_id).await {
            Ok(Some(user)) => user.currency_code().to_string(),
            Ok(None) => User::DEFAULT_CURRENCY.to_string(),
            Err(e) => {
                warn!("Could not read currency for {}: {:#}", user_id, e);
                User::DEFAULT_CURRENCY.to_string()
            }
        }
    }
}
