//! # Storage Traits
//!
//! The record store the dashboard talks to. Each table gets its own trait so the
//! domain layer can be driven by any backend (CSV files, a remote store, or a
//! test double) without modification.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Category, Expense, NewCategory, NewSubcategory, Subcategory, User};

/// Trait defining the interface for user storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Retrieve a user by ID
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Store a user row (sign-up happens outside the dashboard; used for bootstrapping)
    async fn store_user(&self, user: &User) -> Result<()>;

    /// Set the `has_presets` flag. Returns false when no such user exists.
    async fn set_has_presets(&self, user_id: &str, has_presets: bool) -> Result<bool>;
}

/// Trait defining the interface for category storage operations
#[async_trait]
pub trait CategoryStorage: Send + Sync {
    /// Insert categories keyed on `(user_id, name)`, ignoring rows that already exist.
    /// Returns only the rows that were actually inserted.
    async fn upsert_categories_ignore_duplicates(&self, rows: &[NewCategory]) -> Result<Vec<Category>>;

    /// Point lookup by `(user_id, name)`
    async fn find_category(&self, user_id: &str, name: &str) -> Result<Option<Category>>;

    /// List a user's categories ordered by name ascending
    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>>;
}

/// Trait defining the interface for subcategory storage operations
#[async_trait]
pub trait SubcategoryStorage: Send + Sync {
    /// Insert subcategories keyed on `(category_id, name)`, ignoring rows that already exist.
    /// Returns only the rows that were actually inserted.
    async fn upsert_subcategories_ignore_duplicates(&self, rows: &[NewSubcategory]) -> Result<Vec<Subcategory>>;

    /// List the subcategories of one category
    async fn list_subcategories(&self, category_id: &str) -> Result<Vec<Subcategory>>;

    /// List every subcategory owned by a user
    async fn list_user_subcategories(&self, user_id: &str) -> Result<Vec<Subcategory>>;
}

/// Trait defining the interface for expense storage operations
#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// Store a new expense
    async fn store_expense(&self, expense: &Expense) -> Result<()>;

    /// Retrieve a specific expense by ID
    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>>;

    /// List a user's expenses ordered by `created_at` descending (most recent first)
    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>>;

    /// Replace the row with the same ID. Returns false if no such row exists.
    async fn update_expense(&self, expense: &Expense) -> Result<bool>;

    /// Delete an expense by ID. Returns the deleted row, if there was one.
    async fn delete_expense(&self, expense_id: &str) -> Result<Option<Expense>>;
}

/// Trait defining the interface for storage connections
///
/// Abstracts away the connection type and provides factory methods for the
/// repositories, so services only ever see the storage traits.
pub trait Connection: Send + Sync + Clone + 'static {
    type UserRepository: UserStorage + Clone + 'static;
    type CategoryRepository: CategoryStorage + Clone + 'static;
    type SubcategoryRepository: SubcategoryStorage + Clone + 'static;
    type ExpenseRepository: ExpenseStorage + Clone + 'static;

    fn create_user_repository(&self) -> Self::UserRepository;

    fn create_category_repository(&self) -> Self::CategoryRepository;

    fn create_subcategory_repository(&self) -> Self::SubcategoryRepository;

    fn create_expense_repository(&self) -> Self::ExpenseRepository;
}
