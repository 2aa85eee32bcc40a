//! # Domain Module
//!
//! Business logic of the expense dashboard.
//!
//! - [`taxonomy_seeder`]: one-time, failure-tolerant seeding of the preset categories
//! - [`expense_aggregator`]: daily, monthly and calendar-year totals
//! - [`expense_ledger`]: expense CRUD and the in-memory list
//! - [`category_catalog`]: cached categories and dependent subcategory selection
//! - [`edit_form`]: the add/edit form state machine
//! - [`dashboard`]: the page lifecycle tying the above together
//!
//! Services are generic over [`Connection`](crate::storage::Connection) so tests
//! can swap in a fault-injecting store.

pub mod category_catalog;
pub mod currency;
pub mod dashboard;
pub mod edit_form;
pub mod expense_aggregator;
pub mod expense_ledger;
pub mod models;
pub mod presets;
pub mod taxonomy_seeder;

pub use category_catalog::{CategoryCatalog, SelectionTrigger};
pub use dashboard::{Dashboard, DashboardError};
pub use edit_form::{EditFormState, FormError};
pub use expense_aggregator::ExpenseAggregator;
pub use expense_ledger::{ExpenseLedgerController, LedgerError};
pub use models::expense::ExpenseValidationError;
pub use taxonomy_seeder::{SeedPartialFailure, SeedReport, TaxonomySeeder};
