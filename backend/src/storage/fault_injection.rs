//! Test double that wraps the CSV store and fails chosen calls on demand.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{Category, Expense, NewCategory, NewSubcategory, Subcategory, User};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::csv::{CategoryRepository, CsvConnection, ExpenseRepository, SubcategoryRepository, UserRepository};
use super::traits::{CategoryStorage, Connection, ExpenseStorage, SubcategoryStorage, UserStorage};

#[derive(Default)]
pub struct Faults {
    /// Category names whose upsert fails
    pub failing_category_upserts: Mutex<HashSet<String>>,
    pub fail_category_lookups: AtomicBool,
    pub fail_category_reads: AtomicBool,
    pub fail_subcategory_upserts: AtomicBool,
    pub fail_subcategory_reads: AtomicBool,
    pub fail_flag_writes: AtomicBool,
    pub fail_expense_reads: AtomicBool,
    pub fail_expense_writes: AtomicBool,
    /// Every call that reaches the expense table
    pub expense_calls: AtomicUsize,
    /// Gate the next `list_expenses` call takes
    held_list: Mutex<Option<Arc<ListGate>>>,
}

/// Pauses one `list_expenses` call after it has read the table
#[derive(Default)]
pub struct ListGate {
    /// Signalled once the held call has its rows
    pub reached: Notify,
    /// Lets the held call return
    pub release: Notify,
}

impl Faults {
    pub fn fail_category_upsert(&self, name: &str) {
        self.failing_category_upserts
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    /// Hold the next `list_expenses` call until the returned gate is released
    pub fn hold_next_list(&self) -> Arc<ListGate> {
        let gate = Arc::new(ListGate::default());
        *self.held_list.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }

    pub fn expense_calls(&self) -> usize {
        self.expense_calls.load(Ordering::SeqCst)
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(anyhow!("injected failure: {}", what))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone)]
pub struct FaultyConnection {
    inner: CsvConnection,
    pub faults: Arc<Faults>,
}

impl FaultyConnection {
    pub fn new(inner: CsvConnection) -> Self {
        Self {
            inner,
            faults: Arc::new(Faults::default()),
        }
    }
}

impl Connection for FaultyConnection {
    type UserRepository = FaultyUserRepository;
    type CategoryRepository = FaultyCategoryRepository;
    type SubcategoryRepository = FaultySubcategoryRepository;
    type ExpenseRepository = FaultyExpenseRepository;

    fn create_user_repository(&self) -> Self::UserRepository {
        FaultyUserRepository {
            inner: self.inner.create_user_repository(),
            faults: self.faults.clone(),
        }
    }

    fn create_category_repository(&self) -> Self::CategoryRepository {
        FaultyCategoryRepository {
            inner: self.inner.create_category_repository(),
            faults: self.faults.clone(),
        }
    }

    fn create_subcategory_repository(&self) -> Self::SubcategoryRepository {
        FaultySubcategoryRepository {
            inner: self.inner.create_subcategory_repository(),
            faults: self.faults.clone(),
        }
    }

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        FaultyExpenseRepository {
            inner: self.inner.create_expense_repository(),
            faults: self.faults.clone(),
        }
    }
}

#[derive(Clone)]
pub struct FaultyUserRepository {
    inner: UserRepository,
    faults: Arc<Faults>,
}

#[async_trait]
impl UserStorage for FaultyUserRepository {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.inner.get_user(user_id).await
    }

    async fn store_user(&self, user: &User) -> Result<()> {
        self.inner.store_user(user).await
    }

    async fn set_has_presets(&self, user_id: &str, has_presets: bool) -> Result<bool> {
        Faults::check(&self.faults.fail_flag_writes, "set_has_presets")?;
        self.inner.set_has_presets(user_id, has_presets).await
    }
}

#[derive(Clone)]
pub struct FaultyCategoryRepository {
    inner: CategoryRepository,
    faults: Arc<Faults>,
}

#[async_trait]
impl CategoryStorage for FaultyCategoryRepository {
    async fn upsert_categories_ignore_duplicates(&self, rows: &[NewCategory]) -> Result<Vec<Category>> {
        let failing = {
            let names = self.faults.failing_category_upserts.lock().unwrap();
            rows.iter().find(|r| names.contains(&r.name)).map(|r| r.name.clone())
        };
        if let Some(name) = failing {
            return Err(anyhow!("injected failure: upsert of category '{}'", name));
        }
        self.inner.upsert_categories_ignore_duplicates(rows).await
    }

    async fn find_category(&self, user_id: &str, name: &str) -> Result<Option<Category>> {
        Faults::check(&self.faults.fail_category_lookups, "find_category")?;
        self.inner.find_category(user_id, name).await
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        Faults::check(&self.faults.fail_category_reads, "list_categories")?;
        self.inner.list_categories(user_id).await
    }
}

#[derive(Clone)]
pub struct FaultySubcategoryRepository {
    inner: SubcategoryRepository,
    faults: Arc<Faults>,
}

#[async_trait]
impl SubcategoryStorage for FaultySubcategoryRepository {
    async fn upsert_subcategories_ignore_duplicates(&self, rows: &[NewSubcategory]) -> Result<Vec<Subcategory>> {
        Faults::check(&self.faults.fail_subcategory_upserts, "upsert_subcategories")?;
        self.inner.upsert_subcategories_ignore_duplicates(rows).await
    }

    async fn list_subcategories(&self, category_id: &str) -> Result<Vec<Subcategory>> {
        Faults::check(&self.faults.fail_subcategory_reads, "list_subcategories")?;
        self.inner.list_subcategories(category_id).await
    }

    async fn list_user_subcategories(&self, user_id: &str) -> Result<Vec<Subcategory>> {
        Faults::check(&self.faults.fail_subcategory_reads, "list_user_subcategories")?;
        self.inner.list_user_subcategories(user_id).await
    }
}

#[derive(Clone)]
pub struct FaultyExpenseRepository {
    inner: ExpenseRepository,
    faults: Arc<Faults>,
}

impl FaultyExpenseRepository {
    fn record_call(&self) {
        self.faults.expense_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ExpenseStorage for FaultyExpenseRepository {
    async fn store_expense(&self, expense: &Expense) -> Result<()> {
        self.record_call();
        Faults::check(&self.faults.fail_expense_writes, "store_expense")?;
        self.inner.store_expense(expense).await
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        self.record_call();
        Faults::check(&self.faults.fail_expense_reads, "get_expense")?;
        self.inner.get_expense(expense_id).await
    }

    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        self.record_call();
        Faults::check(&self.faults.fail_expense_reads, "list_expenses")?;
        let gate = self.faults.held_list.lock().unwrap().take();
        let rows = self.inner.list_expenses(user_id).await?;
        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
        Ok(rows)
    }

    async fn update_expense(&self, expense: &Expense) -> Result<bool> {
        self.record_call();
        Faults::check(&self.faults.fail_expense_writes, "update_expense")?;
        self.inner.update_expense(expense).await
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        self.record_call();
        Faults::check(&self.faults.fail_expense_writes, "delete_expense")?;
        self.inner.delete_expense(expense_id).await
    }
}
