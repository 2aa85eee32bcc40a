use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use shared::{Expense, PaymentMode, RecurringType};

use super::connection::{CsvConnection, Table};
use crate::storage::traits::ExpenseStorage;

/// On-disk shape of an expense. Every column is kept as text so that a single
/// corrupted cell does not make the whole table unreadable.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExpenseRow {
    id: String,
    user_id: String,
    title: String,
    amount: String,
    category: String,
    subcategory: String,
    description: Option<String>,
    created_at: String,
    recurring_type: String,
    is_recurring: String,
    mode_of_payment: String,
}

impl From<&Expense> for ExpenseRow {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.clone(),
            user_id: expense.user_id.clone(),
            title: expense.title.clone(),
            amount: expense.amount.to_string(),
            category: expense.category.clone(),
            subcategory: expense.subcategory.clone(),
            description: expense.description.clone(),
            created_at: expense.created_at.clone(),
            recurring_type: expense.recurring_type.as_str().to_string(),
            is_recurring: expense.is_recurring.to_string(),
            mode_of_payment: expense
                .mode_of_payment
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        let amount = row.amount.trim().parse::<f64>().unwrap_or_else(|_| {
            warn!("Expense {} has malformed amount '{}'", row.id, row.amount);
            f64::NAN
        });

        let recurring_type = RecurringType::parse(&row.recurring_type).unwrap_or_else(|| {
            warn!("Expense {} has unknown recurring type '{}'", row.id, row.recurring_type);
            RecurringType::None
        });

        let mode_of_payment = if row.mode_of_payment.trim().is_empty() {
            None
        } else {
            let mode = PaymentMode::parse(&row.mode_of_payment);
            if mode.is_none() {
                warn!("Expense {} has unknown mode of payment '{}'", row.id, row.mode_of_payment);
            }
            mode
        };

        Expense {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            amount,
            category: row.category,
            subcategory: row.subcategory,
            description: row.description,
            created_at: row.created_at,
            recurring_type,
            is_recurring: row.is_recurring.trim() == "true",
            mode_of_payment,
        }
    }
}

/// CSV-based expense repository
#[derive(Clone)]
pub struct ExpenseRepository {
    connection: CsvConnection,
}

impl ExpenseRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_expenses(&self) -> Result<Vec<Expense>> {
        let rows: Vec<ExpenseRow> = self.connection.read_rows(Table::Expenses)?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    fn write_expenses(&self, expenses: &[Expense]) -> Result<()> {
        let rows: Vec<ExpenseRow> = expenses.iter().map(ExpenseRow::from).collect();
        self.connection.write_rows(Table::Expenses, &rows)
    }
}

#[async_trait]
impl ExpenseStorage for ExpenseRepository {
    async fn store_expense(&self, expense: &Expense) -> Result<()> {
        let _guard = self.connection.lock(Table::Expenses).await;
        let mut expenses = self.read_expenses()?;
        if expenses.iter().any(|e| e.id == expense.id) {
            anyhow::bail!("Expense {} already exists", expense.id);
        }
        expenses.push(expense.clone());
        self.write_expenses(&expenses)
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        let _guard = self.connection.lock(Table::Expenses).await;
        Ok(self.read_expenses()?.into_iter().find(|e| e.id == expense_id))
    }

    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        let _guard = self.connection.lock(Table::Expenses).await;
        let mut expenses: Vec<Expense> = self
            .read_expenses()?
            .into_iter()
            .filter(|e| e.user_id == user_id)
            .collect();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(expenses)
    }

    async fn update_expense(&self, expense: &Expense) -> Result<bool> {
        let _guard = self.connection.lock(Table::Expenses).await;
        let mut expenses = self.read_expenses()?;
        let Some(existing) = expenses.iter_mut().find(|e| e.id == expense.id) else {
            return Ok(false);
        };
        *existing = expense.clone();
        self.write_expenses(&expenses)?;
        Ok(true)
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        let _guard = self.connection.lock(Table::Expenses).await;
        let mut expenses = self.read_expenses()?;
        let Some(position) = expenses.iter().position(|e| e.id == expense_id) else {
            return Ok(None);
        };
        let removed = expenses.remove(position);
        self.write_expenses(&expenses)?;
        Ok(Some(removed))
    }
}
