use anyhow::{Context, Result};
use csv::{Reader, WriterBuilder};
use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::{
    category_repository::CategoryRepository, expense_repository::ExpenseRepository,
    subcategory_repository::SubcategoryRepository, user_repository::UserRepository,
};
use crate::storage::traits::Connection;

/// The tables of the record store, one CSV file each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Categories,
    Subcategories,
    Expenses,
}

impl Table {
    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Users => "users.csv",
            Table::Categories => "categories.csv",
            Table::Subcategories => "subcategories.csv",
            Table::Expenses => "expenses.csv",
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Table::Users => &["id", "currency", "has_presets"],
            Table::Categories => &["id", "user_id", "name"],
            Table::Subcategories => &["id", "category_id", "user_id", "name"],
            Table::Expenses => &[
                "id",
                "user_id",
                "title",
                "amount",
                "category",
                "subcategory",
                "description",
                "created_at",
                "recurring_type",
                "is_recurring",
                "mode_of_payment",
            ],
        }
    }
}

#[derive(Default)]
struct TableLocks {
    users: Mutex<()>,
    categories: Mutex<()>,
    subcategories: Mutex<()>,
    expenses: Mutex<()>,
}

/// CsvConnection owns the data directory and serialises access to each table file.
///
/// Every read-modify-write of a table must hold that table's lock, which is what
/// makes "insert unless the conflict key exists" atomic across concurrent callers.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    locks: Arc<TableLocks>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            locks: Arc::new(TableLocks::default()),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn table_path(&self, table: Table) -> PathBuf {
        self.base_directory.join(table.file_name())
    }

    /// Acquire the lock guarding one table file
    pub async fn lock(&self, table: Table) -> MutexGuard<'_, ()> {
        match table {
            Table::Users => self.locks.users.lock().await,
            Table::Categories => self.locks.categories.lock().await,
            Table::Subcategories => self.locks.subcategories.lock().await,
            Table::Expenses => self.locks.expenses.lock().await,
        }
    }

    /// Ensure a table file exists with its header row
    pub fn ensure_table_exists(&self, table: Table) -> Result<()> {
        let file_path = self.table_path(table);
        if !file_path.exists() {
            let header = format!("{}\n", table.header().join(","));
            fs::write(&file_path, header)?;
            debug!("Created table file {}", file_path.display());
        }
        Ok(())
    }

    /// Read every row of a table
    pub fn read_rows<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>> {
        self.ensure_table_exists(table)?;

        let file_path = self.table_path(table);
        let mut reader = Reader::from_path(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: T = result.with_context(|| format!("Malformed row in {}", table.file_name()))?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Replace the contents of a table
    pub fn write_rows<T: Serialize>(&self, table: Table, rows: &[T]) -> Result<()> {
        let file_path = self.table_path(table);

        // Create a temporary file for atomic write
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));

            writer.write_record(table.header())?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }

        // Atomic move from temp to final file
        fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl Connection for CsvConnection {
    type UserRepository = UserRepository;
    type CategoryRepository = CategoryRepository;
    type SubcategoryRepository = SubcategoryRepository;
    type ExpenseRepository = ExpenseRepository;

    fn create_user_repository(&self) -> Self::UserRepository {
        UserRepository::new(self.clone())
    }

    fn create_category_repository(&self) -> Self::CategoryRepository {
        CategoryRepository::new(self.clone())
    }

    fn create_subcategory_repository(&self) -> Self::SubcategoryRepository {
        SubcategoryRepository::new(self.clone())
    }

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        ExpenseRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Category;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let connection = CsvConnection::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(connection.base_directory(), nested.as_path());
    }

    #[test]
    fn test_empty_table_is_created_with_header() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        let rows: Vec<Category> = connection.read_rows(Table::Categories).unwrap();
        assert!(rows.is_empty());

        let contents = fs::read_to_string(connection.table_path(Table::Categories)).unwrap();
        assert_eq!(contents, "id,user_id,name\n");
    }

    #[test]
    fn test_write_then_read_rows() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        let rows = vec![
            Category {
                id: "category::1".to_string(),
                user_id: "user-1".to_string(),
                name: "Food, Drinks".to_string(),
            },
            Category {
                id: "category::2".to_string(),
                user_id: "user-1".to_string(),
                name: "Travel".to_string(),
            },
        ];
        connection.write_rows(Table::Categories, &rows).unwrap();

        let loaded: Vec<Category> = connection.read_rows(Table::Categories).unwrap();
        assert_eq!(loaded, rows);
        assert!(!connection.table_path(Table::Categories).with_extension("tmp").exists());
    }
}
