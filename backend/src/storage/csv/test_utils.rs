/// Test utilities for the CSV store
///
/// `TestEnvironment` owns a temporary data directory that is removed when the
/// environment is dropped, even if the test panics.
use anyhow::Result;
use shared::{Expense, PaymentMode, RecurringType, User};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::connection::CsvConnection;
use super::user_repository::UserRepository;
use crate::storage::traits::UserStorage;

pub struct TestEnvironment {
    /// Kept alive so the directory is only removed on drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("expense_dashboard_")?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// Register a user with the default currency and no presets
    pub async fn create_test_user(&self, user_id: &str) -> Result<User> {
        let user = User {
            id: user_id.to_string(),
            currency: None,
            has_presets: false,
        };
        UserRepository::new(self.connection.clone()).store_user(&user).await?;
        Ok(user)
    }
}

pub fn sample_expense(id: &str, user_id: &str, amount: f64, created_at: &str) -> Expense {
    Expense {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: format!("Expense {}", id),
        amount,
        category: "Food & Dining".to_string(),
        subcategory: "Groceries".to_string(),
        description: None,
        created_at: created_at.to_string(),
        recurring_type: RecurringType::None,
        is_recurring: false,
        mode_of_payment: Some(PaymentMode::Cash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_environment_cleanup() -> Result<()> {
        let base_path;

        {
            let env = TestEnvironment::new().await?;
            base_path = env.base_directory().to_path_buf();
            assert!(base_path.exists());
            std::fs::write(base_path.join("scratch.txt"), "test data")?;
        }

        assert!(!base_path.exists());
        Ok(())
    }
}
