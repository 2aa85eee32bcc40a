use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use shared::User;

use super::connection::{CsvConnection, Table};
use crate::storage::traits::UserStorage;

/// On-disk shape of a user. Rows are written outside the dashboard too, so the
/// flag is kept as text and a blank or unknown value reads as `false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRow {
    id: String,
    currency: Option<String>,
    #[serde(default)]
    has_presets: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            currency: user.currency.clone(),
            has_presets: user.has_presets.to_string(),
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let has_presets = match row.has_presets.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "" | "false" => false,
            other => {
                warn!("User {} has malformed has_presets '{}'", row.id, other);
                false
            }
        };

        User {
            id: row.id,
            currency: row.currency.filter(|c| !c.trim().is_empty()),
            has_presets,
        }
    }
}

/// CSV-based user repository
#[derive(Clone)]
pub struct UserRepository {
    connection: CsvConnection,
}

impl UserRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let _guard = self.connection.lock(Table::Users).await;
        let rows: Vec<UserRow> = self.connection.read_rows(Table::Users)?;
        Ok(rows.into_iter().find(|r| r.id == user_id).map(User::from))
    }

    async fn store_user(&self, user: &User) -> Result<()> {
        let _guard = self.connection.lock(Table::Users).await;
        let mut rows: Vec<UserRow> = self.connection.read_rows(Table::Users)?;

        match rows.iter_mut().find(|r| r.id == user.id) {
            Some(existing) => *existing = UserRow::from(user),
            None => {
                info!("Registering user {}", user.id);
                rows.push(UserRow::from(user));
            }
        }

        self.connection.write_rows(Table::Users, &rows)
    }

    async fn set_has_presets(&self, user_id: &str, has_presets: bool) -> Result<bool> {
        let _guard = self.connection.lock(Table::Users).await;
        let mut rows: Vec<UserRow> = self.connection.read_rows(Table::Users)?;

        let Some(row) = rows.iter_mut().find(|r| r.id == user_id) else {
            debug!("set_has_presets: no user {}", user_id);
            return Ok(false);
        };
        row.has_presets = has_presets.to_string();

        self.connection.write_rows(Table::Users, &rows)?;
        Ok(true)
    }
}
