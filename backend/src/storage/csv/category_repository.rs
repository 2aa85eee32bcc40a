use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use shared::{Category, NewCategory};
use uuid::Uuid;

use super::connection::{CsvConnection, Table};
use crate::storage::traits::CategoryStorage;

/// CSV-based category repository
#[derive(Clone)]
pub struct CategoryRepository {
    connection: CsvConnection,
}

impl CategoryRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub fn generate_id() -> String {
        format!("category::{}", Uuid::new_v4())
    }
}

#[async_trait]
impl CategoryStorage for CategoryRepository {
    async fn upsert_categories_ignore_duplicates(&self, rows: &[NewCategory]) -> Result<Vec<Category>> {
        let _guard = self.connection.lock(Table::Categories).await;
        let mut categories: Vec<Category> = self.connection.read_rows(Table::Categories)?;

        let mut inserted = Vec::new();
        for row in rows {
            let exists = categories
                .iter()
                .any(|c| c.user_id == row.user_id && c.name == row.name);
            if exists {
                debug!("Category '{}' already exists for {}", row.name, row.user_id);
                continue;
            }

            let category = Category {
                id: Self::generate_id(),
                user_id: row.user_id.clone(),
                name: row.name.clone(),
            };
            categories.push(category.clone());
            inserted.push(category);
        }

        if !inserted.is_empty() {
            self.connection.write_rows(Table::Categories, &categories)?;
        }
        Ok(inserted)
    }

    async fn find_category(&self, user_id: &str, name: &str) -> Result<Option<Category>> {
        let _guard = self.connection.lock(Table::Categories).await;
        let categories: Vec<Category> = self.connection.read_rows(Table::Categories)?;
        Ok(categories
            .into_iter()
            .find(|c| c.user_id == user_id && c.name == name))
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        let _guard = self.connection.lock(Table::Categories).await;
        let mut categories: Vec<Category> = self
            .connection
            .read_rows::<Category>(Table::Categories)?
            .into_iter()
            .filter(|c| c.user_id == user_id)
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}
