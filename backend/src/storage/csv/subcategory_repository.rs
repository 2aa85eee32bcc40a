use anyhow::Result;
use async_trait::async_trait;
use shared::{NewSubcategory, Subcategory};
use uuid::Uuid;

use super::connection::{CsvConnection, Table};
use crate::storage::traits::SubcategoryStorage;

/// CSV-based subcategory repository
#[derive(Clone)]
pub struct SubcategoryRepository {
    connection: CsvConnection,
}

impl SubcategoryRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub fn generate_id() -> String {
        format!("subcategory::{}", Uuid::new_v4())
    }

    async fn read_filtered<F>(&self, keep: F) -> Result<Vec<Subcategory>>
    where
        F: Fn(&Subcategory) -> bool + Send,
    {
        let _guard = self.connection.lock(Table::Subcategories).await;
        let subcategories: Vec<Subcategory> = self.connection.read_rows(Table::Subcategories)?;
        Ok(subcategories.into_iter().filter(|s| keep(s)).collect())
    }
}

#[async_trait]
impl SubcategoryStorage for SubcategoryRepository {
    async fn upsert_subcategories_ignore_duplicates(&self, rows: &[NewSubcategory]) -> Result<Vec<Subcategory>> {
        let _guard = self.connection.lock(Table::Subcategories).await;
        let mut subcategories: Vec<Subcategory> = self.connection.read_rows(Table::Subcategories)?;

        let mut inserted = Vec::new();
        for row in rows {
            let exists = subcategories
                .iter()
                .any(|s| s.category_id == row.category_id && s.name == row.name);
            if exists {
                continue;
            }

            let subcategory = Subcategory {
                id: Self::generate_id(),
                category_id: row.category_id.clone(),
                user_id: row.user_id.clone(),
                name: row.name.clone(),
            };
            subcategories.push(subcategory.clone());
            inserted.push(subcategory);
        }

        if !inserted.is_empty() {
            self.connection.write_rows(Table::Subcategories, &subcategories)?;
        }
        Ok(inserted)
    }

    async fn list_subcategories(&self, category_id: &str) -> Result<Vec<Subcategory>> {
        self.read_filtered(|s| s.category_id == category_id).await
    }

    async fn list_user_subcategories(&self, user_id: &str) -> Result<Vec<Subcategory>> {
        self.read_filtered(|s| s.user_id == user_id).await
    }
}
