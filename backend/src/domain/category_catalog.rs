//! Read side of the category taxonomy.
//!
//! Caches the user's categories and fetches subcategories on demand. Read
//! errors are logged and degrade to the last list that loaded (or nothing).
use log::{info, warn};
use shared::{Category, Subcategory};
use std::sync::{Arc, PoisonError, RwLock};

use crate::storage::{CategoryStorage, Connection, SubcategoryStorage};

/// What caused the form's category to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTrigger {
    /// The user picked a category
    UserSelection,
    /// The form was populated from an existing expense
    LoadedForEdit,
}

/// Subcategory to keep after a category change.
///
/// A user's pick clears the subcategory. Loading an expense for edit keeps
/// the stored name, even if it is no longer offered for that category.
pub fn resolve_subcategory(trigger: SelectionTrigger, current: &str) -> String {
    match trigger {
        SelectionTrigger::UserSelection => String::new(),
        SelectionTrigger::LoadedForEdit => current.to_string(),
    }
}

#[derive(Clone)]
pub struct CategoryCatalog<C: Connection> {
    category_repository: C::CategoryRepository,
    subcategory_repository: C::SubcategoryRepository,
    categories: Arc<RwLock<Vec<Category>>>,
}

impl<C: Connection> CategoryCatalog<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            category_repository: connection.create_category_repository(),
            subcategory_repository: connection.create_subcategory_repository(),
            categories: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Load the user's categories, name ascending
    pub async fn list_categories(&self, user_id: &str) -> Vec<Category> {
        match self.category_repository.list_categories(user_id).await {
            Ok(categories) => {
                info!("Loaded {} categories for {}", categories.len(), user_id);
                *self.categories.write().unwrap_or_else(PoisonError::into_inner) = categories.clone();
                categories
            }
            Err(e) => {
                warn!("Failed to load categories for {}: {:#}", user_id, e);
                self.categories()
            }
        }
    }

    pub async fn list_subcategories(&self, category_id: &str) -> Vec<Subcategory> {
        self.subcategory_repository
            .list_subcategories(category_id)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to load subcategories of {}: {:#}", category_id, e);
                Vec::new()
            })
    }

    /// Cached categories from the last successful load
    pub fn categories(&self) -> Vec<Category> {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn find_category(&self, name: &str) -> Option<Category> {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }

    /// Subcategory names offered under a category, by category name
    pub async fn subcategories_for(&self, category_name: &str) -> Vec<String> {
        let Some(category) = self.find_category(category_name) else {
            return Vec::new();
        };
        self.list_subcategories(&category.id)
            .await
            .into_iter()
            .map(|s| s.name)
            .collect()
    }
}
