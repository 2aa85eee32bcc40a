//! Taxonomy seeding for the expense dashboard.
//!
//! Converges a user's categories and subcategories toward the preset catalog.
//! Every step is an insert-unless-present keyed on the table's natural key, so
//! running the seeder again (or concurrently) leaves the store unchanged.
//!
//! The algorithm, for each preset entry in order:
//! 1. Upsert the category on `(user_id, name)`, ignoring duplicates
//! 2. If nothing came back the row already existed, so look it up by `(user_id, name)`
//! 3. Upsert all of the entry's subcategories in one batch on `(category_id, name)`
//! 4. Once every entry has been visited, set the user's `has_presets` flag
//!
//! Failures are logged and recorded in the [`SeedReport`]; they never stop the pass.

use log::{error, info, warn};
use shared::{Category, NewCategory, NewSubcategory};
use std::sync::Arc;

use crate::domain::presets::{PresetEntry, PRESET_CATEGORIES};
use crate::storage::{CategoryStorage, Connection, SubcategoryStorage, UserStorage};

/// One preset entry (or the final flag write) that could not be seeded
#[derive(Debug, thiserror::Error)]
pub enum SeedPartialFailure {
    #[error("Error inserting category '{category}': {source:#}")]
    CategoryUpsert {
        category: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Could not fetch existing category '{category}' after upsert: {source:#}")]
    CategoryLookup {
        category: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Category '{category}' was neither inserted nor found")]
    CategoryMissing { category: String },
    #[error("Error inserting subcategories of '{category}': {source:#}")]
    SubcategoryBatch {
        category: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Error marking presets as seeded: {source:#}")]
    FlagWrite {
        #[source]
        source: anyhow::Error,
    },
}

/// What a seeding pass did
#[derive(Debug, Default)]
pub struct SeedReport {
    pub categories_created: usize,
    pub categories_existing: usize,
    pub subcategories_created: usize,
    pub flag_written: bool,
    pub failures: Vec<SeedPartialFailure>,
}

impl SeedReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone)]
pub struct TaxonomySeeder<C: Connection> {
    user_repository: C::UserRepository,
    category_repository: C::CategoryRepository,
    subcategory_repository: C::SubcategoryRepository,
    presets: &'static [PresetEntry],
}

impl<C: Connection> TaxonomySeeder<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self::with_presets(connection, PRESET_CATEGORIES)
    }

    pub fn with_presets(connection: Arc<C>, presets: &'static [PresetEntry]) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
            category_repository: connection.create_category_repository(),
            subcategory_repository: connection.create_subcategory_repository(),
            presets,
        }
    }

    /// Seed the preset catalog for a user. Always runs to completion.
    pub async fn seed_if_needed(&self, user_id: &str) -> SeedReport {
        info!("Seeding {} preset categories for user {}", self.presets.len(), user_id);
        let mut report = SeedReport::default();

        for preset in self.presets {
            let Some(category) = self.ensure_category(user_id, preset, &mut report).await else {
                continue;
            };

            if preset.subcategories.is_empty() {
                continue;
            }

            let batch: Vec<NewSubcategory> = preset
                .subcategories
                .iter()
                .map(|name| NewSubcategory {
                    name: name.to_string(),
                    category_id: category.id.clone(),
                    user_id: user_id.to_string(),
                })
                .collect();

            match self
                .subcategory_repository
                .upsert_subcategories_ignore_duplicates(&batch)
                .await
            {
                Ok(inserted) => report.subcategories_created += inserted.len(),
                Err(source) => {
                    let failure = SeedPartialFailure::SubcategoryBatch {
                        category: preset.name.to_string(),
                        source,
                    };
                    error!("{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        match self.user_repository.set_has_presets(user_id, true).await {
            Ok(true) => report.flag_written = true,
            Ok(false) => warn!("No user row for {}; has_presets not recorded", user_id),
            Err(source) => {
                let failure = SeedPartialFailure::FlagWrite { source };
                error!("{}", failure);
                report.failures.push(failure);
            }
        }

        info!(
            "Seeding finished for {}: {} categories created, {} already present, {} subcategories created, {} failures",
            user_id,
            report.categories_created,
            report.categories_existing,
            report.subcategories_created,
            report.failures.len()
        );
        report
    }

    /// Insert the preset's category or fetch the row that already exists
    async fn ensure_category(
        &self,
        user_id: &str,
        preset: &PresetEntry,
        report: &mut SeedReport,
    ) -> Option<Category> {
        let row = NewCategory {
            user_id: user_id.to_string(),
            name: preset.name.to_string(),
        };

        let inserted = match self
            .category_repository
            .upsert_categories_ignore_duplicates(std::slice::from_ref(&row))
            .await
        {
            Ok(inserted) => inserted,
            Err(source) => {
                let failure = SeedPartialFailure::CategoryUpsert {
                    category: preset.name.to_string(),
                    source,
                };
                error!("{}", failure);
                report.failures.push(failure);
                return None;
            }
        };

        if let Some(category) = inserted.into_iter().next() {
            report.categories_created += 1;
            return Some(category);
        }

        match self.category_repository.find_category(user_id, preset.name).await {
            Ok(Some(category)) => {
                report.categories_existing += 1;
                Some(category)
            }
            Ok(None) => {
                let failure = SeedPartialFailure::CategoryMissing {
                    category: preset.name.to_string(),
                };
                error!("{}", failure);
                report.failures.push(failure);
                None
            }
            Err(source) => {
                let failure = SeedPartialFailure::CategoryLookup {
                    category: preset.name.to_string(),
                    source,
                };
                error!("{}", failure);
                report.failures.push(failure);
                None
            }
        }
    }
}
