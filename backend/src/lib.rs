//! # Expense Dashboard Backend
//!
//! Everything behind the expense dashboard except the UI:
//! - **Storage**: the record store traits and their CSV implementation
//! - **Domain**: seeding, aggregation, the ledger, the catalog and the edit form
//! - **IO**: the REST API the front end talks to
//!
//! ```text
//! UI (browser)
//!     ↓
//! IO Layer (REST API)
//!     ↓
//! Domain Layer (Dashboard and its services)
//!     ↓
//! Storage Layer (CSV tables)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod session;
pub mod storage;

use anyhow::Result;
use axum::{http::Method, Router};
use log::info;
use shared::User;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::domain::Dashboard;
use crate::io::rest::{category_apis, dashboard_apis, expense_apis, form_apis};
use crate::session::StaticSessionProvider;
use crate::storage::{Connection, CsvConnection, UserStorage};

/// State shared by every REST handler
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard<CsvConnection, StaticSessionProvider>>,
}

/// Open the record store and build the dashboard for the configured user
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up record store in {:?}", config.data_directory);
    let connection = Arc::new(CsvConnection::new(&config.data_directory)?);

    if let Some(user_id) = &config.user_id {
        register_user_if_absent(connection.as_ref(), user_id, config.currency.clone()).await?;
    }

    info!("Setting up domain model");
    let session = Arc::new(StaticSessionProvider::new(config.user_id.clone()));
    let dashboard = Dashboard::new(connection, session);

    Ok(AppState {
        dashboard: Arc::new(dashboard),
    })
}

/// Stand-in for sign-up: make sure the configured user has a row
async fn register_user_if_absent<C: Connection>(connection: &C, user_id: &str, currency: Option<String>) -> Result<()> {
    let users = connection.create_user_repository();
    if users.get_user(user_id).await?.is_none() {
        users
            .store_user(&User {
                id: user_id.to_string(),
                currency,
                has_presets: false,
            })
            .await?;
    }
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/dashboard", dashboard_apis::router())
        .nest("/expenses", expense_apis::router())
        .nest("/categories", category_apis::router())
        .nest("/form", form_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
