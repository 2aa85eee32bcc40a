//! # REST API for the dashboard page

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// Mount the dashboard (seeding on first use) and return what it renders
pub async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/dashboard");

    let result = match state.dashboard.mount().await {
        Ok(_) => state.dashboard.snapshot().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => {
            error!("Failed to load dashboard: {}", e);
            error_response(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{read_json, send, setup_test_state};
    use shared::{DashboardResponse, ErrorResponse};

    #[tokio::test]
    async fn test_get_dashboard_seeds_new_user() {
        let (state, _env) = setup_test_state(true).await;
        let app = router().with_state(state);

        let response = send(&app, "GET", "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: DashboardResponse = read_json(response).await;
        assert_eq!(body.categories.len(), 11);
        assert_eq!(body.currency_code, "INR");
        assert_eq!(body.currency_sign, "₹");
        assert!(body.recent_expenses.is_empty());
        assert_eq!(body.totals.daily, 0.0);
    }

    #[tokio::test]
    async fn test_get_dashboard_without_user() {
        let (state, _env) = setup_test_state(false).await;
        let app = router().with_state(state);

        let response = send(&app, "GET", "/", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: ErrorResponse = read_json(response).await;
        assert_eq!(body.error, "User not found. Please log in again.");
    }
}
