//! # REST API for the add/edit expense form
//!
//! The form lives server side; each call returns the resulting [`shared::FormView`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::{error, info};
use shared::{FormPatch, SelectCategoryRequest};

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_form).patch(patch_form))
        .route("/create", post(open_create_form))
        .route("/edit/:id", post(open_edit_form))
        .route("/category", post(select_category))
        .route("/submit", post(submit_form))
        .route("/close", post(close_form))
}

pub async fn get_form(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.dashboard.form().await)).into_response()
}

pub async fn open_create_form(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/form/create");
    (StatusCode::OK, Json(state.dashboard.open_create_form().await)).into_response()
}

pub async fn open_edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/form/edit/{}", id);

    match state.dashboard.open_edit_form(&id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => {
            error!("Failed to open expense {} for edit: {}", id, e);
            error_response(e)
        }
    }
}

pub async fn select_category(
    State(state): State<AppState>,
    Json(request): Json<SelectCategoryRequest>,
) -> impl IntoResponse {
    info!("POST /api/form/category - request: {:?}", request);

    match state.dashboard.select_form_category(&request.category).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => {
            error!("Failed to select category: {}", e);
            error_response(e)
        }
    }
}

pub async fn patch_form(
    State(state): State<AppState>,
    Json(patch): Json<FormPatch>,
) -> impl IntoResponse {
    info!("PATCH /api/form - request: {:?}", patch);

    match state.dashboard.patch_form(patch).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => {
            error!("Failed to update form: {}", e);
            error_response(e)
        }
    }
}

pub async fn submit_form(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/form/submit");

    match state.dashboard.submit_form().await {
        Ok(expense) => (StatusCode::OK, Json(expense)).into_response(),
        Err(e) => {
            error!("Failed to save expense from form: {}", e);
            error_response(e)
        }
    }
}

pub async fn close_form(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/form/close");
    (StatusCode::OK, Json(state.dashboard.close_form().await)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{read_json, send, setup_test_state};
    use serde_json::json;
    use shared::{ErrorResponse, Expense, FormMode, FormView};

    #[tokio::test]
    async fn test_create_through_the_form() {
        let (state, _env) = setup_test_state(true).await;
        state.dashboard.mount().await.unwrap();
        let app = router().with_state(state.clone());

        let view: FormView = read_json(send(&app, "POST", "/create", None).await).await;
        assert_eq!(view.mode, FormMode::CreateOpen);

        let view: FormView = read_json(send(&app, "POST", "/category", Some(json!({"category": "Housing"}))).await).await;
        assert!(view.subcategory_choices.contains(&"Rent".to_string()));

        let patch = json!({"title": "October rent", "amount": "25000", "subcategory": "Rent", "recurring_type": "monthly"});
        let response = send(&app, "PATCH", "/", Some(patch)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "POST", "/submit", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let expense: Expense = read_json(response).await;
        assert_eq!(expense.category, "Housing");
        assert!(expense.is_recurring);

        let view: FormView = read_json(send(&app, "GET", "/", None).await).await;
        assert_eq!(view.mode, FormMode::Closed);
        assert_eq!(state.dashboard.ledger().expenses().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_the_form() {
        let (state, _env) = setup_test_state(true).await;
        let app = router().with_state(state);

        send(&app, "POST", "/create", None).await;
        send(&app, "PATCH", "/", Some(json!({"amount": "12"}))).await;

        let response = send(&app, "POST", "/submit", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(response).await;
        assert_eq!(body.error, "Title cannot be empty");

        let view: FormView = read_json(send(&app, "GET", "/", None).await).await;
        assert_eq!(view.mode, FormMode::CreateOpen);
        assert_eq!(view.amount, "12");
        assert_eq!(view.error.as_deref(), Some("Title cannot be empty"));
    }

    #[tokio::test]
    async fn test_closed_form_rejects_changes() {
        let (state, _env) = setup_test_state(true).await;
        let app = router().with_state(state);

        let response = send(&app, "PATCH", "/", Some(json!({"title": "x"}))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(&app, "POST", "/edit/expense::missing", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let view: FormView = read_json(send(&app, "POST", "/close", None).await).await;
        assert_eq!(view.mode, FormMode::Closed);
    }
}
