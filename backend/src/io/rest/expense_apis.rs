//! # REST API for Expense Management
//!
//! Direct ledger access for clients that do not drive the edit form.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use log::{error, info};
use shared::{DeleteExpenseResponse, ExpenseDraft, ExpenseListResponse};

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", put(update_expense).delete(delete_expense))
}

/// List expenses, newest first
pub async fn list_expenses(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/expenses");

    match state.dashboard.list_expenses().await {
        Ok(expenses) => (StatusCode::OK, Json(ExpenseListResponse { expenses })).into_response(),
        Err(e) => {
            error!("Failed to list expenses: {}", e);
            error_response(e)
        }
    }
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(draft): Json<ExpenseDraft>,
) -> impl IntoResponse {
    info!("POST /api/expenses - request: {:?}", draft);

    match state.dashboard.create_expense(draft).await {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(e) => {
            error!("Failed to create expense: {}", e);
            error_response(e)
        }
    }
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ExpenseDraft>,
) -> impl IntoResponse {
    info!("PUT /api/expenses/{} - request: {:?}", id, draft);

    match state.dashboard.update_expense(&id, draft).await {
        Ok(expense) => (StatusCode::OK, Json(expense)).into_response(),
        Err(e) => {
            error!("Failed to update expense {}: {}", id, e);
            error_response(e)
        }
    }
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", id);

    match state.dashboard.delete_expense(&id).await {
        Ok(()) => {
            let response = DeleteExpenseResponse {
                success_message: "Expense deleted successfully".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete expense {}: {}", id, e);
            error_response(e)
        }
    }
}
