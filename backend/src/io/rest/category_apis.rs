//! # REST API for the category catalog

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};
use shared::{CategoryListResponse, SubcategoryListResponse};

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/:id/subcategories", get(list_subcategories))
}

pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");

    match state.dashboard.categories().await {
        Ok(categories) => (StatusCode::OK, Json(CategoryListResponse { categories })).into_response(),
        Err(e) => {
            error!("Failed to list categories: {}", e);
            error_response(e)
        }
    }
}

pub async fn list_subcategories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/categories/{}/subcategories", id);

    match state.dashboard.subcategories(&id).await {
        Ok(subcategories) => (StatusCode::OK, Json(SubcategoryListResponse { subcategories })).into_response(),
        Err(e) => {
            error!("Failed to list subcategories of {}: {}", id, e);
            error_response(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{read_json, send, setup_test_state};

    #[tokio::test]
    async fn test_categories_and_subcategories() {
        let (state, _env) = setup_test_state(true).await;
        state.dashboard.mount().await.unwrap();
        let app = router().with_state(state);

        let response = send(&app, "GET", "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: CategoryListResponse = read_json(response).await;
        let travel = body.categories.iter().find(|c| c.name == "Travel").unwrap();

        let response = send(&app, "GET", &format!("/{}/subcategories", travel.id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: SubcategoryListResponse = read_json(response).await;
        let mut names: Vec<String> = body.subcategories.into_iter().map(|s| s.name).collect();
        names.sort();
        assert_eq!(names, vec!["Flights", "Hotels", "Sightseeing", "Trains"]);
    }

    #[tokio::test]
    async fn test_unknown_category_has_no_subcategories() {
        let (state, _env) = setup_test_state(true).await;
        let app = router().with_state(state);

        let response = send(&app, "GET", "/category::nope/subcategories", None).await;
        let body: SubcategoryListResponse = read_json(response).await;
        assert!(body.subcategories.is_empty());
    }
}
