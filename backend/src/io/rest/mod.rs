//! # REST API Interface Layer
//!
//! JSON endpoints over the [`Dashboard`](crate::domain::Dashboard). Handlers
//! only translate between HTTP and the domain layer; every error body is an
//! [`ErrorResponse`].
//!
//! | Domain error | Status |
//! |---|---|
//! | validation | 400 |
//! | no signed-in user | 401 |
//! | unknown expense | 404 |
//! | form not open | 409 |
//! | store or session failure | 500 |

pub mod category_apis;
pub mod dashboard_apis;
pub mod expense_apis;
pub mod form_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;

use crate::domain::{DashboardError, FormError, LedgerError};

fn ledger_status(error: &LedgerError) -> StatusCode {
    match error {
        LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn status_for(error: &DashboardError) -> StatusCode {
    match error {
        DashboardError::Unauthenticated => StatusCode::UNAUTHORIZED,
        DashboardError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DashboardError::Ledger(e) => ledger_status(e),
        DashboardError::Form(FormError::Ledger(e)) => ledger_status(e),
        DashboardError::Form(FormError::NotOpen) => StatusCode::CONFLICT,
        DashboardError::ExpenseNotFound(_) => StatusCode::NOT_FOUND,
    }
}

/// Convert a domain error into a JSON error response
pub fn error_response(error: DashboardError) -> Response {
    let status = status_for(&error);
    (status, Json(ErrorResponse { error: error.to_string() })).into_response()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpenseValidationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&DashboardError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(&DashboardError::Ledger(LedgerError::Validation(ExpenseValidationError::EmptyTitle))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&DashboardError::Form(FormError::Ledger(LedgerError::Store(anyhow::anyhow!("disk full"))))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&DashboardError::Ledger(LedgerError::NotFound("expense::1".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_for(&DashboardError::Form(FormError::NotOpen)), StatusCode::CONFLICT);
    }
}
