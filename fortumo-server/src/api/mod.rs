//! HTTP API handlers.
//!
//! # Endpoints
//!
//! - `GET /payments/notify`    – payment notification from the aggregator
//! - `GET /countries`          – available countries sorted by name
//! - `GET /countries/default`  – pricing for the first country of the catalog
//! - `GET /countries/{code}`   – pricing for one country

pub mod countries;
pub mod payment;

use axum::{Router, http::StatusCode};
use fortumo_core::error::ErrorKind;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(payment::router())
        .merge(countries::router())
}

/// HTTP status for a failure category.
pub(crate) fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
        ErrorKind::Trust => StatusCode::FORBIDDEN,
        ErrorKind::Semantic => StatusCode::BAD_GATEWAY,
    }
}
