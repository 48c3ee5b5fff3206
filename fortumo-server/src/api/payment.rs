//! Payment notification handler.
//!
//! The aggregator calls this endpoint with the payment details in the query
//! string. The request is accepted only if it comes from an allowed address
//! and carries a valid signature.

use axum::{
    Json, Router,
    extract::{ConnectInfo, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use fortumo_core::validator::{ValidationError, validate_request};
use fortumo_sdk::objects::{PaymentParams, ValidatedPayment};
use std::net::SocketAddr;

use crate::api::status_for;
use crate::state::AppState;

/// Build the payment router.
pub fn router() -> Router<AppState> {
    Router::new().route("/payments/notify", get(notify))
}

/// `GET /payments/notify`: validate a payment notification.
///
/// Responds with the validated parameters (without `sig`) as JSON.
async fn notify(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(params): Query<PaymentParams>,
) -> Result<Json<ValidatedPayment>, PaymentApiError> {
    // IPv4 peers on a dual-stack listener show up as IPv4-mapped IPv6.
    let remote_ip = peer.ip().to_canonical().to_string();

    let service = state.config.service().await;
    let payment = validate_request(&service, params, &remote_ip)?;
    drop(service);

    tracing::info!(
        sender = payment.sender(),
        price = payment.price(),
        currency = payment.currency(),
        status = payment.status(),
        test = payment.is_test(),
        "Payment received"
    );
    Ok(Json(payment))
}

/// Rejection of a payment notification.
#[derive(Debug)]
struct PaymentApiError(ValidationError);

impl From<ValidationError> for PaymentApiError {
    fn from(err: ValidationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        (status, self.0.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::runtime::{CatalogSettings, ServiceConfig, SharedConfig};
    use crate::server::build_router;
    use crate::state::AppState;
    use axum::Router;
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, StatusCode};
    use fortumo_core::catalog::CatalogStore;
    use http_body_util::BodyExt;
    use std::collections::BTreeMap;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    const SERVICE_ID: &str = "c4b756ca6da4a88fa5c61181aa484b08";
    const SECRET: &str = "b1ec1bfba48bff06485e1291e5748471";

    const NOTIFICATION: &str = "billing_type=MO&country=EE&currency=EUR&keyword=FOR%20TEST\
        &message=tere+tere&message_id=5a4c47e43def7955a5d375fb19446fd0&operator=Elisa\
        &price=0.32&sender=37251940072&service_id=c4b756ca6da4a88fa5c61181aa484b08\
        &shortcode=1311&sig=9029c81198aacedc47dfc2b2289e5b87&status=pending&test=true";

    fn test_app(secret: Option<&str>, peer: &str) -> Router {
        let service = ServiceConfig::new(
            Some(SERVICE_ID.to_owned()),
            secret.map(str::to_owned),
            vec![],
        );
        let state = AppState::new(
            SharedConfig::new(service, CatalogSettings::default()),
            CatalogStore::default(),
        );
        let peer: SocketAddr = peer.parse().unwrap();
        build_router(state).layer(MockConnectInfo(peer))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn handler_accepts_signed_notification() {
        let app = test_app(Some(SECRET), "81.20.151.38:40000");
        let (status, body) = get(app, &format!("/payments/notify?{NOTIFICATION}")).await;
        assert_eq!(status, StatusCode::OK);

        let payment: BTreeMap<String, String> = serde_json::from_slice(&body).unwrap();
        assert!(!payment.contains_key("sig"));
        assert_eq!(payment["keyword"], "FOR TEST");
        assert_eq!(payment["message"], "tere tere");
        assert_eq!(payment.len(), 13);
    }

    #[tokio::test]
    async fn handler_accepts_ipv4_mapped_peer() {
        let app = test_app(Some(SECRET), "[::ffff:81.20.151.38]:40000");
        let (status, _) = get(app, &format!("/payments/notify?{NOTIFICATION}")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn handler_rejects_unknown_peer() {
        let app = test_app(Some(SECRET), "127.0.0.1:40000");
        let (status, body) = get(app, &format!("/payments/notify?{NOTIFICATION}")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, b"unknown IP 127.0.0.1");
    }

    #[tokio::test]
    async fn handler_rejects_tampered_notification() {
        let app = test_app(Some(SECRET), "81.20.151.38:40000");
        let tampered = NOTIFICATION.replace("price=0.32", "price=0.01");
        let (status, body) = get(app, &format!("/payments/notify?{tampered}")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, b"signature mismatch");
    }

    #[tokio::test]
    async fn handler_rejects_empty_request() {
        let app = test_app(Some(SECRET), "81.20.151.38:40000");
        let (status, _) = get(app, "/payments/notify").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn handler_reports_missing_secret() {
        let app = test_app(None, "81.20.151.38:40000");
        let (status, body) = get(app, &format!("/payments/notify?{NOTIFICATION}")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"secret not set");
    }
}
