//! Catalog query handlers.
//!
//! All handlers read a snapshot of the current catalog, so a reload running
//! at the same time never yields a partially built answer.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use fortumo_sdk::objects::{CountryInformation, CountrySummary};

use crate::state::AppState;

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/countries/default", get(default_country))
        .route("/countries/{code}", get(country_info))
}

/// `GET /countries`: every available country, sorted by name.
async fn list_countries(State(state): State<AppState>) -> Json<Vec<CountrySummary>> {
    let catalog = state.catalog.snapshot().await;
    Json(catalog.countries())
}

/// `GET /countries/default`: pricing for the first country of the
/// service description.
async fn default_country(
    State(state): State<AppState>,
) -> Result<Json<CountryInformation>, CountryApiError> {
    let catalog = state.catalog.snapshot().await;
    catalog
        .country_info(None)
        .map(Json)
        .ok_or(CountryApiError::EmptyCatalog)
}

/// `GET /countries/{code}`: pricing for one country. The code is
/// case-insensitive.
async fn country_info(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CountryInformation>, CountryApiError> {
    let catalog = state.catalog.snapshot().await;
    catalog
        .country_info(Some(&code))
        .map(Json)
        .ok_or(CountryApiError::NotFound(code))
}

/// Errors that can occur in catalog handlers.
#[derive(Debug)]
enum CountryApiError {
    /// No country has been loaded.
    EmptyCatalog,
    /// The requested country is not in the catalog.
    NotFound(String),
}

impl IntoResponse for CountryApiError {
    fn into_response(self) -> Response {
        match self {
            CountryApiError::EmptyCatalog => {
                (StatusCode::NOT_FOUND, "no countries available").into_response()
            }
            CountryApiError::NotFound(code) => {
                (StatusCode::NOT_FOUND, format!("country {code} not found")).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::runtime::{CatalogSettings, ServiceConfig, SharedConfig};
    use crate::server::build_router;
    use crate::state::AppState;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use fortumo_core::catalog::CatalogStore;
    use fortumo_sdk::objects::{CountryInformation, CountrySummary};
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    const SERVICE_XML: &str = r#"<services_api_response>
  <status><code>0</code></status>
  <service id="svc">
    <countries>
      <country approved="true" code="LT" name="Lithuania">
        <prices>
          <price all_operators="true" amount="0.87" currency="EUR">
            <message_profile keyword="TXT" shortcode="1337">
              <operator code="bite" name="Bite"/>
            </message_profile>
          </price>
        </prices>
      </country>
      <country approved="true" code="FI" name="Finland">
        <promotional_text lang="fi">Maksa tekstiviestillä</promotional_text>
        <prices>
          <price all_operators="false" amount="1.00" currency="EUR">
            <message_profile keyword="TXT" shortcode="17163">
              <operator code="dna" name="DNA"/>
              <operator code="elisa" name="Elisa" amount="1.50"/>
            </message_profile>
          </price>
        </prices>
      </country>
    </countries>
  </service>
</services_api_response>"#;

    async fn test_app(xml: Option<&str>) -> Router {
        let catalog = CatalogStore::default();
        if let Some(xml) = xml {
            catalog.load_xml(xml.as_bytes(), true, None).await.unwrap();
        }
        let state = AppState::new(
            SharedConfig::new(
                ServiceConfig::new(None, None, vec![]),
                CatalogSettings::default(),
            ),
            catalog,
        );
        build_router(state)
    }

    async fn get<T: DeserializeOwned>(app: Router, uri: &str) -> (StatusCode, Option<T>) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).ok())
    }

    #[tokio::test]
    async fn handler_lists_countries_by_name() {
        let (status, countries) =
            get::<Vec<CountrySummary>>(test_app(Some(SERVICE_XML)).await, "/countries").await;
        assert_eq!(status, StatusCode::OK);
        let codes: Vec<_> = countries.unwrap().into_iter().map(|c| c.code).collect();
        assert_eq!(codes, ["FI", "LT"]);
    }

    #[tokio::test]
    async fn handler_lists_nothing_without_catalog() {
        let (status, countries) =
            get::<Vec<CountrySummary>>(test_app(None).await, "/countries").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(countries, Some(vec![]));
    }

    #[tokio::test]
    async fn handler_default_country_is_first_in_document() {
        let (status, info) =
            get::<CountryInformation>(test_app(Some(SERVICE_XML)).await, "/countries/default")
                .await;
        assert_eq!(status, StatusCode::OK);
        let info = info.unwrap();
        assert_eq!(info.code(), Some("LT"));
        let shared = info.all_operators.unwrap();
        assert_eq!(shared["shortcode"], "1337");
        assert!(!shared.contains_key("all_operators"));
    }

    #[tokio::test]
    async fn handler_country_lookup_is_case_insensitive() {
        let (status, info) =
            get::<CountryInformation>(test_app(Some(SERVICE_XML)).await, "/countries/fi").await;
        assert_eq!(status, StatusCode::OK);
        let info = info.unwrap();
        assert_eq!(info.all_operators, None);
        assert_eq!(info.operators.len(), 2);
        assert_eq!(info.operators[1]["amount"], "1.50");
        assert_eq!(
            info.promotional_text.unwrap().get("lang").map(String::as_str),
            Some("fi")
        );
    }

    #[tokio::test]
    async fn handler_unknown_country_is_not_found() {
        let (status, _) =
            get::<CountryInformation>(test_app(Some(SERVICE_XML)).await, "/countries/XX").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            get::<CountryInformation>(test_app(None).await, "/countries/default").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
