use async_trait::async_trait;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storedesk_core::application::{SearchGlobalUseCase, SearchSettings};
use storedesk_core::config::Config;
use storedesk_core::domain::identity::permission::{INVOICE_VIEW, PRODUCT_VIEW};
use storedesk_core::domain::identity::{IdentityResolver, User};
use storedesk_core::domain::search::{SearchIndexSource, SearchItemType, SearchableItem};
use storedesk_core::infrastructure::StaticSource;
use storedesk_core::storage::Database;
use storedesk_core::storage::seed::{DEMO_PHARMACIST_TOKEN, DEMO_ROOT_TOKEN, seed_demo};
use storedesk_server::{AppState, build_router};
use tower::ServiceExt;
use uuid::Uuid;

async fn seeded_state() -> (Database, Arc<AppState>) {
    let db = Database::in_memory().await.expect("database");
    seed_demo(&db).await.expect("seed");
    let state = Arc::new(AppState::from_database(db.clone(), &Config::default()));
    (db, state)
}

async fn get(state: Arc<AppState>, uri: &str, token: Option<&str>) -> (StatusCode, JsonValue) {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {}", token));
    }

    let resp = build_router(state)
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = resp.status();
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let json: JsonValue = serde_json::from_slice(&bytes).expect("valid JSON response");
    (status, json)
}

fn result_titles(json: &JsonValue) -> Vec<String> {
    json["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|r| r["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Resolves a single fixed token
struct FixedResolver {
    token: &'static str,
    user: User,
}

#[async_trait]
impl IdentityResolver for FixedResolver {
    async fn resolve(&self, token: &str) -> storedesk_core::Result<Option<User>> {
        Ok((token == self.token).then(|| self.user.clone()))
    }
}

/// Counts how often it is asked for items
struct CountingSource {
    calls: Arc<AtomicUsize>,
    inner: StaticSource,
}

#[async_trait]
impl SearchIndexSource for CountingSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn searchable_items(&self, tenant_id: Uuid) -> storedesk_core::Result<Vec<SearchableItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.searchable_items(tenant_id).await
    }
}

struct BrokenSource;

#[async_trait]
impl SearchIndexSource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    async fn searchable_items(&self, _tenant_id: Uuid) -> storedesk_core::Result<Vec<SearchableItem>> {
        Err(storedesk_core::Error::Other("connection reset".into()))
    }
}

fn product(id: &str, title: &str) -> SearchableItem {
    SearchableItem::new(
        id,
        SearchItemType::Product,
        title,
        format!("/inventory/products/{}", id),
        PRODUCT_VIEW,
    )
}

fn stub_state(source: Arc<dyn SearchIndexSource>) -> Arc<AppState> {
    let user = User::new(Uuid::new_v4(), "Pedro", "pedro@example.test").with_permission(PRODUCT_VIEW);
    let search = SearchGlobalUseCase::new(SearchSettings::default()).with_source(source);
    Arc::new(AppState::new(
        search,
        Arc::new(FixedResolver {
            token: "good",
            user,
        }),
    ))
}

#[tokio::test]
async fn search_returns_permitted_items() {
    let (_db, state) = seeded_state().await;

    let (status, json) = get(state, "/search?q=para", Some(DEMO_PHARMACIST_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        result_titles(&json),
        vec!["Paracetamol 500mg", "Paracetamol Syrup 120mg/5ml"]
    );

    let first = &json["results"][0];
    assert_eq!(first["type"], "product");
    assert_eq!(first["subtitle"], "PAR-500");
    assert!(first["url"].as_str().unwrap().starts_with("/inventory/products/"));
    assert!(first.get("score").is_none());
    assert!(json.get("failed_sources").is_none());
}

#[tokio::test]
async fn search_as_root_sees_everything() {
    let (_db, state) = seeded_state().await;

    let (status, json) = get(state, "/search?q=para", Some(DEMO_ROOT_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 6);
    assert!(result_titles(&json).contains(&"Ana Paraíso".to_string()));
}

#[tokio::test]
async fn search_applies_types_and_limit() {
    let (_db, state) = seeded_state().await;

    let (status, json) = get(
        state.clone(),
        "/search?q=para&types=supplier,invoice",
        Some(DEMO_ROOT_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_titles(&json), vec!["Paragon Medical Supply", "INV-0042"]);

    let (status, json) = get(state, "/search?q=para&limit=1", Some(DEMO_ROOT_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_titles(&json), vec!["Paracetamol 500mg"]);
}

#[tokio::test]
async fn search_without_identity_is_empty() {
    let (_db, state) = seeded_state().await;

    let (status, json) = get(state.clone(), "/search?q=para", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "results": [] }));

    let (status, json) = get(state, "/search?q=para", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "results": [] }));
}

#[tokio::test]
async fn search_without_identity_skips_sources() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = Arc::new(CountingSource {
        calls: calls.clone(),
        inner: StaticSource::new("products", vec![product("p1", "Paracetamol")]),
    });
    let state = stub_state(source);

    let (status, _) = get(state.clone(), "/search?q=para", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let (status, json) = get(state, "/search?q=para", Some("good")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_titles(&json), vec!["Paracetamol"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn search_rejects_invalid_term() {
    let (_db, state) = seeded_state().await;

    for uri in ["/search", "/search?q=", "/search?q=%20%20"] {
        let (status, json) = get(state.clone(), uri, Some(DEMO_ROOT_TOKEN)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert!(json["message"].is_string());
        assert_eq!(json["errors"]["q"].as_array().unwrap().len(), 1);
    }

    let long = "x".repeat(256);
    let (status, json) = get(state.clone(), &format!("/search?q={}", long), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["errors"]["q"].is_array());
}

#[tokio::test]
async fn search_rejects_unknown_type_and_bad_limit() {
    let (_db, state) = seeded_state().await;

    let (status, json) = get(state.clone(), "/search?q=para&types=widget", Some(DEMO_ROOT_TOKEN)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["errors"]["types"].is_array());

    let (status, json) = get(state, "/search?q=para&limit=zero", Some(DEMO_ROOT_TOKEN)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["errors"]["limit"].is_array());
}

#[tokio::test]
async fn search_rejects_repeated_parameters_as_field_errors() {
    let (_db, state) = seeded_state().await;

    let (status, json) = get(state.clone(), "/search?q=para&q=ibu", Some(DEMO_ROOT_TOKEN)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["message"].is_string());
    assert_eq!(json["errors"]["q"].as_array().unwrap().len(), 1);

    let (status, json) = get(state, "/search?q=para&limit=1&limit=2", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["errors"]["limit"].is_array());
}

#[tokio::test]
async fn failing_source_does_not_blank_response() {
    let user = User::new(Uuid::new_v4(), "Joana", "joana@example.test")
        .with_permissions([PRODUCT_VIEW, INVOICE_VIEW]);
    let search = SearchGlobalUseCase::new(SearchSettings::default())
        .with_source(Arc::new(StaticSource::new(
            "products",
            vec![product("p1", "Paracetamol")],
        )))
        .with_source(Arc::new(BrokenSource));
    let state = Arc::new(AppState::new(
        search,
        Arc::new(FixedResolver {
            token: "good",
            user,
        }),
    ));

    let (status, json) = get(state, "/search?q=para", Some("good")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_titles(&json), vec!["Paracetamol"]);
    assert_eq!(json["failed_sources"], serde_json::json!(["broken"]));
}

#[tokio::test]
async fn me_reports_capabilities() {
    let (_db, state) = seeded_state().await;

    let (status, json) = get(state.clone(), "/me", Some(DEMO_ROOT_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_root"], true);
    assert_eq!(json["is_admin"], true);
    assert_eq!(json["can_manage_tenants"], true);

    let (status, json) = get(state, "/me", Some(DEMO_PHARMACIST_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_admin"], false);
    assert_eq!(
        json["permissions"],
        serde_json::json!(["pharmacy.category.view", "pharmacy.product.view"])
    );
}

#[tokio::test]
async fn me_requires_identity() {
    let (_db, state) = seeded_state().await;

    let (status, json) = get(state, "/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn health_check_ok() {
    let (_db, state) = seeded_state().await;

    let (status, json) = get(state, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn health_check_reports_closed_database() {
    let (db, state) = seeded_state().await;
    db.close().await;

    let (status, json) = get(state, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "error");
}
