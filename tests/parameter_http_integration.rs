//! Integration tests for the parameter HTTP endpoints.
//!
//! These tests drive the real router, store, cache, and invalidation
//! wrapper over an in-memory repository:
//! 1. Admin CRUD round-trips through the French wire envelope
//! 2. The public map serves decoded values and refreshes after writes
//! 3. Validation failures arrive as per-field error maps

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fitadmin::adapters::http::{parameter_router, ParameterAppState};
use fitadmin::adapters::{InMemoryParameterCache, InvalidatingParameterRepository};
use fitadmin::application::ParameterStore;
use fitadmin::domain::foundation::{DomainError, ErrorCode, Timestamp};
use fitadmin::domain::parameter::{NewParameter, Parameter, ParameterPatch, ParameterType};
use fitadmin::ports::{ParameterCache, ParameterRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory parameter repository with upsert-by-key semantics.
struct TestParameterRepository {
    rows: Mutex<Vec<Parameter>>,
    next_id: AtomicI64,
}

impl TestParameterRepository {
    fn with_rows(rows: Vec<Parameter>) -> Self {
        let next_id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            rows: Mutex::new(rows),
            next_id: AtomicI64::new(next_id),
        }
    }
}

#[async_trait]
impl ParameterRepository for TestParameterRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<Parameter>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.key == key)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Parameter>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Parameter>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_group(&self, group: &str) -> Result<Vec<Parameter>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.group.as_deref() == Some(group))
            .cloned()
            .collect())
    }

    async fn upsert(&self, entry: &NewParameter) -> Result<Parameter, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.key == entry.key) {
            row.raw_value = entry.raw_value.clone();
            row.value_type = entry.value_type;
            row.group = entry.group.clone();
            row.description = entry.description.clone();
            row.updated_at = Timestamp::now();
            return Ok(row.clone());
        }

        let row = Parameter {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            key: entry.key.clone(),
            raw_value: entry.raw_value.clone(),
            value_type: entry.value_type,
            group: entry.group.clone(),
            description: entry.description.clone(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, patch: &ParameterPatch) -> Result<Parameter, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|r| r.id == id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ParameterNotFound,
                format!("Parameter not found: {}", id),
            )
        })?;

        if let Some(raw) = &patch.raw_value {
            row.raw_value = Some(raw.clone());
        }
        if let Some(ty) = patch.value_type {
            row.value_type = ty;
        }
        if let Some(group) = &patch.group {
            row.group = Some(group.clone());
        }
        if let Some(description) = &patch.description {
            row.description = Some(description.clone());
        }
        row.updated_at = Timestamp::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }
}

fn parameter_row(
    id: i64,
    key: &str,
    raw: Option<&str>,
    ty: ParameterType,
    group: Option<&str>,
) -> Parameter {
    Parameter {
        id,
        key: key.to_string(),
        raw_value: raw.map(str::to_string),
        value_type: ty,
        group: group.map(str::to_string),
        description: None,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

/// Full parameter stack over seeded rows: invalidating repository,
/// in-memory cache, store, router.
fn app(rows: Vec<Parameter>) -> Router {
    let cache: Arc<dyn ParameterCache> = Arc::new(InMemoryParameterCache::new());
    let repository = InvalidatingParameterRepository::new(
        TestParameterRepository::with_rows(rows),
        Arc::clone(&cache),
    );
    let store = Arc::new(ParameterStore::new(
        Arc::new(repository),
        cache,
        Duration::from_secs(300),
    ));
    Router::new().nest("/api/parametres", parameter_router(ParameterAppState { store }))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn list_returns_raw_rows_in_the_envelope() {
    let app = app(vec![
        parameter_row(1, "site_name", Some("Acme Gym"), ParameterType::Text, Some("general")),
        parameter_row(2, "max_capacity", Some("120"), ParameterType::Number, Some("general")),
    ]);

    let (status, body) = send(app, get("/api/parametres")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["cle"], "site_name");
    assert_eq!(data[0]["valeur"], "Acme Gym");
    assert_eq!(data[0]["type"], "text");
    assert_eq!(data[0]["groupe"], "general");
    assert_eq!(data[1]["type"], "number");
}

#[tokio::test]
async fn list_can_filter_by_group() {
    let app = app(vec![
        parameter_row(1, "site_name", Some("Acme Gym"), ParameterType::Text, Some("general")),
        parameter_row(2, "meta_title", Some("Acme"), ParameterType::Text, Some("seo")),
    ]);

    let (status, body) = send(app, get("/api/parametres?groupe=seo")).await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["cle"], "meta_title");
}

#[tokio::test]
async fn show_returns_one_row_by_key() {
    let app = app(vec![parameter_row(
        5,
        "welcome_text",
        Some("Bienvenue"),
        ParameterType::Textarea,
        None,
    )]);

    let (status, body) = send(app, get("/api/parametres/welcome_text")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 5);
    assert_eq!(body["data"]["valeur"], "Bienvenue");
    assert_eq!(body["data"]["type"], "textarea");
    assert_eq!(body["data"]["groupe"], Value::Null);
}

#[tokio::test]
async fn show_unknown_key_is_404() {
    let (status, body) = send(app(vec![]), get("/api/parametres/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], "Parametre not found");
}

#[tokio::test]
async fn upsert_creates_a_row() {
    let app = app(vec![]);

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/parametres",
            json!({
                "cle": "welcome_text",
                "valeur": "Bienvenue",
                "type": "text",
                "groupe": "landing"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], "Parametre saved successfully");
    assert_eq!(body["data"]["cle"], "welcome_text");
    assert_eq!(body["data"]["valeur"], "Bienvenue");

    let (status, body) = send(app, get("/api/parametres/welcome_text")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["groupe"], "landing");
}

#[tokio::test]
async fn upsert_replaces_by_key_without_duplicating() {
    let app = app(vec![parameter_row(
        1,
        "site_name",
        Some("Old Name"),
        ParameterType::Text,
        Some("general"),
    )]);

    let (status, _) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/parametres",
            json!({ "cle": "site_name", "valeur": "New Name", "type": "text" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(app, get("/api/parametres")).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["valeur"], "New Name");
}

#[tokio::test]
async fn public_map_serves_decoded_values() {
    let app = app(vec![
        parameter_row(1, "maintenance_mode", Some("1"), ParameterType::Boolean, None),
        parameter_row(2, "max_capacity", Some("120"), ParameterType::Number, None),
        parameter_row(
            3,
            "social_links",
            Some(r#"{"instagram":"https://instagram.com/acme"}"#),
            ParameterType::Json,
            None,
        ),
    ]);

    let (status, body) = send(app, get("/api/parametres/public")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["maintenance_mode"], json!(true));
    assert_eq!(body["data"]["max_capacity"], json!(120));
    assert_eq!(
        body["data"]["social_links"]["instagram"],
        "https://instagram.com/acme"
    );
}

#[tokio::test]
async fn public_map_refreshes_after_an_upsert() {
    let app = app(vec![parameter_row(
        1,
        "site_name",
        Some("Acme Gym"),
        ParameterType::Text,
        Some("general"),
    )]);

    // Prime the group cache
    let (_, body) = send(app.clone(), get("/api/parametres/public?groupe=general")).await;
    assert_eq!(body["data"]["site_name"], "Acme Gym");

    let (status, _) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/parametres",
            json!({
                "cle": "site_name",
                "valeur": "Acme Fitness Club",
                "type": "text",
                "groupe": "general"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The write purged the cached map, so the new value is visible
    let (_, body) = send(app, get("/api/parametres/public?groupe=general")).await;
    assert_eq!(body["data"]["site_name"], "Acme Fitness Club");
}

#[tokio::test]
async fn upsert_without_cle_is_unprocessable() {
    let (status, body) = send(
        app(vec![]),
        json_request("POST", "/api/parametres", json!({ "valeur": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errors"]["cle"], json!(["The cle field is required."]));
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn update_keeps_fields_the_patch_leaves_out() {
    let app = app(vec![parameter_row(
        7,
        "max_capacity",
        Some("120"),
        ParameterType::Number,
        Some("general"),
    )]);

    let (status, body) = send(
        app,
        json_request("PUT", "/api/parametres/7", json!({ "valeur": 150 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Parametre updated successfully");
    assert_eq!(body["data"]["valeur"], "150");
    assert_eq!(body["data"]["type"], "number");
    assert_eq!(body["data"]["groupe"], "general");
}

#[tokio::test]
async fn update_with_a_non_numeric_id_is_404() {
    let (status, body) = send(
        app(vec![]),
        json_request("PUT", "/api/parametres/site_name", json!({ "valeur": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Parametre not found");
}

#[tokio::test]
async fn update_of_an_unknown_id_is_404() {
    let (status, body) = send(
        app(vec![]),
        json_request("PUT", "/api/parametres/999", json!({ "valeur": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Parametre not found");
}

#[tokio::test]
async fn delete_removes_the_row_and_its_cached_values() {
    let app = app(vec![parameter_row(
        1,
        "site_name",
        Some("Acme Gym"),
        ParameterType::Text,
        Some("general"),
    )]);

    // Prime the whole-table map
    let (_, body) = send(app.clone(), get("/api/parametres/public")).await;
    assert_eq!(body["data"]["site_name"], "Acme Gym");

    let (status, body) = send(
        app.clone(),
        Request::builder()
            .method("DELETE")
            .uri("/api/parametres/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Parametre deleted successfully");
    assert!(body.get("data").is_none());

    let (_, body) = send(app.clone(), get("/api/parametres/public")).await;
    assert_eq!(body["data"], json!({}));

    let (status, _) = send(
        app,
        Request::builder()
            .method("DELETE")
            .uri("/api/parametres/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_upsert_saves_every_entry() {
    let app = app(vec![]);

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/parametres/bulk",
            json!({
                "parametres": [
                    { "cle": "site_name", "valeur": "Acme Gym", "type": "text" },
                    { "cle": "tagline", "valeur": "Stronger every day", "type": "text" }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "2 parametres saved successfully");

    let (_, body) = send(app, get("/api/parametres")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn bulk_upsert_rejects_the_whole_batch_on_one_bad_entry() {
    let app = app(vec![]);

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/parametres/bulk",
            json!({
                "parametres": [
                    { "cle": "site_name", "valeur": "Acme Gym" },
                    { "valeur": "orphan value" }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["parametres.1.cle"],
        json!(["The cle field is required."])
    );

    // Nothing from the batch was persisted
    let (_, body) = send(app, get("/api/parametres")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
