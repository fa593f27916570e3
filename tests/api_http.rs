// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /extract
// - POST /mapping/suggest
// - POST /import (success + mapping error + no backend)
// - POST /optout/parse
// - POST /export/extraction

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    Router,
};
use http::{Request, StatusCode};
use parking_lot::Mutex;
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use contact_list_sanitizer::api::{self, AppState};
use contact_list_sanitizer::classify::ReferenceData;
use contact_list_sanitizer::config::SanitizerConfig;
use contact_list_sanitizer::contact::{CanonicalContact, DefaultValues};
use contact_list_sanitizer::notify::NotifierMux;
use contact_list_sanitizer::store::{
    ContactStore, OptOutEntry, OptOutStore, UpsertOutcome,
};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

#[derive(Default)]
struct MockBackend {
    upserted: Mutex<Vec<CanonicalContact>>,
}

#[async_trait]
impl ContactStore for MockBackend {
    async fn upsert_chunk(
        &self,
        contacts: &[CanonicalContact],
        _defaults: &DefaultValues,
    ) -> Result<UpsertOutcome> {
        self.upserted.lock().extend(contacts.iter().cloned());
        Ok(UpsertOutcome {
            inserted: contacts.len() as u64,
            updated: 0,
        })
    }

    fn name(&self) -> &'static str {
        "mock-backend"
    }
}

#[async_trait]
impl OptOutStore for MockBackend {
    async fn load_entries(&self) -> Result<Vec<OptOutEntry>> {
        Ok(Vec::new())
    }
}

fn state_without_backend() -> AppState {
    AppState {
        config: Arc::new(SanitizerConfig::default()),
        reference: Arc::new(ReferenceData::builtin().clone()),
        contacts: None,
        optouts: None,
        notifier: Arc::new(NotifierMux::default()),
    }
}

fn state_with_backend() -> (AppState, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::default());
    let state = AppState {
        contacts: Some(backend.clone() as Arc<dyn ContactStore>),
        optouts: Some(backend.clone() as Arc<dyn OptOutStore>),
        ..state_without_backend()
    };
    (state, backend)
}

fn test_router(state: AppState) -> Router {
    api::router(state)
}

async fn json_body(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json body")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router(state_without_backend());

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "OK", "health body should be 'OK'");
}

#[tokio::test]
async fn api_extract_returns_contacts_and_report() {
    let app = test_router(state_without_backend());

    let req = Request::builder()
        .method("POST")
        .uri("/extract?country=Brasil")
        .body(Body::from(
            "joao.silva@gmail.com\ncontato@empresa.com\njoao.silva@gmail.com\n",
        ))
        .expect("build POST /extract");

    let resp = app.oneshot(req).await.expect("oneshot /extract");
    assert!(resp.status().is_success(), "got {}", resp.status());

    let v = json_body(resp).await;
    let contacts = v["contacts"].as_array().expect("contacts array");
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0]["name"], json!("Joao Silva"));
    assert_eq!(contacts[0]["country"], json!("Brasil"));
    assert_eq!(v["report"]["duplicates"], json!(1));
}

#[tokio::test]
async fn api_extract_rejects_empty_input() {
    let app = test_router(state_without_backend());
    let req = Request::builder()
        .method("POST")
        .uri("/extract")
        .body(Body::from("  \n "))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let v = json_body(resp).await;
    assert!(v["error"].as_str().unwrap().contains("no data rows"));
}

#[tokio::test]
async fn api_mapping_suggest_lists_headers_and_guesses() {
    let app = test_router(state_without_backend());
    let req = Request::builder()
        .method("POST")
        .uri("/mapping/suggest")
        .body(Body::from("E-mail;Nome Completo;pais\na@b.com;Ana;BR"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());

    let v = json_body(resp).await;
    assert_eq!(v["headers"].as_array().unwrap().len(), 3);
    assert_eq!(v["rows"], json!(1));
    assert_eq!(v["suggested"]["E-mail"], json!("email"));
    // "pais" matches no canonical key; it must stay unmapped.
    assert!(v["suggested"].get("pais").is_none());
}

#[tokio::test]
async fn api_import_runs_against_the_backend() {
    let (state, backend) = state_with_backend();
    let app = test_router(state);

    let mut mapping = HashMap::new();
    mapping.insert("email", "email");
    mapping.insert("pais", "country");
    let payload = json!({
        "content": "email;pais\nA@X.com;Brasil\na@x.com;Portugal\nbad-email;Brasil\n",
        "mapping": mapping,
        "defaults": { "country": null, "profession": null, "branch": null }
    });

    let req = Request::builder()
        .method("POST")
        .uri("/import")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success(), "got {}", resp.status());

    let v = json_body(resp).await;
    assert_eq!(v["total"], json!(3));
    assert_eq!(v["duplicates"], json!(1));
    assert_eq!(v["invalid"], json!(1));
    assert_eq!(v["inserted"], json!(1));
    assert_eq!(backend.upserted.lock().len(), 1);
}

#[tokio::test]
async fn api_import_without_email_mapping_is_422() {
    let (state, _backend) = state_with_backend();
    let app = test_router(state);

    let payload = json!({
        "content": "nome;pais\nAna;Brasil",
        "mapping": { "pais": "country" }
    });
    let req = Request::builder()
        .method("POST")
        .uri("/import")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn api_import_without_backend_is_503() {
    let app = test_router(state_without_backend());
    let payload = json!({
        "content": "email\na@b.com",
        "mapping": { "email": "email" }
    });
    let req = Request::builder()
        .method("POST")
        .uri("/import")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn api_optout_parse_classifies_entries() {
    let app = test_router(state_without_backend());
    let req = Request::builder()
        .method("POST")
        .uri("/optout/parse")
        .body(Body::from("a@b.com,spam.com\njunk value"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());

    let v = json_body(resp).await;
    let entries = v.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["type"], json!("email"));
    assert_eq!(entries[1]["type"], json!("domain"));
}

#[tokio::test]
async fn api_export_extraction_returns_csv_with_bom() {
    let app = test_router(state_without_backend());
    let contacts = json!([
        { "email": "a@b.com", "name": "Ana", "phone": null, "country": "Brasil",
          "state": null, "city": null, "website": null, "profession": null, "branch": null }
    ]);
    let req = Request::builder()
        .method("POST")
        .uri("/export/extraction")
        .header("content-type", "application/json")
        .body(Body::from(contacts.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "text/csv; charset=utf-8"
    );

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .unwrap()
        .to_vec();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with('\u{feff}'));
    assert!(text.contains("a@b.com;Ana;Brasil"));
}
