//! HTTP surface for the sanitization pipeline.
//!
//! The hosted UI drives these routes: upload endpoints take the raw file
//! bytes (decoding happens server-side, UTF-8 then Latin-1), the import
//! endpoint takes the already-decoded content plus the user-adjusted
//! column mapping.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::classify::ReferenceData;
use crate::config::SanitizerConfig;
use crate::contact::{CanonicalContact, DefaultValues};
use crate::decode::decode_input;
use crate::error::SanitizeError;
use crate::export;
use crate::mapping::ColumnMapping;
use crate::notify::{NotificationEvent, NotifierMux};
use crate::parse::parse_sheet;
use crate::pipeline::{self, ImportRequest};
use crate::report::BatchReport;
use crate::store::{self, ContactStore, OptOutStore, RemoteStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SanitizerConfig>,
    pub reference: Arc<ReferenceData>,
    pub contacts: Option<Arc<dyn ContactStore>>,
    pub optouts: Option<Arc<dyn OptOutStore>>,
    pub notifier: Arc<NotifierMux>,
}

impl AppState {
    /// Wire everything from the environment. A missing backend leaves the
    /// import route disabled but keeps extraction and mapping usable.
    pub fn from_env() -> Self {
        let config = SanitizerConfig::load_default().unwrap_or_else(|e| {
            error!(error = %format!("{e:#}"), "config load failed; using defaults");
            SanitizerConfig::default()
        });
        let reference = config.reference_data().unwrap_or_else(|e| {
            error!(error = %format!("{e:#}"), "reference data load failed; using builtin lists");
            ReferenceData::builtin().clone()
        });
        let remote = RemoteStore::from_env();
        Self {
            config: Arc::new(config),
            reference: Arc::new(reference),
            contacts: remote
                .clone()
                .map(|s| Arc::new(s) as Arc<dyn ContactStore>),
            optouts: remote.map(|s| Arc::new(s) as Arc<dyn OptOutStore>),
            notifier: Arc::new(NotifierMux::from_env()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/extract", post(extract))
        .route("/mapping/suggest", post(suggest_mapping))
        .route("/import", post(import))
        .route("/import/contacts", post(import_contacts))
        .route("/optout/parse", post(parse_optouts))
        .route("/export/contacts", post(export_contacts))
        .route("/export/extraction", post(export_extraction))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// --- error mapping ---

struct ApiError(SanitizeError);

impl From<SanitizeError> for ApiError {
    fn from(e: SanitizeError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, partial) = match &self.0 {
            SanitizeError::EmptyInput | SanitizeError::MissingRequiredField(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, None)
            }
            SanitizeError::Decode => (StatusCode::BAD_REQUEST, None),
            SanitizeError::Upstream { partial, .. } => (StatusCode::BAD_GATEWAY, Some(*partial)),
        };
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "report": partial,
        });
        (status, Json(body)).into_response()
    }
}

// --- handlers ---

#[derive(serde::Deserialize, Default)]
struct DefaultsQuery {
    country: Option<String>,
    profession: Option<String>,
    branch: Option<String>,
}

impl DefaultsQuery {
    fn into_defaults(self) -> DefaultValues {
        DefaultValues {
            country: self.country.filter(|s| !s.is_empty()),
            profession: self.profession.filter(|s| !s.is_empty()),
            branch: self.branch.filter(|s| !s.is_empty()),
        }
    }
}

#[derive(serde::Serialize)]
struct ExtractResp {
    contacts: Vec<CanonicalContact>,
    report: BatchReport,
}

/// Headerless extraction over raw uploaded bytes.
async fn extract(
    State(state): State<AppState>,
    Query(q): Query<DefaultsQuery>,
    body: Bytes,
) -> Result<Json<ExtractResp>, ApiError> {
    let text = decode_input(&body)?;
    let defaults = q.into_defaults();
    let outcome = pipeline::run_extraction(
        &text,
        &defaults,
        &state.config,
        &state.reference,
        |_| {},
    )
    .await?;
    Ok(Json(ExtractResp {
        contacts: outcome.contacts,
        report: outcome.report,
    }))
}

#[derive(serde::Serialize)]
struct SuggestResp {
    headers: Vec<String>,
    /// header → canonical field key, advisory only.
    suggested: HashMap<String, String>,
    rows: usize,
}

/// Parse the upload far enough to drive the mapping step of the UI.
async fn suggest_mapping(body: Bytes) -> Result<Json<SuggestResp>, ApiError> {
    let text = decode_input(&body)?;
    let sheet = parse_sheet(&text)?;
    let mapping = ColumnMapping::suggest(&sheet.headers);
    let suggested = sheet
        .headers
        .iter()
        .zip(mapping.slots())
        .filter_map(|(h, f)| f.map(|f| (h.clone(), f.key().to_string())))
        .collect();
    Ok(Json(SuggestResp {
        headers: sheet.headers,
        suggested,
        rows: sheet.rows.len(),
    }))
}

#[derive(serde::Deserialize)]
struct ImportBody {
    content: String,
    /// header → canonical field key, as adjusted by the user.
    mapping: HashMap<String, String>,
    #[serde(default)]
    defaults: DefaultValues,
}

/// Full import run against the configured backend.
async fn import(
    State(state): State<AppState>,
    Json(body): Json<ImportBody>,
) -> Result<Json<BatchReport>, Response> {
    let (Some(contacts), Some(optouts)) = (&state.contacts, &state.optouts) else {
        let body = serde_json::json!({ "error": "no contact backend configured" });
        return Err((StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response());
    };

    let sheet = parse_sheet(&body.content).map_err(|e| ApiError(e).into_response())?;
    let mapping = ColumnMapping::from_pairs(&sheet.headers, &body.mapping);
    let req = ImportRequest {
        sheet,
        mapping,
        defaults: body.defaults,
    };

    let result = pipeline::run_import(
        &req,
        contacts.as_ref(),
        optouts.as_ref(),
        &state.config,
        &state.reference,
        |_| {},
    )
    .await;

    match result {
        Ok(report) => {
            info!(inserted = report.inserted, updated = report.updated, "import completed");
            notify(&state, NotificationEvent::completed(report));
            Ok(Json(report))
        }
        Err(e) => {
            if let SanitizeError::Upstream { message, partial } = &e {
                notify(&state, NotificationEvent::failed(*partial, message.clone()));
            }
            Err(ApiError(e).into_response())
        }
    }
}

#[derive(serde::Deserialize)]
struct DeliverBody {
    contacts: Vec<CanonicalContact>,
    #[serde(default)]
    defaults: DefaultValues,
}

/// Deliver an extraction result the user reviewed: opt-out suppression plus
/// chunked upsert, no re-parsing.
async fn import_contacts(
    State(state): State<AppState>,
    Json(body): Json<DeliverBody>,
) -> Result<Json<BatchReport>, Response> {
    let (Some(contacts), Some(optouts)) = (&state.contacts, &state.optouts) else {
        let body = serde_json::json!({ "error": "no contact backend configured" });
        return Err((StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response());
    };

    let result = pipeline::deliver_contacts(
        body.contacts,
        contacts.as_ref(),
        optouts.as_ref(),
        &body.defaults,
        &state.config,
        |_| {},
    )
    .await;

    match result {
        Ok(report) => {
            notify(&state, NotificationEvent::completed(report));
            Ok(Json(report))
        }
        Err(e) => {
            if let SanitizeError::Upstream { message, partial } = &e {
                notify(&state, NotificationEvent::failed(*partial, message.clone()));
            }
            Err(ApiError(e).into_response())
        }
    }
}

/// Classify a pasted/uploaded opt-out list into email and domain entries.
async fn parse_optouts(body: Bytes) -> Result<Json<Vec<store::OptOutEntry>>, ApiError> {
    let text = decode_input(&body)?;
    Ok(Json(store::parse_optout_list(&text)))
}

async fn export_contacts(Json(contacts): Json<Vec<CanonicalContact>>) -> Response {
    csv_response(export::export_contacts(&contacts))
}

async fn export_extraction(Json(contacts): Json<Vec<CanonicalContact>>) -> Response {
    csv_response(export::export_extraction(&contacts))
}

fn csv_response(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response()
}

fn notify(state: &AppState, event: NotificationEvent) {
    if state.notifier.is_empty() {
        return;
    }
    let notifier = Arc::clone(&state.notifier);
    tokio::spawn(async move {
        notifier.send_event(&event).await;
    });
}
