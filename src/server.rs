use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::compiler;
use crate::criterion::Criterion;
use crate::error::SearchError;
use crate::registry::{self, Domain, FieldEntry};

#[derive(Deserialize)]
pub struct CompileRequest {
    #[serde(default)]
    pub domain: Option<Domain>,
    pub criteria: Vec<Criterion>,
}

#[derive(Serialize, Deserialize)]
pub struct CompileResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct ApplicableRequest {
    pub domain: Domain,
    pub query: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApplicableResponse {
    pub applicable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

type ErrorReply = (StatusCode, Json<CompileResponse>);

fn bad_request(error: SearchError) -> ErrorReply {
    let message = error.user_message();
    warn!(%error, "request rejected");
    let body = CompileResponse { status: "error".into(), query: None, error: Some(message) };
    (StatusCode::BAD_REQUEST, Json(body))
}

async fn compile(Json(req): Json<CompileRequest>) -> Result<Json<CompileResponse>, ErrorReply> {
    let query = compiler::compile_checked(req.domain, &req.criteria).map_err(bad_request)?;
    info!(criteria = req.criteria.len(), query = ?query.as_ref().map(|q| q.as_str()), "compiled");
    Ok(Json(CompileResponse {
        status: "ok".into(),
        query: query.map(|q| q.into_string()),
        error: None,
    }))
}

async fn applicable(Json(req): Json<ApplicableRequest>) -> Json<ApplicableResponse> {
    let applicable = registry::is_applicable(req.domain, &req.query);
    let message = (!applicable).then(|| SearchError::Inapplicable { domain: req.domain }.user_message());
    Json(ApplicableResponse { applicable, message })
}

async fn fields(Path(domain): Path<String>) -> Result<Json<&'static [FieldEntry]>, ErrorReply> {
    let domain: Domain = domain.parse().map_err(bad_request)?;
    Ok(Json(domain.fields()))
}

pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/v1/compile", post(compile))
        .route("/v1/applicable", post(applicable))
        .route("/v1/fields/:domain", get(fields))
        .layer(cors)
}
