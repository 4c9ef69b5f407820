use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use uuid::Uuid;

use super::repository::{EnrichmentClient, LeadRepository, MailTransport, RepositoryError};
use super::service::{FunnelService, FunnelServiceError, LeadSubmission};
use super::session::FunnelError;

/// Router builder exposing HTTP endpoints for submission and report retrieval.
pub fn funnel_router<R, M, E>(service: Arc<FunnelService<R, M, E>>) -> Router
where
    R: LeadRepository + 'static,
    M: MailTransport + 'static,
    E: EnrichmentClient + 'static,
{
    Router::new()
        .route("/api/v1/funnel/submissions", post(submit_handler::<R, M, E>))
        .route(
            "/api/v1/funnel/reports/:record_id",
            get(report_handler::<R, M, E>),
        )
        .route(
            "/api/v1/funnel/reports/:record_id/document",
            get(document_handler::<R, M, E>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, M, E>(
    State(service): State<Arc<FunnelService<R, M, E>>>,
    axum::Json(submission): axum::Json<LeadSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
    M: MailTransport + 'static,
    E: EnrichmentClient + 'static,
{
    match service.submit(submission).await {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(FunnelServiceError::Funnel(FunnelError::Validation(message))) => {
            let payload = json!({
                "error": message,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn report_handler<R, M, E>(
    State(service): State<Arc<FunnelService<R, M, E>>>,
    Path(record_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    M: MailTransport + 'static,
    E: EnrichmentClient + 'static,
{
    let Some(id) = parse_record_id(&record_id) else {
        return not_found(&record_id);
    };

    match service.report(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(FunnelServiceError::Repository(RepositoryError::NotFound)) => not_found(&record_id),
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn document_handler<R, M, E>(
    State(service): State<Arc<FunnelService<R, M, E>>>,
    Path(record_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    M: MailTransport + 'static,
    E: EnrichmentClient + 'static,
{
    let Some(id) = parse_record_id(&record_id) else {
        return not_found(&record_id);
    };

    match service.document(&id) {
        Ok(rendered) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, rendered.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", rendered.filename),
                ),
            ],
            rendered.bytes,
        )
            .into_response(),
        Err(FunnelServiceError::Repository(RepositoryError::NotFound)) => not_found(&record_id),
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn parse_record_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn not_found(record_id: &str) -> Response {
    let payload = json!({
        "error": "no such record",
        "record_id": record_id,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}
