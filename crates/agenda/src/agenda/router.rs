use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::RequestId;
use super::service::{AgendaService, AgendaServiceError};
use super::source::AgendaSource;
use super::state::Transition;

/// Router builder exposing the agenda read models and request decisions.
pub fn agenda_router<S>(service: Arc<AgendaService<S>>) -> Router
where
    S: AgendaSource + 'static,
{
    Router::new()
        .route("/api/v1/agenda", get(overview_handler::<S>))
        .route("/api/v1/agenda/timeline", get(timeline_handler::<S>))
        .route(
            "/api/v1/agenda/requests/:request_id/accept",
            post(accept_handler::<S>),
        )
        .route(
            "/api/v1/agenda/requests/:request_id/reject",
            post(reject_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn overview_handler<S>(State(service): State<Arc<AgendaService<S>>>) -> Response
where
    S: AgendaSource + 'static,
{
    (StatusCode::OK, axum::Json(service.overview())).into_response()
}

pub(crate) async fn timeline_handler<S>(State(service): State<Arc<AgendaService<S>>>) -> Response
where
    S: AgendaSource + 'static,
{
    match service.timeline() {
        Ok(entries) => {
            let payload = json!({
                "policy": service.policy(),
                "items": entries,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn accept_handler<S>(
    State(service): State<Arc<AgendaService<S>>>,
    Path(request_id): Path<String>,
) -> Response
where
    S: AgendaSource + 'static,
{
    transition_response(service.accept(RequestId(request_id)))
}

pub(crate) async fn reject_handler<S>(
    State(service): State<Arc<AgendaService<S>>>,
    Path(request_id): Path<String>,
) -> Response
where
    S: AgendaSource + 'static,
{
    transition_response(service.reject(RequestId(request_id)))
}

fn transition_response(result: Result<Transition, AgendaServiceError>) -> Response {
    match result {
        Ok(transition) => (StatusCode::OK, axum::Json(transition)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AgendaServiceError) -> Response {
    let status = match err {
        AgendaServiceError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        AgendaServiceError::Source(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
