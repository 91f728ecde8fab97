//! HTTP routes.
//!
//! Every response is JSON. Door mutations go through the shared
//! registry mutex, the same one the periodic refresh tick holds, so a
//! pulse and a refresh never interleave on one door.

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use garage_core::DoorStatus;
use garage_door::DoorRegistry;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// The registry as shared by the HTTP handlers and the refresh tick.
pub type SharedRegistry = Arc<Mutex<DoorRegistry>>;

#[derive(Debug, Serialize)]
struct PulseReport {
    name: String,
    status: DoorStatus,
}

#[derive(Debug, Serialize)]
struct DoorReport {
    id: String,
    name: String,
    status: DoorStatus,
}

#[derive(Debug, Serialize)]
struct ErrorReport {
    status: &'static str,
    msg: String,
}

fn error_response(code: StatusCode, msg: impl Into<String>) -> Response {
    let report = ErrorReport {
        status: "error",
        msg: msg.into(),
    };
    (code, Json(report)).into_response()
}

/// Build the application router.
pub fn router(registry: SharedRegistry, verbose: bool) -> Router {
    let router = Router::new()
        .route("/pulse/{door}", get(pulse))
        .route("/status", get(status))
        .fallback(not_found)
        .with_state(registry);
    if verbose {
        router.layer(middleware::from_fn(log_request))
    } else {
        router
    }
}

/// `GET /pulse/{door}`: trigger a door and report its new status.
async fn pulse(State(registry): State<SharedRegistry>, Path(door): Path<String>) -> Response {
    let mut registry = registry.lock().await;
    let Some(door) = registry.get_mut(&door) else {
        warn!(id = %door, "pulse for unknown door");
        return error_response(StatusCode::NOT_FOUND, format!("unknown door {door}"));
    };

    door.pulse();
    let report = PulseReport {
        name: door.name().to_string(),
        status: door.status(),
    };
    info!(door = %report.name, status = %report.status, "door pulsed");
    Json(report).into_response()
}

/// `GET /status`: every door with its status, in configuration order.
async fn status(State(registry): State<SharedRegistry>) -> Response {
    let registry = registry.lock().await;
    let reports: Vec<DoorReport> = registry
        .iter()
        .map(|(id, door)| DoorReport {
            id: id.to_string(),
            name: door.name().to_string(),
            status: door.status(),
        })
        .collect();
    Json(reports).into_response()
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found")
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    info!(%method, %uri, status = %response.status(), "request handled");
    response
}
