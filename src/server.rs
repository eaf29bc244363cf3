//! HTTP transport for the command router.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    routing::{get, post},
};
use serde::Serialize;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

use crate::commands::{CommandDescription, CommandRequest, CommandResponse, CommandRouter};

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_commands(State(router): State<Arc<CommandRouter>>) -> Json<Vec<CommandDescription>> {
    Json(router.descriptions())
}

#[instrument(skip(router, request), fields(user_id = request.user_id()))]
async fn run_command(
    State(router): State<Arc<CommandRouter>>,
    Path(name): Path<String>,
    Json(request): Json<CommandRequest>,
) -> Json<CommandResponse> {
    let response = router.dispatch(&name, &request).await;
    debug!(ephemeral = response.ephemeral(), "Command answered");
    Json(response)
}

/// Builds the HTTP application:
/// `GET /health`, `GET /commands` and `POST /commands/{name}`.
pub fn app(router: Arc<CommandRouter>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/commands", get(list_commands))
        .route("/commands/{name}", post(run_command))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(router)
}
