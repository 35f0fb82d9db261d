// SPDX-License-Identifier: BUSL-1.1
//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "matchday API",
        description = "Live match tracking: match lifecycle, scores, and per-match commentary.\n\nAll input errors are `400` with `{error, details}`, where `details` lists every field violation. Datastore failures are `500` with a fixed `{error}` message.",
        license(name = "BUSL-1.1"),
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server"),
    ),
    paths(
        // ── Matches ─────────────────────────────────────────────────────
        crate::routes::matches::list_matches,
        crate::routes::matches::create_match,
        crate::routes::matches::update_score,
        // ── Commentary ──────────────────────────────────────────────────
        crate::routes::commentary::list_commentary,
        crate::routes::commentary::create_commentary,
    ),
    components(
        schemas(
            crate::records::MatchRecord,
            crate::records::CommentaryRecord,
            crate::error::ErrorBody,
            crate::routes::matches::CreateMatchRequest,
            crate::routes::matches::ScoreUpdateRequest,
            crate::routes::commentary::CreateCommentaryRequest,
        ),
    ),
    tags(
        (name = "matches", description = "Match creation, listing, and score updates"),
        (name = "commentary", description = "Per-match commentary feed, newest first"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
