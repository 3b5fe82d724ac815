//! Server-side block rendering endpoint for editor previews.
//!
//! `POST /block-renderer/{namespace}/{name}` with
//! `{"attributes": {...}, "content": "..."}` returns `{"rendered": "..."}`.

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::content::Attributes;
use crate::error::AppResult;
use crate::state::AppState;

/// Render request body.
#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub content: String,
}

/// Render response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct RenderResponse {
    pub rendered: String,
}

async fn render_block(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
    Json(request): Json<RenderRequest>,
) -> AppResult<Json<RenderResponse>> {
    let identifier = format!("{namespace}/{name}");
    let rendered =
        state
            .registry()
            .render_block(&identifier, &request.attributes, &request.content)?;

    Ok(Json(RenderResponse { rendered }))
}

/// Create the block renderer router.
pub fn router() -> Router<AppState> {
    Router::new().route("/block-renderer/{namespace}/{name}", post(render_block))
}
