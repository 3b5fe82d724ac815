//! Block type listing endpoints.
//!
//! - `GET /block-types`
//! - `GET /block-types/{namespace}/{name}`

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::content::{AttributeSchema, Attributes, ResolvedBlockType};
use crate::error::{AppResult, BlockError};
use crate::state::AppState;

/// Public view of a registered block type.
#[derive(Debug, Serialize)]
pub struct BlockTypeView {
    pub name: String,
    pub template: String,
    pub attributes: AttributeSchema,
    pub default_attributes: Attributes,
}

impl From<&ResolvedBlockType> for BlockTypeView {
    fn from(block_type: &ResolvedBlockType) -> Self {
        Self {
            name: block_type.identifier().to_string(),
            template: block_type.template_name().to_string(),
            attributes: block_type.schema().clone(),
            default_attributes: block_type.resolved_defaults().clone(),
        }
    }
}

async fn list_block_types(State(state): State<AppState>) -> Json<Vec<BlockTypeView>> {
    let views = state
        .registry()
        .list()
        .iter()
        .map(|b| BlockTypeView::from(b.as_ref()))
        .collect();
    Json(views)
}

async fn get_block_type(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> AppResult<Json<BlockTypeView>> {
    let identifier = format!("{namespace}/{name}");
    let block_type = state
        .registry()
        .get(&identifier)
        .ok_or_else(|| BlockError::unknown(&identifier))?;

    Ok(Json(BlockTypeView::from(block_type.as_ref())))
}

/// Create the block type router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/block-types", get(list_block_types))
        .route("/block-types/{namespace}/{name}", get(get_block_type))
}
