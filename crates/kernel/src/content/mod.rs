//! Block type content model.
//!
//! This module provides:
//! - AttributeSchema: typed attribute declarations with defaults
//! - naming: tap keys and template names derived from identifiers
//! - BlockType / ResolvedBlockType: declaration, default resolution, render callback
//! - BlockRegistry: identifier-keyed registry used by the host to render blocks

mod block_type;
pub mod naming;
mod registry;
mod schema;

pub use block_type::{BlockType, ResolvedBlockType};
pub use naming::{default_attributes_tap, filter_key, template_name};
pub use registry::BlockRegistry;
pub use schema::{AttributeDefinition, AttributeSchema, AttributeType, Attributes};
