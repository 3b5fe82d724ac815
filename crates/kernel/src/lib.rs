//! Trellis Kernel Library
//!
//! Declarative block types: attribute schemas, filtered default resolution,
//! a one-shot ready lifecycle, and template-backed rendering.
//! The `trellis` binary serves and inspects the bundled block set.

pub mod blocks;
pub mod config;
pub mod content;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod state;
pub mod tap;
pub mod theme;

pub use config::{Config, DefaultOverrides};
pub use error::{AppError, BlockError, BlockResult};
pub use state::AppState;
