//! Tap system for named filter chains.
//!
//! Taps are named extension points that any code holding the shared registry can
//! implement. When a tap is applied, every handler transforms the value in turn,
//! in weight order (lower = earlier), ties broken by registration order.

mod dispatcher;
mod registry;

pub use dispatcher::TapDispatcher;
pub use registry::{DEFAULT_WEIGHT, TapHandler, TapRegistry, Transformer};
