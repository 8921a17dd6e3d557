//! Camera math.
//!
//! Provides the perspective projection used by cameras, with its cached byte
//! form for buffer uploads and depth linearization constants.

/// Perspective projection matrix and derived constants.
pub mod projection;

pub use projection::{Projection, ProjectionUniform, ProjectionUpdate};
