//! Boundary-versus-reference-layer intersection

pub mod engine;
pub mod result;

pub use engine::IntersectionEngine;
pub use result::{IntersectionResult, IntersectionStatus, LayerIntersections};
