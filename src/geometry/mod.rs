//! Centroid and boundary-polygon construction

pub mod centroid;
pub mod polygon;
pub mod simple;

pub use centroid::arithmetic_centroid;
pub use polygon::BoundaryPolygon;
