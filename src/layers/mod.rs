//! Reference geometry layers
//!
//! Layers are loaded through a [`LayerSource`] (a GeoJSON directory or an
//! in-memory set) and shared read-only through a [`LayerCache`].

pub mod cache;
pub mod feature;
pub mod geojson;
pub mod source;

pub use cache::{LayerCache, LayerCacheStats};
pub use feature::{Feature, ReferenceLayer};
pub use geojson::{decode_layer, GeoJsonDirectory};
pub use source::{InMemoryLayers, LayerSource};
