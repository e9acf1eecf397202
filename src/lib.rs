//! survey-boundary - Survey-plan boundary extraction and land-status checks
//!
//! survey-boundary recovers boundary coordinates from a loosely formatted
//! model response, keeps the ones inside a plausible region, builds and
//! repairs the boundary polygon, and intersects it with reference layers
//! (cadastral, flood-risk, protected-area, ...) into one report.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use survey_boundary::{AnalysisConfig, Analyzer, GeoJsonDirectory, LayerCache};
//!
//! let config = AnalysisConfig::default();
//! let layers = LayerCache::new(GeoJsonDirectory::new("layers"), config.max_cached_layers);
//!
//! let response = std::fs::read_to_string("response.txt")?;
//! let report = Analyzer::new(&config, &layers).analyze(&response)?;
//!
//! for name in &report.summary().intersecting_layer_names {
//!     println!("Intersects {}", name);
//! }
//! # Ok::<(), survey_boundary::Error>(())
//! ```
//!
//! ## Running Stages Individually
//!
//! ```
//! use survey_boundary::{
//!     arithmetic_centroid, parse_response, validate, BoundaryPolygon, BoundingBox,
//! };
//!
//! let parsed = parse_response("[{'x': 0, 'y': 0}, {'x': 4, 'y': 0}, {'x': 4, 'y': 3}]");
//! let validation = validate(parsed.points(), &BoundingBox::new(-10.0, 10.0, -10.0, 10.0));
//! assert_eq!(validation.valid_count, 3);
//!
//! let centroid = arithmetic_centroid(&validation.valid).unwrap();
//! assert_eq!((centroid.x, centroid.y), (2.67, 1.0));
//!
//! let polygon = BoundaryPolygon::build(&validation.valid).unwrap();
//! assert!((polygon.area() - 6.0).abs() < 1e-9);
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod intersect;
pub mod layers;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod types;

pub use config::{AnalysisConfig, CANONICAL_LAYERS};
pub use error::{Error, GeometryError, Result};
pub use extract::{
    parse_response, validate, CandidatePoint, ExtractionStatus, ParsedResponse, ValidationResult,
};
pub use geometry::{arithmetic_centroid, BoundaryPolygon};
pub use intersect::{IntersectionEngine, IntersectionResult, IntersectionStatus, LayerIntersections};
pub use layers::{GeoJsonDirectory, InMemoryLayers, LayerCache, LayerSource, ReferenceLayer};
pub use pipeline::Analyzer;
pub use report::AnalysisReport;
pub use types::{BoundingBox, Centroid, Coordinate};
