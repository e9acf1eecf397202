//! Analysis report aggregation

pub mod csv;

use serde::{Serialize, Serializer};

use crate::error::GeometryError;
use crate::extract::{ExtractionStatus, ValidationResult};
use crate::geometry::BoundaryPolygon;
use crate::intersect::LayerIntersections;
use crate::types::Centroid;

/// Layers that reported a `YES`, in canonical order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub layers_with_intersection: usize,
    pub intersecting_layer_names: Vec<String>,
}

impl Summary {
    /// Derives the summary from per-layer results
    pub fn from_intersections(intersections: &LayerIntersections) -> Self {
        let intersecting_layer_names: Vec<String> = intersections
            .iter()
            .filter(|r| r.has_intersection())
            .map(|r| r.layer_name.clone())
            .collect();

        Self {
            layers_with_intersection: intersecting_layer_names.len(),
            intersecting_layer_names,
        }
    }
}

/// Complete outcome of one analysis. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    extraction: ExtractionStatus,
    validation: ValidationResult,
    arithmetic_centroid: Option<Centroid>,
    polygon: Option<BoundaryPolygon>,
    #[serde(serialize_with = "display_error")]
    polygon_error: Option<GeometryError>,
    intersections: LayerIntersections,
    summary: Summary,
}

impl AnalysisReport {
    /// Combines the stage outputs and derives the summary
    pub fn aggregate(
        extraction: ExtractionStatus,
        validation: ValidationResult,
        arithmetic_centroid: Option<Centroid>,
        polygon: Result<BoundaryPolygon, GeometryError>,
        intersections: LayerIntersections,
    ) -> Self {
        let (polygon, polygon_error) = match polygon {
            Ok(polygon) => (Some(polygon), None),
            Err(e) => (None, Some(e)),
        };
        let summary = Summary::from_intersections(&intersections);

        Self {
            extraction,
            validation,
            arithmetic_centroid,
            polygon,
            polygon_error,
            intersections,
            summary,
        }
    }

    pub fn extraction(&self) -> &ExtractionStatus {
        &self.extraction
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    pub fn arithmetic_centroid(&self) -> Option<&Centroid> {
        self.arithmetic_centroid.as_ref()
    }

    pub fn polygon(&self) -> Option<&BoundaryPolygon> {
        self.polygon.as_ref()
    }

    /// Why no polygon was produced
    pub fn polygon_error(&self) -> Option<&GeometryError> {
        self.polygon_error.as_ref()
    }

    pub fn intersections(&self) -> &LayerIntersections {
        &self.intersections
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

fn display_error<S: Serializer>(
    error: &Option<GeometryError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.collect_str(e),
        None => serializer.serialize_none(),
    }
}
