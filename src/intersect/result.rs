//! Per-layer intersection outcomes

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Whether a layer overlaps the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntersectionStatus {
    Yes,
    No,
    Error,
}

impl IntersectionStatus {
    /// Returns the status as it appears in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            IntersectionStatus::Yes => "YES",
            IntersectionStatus::No => "NO",
            IntersectionStatus::Error => "ERROR",
        }
    }
}

/// Overlap statistics between the boundary and one layer
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct IntersectionResult {
    pub layer_name: String,
    pub status: IntersectionStatus,
    pub intersecting_feature_count: usize,
    pub total_feature_count: usize,
    pub intersection_area: f64,
    pub percentage_covered: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl IntersectionResult {
    /// Result for a layer whose features were scanned
    pub fn scanned(
        layer_name: &str,
        total_feature_count: usize,
        intersecting_feature_count: usize,
        intersection_area: f64,
        boundary_area: f64,
    ) -> Self {
        let status = if intersecting_feature_count > 0 {
            IntersectionStatus::Yes
        } else {
            IntersectionStatus::No
        };
        let percentage_covered = if boundary_area > 0.0 {
            intersection_area / boundary_area * 100.0
        } else {
            0.0
        };

        Self {
            layer_name: layer_name.to_string(),
            status,
            intersecting_feature_count,
            total_feature_count,
            intersection_area,
            percentage_covered,
            error_message: None,
        }
    }

    /// Result for a layer that could not be loaded
    pub fn failed(layer_name: &str, message: impl Into<String>) -> Self {
        Self {
            layer_name: layer_name.to_string(),
            status: IntersectionStatus::Error,
            intersecting_feature_count: 0,
            total_feature_count: 0,
            intersection_area: 0.0,
            percentage_covered: 0.0,
            error_message: Some(message.into()),
        }
    }

    /// Returns true for a `YES` result
    pub fn has_intersection(&self) -> bool {
        self.status == IntersectionStatus::Yes
    }
}

/// Intersection results keyed by layer name, in canonical layer order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerIntersections {
    results: Vec<IntersectionResult>,
}

impl LayerIntersections {
    /// Wraps results that are already in canonical order
    pub fn new(results: Vec<IntersectionResult>) -> Self {
        Self { results }
    }

    /// Looks up a layer's result
    pub fn get(&self, layer_name: &str) -> Option<&IntersectionResult> {
        self.results.iter().find(|r| r.layer_name == layer_name)
    }

    /// Iterates results in canonical order
    pub fn iter(&self) -> std::slice::Iter<'_, IntersectionResult> {
        self.results.iter()
    }

    /// Number of layers evaluated
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns whether no layer was evaluated
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<'a> IntoIterator for &'a LayerIntersections {
    type Item = &'a IntersectionResult;
    type IntoIter = std::slice::Iter<'a, IntersectionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl Serialize for LayerIntersections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.results.len()))?;
        for result in &self.results {
            map.serialize_entry(&result.layer_name, result)?;
        }
        map.end()
    }
}
