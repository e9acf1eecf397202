//! Reference-layer features and their overlap operations

use geo::{
    Area, BooleanOps, BoundingRect, Intersects, MultiLineString, MultiPoint, MultiPolygon, Rect,
};

use crate::geometry::BoundaryPolygon;

/// One feature of a reference layer, split by dimension.
///
/// A GeoJSON geometry collection can mix dimensions, so every component is
/// kept (each possibly empty) instead of a single geometry.
#[derive(Debug, Clone)]
pub struct Feature {
    id: Option<String>,
    polygons: MultiPolygon<f64>,
    lines: MultiLineString<f64>,
    points: MultiPoint<f64>,
    extent: Option<Rect<f64>>,
}

impl Feature {
    /// Creates a feature from its components
    pub fn new(
        id: Option<String>,
        polygons: MultiPolygon<f64>,
        lines: MultiLineString<f64>,
        points: MultiPoint<f64>,
    ) -> Self {
        let extent = [
            polygons.bounding_rect(),
            lines.bounding_rect(),
            points.bounding_rect(),
        ]
        .into_iter()
        .flatten()
        .reduce(merge_rects);

        Self {
            id,
            polygons,
            lines,
            points,
            extent,
        }
    }

    /// Creates a purely areal feature
    pub fn areal(polygons: impl Into<MultiPolygon<f64>>) -> Self {
        Self::new(
            None,
            polygons.into(),
            MultiLineString::new(vec![]),
            MultiPoint::new(vec![]),
        )
    }

    /// Creates a purely linear feature
    pub fn lineal(lines: impl Into<MultiLineString<f64>>) -> Self {
        Self::new(
            None,
            MultiPolygon::new(vec![]),
            lines.into(),
            MultiPoint::new(vec![]),
        )
    }

    /// Sets the feature identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Feature identifier, if the source supplied one
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns true when the feature has no geometry at all
    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    /// Whether any part of the feature touches or overlaps the boundary
    pub fn intersects(&self, boundary: &BoundaryPolygon) -> bool {
        let Some(extent) = self.extent else {
            return false;
        };
        let bounds = boundary.bounds();
        let boundary_extent = Rect::new(
            (bounds.xmin, bounds.ymin),
            (bounds.xmax, bounds.ymax),
        );
        if !extent.intersects(&boundary_extent) {
            return false;
        }

        let shape = boundary.shape();
        (!self.polygons.0.is_empty() && self.polygons.intersects(shape))
            || (!self.lines.0.is_empty() && self.lines.intersects(shape))
            || (!self.points.0.is_empty() && self.points.intersects(shape))
    }

    /// Overlap between the feature's areal parts and the boundary
    pub fn intersection(&self, boundary: &BoundaryPolygon) -> MultiPolygon<f64> {
        if self.polygons.0.is_empty() {
            return MultiPolygon::new(vec![]);
        }
        self.polygons.intersection(boundary.shape())
    }

    /// Area of [`Feature::intersection`]; zero for lines and points
    pub fn intersection_area(&self, boundary: &BoundaryPolygon) -> f64 {
        self.intersection(boundary).unsigned_area()
    }
}

fn merge_rects(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
        (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
    )
}

/// A named, read-only collection of features
#[derive(Debug, Clone)]
pub struct ReferenceLayer {
    name: String,
    features: Vec<Feature>,
}

impl ReferenceLayer {
    /// Creates a new layer
    pub fn new(name: impl Into<String>, features: Vec<Feature>) -> Self {
        Self {
            name: name.into(),
            features,
        }
    }

    /// Layer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All features, in source order
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns whether the layer has no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
