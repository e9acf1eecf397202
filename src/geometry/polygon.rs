//! Boundary polygon construction, repair and measurement

use std::collections::HashSet;

use geo::{Area, BooleanOps, BoundingRect, Centroid as _, Coord, LineString, MultiPolygon, Polygon};
use serde::Serialize;
use tracing::{debug, warn};

use super::simple::{is_simple, normalized_ring};
use crate::error::GeometryError;
use crate::types::{BoundingBox, Coordinate};

/// A closed, valid survey boundary with its derived measurements
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryPolygon {
    ring: Vec<Coordinate>,
    #[serde(skip)]
    shape: MultiPolygon<f64>,
    area: f64,
    perimeter: f64,
    geometric_centroid: Coordinate,
    bounds: BoundingBox,
    was_repaired: bool,
}

impl BoundaryPolygon {
    /// Builds a polygon from boundary points taken in the given order.
    ///
    /// The ring is closed when the last point differs from the first. An
    /// invalid ring is repaired by overlaying it with the empty geometry,
    /// which splits self-intersections into valid parts.
    pub fn build(points: &[Coordinate]) -> Result<Self, GeometryError> {
        let distinct = count_distinct(points);
        if distinct < 3 {
            return Err(GeometryError::InsufficientPoints { distinct });
        }

        let mut ring = points.to_vec();
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if !first.same_position(last) {
                ring.push(first.clone());
            }
        }

        let coords: Vec<Coord<f64>> = ring.iter().map(|c| Coord { x: c.x, y: c.y }).collect();
        let path = normalized_ring(&coords);
        let polygon = Polygon::new(LineString::from(path.clone()), vec![]);

        let valid = is_simple(&path) && polygon.unsigned_area() > 0.0;
        let (shape, was_repaired) = if valid {
            (MultiPolygon::new(vec![polygon]), false)
        } else {
            warn!(vertices = path.len(), "boundary ring is not simple, repairing");
            let repaired =
                MultiPolygon::new(vec![polygon]).union(&MultiPolygon::<f64>::new(vec![]));
            (repaired, true)
        };

        let area = shape.unsigned_area();
        if !(area > 0.0) {
            return Err(GeometryError::UnrepairableGeometry);
        }

        let centroid = shape
            .centroid()
            .ok_or(GeometryError::UnrepairableGeometry)?;
        let rect = shape
            .bounding_rect()
            .ok_or(GeometryError::UnrepairableGeometry)?;

        let perimeter = perimeter(&shape);

        debug!(
            area,
            perimeter,
            parts = shape.0.len(),
            was_repaired,
            "boundary polygon built"
        );

        Ok(Self {
            ring,
            shape,
            area,
            perimeter,
            geometric_centroid: Coordinate::new(centroid.x(), centroid.y()),
            bounds: BoundingBox::new(rect.min().x, rect.max().x, rect.min().y, rect.max().y),
            was_repaired,
        })
    }

    /// The closed input ring (first point repeated at the end)
    pub fn ring(&self) -> &[Coordinate] {
        &self.ring
    }

    /// The valid areal geometry used for measurement and intersection
    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Unsigned planar area in squared linear units
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Total edge length of the polygon's rings
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Area-weighted centre
    pub fn geometric_centroid(&self) -> &Coordinate {
        &self.geometric_centroid
    }

    /// Extent of the polygon
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Whether the input ring needed repair
    pub fn was_repaired(&self) -> bool {
        self.was_repaired
    }
}

fn count_distinct(points: &[Coordinate]) -> usize {
    points
        .iter()
        .map(|c| ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

fn perimeter(shape: &MultiPolygon<f64>) -> f64 {
    shape
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .flat_map(|ring| ring.lines())
        .map(|line| line.dx().hypot(line.dy()))
        .sum()
}
