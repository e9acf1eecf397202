//! Core data types for survey-boundary

use serde::{Deserialize, Serialize};

/// A validated survey point in the survey's planar reference system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    /// Point name as written on the survey plan (`P1`, `B3`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Coordinate {
    /// Creates a new unlabelled coordinate
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, label: None }
    }

    /// Creates a coordinate carrying its point label
    pub fn labelled(x: f64, y: f64, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: Some(label.into()),
        }
    }

    /// Exact positional equality, ignoring labels
    pub fn same_position(&self, other: &Coordinate) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Inclusive rectangular extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Creates a new bounding box
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Returns true when the point lies inside the box, edges included
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.xmin <= x && x <= self.xmax && self.ymin <= y && y <= self.ymax
    }

    /// Returns the width of the box
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Returns the height of the box
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// Arithmetic mean of a point set, rounded for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

/// Rounds to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_inclusive() {
        let bbox = BoundingBox::new(390000.0, 430000.0, 650000.0, 1300000.0);
        assert!(bbox.contains(390000.0, 650000.0));
        assert!(bbox.contains(430000.0, 1300000.0));
        assert!(!bbox.contains(389999.99, 700000.0));
        assert_eq!(bbox.width(), 40000.0);
        assert_eq!(bbox.height(), 650000.0);
    }

    #[test]
    fn test_same_position_ignores_label() {
        let a = Coordinate::labelled(1.0, 2.0, "P1");
        let b = Coordinate::new(1.0, 2.0);
        assert!(a.same_position(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(392901.623749), 392901.62);
        assert_eq!(round2(5.0), 5.0);
        assert_eq!(round2(-1.005), -1.0);
    }
}
