//! Plausible-region validation of candidate coordinates

use serde::Serialize;
use tracing::debug;

use super::candidate::CandidatePoint;
use crate::types::{BoundingBox, Coordinate};

/// Why a candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// x or y could not be read as a finite number
    NotNumeric,
    /// Outside the configured validity region
    OutOfBounds,
}

/// A rejected candidate together with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidCoordinate {
    pub candidate: CandidatePoint,
    pub reason: InvalidReason,
}

/// Partition of extracted candidates into valid and invalid coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub total_extracted: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Percentage of candidates that passed, 0 when nothing was extracted
    pub success_rate: f64,
    pub valid: Vec<Coordinate>,
    pub invalid: Vec<InvalidCoordinate>,
}

impl ValidationResult {
    /// Returns true when every extracted candidate was valid
    pub fn all_valid(&self) -> bool {
        self.invalid_count == 0
    }
}

/// Splits candidates by numeric coercion and inclusive bounding-box membership,
/// preserving input order within each bucket
pub fn validate(candidates: &[CandidatePoint], bounds: &BoundingBox) -> ValidationResult {
    let mut valid = Vec::with_capacity(candidates.len());
    let mut invalid = Vec::new();

    for candidate in candidates {
        match candidate.coerce() {
            Some((x, y)) if bounds.contains(x, y) => valid.push(Coordinate {
                x,
                y,
                label: candidate.label.clone(),
            }),
            Some(_) => invalid.push(InvalidCoordinate {
                candidate: candidate.clone(),
                reason: InvalidReason::OutOfBounds,
            }),
            None => invalid.push(InvalidCoordinate {
                candidate: candidate.clone(),
                reason: InvalidReason::NotNumeric,
            }),
        }
    }

    let total_extracted = candidates.len();
    let success_rate = if total_extracted == 0 {
        0.0
    } else {
        valid.len() as f64 / total_extracted as f64 * 100.0
    };

    debug!(
        total = total_extracted,
        valid = valid.len(),
        invalid = invalid.len(),
        "coordinates validated"
    );

    ValidationResult {
        total_extracted,
        valid_count: valid.len(),
        invalid_count: invalid.len(),
        success_rate,
        valid,
        invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benin() -> BoundingBox {
        BoundingBox::new(390000.0, 430000.0, 650000.0, 1300000.0)
    }

    #[test]
    fn test_classification() {
        let candidates = vec![
            CandidatePoint::new(400000.0, 700000.0).with_label("P1"),
            CandidatePoint::new(100.0, 700000.0),
            CandidatePoint::new("abc", 700000.0),
            CandidatePoint::new("410000.5", "800000"),
        ];

        let result = validate(&candidates, &benin());

        assert_eq!(result.total_extracted, 4);
        assert_eq!(result.valid_count, 2);
        assert_eq!(result.invalid_count, 2);
        assert_eq!(result.valid[0], Coordinate::labelled(400000.0, 700000.0, "P1"));
        assert_eq!(result.valid[1], Coordinate::new(410000.5, 800000.0));
        assert_eq!(result.invalid[0].reason, InvalidReason::OutOfBounds);
        assert_eq!(result.invalid[1].reason, InvalidReason::NotNumeric);
        assert_eq!(result.success_rate, 50.0);
        assert!(!result.all_valid());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let candidates = vec![
            CandidatePoint::new(390000.0, 650000.0),
            CandidatePoint::new(430000.0, 1300000.0),
            CandidatePoint::new(430000.01, 1300000.0),
        ];
        let result = validate(&candidates, &benin());
        assert_eq!(result.valid_count, 2);
        assert_eq!(result.invalid_count, 1);
    }

    #[test]
    fn test_empty_input() {
        let result = validate(&[], &benin());
        assert_eq!(result.total_extracted, 0);
        assert_eq!(result.success_rate, 0.0);
        assert!(result.valid.is_empty());
        assert!(result.invalid.is_empty());
    }

    #[test]
    fn test_counts_always_sum() {
        let candidates: Vec<CandidatePoint> = (0..37)
            .map(|i| match i % 3 {
                0 => CandidatePoint::new(395000.0 + i as f64, 700000.0),
                1 => CandidatePoint::new(i as f64, 700000.0),
                _ => CandidatePoint::new("n/a", "700000"),
            })
            .collect();
        let result = validate(&candidates, &benin());
        assert_eq!(result.valid_count + result.invalid_count, result.total_extracted);
        assert_eq!(result.valid_count, 13);
        let expected = 13.0 / 37.0 * 100.0;
        assert!((result.success_rate - expected).abs() < 1e-12);
    }
}
