use crate::types::{round2, Centroid, Coordinate};

/// Arithmetic mean of the coordinates, rounded to 2 decimals.
///
/// Returns `None` for an empty slice.
pub fn arithmetic_centroid(coords: &[Coordinate]) -> Option<Centroid> {
    if coords.is_empty() {
        return None;
    }

    let n = coords.len() as f64;
    let (sum_x, sum_y) = coords
        .iter()
        .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));

    Some(Centroid {
        x: round2(sum_x / n),
        y: round2(sum_y / n),
    })
}
