//! Ring simplicity checks
//!
//! A ring is simple when no two of its edges meet except adjacent edges at
//! their shared vertex. Touching, crossing and collinear back-tracking all
//! count as violations.

use geo::Coord;

/// Removes consecutive repeated vertices and keeps the ring closed
pub fn normalized_ring(points: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut ring: Vec<Coord<f64>> = Vec::with_capacity(points.len() + 1);
    for &p in points {
        if ring.last() != Some(&p) {
            ring.push(p);
        }
    }
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}

/// Returns true when the closed ring has at least three edges and does not
/// intersect itself
pub fn is_simple(ring: &[Coord<f64>]) -> bool {
    if ring.len() < 4 {
        return false;
    }

    let edges = ring.len() - 1;
    for i in 0..edges {
        for j in (i + 1)..edges {
            let (a1, a2) = (ring[i], ring[i + 1]);
            let (b1, b2) = (ring[j], ring[j + 1]);

            if j == i + 1 {
                if backtracks(a2, a1, b2) {
                    return false;
                }
            } else if i == 0 && j == edges - 1 {
                if backtracks(a1, a2, b1) {
                    return false;
                }
            } else if segments_touch(a1, a2, b1, b2) {
                return false;
            }
        }
    }

    true
}

/// Adjacent edges `shared→p` and `shared→q` overlap when collinear and pointing
/// the same way
fn backtracks(shared: Coord<f64>, p: Coord<f64>, q: Coord<f64>) -> bool {
    let u = p - shared;
    let v = q - shared;
    cross(u, v) == 0.0 && (u.x * v.x + u.y * v.y) > 0.0
}

fn cross(u: Coord<f64>, v: Coord<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

fn orientation(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    cross(b - a, c - a)
}

/// Whether `p` lies within the bounding box of segment `a`-`b` (used once
/// collinearity is known)
fn within_span(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed-segment intersection test, endpoints included
fn segments_touch(a1: Coord<f64>, a2: Coord<f64>, b1: Coord<f64>, b2: Coord<f64>) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_span(b1, b2, a1))
        || (d2 == 0.0 && within_span(b1, b2, a2))
        || (d3 == 0.0 && within_span(a1, a2, b1))
        || (d4 == 0.0 && within_span(a1, a2, b2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn ring(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        let coords: Vec<Coord<f64>> = points.iter().map(|&(x, y)| coord! { x: x, y: y }).collect();
        normalized_ring(&coords)
    }

    #[test]
    fn test_square_is_simple() {
        assert!(is_simple(&ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])));
    }

    #[test]
    fn test_triangle_is_simple() {
        assert!(is_simple(&ring(&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)])));
    }

    #[test]
    fn test_bowtie_is_not_simple() {
        assert!(!is_simple(&ring(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)])));
    }

    #[test]
    fn test_touching_vertex_is_not_simple() {
        // Figure-eight sharing the vertex (5, 5)
        let points = [
            (0.0, 0.0),
            (5.0, 5.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (5.0, 5.0),
            (0.0, 10.0),
        ];
        assert!(!is_simple(&ring(&points)));
    }

    #[test]
    fn test_spike_is_not_simple() {
        let points = [(0.0, 0.0), (10.0, 0.0), (5.0, 0.0), (5.0, 5.0)];
        assert!(!is_simple(&ring(&points)));
    }

    #[test]
    fn test_collinear_points_are_not_simple() {
        assert!(!is_simple(&ring(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])));
    }

    #[test]
    fn test_normalized_ring_removes_repeats_and_closes() {
        let r = ring(&[(0.0, 0.0), (0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (4.0, 3.0)]);
        assert_eq!(r.len(), 4);
        assert_eq!(r.first(), r.last());
    }
}
