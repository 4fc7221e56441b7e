//! Planar geometry on raw (lng, lat) coordinates.
//!
//! Flights span a few hundred meters, so everything here works in plain
//! coordinate space rather than on the sphere.

use crate::models::{Point, Polygon};

/// Tolerance for orientation tests, well below any rule threshold.
const ORIENT_EPS: f64 = 1e-12;

/// Euclidean distance between two points in coordinate units.
pub fn distance(a: Point, b: Point) -> f64 {
    let dlng = a.lng - b.lng;
    let dlat = a.lat - b.lat;
    (dlng * dlng + dlat * dlat).sqrt()
}

pub fn points_equal(a: Point, b: Point, epsilon: f64) -> bool {
    distance(a, b) <= epsilon
}

/// Move `step` units from `from` in the direction of `angle_deg`.
///
/// 0 degrees is east, 90 is north.
pub fn project_by_angle(from: Point, angle_deg: i32, step: f64) -> Point {
    let theta = f64::from(angle_deg).to_radians();
    Point::new(from.lng + theta.cos() * step, from.lat + theta.sin() * step)
}

/// Point-in-polygon by ray casting. Points on the boundary count as inside.
pub fn is_within(point: Point, polygon: &Polygon) -> bool {
    let ring = polygon.ring();
    if ring.len() < 4 {
        return false;
    }

    if polygon
        .edges()
        .any(|(a, b)| orient(a, b, point).abs() <= ORIENT_EPS && on_segment(a, b, point))
    {
        return true;
    }

    let mut inside = false;
    for (a, b) in polygon.edges() {
        if ((a.lat > point.lat) != (b.lat > point.lat))
            && (point.lng < (b.lng - a.lng) * (point.lat - a.lat) / (b.lat - a.lat) + a.lng)
        {
            inside = !inside;
        }
    }
    inside
}

/// True if the segment touches or crosses the polygon boundary, or lies
/// entirely inside it.
pub fn segment_intersects_polygon(a: Point, b: Point, polygon: &Polygon) -> bool {
    if polygon
        .edges()
        .any(|(p, q)| segments_intersect(a, b, p, q))
    {
        return true;
    }
    // No boundary contact: either fully inside or fully outside.
    is_within(a, polygon)
}

/// Segment intersection including touches and collinear overlap.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    if o1.abs() <= ORIENT_EPS && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() <= ORIENT_EPS && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() <= ORIENT_EPS && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() <= ORIENT_EPS && on_segment(b1, b2, a2) {
        return true;
    }

    let a_crosses = (o1 > ORIENT_EPS && o2 < -ORIENT_EPS) || (o1 < -ORIENT_EPS && o2 > ORIENT_EPS);
    let b_crosses = (o3 > ORIENT_EPS && o4 < -ORIENT_EPS) || (o3 < -ORIENT_EPS && o4 > ORIENT_EPS);
    a_crosses && b_crosses
}

fn orient(p: Point, q: Point, r: Point) -> f64 {
    (q.lng - p.lng) * (r.lat - p.lat) - (q.lat - p.lat) * (r.lng - p.lng)
}

/// `r` lies within the bounding box of segment `p`-`q`.
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    fn within(a: f64, b: f64, value: f64) -> bool {
        value >= a.min(b) - ORIENT_EPS && value <= a.max(b) + ORIENT_EPS
    }
    within(p.lng, q.lng, r.lng) && within(p.lat, q.lat, r.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direction from `a` to `b` in degrees, normalized to [0, 360).
    fn angle_between(a: Point, b: Point) -> f64 {
        let deg = (b.lat - a.lat).atan2(b.lng - a.lng).to_degrees();
        if deg < 0.0 {
            deg + 360.0
        } else {
            deg
        }
    }

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn points_equal_is_reflexive_and_symmetric() {
        let p = Point::new(-3.186922, 55.944871);
        let q = Point::new(-3.186915, 55.944875);
        let far = Point::new(-3.1869, 55.9449);
        assert!(points_equal(p, p, 0.00001));
        assert_eq!(points_equal(p, q, 0.00001), points_equal(q, p, 0.00001));
        assert!(points_equal(p, q, 0.00001));
        assert!(!points_equal(p, far, 0.00001));
        assert!(!points_equal(far, p, 0.00001));
    }

    #[test]
    fn projection_recovers_angle() {
        let start = Point::new(-3.186922, 55.944871);
        for angle in (0..360).step_by(10) {
            let next = project_by_angle(start, angle, 0.0003);
            let recovered = angle_between(start, next);
            let diff = (recovered - f64::from(angle)).abs();
            assert!(
                diff < 1e-6 || (360.0 - diff) < 1e-6,
                "angle {angle} recovered as {recovered}"
            );
            assert!((distance(start, next) - 0.0003).abs() < 1e-12);
        }
    }

    #[test]
    fn projection_east_moves_longitude_only() {
        let start = Point::new(-3.186922, 55.944871);
        let next = project_by_angle(start, 0, 0.0003);
        assert!((next.lng - (start.lng + 0.0003)).abs() < 1e-12);
        assert!((next.lat - start.lat).abs() < 1e-12);
    }

    #[test]
    fn within_counts_boundary_as_inside() {
        let square = unit_square();
        assert!(is_within(Point::new(0.5, 0.5), &square));
        assert!(is_within(Point::new(0.0, 0.5), &square));
        assert!(is_within(Point::new(1.0, 1.0), &square));
        assert!(!is_within(Point::new(1.5, 0.5), &square));
        assert!(!is_within(Point::new(-0.0001, 0.5), &square));
    }

    #[test]
    fn start_point_inside_confinement_area() {
        let area = Polygon::confinement_area();
        assert!(is_within(crate::models::DEFAULT_START, &area));
        assert!(!is_within(Point::new(-3.19, 55.95), &area));
    }

    #[test]
    fn segment_crossing_polygon_intersects() {
        let square = unit_square();
        assert!(segment_intersects_polygon(
            Point::new(-0.5, 0.5),
            Point::new(1.5, 0.5),
            &square
        ));
    }

    #[test]
    fn segment_touching_corner_intersects() {
        let square = unit_square();
        assert!(segment_intersects_polygon(
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            &square
        ));
    }

    #[test]
    fn segment_inside_polygon_intersects() {
        let square = unit_square();
        assert!(segment_intersects_polygon(
            Point::new(0.2, 0.2),
            Point::new(0.8, 0.8),
            &square
        ));
    }

    #[test]
    fn segment_outside_polygon_does_not_intersect() {
        let square = unit_square();
        assert!(!segment_intersects_polygon(
            Point::new(1.1, 0.0),
            Point::new(1.1, 1.0),
            &square
        ));
    }

    #[test]
    fn crossing_segments_detected() {
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
        ));
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        ));
    }
}
