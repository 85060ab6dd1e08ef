//! # Geographic Utilities
//!
//! Numeric primitives shared by the speed guard, closure detector and validator.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`polyline_length`] | Open-path length of a GPS track in meters |
//! | [`polygon_area`] | Enclosed area of a ring, with spherical correction |
//! | [`segments_intersect`] | Planar crossing test for two segments |
//! | [`compute_bounds`] | Bounding box of a GPS track |
//! | [`compute_center`] | Centroid of a GPS track |
//! | [`offset_meters`] | Move a point a given number of meters north/east |
//!
//! ## Example
//!
//! ```rust
//! use territory_engine::{GpsPoint, geo_utils};
//!
//! let origin = GpsPoint::new(0.0, 0.0);
//! let ring = vec![
//!     origin,
//!     geo_utils::offset_meters(&origin, 0.0, 100.0),
//!     geo_utils::offset_meters(&origin, 100.0, 100.0),
//!     geo_utils::offset_meters(&origin, 100.0, 0.0),
//! ];
//!
//! let area = geo_utils::polygon_area(&ring);
//! assert!((area - 10_000.0).abs() < 50.0);
//! ```
//!
//! ## Algorithm Notes
//!
//! ### Spherical area
//!
//! [`polygon_area`] is the shoelace sum taken over longitude deltas, weighted by
//! `2 + sin(lat_i) + sin(lat_i+1)`, which folds the sphere's curvature into the
//! planar formula. It is accurate for rings far smaller than the Earth.
//!
//! ### Planar intersection
//!
//! [`segments_intersect`] treats longitude as `x` and latitude as `y` without
//! scaling longitude by `cos(latitude)`. At the scale of a walked loop the
//! distortion does not change whether two segments cross, but collinear and
//! touching segments are not reported as crossing.

use geo::{Coord, Distance, HaversineMeasure, Point};
use crate::{Bounds, GpsPoint};

/// Spherical Earth radius shared by every distance, area and offset computation, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two GPS points using the Haversine formula.
///
/// Measured on a sphere of radius [`EARTH_RADIUS_METERS`]. Symmetric in its
/// arguments and zero for identical points.
///
/// # Example
///
/// ```rust
/// use territory_engine::{GpsPoint, geo_utils};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    HaversineMeasure::new(EARTH_RADIUS_METERS).distance(point1, point2)
}

/// Calculate the total length of an open polyline in meters.
///
/// Sums the haversine distance between consecutive points; the last point is
/// not joined back to the first. Empty or single-point tracks return 0.0.
pub fn polyline_length(points: &[GpsPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Move `origin` by the given distances along the local north and east axes.
///
/// Uses a spherical Earth of radius [`EARTH_RADIUS_METERS`]. Intended for
/// building test rings and simulated walks, not for navigation.
pub fn offset_meters(origin: &GpsPoint, north_meters: f64, east_meters: f64) -> GpsPoint {
    let d_lat = north_meters / EARTH_RADIUS_METERS;
    let d_lng = east_meters / (EARTH_RADIUS_METERS * origin.latitude.to_radians().cos());
    GpsPoint::new(
        origin.latitude + d_lat.to_degrees(),
        origin.longitude + d_lng.to_degrees(),
    )
}

// =============================================================================
// Area
// =============================================================================

/// Area enclosed by a ring of GPS points, in square meters.
///
/// The last point is implicitly connected back to the first. Winding order does
/// not matter (the absolute value is returned). Fewer than 3 points enclose
/// nothing and return 0.0.
pub fn polygon_area(points: &[GpsPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let next = points.iter().cycle().skip(1);
    let sum: f64 = points
        .iter()
        .zip(next)
        .map(|(a, b)| {
            let d_lng = (b.longitude - a.longitude).to_radians();
            d_lng * (2.0 + a.latitude.to_radians().sin() + b.latitude.to_radians().sin())
        })
        .sum();

    (sum * EARTH_RADIUS_METERS * EARTH_RADIUS_METERS / 2.0).abs()
}

// =============================================================================
// Segment Intersection
// =============================================================================

#[inline]
fn planar(p: &GpsPoint) -> Coord {
    Coord { x: p.longitude, y: p.latitude }
}

/// True when `a -> b -> c` turns counter-clockwise (strictly).
#[inline]
fn ccw(a: Coord, b: Coord, c: Coord) -> bool {
    (c.y - a.y) * (b.x - a.x) - (b.y - a.y) * (c.x - a.x) > 0.0
}

/// Check whether segment `p1-p2` crosses segment `p3-p4`.
///
/// Orientation test in (longitude, latitude) space: the segments cross when each
/// one separates the endpoints of the other. Collinear, overlapping and
/// endpoint-touching configurations report `false`.
///
/// # Example
///
/// ```rust
/// use territory_engine::{GpsPoint, geo_utils};
///
/// let a = GpsPoint::new(0.0, 0.0);
/// let b = GpsPoint::new(0.001, 0.001);
/// let c = GpsPoint::new(0.0, 0.001);
/// let d = GpsPoint::new(0.001, 0.0);
///
/// assert!(geo_utils::segments_intersect(&a, &b, &c, &d));
/// assert!(!geo_utils::segments_intersect(&a, &c, &d, &b));
/// ```
pub fn segments_intersect(p1: &GpsPoint, p2: &GpsPoint, p3: &GpsPoint, p4: &GpsPoint) -> bool {
    let (a, b, c, d) = (planar(p1), planar(p2), planar(p3), planar(p4));
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}

// =============================================================================
// Bounding Box / Center
// =============================================================================

/// Compute the bounding box of a GPS track.
///
/// For empty input, returns a bounds with MIN/MAX values; prefer
/// [`Bounds::from_points`] when the track may be empty.
pub fn compute_bounds(points: &[GpsPoint]) -> Bounds {
    let mut min_lat = f64::MAX;
    let mut max_lat = f64::MIN;
    let mut min_lng = f64::MAX;
    let mut max_lng = f64::MIN;

    for p in points {
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
        min_lng = min_lng.min(p.longitude);
        max_lng = max_lng.max(p.longitude);
    }

    Bounds { min_lat, max_lat, min_lng, max_lng }
}

/// Compute the geographic center (centroid) of a GPS track.
///
/// Returns the arithmetic mean of all latitude and longitude values, which is
/// fine for a walked loop. Returns (0, 0) for empty input.
pub fn compute_center(points: &[GpsPoint]) -> GpsPoint {
    if points.is_empty() {
        return GpsPoint::new(0.0, 0.0);
    }

    let sum_lat: f64 = points.iter().map(|p| p.latitude).sum();
    let sum_lng: f64 = points.iter().map(|p| p.longitude).sum();
    let n = points.len() as f64;

    GpsPoint::new(sum_lat / n, sum_lng / n)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = GpsPoint::new(51.5074, -0.1278);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_distance_symmetric() {
        let a = GpsPoint::new(51.5074, -0.1278);
        let b = GpsPoint::new(51.5090, -0.1300);
        assert!(approx_eq(haversine_distance(&a, &b), haversine_distance(&b, &a), 1e-9));
        assert!(haversine_distance(&a, &b) > 0.0);
    }

    #[test]
    fn test_haversine_distance_uses_earth_radius() {
        // One degree of arc along the equator
        let a = GpsPoint::new(0.0, 0.0);
        let b = GpsPoint::new(0.0, 1.0);
        let expected = EARTH_RADIUS_METERS * 1f64.to_radians();
        assert!(approx_eq(haversine_distance(&a, &b), expected, 1e-6));
    }

    #[test]
    fn test_offset_and_distance_share_radius() {
        let origin = GpsPoint::new(0.0, 0.0);
        let east = offset_meters(&origin, 0.0, 10.0);
        assert!(approx_eq(haversine_distance(&origin, &east), 10.0, 1e-6));
    }

    #[test]
    fn test_polyline_length_short_inputs() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[GpsPoint::new(51.5074, -0.1278)]), 0.0);
    }

    #[test]
    fn test_offset_meters_matches_distance() {
        let origin = GpsPoint::new(47.37, 8.55);
        let north = offset_meters(&origin, 100.0, 0.0);
        let east = offset_meters(&origin, 0.0, 100.0);
        assert!(approx_eq(haversine_distance(&origin, &north), 100.0, 0.1));
        assert!(approx_eq(haversine_distance(&origin, &east), 100.0, 0.1));
    }

    #[test]
    fn test_polygon_area_degenerate() {
        let a = GpsPoint::new(0.0, 0.0);
        let b = GpsPoint::new(0.001, 0.0);
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&[a, b]), 0.0);
    }

    #[test]
    fn test_polygon_area_winding_independent() {
        let origin = GpsPoint::new(0.0, 0.0);
        let mut ring = vec![
            origin,
            offset_meters(&origin, 0.0, 100.0),
            offset_meters(&origin, 100.0, 100.0),
            offset_meters(&origin, 100.0, 0.0),
        ];
        let forward = polygon_area(&ring);
        ring.reverse();
        assert!(approx_eq(forward, polygon_area(&ring), 1e-6));
        assert!(approx_eq(forward, 10_000.0, 1.0));
    }

    #[test]
    fn test_segments_collinear_not_crossing() {
        let a = GpsPoint::new(0.0, 0.0);
        let b = GpsPoint::new(0.0, 0.001);
        let c = GpsPoint::new(0.0, 0.0005);
        let d = GpsPoint::new(0.0, 0.002);
        // Overlapping along the same line: not reported
        assert!(!segments_intersect(&a, &b, &c, &d));
    }

    #[test]
    fn test_compute_center_empty() {
        let center = compute_center(&[]);
        assert_eq!(center.latitude, 0.0);
        assert_eq!(center.longitude, 0.0);
    }
}
