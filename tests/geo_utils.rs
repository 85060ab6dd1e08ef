//! Tests for geo_utils module

use territory_engine::geo_utils::*;
use territory_engine::GpsPoint;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn origin() -> GpsPoint {
    GpsPoint::new(0.0, -78.5)
}

#[test]
fn test_distance_symmetry() {
    let pairs = [
        (GpsPoint::new(51.5074, -0.1278), GpsPoint::new(48.8566, 2.3522)),
        (GpsPoint::new(-33.8688, 151.2093), GpsPoint::new(-33.8690, 151.2100)),
        (GpsPoint::new(0.0, 179.9999), GpsPoint::new(0.0, -179.9999)),
        (origin(), offset_meters(&origin(), 3.0, -4.0)),
    ];
    for (a, b) in pairs {
        assert!(approx_eq(haversine_distance(&a, &b), haversine_distance(&b, &a), 1e-9));
        assert_eq!(haversine_distance(&a, &a), 0.0);
        assert!(haversine_distance(&a, &b) > 0.0);
    }
}

#[test]
fn test_distance_known_value() {
    // London to Paris is approximately 344 km
    let london = GpsPoint::new(51.5074, -0.1278);
    let paris = GpsPoint::new(48.8566, 2.3522);
    assert!(approx_eq(haversine_distance(&london, &paris), 343_560.0, 5000.0));
}

#[test]
fn test_hundred_meter_square_area() {
    let ring = vec![
        origin(),
        offset_meters(&origin(), 0.0, 100.0),
        offset_meters(&origin(), 100.0, 100.0),
        offset_meters(&origin(), 100.0, 0.0),
    ];
    let area = polygon_area(&ring);
    assert!(approx_eq(area, 10_000.0, 500.0), "area was {area}");
    assert!(area >= 100.0);
}

#[test]
fn test_area_needs_three_points() {
    let two = [origin(), offset_meters(&origin(), 50.0, 50.0)];
    assert_eq!(polygon_area(&two), 0.0);
}

#[test]
fn test_area_triangle() {
    // Right triangle with 60 m legs: 1800 m²
    let ring = [
        origin(),
        offset_meters(&origin(), 0.0, 60.0),
        offset_meters(&origin(), 60.0, 0.0),
    ];
    assert!(approx_eq(polygon_area(&ring), 1_800.0, 5.0));
}

#[test]
fn test_segments_crossing_and_parallel() {
    let p = |north: f64, east: f64| offset_meters(&origin(), north, east);

    // An X
    assert!(segments_intersect(&p(0.0, 0.0), &p(10.0, 10.0), &p(0.0, 10.0), &p(10.0, 0.0)));
    // Parallel
    assert!(!segments_intersect(&p(0.0, 0.0), &p(0.0, 10.0), &p(5.0, 0.0), &p(5.0, 10.0)));
    // Would cross if extended, but stop short
    assert!(!segments_intersect(&p(0.0, 0.0), &p(4.0, 4.0), &p(0.0, 10.0), &p(10.0, 0.0)));
    // Order of the arguments within a segment does not matter
    assert!(segments_intersect(&p(10.0, 10.0), &p(0.0, 0.0), &p(10.0, 0.0), &p(0.0, 10.0)));
}

#[test]
fn test_polyline_length_is_open() {
    let path = [
        origin(),
        offset_meters(&origin(), 0.0, 30.0),
        offset_meters(&origin(), 40.0, 30.0),
    ];
    // 30 + 40, without the 50 m closing edge
    assert!(approx_eq(polyline_length(&path), 70.0, 0.01));
}

#[test]
fn test_compute_bounds() {
    let track = vec![
        GpsPoint::new(51.50, -0.13),
        GpsPoint::new(51.51, -0.12),
        GpsPoint::new(51.505, -0.125),
    ];
    let bounds = compute_bounds(&track);
    assert_eq!(bounds.min_lat, 51.50);
    assert_eq!(bounds.max_lat, 51.51);
    assert_eq!(bounds.min_lng, -0.13);
    assert_eq!(bounds.max_lng, -0.12);
}
