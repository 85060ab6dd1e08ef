//! Tests for TrackingConfig

use std::time::Duration;

use territory_engine::{PathAccumulator, TerritoryError, TrackingConfig};

#[test]
fn test_reference_defaults() {
    let config = TrackingConfig::default();
    assert_eq!(config.tracking_interval(), Duration::from_secs(2));
    assert_eq!(config.min_displacement_meters, 10.0);
    assert_eq!(config.closure_distance_meters, 30.0);
    assert_eq!(config.min_path_points, 10);
    assert_eq!(config.min_total_distance_meters, 50.0);
    assert_eq!(config.min_enclosed_area_sq_meters, 100.0);
    assert_eq!(config.speed_warning_kmh, 25.0);
    assert_eq!(config.speed_stop_kmh, 50.0);
}

#[test]
fn test_pedestrian_variant() {
    let config = TrackingConfig::pedestrian();
    assert_eq!(config.speed_warning_kmh, 15.0);
    assert_eq!(config.speed_stop_kmh, 30.0);
    assert_eq!(config.min_path_points, TrackingConfig::default().min_path_points);
}

#[test]
fn test_accumulator_rejects_bad_config() {
    let bad = [
        TrackingConfig { tracking_interval_seconds: 0.0, ..TrackingConfig::default() },
        TrackingConfig { min_displacement_meters: -1.0, ..TrackingConfig::default() },
        TrackingConfig { min_path_points: 2, ..TrackingConfig::default() },
        TrackingConfig { speed_stop_kmh: 25.0, ..TrackingConfig::default() },
        TrackingConfig { min_enclosed_area_sq_meters: f64::INFINITY, ..TrackingConfig::default() },
    ];
    for config in bad {
        assert!(
            matches!(PathAccumulator::new(config.clone()), Err(TerritoryError::InvalidConfig(_))),
            "accepted {config:?}"
        );
    }
}

#[cfg(feature = "serde")]
mod json {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TrackingConfig::from_json(r#"{ "closure_distance_meters": 20.0 }"#).unwrap();
        assert_eq!(config.closure_distance_meters, 20.0);
        assert_eq!(config.min_displacement_meters, 10.0);
    }

    #[test]
    fn test_malformed_json() {
        let err = TrackingConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TerritoryError::ConfigParse(_)));
    }

    #[test]
    fn test_json_is_validated() {
        let err = TrackingConfig::from_json(r#"{ "speed_warning_kmh": 80.0 }"#).unwrap_err();
        assert!(matches!(err, TerritoryError::InvalidConfig(_)));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = TrackingConfig::pedestrian();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(TrackingConfig::from_json(&json).unwrap(), config);
    }
}
