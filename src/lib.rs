//! # Territory Engine
//!
//! GPS path sampling and validation for walked territory claims.
//!
//! A user walks a closed loop; their location fixes are filtered into a path and,
//! once the path returns to its start, validated as an enclosed territory.
//!
//! This library provides:
//! - Speed gating of raw fixes (warning / forced stop)
//! - Minimum-displacement path accumulation with loop-closure detection
//! - Territory validation: point count, distance, self-intersection, enclosed area
//!
//! ## Features
//!
//! - **`serde`** - Serialize value types and load [`TrackingConfig`] from JSON
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use territory_engine::{GeoSample, GpsPoint, PathAccumulator, TrackingConfig};
//!
//! let mut tracker = PathAccumulator::new(TrackingConfig::default()).unwrap();
//! tracker.start(GeoSample::new(GpsPoint::new(51.5074, -0.1278), 0));
//!
//! // An external ticker offers the latest fix every couple of seconds
//! let update = tracker.offer(GeoSample::new(GpsPoint::new(51.5076, -0.1278), 10_000));
//! println!("{} points so far", update.point_count);
//!
//! if let Some(result) = update.validation {
//!     println!("Closed loop, valid: {}", result.valid);
//! }
//! ```

use std::time::Duration;

// Unified error handling
pub mod error;
pub use error::{Result, TerritoryError};

// Geometry kernel (distance, area, segment intersection)
pub mod geo_utils;

// Instantaneous speed gating
pub mod speed;
pub use speed::{SpeedDecision, SpeedGuard};

// Loop closure detection
pub mod closure;
pub use closure::ClosureDetector;

// Path accumulation and session lifecycle
pub mod session;
pub use session::{OfferStatus, PathAccumulator, PathUpdate, TrackingSession};

// Territory validation and claims
pub mod validation;
pub use validation::{path_self_intersects, validate_territory, Territory, ValidationFailure, ValidationResult};

#[cfg(feature = "ffi")]
mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("TerritoryEngineRust")
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A WGS-84 coordinate with latitude and longitude in decimal degrees.
///
/// # Example
/// ```
/// use territory_engine::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// One location fix as delivered by the location source.
///
/// Timestamps are Unix milliseconds. The engine never assumes they are
/// monotonic; duplicates and stale values are tolerated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoSample {
    pub point: GpsPoint,
    pub captured_at_ms: i64,
}

impl GeoSample {
    /// Create a new sample.
    pub fn new(point: GpsPoint, captured_at_ms: i64) -> Self {
        Self { point, captured_at_ms }
    }

    /// Seconds elapsed since `earlier` (negative if `earlier` is actually later).
    pub fn seconds_since(&self, earlier: &GeoSample) -> f64 {
        (self.captured_at_ms - earlier.captured_at_ms) as f64 / 1000.0
    }
}

/// Bounding box for a path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(geo_utils::compute_bounds(points))
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Tunables for sampling, closure and validation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackingConfig {
    /// Period of the external sampling tick.
    /// Default: 2.0 seconds
    pub tracking_interval_seconds: f64,

    /// Fixes closer than this to the last path point are discarded.
    /// Default: 10.0 meters
    pub min_displacement_meters: f64,

    /// The loop closes when a fix comes within this distance of the first point.
    /// Default: 30.0 meters
    pub closure_distance_meters: f64,

    /// Points required before closure is considered and for a valid territory.
    /// Default: 10
    pub min_path_points: u32,

    /// Minimum open-path length for a valid territory.
    /// Default: 50.0 meters
    pub min_total_distance_meters: f64,

    /// Minimum enclosed area for a valid territory.
    /// Default: 100.0 square meters
    pub min_enclosed_area_sq_meters: f64,

    /// Speeds above this raise a warning but keep tracking.
    /// Default: 25.0 km/h
    pub speed_warning_kmh: f64,

    /// Speeds above this terminate the session.
    /// Default: 50.0 km/h
    pub speed_stop_kmh: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tracking_interval_seconds: 2.0,
            min_displacement_meters: 10.0,
            closure_distance_meters: 30.0,
            min_path_points: 10,
            min_total_distance_meters: 50.0,
            min_enclosed_area_sq_meters: 100.0,
            speed_warning_kmh: 25.0,
            speed_stop_kmh: 50.0,
        }
    }
}

impl TrackingConfig {
    /// Defaults with the stricter walking-pace speed limits (15 km/h warning, 30 km/h stop).
    pub fn pedestrian() -> Self {
        Self {
            speed_warning_kmh: 15.0,
            speed_stop_kmh: 30.0,
            ..Self::default()
        }
    }

    /// Check that the thresholds are usable together.
    ///
    /// # Errors
    ///
    /// [`TerritoryError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("tracking_interval_seconds", self.tracking_interval_seconds),
            ("min_displacement_meters", self.min_displacement_meters),
            ("closure_distance_meters", self.closure_distance_meters),
            ("min_total_distance_meters", self.min_total_distance_meters),
            ("min_enclosed_area_sq_meters", self.min_enclosed_area_sq_meters),
            ("speed_warning_kmh", self.speed_warning_kmh),
            ("speed_stop_kmh", self.speed_stop_kmh),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(TerritoryError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if self.tracking_interval_seconds == 0.0 {
            return Err(TerritoryError::InvalidConfig(
                "tracking_interval_seconds must be greater than zero".to_string(),
            ));
        }
        // Area and intersection checks are meaningless below a triangle
        if self.min_path_points < 3 {
            return Err(TerritoryError::InvalidConfig(format!(
                "min_path_points must be at least 3, got {}",
                self.min_path_points
            )));
        }
        if self.speed_stop_kmh <= self.speed_warning_kmh {
            return Err(TerritoryError::InvalidConfig(format!(
                "speed_stop_kmh ({}) must exceed speed_warning_kmh ({})",
                self.speed_stop_kmh, self.speed_warning_kmh
            )));
        }
        Ok(())
    }

    /// The sampling tick period, for whoever schedules [`PathAccumulator::offer`].
    pub fn tracking_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.tracking_interval_seconds)
            .unwrap_or(Duration::from_secs(2))
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    ///
    /// # Example
    /// ```
    /// use territory_engine::TrackingConfig;
    ///
    /// let config = TrackingConfig::from_json(r#"{"speed_stop_kmh": 40.0}"#).unwrap();
    /// assert_eq!(config.speed_stop_kmh, 40.0);
    /// assert_eq!(config.min_path_points, 10);
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TerritoryError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(51.5074, -0.1278).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_seconds_since() {
        let a = GeoSample::new(GpsPoint::new(0.0, 0.0), 1_000);
        let b = GeoSample::new(GpsPoint::new(0.0, 0.0), 3_500);
        assert_eq!(b.seconds_since(&a), 2.5);
        assert_eq!(a.seconds_since(&b), -2.5);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(TrackingConfig::default().validate().is_ok());
        assert!(TrackingConfig::pedestrian().validate().is_ok());
        assert_eq!(TrackingConfig::default().tracking_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_config_rejects_inverted_speed_limits() {
        let config = TrackingConfig {
            speed_warning_kmh: 60.0,
            ..TrackingConfig::default()
        };
        assert!(matches!(config.validate(), Err(TerritoryError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_nan() {
        let config = TrackingConfig {
            closure_distance_meters: f64::NAN,
            ..TrackingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("closure_distance_meters"));
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = Bounds::from_points(&[GpsPoint::new(51.50, -0.10), GpsPoint::new(51.52, -0.12)]).unwrap();
        assert_eq!(bounds.min_lat, 51.50);
        assert_eq!(bounds.max_lat, 51.52);
        assert_eq!(bounds.min_lng, -0.12);
        assert_eq!(bounds.max_lng, -0.10);
        assert!(Bounds::from_points(&[]).is_none());
    }
}
