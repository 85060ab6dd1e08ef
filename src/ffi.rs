//! Mobile bindings (UniFFI).
//!
//! The session controller lives on the platform side and owns the tick
//! timer; it drives a [`TerritoryTracker`] and renders what comes back.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::{
    geo_utils, init_logging, GeoSample, GpsPoint, PathAccumulator, PathUpdate, Territory,
    TerritoryError, TrackingConfig, ValidationResult,
};

// ========================================================================
// Stateless helpers
// ========================================================================

/// Reference tunables, for platforms that want to tweak a few fields.
#[uniffi::export]
pub fn default_tracking_config() -> TrackingConfig {
    TrackingConfig::default()
}

/// Validate a finished path without a tracker.
#[uniffi::export]
pub fn ffi_validate_territory(points: Vec<GpsPoint>, config: TrackingConfig) -> ValidationResult {
    init_logging();
    debug!("[TerritoryEngineRust] Validating {} points", points.len());
    crate::validate_territory(&points, &config)
}

#[uniffi::export]
pub fn ffi_distance_meters(a: GpsPoint, b: GpsPoint) -> f64 {
    geo_utils::haversine_distance(&a, &b)
}

#[uniffi::export]
pub fn ffi_polygon_area(points: Vec<GpsPoint>) -> f64 {
    geo_utils::polygon_area(&points)
}

// ========================================================================
// Tracker object
// ========================================================================

/// A [`PathAccumulator`] shared with the platform.
///
/// The mutex only serializes calls; the platform is expected to call from a
/// single timer anyway.
#[derive(uniffi::Object)]
pub struct TerritoryTracker {
    inner: Mutex<PathAccumulator>,
}

impl TerritoryTracker {
    fn lock(&self) -> MutexGuard<'_, PathAccumulator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[uniffi::export]
impl TerritoryTracker {
    /// Create a tracker. An invalid config is refused with
    /// [`TerritoryError::InvalidConfig`].
    #[uniffi::constructor]
    pub fn new(config: TrackingConfig) -> Result<Arc<Self>, TerritoryError> {
        init_logging();
        let accumulator = PathAccumulator::new(config).inspect_err(|e| {
            warn!("[TerritoryEngineRust] Tracker not created: {}", e);
        })?;
        info!("[TerritoryEngineRust] Tracker created");
        Ok(Arc::new(Self { inner: Mutex::new(accumulator) }))
    }

    pub fn start(&self, initial_fix: GeoSample) -> bool {
        self.lock().start(initial_fix)
    }

    pub fn offer(&self, raw_fix: GeoSample) -> PathUpdate {
        self.lock().offer(raw_fix)
    }

    /// Stop tracking; returns the points walked so far.
    pub fn stop(&self) -> Vec<GpsPoint> {
        self.lock()
            .stop()
            .map(|session| session.into_points())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Claim the closed, valid territory, if there is one.
    pub fn claim(&self) -> Option<Territory> {
        let tracker = self.lock();
        let session = tracker.session()?;
        match Territory::claim(session, tracker.config()) {
            Ok(territory) => Some(territory),
            Err(e) => {
                info!("[TerritoryEngineRust] No claim: {}", e);
                None
            }
        }
    }

    pub fn point_count(&self) -> u32 {
        self.lock().point_count()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_closed()
    }

    pub fn is_tracking(&self) -> bool {
        self.lock().is_tracking()
    }

    pub fn speed_warning_active(&self) -> bool {
        self.lock().speed_warning_active()
    }

    pub fn points(&self) -> Vec<GpsPoint> {
        self.lock().points().to_vec()
    }

    pub fn validation(&self) -> Option<ValidationResult> {
        self.lock().validation().cloned()
    }

    pub fn distance_to_start_meters(&self) -> Option<f64> {
        self.lock().distance_to_start_meters()
    }

    /// Description of why the last session was cut short, if it was.
    pub fn last_stop_reason(&self) -> Option<String> {
        self.lock().last_stop_reason().map(|e| e.to_string())
    }
}
