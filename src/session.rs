//! # Path Accumulation
//!
//! [`PathAccumulator`] is the single entry point a session controller drives:
//! an external ticker calls [`PathAccumulator::offer`] with the latest fix at a
//! fixed interval, and the accumulator runs the speed guard, the displacement
//! filter, closure detection and (once per closure) validation.
//!
//! ## Lifecycle
//!
//! ```text
//! start(fix) ──► offer(fix)* ──► closed ──► stop() / clear()
//!                    │
//!                    └── RejectAndStop ──► session discarded
//! ```
//!
//! Calls must be serialized; nothing here blocks or locks.

use log::{debug, info, warn};

use crate::geo_utils::haversine_distance;
use crate::validation::{validate_territory, ValidationResult};
use crate::{ClosureDetector, GeoSample, GpsPoint, Result, SpeedDecision, SpeedGuard, TerritoryError, TrackingConfig};

// ============================================================================
// Tracking Session
// ============================================================================

/// Ordered path points of one tracking session.
///
/// Points are append-only and never reordered. Once closed, a session accepts
/// no more points and stays closed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSession {
    points: Vec<GpsPoint>,
    closed: bool,
    last_raw_fix: Option<GeoSample>,
    validation: Option<ValidationResult>,
}

impl TrackingSession {
    /// Start a session whose first point is `first_fix`, unfiltered.
    pub fn new(first_fix: GeoSample) -> Self {
        Self {
            points: vec![first_fix.point],
            closed: false,
            last_raw_fix: Some(first_fix),
            validation: None,
        }
    }

    /// Append a point. Returns `false` (and does nothing) once closed.
    pub fn append(&mut self, point: GpsPoint) -> bool {
        if self.closed {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Remember the latest raw fix, appended or not. Ignored once closed.
    pub fn record_fix(&mut self, fix: GeoSample) {
        if !self.closed {
            self.last_raw_fix = Some(fix);
        }
    }

    pub(crate) fn mark_closed(&mut self) {
        self.closed = true;
    }

    pub(crate) fn set_validation(&mut self, result: ValidationResult) {
        self.validation = Some(result);
    }

    pub fn points(&self) -> &[GpsPoint] {
        &self.points
    }

    pub fn point_count(&self) -> u32 {
        u32::try_from(self.points.len()).unwrap_or(u32::MAX)
    }

    pub fn last_point(&self) -> Option<&GpsPoint> {
        self.points.last()
    }

    pub fn last_raw_fix(&self) -> Option<&GeoSample> {
        self.last_raw_fix.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Validation outcome recorded when the session closed.
    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    pub fn into_points(self) -> Vec<GpsPoint> {
        self.points
    }
}

// ============================================================================
// Offer Results
// ============================================================================

/// What happened to an offered fix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OfferStatus {
    /// The fix became a new path point.
    Appended,
    /// Too close to the last point; discarded.
    BelowDisplacement,
    /// The loop already closed; nothing changes any more.
    SessionClosed,
    /// No session is running.
    NotTracking,
    /// Non-finite or out-of-range coordinate.
    InvalidFix,
    /// The speed guard ended the session.
    StoppedForSpeed { speed_kmh: f64 },
}

/// Result of [`PathAccumulator::offer`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathUpdate {
    pub status: OfferStatus,
    /// Points in the session after this offer (at the moment of stopping, for a speed stop)
    pub point_count: u32,
    /// True only on the offer that closed the loop
    pub closure_detected: bool,
    /// Set while the user is above the warning speed
    pub speed_warning_kmh: Option<f64>,
    /// Validation outcome, present only when `closure_detected`
    pub validation: Option<ValidationResult>,
}

impl PathUpdate {
    fn unchanged(status: OfferStatus, point_count: u32, speed_warning_kmh: Option<f64>) -> Self {
        Self {
            status,
            point_count,
            closure_detected: false,
            speed_warning_kmh,
            validation: None,
        }
    }

    pub fn appended(&self) -> bool {
        self.status == OfferStatus::Appended
    }
}

// ============================================================================
// Path Accumulator
// ============================================================================

/// Owns the active session and the filters applied to each offered fix.
#[derive(Debug, Clone)]
pub struct PathAccumulator {
    config: TrackingConfig,
    speed_guard: SpeedGuard,
    closure: ClosureDetector,
    session: Option<TrackingSession>,
    stopped_at_kmh: Option<f64>,
}

impl PathAccumulator {
    /// Create an idle accumulator.
    ///
    /// # Errors
    ///
    /// [`TerritoryError::InvalidConfig`] if `config` fails [`TrackingConfig::validate`].
    pub fn new(config: TrackingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            speed_guard: SpeedGuard::from_config(&config),
            closure: ClosureDetector::from_config(&config),
            config,
            session: None,
            stopped_at_kmh: None,
        })
    }

    /// Begin a new session at the current known fix.
    ///
    /// Any previous session is discarded. The fix becomes the first path point
    /// and the speed guard's reference. Returns `false` (staying idle) if the
    /// fix is not a valid coordinate.
    pub fn start(&mut self, initial_fix: GeoSample) -> bool {
        if !initial_fix.point.is_valid() {
            warn!("[PathAccumulator] Refusing to start at invalid fix {:?}", initial_fix.point);
            return false;
        }

        self.speed_guard.reset();
        self.speed_guard.evaluate(&initial_fix);
        self.stopped_at_kmh = None;
        self.session = Some(TrackingSession::new(initial_fix));

        info!(
            "[PathAccumulator] Session started at ({:.6}, {:.6})",
            initial_fix.point.latitude, initial_fix.point.longitude
        );
        true
    }

    /// Offer the latest raw fix to the running session.
    pub fn offer(&mut self, raw_fix: GeoSample) -> PathUpdate {
        let Some(session) = self.session.as_mut() else {
            return PathUpdate::unchanged(OfferStatus::NotTracking, 0, None);
        };
        if session.is_closed() {
            return PathUpdate::unchanged(OfferStatus::SessionClosed, session.point_count(), None);
        }
        if !raw_fix.point.is_valid() {
            debug!("[PathAccumulator] Ignoring invalid fix {:?}", raw_fix.point);
            return PathUpdate::unchanged(OfferStatus::InvalidFix, session.point_count(), None);
        }

        let speed_warning_kmh = match self.speed_guard.evaluate(&raw_fix) {
            SpeedDecision::RejectAndStop { speed_kmh } => {
                let point_count = session.point_count();
                self.halt_for_speed(speed_kmh);
                return PathUpdate::unchanged(OfferStatus::StoppedForSpeed { speed_kmh }, point_count, None);
            }
            SpeedDecision::AcceptWithWarning { speed_kmh } => Some(speed_kmh),
            SpeedDecision::Accept => None,
        };

        session.record_fix(raw_fix);

        if let Some(last) = session.last_point() {
            let displacement = haversine_distance(last, &raw_fix.point);
            if displacement < self.config.min_displacement_meters {
                debug!("[PathAccumulator] Discarding fix {:.1}m from last point", displacement);
                return PathUpdate::unchanged(
                    OfferStatus::BelowDisplacement,
                    session.point_count(),
                    speed_warning_kmh,
                );
            }
        }

        session.append(raw_fix.point);
        debug!("[PathAccumulator] Point {} appended", session.point_count());

        let closure_detected = self.closure.check_closure(session);
        let validation = if closure_detected {
            let result = validate_territory(session.points(), &self.config);
            match result.failure {
                None => info!(
                    "[PathAccumulator] Territory valid: {:.0} m² over {:.0}m",
                    result.enclosed_area_sq_meters, result.path_length_meters
                ),
                Some(reason) => info!("[PathAccumulator] Territory rejected: {}", reason),
            }
            session.set_validation(result.clone());
            Some(result)
        } else {
            None
        };

        PathUpdate {
            status: OfferStatus::Appended,
            point_count: session.point_count(),
            closure_detected,
            speed_warning_kmh,
            validation,
        }
    }

    fn halt_for_speed(&mut self, speed_kmh: f64) {
        warn!("[PathAccumulator] Stopping session: {:.1} km/h", speed_kmh);
        self.speed_guard.reset();
        self.session = None;
        self.stopped_at_kmh = Some(speed_kmh);
    }

    /// End tracking and hand the session (if any) back to the caller.
    pub fn stop(&mut self) -> Option<TrackingSession> {
        self.speed_guard.reset();
        let session = self.session.take();
        if let Some(ref s) = session {
            info!("[PathAccumulator] Session stopped with {} points", s.point_count());
        }
        session
    }

    /// Discard the session and all guard state.
    pub fn clear(&mut self) {
        self.speed_guard.reset();
        self.session = None;
        self.stopped_at_kmh = None;
        info!("[PathAccumulator] Cleared");
    }

    /// Why the last session ended early, if the speed guard ended it.
    pub fn last_stop_reason(&self) -> Option<TerritoryError> {
        self.stopped_at_kmh
            .map(|speed_kmh| TerritoryError::ExcessiveSpeed { speed_kmh })
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&TrackingSession> {
        self.session.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.session.as_ref().is_some_and(TrackingSession::is_closed)
    }

    pub fn point_count(&self) -> u32 {
        self.session.as_ref().map_or(0, TrackingSession::point_count)
    }

    pub fn points(&self) -> &[GpsPoint] {
        self.session.as_ref().map(TrackingSession::points).unwrap_or(&[])
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.session.as_ref().and_then(TrackingSession::validation)
    }

    pub fn speed_warning_active(&self) -> bool {
        self.speed_guard.warning_active()
    }

    /// How far the latest fix is from closing the loop.
    pub fn distance_to_start_meters(&self) -> Option<f64> {
        self.session.as_ref().and_then(ClosureDetector::distance_to_start)
    }
}
