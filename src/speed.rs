//! Instantaneous speed gating for incoming fixes.
//!
//! Speed is measured between consecutive evaluated samples, not averaged over
//! the session, so a single jump (a car ride, a GPS teleport) is caught on the
//! tick it happens.

use log::{debug, warn};

use crate::geo_utils::haversine_distance;
use crate::{GeoSample, TrackingConfig};

/// Outcome of evaluating one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpeedDecision {
    /// Normal pace (or nothing to compare against yet).
    Accept,
    /// Above the warning threshold; tracking continues.
    AcceptWithWarning { speed_kmh: f64 },
    /// Above the stop threshold; the caller must end the session.
    RejectAndStop { speed_kmh: f64 },
}

impl SpeedDecision {
    pub fn is_stop(&self) -> bool {
        matches!(self, SpeedDecision::RejectAndStop { .. })
    }
}

/// Stateful speed filter.
#[derive(Debug, Clone)]
pub struct SpeedGuard {
    warning_kmh: f64,
    stop_kmh: f64,
    last_sample: Option<GeoSample>,
    last_speed_kmh: Option<f64>,
    warning_active: bool,
}

impl SpeedGuard {
    pub fn new(warning_kmh: f64, stop_kmh: f64) -> Self {
        Self {
            warning_kmh,
            stop_kmh,
            last_sample: None,
            last_speed_kmh: None,
            warning_active: false,
        }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(config.speed_warning_kmh, config.speed_stop_kmh)
    }

    /// Classify `sample` against the previously evaluated one.
    ///
    /// The first sample after construction or [`reset`](Self::reset) is always
    /// accepted and becomes the reference. A sample whose timestamp is not
    /// after the reference is accepted without touching any state. Every other
    /// sample replaces the reference, whatever the decision.
    pub fn evaluate(&mut self, sample: &GeoSample) -> SpeedDecision {
        let Some(previous) = self.last_sample else {
            self.last_sample = Some(*sample);
            return SpeedDecision::Accept;
        };

        let elapsed_seconds = sample.seconds_since(&previous);
        if elapsed_seconds <= 0.0 {
            debug!(
                "[SpeedGuard] Ignoring sample at {}ms (reference at {}ms)",
                sample.captured_at_ms, previous.captured_at_ms
            );
            return SpeedDecision::Accept;
        }

        let speed_kmh = haversine_distance(&previous.point, &sample.point) / elapsed_seconds * 3.6;
        self.last_sample = Some(*sample);
        self.last_speed_kmh = Some(speed_kmh);

        if speed_kmh > self.stop_kmh {
            warn!("[SpeedGuard] {:.1} km/h exceeds stop limit {:.1} km/h", speed_kmh, self.stop_kmh);
            self.warning_active = true;
            SpeedDecision::RejectAndStop { speed_kmh }
        } else if speed_kmh > self.warning_kmh {
            if !self.warning_active {
                warn!("[SpeedGuard] {:.1} km/h exceeds warning limit {:.1} km/h", speed_kmh, self.warning_kmh);
            }
            self.warning_active = true;
            SpeedDecision::AcceptWithWarning { speed_kmh }
        } else {
            self.warning_active = false;
            SpeedDecision::Accept
        }
    }

    /// Forget the reference sample and clear the warning.
    pub fn reset(&mut self) {
        self.last_sample = None;
        self.last_speed_kmh = None;
        self.warning_active = false;
    }

    pub fn warning_active(&self) -> bool {
        self.warning_active
    }

    /// Speed measured by the most recent evaluation that had a reference.
    pub fn last_speed_kmh(&self) -> Option<f64> {
        self.last_speed_kmh
    }

    pub fn reference(&self) -> Option<&GeoSample> {
        self.last_sample.as_ref()
    }
}
