//! Loop closure detection.

use log::info;

use crate::geo_utils::haversine_distance;
use crate::{TrackingConfig, TrackingSession};

/// Decides when a walked path has come back to its start.
#[derive(Debug, Clone, Copy)]
pub struct ClosureDetector {
    closure_distance_meters: f64,
    min_path_points: u32,
}

impl ClosureDetector {
    pub fn new(closure_distance_meters: f64, min_path_points: u32) -> Self {
        Self { closure_distance_meters, min_path_points }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(config.closure_distance_meters, config.min_path_points)
    }

    /// Close `session` if its latest raw fix is back near the first point.
    ///
    /// Returns `true` only on the call that closes the session. Already closed
    /// sessions and sessions with fewer than the minimum points are left alone.
    /// Validation is the caller's job.
    pub fn check_closure(&self, session: &mut TrackingSession) -> bool {
        if session.is_closed() || session.point_count() < self.min_path_points {
            return false;
        }

        let Some(distance) = Self::distance_to_start(session) else {
            return false;
        };
        if distance > self.closure_distance_meters {
            return false;
        }

        session.mark_closed();
        info!(
            "[ClosureDetector] Loop closed with {} points ({:.1}m from start)",
            session.point_count(),
            distance
        );
        true
    }

    /// Distance from the most recent raw fix to the first path point.
    pub fn distance_to_start(session: &TrackingSession) -> Option<f64> {
        let first = session.points().first()?;
        let fix = session.last_raw_fix()?;
        Some(haversine_distance(&fix.point, first))
    }
}
