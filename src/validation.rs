//! # Territory Validation
//!
//! Turns a closed path into an accepted or rejected territory.
//!
//! ## Checks
//!
//! Run in this order; the first failure wins:
//!
//! 1. Point count (`min_path_points`)
//! 2. Open-path length (`min_total_distance_meters`)
//! 3. Self-intersection of the ring
//! 4. Enclosed area (`min_enclosed_area_sq_meters`)
//!
//! ## Self-intersection scan
//!
//! The ring has one edge per point: edge `i` joins point `i` to point
//! `(i + 1) % n`. Every pair of non-consecutive edges is tested, except pairs
//! made of one of the first two edges and one of the last two. A walked loop
//! ends right next to where it started, and those edges routinely graze each
//! other without the path being a figure-eight. The exemption also hides a
//! genuine crossing that close to the start; that is a known approximation.

use std::fmt;

use crate::geo_utils::{compute_center, haversine_distance, polygon_area, polyline_length, segments_intersect};
use crate::{Bounds, GpsPoint, Result, TerritoryError, TrackingConfig, TrackingSession};

/// Edges at the start of the ring exempt from crossing the tail.
const CLOSURE_HEAD_EDGES: usize = 2;
/// Edges at the end of the ring exempt from crossing the head.
const CLOSURE_TAIL_EDGES: usize = 2;

/// Why a path is not a territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationFailure {
    InsufficientPoints,
    InsufficientDistance,
    SelfIntersecting,
    InsufficientArea,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ValidationFailure::InsufficientPoints => "not enough points recorded",
            ValidationFailure::InsufficientDistance => "path is too short",
            ValidationFailure::SelfIntersecting => "path crosses itself",
            ValidationFailure::InsufficientArea => "enclosed area is too small",
        };
        f.write_str(reason)
    }
}

/// Outcome of [`validate_territory`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    pub valid: bool,
    pub failure: Option<ValidationFailure>,
    /// Enclosed area; 0 unless valid
    pub enclosed_area_sq_meters: f64,
    /// Open-path length; 0 if the point-count check failed
    pub path_length_meters: f64,
}

impl ValidationResult {
    fn failed(reason: ValidationFailure, path_length_meters: f64) -> Self {
        Self {
            valid: false,
            failure: Some(reason),
            enclosed_area_sq_meters: 0.0,
            path_length_meters,
        }
    }

    fn passed(enclosed_area_sq_meters: f64, path_length_meters: f64) -> Self {
        Self {
            valid: true,
            failure: None,
            enclosed_area_sq_meters,
            path_length_meters,
        }
    }

    /// The enclosed area, or the failure as [`TerritoryError::Rejected`].
    pub fn into_result(self) -> Result<f64> {
        match self.failure {
            None => Ok(self.enclosed_area_sq_meters),
            Some(reason) => Err(reason.into()),
        }
    }
}

/// Validate a closed path as a territory. Pure and deterministic.
///
/// # Example
///
/// ```rust
/// use territory_engine::{GpsPoint, TrackingConfig, ValidationFailure, validate_territory};
///
/// let points = vec![
///     GpsPoint::new(0.0, 0.0),
///     GpsPoint::new(0.0, 0.001),
///     GpsPoint::new(0.001, 0.001),
/// ];
///
/// let result = validate_territory(&points, &TrackingConfig::default());
/// assert!(!result.valid);
/// assert_eq!(result.failure, Some(ValidationFailure::InsufficientPoints));
/// ```
pub fn validate_territory(points: &[GpsPoint], config: &TrackingConfig) -> ValidationResult {
    if points.len() < config.min_path_points as usize {
        return ValidationResult::failed(ValidationFailure::InsufficientPoints, 0.0);
    }

    let path_length = polyline_length(points);
    if path_length < config.min_total_distance_meters {
        return ValidationResult::failed(ValidationFailure::InsufficientDistance, path_length);
    }

    if path_self_intersects(points) {
        return ValidationResult::failed(ValidationFailure::SelfIntersecting, path_length);
    }

    let area = polygon_area(points);
    if area < config.min_enclosed_area_sq_meters {
        return ValidationResult::failed(ValidationFailure::InsufficientArea, path_length);
    }

    ValidationResult::passed(area, path_length)
}

/// Check whether the ring formed by `points` crosses itself.
///
/// Fail-fast O(n²) scan; see the module docs for the edges near the closure
/// point that are exempt. Fewer than 4 points never intersect.
pub fn path_self_intersects(points: &[GpsPoint]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }

    let edge = |i: usize| (&points[i], &points[(i + 1) % n]);

    for i in 0..n {
        let (a, b) = edge(i);
        for j in (i + 2)..n {
            if i < CLOSURE_HEAD_EDGES && j >= n - CLOSURE_TAIL_EDGES {
                continue;
            }
            let (c, d) = edge(j);
            if segments_intersect(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

// ============================================================================
// Territory Claims
// ============================================================================

/// An accepted territory, with display data computed once.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Territory {
    pub points: Vec<GpsPoint>,
    pub area_sq_meters: f64,
    /// Ring perimeter, including the closing edge
    pub perimeter_meters: f64,
    pub bounds: Bounds,
    pub center: GpsPoint,
}

impl Territory {
    /// Claim the territory walked in `session`.
    ///
    /// Reuses the validation recorded at closure when there is one.
    ///
    /// # Errors
    ///
    /// - [`TerritoryError::NotClosed`] if the loop has not closed yet
    /// - [`TerritoryError::Rejected`] if the path failed validation
    pub fn claim(session: &TrackingSession, config: &TrackingConfig) -> Result<Self> {
        if !session.is_closed() {
            return Err(TerritoryError::NotClosed { point_count: session.point_count() });
        }

        let result = match session.validation() {
            Some(recorded) => recorded.clone(),
            None => validate_territory(session.points(), config),
        };
        let area_sq_meters = result.into_result()?;

        let points = session.points().to_vec();
        let bounds = Bounds::from_points(&points)
            .ok_or(ValidationFailure::InsufficientPoints)?;

        let closing_edge = match (points.first(), points.last()) {
            (Some(first), Some(last)) => haversine_distance(last, first),
            _ => 0.0,
        };
        let perimeter_meters = polyline_length(&points) + closing_edge;
        let center = compute_center(&points);

        Ok(Self {
            points,
            area_sq_meters,
            perimeter_meters,
            bounds,
            center,
        })
    }
}
