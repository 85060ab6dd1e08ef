//! Crate-level error type.
//!
//! Routine check outcomes (a speed warning, a path that fails validation) are
//! plain values: [`crate::SpeedDecision`] and [`crate::ValidationResult`].
//! [`TerritoryError`] is for the surfaces that propagate with `?`: building an
//! accumulator from a config, claiming a territory, or reporting why tracking
//! was cut short.

use thiserror::Error;

use crate::ValidationFailure;

/// Errors surfaced to the session controller.
///
/// Crosses the FFI boundary as a flat error: variant name plus message.
#[derive(Debug, Error)]
#[cfg_attr(feature = "ffi", derive(uniffi::Error), uniffi(flat_error))]
pub enum TerritoryError {
    /// The closed path failed one of the territory checks.
    #[error("territory rejected: {0}")]
    Rejected(ValidationFailure),

    /// Tracking was terminated because the user moved too fast.
    #[error("tracking stopped: speed {speed_kmh:.1} km/h exceeds the limit")]
    ExcessiveSpeed { speed_kmh: f64 },

    /// A claim was attempted before the loop closed.
    #[error("path is not closed ({point_count} points)")]
    NotClosed { point_count: u32 },

    #[error("invalid tracking config: {0}")]
    InvalidConfig(String),

    /// Malformed JSON handed to `TrackingConfig::from_json`.
    #[error("failed to parse tracking config: {0}")]
    ConfigParse(String),
}

impl From<ValidationFailure> for TerritoryError {
    fn from(reason: ValidationFailure) -> Self {
        TerritoryError::Rejected(reason)
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TerritoryError>;
