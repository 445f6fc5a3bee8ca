//! Tracking error types
//!
//! None of these are fatal. `InvalidFix` and `InactiveSession` describe why a
//! fix was ignored and are reported through [`IngestOutcome::Ignored`] rather
//! than as `Err`, since upstream providers routinely redeliver or deliver late.
//!
//! [`IngestOutcome::Ignored`]: crate::tracking::IngestOutcome::Ignored

use crate::core::FixRejection;
use thiserror::Error;

/// Reasons a tracking operation did not take effect
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackingError {
    /// The fix was absent or does not describe a point on the earth
    #[error("invalid fix: {reason}")]
    InvalidFix { reason: String },
    /// A fix arrived while no session was active
    #[error("fix received while tracking is inactive")]
    InactiveSession,
    /// The listener handle was never issued or was already removed
    #[error("unknown listener handle {handle}")]
    UnknownListener { handle: u32 },
}

impl TrackingError {
    /// Whether this error only means "the input was dropped"
    pub fn is_ignorable(&self) -> bool {
        matches!(self, TrackingError::InvalidFix { .. } | TrackingError::InactiveSession)
    }
}

impl From<FixRejection> for TrackingError {
    fn from(rejection: FixRejection) -> Self {
        TrackingError::InvalidFix {
            reason: rejection.to_string(),
        }
    }
}

/// Result type for tracking operations
pub type TrackingResult<T> = Result<T, TrackingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_becomes_invalid_fix() {
        let error = TrackingError::from(FixRejection::Latitude(91.0));
        assert_eq!(
            error,
            TrackingError::InvalidFix {
                reason: "latitude 91 outside -90..90".to_string()
            }
        );
        assert!(error.is_ignorable());
        assert!(!TrackingError::UnknownListener { handle: 3 }.is_ignorable());
    }
}
