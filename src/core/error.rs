//! Validation failures for raw position data

use thiserror::Error;

/// Why a fix does not describe a point on the earth
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FixRejection {
    #[error("latitude {0} outside -90..90")]
    Latitude(f64),
    #[error("longitude {0} outside -180..180")]
    Longitude(f64),
    #[error("accuracy {0} is not a non-negative distance")]
    Accuracy(f64),
}
