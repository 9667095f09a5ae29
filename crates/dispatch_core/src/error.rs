use std::fmt;

use thiserror::Error;

use crate::ecs::{DriverId, RideId, RiderId};
use crate::spatial::Position;

/// The entity a caller tried to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Rider(RiderId),
    Driver(DriverId),
    Ride(RideId),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Rider(id) => write!(f, "rider {id}"),
            Selection::Driver(id) => write!(f, "driver {id}"),
            Selection::Ride(id) => write!(f, "ride {id}"),
        }
    }
}

/// Recoverable errors reported by the dispatch engine.
///
/// A request that finds no available driver is not an error; it is reported as
/// [`crate::dispatch::DispatchOutcome::Cancelled`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("invalid selection: {0} does not exist")]
    InvalidSelection(Selection),

    #[error("rider {0} already has an active ride")]
    RiderAlreadyOnRide(RiderId),

    #[error("invalid position {0}: coordinates must be finite")]
    InvalidPosition(Position),

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("cannot {operation} {subject} while it is {status}")]
    PreconditionViolation {
        subject: Selection,
        operation: &'static str,
        status: String,
    },

    #[error("invalid scenario table: {0}")]
    InvalidScenarioTable(String),

    #[error("telemetry export failed: {0}")]
    Export(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::InvalidScenarioTable(err.to_string())
    }
}
