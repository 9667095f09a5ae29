use crate::ecs::DriverId;
use crate::spatial::Position;

/// Picks a driver for a pickup point from the currently available pool.
///
/// `available_drivers` holds only AVAILABLE drivers, in registration order.
/// Implementations must be deterministic for a given input so that dispatch is
/// reproducible.
///
/// # Examples
///
/// ```rust
/// use dispatch_core::ecs::DriverId;
/// use dispatch_core::matching::{MatchingAlgorithm, NearestAvailable};
/// use dispatch_core::spatial::Position;
///
/// let drivers = [
///     (DriverId(1), Position::new(5.0, 5.0)),
///     (DriverId(2), Position::new(1.0, 1.0)),
/// ];
/// let picked = NearestAvailable.find_match(Position::new(0.0, 0.0), &drivers);
/// assert_eq!(picked, Some(DriverId(2)));
/// ```
pub trait MatchingAlgorithm: Send + Sync {
    /// Returns the chosen driver, or `None` when the pool is empty.
    fn find_match(
        &self,
        pickup: Position,
        available_drivers: &[(DriverId, Position)],
    ) -> Option<DriverId>;
}
