//! Ride-dispatch simulation engine on a 2-D Euclidean plane.
//!
//! Drivers and riders live as entities in a `bevy_ecs` [World](bevy_ecs::world::World).
//! Ride requests are matched to the nearest available driver on arrival, and
//! every tick advances each active ride one step through its state machine.
//! [`simulation::Simulation`] wraps the world and the tick schedule.

pub mod clock;
pub mod dispatch;
pub mod ecs;
pub mod error;
pub mod lifecycle;
pub mod matching;
pub mod pricing;
pub mod registry;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod spatial;
pub mod systems;
pub mod telemetry;
pub mod telemetry_export;
pub mod views;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::{DispatchError, DispatchResult};
pub use simulation::Simulation;
