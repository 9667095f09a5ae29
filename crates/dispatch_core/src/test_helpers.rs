//! Test helpers for common test setup and utilities.

use bevy_ecs::prelude::World;

use crate::dispatch::{request_ride, DispatchOutcome};
use crate::ecs::{Driver, DriverId, RideId, RiderId, VehicleType};
use crate::registry::DriverRegistry;
use crate::scenario::{build_simulation, spawn_driver, spawn_rider, SimulationParams};
use crate::spatial::Position;

/// Seed used by [`create_test_world`].
pub const TEST_SEED: u64 = 42;

/// Create a world with every engine resource and a fixed RNG seed.
pub fn create_test_world() -> World {
    let mut world = World::new();
    build_simulation(&mut world, SimulationParams::default().with_seed(TEST_SEED));
    world
}

/// Spawn a sedan driver at `position`, optionally bringing it online.
///
/// # Panics
///
/// Panics if the freshly spawned driver cannot go online.
pub fn spawn_test_driver(world: &mut World, position: Position, online: bool) -> DriverId {
    let raw = world.resource::<DriverRegistry>().len() + 1;
    let id = spawn_driver(
        world,
        format!("Driver {raw}"),
        position,
        VehicleType::Sedan,
        format!("TEST{raw:03}"),
    )
    .expect("finite test position");
    if online {
        let entity = world.resource::<DriverRegistry>().get(id).expect("driver registered");
        world
            .get_mut::<Driver>(entity)
            .expect("driver component")
            .go_online()
            .expect("offline driver can go online");
    }
    id
}

/// Spawn a rider with the default starting balance.
pub fn spawn_test_rider(world: &mut World, position: Position) -> RiderId {
    spawn_rider(world, "Test Rider", position).expect("finite test position")
}

/// Request a ride and assert it was assigned a driver.
///
/// # Panics
///
/// Panics if the request fails or no driver is available.
pub fn request_test_ride(world: &mut World, rider: RiderId, destination: Position) -> RideId {
    match request_ride(world, rider, destination).expect("ride request") {
        DispatchOutcome::Assigned { ride, .. } => ride.id,
        DispatchOutcome::Cancelled { ride } => panic!("ride #{} was not assigned", ride.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::DriverStatus;

    #[test]
    fn test_driver_can_start_online() {
        let mut world = create_test_world();
        let online = spawn_test_driver(&mut world, Position::default(), true);
        let offline = spawn_test_driver(&mut world, Position::default(), false);
        let registry = world.resource::<DriverRegistry>();
        let status = |id| {
            let entity = registry.get(id).expect("driver");
            world.get::<Driver>(entity).expect("component").status()
        };
        assert_eq!(status(online), DriverStatus::Available);
        assert_eq!(status(offline), DriverStatus::Offline);
    }
}
