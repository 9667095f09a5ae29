use bevy_ecs::prelude::World;
use log::info;

use crate::clock::SimulationClock;
use crate::ecs::{Driver, DriverId, Rider, RiderId, VehicleType};
use crate::error::DispatchResult;
use crate::matching::MatchingAlgorithmResource;
use crate::registry::{DriverRegistry, RideBook, RiderRegistry};
use crate::runner::TickOutcome;
use crate::spatial::Position;
use crate::telemetry::SimTelemetry;

use super::control::ScenarioRng;
use super::params::{AccountConfig, SimulationParams};
use super::table::ActiveScenario;

/// Populates `world` with every resource the engine needs.
/// Caller must have already created `world`; drivers and riders are added afterwards.
pub fn build_simulation(world: &mut World, params: SimulationParams) {
    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(TickOutcome::default());
    world.insert_resource(DriverRegistry::default());
    world.insert_resource(RiderRegistry::default());
    world.insert_resource(RideBook::default());
    world.insert_resource(MatchingAlgorithmResource::default());
    world.insert_resource(ScenarioRng::new(params.seed));
    world.insert_resource(ActiveScenario::default());
    world.insert_resource(params.pricing);
    world.insert_resource(params.movement);
    world.insert_resource(params.accounts);
    world.insert_resource(params.scenarios);
}

/// Spawns a rider with the configured starting balance and registers it.
pub fn spawn_rider(
    world: &mut World,
    name: impl Into<String>,
    position: Position,
) -> DispatchResult<RiderId> {
    let position = position.ensure_finite()?;
    let accounts = *world.resource::<AccountConfig>();
    let id = world.resource::<RiderRegistry>().next_id();
    let rider = Rider::new(id, name, accounts.initial_balance);
    info!("Rider {} ({}) joined at {}", id, rider.name, position);
    let entity = world.spawn((rider, position)).id();
    Ok(world.resource_mut::<RiderRegistry>().register(entity))
}

/// Spawns an OFFLINE driver with the configured starting rating and registers it.
pub fn spawn_driver(
    world: &mut World,
    name: impl Into<String>,
    position: Position,
    vehicle: VehicleType,
    license_plate: impl Into<String>,
) -> DispatchResult<DriverId> {
    let position = position.ensure_finite()?;
    let accounts = *world.resource::<AccountConfig>();
    let id = world.resource::<DriverRegistry>().next_id();
    let driver = Driver::new(id, name, vehicle, license_plate, accounts.initial_rating);
    info!("Driver {} ({}, {}) registered at {}", id, driver.name, vehicle, position);
    let entity = world.spawn((driver, position)).id();
    Ok(world.resource_mut::<DriverRegistry>().register(entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::DriverStatus;
    use crate::error::DispatchError;

    #[test]
    fn spawned_agents_get_sequential_ids_and_configured_accounts() {
        let mut world = World::new();
        build_simulation(
            &mut world,
            SimulationParams::default().with_accounts(AccountConfig {
                initial_balance: 250.0,
                initial_rating: 4.5,
            }),
        );
        let origin = Position::default();
        let first = spawn_driver(&mut world, "Driver 1", origin, VehicleType::Sedan, "KA01AB1")
            .expect("first driver");
        let second = spawn_driver(&mut world, "Driver 2", origin, VehicleType::Suv, "KA01AB2")
            .expect("second driver");
        let rider = spawn_rider(&mut world, "Asha", Position::new(1.0, 1.0)).expect("rider");
        assert_eq!(first, DriverId(1));
        assert_eq!(second, DriverId(2));
        assert_eq!(rider, RiderId(1));

        let entity = world.resource::<DriverRegistry>().get(second).expect("driver");
        let driver = world.get::<Driver>(entity).expect("component");
        assert_eq!(driver.status(), DriverStatus::Offline);
        assert_eq!(driver.rating(), 4.5);

        let entity = world.resource::<RiderRegistry>().get(rider).expect("rider");
        assert_eq!(world.get::<Rider>(entity).expect("component").balance(), 250.0);
    }

    #[test]
    fn non_finite_spawn_positions_are_rejected() {
        let mut world = World::new();
        build_simulation(&mut world, SimulationParams::default());
        let nowhere = Position::new(f64::NAN, 0.0);
        assert!(matches!(
            spawn_rider(&mut world, "Lost", nowhere),
            Err(DispatchError::InvalidPosition(_))
        ));
        assert!(spawn_driver(&mut world, "Lost", nowhere, VehicleType::Sedan, "X").is_err());
        assert!(world.resource::<RiderRegistry>().is_empty());
        assert!(world.resource::<DriverRegistry>().is_empty());
    }
}
