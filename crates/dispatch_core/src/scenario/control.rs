//! Bulk driver-availability control: demand scenarios and fleet-wide toggles.

use bevy_ecs::prelude::{Entity, Resource, World};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::ecs::{Driver, DriverStatus};
use crate::error::DispatchResult;
use crate::registry::DriverRegistry;

use super::table::{ActiveScenario, ScenarioTable};

/// RNG used for every random availability decision.
#[derive(Debug, Resource)]
pub struct ScenarioRng(pub StdRng);

impl ScenarioRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// Result of applying a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioApplied {
    pub name: String,
    /// `round(total_drivers * driver_online_rate)`.
    pub target_online: usize,
    /// Drivers AVAILABLE or ON_TRIP afterwards.
    pub online: usize,
    pub total_drivers: usize,
    /// Advisory only; fares do not use it.
    pub surge_multiplier: f64,
}

fn driver_entities(world: &World) -> Vec<Entity> {
    world
        .resource::<DriverRegistry>()
        .iter()
        .map(|(_, entity)| entity)
        .collect()
}

fn driver_status(world: &World, entity: Entity) -> Option<DriverStatus> {
    world.get::<Driver>(entity).map(|driver| driver.status())
}

fn bring_online(world: &mut World, entity: Entity) -> DispatchResult<bool> {
    let Some(mut driver) = world.get_mut::<Driver>(entity) else {
        return Ok(false);
    };
    if driver.status() != DriverStatus::Offline {
        return Ok(false);
    }
    driver.go_online()?;
    debug!("Driver {} is now ONLINE", driver.name);
    Ok(true)
}

/// Reconfigures driver availability to match scenario `name`.
///
/// Every driver not currently on a trip is taken offline. The offline pool is
/// then shuffled with the seeded [`ScenarioRng`] and drivers are brought online
/// from the front until `round(total * driver_online_rate)` drivers are online,
/// counting the ones still on a trip. Drivers on a trip keep their ride.
pub fn apply_scenario(world: &mut World, name: &str) -> DispatchResult<ScenarioApplied> {
    let scenario = world.resource::<ScenarioTable>().get(name)?;
    let entities = driver_entities(world);
    let total_drivers = entities.len();
    let target_online = (total_drivers as f64 * scenario.driver_online_rate).round() as usize;

    let mut on_trip = 0;
    let mut offline = Vec::with_capacity(total_drivers);
    for entity in entities {
        let Some(mut driver) = world.get_mut::<Driver>(entity) else {
            continue;
        };
        if driver.status() == DriverStatus::OnTrip {
            on_trip += 1;
            continue;
        }
        driver.go_offline()?;
        offline.push(entity);
    }

    offline.shuffle(&mut world.resource_mut::<ScenarioRng>().0);

    let mut online = on_trip;
    for entity in offline.into_iter().take(target_online.saturating_sub(on_trip)) {
        if bring_online(world, entity)? {
            online += 1;
        }
    }

    info!(
        "Scenario {name}: {online}/{total_drivers} drivers online (expected {target_online}), surge {:.1}x",
        scenario.surge_multiplier
    );
    if online != target_online {
        warn!(
            "Scenario {name}: {on_trip} drivers on trip, could not reach {target_online} online drivers"
        );
    }

    world.resource_mut::<ActiveScenario>().0 = Some((name.to_string(), scenario));

    Ok(ScenarioApplied {
        name: name.to_string(),
        target_online,
        online,
        total_drivers,
        surge_multiplier: scenario.surge_multiplier,
    })
}

/// Brings every OFFLINE driver online. Returns how many changed.
pub fn set_all_drivers_online(world: &mut World) -> DispatchResult<usize> {
    let mut count = 0;
    for entity in driver_entities(world) {
        if bring_online(world, entity)? {
            count += 1;
        }
    }
    info!("{count} drivers are now online");
    Ok(count)
}

/// Brings each OFFLINE driver online independently with `probability`.
pub fn set_initial_drivers_online(world: &mut World, probability: f64) -> DispatchResult<usize> {
    let probability = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };
    let mut count = 0;
    for entity in driver_entities(world) {
        if driver_status(world, entity) != Some(DriverStatus::Offline) {
            continue;
        }
        let chosen = world.resource_mut::<ScenarioRng>().0.gen_bool(probability);
        if chosen && bring_online(world, entity)? {
            count += 1;
        }
    }
    info!("{count} drivers are now online and available");
    Ok(count)
}
