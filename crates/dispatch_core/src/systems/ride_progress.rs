use bevy_ecs::prelude::{Query, Res, ResMut, Without};
use log::warn;

use crate::clock::SimulationClock;
use crate::ecs::{Driver, Ride, Rider};
use crate::lifecycle::{advance_ride, DriverSlot, RiderSlot};
use crate::pricing::PricingConfig;
use crate::registry::{DriverRegistry, RideBook, RiderRegistry};
use crate::runner::TickOutcome;
use crate::scenario::MovementConfig;
use crate::spatial::Position;

/// Advances every active ride exactly once, in request order.
#[allow(clippy::too_many_arguments)]
pub fn ride_progress_system(
    clock: Res<SimulationClock>,
    movement: Res<MovementConfig>,
    pricing: Res<PricingConfig>,
    book: Res<RideBook>,
    driver_registry: Res<DriverRegistry>,
    rider_registry: Res<RiderRegistry>,
    mut outcome: ResMut<TickOutcome>,
    mut rides: Query<&mut Ride>,
    mut drivers: Query<(&mut Driver, &mut Position), Without<Rider>>,
    mut riders: Query<(&mut Rider, &mut Position), Without<Driver>>,
) {
    let now = clock.now();
    for (ride_id, ride_entity) in book.active() {
        let Ok(mut ride) = rides.get_mut(*ride_entity) else {
            continue;
        };
        let Some(driver_id) = ride.driver() else {
            continue;
        };
        let Some(driver_entity) = driver_registry.get(driver_id) else {
            continue;
        };
        let Some(rider_entity) = rider_registry.get(ride.rider) else {
            continue;
        };
        let Ok((mut driver, mut driver_pos)) = drivers.get_mut(driver_entity) else {
            continue;
        };
        let Ok((mut rider, mut rider_pos)) = riders.get_mut(rider_entity) else {
            continue;
        };

        let before = ride.status();
        let result = advance_ride(
            &mut ride,
            DriverSlot {
                driver: &mut driver,
                position: &mut driver_pos,
            },
            RiderSlot {
                rider: &mut rider,
                position: &mut rider_pos,
            },
            &movement,
            &pricing,
            now,
        );
        match result {
            Ok(after) if after != before && after.is_terminal() => {
                outcome.finished.push((*ride_id, after));
            }
            Ok(_) => {}
            Err(err) => warn!("Ride #{ride_id} could not advance: {err}"),
        }
    }
}
