//! Ride requests and synchronous driver dispatch.
//!
//! A request is matched the moment it arrives. If the matching algorithm finds
//! no available driver the ride is cancelled on the spot and never enters the
//! active list; there is no retry queue.

use bevy_ecs::prelude::World;
use log::info;
use serde::Serialize;

use crate::clock::SimulationClock;
use crate::ecs::{Driver, DriverId, Ride, RideStatus, Rider, RiderId, SequentialId};
use crate::error::{DispatchError, DispatchResult};
use crate::matching::MatchingAlgorithmResource;
use crate::pricing::PricingConfig;
use crate::registry::{DriverRegistry, RideBook, RiderRegistry};
use crate::spatial::Position;
use crate::telemetry::SimTelemetry;
use crate::views::RideView;

/// What happened to a ride request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DispatchOutcome {
    /// A driver was bound; the ride is now active.
    Assigned {
        ride: RideView,
        driver: DriverId,
        pickup_distance: f64,
    },
    /// No driver was available; the ride was cancelled and discarded.
    Cancelled { ride: RideView },
}

impl DispatchOutcome {
    pub fn ride(&self) -> &RideView {
        match self {
            DispatchOutcome::Assigned { ride, .. } | DispatchOutcome::Cancelled { ride } => ride,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, DispatchOutcome::Assigned { .. })
    }
}

/// AVAILABLE drivers with their positions, in registration order.
pub fn available_drivers(world: &World) -> Vec<(DriverId, Position)> {
    world
        .resource::<DriverRegistry>()
        .iter()
        .filter_map(|(id, entity)| {
            let driver = world.get::<Driver>(entity)?;
            if !driver.is_available() {
                return None;
            }
            Some((id, *world.get::<Position>(entity)?))
        })
        .collect()
}

/// Creates a ride from the rider's current position to `destination` and
/// dispatches it immediately. A non-finite destination is rejected before any
/// state changes.
pub fn request_ride(
    world: &mut World,
    rider_id: RiderId,
    destination: Position,
) -> DispatchResult<DispatchOutcome> {
    let destination = destination.ensure_finite()?;
    let rider_entity = world.resource::<RiderRegistry>().resolve(rider_id)?;
    let pickup = {
        let entity = world.entity(rider_entity);
        let rider = entity
            .get::<Rider>()
            .ok_or(DispatchError::InvalidSelection(rider_id.selection()))?;
        if rider.has_active_ride() {
            return Err(DispatchError::RiderAlreadyOnRide(rider_id));
        }
        *entity
            .get::<Position>()
            .ok_or(DispatchError::InvalidSelection(rider_id.selection()))?
    };

    let now = world.resource::<SimulationClock>().now();
    let pricing = *world.resource::<PricingConfig>();
    let ride_id = world.resource_mut::<RideBook>().allocate_id();
    let ride = Ride::new(ride_id, rider_id, pickup, destination, &pricing, now);
    info!(
        "Ride #{} requested by rider {}: {} -> {}, estimated fare {:.2}",
        ride.id,
        rider_id,
        pickup,
        destination,
        ride.fare()
    );
    assign(world, ride)
}

/// Binds the nearest available driver to a REQUESTED ride, or cancels it.
///
/// On success the driver is ON_TRIP, the rider has an active ride and the
/// ride is spawned into the active list. On failure nothing but the cancelled
/// counter changes.
pub fn assign(world: &mut World, mut ride: Ride) -> DispatchResult<DispatchOutcome> {
    if ride.status() != RideStatus::Requested {
        return Err(DispatchError::PreconditionViolation {
            subject: ride.id.selection(),
            operation: "dispatch",
            status: ride.status().to_string(),
        });
    }
    let now = world.resource::<SimulationClock>().now();
    let pool = available_drivers(world);
    let chosen = world
        .resource::<MatchingAlgorithmResource>()
        .find_match(ride.pickup(), &pool);

    let Some(driver_id) = chosen else {
        ride.transition_to(RideStatus::Cancelled, now)?;
        world.resource_mut::<SimTelemetry>().cancelled_rides += 1;
        info!("No available drivers found! Ride #{} cancelled", ride.id);
        return Ok(DispatchOutcome::Cancelled {
            ride: RideView::from(&ride),
        });
    };

    let driver_entity = world.resource::<DriverRegistry>().resolve(driver_id)?;
    let rider_entity = world.resource::<RiderRegistry>().resolve(ride.rider)?;
    let pickup_distance = pool
        .iter()
        .find(|(id, _)| *id == driver_id)
        .map(|(_, position)| position.distance_to(&ride.pickup()))
        .unwrap_or_default();

    {
        let rider = world
            .get::<Rider>(rider_entity)
            .ok_or(DispatchError::InvalidSelection(ride.rider.selection()))?;
        if rider.has_active_ride() {
            return Err(DispatchError::RiderAlreadyOnRide(ride.rider));
        }
    }
    let driver_name = {
        let mut driver = world
            .get_mut::<Driver>(driver_entity)
            .ok_or(DispatchError::InvalidSelection(driver_id.selection()))?;
        driver.start_trip(ride.id)?;
        driver.name.clone()
    };
    if let Some(mut rider) = world.get_mut::<Rider>(rider_entity) {
        rider.begin_ride(ride.id)?;
    }
    ride.assign_driver(driver_id, now)?;

    info!(
        "Ride #{} assigned to {} ({:.2} units away), fare {:.2}, distance {:.2}",
        ride.id,
        driver_name,
        pickup_distance,
        ride.fare(),
        ride.distance()
    );

    let view = RideView::from(&ride);
    let ride_id = ride.id;
    let entity = world.spawn(ride).id();
    world.resource_mut::<RideBook>().push_active(ride_id, entity);

    Ok(DispatchOutcome::Assigned {
        ride: view,
        driver: driver_id,
        pickup_distance,
    })
}
