//! Ride state machine: one step per tick, completion settlement and cancellation.
//!
//! ```text
//! REQUESTED ──dispatch──▶ DRIVER_ASSIGNED ──near pickup──▶ PICKUP_REACHED
//!                                                              │ next tick
//!                         COMPLETED ◀──near destination── IN_PROGRESS
//! any non-terminal state ──cancel──▶ CANCELLED
//! ```
//!
//! These functions only touch the components handed to them; the ride
//! progress system and the simulation facade resolve ids to components.

use log::{debug, info};

use crate::ecs::{Driver, Ride, RideStatus, Rider};
use crate::error::DispatchResult;
use crate::pricing::{charge_rider, PricingConfig};
use crate::scenario::MovementConfig;
use crate::spatial::Position;

/// The driver bound to a ride together with its position.
pub struct DriverSlot<'a> {
    pub driver: &'a mut Driver,
    pub position: &'a mut Position,
}

/// The rider of a ride together with its position.
pub struct RiderSlot<'a> {
    pub rider: &'a mut Rider,
    pub position: &'a mut Position,
}

fn move_driver(slot: &mut DriverSlot<'_>, target: Position, movement: &MovementConfig) {
    let next = slot
        .position
        .step_towards(&target, movement.step, movement.snap_threshold);
    debug!(
        "Driver {} moved {} -> {} towards {}",
        slot.driver.name, slot.position, next, target
    );
    *slot.position = next;
}

/// Advances `ride` by one tick and returns its status afterwards.
///
/// No-op for terminal rides and rides without a bound driver.
pub fn advance_ride(
    ride: &mut Ride,
    mut driver: DriverSlot<'_>,
    rider: RiderSlot<'_>,
    movement: &MovementConfig,
    pricing: &PricingConfig,
    now: u64,
) -> DispatchResult<RideStatus> {
    if ride.status().is_terminal() || ride.driver().is_none() {
        return Ok(ride.status());
    }

    match ride.status() {
        RideStatus::DriverAssigned => {
            if driver.position.distance_to(&ride.pickup()) < movement.arrival_radius {
                ride.transition_to(RideStatus::PickupReached, now)?;
                info!(
                    "Driver {} reached pickup point for {}",
                    driver.driver.name, rider.rider.name
                );
            } else {
                move_driver(&mut driver, ride.pickup(), movement);
            }
        }
        RideStatus::PickupReached => {
            ride.transition_to(RideStatus::InProgress, now)?;
            info!("Ride #{} started! {} is on the way", ride.id, rider.rider.name);
        }
        RideStatus::InProgress => {
            if driver.position.distance_to(&ride.destination()) < movement.arrival_radius {
                complete_ride(ride, driver, rider, pricing, now)?;
            } else {
                move_driver(&mut driver, ride.destination(), movement);
            }
        }
        RideStatus::Requested | RideStatus::Completed | RideStatus::Cancelled => {}
    }
    Ok(ride.status())
}

/// IN_PROGRESS → COMPLETED: charges the rider, pays and rates the driver,
/// frees the rider and drops them off at the destination.
pub fn complete_ride(
    ride: &mut Ride,
    driver: DriverSlot<'_>,
    rider: RiderSlot<'_>,
    pricing: &PricingConfig,
    now: u64,
) -> DispatchResult<()> {
    driver.driver.end_trip(ride.fare(), pricing.completion_rating)?;
    ride.transition_to(RideStatus::Completed, now)?;
    charge_rider(rider.rider, ride.fare());
    rider.rider.finish_ride();
    *rider.position = ride.destination();

    info!(
        "Ride #{} completed! {} paid {:.2} (balance {:.2}); driver {} rating {:.1}",
        ride.id,
        rider.rider.name,
        ride.fare(),
        rider.rider.balance(),
        driver.driver.name,
        driver.driver.rating()
    );
    Ok(())
}

/// Any non-terminal state → CANCELLED. The driver (if bound) is released back
/// to AVAILABLE and the rider's active ride is cleared. Nobody pays.
pub fn cancel_ride(
    ride: &mut Ride,
    driver: Option<&mut Driver>,
    rider: &mut Rider,
    now: u64,
) -> DispatchResult<()> {
    ride.transition_to(RideStatus::Cancelled, now)?;
    if let Some(driver) = driver {
        if driver.assigned_ride() == Some(ride.id) {
            driver.release_from_trip()?;
        }
    }
    if rider.active_ride() == Some(ride.id) {
        rider.finish_ride();
    }
    info!("Ride #{} cancelled", ride.id);
    Ok(())
}
