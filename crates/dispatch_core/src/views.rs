//! Read-only snapshots handed to the presentation layer.

use serde::Serialize;

use crate::ecs::{
    Driver, DriverId, DriverStatus, Ride, RideId, RideStatus, RideTiming, Rider, RiderId,
    VehicleType,
};
use crate::spatial::Position;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverView {
    pub id: DriverId,
    pub name: String,
    pub vehicle: VehicleType,
    pub license_plate: String,
    pub status: DriverStatus,
    pub position: Position,
    pub earnings: f64,
    pub rating: f64,
    pub total_trips: u32,
    pub assigned_ride: Option<RideId>,
}

impl DriverView {
    pub fn new(driver: &Driver, position: Position) -> Self {
        Self {
            id: driver.id,
            name: driver.name.clone(),
            vehicle: driver.vehicle,
            license_plate: driver.license_plate.clone(),
            status: driver.status(),
            position,
            earnings: driver.earnings(),
            rating: driver.rating(),
            total_trips: driver.total_trips(),
            assigned_ride: driver.assigned_ride(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiderView {
    pub id: RiderId,
    pub name: String,
    pub position: Position,
    pub balance: f64,
    pub has_active_ride: bool,
    pub active_ride: Option<RideId>,
}

impl RiderView {
    pub fn new(rider: &Rider, position: Position) -> Self {
        Self {
            id: rider.id,
            name: rider.name.clone(),
            position,
            balance: rider.balance(),
            has_active_ride: rider.has_active_ride(),
            active_ride: rider.active_ride(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideView {
    pub id: RideId,
    pub rider: RiderId,
    pub driver: Option<DriverId>,
    pub status: RideStatus,
    pub pickup: Position,
    pub destination: Position,
    pub fare: f64,
    pub distance: f64,
    pub timing: RideTiming,
}

impl From<&Ride> for RideView {
    fn from(ride: &Ride) -> Self {
        Self {
            id: ride.id,
            rider: ride.rider,
            driver: ride.driver(),
            status: ride.status(),
            pickup: ride.pickup(),
            destination: ride.destination(),
            fare: ride.fare(),
            distance: ride.distance(),
            timing: ride.timing,
        }
    }
}
