//! ECS components for drivers, riders and rides.
//!
//! Drivers and riders carry a [`Position`](crate::spatial::Position) component
//! next to their record. Rides point at their rider and driver by id; the
//! registries resolve ids to entities.

use std::fmt;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult, Selection};
use crate::pricing::{calculate_fare, PricingConfig};
use crate::spatial::Position;

/// Sequential identifiers handed out by a registry, starting at 1.
pub trait SequentialId: Copy + Eq + fmt::Display + Send + Sync + 'static {
    fn from_raw(raw: u32) -> Self;
    fn raw(self) -> u32;
    fn selection(self) -> Selection;

    /// Zero-based slot in the owning registry.
    fn index(self) -> usize {
        (self.raw() as usize).wrapping_sub(1)
    }
}

macro_rules! sequential_id {
    ($name:ident, $selection:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl SequentialId for $name {
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn raw(self) -> u32 {
                self.0
            }

            fn selection(self) -> Selection {
                Selection::$selection(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

sequential_id!(DriverId, Driver);
sequential_id!(RiderId, Rider);
sequential_id!(RideId, Ride);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverStatus {
    Offline,
    Available,
    OnTrip,
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DriverStatus::Offline => "OFFLINE",
            DriverStatus::Available => "AVAILABLE",
            DriverStatus::OnTrip => "ON_TRIP",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    Sedan,
    Hatchback,
    Suv,
    Premium,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Sedan,
        VehicleType::Hatchback,
        VehicleType::Suv,
        VehicleType::Premium,
    ];
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VehicleType::Sedan => "Sedan",
            VehicleType::Hatchback => "Hatchback",
            VehicleType::Suv => "SUV",
            VehicleType::Premium => "Premium",
        })
    }
}

/// Cumulative running average used for driver ratings.
pub fn running_average(current: f64, samples: u32, sample: f64) -> f64 {
    (current * f64::from(samples) + sample) / f64::from(samples + 1)
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub vehicle: VehicleType,
    pub license_plate: String,
    status: DriverStatus,
    earnings: f64,
    rating: f64,
    total_trips: u32,
    assigned_ride: Option<RideId>,
}

impl Driver {
    /// New drivers start OFFLINE with no earnings.
    pub fn new(
        id: DriverId,
        name: impl Into<String>,
        vehicle: VehicleType,
        license_plate: impl Into<String>,
        initial_rating: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            vehicle,
            license_plate: license_plate.into(),
            status: DriverStatus::Offline,
            earnings: 0.0,
            rating: initial_rating,
            total_trips: 0,
            assigned_ride: None,
        }
    }

    pub fn status(&self) -> DriverStatus {
        self.status
    }

    pub fn earnings(&self) -> f64 {
        self.earnings
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn total_trips(&self) -> u32 {
        self.total_trips
    }

    pub fn assigned_ride(&self) -> Option<RideId> {
        self.assigned_ride
    }

    pub fn is_available(&self) -> bool {
        self.status == DriverStatus::Available
    }

    fn violation(&self, operation: &'static str) -> DispatchError {
        DispatchError::PreconditionViolation {
            subject: Selection::Driver(self.id),
            operation,
            status: self.status.to_string(),
        }
    }

    /// OFFLINE or AVAILABLE → AVAILABLE. A driver on a trip stays bound to it.
    pub fn go_online(&mut self) -> DispatchResult<()> {
        if self.status == DriverStatus::OnTrip {
            return Err(self.violation("bring online"));
        }
        self.status = DriverStatus::Available;
        Ok(())
    }

    /// OFFLINE or AVAILABLE → OFFLINE.
    pub fn go_offline(&mut self) -> DispatchResult<()> {
        if self.status == DriverStatus::OnTrip {
            return Err(self.violation("take offline"));
        }
        self.status = DriverStatus::Offline;
        Ok(())
    }

    /// AVAILABLE → ON_TRIP, bound to `ride`.
    pub fn start_trip(&mut self, ride: RideId) -> DispatchResult<()> {
        if self.status != DriverStatus::Available {
            return Err(self.violation("start trip for"));
        }
        self.status = DriverStatus::OnTrip;
        self.assigned_ride = Some(ride);
        Ok(())
    }

    /// ON_TRIP → AVAILABLE, crediting `payment` and folding `rating_sample`
    /// into the running-average rating.
    pub fn end_trip(&mut self, payment: f64, rating_sample: f64) -> DispatchResult<()> {
        if self.status != DriverStatus::OnTrip {
            return Err(self.violation("end trip for"));
        }
        self.status = DriverStatus::Available;
        self.assigned_ride = None;
        self.earnings += payment.max(0.0);
        self.rating = running_average(self.rating, self.total_trips, rating_sample);
        self.total_trips += 1;
        Ok(())
    }

    /// ON_TRIP → AVAILABLE without payment; the ride was cancelled.
    pub fn release_from_trip(&mut self) -> DispatchResult<()> {
        if self.status != DriverStatus::OnTrip {
            return Err(self.violation("release"));
        }
        self.status = DriverStatus::Available;
        self.assigned_ride = None;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Rider {
    pub id: RiderId,
    pub name: String,
    balance: f64,
    active_ride: Option<RideId>,
}

impl Rider {
    pub fn new(id: RiderId, name: impl Into<String>, initial_balance: f64) -> Self {
        Self {
            id,
            name: name.into(),
            balance: initial_balance,
            active_ride: None,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn has_active_ride(&self) -> bool {
        self.active_ride.is_some()
    }

    pub fn active_ride(&self) -> Option<RideId> {
        self.active_ride
    }

    /// Deducts `amount`. The balance may go negative; see [`crate::pricing::charge_rider`].
    pub fn pay(&mut self, amount: f64) {
        self.balance -= amount;
    }

    pub fn add_balance(&mut self, amount: f64) {
        self.balance += amount;
    }

    pub fn begin_ride(&mut self, ride: RideId) -> DispatchResult<()> {
        if self.active_ride.is_some() {
            return Err(DispatchError::RiderAlreadyOnRide(self.id));
        }
        self.active_ride = Some(ride);
        Ok(())
    }

    pub fn finish_ride(&mut self) {
        self.active_ride = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RideStatus {
    Requested,
    DriverAssigned,
    PickupReached,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }

    /// Forward-only transitions; any non-terminal state may be cancelled.
    pub fn can_transition_to(self, next: RideStatus) -> bool {
        use RideStatus::*;
        matches!(
            (self, next),
            (Requested, DriverAssigned)
                | (DriverAssigned, PickupReached)
                | (PickupReached, InProgress)
                | (InProgress, Completed)
                | (Requested | DriverAssigned | PickupReached | InProgress, Cancelled)
        )
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RideStatus::Requested => "REQUESTED",
            RideStatus::DriverAssigned => "DRIVER_ASSIGNED",
            RideStatus::PickupReached => "PICKUP_REACHED",
            RideStatus::InProgress => "IN_PROGRESS",
            RideStatus::Completed => "COMPLETED",
            RideStatus::Cancelled => "CANCELLED",
        })
    }
}

/// Tick stamps for each lifecycle milestone of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RideTiming {
    pub requested_at: u64,
    pub assigned_at: Option<u64>,
    pub pickup_at: Option<u64>,
    pub started_at: Option<u64>,
    pub finished_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Ride {
    pub id: RideId,
    pub rider: RiderId,
    driver: Option<DriverId>,
    pickup: Position,
    destination: Position,
    status: RideStatus,
    fare: f64,
    distance: f64,
    pub timing: RideTiming,
}

impl Ride {
    /// A freshly requested ride. Distance and fare are fixed here and never change.
    pub fn new(
        id: RideId,
        rider: RiderId,
        pickup: Position,
        destination: Position,
        pricing: &PricingConfig,
        requested_at: u64,
    ) -> Self {
        let distance = pickup.distance_to(&destination);
        Self {
            id,
            rider,
            driver: None,
            pickup,
            destination,
            status: RideStatus::Requested,
            fare: calculate_fare(distance, pricing),
            distance,
            timing: RideTiming {
                requested_at,
                ..Default::default()
            },
        }
    }

    pub fn driver(&self) -> Option<DriverId> {
        self.driver
    }

    pub fn pickup(&self) -> Position {
        self.pickup
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    pub fn status(&self) -> RideStatus {
        self.status
    }

    pub fn fare(&self) -> f64 {
        self.fare
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Moves the state machine forward, stamping the milestone with `now`.
    pub fn transition_to(&mut self, next: RideStatus, now: u64) -> DispatchResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DispatchError::PreconditionViolation {
                subject: Selection::Ride(self.id),
                operation: "move to next state",
                status: self.status.to_string(),
            });
        }
        self.status = next;
        match next {
            RideStatus::DriverAssigned => self.timing.assigned_at = Some(now),
            RideStatus::PickupReached => self.timing.pickup_at = Some(now),
            RideStatus::InProgress => self.timing.started_at = Some(now),
            RideStatus::Completed | RideStatus::Cancelled => self.timing.finished_at = Some(now),
            RideStatus::Requested => {}
        }
        Ok(())
    }

    /// REQUESTED → DRIVER_ASSIGNED, binding `driver`.
    pub fn assign_driver(&mut self, driver: DriverId, now: u64) -> DispatchResult<()> {
        self.transition_to(RideStatus::DriverAssigned, now)?;
        self.driver = Some(driver);
        Ok(())
    }
}
