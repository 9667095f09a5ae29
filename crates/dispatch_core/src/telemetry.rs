//! Telemetry / KPIs: completed-ride records and aggregate statistics.

use bevy_ecs::prelude::{Resource, World};
use serde::Serialize;

use crate::ecs::{Driver, DriverId, DriverStatus, Ride, RideId, RiderId};
use crate::registry::{DriverRegistry, RideBook, RiderRegistry};

/// One completed ride, recorded when it is archived.
/// Timestamps are simulation ticks; use the helper methods for derived KPIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedRideRecord {
    pub ride_id: RideId,
    pub rider_id: RiderId,
    pub driver_id: DriverId,
    pub fare: f64,
    pub distance: f64,
    pub requested_at: u64,
    pub assigned_at: u64,
    pub pickup_at: u64,
    pub completed_at: u64,
}

impl CompletedRideRecord {
    /// `None` unless the ride completed with a driver and every milestone stamped.
    pub fn from_ride(ride: &Ride) -> Option<Self> {
        let timing = ride.timing;
        Some(Self {
            ride_id: ride.id,
            rider_id: ride.rider,
            driver_id: ride.driver()?,
            fare: ride.fare(),
            distance: ride.distance(),
            requested_at: timing.requested_at,
            assigned_at: timing.assigned_at?,
            pickup_at: timing.pickup_at?,
            completed_at: timing.finished_at?,
        })
    }

    /// Time from request to driver assignment.
    pub fn time_to_assign(&self) -> u64 {
        self.assigned_at.saturating_sub(self.requested_at)
    }

    /// Time from assignment to reaching the pickup point.
    pub fn time_to_pickup(&self) -> u64 {
        self.pickup_at.saturating_sub(self.assigned_at)
    }

    /// Time from pickup to arrival at the destination.
    pub fn trip_duration(&self) -> u64 {
        self.completed_at.saturating_sub(self.pickup_at)
    }
}

/// Collects simulation telemetry.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub completed_rides: Vec<CompletedRideRecord>,
    /// Rides cancelled either at dispatch (no driver) or explicitly.
    pub cancelled_rides: u64,
}

/// Driver pool broken down by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DriverStatusSummary {
    pub available: usize,
    pub on_trip: usize,
    pub offline: usize,
}

impl DriverStatusSummary {
    pub fn add(&mut self, status: DriverStatus) {
        match status {
            DriverStatus::Available => self.available += 1,
            DriverStatus::OnTrip => self.on_trip += 1,
            DriverStatus::Offline => self.offline += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.available + self.on_trip + self.offline
    }

    /// Percentage of drivers AVAILABLE or ON_TRIP (0 for an empty pool).
    pub fn online_rate_percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.available + self.on_trip) as f64 * 100.0 / total as f64
    }
}

/// Aggregate statistics over the whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimStats {
    pub total_riders: usize,
    pub total_drivers: usize,
    pub active_rides: usize,
    pub completed_rides: usize,
    pub cancelled_rides: u64,
    pub total_earnings: f64,
    pub total_trips: u64,
    /// `None` until a ride has completed.
    pub average_fare: Option<f64>,
    pub available_drivers: usize,
}

pub fn driver_status_summary(world: &World) -> DriverStatusSummary {
    let mut summary = DriverStatusSummary::default();
    for (_, entity) in world.resource::<DriverRegistry>().iter() {
        if let Some(driver) = world.get::<Driver>(entity) {
            summary.add(driver.status());
        }
    }
    summary
}

pub fn collect_stats(world: &World) -> SimStats {
    let book = world.resource::<RideBook>();
    let drivers = world.resource::<DriverRegistry>();

    let mut total_earnings = 0.0;
    let mut total_trips = 0u64;
    let mut available_drivers = 0;
    for (_, entity) in drivers.iter() {
        let Some(driver) = world.get::<Driver>(entity) else {
            continue;
        };
        total_earnings += driver.earnings();
        total_trips += u64::from(driver.total_trips());
        if driver.is_available() {
            available_drivers += 1;
        }
    }

    let fares: Vec<f64> = book
        .completed()
        .iter()
        .filter_map(|(_, entity)| world.get::<Ride>(*entity).map(Ride::fare))
        .collect();
    let average_fare = if fares.is_empty() {
        None
    } else {
        Some(fares.iter().sum::<f64>() / fares.len() as f64)
    };

    SimStats {
        total_riders: world.resource::<RiderRegistry>().len(),
        total_drivers: drivers.len(),
        active_rides: book.active().len(),
        completed_rides: book.completed().len(),
        cancelled_rides: world.resource::<SimTelemetry>().cancelled_rides,
        total_earnings,
        total_trips,
        average_fare,
        available_drivers,
    }
}
