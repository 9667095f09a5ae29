#![allow(dead_code)]

use dispatch_core::dispatch::DispatchOutcome;
use dispatch_core::ecs::{DriverId, RideId, RiderId, VehicleType};
use dispatch_core::spatial::Position;
use dispatch_core::Simulation;

/// Registers a sedan driver at (`x`, `y`) and brings it online.
pub fn online_driver(sim: &mut Simulation, x: f64, y: f64) -> DriverId {
    let id = offline_driver(sim, x, y);
    sim.set_driver_online(id).expect("new driver can go online");
    id
}

/// Registers a sedan driver at (`x`, `y`) and leaves it OFFLINE.
pub fn offline_driver(sim: &mut Simulation, x: f64, y: f64) -> DriverId {
    let n = sim.drivers(false).len() + 1;
    sim.create_driver(
        format!("Driver {n}"),
        Position::new(x, y),
        VehicleType::ALL[n % VehicleType::ALL.len()],
        format!("KA01AB{n:04}"),
    )
    .expect("finite driver position")
}

pub fn rider_at(sim: &mut Simulation, x: f64, y: f64) -> RiderId {
    let n = sim.riders().len() + 1;
    sim.create_rider(format!("Rider {n}"), Position::new(x, y))
        .expect("finite rider position")
}

/// Requests a ride and returns its id, panicking if no driver was assigned.
pub fn assigned_ride(sim: &mut Simulation, rider: RiderId, x: f64, y: f64) -> RideId {
    match sim
        .request_ride(rider, Position::new(x, y))
        .expect("ride request should succeed")
    {
        DispatchOutcome::Assigned { ride, .. } => ride.id,
        DispatchOutcome::Cancelled { ride } => panic!("ride #{} was cancelled", ride.id),
    }
}
