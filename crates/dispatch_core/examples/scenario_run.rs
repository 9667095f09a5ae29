//! Run a small seeded fleet through a demand scenario and print the results.
//!
//! Run with: RUST_LOG=info cargo run -p dispatch_core --example scenario_run

use dispatch_core::ecs::VehicleType;
use dispatch_core::scenario::SimulationParams;
use dispatch_core::spatial::Position;
use dispatch_core::{DispatchResult, Simulation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_RIDERS: usize = 5;
const NUM_DRIVERS: usize = 15;
const GRID_SIZE: f64 = 100.0;
const MAX_TICKS: usize = 10_000;
const SEED: u64 = 123;

const RIDER_NAMES: [&str; NUM_RIDERS] = ["Asha", "Rahul", "Neha", "Vikram", "Priya"];

fn random_position(rng: &mut StdRng) -> Position {
    Position::new(rng.gen_range(0.0..GRID_SIZE), rng.gen_range(0.0..GRID_SIZE))
}

fn main() -> DispatchResult<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut sim = Simulation::new(SimulationParams::default().with_seed(SEED));

    for i in 0..NUM_DRIVERS {
        sim.create_driver(
            format!("Driver {}", i + 1),
            random_position(&mut rng),
            VehicleType::ALL[rng.gen_range(0..VehicleType::ALL.len())],
            format!("KA{:02}AB{:04}", rng.gen_range(1..30), rng.gen_range(1000..10_000)),
        )?;
    }
    let riders = RIDER_NAMES
        .iter()
        .map(|name| sim.create_rider(*name, random_position(&mut rng)))
        .collect::<DispatchResult<Vec<_>>>()?;

    let applied = sim.apply_scenario("rush-hour")?;
    println!(
        "--- Scenario {} ({} of {} drivers online, surge {:.1}x, seed {}) ---",
        applied.name, applied.online, applied.total_drivers, applied.surge_multiplier, SEED
    );

    for rider in riders {
        let outcome = sim.request_ride(rider, random_position(&mut rng))?;
        let ride = outcome.ride();
        println!(
            "Ride #{} for rider {}: {} (fare {:.2}, distance {:.2})",
            ride.id, rider, ride.status, ride.fare, ride.distance
        );
    }

    let ticks = sim.run_until_idle(MAX_TICKS);
    let stats = sim.statistics();
    println!("Ticks executed: {ticks}");
    println!("Completed rides: {}", stats.completed_rides);
    println!("Cancelled rides: {}", stats.cancelled_rides);
    println!("Total driver earnings: {:.2}", stats.total_earnings);
    if let Some(average) = stats.average_fare {
        println!("Average fare: {average:.2}");
    }

    for record in &sim.telemetry().completed_rides {
        println!(
            "  ride #{} rider={} driver={} time_to_pickup={} trip_duration={} completed_at={}",
            record.ride_id,
            record.rider_id,
            record.driver_id,
            record.time_to_pickup(),
            record.trip_duration(),
            record.completed_at,
        );
    }
    Ok(())
}
