//! Simulation runner: advances the clock and sweeps active rides once per tick.
//!
//! Requests, scenario changes and queries happen between ticks directly on the
//! [World]. A tick advances [SimulationClock], runs the schedule (ride progress,
//! then archiving), and reports the rides that finished during it.

use bevy_ecs::prelude::{Resource, Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};
use serde::Serialize;

use crate::clock::SimulationClock;
use crate::ecs::{RideId, RideStatus};
use crate::registry::RideBook;
use crate::systems::{ride_archive::ride_archive_system, ride_progress::ride_progress_system};

/// Rides that reached a terminal state during the current tick.
#[derive(Debug, Default, Resource)]
pub struct TickOutcome {
    pub finished: Vec<(RideId, RideStatus)>,
}

/// Summary of one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub finished: Vec<(RideId, RideStatus)>,
}

impl TickReport {
    pub fn completed(&self) -> impl Iterator<Item = RideId> + '_ {
        self.finished
            .iter()
            .filter(|(_, status)| *status == RideStatus::Completed)
            .map(|(id, _)| *id)
    }
}

/// Builds the tick schedule: progress every active ride, then archive the
/// finished ones and apply the despawns before the next tick.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((ride_progress_system, ride_archive_system, apply_deferred).chain());
    schedule
}

/// Runs one tick and returns what finished during it.
pub fn run_tick(world: &mut World, schedule: &mut Schedule) -> TickReport {
    let tick = world.resource_mut::<SimulationClock>().advance();
    world.resource_mut::<TickOutcome>().finished.clear();
    schedule.run(world);
    let finished = std::mem::take(&mut world.resource_mut::<TickOutcome>().finished);
    TickReport { tick, finished }
}

/// Ticks until no ride is active or `max_ticks` is reached.
/// Returns the number of ticks executed.
pub fn run_until_idle(world: &mut World, schedule: &mut Schedule, max_ticks: usize) -> usize {
    let mut ticks = 0;
    while ticks < max_ticks && !world.resource::<RideBook>().active().is_empty() {
        run_tick(world, schedule);
        ticks += 1;
    }
    ticks
}
