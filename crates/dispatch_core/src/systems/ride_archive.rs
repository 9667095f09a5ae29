use bevy_ecs::prelude::{Commands, Query, ResMut};

use crate::ecs::{Ride, RideStatus};
use crate::registry::RideBook;
use crate::telemetry::{CompletedRideRecord, SimTelemetry};

/// Moves rides that reached a terminal state out of the active list.
///
/// Completed rides are archived and recorded in telemetry; cancelled rides are
/// despawned.
pub fn ride_archive_system(
    mut commands: Commands,
    mut book: ResMut<RideBook>,
    mut telemetry: ResMut<SimTelemetry>,
    rides: Query<&Ride>,
) {
    let finished: Vec<_> = book
        .active()
        .iter()
        .filter_map(|(id, entity)| {
            let ride = rides.get(*entity).ok()?;
            ride.status().is_terminal().then_some((*id, *entity, ride))
        })
        .collect();

    for (id, entity, ride) in finished {
        book.retire(id, ride.status());
        match ride.status() {
            RideStatus::Completed => {
                if let Some(record) = CompletedRideRecord::from_ride(ride) {
                    telemetry.completed_rides.push(record);
                }
            }
            // Cancelled rides are never kept; `Simulation::cancel_ride` lands here too.
            _ => {
                telemetry.cancelled_rides += 1;
                commands.entity(entity).despawn();
            }
        }
    }
}
