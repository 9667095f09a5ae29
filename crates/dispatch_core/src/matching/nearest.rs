use crate::ecs::DriverId;
use crate::spatial::Position;

use super::algorithm::MatchingAlgorithm;

/// Greedy nearest-neighbour matching.
///
/// Scans the pool once and keeps the driver with the strictly smallest
/// Euclidean distance to the pickup. On an exact tie the driver encountered
/// first wins. Drivers whose distance is NaN are never matched. There is no
/// radius limit, no queueing and no reassignment.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestAvailable;

impl MatchingAlgorithm for NearestAvailable {
    fn find_match(
        &self,
        pickup: Position,
        available_drivers: &[(DriverId, Position)],
    ) -> Option<DriverId> {
        let mut best: Option<(DriverId, f64)> = None;
        for (driver, position) in available_drivers {
            let distance = position.distance_to(&pickup);
            if distance.is_nan() {
                continue;
            }
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((*driver, distance)),
            }
        }
        best.map(|(driver, _)| driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_strictly_nearest_driver() {
        let pickup = Position::new(10.0, 10.0);
        let drivers = [
            (DriverId(1), Position::new(0.0, 0.0)),
            (DriverId(2), Position::new(9.0, 10.0)),
            (DriverId(3), Position::new(12.0, 12.0)),
        ];
        assert_eq!(NearestAvailable.find_match(pickup, &drivers), Some(DriverId(2)));
    }

    #[test]
    fn first_encountered_wins_on_ties() {
        let pickup = Position::new(0.0, 0.0);
        let drivers = [
            (DriverId(4), Position::new(0.0, 3.0)),
            (DriverId(2), Position::new(3.0, 0.0)),
        ];
        assert_eq!(NearestAvailable.find_match(pickup, &drivers), Some(DriverId(4)));
    }

    #[test]
    fn nan_distances_never_win() {
        let pickup = Position::new(0.0, 0.0);
        let drivers = [
            (DriverId(1), Position::new(f64::NAN, 0.0)),
            (DriverId(2), Position::new(7.0, 0.0)),
        ];
        assert_eq!(NearestAvailable.find_match(pickup, &drivers), Some(DriverId(2)));
        assert_eq!(NearestAvailable.find_match(pickup, &drivers[..1]), None);
    }

    #[test]
    fn empty_pool_has_no_match() {
        assert_eq!(NearestAvailable.find_match(Position::default(), &[]), None);
    }
}
