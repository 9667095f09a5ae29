//! Fare calculation and rider charging.
//!
//! Fares are a flat base plus a per-distance-unit rate, computed once when a
//! ride is requested. The scenario surge multiplier is advisory and does not
//! enter the fare.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::ecs::Rider;

/// Fixed part of every fare.
pub const BASE_FARE: f64 = 20.0;

/// Rate per unit of pickup-to-destination distance.
pub const PER_UNIT_RATE: f64 = 8.0;

/// Rating sample awarded to the driver on every completed ride.
pub const COMPLETION_RATING: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct PricingConfig {
    pub base_fare: f64,
    pub per_unit_rate: f64,
    pub completion_rating: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_fare: BASE_FARE,
            per_unit_rate: PER_UNIT_RATE,
            completion_rating: COMPLETION_RATING,
        }
    }
}

/// Formula: `fare = distance * per_unit_rate + base_fare`
pub fn calculate_fare(distance: f64, pricing: &PricingConfig) -> f64 {
    distance * pricing.per_unit_rate + pricing.base_fare
}

/// Settles a completed ride's fare against the rider's wallet.
///
/// There is no sufficient-funds check: the balance is allowed to go negative.
/// A stricter wallet policy belongs here and nowhere else.
pub fn charge_rider(rider: &mut Rider, fare: f64) {
    rider.pay(fare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::RiderId;

    #[test]
    fn fare_includes_base_and_distance() {
        let pricing = PricingConfig::default();
        assert_eq!(calculate_fare(0.0, &pricing), 20.0);
        assert_eq!(calculate_fare(10.0, &pricing), 100.0);
    }

    #[test]
    fn charging_can_overdraw_the_wallet() {
        let mut rider = Rider::new(RiderId(1), "Priya", 50.0);
        charge_rider(&mut rider, 100.0);
        assert_eq!(rider.balance(), -50.0);
    }
}
