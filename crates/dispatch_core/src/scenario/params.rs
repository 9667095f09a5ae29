use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::pricing::PricingConfig;
use crate::spatial::{DEFAULT_MOVE_STEP, DEFAULT_SNAP_THRESHOLD};

use super::table::ScenarioTable;

/// Distance below which a driver counts as having reached pickup or destination.
pub const DEFAULT_ARRIVAL_RADIUS: f64 = 1.0;

/// Wallet balance every rider starts with.
pub const DEFAULT_INITIAL_BALANCE: f64 = 1000.0;

/// Rating every driver starts with.
pub const DEFAULT_INITIAL_RATING: f64 = 5.0;

/// How drivers move each tick and when they count as arrived.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct MovementConfig {
    pub step: f64,
    pub snap_threshold: f64,
    pub arrival_radius: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_MOVE_STEP,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            arrival_radius: DEFAULT_ARRIVAL_RADIUS,
        }
    }
}

/// Starting values for newly created riders and drivers.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct AccountConfig {
    pub initial_balance: f64,
    pub initial_rating: f64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            initial_rating: DEFAULT_INITIAL_RATING,
        }
    }
}

/// Parameters for building a simulation world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Seed for scenario sampling (optional; if None, uses entropy).
    pub seed: Option<u64>,
    pub pricing: PricingConfig,
    pub movement: MovementConfig,
    pub accounts: AccountConfig,
    pub scenarios: ScenarioTable,
}

impl SimulationParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_movement(mut self, movement: MovementConfig) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_accounts(mut self, accounts: AccountConfig) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_scenarios(mut self, scenarios: ScenarioTable) -> Self {
        self.scenarios = scenarios;
        self
    }
}
