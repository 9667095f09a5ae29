#![allow(dead_code)]

use dispatch_core::pricing::PricingConfig;
use dispatch_core::scenario::{AccountConfig, MovementConfig, ScenarioTable, SimulationParams};
use dispatch_core::Simulation;

/// Builder configuration for reproducible test simulations.
#[derive(Clone, Debug)]
pub struct TestSimConfig {
    pub seed: u64,
    pub pricing: PricingConfig,
    pub movement: MovementConfig,
    pub accounts: AccountConfig,
    pub scenarios: ScenarioTable,
}

impl Default for TestSimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            pricing: PricingConfig::default(),
            movement: MovementConfig::default(),
            accounts: AccountConfig::default(),
            scenarios: ScenarioTable::default(),
        }
    }
}

/// Helper that builds a [`Simulation`] with deterministic settings.
#[derive(Debug, Default)]
pub struct TestSimBuilder {
    config: TestSimConfig,
}

impl TestSimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.config.pricing = pricing;
        self
    }

    pub fn with_accounts(mut self, accounts: AccountConfig) -> Self {
        self.config.accounts = accounts;
        self
    }

    pub fn with_scenarios(mut self, scenarios: ScenarioTable) -> Self {
        self.config.scenarios = scenarios;
        self
    }

    pub fn build(self) -> Simulation {
        let TestSimConfig {
            seed,
            pricing,
            movement,
            accounts,
            scenarios,
        } = self.config;
        Simulation::new(
            SimulationParams::default()
                .with_seed(seed)
                .with_pricing(pricing)
                .with_movement(movement)
                .with_accounts(accounts)
                .with_scenarios(scenarios),
        )
    }
}
