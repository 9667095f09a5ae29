//! Simulation setup and the scenario controller.
//!
//! [`build_simulation`] inserts configuration and bookkeeping resources;
//! [`apply_scenario`] reshapes driver availability to a named demand regime.

mod build;
mod control;
mod params;
mod table;

pub use build::{build_simulation, spawn_driver, spawn_rider};
pub use control::{
    apply_scenario, set_all_drivers_online, set_initial_drivers_online, ScenarioApplied,
    ScenarioRng,
};
pub use params::{
    AccountConfig, MovementConfig, SimulationParams, DEFAULT_ARRIVAL_RADIUS,
    DEFAULT_INITIAL_BALANCE, DEFAULT_INITIAL_RATING,
};
pub use table::{ActiveScenario, DemandScenario, ScenarioTable};
