use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult};

/// A named demand regime.
///
/// Only `driver_online_rate` drives the engine. `ride_request_rate` is for
/// request generators outside the engine, and `surge_multiplier` is advisory:
/// fares ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandScenario {
    pub driver_online_rate: f64,
    pub ride_request_rate: f64,
    #[serde(alias = "surge")]
    pub surge_multiplier: f64,
}

impl DemandScenario {
    pub const fn new(driver_online_rate: f64, ride_request_rate: f64, surge_multiplier: f64) -> Self {
        Self {
            driver_online_rate,
            ride_request_rate,
            surge_multiplier,
        }
    }

    fn validate(&self, name: &str) -> DispatchResult<()> {
        let rate_ok = |rate: f64| (0.0..=1.0).contains(&rate);
        if !rate_ok(self.driver_online_rate) || !rate_ok(self.ride_request_rate) {
            return Err(DispatchError::InvalidScenarioTable(format!(
                "{name}: rates must lie in [0, 1]"
            )));
        }
        if self.surge_multiplier.is_nan() || self.surge_multiplier <= 0.0 {
            return Err(DispatchError::InvalidScenarioTable(format!(
                "{name}: surge multiplier must be positive"
            )));
        }
        Ok(())
    }
}

/// Scenario name → parameters. Every entry is validated, including on deserialization.
#[derive(Debug, Clone, PartialEq, Resource, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, DemandScenario>",
    into = "BTreeMap<String, DemandScenario>"
)]
pub struct ScenarioTable {
    scenarios: BTreeMap<String, DemandScenario>,
}

impl Default for ScenarioTable {
    fn default() -> Self {
        let scenarios = [
            ("rush-hour", DemandScenario::new(0.8, 0.7, 1.5)),
            ("moderate", DemandScenario::new(0.6, 0.4, 1.0)),
            ("late-night", DemandScenario::new(0.3, 0.2, 2.0)),
            ("weekend", DemandScenario::new(0.7, 0.6, 1.3)),
        ]
        .into_iter()
        .map(|(name, scenario)| (name.to_string(), scenario))
        .collect();
        Self { scenarios }
    }
}

impl TryFrom<BTreeMap<String, DemandScenario>> for ScenarioTable {
    type Error = DispatchError;

    fn try_from(scenarios: BTreeMap<String, DemandScenario>) -> DispatchResult<Self> {
        for (name, scenario) in &scenarios {
            scenario.validate(name)?;
        }
        Ok(Self { scenarios })
    }
}

impl From<ScenarioTable> for BTreeMap<String, DemandScenario> {
    fn from(table: ScenarioTable) -> Self {
        table.scenarios
    }
}

impl ScenarioTable {
    pub fn empty() -> Self {
        Self {
            scenarios: BTreeMap::new(),
        }
    }

    /// Parses a JSON object of `name -> {driver_online_rate, ride_request_rate, surge_multiplier}`.
    pub fn from_json(json: &str) -> DispatchResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, scenario: DemandScenario) -> DispatchResult<()> {
        let name = name.into();
        scenario.validate(&name)?;
        self.scenarios.insert(name, scenario);
        Ok(())
    }

    pub fn get(&self, name: &str) -> DispatchResult<DemandScenario> {
        self.scenarios
            .get(name)
            .copied()
            .ok_or_else(|| DispatchError::UnknownScenario(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// The scenario applied most recently, if any.
#[derive(Debug, Clone, Default, PartialEq, Resource)]
pub struct ActiveScenario(pub Option<(String, DemandScenario)>);

impl ActiveScenario {
    /// Advisory surge multiplier; 1.0 when no scenario has been applied.
    pub fn surge_multiplier(&self) -> f64 {
        self.0
            .as_ref()
            .map(|(_, scenario)| scenario.surge_multiplier)
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_four_regimes() {
        let table = ScenarioTable::default();
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, vec!["late-night", "moderate", "rush-hour", "weekend"]);
        assert_eq!(table.get("rush-hour").expect("rush hour").driver_online_rate, 0.8);
        assert_eq!(table.get("late-night").expect("late night").surge_multiplier, 2.0);
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = ScenarioTable::default().get("blizzard").unwrap_err();
        assert!(matches!(err, DispatchError::UnknownScenario(name) if name == "blizzard"));
    }

    #[test]
    fn parses_json_and_accepts_short_surge_key() {
        let table = ScenarioTable::from_json(
            r#"{"festival": {"driver_online_rate": 0.9, "ride_request_rate": 0.95, "surge": 2.5}}"#,
        )
        .expect("valid table");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("festival").expect("festival").surge_multiplier, 2.5);
    }

    #[test]
    fn rejects_out_of_range_rates() {
        let err = ScenarioTable::from_json(
            r#"{"broken": {"driver_online_rate": 1.5, "ride_request_rate": 0.2, "surge_multiplier": 1.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidScenarioTable(_)));

        let mut table = ScenarioTable::empty();
        assert!(table.insert("free", DemandScenario::new(0.5, 0.5, 0.0)).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn surge_defaults_to_one_without_scenario() {
        assert_eq!(ActiveScenario::default().surge_multiplier(), 1.0);
    }
}
