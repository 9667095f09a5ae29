//! The engine facade used by presentation layers.
//!
//! [`Simulation`] owns the ECS [World] and the tick [Schedule] and exposes the
//! engine operations: registering drivers and riders, availability control,
//! ride requests and cancellation, ticking, and read-only queries.

use bevy_ecs::prelude::{Entity, Query, Schedule, World};
use bevy_ecs::system::{RunSystemOnce, SystemState};
use log::info;

use crate::clock::SimulationClock;
use crate::dispatch::{self, DispatchOutcome};
use crate::ecs::{
    Driver, DriverId, DriverStatus, Ride, RideId, Rider, RiderId, SequentialId, VehicleType,
};
use crate::error::{DispatchError, DispatchResult};
use crate::lifecycle;
use crate::registry::{DriverRegistry, RideBook, RiderRegistry};
use crate::runner::{run_tick, run_until_idle, simulation_schedule, TickReport};
use crate::scenario::{
    self, build_simulation, ActiveScenario, DemandScenario, ScenarioApplied,
    SimulationParams,
};
use crate::spatial::Position;
use crate::systems::ride_archive::ride_archive_system;
use crate::telemetry::{self, DriverStatusSummary, SimStats, SimTelemetry};
use crate::views::{DriverView, RideView, RiderView};

pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationParams::default())
    }
}

impl Simulation {
    pub fn new(params: SimulationParams) -> Self {
        let mut world = World::new();
        build_simulation(&mut world, params);
        Self {
            world,
            schedule: simulation_schedule(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Current tick.
    pub fn now(&self) -> u64 {
        self.world.resource::<SimulationClock>().now()
    }

    /// Fails with `InvalidPosition` for non-finite coordinates.
    pub fn create_rider(
        &mut self,
        name: impl Into<String>,
        position: Position,
    ) -> DispatchResult<RiderId> {
        scenario::spawn_rider(&mut self.world, name, position)
    }

    /// New drivers start OFFLINE. Fails with `InvalidPosition` for non-finite coordinates.
    pub fn create_driver(
        &mut self,
        name: impl Into<String>,
        position: Position,
        vehicle: VehicleType,
        license_plate: impl Into<String>,
    ) -> DispatchResult<DriverId> {
        scenario::spawn_driver(&mut self.world, name, position, vehicle, license_plate)
    }

    pub fn set_driver_online(&mut self, id: DriverId) -> DispatchResult<()> {
        let entity = self.world.resource::<DriverRegistry>().resolve(id)?;
        let position = self.world.get::<Position>(entity).copied().unwrap_or_default();
        let mut driver = self
            .world
            .get_mut::<Driver>(entity)
            .ok_or(DispatchError::InvalidSelection(id.selection()))?;
        driver.go_online()?;
        info!("Driver {} is now ONLINE at location {}", driver.name, position);
        Ok(())
    }

    pub fn set_driver_offline(&mut self, id: DriverId) -> DispatchResult<()> {
        let entity = self.world.resource::<DriverRegistry>().resolve(id)?;
        let mut driver = self
            .world
            .get_mut::<Driver>(entity)
            .ok_or(DispatchError::InvalidSelection(id.selection()))?;
        driver.go_offline()?;
        info!("Driver {} is now OFFLINE", driver.name);
        Ok(())
    }

    /// Brings every OFFLINE driver online; returns how many changed.
    pub fn set_all_drivers_online(&mut self) -> DispatchResult<usize> {
        scenario::set_all_drivers_online(&mut self.world)
    }

    /// Brings each OFFLINE driver online with `probability`, using the seeded RNG.
    pub fn set_initial_drivers_online(&mut self, probability: f64) -> DispatchResult<usize> {
        scenario::set_initial_drivers_online(&mut self.world, probability)
    }

    /// Adds `amount` to the rider's wallet and returns the new balance.
    pub fn top_up_rider(&mut self, id: RiderId, amount: f64) -> DispatchResult<f64> {
        let entity = self.world.resource::<RiderRegistry>().resolve(id)?;
        let mut rider = self
            .world
            .get_mut::<Rider>(entity)
            .ok_or(DispatchError::InvalidSelection(id.selection()))?;
        rider.add_balance(amount);
        info!("{} added {:.2} to wallet", rider.name, amount);
        Ok(rider.balance())
    }

    /// Requests a ride from the rider's current position and dispatches it at once.
    pub fn request_ride(
        &mut self,
        rider: RiderId,
        destination: Position,
    ) -> DispatchResult<DispatchOutcome> {
        dispatch::request_ride(&mut self.world, rider, destination)
    }

    /// Cancels an active ride, releasing its driver and rider. Nobody pays.
    /// The ride is retired and despawned by the archive step straight away.
    pub fn cancel_ride(&mut self, id: RideId) -> DispatchResult<RideView> {
        let entity = self.world.resource::<RideBook>().resolve(id)?;
        let now = self.now();
        let drivers = self.world.resource::<DriverRegistry>();
        let riders = self.world.resource::<RiderRegistry>();
        let ride = self
            .world
            .get::<Ride>(entity)
            .ok_or(DispatchError::InvalidSelection(id.selection()))?;
        let driver_entity = ride.driver().and_then(|driver| drivers.get(driver));
        let rider_entity = riders.resolve(ride.rider)?;

        let mut state: SystemState<(Query<&mut Ride>, Query<&mut Driver>, Query<&mut Rider>)> =
            SystemState::new(&mut self.world);
        let (mut rides, mut drivers, mut riders) = state.get_mut(&mut self.world);
        let mut ride = rides
            .get_mut(entity)
            .map_err(|_| DispatchError::InvalidSelection(id.selection()))?;
        let mut rider = riders
            .get_mut(rider_entity)
            .map_err(|_| DispatchError::InvalidSelection(ride.rider.selection()))?;
        let mut driver = driver_entity.and_then(|e| drivers.get_mut(e).ok());
        lifecycle::cancel_ride(&mut ride, driver.as_deref_mut(), &mut rider, now)?;
        let view = RideView::from(&*ride);

        self.world.run_system_once(ride_archive_system);
        Ok(view)
    }

    /// Applies a named demand scenario to the driver pool.
    pub fn apply_scenario(&mut self, name: &str) -> DispatchResult<ScenarioApplied> {
        scenario::apply_scenario(&mut self.world, name)
    }

    pub fn active_scenario(&self) -> Option<(String, DemandScenario)> {
        self.world.resource::<ActiveScenario>().0.clone()
    }

    /// Advances every active ride by one step.
    pub fn tick(&mut self) -> TickReport {
        run_tick(&mut self.world, &mut self.schedule)
    }

    /// Ticks until no ride is active or `max_ticks` is reached; returns ticks run.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        run_until_idle(&mut self.world, &mut self.schedule, max_ticks)
    }

    pub fn driver(&self, id: DriverId) -> DispatchResult<DriverView> {
        let entity = self.world.resource::<DriverRegistry>().resolve(id)?;
        self.driver_view(entity)
            .ok_or(DispatchError::InvalidSelection(id.selection()))
    }

    /// All drivers in registration order, or only the AVAILABLE ones.
    pub fn drivers(&self, available_only: bool) -> Vec<DriverView> {
        self.world
            .resource::<DriverRegistry>()
            .iter()
            .filter_map(|(_, entity)| self.driver_view(entity))
            .filter(|view| !available_only || view.status == DriverStatus::Available)
            .collect()
    }

    pub fn rider(&self, id: RiderId) -> DispatchResult<RiderView> {
        let entity = self.world.resource::<RiderRegistry>().resolve(id)?;
        self.rider_view(entity)
            .ok_or(DispatchError::InvalidSelection(id.selection()))
    }

    pub fn riders(&self) -> Vec<RiderView> {
        self.world
            .resource::<RiderRegistry>()
            .iter()
            .filter_map(|(_, entity)| self.rider_view(entity))
            .collect()
    }

    /// Looks up an active or completed ride. Cancelled rides are gone.
    pub fn ride(&self, id: RideId) -> DispatchResult<RideView> {
        let entity = self.world.resource::<RideBook>().resolve(id)?;
        self.world
            .get::<Ride>(entity)
            .map(RideView::from)
            .ok_or(DispatchError::InvalidSelection(id.selection()))
    }

    pub fn active_rides(&self) -> Vec<RideView> {
        self.ride_views(self.world.resource::<RideBook>().active())
    }

    pub fn completed_rides(&self) -> Vec<RideView> {
        self.ride_views(self.world.resource::<RideBook>().completed())
    }

    pub fn statistics(&self) -> SimStats {
        telemetry::collect_stats(&self.world)
    }

    pub fn driver_status_summary(&self) -> DriverStatusSummary {
        telemetry::driver_status_summary(&self.world)
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        self.world.resource::<SimTelemetry>()
    }

    fn driver_view(&self, entity: Entity) -> Option<DriverView> {
        let driver = self.world.get::<Driver>(entity)?;
        let position = self.world.get::<Position>(entity)?;
        Some(DriverView::new(driver, *position))
    }

    fn rider_view(&self, entity: Entity) -> Option<RiderView> {
        let rider = self.world.get::<Rider>(entity)?;
        let position = self.world.get::<Position>(entity)?;
        Some(RiderView::new(rider, *position))
    }

    fn ride_views(&self, rides: &[(RideId, Entity)]) -> Vec<RideView> {
        rides
            .iter()
            .filter_map(|(_, entity)| self.world.get::<Ride>(*entity).map(RideView::from))
            .collect()
    }
}
