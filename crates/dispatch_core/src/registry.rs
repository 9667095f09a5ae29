//! Id → entity registries for drivers, riders and rides.
//!
//! Rides never hold entity handles of their driver or rider; every access goes
//! through these resources. Registration order is also the encounter order the
//! dispatcher scans drivers in.

use std::marker::PhantomData;

use bevy_ecs::prelude::{Entity, Resource};

use crate::ecs::{DriverId, RideId, RideStatus, RiderId, SequentialId};
use crate::error::{DispatchError, DispatchResult};

/// Entities registered under sequential ids starting at 1. Entries are never removed.
#[derive(Debug, Resource)]
pub struct Registry<I: SequentialId> {
    entities: Vec<Entity>,
    _id: PhantomData<I>,
}

pub type DriverRegistry = Registry<DriverId>;
pub type RiderRegistry = Registry<RiderId>;

impl<I: SequentialId> Default for Registry<I> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            _id: PhantomData,
        }
    }
}

impl<I: SequentialId> Registry<I> {
    /// Id the next registered entity will receive.
    pub fn next_id(&self) -> I {
        I::from_raw(self.entities.len() as u32 + 1)
    }

    pub fn register(&mut self, entity: Entity) -> I {
        let id = self.next_id();
        self.entities.push(entity);
        id
    }

    pub fn get(&self, id: I) -> Option<Entity> {
        self.entities.get(id.index()).copied()
    }

    /// Like [`Registry::get`], reporting an unknown id as `InvalidSelection`.
    pub fn resolve(&self, id: I) -> DispatchResult<Entity> {
        self.get(id)
            .ok_or_else(|| DispatchError::InvalidSelection(id.selection()))
    }

    /// Ids and entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (I, Entity)> + '_ {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, entity)| (I::from_raw(i as u32 + 1), *entity))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Bookkeeping for rides: the active list (in request order) and the archive
/// of completed rides. Cancelled rides are dropped from both.
#[derive(Debug, Default, Resource)]
pub struct RideBook {
    next_id: u32,
    active: Vec<(RideId, Entity)>,
    completed: Vec<(RideId, Entity)>,
}

impl RideBook {
    pub fn allocate_id(&mut self) -> RideId {
        self.next_id += 1;
        RideId(self.next_id)
    }

    pub fn push_active(&mut self, id: RideId, entity: Entity) {
        self.active.push((id, entity));
    }

    pub fn remove_active(&mut self, id: RideId) -> Option<Entity> {
        let position = self.active.iter().position(|(ride, _)| *ride == id)?;
        Some(self.active.remove(position).1)
    }

    /// Removes `id` from the active list, keeping it in the archive only when it completed.
    pub fn retire(&mut self, id: RideId, status: RideStatus) -> Option<Entity> {
        let entity = self.remove_active(id)?;
        if status == RideStatus::Completed {
            self.completed.push((id, entity));
        }
        Some(entity)
    }

    pub fn active(&self) -> &[(RideId, Entity)] {
        &self.active
    }

    pub fn completed(&self) -> &[(RideId, Entity)] {
        &self.completed
    }

    pub fn find(&self, id: RideId) -> Option<Entity> {
        self.active
            .iter()
            .chain(self.completed.iter())
            .find(|(ride, _)| *ride == id)
            .map(|(_, entity)| *entity)
    }

    pub fn resolve(&self, id: RideId) -> DispatchResult<Entity> {
        self.find(id)
            .ok_or_else(|| DispatchError::InvalidSelection(id.selection()))
    }
}
