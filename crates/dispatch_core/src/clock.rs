use bevy_ecs::prelude::Resource;

/// Discrete simulation time, counted in ticks.
///
/// Requests and scenario changes between two ticks are stamped with the
/// current tick; [`SimulationClock::advance`] is called once at the start of
/// every tick sweep.
#[derive(Debug, Default, Clone, Copy, Resource)]
pub struct SimulationClock {
    now: u64,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Moves to the next tick and returns it.
    pub fn advance(&mut self) -> u64 {
        self.now += 1;
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_counts_ticks_from_zero() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.now(), 2);
    }
}
