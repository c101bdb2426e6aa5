//! Per-frame physics step
//!
//! Advances every stalk, particle and effect by one tick and drains the ones
//! that are done. One tick corresponds to one display frame.

use super::state::{Expiry, SimState};

/// What left the simulation during a tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Unsevered stalks that reached the bottom (each is a miss)
    pub missed: u32,
    /// Ids of every stalk removed this tick, missed or fallen
    pub removed: Vec<u32>,
}

/// Advance the simulation by one tick
pub fn tick(state: &mut SimState) -> TickReport {
    let mut report = TickReport::default();
    let field = state.field;

    state.stalks.retain_mut(|stalk| {
        stalk.step();
        match stalk.expiry(field) {
            None => true,
            Some(expiry) => {
                if expiry == Expiry::Missed {
                    report.missed += 1;
                    log::debug!("Stalk {} reached the bottom uncut", stalk.id);
                }
                report.removed.push(stalk.id);
                false
            }
        }
    });

    state.particles.retain_mut(|p| p.step());

    state.effects.retain_mut(|effect| {
        effect.ticks_left = effect.ticks_left.saturating_sub(1);
        effect.ticks_left > 0
    });

    state.time_ticks += 1;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Difficulty;
    use crate::sim::geometry::Segment;
    use crate::sim::state::tests::test_stalk;
    use crate::sim::state::{Effect, EffectKind, FieldSize, Particle};
    use glam::Vec2;

    fn state() -> SimState {
        SimState::new(FieldSize::new(800.0, 600.0), 12345)
    }

    #[test]
    fn test_stalks_fall_each_tick() {
        let mut state = state();
        state.spawn_stalk(Difficulty::Extreme, 60.0);
        let y0 = state.stalks[0].pos.y;
        tick(&mut state);
        assert_eq!(state.stalks[0].pos.y, y0 + 4.0);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_uncut_stalk_at_bottom_is_a_miss() {
        let mut state = state();
        state.stalks.push(test_stalk(7, Vec2::new(0.0, 599.0), 2));
        let report = tick(&mut state);
        assert_eq!(report.missed, 1);
        assert_eq!(report.removed, vec![7]);
        assert!(state.stalks.is_empty());
    }

    #[test]
    fn test_severed_stalk_falls_out_quietly() {
        let mut state = state();
        let mut stalk = test_stalk(3, Vec2::new(0.0, 650.0), 1);
        stalk.apply_hit();
        stalk.fall_speed = 2.0;
        state.stalks.push(stalk);

        // Still inside the cleanup margin
        let report = tick(&mut state);
        assert_eq!(report, TickReport::default());

        state.stalks[0].pos.y = 699.0;
        let report = tick(&mut state);
        assert_eq!(report.missed, 0);
        assert_eq!(report.removed, vec![3]);
    }

    #[test]
    fn test_particles_expire() {
        let mut state = state();
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 0.1,
            decay: 0.04,
            size: 2.0,
            color: 1,
        });
        tick(&mut state);
        tick(&mut state);
        assert_eq!(state.particles.len(), 1);
        tick(&mut state);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_effects_age_out() {
        let mut state = state();
        let slash = Segment::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        state.effects.push(Effect::new(EffectKind::Slash(slash), 2));
        tick(&mut state);
        assert_eq!(state.effects[0].ticks_left, 1);
        tick(&mut state);
        assert!(state.effects.is_empty());
    }
}
