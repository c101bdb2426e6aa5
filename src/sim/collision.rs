//! Swipe collision and cut resolution
//!
//! A completed swipe is tested against every standing stalk's bounding box.
//! Each hit costs the stalk one hit point; the hit that takes it to zero
//! severs it, throws particles and may count as a perfect cut.

use glam::Vec2;

use super::geometry::{Segment, segment_intersects_rect};
use super::state::{Effect, EffectKind, HitOutcome, SimState, Stalk};
use crate::consts::*;

/// What happened to one stalk during a swipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutEvent {
    /// Non-lethal hit
    Damaged { stalk_id: u32, remaining: u8 },
    /// Hit points reached zero
    Severed {
        stalk_id: u32,
        perfect: bool,
        center: Vec2,
    },
}

/// Result of resolving one swipe
#[derive(Debug, Clone, Default)]
pub struct SwipeOutcome {
    /// One entry per stalk the swipe touched, in stalk order
    pub events: Vec<CutEvent>,
    /// Stalks severed by this swipe; the only count that feeds the combo
    pub severed: u32,
}

impl SwipeOutcome {
    /// Stalks damaged without being severed
    pub fn damaged(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CutEvent::Damaged { .. }))
            .count()
    }

    pub fn perfect_cuts(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CutEvent::Severed { perfect: true, .. }))
            .count()
    }
}

/// A sever is perfect when the swipe midpoint lands near the stalk center
pub fn is_perfect_cut(stalk: &Stalk, swipe: &Segment) -> bool {
    stalk.center().distance(swipe.midpoint()) < stalk.size.x * PERFECT_CUT_RATIO
}

/// Whether the swipe touches this stalk's bounding box
#[inline]
pub fn swipe_hits_stalk(swipe: &Segment, stalk: &Stalk) -> bool {
    segment_intersects_rect(swipe, &stalk.bounds())
}

/// Apply a completed swipe to every standing stalk.
///
/// Severed stalks get the swipe recorded as their cut line, a random fall
/// speed, and a particle burst. Perfect cuts also leave a marker effect.
pub fn resolve_swipe(state: &mut SimState, swipe: &Segment) -> SwipeOutcome {
    let mut outcome = SwipeOutcome::default();
    // Bursts are emitted after the stalk loop to keep the RNG borrow simple
    let mut bursts = Vec::new();

    for idx in 0..state.stalks.len() {
        let stalk = &state.stalks[idx];
        if stalk.severed || !swipe_hits_stalk(swipe, stalk) {
            continue;
        }

        let stalk = &mut state.stalks[idx];
        match stalk.apply_hit() {
            Some(HitOutcome::Damaged { remaining }) => {
                outcome.events.push(CutEvent::Damaged {
                    stalk_id: stalk.id,
                    remaining,
                });
            }
            Some(HitOutcome::Severed) => {
                stalk.cut_line = Some(*swipe);
                let perfect = is_perfect_cut(stalk, swipe);
                let center = stalk.center();
                let (id, bounds) = (stalk.id, stalk.bounds());

                let fall_speed = state.roll_sever_fall_speed();
                state.stalks[idx].fall_speed = fall_speed;

                bursts.push(bounds);
                outcome.severed += 1;
                outcome.events.push(CutEvent::Severed {
                    stalk_id: id,
                    perfect,
                    center,
                });
                log::debug!("Severed stalk {}{}", id, if perfect { " (perfect)" } else { "" });
            }
            None => {}
        }
    }

    for bounds in bursts {
        state.spawn_cut_particles(bounds);
    }

    for event in &outcome.events {
        if let CutEvent::Severed {
            perfect: true,
            center,
            ..
        } = *event
        {
            state
                .effects
                .push(Effect::new(EffectKind::Perfect { center }, PERFECT_EFFECT_TICKS));
        }
    }

    outcome
}
