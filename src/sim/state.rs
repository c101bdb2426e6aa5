//! Simulation state and entity types
//!
//! Everything the frame loop mutates lives here; render handles, audio and
//! storage stay outside.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::geometry::{Rect, Segment};
use crate::consts::*;

/// Number of entries in the particle color palette
pub const PARTICLE_COLORS: u8 = 6;

/// Play field dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: f32,
    pub height: f32,
}

impl FieldSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Result of hitting a stalk once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Took damage but still standing
    Damaged { remaining: u8 },
    /// Hit points reached zero on this hit
    Severed,
}

/// Why a stalk left the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Reached the bottom edge uncut
    Missed,
    /// Severed and fell out of view
    Fallen,
}

/// A falling bamboo stalk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stalk {
    pub id: u32,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Width and height, fixed at spawn
    pub size: Vec2,
    /// Fall velocity while unsevered (px/tick)
    pub fall_velocity: f32,
    /// Tilt in degrees
    pub rotation: f32,
    /// Spin applied once severed (degrees/tick)
    pub rotation_speed: f32,
    pub hit_points: u8,
    pub max_hit_points: u8,
    pub severed: bool,
    /// The swipe that finished it off
    pub cut_line: Option<Segment>,
    /// Fall speed after severing, grows with gravity
    pub fall_speed: f32,
}

impl Stalk {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Apply one hit. Severed stalks ignore further hits and return `None`.
    pub fn apply_hit(&mut self) -> Option<HitOutcome> {
        if self.severed {
            return None;
        }
        self.hit_points = self.hit_points.saturating_sub(1);
        if self.hit_points == 0 {
            self.severed = true;
            Some(HitOutcome::Severed)
        } else {
            Some(HitOutcome::Damaged {
                remaining: self.hit_points,
            })
        }
    }

    /// Advance one tick of motion
    pub fn step(&mut self) {
        if self.severed {
            self.pos.y += self.fall_speed;
            self.fall_speed += STALK_GRAVITY;
            self.rotation += self.rotation_speed;
        } else {
            self.pos.y += self.fall_velocity;
        }
    }

    /// Whether the stalk should be removed after this tick's motion
    pub fn expiry(&self, field: FieldSize) -> Option<Expiry> {
        if self.severed {
            (self.pos.y > field.height + SEVERED_CLEANUP_MARGIN).then_some(Expiry::Fallen)
        } else {
            (self.pos.y > field.height).then_some(Expiry::Missed)
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at birth, removed once it reaches 0
    pub life: f32,
    /// Life lost per tick
    pub decay: f32,
    pub size: f32,
    /// Palette index, `0..PARTICLE_COLORS`
    pub color: u8,
}

impl Particle {
    /// Advance one tick. Returns false once the particle is spent.
    pub fn step(&mut self) -> bool {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life -= self.decay;
        self.life > 0.0
    }
}

/// Short-lived visual markers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Trace left by a completed swipe
    Slash(Segment),
    /// Flash at the center of a perfectly cut stalk
    Perfect { center: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub ticks_left: u32,
    pub total_ticks: u32,
}

impl Effect {
    pub fn new(kind: EffectKind, ticks: u32) -> Self {
        Self {
            kind,
            ticks_left: ticks,
            total_ticks: ticks.max(1),
        }
    }

    /// Remaining fraction of the effect's lifetime (1 = fresh)
    pub fn fade(&self) -> f32 {
        self.ticks_left as f32 / self.total_ticks as f32
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct SimState {
    pub field: FieldSize,
    /// Live stalks in spawn order
    pub stalks: Vec<Stalk>,
    pub particles: Vec<Particle>,
    pub effects: Vec<Effect>,
    /// Physics ticks advanced this session
    pub time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl SimState {
    pub fn new(field: FieldSize, seed: u64) -> Self {
        Self {
            field,
            stalks: Vec::new(),
            particles: Vec::new(),
            effects: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop every entity; ids keep increasing across resets
    pub fn clear(&mut self) {
        self.stalks.clear();
        self.particles.clear();
        self.effects.clear();
        self.time_ticks = 0;
    }

    /// Spawn a stalk above the field. Returns its id, or `None` when the
    /// field is already at [`MAX_LIVE_STALKS`].
    pub fn spawn_stalk(&mut self, difficulty: Difficulty, base_size: f32) -> Option<u32> {
        if self.stalks.len() >= MAX_LIVE_STALKS {
            return None;
        }

        let tuning = difficulty.tuning();
        let max_x = (self.field.width - base_size).max(0.0);
        let rng = &mut self.rng;
        let x = rng.random::<f32>() * max_x;
        let width = base_size + (rng.random::<f32>() * 2.0 - 1.0) * STALK_WIDTH_JITTER;
        let height = base_size * 2.0 + rng.random::<f32>() * base_size;
        let rotation = (rng.random::<f32>() * 2.0 - 1.0) * STALK_MAX_TILT_DEG;
        let rotation_speed = (rng.random::<f32>() * 2.0 - 1.0) * STALK_MAX_SPIN;

        let id = self.next_entity_id();
        self.stalks.push(Stalk {
            id,
            pos: Vec2::new(x, -base_size),
            size: Vec2::new(width, height),
            fall_velocity: tuning.fall_velocity,
            rotation,
            rotation_speed,
            hit_points: tuning.hit_points,
            max_hit_points: tuning.hit_points,
            severed: false,
            cut_line: None,
            fall_speed: 0.0,
        });
        log::debug!(
            "Spawned stalk {} at x={:.0} ({:.0}x{:.0}, hp {})",
            id,
            x,
            width,
            height,
            tuning.hit_points
        );
        Some(id)
    }

    /// Emit a particle burst over a stalk's bounding box
    pub fn spawn_cut_particles(&mut self, bounds: Rect) {
        let rng = &mut self.rng;
        let count = rng.random_range(BURST_MIN_PARTICLES..=BURST_MAX_PARTICLES);
        self.particles.reserve(count);
        for _ in 0..count {
            let pos = bounds.origin
                + Vec2::new(
                    rng.random::<f32>() * bounds.size.x,
                    rng.random::<f32>() * bounds.size.y,
                );
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 8.0,
                (rng.random::<f32>() - 0.5) * 8.0 - 2.0,
            );
            self.particles.push(Particle {
                pos,
                vel,
                life: 1.0,
                decay: 0.02 + rng.random::<f32>() * 0.02,
                size: 2.0 + rng.random::<f32>() * 4.0,
                color: rng.random_range(0..PARTICLE_COLORS),
            });
        }
    }

    /// Random fall speed for a freshly severed stalk
    pub fn roll_sever_fall_speed(&mut self) -> f32 {
        self.rng
            .random_range(SEVER_FALL_SPEED_MIN..SEVER_FALL_SPEED_MAX)
    }

    /// Number of stalks that have not been severed yet
    pub fn standing_stalks(&self) -> usize {
        self.stalks.iter().filter(|s| !s.severed).count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A stalk at a fixed spot, for collision tests
    pub(crate) fn test_stalk(id: u32, pos: Vec2, hit_points: u8) -> Stalk {
        Stalk {
            id,
            pos,
            size: Vec2::new(60.0, 150.0),
            fall_velocity: 2.0,
            rotation: 0.0,
            rotation_speed: 1.5,
            hit_points,
            max_hit_points: hit_points,
            severed: false,
            cut_line: None,
            fall_speed: 0.0,
        }
    }

    #[test]
    fn test_spawn_geometry_within_bounds() {
        let mut state = SimState::new(FieldSize::new(800.0, 600.0), 42);
        for _ in 0..MAX_LIVE_STALKS {
            state.spawn_stalk(Difficulty::Hard, 60.0).unwrap();
        }
        for s in &state.stalks {
            assert!(s.pos.x >= 0.0 && s.pos.x <= 740.0);
            assert_eq!(s.pos.y, -60.0);
            assert!(s.size.x >= 50.0 && s.size.x <= 70.0);
            assert!(s.size.y >= 120.0 && s.size.y <= 180.0);
            assert!(s.rotation.abs() <= 10.0);
            assert!(s.rotation_speed.abs() <= 2.5);
            assert_eq!(s.hit_points, 3);
            assert_eq!(s.fall_velocity, 3.0);
            assert!(!s.severed);
        }
    }

    #[test]
    fn test_spawn_ids_increase() {
        let mut state = SimState::new(FieldSize::new(800.0, 600.0), 7);
        let a = state.spawn_stalk(Difficulty::Normal, 60.0).unwrap();
        let b = state.spawn_stalk(Difficulty::Normal, 60.0).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_spawn_rejected_at_capacity() {
        let mut state = SimState::new(FieldSize::new(800.0, 600.0), 1);
        for _ in 0..MAX_LIVE_STALKS {
            assert!(state.spawn_stalk(Difficulty::Easy, 60.0).is_some());
        }
        assert!(state.spawn_stalk(Difficulty::Easy, 60.0).is_none());
        assert_eq!(state.stalks.len(), MAX_LIVE_STALKS);
    }

    #[test]
    fn test_spawn_in_narrow_field() {
        let mut state = SimState::new(FieldSize::new(40.0, 600.0), 3);
        state.spawn_stalk(Difficulty::Normal, 60.0).unwrap();
        assert_eq!(state.stalks[0].pos.x, 0.0);
    }

    #[test]
    fn test_hits_count_down_then_sever() {
        let mut stalk = test_stalk(1, Vec2::ZERO, 5);
        for n in 1..5u8 {
            assert_eq!(
                stalk.apply_hit(),
                Some(HitOutcome::Damaged { remaining: 5 - n })
            );
            assert_eq!(stalk.hit_points, stalk.max_hit_points - n);
            assert!(!stalk.severed);
        }
        assert_eq!(stalk.apply_hit(), Some(HitOutcome::Severed));
        assert!(stalk.severed);
        assert_eq!(stalk.hit_points, 0);
        // Further hits are ignored
        assert_eq!(stalk.apply_hit(), None);
        assert_eq!(stalk.hit_points, 0);
    }

    #[test]
    fn test_unsevered_stalk_falls_at_constant_speed() {
        let mut stalk = test_stalk(1, Vec2::new(10.0, 0.0), 2);
        stalk.step();
        stalk.step();
        assert_eq!(stalk.pos, Vec2::new(10.0, 4.0));
        assert_eq!(stalk.rotation, 0.0);
    }

    #[test]
    fn test_severed_stalk_accelerates_and_spins() {
        let mut stalk = test_stalk(1, Vec2::ZERO, 1);
        stalk.apply_hit();
        stalk.fall_speed = 3.0;
        stalk.step();
        assert!((stalk.pos.y - 3.0).abs() < 1e-6);
        assert!((stalk.fall_speed - 3.2).abs() < 1e-6);
        stalk.step();
        assert!((stalk.pos.y - 6.2).abs() < 1e-5);
        assert!((stalk.rotation - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_expiry_rules() {
        let field = FieldSize::new(800.0, 600.0);
        let mut stalk = test_stalk(1, Vec2::new(0.0, 600.0), 2);
        assert_eq!(stalk.expiry(field), None);
        stalk.pos.y = 600.5;
        assert_eq!(stalk.expiry(field), Some(Expiry::Missed));

        stalk.severed = true;
        assert_eq!(stalk.expiry(field), None);
        stalk.pos.y = 700.5;
        assert_eq!(stalk.expiry(field), Some(Expiry::Fallen));
    }

    #[test]
    fn test_particle_step() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -1.0),
            life: 0.05,
            decay: 0.03,
            size: 3.0,
            color: 0,
        };
        assert!(p.step());
        assert_eq!(p.pos, Vec2::new(1.0, -1.0));
        assert!((p.vel.y - (-0.9)).abs() < 1e-6);
        assert!(!p.step());
    }

    #[test]
    fn test_cut_particle_burst() {
        let mut state = SimState::new(FieldSize::new(800.0, 600.0), 99);
        let bounds = Rect::new(Vec2::new(100.0, 100.0), Vec2::new(60.0, 150.0));
        state.spawn_cut_particles(bounds);
        let n = state.particles.len();
        assert!((BURST_MIN_PARTICLES..=BURST_MAX_PARTICLES).contains(&n));
        for p in &state.particles {
            assert!(bounds.contains(p.pos));
            assert_eq!(p.life, 1.0);
            assert!(p.decay >= 0.02 && p.decay < 0.04);
            assert!(p.color < PARTICLE_COLORS);
            assert!(p.vel.x >= -4.0 && p.vel.x < 4.0);
            assert!(p.vel.y >= -6.0 && p.vel.y < 2.0);
        }
    }

    #[test]
    fn test_effect_fade() {
        let mut effect = Effect::new(
            EffectKind::Perfect {
                center: Vec2::ZERO,
            },
            4,
        );
        assert_eq!(effect.fade(), 1.0);
        effect.ticks_left = 1;
        assert_eq!(effect.fade(), 0.25);
    }
}
