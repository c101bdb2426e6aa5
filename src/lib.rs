//! Bamboo Slice - A bamboo-cutting reflex game
//!
//! Core modules:
//! - `sim`: Simulation (stalk physics, swipe collision, combo scoring)
//! - `scheduler`: Stopped/Running/Paused lifecycle and the two scheduled tasks
//! - `game`: Ties simulation, scheduler, input and services together
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural sound cues
//! - `highscores`: High score persistence

pub mod audio;
pub mod game;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use game::{Game, HudSnapshot, Services};
pub use highscores::{HighScore, HighScoreStore, MemoryStore, StoreError};
pub use scheduler::{ManualTaskHost, Mode, Scheduler, TaskHandle, TaskHost};
pub use settings::Settings;
pub use sim::Difficulty;

/// Game configuration constants
///
/// All per-tick quantities assume one tick per display frame.
pub mod consts {
    /// Maximum stalks alive at once; spawns beyond this are rejected
    pub const MAX_LIVE_STALKS: usize = 8;

    /// Gravity applied to a severed stalk's fall speed (px/tick²)
    pub const STALK_GRAVITY: f32 = 0.2;
    /// Gravity applied to particle vertical velocity (px/tick²)
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    /// Severed stalks are dropped once this far below the field
    pub const SEVERED_CLEANUP_MARGIN: f32 = 100.0;

    /// Width jitter around the base stalk size (±px)
    pub const STALK_WIDTH_JITTER: f32 = 10.0;
    /// Initial tilt range (±degrees)
    pub const STALK_MAX_TILT_DEG: f32 = 10.0;
    /// Spin range applied once severed (±degrees/tick)
    pub const STALK_MAX_SPIN: f32 = 2.5;
    /// Fall speed given to a stalk the moment it is severed, [min, max)
    pub const SEVER_FALL_SPEED_MIN: f32 = 2.0;
    pub const SEVER_FALL_SPEED_MAX: f32 = 5.0;

    /// Particle burst size per severed stalk (inclusive)
    pub const BURST_MIN_PARTICLES: usize = 15;
    pub const BURST_MAX_PARTICLES: usize = 24;

    /// A sever is "perfect" when the swipe midpoint is within this fraction
    /// of the stalk width from the stalk center
    pub const PERFECT_CUT_RATIO: f32 = 0.3;

    /// Consecutive cuts closer together than this keep the combo going
    pub const COMBO_WINDOW_MS: f64 = 2000.0;
    /// Combo length that triggers the combo cue
    pub const COMBO_CUE_THRESHOLD: u32 = 3;
    /// Points per severed stalk
    pub const POINTS_PER_CUT: u64 = 10;
    /// Points per unit of best combo
    pub const POINTS_PER_MAX_COMBO: u64 = 50;

    /// Cue intensity for a full sever and for a non-lethal hit
    pub const CUT_INTENSITY_FULL: f32 = 1.0;
    pub const CUT_INTENSITY_PARTIAL: f32 = 0.5;

    /// Lifetime of the slash mark left by a swipe (ticks)
    pub const SLASH_EFFECT_TICKS: u32 = 30;
    /// Lifetime of the perfect-cut marker (ticks)
    pub const PERFECT_EFFECT_TICKS: u32 = 60;
}
