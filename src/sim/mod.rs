//! Simulation module
//!
//! All gameplay logic lives here. No rendering, audio or platform
//! dependencies; randomness comes from the session's seeded RNG.

pub mod collision;
pub mod combo;
pub mod difficulty;
pub mod geometry;
pub mod state;
pub mod tick;

pub use collision::{CutEvent, SwipeOutcome, is_perfect_cut, resolve_swipe};
pub use combo::{ComboTracker, ComboUpdate};
pub use difficulty::{Difficulty, StalkTuning};
pub use geometry::{Rect, Segment, segment_intersects_rect, segments_intersect};
pub use state::{Effect, EffectKind, FieldSize, Particle, SimState, Stalk};
pub use tick::{TickReport, tick};
