//! Game session
//!
//! [`Game`] owns the pure simulation state (stalks, particles, combo) and
//! drives it from three kinds of callbacks: the spawn timer, the frame
//! callback, and pointer events. Rendering, audio and high score storage go
//! through the collaborators in [`Services`].

use glam::Vec2;

use crate::audio::{AudioCues, CueKind};
use crate::consts::*;
use crate::highscores::{HighScore, HighScoreStore};
use crate::input::SwipeCapture;
use crate::renderer::Renderer;
use crate::scheduler::{Mode, Scheduler, TaskHost};
use crate::settings::Settings;
use crate::sim::{
    ComboTracker, CutEvent, Difficulty, Effect, EffectKind, FieldSize, SimState, SwipeOutcome,
    resolve_swipe, tick,
};

/// Platform collaborators
pub struct Services {
    pub renderer: Box<dyn Renderer>,
    pub audio: Box<dyn AudioCues>,
    pub store: Box<dyn HighScoreStore>,
}

/// Values shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudSnapshot {
    pub cut_count: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub score: u64,
    pub high_score: u64,
    pub mode: Mode,
}

/// One play session
pub struct Game {
    settings: Settings,
    sim: SimState,
    combo: ComboTracker,
    high_score: HighScore,
    scheduler: Scheduler,
    swipe: SwipeCapture,
    services: Services,
}

impl Game {
    pub fn new(settings: Settings, services: Services, field: FieldSize, seed: u64) -> Self {
        let high_score = HighScore::load(services.store.as_ref());
        log::info!(
            "Game ready: {}x{} field, difficulty {}, high score {}",
            field.width,
            field.height,
            settings.difficulty.as_str(),
            high_score.best()
        );
        Self {
            settings,
            sim: SimState::new(field, seed),
            combo: ComboTracker::new(),
            high_score,
            scheduler: Scheduler::new(),
            swipe: SwipeCapture::new(),
            services,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut SimState {
        &mut self.sim
    }

    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn mode(&self) -> Mode {
        self.scheduler.mode()
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            cut_count: self.combo.total_cuts,
            combo: self.combo.combo,
            max_combo: self.combo.max_combo,
            score: self.combo.score(),
            high_score: self.high_score.best(),
            mode: self.scheduler.mode(),
        }
    }

    // === Lifecycle ===

    /// Stopped -> Running. Spawns the first stalk right away.
    pub fn start(&mut self, host: &mut dyn TaskHost) -> bool {
        if !self
            .scheduler
            .start(host, self.settings.spawn_interval_ms)
        {
            return false;
        }
        self.spawn();
        true
    }

    /// Running <-> Paused; `None` when stopped
    pub fn toggle_pause(&mut self, host: &mut dyn TaskHost) -> Option<Mode> {
        self.scheduler
            .toggle_pause(host, self.settings.spawn_interval_ms)
    }

    /// Back to Stopped with an empty field and zeroed counters. The high
    /// score is kept.
    pub fn reset(&mut self, host: &mut dyn TaskHost) {
        self.scheduler.stop(host);
        let ticks = self.sim.time_ticks;
        for stalk in &self.sim.stalks {
            self.services.renderer.release_stalk(stalk.id);
        }
        self.sim.clear();
        self.combo.reset();
        self.swipe.cancel();

        let renderer = &mut self.services.renderer;
        renderer.clear();
        renderer.present();
        log::info!("Session reset after {} ticks", ticks);
    }

    // === Settings ===

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.set_difficulty(difficulty);
        self.settings.save();
    }

    /// Applies to stalks spawned from now on
    pub fn set_base_size(&mut self, px: u32) {
        self.settings.set_base_size(px);
        self.settings.save();
    }

    /// Takes effect the next time the spawn timer is armed (start or resume)
    pub fn set_spawn_interval(&mut self, ms: u32) {
        self.settings.set_spawn_interval(ms);
        self.settings.save();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.set_sound_enabled(enabled);
        self.settings.save();
    }

    /// Flip zen mode. Returns the new state.
    pub fn toggle_zen_mode(&mut self) -> bool {
        let zen = !self.settings.zen_mode;
        self.settings.set_zen_mode(zen);
        self.settings.save();
        log::info!("Zen mode {}", if zen { "on" } else { "off" });
        zen
    }

    /// Play field changed size (CSS pixels). `pixel_ratio` is the current
    /// device pixel ratio, which changes with zoom or display.
    pub fn resize(&mut self, field: FieldSize, pixel_ratio: f32) {
        self.sim.field = field;
        self.services.renderer.resize(field, pixel_ratio);
    }

    // === Scheduled callbacks ===

    fn spawn(&mut self) -> Option<u32> {
        self.sim
            .spawn_stalk(self.settings.difficulty, self.settings.base_size as f32)
    }

    /// Spawn timer fired. Only spawns while running; returns the new stalk id.
    pub fn on_spawn_timer(&mut self) -> Option<u32> {
        if !self.scheduler.accepts_spawn() {
            return None;
        }
        self.spawn()
    }

    /// Frame callback fired. Steps physics while running, renders while
    /// running or paused, then asks for the next frame. Returns false for a
    /// stale callback.
    pub fn on_frame(&mut self, host: &mut dyn TaskHost) -> bool {
        if !self.scheduler.frame_fired() {
            return false;
        }

        if self.scheduler.mode() == Mode::Running {
            let report = tick(&mut self.sim);
            for _ in 0..report.missed {
                self.combo.record_miss();
            }
            for id in report.removed {
                self.services.renderer.release_stalk(id);
            }
        }

        self.render();
        self.scheduler.schedule_next_frame(host);
        true
    }

    /// Draw the current state
    pub fn render(&mut self) {
        let renderer = &mut self.services.renderer;
        renderer.clear();
        for stalk in &self.sim.stalks {
            renderer.draw_stalk(stalk);
        }
        for particle in &self.sim.particles {
            renderer.draw_particle(particle);
        }
        for effect in &self.sim.effects {
            renderer.draw_effect(effect);
        }
        if let Some(swipe) = self.swipe.preview() {
            renderer.draw_swipe(swipe);
        }
        renderer.present();
    }

    // === Pointer input (field coordinates) ===

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.swipe.begin(pos);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.swipe.extend(pos);
    }

    /// Gesture ended at `now_ms`. Resolves the swipe against the field and
    /// returns what it hit; `None` if no gesture was active or the session
    /// is stopped.
    pub fn pointer_up(&mut self, now_ms: f64) -> Option<SwipeOutcome> {
        let segment = self.swipe.finish()?;
        if !self.scheduler.mode().is_active() {
            return None;
        }

        let outcome = resolve_swipe(&mut self.sim, &segment);
        self.sim
            .effects
            .push(Effect::new(EffectKind::Slash(segment), SLASH_EFFECT_TICKS));

        for event in &outcome.events {
            match *event {
                CutEvent::Severed { perfect, .. } => {
                    self.cue(CueKind::Cut, CUT_INTENSITY_FULL);
                    if perfect {
                        self.cue(CueKind::PerfectCut, CUT_INTENSITY_FULL);
                    }
                }
                CutEvent::Damaged { .. } => self.cue(CueKind::Cut, CUT_INTENSITY_PARTIAL),
            }
        }

        if let Some(update) = self.combo.record_cuts(outcome.severed, now_ms) {
            log::debug!(
                "Swipe severed {} (combo {}, total {})",
                outcome.severed,
                update.combo,
                self.combo.total_cuts
            );
            if update.combo_cue {
                self.cue(CueKind::Combo, CUT_INTENSITY_FULL);
            }
            let score = self.combo.score();
            if self.high_score.offer(score, self.services.store.as_mut()) {
                log::debug!("New high score {}", score);
            }
        }

        Some(outcome)
    }

    fn cue(&mut self, cue: CueKind, intensity: f32) {
        if self.settings.sound_enabled {
            self.services.audio.play(cue, intensity);
        }
    }
}
