//! Run state and core simulation types
//!
//! `RunState` is the single explicit simulation context: it owns the actor,
//! the obstacle store, the spawn schedule, and the gameplay RNG. No state
//! lives outside it, so independent runs can coexist (tests, replays).

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::obstacle::{FlightLevel, Obstacle};
use super::patterns::{PatternId, PatternStep};
use super::rect::Rect;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Idle, waiting for the first jump intent
    Ready,
    /// Active gameplay
    Running,
    /// Run ended by collision or fatal fall
    GameOver,
}

/// The player-controlled actor. X never changes; only y and size do.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Top-left corner; x is pinned to ACTOR_X
    pub pos: Vec2,
    /// Vertical velocity, positive = downward
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub grounded: bool,
    pub ducking: bool,
    /// Irreversible once over a pit and below the lock-in depth
    pub pit_falling: bool,
    /// Jump intent currently held (press seen, release not yet)
    pub jump_held: bool,
    /// Seconds of reduced-gravity ascent consumed
    pub jump_hold: f32,
    /// Remaining coyote window after leaving the ground
    pub coyote: f32,
    /// Remaining jump-buffer window from an early press
    pub jump_buffer: f32,
}

impl Actor {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(ACTOR_X, GROUND_Y - STAND_H),
            vy: 0.0,
            width: STAND_W,
            height: STAND_H,
            grounded: true,
            ducking: false,
            pit_falling: false,
            jump_held: false,
            jump_hold: 0.0,
            coyote: 0.0,
            jump_buffer: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Inset hit-rectangle used for collision
    pub fn hit_rect(&self) -> Rect {
        self.rect().inset(ACTOR_HIT_PAD)
    }

    /// Horizontal footprint band used for pit containment
    pub fn foot_band(&self) -> (f32, f32) {
        let inset = self.width * FOOT_BAND_INSET;
        (self.pos.x + inset, self.pos.x + self.width - inset)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Swap between stand and duck dimensions, keeping the feet anchored
    /// (grounded: on the ground line; airborne: bottom edge preserved).
    pub fn set_ducking(&mut self, duck: bool) {
        if self.ducking == duck {
            return;
        }
        let bottom = self.bottom();
        self.ducking = duck;
        let (w, h) = if duck { (DUCK_W, DUCK_H) } else { (STAND_W, STAND_H) };
        self.width = w;
        self.height = h;
        self.pos.y = bottom - h;
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

/// What kind of thing the director spawned last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Ground,
    Flyer,
    Pit,
}

/// Memory of the most recent spawn, for anti-repetition and gap sizing
#[derive(Debug, Clone, Copy)]
pub struct LastSpawn {
    pub kind: SpawnKind,
    pub hardness: f32,
}

/// Spawn director bookkeeping. All distances are in world px and are
/// consumed by travel, never by wall time.
#[derive(Debug, Clone)]
pub struct SpawnSchedule {
    /// Distance traveled since the last spawn
    pub distance: f32,
    /// Travel distance that triggers the next spawn opportunity
    pub next_at: f32,
    /// Pending steps of an in-flight pattern
    pub queue: VecDeque<PatternStep>,
    /// Distance left before another pattern may start
    pub pattern_cooldown: f32,
    /// Identifiers of the last few patterns, newest first
    pub recent_patterns: VecDeque<PatternId>,
    /// Distance left on the after-pit guard window
    pub after_pit_guard: f32,
    /// Distance left on the after-low-flyer guard window
    pub after_low_flyer_guard: f32,
    pub last_spawn: Option<LastSpawn>,
    /// Altitude of the most recent flyer, across intervening spawns
    pub last_flyer_level: Option<FlightLevel>,
}

impl SpawnSchedule {
    pub fn new() -> Self {
        Self {
            distance: 0.0,
            // First obstacle arrives after a fixed runway
            next_at: 520.0,
            queue: VecDeque::new(),
            pattern_cooldown: 0.0,
            recent_patterns: VecDeque::with_capacity(PATTERN_HISTORY),
            after_pit_guard: 0.0,
            after_low_flyer_guard: 0.0,
            last_spawn: None,
            last_flyer_level: None,
        }
    }

    /// Any guard window currently active?
    pub fn guard_active(&self) -> bool {
        self.after_pit_guard > 0.0 || self.after_low_flyer_guard > 0.0
    }

    /// Consume guard/cooldown distances as the world scrolls
    pub fn consume_distance(&mut self, dx: f32) {
        self.distance += dx;
        self.pattern_cooldown = (self.pattern_cooldown - dx).max(0.0);
        self.after_pit_guard = (self.after_pit_guard - dx).max(0.0);
        self.after_low_flyer_guard = (self.after_low_flyer_guard - dx).max(0.0);
    }

    pub fn remember_pattern(&mut self, id: PatternId) {
        self.recent_patterns.push_front(id);
        self.recent_patterns.truncate(PATTERN_HISTORY);
    }
}

impl Default for SpawnSchedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete state of one run (deterministic given seed + intents)
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG - every procedural decision draws from this stream
    pub rng: Pcg32,
    pub phase: RunPhase,
    /// World scroll speed, px/s, monotonic while running
    pub speed: f32,
    pub score: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub actor: Actor,
    /// Active obstacles, sorted by spawn time and therefore by ascending x.
    /// Expiry is a prefix trim at the front; spawns append at the back.
    pub obstacles: VecDeque<Obstacle>,
    pub schedule: SpawnSchedule,
    /// Debug hitbox overlay toggle (survives reset)
    pub debug_hitboxes: bool,
}

impl RunState {
    /// Create an idle run with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::Ready,
            speed: BASE_SPEED,
            score: 0.0,
            time_ticks: 0,
            actor: Actor::new(),
            obstacles: VecDeque::new(),
            schedule: SpawnSchedule::new(),
            debug_hitboxes: false,
        }
    }

    /// Return everything to initial values and idle in READY.
    ///
    /// The next run gets a fresh seed drawn from the current stream, so
    /// consecutive runs differ but the whole session stays a deterministic
    /// function of the original seed.
    pub fn reset(&mut self) {
        let next_seed = self.rng.random::<u64>();
        let debug = self.debug_hitboxes;
        *self = RunState::new(next_seed);
        self.debug_hitboxes = debug;
    }

    /// Reset and go straight back to RUNNING (skips the idle frame)
    pub fn restart(&mut self) {
        self.reset();
        self.phase = RunPhase::Running;
    }

    /// Floored score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0) as u64
    }

    /// Persistence boundary: the new best score to store, if this run beat
    /// the previously stored value. Only meaningful at GAMEOVER.
    pub fn best_score_update(&self, prior_best: u64) -> Option<u64> {
        if self.phase == RunPhase::GameOver && self.display_score() > prior_best {
            Some(self.display_score())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_starts_grounded_on_line() {
        let a = Actor::new();
        assert!(a.grounded);
        assert_eq!(a.bottom(), GROUND_Y);
    }

    #[test]
    fn test_duck_keeps_feet_on_ground() {
        let mut a = Actor::new();
        a.set_ducking(true);
        assert_eq!(a.height, DUCK_H);
        assert_eq!(a.bottom(), GROUND_Y);
        a.set_ducking(false);
        assert_eq!(a.height, STAND_H);
        assert_eq!(a.bottom(), GROUND_Y);
    }

    #[test]
    fn test_reset_preserves_debug_toggle() {
        let mut run = RunState::new(1);
        run.debug_hitboxes = true;
        run.score = 500.0;
        run.reset();
        assert!(run.debug_hitboxes);
        assert_eq!(run.score, 0.0);
        assert_eq!(run.phase, RunPhase::Ready);
    }

    #[test]
    fn test_restart_lands_in_running() {
        let mut run = RunState::new(1);
        run.phase = RunPhase::GameOver;
        run.restart();
        assert_eq!(run.phase, RunPhase::Running);
        assert!(run.obstacles.is_empty());
        assert_eq!(run.speed, BASE_SPEED);
    }

    #[test]
    fn test_best_score_update_only_on_improvement() {
        let mut run = RunState::new(1);
        run.score = 321.7;
        run.phase = RunPhase::GameOver;
        assert_eq!(run.best_score_update(300), Some(321));
        assert_eq!(run.best_score_update(321), None);
        run.phase = RunPhase::Running;
        assert_eq!(run.best_score_update(0), None);
    }

    #[test]
    fn test_recent_patterns_bounded() {
        let mut s = SpawnSchedule::new();
        s.remember_pattern(PatternId::FlyerPair);
        s.remember_pattern(PatternId::HighBait);
        s.remember_pattern(PatternId::LowCheck);
        s.remember_pattern(PatternId::TallCorridor);
        assert_eq!(s.recent_patterns.len(), PATTERN_HISTORY);
        assert_eq!(s.recent_patterns[0], PatternId::TallCorridor);
        assert!(!s.recent_patterns.contains(&PatternId::FlyerPair));
    }
}
