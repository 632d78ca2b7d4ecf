//! Canyon Dash - a side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawn director)
//! - `bestscore`: Best-score persistence boundary
//! - `settings`: Player preferences

pub mod bestscore;
pub mod settings;
pub mod sim;

pub use bestscore::BestScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Clamp on a single frame's wall-clock delta (stall guard)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World dimensions (simulation units ~ pixels)
    pub const WORLD_W: f32 = 960.0;
    /// Y of the ground line (top surface of the ground, y-down axis)
    pub const GROUND_Y: f32 = 420.0;
    /// Obstacles spawn this far past the right edge
    pub const SPAWN_LEAD: f32 = 60.0;
    /// Obstacles are culled once their right edge is this far off-screen left
    pub const CULL_MARGIN: f32 = 80.0;

    /// Actor defaults - x is fixed, only y moves
    pub const ACTOR_X: f32 = 120.0;
    pub const STAND_W: f32 = 34.0;
    pub const STAND_H: f32 = 62.0;
    pub const DUCK_W: f32 = 46.0;
    pub const DUCK_H: f32 = 30.0;

    /// Vertical physics (px/s and px/s²)
    pub const GRAVITY: f32 = 2600.0;
    pub const JUMP_VEL: f32 = -860.0;
    /// Upward velocity after an early jump release (jump cut)
    pub const JUMP_CUT_VEL: f32 = -320.0;
    /// How long held-jump keeps gravity reduced while ascending
    pub const JUMP_HOLD_MAX: f32 = 0.22;
    pub const HOLD_GRAVITY_SCALE: f32 = 0.55;
    /// Gravity multiplier for duck-held fast-fall while airborne
    pub const FASTFALL_GRAVITY_SCALE: f32 = 2.2;
    /// Grace window after walking off an edge
    pub const COYOTE_TIME: f32 = 0.08;
    /// Early-press window remembered until landing
    pub const JUMP_BUFFER: f32 = 0.10;
    /// Falling past this y ends the run
    pub const FATAL_FALL_Y: f32 = GROUND_Y + 260.0;

    /// Hit-rectangle insets (inward padding from each sprite edge)
    pub const ACTOR_HIT_PAD: f32 = 7.0;
    pub const GROUND_HIT_PAD: f32 = 6.0;
    pub const FLYER_HIT_PAD: f32 = 4.0;
    /// Pit spans are inset this much before containment tests
    pub const PIT_EDGE_INSET: f32 = 8.0;
    /// Fraction of actor width excluded from each side of the footprint band
    pub const FOOT_BAND_INSET: f32 = 0.30;
    /// Below the ground line by more than this over a pit locks the fall in
    pub const PIT_LOCK_DEPTH: f32 = 6.0;

    /// Pacing
    pub const BASE_SPEED: f32 = 260.0;
    /// World speed gained per second while running
    pub const SPEED_ACCEL: f32 = 9.0;
    pub const SPEED_FACTOR_MAX: f32 = 2.35;
    /// Difficulty saturates once speed reaches BASE_SPEED + this span
    pub const DIFFICULTY_SPEED_SPAN: f32 = 360.0;
    /// Score units per px of travel (score accrues as speed × time)
    pub const SCORE_RATE: f32 = 0.018;
    pub const STAGE_MID_SCORE: f32 = 300.0;
    pub const STAGE_LATE_SCORE: f32 = 800.0;

    /// Pit sizing - the solvability guarantee
    pub const PIT_MIN_W: f32 = 90.0;
    pub const PIT_MAX_W_HARDCAP: f32 = 240.0;
    /// Clearable width is speed × factor − margin
    pub const PIT_CLEAR_FACTOR: f32 = 0.62;
    pub const PIT_CLEAR_MARGIN: f32 = 46.0;
    /// Visual depth of a pit (rendering only)
    pub const PIT_DEPTH: f32 = 56.0;
    pub const PIT_HARDNESS: f32 = 1.35;

    /// Spawn scheduling (distances in px before speed-factor scaling)
    pub const SPAWN_GAP_MIN: f32 = 260.0;
    pub const SPAWN_GAP_MAX: f32 = 430.0;
    pub const AFTER_PIT_GUARD: f32 = 420.0;
    pub const AFTER_LOW_FLYER_GUARD: f32 = 360.0;

    /// Spawn gating scores
    pub const PIT_MIN_SCORE: f32 = 220.0;
    pub const FLYER_MIN_SCORE: f32 = 140.0;
    /// Low flyers unlock in MID by score, in LATE by difficulty
    pub const LOW_FLYER_SCORE_MID: f32 = 520.0;
    pub const LOW_FLYER_DIFF_LATE: f32 = 0.35;
    /// Previous spawns at or above this hardness soften the next one
    pub const HARD_SPAWN_THRESHOLD: f32 = 1.0;

    /// Patterns
    pub const PATTERN_MIN_SCORE: f32 = 180.0;
    pub const PATTERN_COOLDOWN: f32 = 700.0;
    pub const PATTERN_HISTORY: usize = 3;
    pub const PATTERN_RETRIES: u32 = 4;
}
