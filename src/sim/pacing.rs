//! Difficulty scalar, speed factor, and stage classification
//!
//! Everything the director scales by lives here: `difficulty` drives
//! probabilities, `speed_factor` rescales distances so perceived spacing
//! stays stable as the world accelerates, and `Stage` gates which variants
//! and patterns are eligible.

use crate::consts::*;

/// Normalized difficulty in [0, 1]: zero at base speed, saturating once
/// speed has risen by `DIFFICULTY_SPEED_SPAN`.
pub fn difficulty(speed: f32) -> f32 {
    ((speed - BASE_SPEED) / DIFFICULTY_SPEED_SPAN).clamp(0.0, 1.0)
}

/// Distance multiplier in [1, SPEED_FACTOR_MAX]: gaps scale with speed so
/// reaction time stays roughly constant.
pub fn speed_factor(speed: f32) -> f32 {
    (speed / BASE_SPEED).clamp(1.0, SPEED_FACTOR_MAX)
}

/// Coarse difficulty phase, classified purely from accumulated score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Early,
    Mid,
    Late,
}

impl Stage {
    pub fn from_score(score: f32) -> Stage {
        if score >= STAGE_LATE_SCORE {
            Stage::Late
        } else if score >= STAGE_MID_SCORE {
            Stage::Mid
        } else {
            Stage::Early
        }
    }

    /// Index into per-stage weight tables
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Stage::Early => 0,
            Stage::Mid => 1,
            Stage::Late => 2,
        }
    }

    /// Gap multiplier - later stages pack spawns slightly tighter
    pub fn gap_scale(&self) -> f32 {
        match self {
            Stage::Early => 1.0,
            Stage::Mid => 0.92,
            Stage::Late => 0.85,
        }
    }

    /// Probability of starting a pattern at a spawn opportunity
    pub fn pattern_chance(&self) -> f64 {
        match self {
            Stage::Early => 0.10,
            Stage::Mid => 0.18,
            Stage::Late => 0.24,
        }
    }

    /// Base probability of a flyer on a single fair spawn
    pub fn flyer_chance(&self) -> f64 {
        match self {
            Stage::Early => 0.12,
            Stage::Mid => 0.24,
            Stage::Late => 0.30,
        }
    }

    /// Width/height caps for ground obstacles. Guards shrink the caps to
    /// give a breather right after a pit or low flyer.
    pub fn ground_caps(&self, guard_active: bool) -> (f32, f32) {
        let (w, h) = match self {
            Stage::Early => (110.0, 70.0),
            Stage::Mid => (130.0, 86.0),
            Stage::Late => (150.0, 98.0),
        };
        if guard_active { (w * 0.75, h * 0.85) } else { (w, h) }
    }
}
