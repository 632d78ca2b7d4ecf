//! Spawn director - decides what to place next and when
//!
//! The director's contract: every placement and every pattern sequence must
//! remain survivable under current physics, while maximizing variety. The
//! load-bearing guarantee is pit sizing - a pit is never wider than the jump
//! arc at the current speed can cross - plus guard windows that keep unfair
//! hazard combinations apart.

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;

use super::obstacle::{
    FlightLevel, FlyerObstacle, GroundObstacle, GroundVariant, Obstacle, PitObstacle,
};
use super::pacing::{Stage, difficulty, speed_factor};
use super::patterns::{self, PatternId, PatternStep, StepKind};
use super::state::{LastSpawn, SpawnKind, SpawnSchedule};
use crate::consts::*;

/// X where new obstacles appear, just past the right edge
#[inline]
fn spawn_x() -> f32 {
    WORLD_W + SPAWN_LEAD
}

/// Widest pit the jump arc at `speed` can cross, before the hard cap
pub fn clearable_pit_width(speed: f32) -> f32 {
    speed * PIT_CLEAR_FACTOR - PIT_CLEAR_MARGIN
}

/// Legal pit width interval at `speed`: the solvability guarantee.
/// At the base speed of 260 this comes out to [90, 115.2].
pub fn safe_pit_bounds(speed: f32) -> (f32, f32) {
    let hi = clearable_pit_width(speed).min(PIT_MAX_W_HARDCAP).max(PIT_MIN_W);
    (PIT_MIN_W, hi)
}

/// Roll a pit width uniformly inside the legal interval
pub fn roll_pit_width(speed: f32, rng: &mut Pcg32) -> f32 {
    let (lo, hi) = safe_pit_bounds(speed);
    rng.random_range(lo..=hi)
}

/// Handle one spawn opportunity: pattern step, new pattern, or single spawn.
///
/// Called by the tick loop when accumulated travel distance reaches the
/// scheduled threshold. Appends at most one obstacle and re-arms the
/// schedule.
pub fn run_spawn(
    schedule: &mut SpawnSchedule,
    obstacles: &mut VecDeque<Obstacle>,
    rng: &mut Pcg32,
    speed: f32,
    score: f32,
) {
    let stage = Stage::from_score(score);
    let diff = difficulty(speed);

    // 1. A pattern is mid-execution: feed out its next step
    if let Some(step) = schedule.queue.pop_front() {
        execute_step(schedule, obstacles, rng, speed, stage, step);
        return;
    }

    // 2. Maybe start a new pattern
    if should_start_pattern(schedule, rng, stage, diff, score) {
        if let Some(id) = choose_pattern(schedule, rng, stage) {
            schedule.remember_pattern(id);
            log::debug!("pattern start: {:?} (stage {:?})", id, stage);
            schedule.queue = patterns::build_steps(id, stage, diff, speed, rng).into();
            if let Some(step) = schedule.queue.pop_front() {
                execute_step(schedule, obstacles, rng, speed, stage, step);
            }
            return;
        }
    }

    // 3. Single fair spawn
    single_spawn(schedule, obstacles, rng, speed, stage, diff, score);
}

/// Spawn one pattern step and take the next threshold from its declared gap
fn execute_step(
    schedule: &mut SpawnSchedule,
    obstacles: &mut VecDeque<Obstacle>,
    rng: &mut Pcg32,
    speed: f32,
    stage: Stage,
    step: PatternStep,
) {
    match step.kind {
        StepKind::Ground { tall_bias } => {
            spawn_ground(schedule, obstacles, rng, speed, stage, tall_bias);
        }
        StepKind::Flyer { level } => {
            // Guard windows override the pattern's declared altitude: no
            // low hazard until the guard distance is fully consumed
            let level = if level == FlightLevel::Low && schedule.guard_active() {
                FlightLevel::Mid
            } else {
                level
            };
            spawn_flyer(schedule, obstacles, speed, level);
        }
        StepKind::Pit { width } => {
            // Re-clamp against the live speed; the width was rolled at
            // pattern build time
            let (lo, hi) = safe_pit_bounds(speed);
            spawn_pit(schedule, obstacles, speed, width.clamp(lo, hi));
        }
    }
    schedule.distance = 0.0;
    schedule.next_at = step.gap * speed_factor(speed);
    if schedule.queue.is_empty() {
        // Pattern complete: stage-scaled cooldown before the next one
        schedule.pattern_cooldown = PATTERN_COOLDOWN * stage.gap_scale() * speed_factor(speed);
    }
}

fn should_start_pattern(
    schedule: &SpawnSchedule,
    rng: &mut Pcg32,
    stage: Stage,
    diff: f32,
    score: f32,
) -> bool {
    let after_pit = matches!(
        schedule.last_spawn,
        Some(LastSpawn { kind: SpawnKind::Pit, .. })
    );
    score >= PATTERN_MIN_SCORE
        && schedule.pattern_cooldown <= 0.0
        && !after_pit
        && rng.random_bool((stage.pattern_chance() + 0.12 * diff as f64).min(0.9))
}

/// Weighted pattern choice, avoiding recently used identifiers.
/// Bounded retries; a repeat is accepted once they are exhausted.
fn choose_pattern(schedule: &SpawnSchedule, rng: &mut Pcg32, stage: Stage) -> Option<PatternId> {
    let candidates: Vec<_> = patterns::CATALOG
        .iter()
        .filter(|def| def.weights[stage.index()] > 0.0)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let weights: Vec<f32> = candidates.iter().map(|d| d.weights[stage.index()]).collect();
    let mut pick = candidates[weighted_pick(rng, &weights)].id;
    for _ in 0..PATTERN_RETRIES {
        if !schedule.recent_patterns.contains(&pick) {
            break;
        }
        pick = candidates[weighted_pick(rng, &weights)].id;
    }
    Some(pick)
}

/// The non-pattern spawn path: pit, flyer, or ground, with fairness rules
fn single_spawn(
    schedule: &mut SpawnSchedule,
    obstacles: &mut VecDeque<Obstacle>,
    rng: &mut Pcg32,
    speed: f32,
    stage: Stage,
    diff: f32,
    score: f32,
) {
    let last = schedule.last_spawn;
    let prev_was_pit = matches!(last, Some(LastSpawn { kind: SpawnKind::Pit, .. }));
    let prev_hard = last.map(|l| l.hardness >= HARD_SPAWN_THRESHOLD).unwrap_or(false);
    let prev_hard_flyer = prev_hard
        && matches!(last, Some(LastSpawn { kind: SpawnKind::Flyer, .. }));

    let pit_allowed =
        score >= PIT_MIN_SCORE && !prev_was_pit && schedule.after_pit_guard <= 0.0;
    let pit_chance = 0.10 + 0.18 * diff as f64;

    let hardness = if pit_allowed && rng.random_bool(pit_chance) {
        if prev_hard_flyer {
            // Back-to-back hard reads are unfair; drop to a ground obstacle
            spawn_ground(schedule, obstacles, rng, speed, stage, 1.0)
        } else {
            let width = roll_pit_width(speed, rng);
            spawn_pit(schedule, obstacles, speed, width)
        }
    } else {
        let flyer_chance = (stage.flyer_chance() + 0.10 * diff as f64).min(0.85);
        if score >= FLYER_MIN_SCORE && rng.random_bool(flyer_chance) && !prev_hard {
            let level = choose_flyer_level(schedule, rng, stage, diff, score);
            spawn_flyer(schedule, obstacles, speed, level)
        } else {
            spawn_ground(schedule, obstacles, rng, speed, stage, 1.0)
        }
    };

    schedule.distance = 0.0;
    schedule.next_at = roll_next_gap(schedule, rng, speed, stage, hardness);
}

/// Randomized next-spawn distance, widened by speed, stage, the hardness of
/// what was just placed, and any active guard window
fn roll_next_gap(
    schedule: &SpawnSchedule,
    rng: &mut Pcg32,
    speed: f32,
    stage: Stage,
    hardness: f32,
) -> f32 {
    let base = rng.random_range(SPAWN_GAP_MIN..SPAWN_GAP_MAX);
    let hard = 1.0 + 0.35 * hardness;
    let guard = if schedule.guard_active() { 1.25 } else { 1.0 };
    base * speed_factor(speed) * stage.gap_scale() * hard * guard
}

/// Pick a ground variant by stage weights, shaped by tall bias, difficulty,
/// and guard suppression of the broad variants
fn choose_variant(
    rng: &mut Pcg32,
    stage: Stage,
    diff: f32,
    tall_bias: f32,
    guard_active: bool,
) -> GroundVariant {
    let mut weights = [0.0f32; 9];
    for (i, v) in GroundVariant::ALL.iter().enumerate() {
        let mut w = base_variant_weight(*v, stage);
        if v.is_tall() {
            w *= tall_bias;
        }
        if v.is_broad() {
            w *= 1.0 + 1.2 * diff;
            if guard_active {
                w *= 0.25;
            }
        }
        weights[i] = w;
    }
    GroundVariant::ALL[weighted_pick(rng, &weights)]
}

fn base_variant_weight(variant: GroundVariant, stage: Stage) -> f32 {
    use GroundVariant::*;
    match stage {
        Stage::Early => match variant {
            Lone => 1.4,
            Pair => 1.0,
            Trio => 0.5,
            Slab => 0.9,
            Tall => 0.5,
            TallPair => 0.15,
            Spire => 0.3,
            Wide => 0.25,
            Cluster => 0.0,
        },
        Stage::Mid => match variant {
            Lone => 1.0,
            Pair => 1.0,
            Trio => 0.8,
            Slab => 0.7,
            Tall => 0.8,
            TallPair => 0.5,
            Spire => 0.6,
            Wide => 0.5,
            Cluster => 0.25,
        },
        Stage::Late => match variant {
            Lone => 0.7,
            Pair => 0.9,
            Trio => 0.9,
            Slab => 0.5,
            Tall => 0.9,
            TallPair => 0.7,
            Spire => 0.7,
            Wide => 0.7,
            Cluster => 0.5,
        },
    }
}

/// Altitude choice with the per-stage low-flyer unlock.
///
/// MID unlocks low flyers by score, LATE by difficulty - the bases differ
/// deliberately and changing either would alter observable pacing.
fn choose_flyer_level(
    schedule: &SpawnSchedule,
    rng: &mut Pcg32,
    stage: Stage,
    diff: f32,
    score: f32,
) -> FlightLevel {
    let low_unlocked = match stage {
        Stage::Early => false,
        Stage::Mid => score >= LOW_FLYER_SCORE_MID,
        Stage::Late => diff >= LOW_FLYER_DIFF_LATE,
    };
    let low_allowed = low_unlocked && !schedule.guard_active();

    let mut weights = [
        if low_allowed { 0.8 } else { 0.0 },
        if stage >= Stage::Mid { 0.9 } else { 0.5 },
        1.0,
    ];
    let mut level = FlightLevel::ALL[weighted_pick(rng, &weights)];

    // Discourage repeating the previous flyer's altitude
    if Some(level) == schedule.last_flyer_level && rng.random_bool(0.7) {
        let idx = FlightLevel::ALL.iter().position(|l| *l == level).unwrap();
        weights[idx] = 0.0;
        if weights.iter().sum::<f32>() > 0.0 {
            level = FlightLevel::ALL[weighted_pick(rng, &weights)];
        }
    }
    level
}

fn spawn_ground(
    schedule: &mut SpawnSchedule,
    obstacles: &mut VecDeque<Obstacle>,
    rng: &mut Pcg32,
    speed: f32,
    stage: Stage,
    tall_bias: f32,
) -> f32 {
    let guard = schedule.guard_active();
    let diff = difficulty(speed);
    let variant = choose_variant(rng, stage, diff, tall_bias, guard);
    let (max_w, max_h) = stage.ground_caps(guard);
    // Shape seed is reserved for geometry, independent of gameplay draws
    let shape_seed = rng.random::<u64>();
    let ground = GroundObstacle::generate(spawn_x(), variant, shape_seed, max_w, max_h);
    let hardness = ground.hardness;
    obstacles.push_back(Obstacle::Ground(ground));
    schedule.last_spawn = Some(LastSpawn { kind: SpawnKind::Ground, hardness });
    hardness
}

fn spawn_flyer(
    schedule: &mut SpawnSchedule,
    obstacles: &mut VecDeque<Obstacle>,
    speed: f32,
    level: FlightLevel,
) -> f32 {
    let hardness = level.hardness();
    obstacles.push_back(Obstacle::Flyer(FlyerObstacle::new(spawn_x(), level)));
    schedule.last_spawn = Some(LastSpawn { kind: SpawnKind::Flyer, hardness });
    schedule.last_flyer_level = Some(level);
    if level == FlightLevel::Low {
        schedule.after_low_flyer_guard = AFTER_LOW_FLYER_GUARD * speed_factor(speed);
    }
    hardness
}

fn spawn_pit(
    schedule: &mut SpawnSchedule,
    obstacles: &mut VecDeque<Obstacle>,
    speed: f32,
    width: f32,
) -> f32 {
    obstacles.push_back(Obstacle::Pit(PitObstacle::new(spawn_x(), width)));
    schedule.last_spawn = Some(LastSpawn { kind: SpawnKind::Pit, hardness: PIT_HARDNESS });
    schedule.after_pit_guard = AFTER_PIT_GUARD * speed_factor(speed);
    PIT_HARDNESS
}

/// Weighted index draw. Falls back to the last entry if all weights are
/// zero (callers keep at least one candidate live).
fn weighted_pick(rng: &mut Pcg32, weights: &[f32]) -> usize {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return weights.len() - 1;
    }
    let mut roll = rng.random_range(0.0..total);
    for (i, w) in weights.iter().enumerate() {
        if roll < *w {
            return i;
        }
        roll -= w;
    }
    weights.len() - 1
}
