//! Pattern library - predeclared multi-step spawn sequences
//!
//! A pattern is a deliberate skill check: an ordered list of spawn steps
//! with declared relative spacing. Builders jitter gaps and pick concrete
//! altitudes/widths at build time from the gameplay RNG; the director then
//! feeds the steps out one spawn opportunity at a time.

use rand::Rng;
use rand_pcg::Pcg32;

use super::director::roll_pit_width;
use super::obstacle::FlightLevel;
use super::pacing::Stage;

/// One pending spawn inside a pattern
#[derive(Debug, Clone)]
pub struct PatternStep {
    pub kind: StepKind,
    /// Base gap distance to the spawn after this one (pre speed-factor)
    pub gap: f32,
}

/// What a pattern step places
#[derive(Debug, Clone)]
pub enum StepKind {
    /// Ground obstacle; tall_bias > 1 favors high silhouettes
    Ground { tall_bias: f32 },
    Flyer { level: FlightLevel },
    /// Pit with an explicit, already-solvable width
    Pit { width: f32 },
}

/// Identifiers for the fixed catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternId {
    /// Two flyers at different altitudes in quick succession
    FlyerPair,
    /// A high flyer that baits a jump, then a ground obstacle
    HighBait,
    /// Three flyers with stutter spacing, alternating altitude
    TripleStutter,
    /// A single low flyer - the duck check
    LowCheck,
    /// A run of tall ground obstacles
    TallCorridor,
    /// A pit followed by a ground obstacle after a generous gap
    PitBracket,
}

/// Catalog entry: identifier plus per-stage eligibility weights
/// (indexed Early/Mid/Late; zero weight = ineligible in that stage)
#[derive(Debug, Clone, Copy)]
pub struct PatternDef {
    pub id: PatternId,
    pub weights: [f32; 3],
}

pub const CATALOG: [PatternDef; 6] = [
    PatternDef { id: PatternId::FlyerPair, weights: [0.0, 1.0, 1.2] },
    PatternDef { id: PatternId::HighBait, weights: [0.0, 1.0, 1.0] },
    PatternDef { id: PatternId::TripleStutter, weights: [0.0, 0.6, 1.1] },
    PatternDef { id: PatternId::LowCheck, weights: [0.0, 0.8, 1.0] },
    PatternDef { id: PatternId::TallCorridor, weights: [0.6, 1.0, 0.8] },
    PatternDef { id: PatternId::PitBracket, weights: [0.0, 0.5, 0.9] },
];

/// Jitter a base gap ±10% and tighten it slightly with difficulty
fn gap(base: f32, difficulty: f32, rng: &mut Pcg32) -> f32 {
    let jitter = rng.random_range(0.90..1.10);
    base * jitter * (1.0 - 0.15 * difficulty)
}

/// Build the concrete step list for a pattern.
///
/// `speed` is only used where a step needs physics-derived sizing (explicit
/// pit widths); spacing scales are handled by the director via the speed
/// factor when each step is scheduled.
pub fn build_steps(
    id: PatternId,
    stage: Stage,
    difficulty: f32,
    speed: f32,
    rng: &mut Pcg32,
) -> Vec<PatternStep> {
    match id {
        PatternId::FlyerPair => {
            let first = if rng.random_bool(0.5) { FlightLevel::High } else { FlightLevel::Mid };
            let second = match first {
                FlightLevel::High => FlightLevel::Mid,
                _ => FlightLevel::High,
            };
            vec![
                PatternStep { kind: StepKind::Flyer { level: first }, gap: gap(300.0, difficulty, rng) },
                PatternStep { kind: StepKind::Flyer { level: second }, gap: gap(360.0, difficulty, rng) },
            ]
        }
        PatternId::HighBait => vec![
            PatternStep {
                kind: StepKind::Flyer { level: FlightLevel::High },
                gap: gap(240.0, difficulty, rng),
            },
            PatternStep {
                kind: StepKind::Ground { tall_bias: 1.0 },
                gap: gap(380.0, difficulty, rng),
            },
        ],
        PatternId::TripleStutter => {
            let mut steps = Vec::with_capacity(3);
            let mut level = if rng.random_bool(0.5) { FlightLevel::Mid } else { FlightLevel::High };
            for _ in 0..3 {
                steps.push(PatternStep {
                    kind: StepKind::Flyer { level },
                    gap: gap(220.0, difficulty, rng),
                });
                level = match level {
                    FlightLevel::Mid => FlightLevel::High,
                    _ => FlightLevel::Mid,
                };
            }
            // Breathing room after the stutter
            if let Some(last) = steps.last_mut() {
                last.gap = gap(400.0, difficulty, rng);
            }
            steps
        }
        PatternId::LowCheck => vec![PatternStep {
            kind: StepKind::Flyer { level: FlightLevel::Low },
            gap: gap(420.0, difficulty, rng),
        }],
        PatternId::TallCorridor => {
            let count = if stage == Stage::Early { 2 } else { 3 };
            (0..count)
                .map(|i| PatternStep {
                    kind: StepKind::Ground { tall_bias: 1.8 },
                    gap: if i + 1 == count {
                        gap(400.0, difficulty, rng)
                    } else {
                        gap(310.0, difficulty, rng)
                    },
                })
                .collect()
        }
        PatternId::PitBracket => vec![
            PatternStep {
                kind: StepKind::Pit { width: roll_pit_width(speed, rng) },
                gap: gap(440.0, difficulty, rng),
            },
            PatternStep {
                kind: StepKind::Ground { tall_bias: 1.0 },
                gap: gap(380.0, difficulty, rng),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::director::safe_pit_bounds;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_covers_every_id() {
        assert_eq!(CATALOG.len(), 6);
        for def in CATALOG {
            assert!(def.weights.iter().all(|w| *w >= 0.0));
            assert!(def.weights.iter().any(|w| *w > 0.0));
        }
    }

    #[test]
    fn test_built_patterns_have_positive_gaps() {
        let mut rng = Pcg32::seed_from_u64(5);
        for def in CATALOG {
            for stage in [Stage::Early, Stage::Mid, Stage::Late] {
                let steps = build_steps(def.id, stage, 0.5, BASE_SPEED, &mut rng);
                assert!(!steps.is_empty());
                assert!(steps.iter().all(|s| s.gap > 0.0));
            }
        }
    }

    #[test]
    fn test_pit_bracket_width_is_solvable() {
        for speed in [BASE_SPEED, 400.0, 620.0] {
            let mut rng = Pcg32::seed_from_u64(9);
            let steps = build_steps(PatternId::PitBracket, Stage::Late, 0.8, speed, &mut rng);
            let (lo, hi) = safe_pit_bounds(speed);
            match &steps[0].kind {
                StepKind::Pit { width } => assert!(*width >= lo && *width <= hi),
                other => panic!("expected pit first, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_flyer_pair_altitudes_differ() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..20 {
            let steps = build_steps(PatternId::FlyerPair, Stage::Mid, 0.0, BASE_SPEED, &mut rng);
            let levels: Vec<_> = steps
                .iter()
                .map(|s| match &s.kind {
                    StepKind::Flyer { level } => *level,
                    other => panic!("expected flyer, got {other:?}"),
                })
                .collect();
            assert_ne!(levels[0], levels[1]);
        }
    }

    #[test]
    fn test_difficulty_tightens_gaps() {
        // Same RNG stream, different difficulty: gaps must shrink
        let easy: Vec<f32> = {
            let mut rng = Pcg32::seed_from_u64(77);
            build_steps(PatternId::TallCorridor, Stage::Late, 0.0, BASE_SPEED, &mut rng)
                .iter()
                .map(|s| s.gap)
                .collect()
        };
        let hard: Vec<f32> = {
            let mut rng = Pcg32::seed_from_u64(77);
            build_steps(PatternId::TallCorridor, Stage::Late, 1.0, BASE_SPEED, &mut rng)
                .iter()
                .map(|s| s.gap)
                .collect()
        };
        for (e, h) in easy.iter().zip(&hard) {
            assert!(h < e);
        }
    }
}
