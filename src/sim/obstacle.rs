//! Obstacle entities and procedural shape generation
//!
//! An obstacle is a closed sum over ground obstacles, flying obstacles, and
//! pits - kind-specific fields are required, so no invalid combinations can
//! be represented. Ground obstacle geometry is derived from a dedicated
//! per-obstacle seed, independent of the gameplay RNG stream, so a shape can
//! be re-generated identically for rendering.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Rect;
use crate::consts::*;

/// Flyer sprite dimensions
pub const FLYER_W: f32 = 42.0;
pub const FLYER_H: f32 = 28.0;

/// Hardness bounds for ground obstacles
pub const HARDNESS_MIN: f32 = 0.30;
pub const HARDNESS_MAX: f32 = 1.60;

/// The nine ground obstacle silhouettes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundVariant {
    /// A single narrow rock
    Lone,
    /// Two rocks fused together
    Pair,
    /// Three in a row
    Trio,
    /// Low and long
    Slab,
    /// Narrow and high
    Tall,
    /// Two tall rocks
    TallPair,
    /// Very narrow, very high
    Spire,
    /// A long low ridge
    Wide,
    /// A broad jumble of rocks
    Cluster,
}

impl GroundVariant {
    pub const ALL: [GroundVariant; 9] = [
        GroundVariant::Lone,
        GroundVariant::Pair,
        GroundVariant::Trio,
        GroundVariant::Slab,
        GroundVariant::Tall,
        GroundVariant::TallPair,
        GroundVariant::Spire,
        GroundVariant::Wide,
        GroundVariant::Cluster,
    ];

    /// Dimension ranges: (width min/max, height min/max)
    pub fn dim_ranges(&self) -> ((f32, f32), (f32, f32)) {
        match self {
            GroundVariant::Lone => ((24.0, 34.0), (40.0, 58.0)),
            GroundVariant::Pair => ((48.0, 64.0), (38.0, 54.0)),
            GroundVariant::Trio => ((72.0, 96.0), (36.0, 52.0)),
            GroundVariant::Slab => ((64.0, 90.0), (24.0, 34.0)),
            GroundVariant::Tall => ((26.0, 36.0), (64.0, 86.0)),
            GroundVariant::TallPair => ((52.0, 70.0), (62.0, 82.0)),
            GroundVariant::Spire => ((18.0, 26.0), (78.0, 98.0)),
            GroundVariant::Wide => ((96.0, 130.0), (30.0, 44.0)),
            GroundVariant::Cluster => ((110.0, 150.0), (40.0, 60.0)),
        }
    }

    /// Flat hardness bonus on top of the size-derived score
    pub fn hardness_bonus(&self) -> f32 {
        match self {
            GroundVariant::Lone => 0.0,
            GroundVariant::Pair => 0.08,
            GroundVariant::Trio => 0.16,
            GroundVariant::Slab => 0.05,
            GroundVariant::Tall => 0.22,
            GroundVariant::TallPair => 0.30,
            GroundVariant::Spire => 0.28,
            GroundVariant::Wide => 0.26,
            GroundVariant::Cluster => 0.38,
        }
    }

    /// Is this one of the broad footprint variants boosted by difficulty
    /// and suppressed while a guard window is active?
    pub fn is_broad(&self) -> bool {
        matches!(self, GroundVariant::Wide | GroundVariant::Cluster)
    }

    /// Is this one of the high-silhouette variants favored by tall bias?
    pub fn is_tall(&self) -> bool {
        matches!(
            self,
            GroundVariant::Tall | GroundVariant::TallPair | GroundVariant::Spire
        )
    }
}

/// Flyer altitude bands. Low sits at duck height and is the hardest read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightLevel {
    Low,
    Mid,
    High,
}

impl FlightLevel {
    pub const ALL: [FlightLevel; 3] = [FlightLevel::Low, FlightLevel::Mid, FlightLevel::High];

    /// Y of the flyer's bottom edge
    pub fn bottom_y(&self) -> f32 {
        match self {
            FlightLevel::Low => GROUND_Y - 30.0,
            FlightLevel::Mid => GROUND_Y - 44.0,
            FlightLevel::High => GROUND_Y - 96.0,
        }
    }

    pub fn hardness(&self) -> f32 {
        match self {
            FlightLevel::Low => 1.25,
            FlightLevel::Mid => 0.85,
            FlightLevel::High => 0.55,
        }
    }
}

/// A ground obstacle: a rock formation the actor must jump
#[derive(Debug, Clone)]
pub struct GroundObstacle {
    /// X of the left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub variant: GroundVariant,
    /// Seed for reproducible shape rendering, distinct from the gameplay RNG
    pub shape_seed: u64,
    pub hardness: f32,
}

impl GroundObstacle {
    /// Generate an obstacle at `x` from a variant and shape seed.
    ///
    /// Dimensions are a deterministic function of (variant, shape_seed);
    /// `max_w`/`max_h` are contextual stage caps applied after the draw.
    pub fn generate(x: f32, variant: GroundVariant, shape_seed: u64, max_w: f32, max_h: f32) -> Self {
        let (width, height) = roll_ground_dims(variant, shape_seed);
        let width = width.min(max_w);
        let height = height.min(max_h);
        assert!(
            width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite(),
            "degenerate ground obstacle {width}x{height}"
        );
        let hardness = ground_hardness(variant, width, height);
        Self {
            x,
            width,
            height,
            variant,
            shape_seed,
            hardness,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, GROUND_Y - self.height, self.width, self.height)
    }
}

/// A flying obstacle at one of three altitude bands
#[derive(Debug, Clone)]
pub struct FlyerObstacle {
    pub x: f32,
    pub level: FlightLevel,
    pub width: f32,
    pub height: f32,
}

impl FlyerObstacle {
    pub fn new(x: f32, level: FlightLevel) -> Self {
        Self {
            x,
            level,
            width: FLYER_W,
            height: FLYER_H,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.level.bottom_y() - self.height,
            self.width,
            self.height,
        )
    }
}

/// A gap in the ground the actor must clear
#[derive(Debug, Clone)]
pub struct PitObstacle {
    pub x: f32,
    pub width: f32,
}

impl PitObstacle {
    pub fn new(x: f32, width: f32) -> Self {
        assert!(
            width >= PIT_MIN_W && width <= PIT_MAX_W_HARDCAP && width.is_finite(),
            "pit width {width} outside legal bounds"
        );
        Self { x, width }
    }

    /// Visual extent of the pit (below the ground line)
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, GROUND_Y, self.width, PIT_DEPTH)
    }

    /// Horizontal span used for containment, inset from the visible edges
    pub fn inner_span(&self) -> (f32, f32) {
        (self.x + PIT_EDGE_INSET, self.x + self.width - PIT_EDGE_INSET)
    }
}

/// Any active obstacle. All variants scroll left at world speed.
#[derive(Debug, Clone)]
pub enum Obstacle {
    Ground(GroundObstacle),
    Flyer(FlyerObstacle),
    Pit(PitObstacle),
}

impl Obstacle {
    pub fn x(&self) -> f32 {
        match self {
            Obstacle::Ground(g) => g.x,
            Obstacle::Flyer(f) => f.x,
            Obstacle::Pit(p) => p.x,
        }
    }

    pub fn right(&self) -> f32 {
        match self {
            Obstacle::Ground(g) => g.x + g.width,
            Obstacle::Flyer(f) => f.x + f.width,
            Obstacle::Pit(p) => p.x + p.width,
        }
    }

    /// Scroll left by `dx`
    pub fn advance(&mut self, dx: f32) {
        match self {
            Obstacle::Ground(g) => g.x -= dx,
            Obstacle::Flyer(f) => f.x -= dx,
            Obstacle::Pit(p) => p.x -= dx,
        }
    }

    /// Full sprite rectangle (pits render below the ground line)
    pub fn rect(&self) -> Rect {
        match self {
            Obstacle::Ground(g) => g.rect(),
            Obstacle::Flyer(f) => f.rect(),
            Obstacle::Pit(p) => p.rect(),
        }
    }

    pub fn hardness(&self) -> f32 {
        match self {
            Obstacle::Ground(g) => g.hardness,
            Obstacle::Flyer(f) => f.level.hardness(),
            Obstacle::Pit(_) => PIT_HARDNESS,
        }
    }
}

/// Draw ground obstacle dimensions from the variant's ranges.
///
/// Uses a dedicated `Pcg32` seeded by the obstacle's shape seed, so the same
/// (variant, seed) always yields the same dimensions.
pub fn roll_ground_dims(variant: GroundVariant, shape_seed: u64) -> (f32, f32) {
    let mut rng = Pcg32::seed_from_u64(shape_seed);
    let ((w0, w1), (h0, h1)) = variant.dim_ranges();
    let w = rng.random_range(w0..=w1);
    let h = rng.random_range(h0..=h1);
    (w, h)
}

/// Continuous difficulty score from normalized size plus a variant bonus
pub fn ground_hardness(variant: GroundVariant, width: f32, height: f32) -> f32 {
    // Normalization spans the union of all variant ranges
    let nw = ((width - 18.0) / (150.0 - 18.0)).clamp(0.0, 1.0);
    let nh = ((height - 24.0) / (98.0 - 24.0)).clamp(0.0, 1.0);
    (0.30 + 0.40 * nw + 0.50 * nh + variant.hardness_bonus()).clamp(HARDNESS_MIN, HARDNESS_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_generation_is_deterministic() {
        for variant in GroundVariant::ALL {
            let a = roll_ground_dims(variant, 0xDEAD_BEEF);
            let b = roll_ground_dims(variant, 0xDEAD_BEEF);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_dims_stay_in_variant_ranges() {
        for variant in GroundVariant::ALL {
            let ((w0, w1), (h0, h1)) = variant.dim_ranges();
            for seed in 0..200u64 {
                let (w, h) = roll_ground_dims(variant, seed);
                assert!(w >= w0 && w <= w1, "{variant:?} width {w}");
                assert!(h >= h0 && h <= h1, "{variant:?} height {h}");
            }
        }
    }

    #[test]
    fn test_hardness_bounds() {
        for variant in GroundVariant::ALL {
            for seed in 0..100u64 {
                let (w, h) = roll_ground_dims(variant, seed);
                let hard = ground_hardness(variant, w, h);
                assert!((HARDNESS_MIN..=HARDNESS_MAX).contains(&hard));
            }
        }
    }

    #[test]
    fn test_cluster_harder_than_lone() {
        let cluster = GroundObstacle::generate(0.0, GroundVariant::Cluster, 7, 999.0, 999.0);
        let lone = GroundObstacle::generate(0.0, GroundVariant::Lone, 7, 999.0, 999.0);
        assert!(cluster.hardness > lone.hardness);
    }

    #[test]
    fn test_stage_caps_clamp_dims() {
        let g = GroundObstacle::generate(0.0, GroundVariant::Cluster, 11, 100.0, 45.0);
        assert!(g.width <= 100.0);
        assert!(g.height <= 45.0);
    }

    #[test]
    fn test_flyer_levels_ordered_by_hardness() {
        assert!(FlightLevel::Low.hardness() > FlightLevel::Mid.hardness());
        assert!(FlightLevel::Mid.hardness() > FlightLevel::High.hardness());
    }

    #[test]
    fn test_low_flyer_clears_ducking_actor() {
        // A duck-height actor top must sit below the low flyer's bottom edge
        let flyer = FlyerObstacle::new(0.0, FlightLevel::Low);
        assert!(flyer.rect().bottom() <= GROUND_Y - DUCK_H + 0.01);
    }

    #[test]
    fn test_high_flyer_clears_standing_actor() {
        let flyer = FlyerObstacle::new(0.0, FlightLevel::High);
        assert!(flyer.rect().bottom() < GROUND_Y - STAND_H);
    }

    #[test]
    #[should_panic]
    fn test_illegal_pit_width_asserts() {
        let _ = PitObstacle::new(0.0, PIT_MAX_W_HARDCAP + 1.0);
    }
}
