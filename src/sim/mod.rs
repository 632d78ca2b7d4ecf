//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one gameplay stream per run, plus per-obstacle
//!   shape seeds for geometry)
//! - Obstacle store kept sorted by ascending x
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod director;
pub mod obstacle;
pub mod pacing;
pub mod patterns;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use clock::SimClock;
pub use collision::{fatal_overlap, obstacle_hit_rect, over_pit};
pub use director::{clearable_pit_width, roll_pit_width, safe_pit_bounds};
pub use obstacle::{FlightLevel, FlyerObstacle, GroundObstacle, GroundVariant, Obstacle, PitObstacle};
pub use pacing::{Stage, difficulty, speed_factor};
pub use patterns::{PatternId, PatternStep, StepKind};
pub use rect::Rect;
pub use snapshot::{ObstacleKind, ObstacleView, PitWarning, Snapshot};
pub use state::{Actor, RunPhase, RunState, SpawnSchedule};
pub use tick::{TickInput, tick};
