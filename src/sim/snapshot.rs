//! Read-only presentation snapshot
//!
//! The presentation layer never touches live simulation state; after a tick
//! batch it takes a `Snapshot` and draws from that. Hit rectangles are only
//! included while the debug overlay is toggled on.

use super::collision::obstacle_hit_rect;
use super::obstacle::Obstacle;
use super::rect::Rect;
use super::state::{RunPhase, RunState};

/// Obstacle kind tag for rendering dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Ground,
    Flyer,
    Pit,
}

/// One obstacle as the renderer sees it
#[derive(Debug, Clone)]
pub struct ObstacleView {
    pub kind: ObstacleKind,
    pub rect: Rect,
    /// Present only with debug hitboxes enabled (pits have none)
    pub hit_rect: Option<Rect>,
}

/// A warning zone ahead of an upcoming pit
#[derive(Debug, Clone, Copy)]
pub struct PitWarning {
    pub x0: f32,
    pub x1: f32,
}

/// How far ahead of a pit's left edge the warning zone extends
const PIT_WARNING_LEAD: f32 = 46.0;

/// Everything the presentation layer may read after a tick batch
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: RunPhase,
    pub actor: Rect,
    pub actor_hit: Option<Rect>,
    pub ducking: bool,
    pub airborne: bool,
    pub obstacles: Vec<ObstacleView>,
    /// Floored score as displayed
    pub score: u64,
    /// Externally supplied best score
    pub best: u64,
    pub pit_warnings: Vec<PitWarning>,
}

impl RunState {
    /// Build a presentation snapshot. `best` is the externally persisted
    /// best score; the core never reads storage itself.
    pub fn snapshot(&self, best: u64) -> Snapshot {
        let debug = self.debug_hitboxes;
        let obstacles = self
            .obstacles
            .iter()
            .map(|ob| ObstacleView {
                kind: match ob {
                    Obstacle::Ground(_) => ObstacleKind::Ground,
                    Obstacle::Flyer(_) => ObstacleKind::Flyer,
                    Obstacle::Pit(_) => ObstacleKind::Pit,
                },
                rect: ob.rect(),
                hit_rect: if debug { obstacle_hit_rect(ob) } else { None },
            })
            .collect();

        let pit_warnings = self
            .obstacles
            .iter()
            .filter_map(|ob| match ob {
                Obstacle::Pit(p) if p.x > self.actor.pos.x => Some(PitWarning {
                    x0: p.x - PIT_WARNING_LEAD,
                    x1: p.x,
                }),
                _ => None,
            })
            .collect();

        Snapshot {
            phase: self.phase,
            actor: self.actor.rect(),
            actor_hit: if debug { Some(self.actor.hit_rect()) } else { None },
            ducking: self.actor.ducking,
            airborne: !self.actor.grounded,
            obstacles,
            score: self.display_score(),
            best,
            pit_warnings,
        }
    }
}
