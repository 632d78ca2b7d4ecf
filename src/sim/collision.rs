//! Collision resolution between the actor and active obstacles
//!
//! Two distinct tests:
//!   1. HIT - inset axis-aligned rectangle overlap vs ground/flying
//!      obstacles. Any overlap is fatal.
//!   2. CONTAINMENT - is the actor's footprint band over a pit? Pits are
//!      holes in the ground, not solids; they kill by denying a landing.
//!
//! Touching edges never count as overlap, and flying obstacles use a
//! tighter inset than ground obstacles.

use std::collections::VecDeque;

use super::obstacle::Obstacle;
use super::rect::{Rect, spans_overlap};
use super::state::Actor;
use crate::consts::*;

/// Inset hit-rectangle for a non-pit obstacle; `None` for pits
pub fn obstacle_hit_rect(ob: &Obstacle) -> Option<Rect> {
    match ob {
        Obstacle::Ground(g) => Some(g.rect().inset(GROUND_HIT_PAD)),
        Obstacle::Flyer(f) => Some(f.rect().inset(FLYER_HIT_PAD)),
        Obstacle::Pit(_) => None,
    }
}

/// Scan for a fatal overlap between the actor and any non-pit obstacle.
/// The first hit terminates the scan; order among simultaneous overlaps
/// is irrelevant since any hit ends the run.
pub fn fatal_overlap(actor: &Actor, obstacles: &VecDeque<Obstacle>) -> bool {
    let hit = actor.hit_rect();
    obstacles
        .iter()
        .filter_map(obstacle_hit_rect)
        .any(|ob| hit.overlaps(&ob))
}

/// Is the actor's footprint band over any pit?
///
/// The band is a sub-interval of the actor's width; the pit span is inset
/// from its visible edges, so toes hanging over a rim still count as
/// supported ground.
pub fn over_pit(actor: &Actor, obstacles: &VecDeque<Obstacle>) -> bool {
    let (f0, f1) = actor.foot_band();
    obstacles.iter().any(|ob| match ob {
        Obstacle::Pit(p) => {
            let (p0, p1) = p.inner_span();
            spans_overlap(f0, f1, p0, p1)
        }
        _ => false,
    })
}

/// Can the actor make ground contact at its current x?
///
/// Ground exists wherever no pit is present, and a locked-in pit fall can
/// never re-land (no "ghost" ground tile mid-pit).
pub fn can_land(actor: &Actor, obstacles: &VecDeque<Obstacle>) -> bool {
    !actor.pit_falling && !over_pit(actor, obstacles)
}
