//! Fixed timestep simulation tick
//!
//! Advances one run deterministically: actor physics, obstacle aging, spawn
//! scheduling, and the READY / RUNNING / GAMEOVER state machine. All intents
//! are applied at tick boundaries; nothing here blocks or does I/O.

use std::collections::VecDeque;

use super::collision::{can_land, fatal_overlap, over_pit};
use super::director;
use super::obstacle::Obstacle;
use super::state::{Actor, RunPhase, RunState};
use crate::consts::*;

/// Input intents for a single tick.
///
/// Press/release flags are edges reported once by the boundary; duck is a
/// level. The boundary clears one-shot flags after each drained batch.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub duck_held: bool,
    /// From GAMEOVER: reinitialize and go straight back to RUNNING
    pub restart: bool,
    /// From GAMEOVER: reinitialize and idle in READY
    pub reset: bool,
    pub toggle_debug: bool,
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) {
    if input.toggle_debug {
        state.debug_hitboxes = !state.debug_hitboxes;
    }

    match state.phase {
        RunPhase::Ready => {
            // Only a jump intent leaves READY; the starting press doubles
            // as the first jump via the buffer below
            if !input.jump_pressed {
                return;
            }
            state.phase = RunPhase::Running;
            log::info!("run started (seed {})", state.seed);
        }
        RunPhase::GameOver => {
            if input.restart {
                state.restart();
                log::info!("restart (seed {})", state.seed);
            } else if input.reset {
                state.reset();
            }
            return;
        }
        RunPhase::Running => {}
    }

    state.time_ticks += 1;
    state.speed += SPEED_ACCEL * dt;
    state.score += state.speed * dt * SCORE_RATE;

    let RunState { actor, obstacles, .. } = state;
    step_actor(actor, obstacles, input, dt);

    // Age obstacles; the store is sorted by ascending x, so expiry is a
    // prefix trim at the front
    let dx = state.speed * dt;
    for ob in state.obstacles.iter_mut() {
        ob.advance(dx);
    }
    while state
        .obstacles
        .front()
        .is_some_and(|ob| ob.right() < -CULL_MARGIN)
    {
        state.obstacles.pop_front();
    }
    state.schedule.consume_distance(dx);

    // Spawn opportunity once the scheduled travel distance is reached
    if state.schedule.distance >= state.schedule.next_at {
        director::run_spawn(
            &mut state.schedule,
            &mut state.obstacles,
            &mut state.rng,
            state.speed,
            state.score,
        );
    }

    // Fatal conditions end the run; these are designed transitions, not
    // errors, and are always recoverable via restart/reset
    if fatal_overlap(&state.actor, &state.obstacles) {
        log::info!("run over: collision at score {}", state.display_score());
        state.phase = RunPhase::GameOver;
        return;
    }
    if state.actor.pos.y > FATAL_FALL_Y {
        log::info!("run over: fell at score {}", state.display_score());
        state.phase = RunPhase::GameOver;
    }
}

/// Actor controller: jump arc shaping, ducking, ground contact
fn step_actor(actor: &mut Actor, obstacles: &VecDeque<Obstacle>, input: &TickInput, dt: f32) {
    if input.jump_pressed {
        actor.jump_held = true;
        actor.jump_buffer = JUMP_BUFFER;
    }
    if input.jump_released {
        actor.jump_held = false;
        // Jump cut: an early release shortens the hop
        if actor.vy < JUMP_CUT_VEL {
            actor.vy = JUMP_CUT_VEL;
        }
    }

    // Ducking is only honored while grounded
    if actor.grounded {
        actor.set_ducking(input.duck_held);
    }

    // The ground may have scrolled out from under the feet
    if actor.grounded && over_pit(actor, obstacles) {
        actor.grounded = false;
        actor.coyote = COYOTE_TIME;
        actor.set_ducking(false);
    }

    // Jump initiation consumes the buffer; requires ground contact or the
    // coyote window, and a locked pit fall can never jump out
    if actor.jump_buffer > 0.0 && (actor.grounded || actor.coyote > 0.0) && !actor.pit_falling {
        actor.vy = JUMP_VEL;
        actor.grounded = false;
        actor.coyote = 0.0;
        actor.jump_buffer = 0.0;
        actor.jump_hold = 0.0;
        actor.set_ducking(false);
    }

    if actor.grounded {
        actor.vy = 0.0;
        actor.pos.y = GROUND_Y - actor.height;
    } else {
        // Gravity shaping: floaty apex while the jump is held during
        // ascent, fast-fall while duck is held
        let ascending = actor.vy < 0.0;
        let mut g = GRAVITY;
        if ascending && actor.jump_held && actor.jump_hold < JUMP_HOLD_MAX {
            g *= HOLD_GRAVITY_SCALE;
            actor.jump_hold += dt;
        } else if input.duck_held {
            g *= FASTFALL_GRAVITY_SCALE;
        }

        let prev_bottom = actor.bottom();
        actor.vy += g * dt;
        actor.pos.y += actor.vy * dt;

        // Sinking below the line over a pit locks the fall in for good
        if !actor.pit_falling
            && actor.bottom() > GROUND_Y + PIT_LOCK_DEPTH
            && over_pit(actor, obstacles)
        {
            actor.pit_falling = true;
        }

        // Landing: descending across the ground line where ground exists.
        // The lock-in depth is tolerated so a pit edge passing underneath
        // mid-sink still offers the rim.
        if actor.vy > 0.0
            && prev_bottom <= GROUND_Y + PIT_LOCK_DEPTH
            && actor.bottom() >= GROUND_Y
            && can_land(actor, obstacles)
        {
            actor.pos.y = GROUND_Y - actor.height;
            actor.vy = 0.0;
            actor.grounded = true;
            actor.jump_hold = 0.0;
        }

        actor.coyote = (actor.coyote - dt).max(0.0);
    }

    actor.jump_buffer = (actor.jump_buffer - dt).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{GroundObstacle, GroundVariant, PitObstacle};

    fn running(seed: u64) -> RunState {
        let mut state = RunState::new(seed);
        state.phase = RunPhase::Running;
        state
    }

    fn press_jump() -> TickInput {
        TickInput { jump_pressed: true, ..Default::default() }
    }

    /// A pit wide enough to sit under the whole actor
    fn pit_under_actor(state: &RunState) -> Obstacle {
        Obstacle::Pit(PitObstacle::new(state.actor.pos.x - 40.0, 160.0))
    }

    #[test]
    fn test_ready_ignores_everything_but_jump() {
        let mut state = RunState::new(7);
        for input in [
            TickInput { duck_held: true, ..Default::default() },
            TickInput { restart: true, ..Default::default() },
            TickInput { reset: true, ..Default::default() },
        ] {
            tick(&mut state, &input, SIM_DT);
            assert_eq!(state.phase, RunPhase::Ready);
            assert_eq!(state.score, 0.0);
            assert_eq!(state.time_ticks, 0);
        }

        tick(&mut state, &press_jump(), SIM_DT);
        assert_eq!(state.phase, RunPhase::Running);
        // The starting press is also the first jump
        assert!(!state.actor.grounded);
        assert!(state.actor.vy < 0.0);
    }

    #[test]
    fn test_running_ignores_restart_and_reset() {
        let mut state = running(7);
        let input = TickInput { restart: true, reset: true, ..Default::default() };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, RunPhase::Running);
        assert!(state.time_ticks > 0);
    }

    #[test]
    fn test_gameover_transitions() {
        let mut state = running(7);
        state.phase = RunPhase::GameOver;

        // Plain ticks stay put and freeze score/speed
        let speed = state.speed;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, RunPhase::GameOver);
        assert_eq!(state.speed, speed);

        tick(&mut state, &TickInput { restart: true, ..Default::default() }, SIM_DT);
        assert_eq!(state.phase, RunPhase::Running);

        state.phase = RunPhase::GameOver;
        tick(&mut state, &TickInput { reset: true, ..Default::default() }, SIM_DT);
        assert_eq!(state.phase, RunPhase::Ready);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = running(7);
        state.obstacles.push_back(Obstacle::Ground(GroundObstacle::generate(
            state.actor.pos.x,
            GroundVariant::Tall,
            1,
            999.0,
            999.0,
        )));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, RunPhase::GameOver);
    }

    #[test]
    fn test_jump_clears_an_obstacle_tick_by_tick() {
        let mut state = running(3);
        // Hold jump the whole way for maximum height
        tick(&mut state, &press_jump(), SIM_DT);
        let mut peak = f32::MAX;
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            peak = peak.min(state.actor.pos.y);
            if state.actor.grounded {
                break;
            }
        }
        assert!(state.actor.grounded, "never landed");
        // Full hold clears well above the tallest ground obstacle
        assert!(GROUND_Y - peak - STAND_H > 98.0, "jump peak too low");
        assert_eq!(state.actor.bottom(), GROUND_Y);
    }

    #[test]
    fn test_jump_cut_clamps_ascent() {
        let mut state = running(3);
        tick(&mut state, &press_jump(), SIM_DT);
        assert!(state.actor.vy < JUMP_CUT_VEL, "should start ascending fast");

        let release = TickInput { jump_released: true, ..Default::default() };
        tick(&mut state, &release, SIM_DT);
        // Never faster upward than the cut velocity after release
        assert!(state.actor.vy >= JUMP_CUT_VEL);
        assert!(state.actor.vy < 0.0, "still ascending, just slower");
    }

    #[test]
    fn test_held_jump_flies_higher_than_tap() {
        let hold_peak = {
            let mut state = running(9);
            tick(&mut state, &press_jump(), SIM_DT);
            let mut peak = f32::MAX;
            for _ in 0..200 {
                tick(&mut state, &TickInput::default(), SIM_DT);
                peak = peak.min(state.actor.pos.y);
                if state.actor.grounded {
                    break;
                }
            }
            peak
        };
        let tap_peak = {
            let mut state = running(9);
            tick(&mut state, &press_jump(), SIM_DT);
            let release = TickInput { jump_released: true, ..Default::default() };
            tick(&mut state, &release, SIM_DT);
            let mut peak = f32::MAX;
            for _ in 0..200 {
                tick(&mut state, &TickInput::default(), SIM_DT);
                peak = peak.min(state.actor.pos.y);
                if state.actor.grounded {
                    break;
                }
            }
            peak
        };
        // Smaller y = higher (y-down)
        assert!(hold_peak < tap_peak - 30.0, "hold {hold_peak} vs tap {tap_peak}");
    }

    #[test]
    fn test_fast_fall_shortens_airtime() {
        let airtime = |duck: bool| {
            let mut state = running(5);
            tick(&mut state, &press_jump(), SIM_DT);
            let mut ticks = 0;
            for _ in 0..400 {
                let input = TickInput { duck_held: duck, ..Default::default() };
                tick(&mut state, &input, SIM_DT);
                ticks += 1;
                if state.actor.grounded {
                    break;
                }
            }
            ticks
        };
        assert!(airtime(true) < airtime(false));
    }

    #[test]
    fn test_duck_only_honored_on_ground() {
        let mut state = running(5);
        let duck = TickInput { duck_held: true, ..Default::default() };
        tick(&mut state, &duck, SIM_DT);
        assert!(state.actor.ducking);
        assert_eq!(state.actor.height, DUCK_H);
        assert_eq!(state.actor.bottom(), GROUND_Y);

        // Jumping cancels the duck and it stays canceled while airborne
        let jump_and_duck = TickInput { jump_pressed: true, duck_held: true, ..Default::default() };
        tick(&mut state, &jump_and_duck, SIM_DT);
        assert!(!state.actor.grounded);
        assert!(!state.actor.ducking);
        tick(&mut state, &duck, SIM_DT);
        assert!(!state.actor.ducking);
    }

    #[test]
    fn test_buffered_jump_fires_on_landing() {
        let mut state = running(5);
        // Drop the actor just above the ground, descending
        state.actor.grounded = false;
        state.actor.pos.y = GROUND_Y - state.actor.height - 6.0;
        state.actor.vy = 300.0;

        // Early press: registers before touchdown
        tick(&mut state, &press_jump(), SIM_DT);
        assert!(!state.actor.grounded);

        let mut jumped = false;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.actor.vy < -500.0 {
                jumped = true;
                break;
            }
        }
        assert!(jumped, "buffered press should fire on landing");
    }

    #[test]
    fn test_coyote_window_allows_late_jump_over_pit() {
        let mut state = running(5);
        state.obstacles.push_back(pit_under_actor(&state));

        // First tick: ground disappears, coyote window opens
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.actor.grounded);
        assert!(state.actor.coyote > 0.0);

        // Press inside the window still jumps
        tick(&mut state, &press_jump(), SIM_DT);
        assert!(state.actor.vy < -500.0);
    }

    #[test]
    fn test_pit_fall_locks_in_and_ends_run() {
        let mut state = running(5);
        // Keep the pit under the actor; without input the actor sinks
        state.obstacles.push_back(pit_under_actor(&state));
        state.schedule.next_at = f32::MAX; // isolate from spawning

        let mut locked = false;
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            // Freeze the pit in place despite scrolling
            if let Some(Obstacle::Pit(p)) = state.obstacles.front_mut() {
                p.x = state.actor.pos.x - 40.0;
            }
            if state.actor.pit_falling {
                locked = true;
            }
            if state.phase == RunPhase::GameOver {
                break;
            }
        }
        assert!(locked, "fall never locked in");
        assert_eq!(state.phase, RunPhase::GameOver);
        assert!(state.actor.pos.y > FATAL_FALL_Y);
    }

    #[test]
    fn test_locked_fall_ignores_jump() {
        let mut state = running(5);
        state.actor.grounded = false;
        state.actor.pit_falling = true;
        // Even with a live coyote window the lock-in wins
        state.actor.coyote = COYOTE_TIME;
        state.actor.pos.y = GROUND_Y;
        state.actor.vy = 100.0;
        tick(&mut state, &press_jump(), SIM_DT);
        assert!(state.actor.vy > 0.0, "jump must not fire while pit-falling");
    }

    #[test]
    fn test_obstacles_scroll_left_and_cull() {
        let mut state = running(5);
        state.schedule.next_at = f32::MAX;
        state.obstacles.push_back(Obstacle::Ground(GroundObstacle::generate(
            700.0,
            GroundVariant::Lone,
            1,
            999.0,
            999.0,
        )));
        let x0 = state.obstacles[0].x();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.obstacles[0].x() < x0);

        // Teleport it far off-screen: culled on the next tick
        if let Some(Obstacle::Ground(g)) = state.obstacles.front_mut() {
            g.x = -CULL_MARGIN - 200.0;
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_director_begins_spawning() {
        let mut state = running(11);
        for _ in 0..400 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if !state.obstacles.is_empty() {
                return;
            }
        }
        panic!("no spawn within the first 400 ticks");
    }

    #[test]
    fn test_speed_and_score_rise_while_running() {
        let mut state = running(5);
        state.schedule.next_at = f32::MAX;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.speed > BASE_SPEED);
        assert!(state.score > 0.0);
    }

    #[test]
    fn test_tick_determinism() {
        let script = |state: &mut RunState| {
            for i in 0..1200u32 {
                let input = TickInput {
                    jump_pressed: i % 90 == 0,
                    jump_released: i % 90 == 40,
                    duck_held: (60..80).contains(&(i % 200)),
                    ..Default::default()
                };
                tick(state, &input, SIM_DT);
            }
        };
        let mut a = RunState::new(424242);
        let mut b = RunState::new(424242);
        script(&mut a);
        script(&mut b);

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.speed.to_bits(), b.speed.to_bits());
        assert_eq!(a.score.to_bits(), b.score.to_bits());
        assert_eq!(a.actor.pos.y.to_bits(), b.actor.pos.y.to_bits());
        assert_eq!(a.actor.vy.to_bits(), b.actor.vy.to_bits());
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (oa, ob) in a.obstacles.iter().zip(b.obstacles.iter()) {
            assert_eq!(oa.x().to_bits(), ob.x().to_bits());
        }
    }
}
