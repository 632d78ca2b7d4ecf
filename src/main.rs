//! Canyon Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop. Raw
//! device events are mapped to abstract intents here; the simulation core
//! never sees the DOM.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, TouchEvent};

    use canyon_dash::consts::*;
    use canyon_dash::sim::{RunPhase, RunState, SimClock, TickInput, tick};
    use canyon_dash::{BestScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: RunState,
        clock: SimClock,
        input: TickInput,
        best: BestScore,
        settings: Settings,
        last_time: f64,
        // Track phase transitions for persistence and HUD
        last_phase: RunPhase,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut state = RunState::new(seed);
            state.debug_hitboxes = settings.show_hitboxes;
            Self {
                state,
                clock: SimClock::new(),
                input: TickInput::default(),
                best: BestScore::load(),
                settings,
                last_time: 0.0,
                last_phase: RunPhase::Ready,
            }
        }

        /// Run simulation ticks for one frame's elapsed time
        fn update(&mut self, dt: f32) {
            let ticks = self.clock.advance(dt);
            for _ in 0..ticks {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);

                // One-shot intents are consumed by the first tick of the batch
                self.input.jump_pressed = false;
                self.input.jump_released = false;
                self.input.restart = false;
                self.input.reset = false;
                self.input.toggle_debug = false;
            }

            // Persist a new best the moment the run ends
            let phase = self.state.phase;
            if phase != self.last_phase {
                if phase == RunPhase::GameOver {
                    if let Some(new_best) = self.state.best_score_update(self.best.value) {
                        self.best = BestScore::new(new_best);
                        self.best.save();
                    }
                }
                self.last_phase = phase;
            }
        }

        /// Update HUD elements in the DOM from a read-only snapshot
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            let snap = self.state.snapshot(self.best.value);

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&snap.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-best") {
                el.set_text_content(Some(&snap.best.to_string()));
            }

            // Show/hide the tap-to-start prompt
            if let Some(el) = document.get_element_by_id("start-prompt") {
                let class = if snap.phase == RunPhase::Ready { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            // Show/hide game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if snap.phase == RunPhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&snap.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Canyon Dash starting...");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_visibility_handler(game.clone());

        request_animation_frame(game);

        log::info!("Canyon Dash running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => {
                        event.prevent_default();
                        if !event.repeat() {
                            g.input.jump_pressed = true;
                        }
                    }
                    "ArrowDown" | "s" | "S" => {
                        event.prevent_default();
                        g.input.duck_held = true;
                    }
                    "Enter" => g.input.restart = true,
                    "Escape" => g.input.reset = true,
                    "h" | "H" => {
                        g.input.toggle_debug = true;
                        g.settings.show_hitboxes = !g.settings.show_hitboxes;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => g.input.jump_released = true,
                    "ArrowDown" | "s" | "S" => g.input.duck_held = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: lower third ducks (if enabled), anywhere else jumps.
        // A tap on the game-over screen restarts.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.state.phase == RunPhase::GameOver {
                    g.input.restart = true;
                    return;
                }
                let duck_zone = g.settings.touch_duck_zone;
                if let Some(touch) = event.touches().get(0) {
                    let h = web_sys::window()
                        .and_then(|w| w.inner_height().ok())
                        .and_then(|v| v.as_f64())
                        .unwrap_or(0.0);
                    if duck_zone && h > 0.0 && (touch.client_y() as f64) > h * 2.0 / 3.0 {
                        g.input.duck_held = true;
                    } else {
                        g.input.jump_pressed = true;
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end releases both intents
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.jump_released = true;
                g.input.duck_held = false;
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_visibility_handler(game: Rc<RefCell<Game>>) {
        // RAF stops while the tab is hidden; drop the stale accumulator on
        // return so the clamp doesn't replay a burst of catch-up ticks
        let document = web_sys::window().unwrap().document().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.clock.reset();
            g.last_time = 0.0;
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Canyon Dash (native) starting...");

    // Headless smoke run: a simple reflex bot plays for a simulated minute
    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use canyon_dash::consts::*;
    use canyon_dash::sim::{
        FlightLevel, Obstacle, RunPhase, RunState, SimClock, TickInput, tick,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = RunState::new(seed);
    let mut clock = SimClock::new();

    // Reflex bot: jump at pits and ground obstacles, duck under flyers
    let auto_input = |state: &RunState| -> TickInput {
        let mut input = TickInput::default();
        if state.phase == RunPhase::Ready {
            input.jump_pressed = true;
            return input;
        }
        let react = state.speed * 0.42;
        let actor_x = state.actor.pos.x;
        for ob in &state.obstacles {
            let lead = ob.x() - (actor_x + state.actor.width);
            if ob.right() < actor_x || lead > react {
                continue;
            }
            match ob {
                Obstacle::Flyer(f) if f.level != FlightLevel::High => input.duck_held = true,
                Obstacle::Flyer(_) => {}
                _ => input.jump_pressed = state.actor.grounded,
            }
            break;
        }
        input
    };

    let mut frames = 0u32;
    while frames < 60 * 60 && state.phase != RunPhase::GameOver {
        let ticks = clock.advance(1.0 / 60.0);
        for _ in 0..ticks {
            let input = auto_input(&state);
            tick(&mut state, &input, SIM_DT);
        }
        frames += 1;
        if frames % 600 == 0 {
            log::info!(
                "t={}s score={} speed={:.0} obstacles={}",
                frames / 60,
                state.display_score(),
                state.speed,
                state.obstacles.len()
            );
        }
    }

    log::info!(
        "smoke run over: score={} after {} ticks (seed {seed})",
        state.display_score(),
        state.time_ticks
    );
}
