//! Pasta Invaders entry point
//!
//! Wasm builds run the browser game loop; native builds run a short headless
//! simulation for smoke-testing the core.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use pasta_invaders::commentary;
    use pasta_invaders::input::{Action, InputState};
    use pasta_invaders::render::Renderer;
    use pasta_invaders::sim::{GameConfig, GamePhase};
    use pasta_invaders::{Session, Settings};

    /// Everything the frame loop touches
    struct Game {
        session: Session,
        renderer: Option<Renderer>,
        input: InputState,
        settings: Settings,
        /// Previous frame's phase, for edge-triggered game-over handling
        last_phase: GamePhase,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, config: GameConfig) -> Self {
            Self {
                session: Session::new(seed, config),
                renderer: None,
                input: InputState::new(),
                settings: Settings::load(),
                last_phase: GamePhase::Menu,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pasta Invaders starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Match the drawing buffer to the CSS layout size
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let config = GameConfig::new(width as f32, height as f32);
        let game = Rc::new(RefCell::new(Game::new(seed, config)));
        game.borrow_mut().renderer = Renderer::new(&canvas);
        if game.borrow().renderer.is_none() {
            log::error!("2d canvas context unavailable");
        }

        log::info!("Session seeded with {seed}, canvas {width}x{height}");

        setup_input_handlers(game.clone());
        setup_touch_buttons(game.clone());
        setup_session_buttons(game.clone());

        request_animation_frame(game);
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

            let input = g.input.snapshot();
            let events = g.session.frame(&input);
            for event in &events {
                log::debug!("tick event: {event:?}");
            }

            g.track_fps(time);

            // Edge-trigger: the run just ended, ask Nonna what she thinks
            let phase = g.session.phase();
            if g.last_phase == GamePhase::Playing && phase == GamePhase::GameOver {
                dispatch_commentary(&g.session, game.clone());
            }
            g.last_phase = phase;

            if let Some(renderer) = &g.renderer {
                renderer.render(g.session.state(), &g.settings, time);
            }
            update_hud(&g);
        }

        request_animation_frame(game);
    }

    /// Fire-and-forget commentary fetch. The generation captured here is
    /// compared on resolution so a response from a finished run can never
    /// overwrite the current one.
    fn dispatch_commentary(session: &Session, game: Rc<RefCell<Game>>) {
        let generation = session.generation();
        let request = session.commentary_request();

        if let Some(el) = element("nonna-commentary") {
            el.set_text_content(Some("Nonna is thinking..."));
        }

        spawn_local(async move {
            let text = commentary::fetch_commentary(&request).await;
            let g = game.borrow();
            if !g.session.is_current(generation) {
                log::debug!("stale commentary dropped (generation {generation})");
                return;
            }
            if let Some(el) = element("nonna-commentary") {
                el.set_text_content(Some(&text));
            }
        });
    }

    fn element(id: &str) -> Option<web_sys::Element> {
        web_sys::window()?.document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = element(id) {
            let _ = el.set_attribute("class", if visible { "overlay" } else { "overlay hidden" });
        }
    }

    fn update_hud(g: &Game) {
        set_text("hud-score", &format!("{:05}", g.session.score()));
        set_text("hud-wave", &g.session.wave().to_string());
        set_text("hud-high", &format!("{:05}", g.session.high_score()));
        if g.settings.show_fps {
            set_text("hud-fps", &g.fps.to_string());
        }

        let phase = g.session.phase();
        set_visible("menu-overlay", phase == GamePhase::Menu);
        set_visible("gameover-overlay", phase == GamePhase::GameOver);
        if phase == GamePhase::GameOver {
            set_text("final-score", &g.session.score().to_string());
            set_text("final-wave", &g.session.wave().to_string());
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Held-key tracking; mapped keys are swallowed so the page never
        // scrolls on Space/arrows
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if Action::from_key_code(&code).is_some() {
                    event.prevent_default();
                    game.borrow_mut().input.key_event(&code, true);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_event(&event.code(), false);
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // A missed keyup would leave a key stuck; drop everything on blur
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.release_all();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen touch buttons: held while touched, released on touchend
    fn setup_touch_buttons(game: Rc<RefCell<Game>>) {
        for (id, action) in [
            ("touch-left", Action::Left),
            ("touch-right", Action::Right),
            ("touch-shoot", Action::Shoot),
        ] {
            let Some(btn) = element(id) else {
                log::warn!("touch button #{id} missing from page");
                continue;
            };
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().input.touch_event(action, true);
                });
                let _ = btn.add_event_listener_with_callback(
                    "touchstart",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().input.touch_event(action, false);
                });
                let _ = btn.add_event_listener_with_callback(
                    "touchend",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
        }
    }

    fn setup_session_buttons(game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            let Some(btn) = element(id) else {
                log::warn!("button #{id} missing from page");
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pasta_invaders::Session;
    use pasta_invaders::sim::{GameConfig, GamePhase, TickInput};

    env_logger::init();
    log::info!("Pasta Invaders (native) starting headless demo...");

    let mut session = Session::new(0xC0FFEE, GameConfig::new(800.0, 600.0));
    session.start();

    // Scripted run: strafe back and forth with the trigger held
    let mut ticks = 0u32;
    while session.phase() == GamePhase::Playing && ticks < 3600 {
        let input = TickInput {
            left: (ticks / 60) % 2 == 0,
            right: (ticks / 60) % 2 == 1,
            shoot: true,
        };
        for event in session.frame(&input) {
            log::info!("tick {ticks}: {event:?}");
        }
        ticks += 1;
    }

    log::info!(
        "demo over after {ticks} ticks: phase {:?}, score {}, wave {}",
        session.phase(),
        session.score(),
        session.wave()
    );
    println!(
        "score {} / wave {} after {} ticks",
        session.score(),
        session.wave(),
        ticks
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main; this satisfies the bin target
}
