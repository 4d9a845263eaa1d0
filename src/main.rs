//! Slide Scroller entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, HtmlImageElement};

    use slide_scroller::platform::KeyboardState;
    use slide_scroller::renderer::{CanvasRenderer, build_scene};
    use slide_scroller::sim::{GameEvent, GameState, tick};
    use slide_scroller::slides::{SlideError, SlideLoader};
    use slide_scroller::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        keys: KeyboardState,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, renderer: CanvasRenderer, tuning: Tuning, settings: Settings) -> Self {
            let mut state = GameState::with_config(seed, tuning, settings);
            let (w, h) = renderer.size();
            state.set_screen_size(w as f32, h as f32);
            Self {
                state,
                renderer,
                keys: KeyboardState::new(),
                last_time: 0.0,
            }
        }

        fn update(&mut self, dt: f32) {
            let input = self.keys.tick_input();
            tick(&mut self.state, &input, dt);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::PlayerDied => log::info!("Player died, health restored"),
                    GameEvent::RoomEntered { id } => {
                        log::info!("Now in {}", self.state.rooms.room_label());
                        log::debug!("Room {} entered", id);
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        fn render(&self) {
            let cmds = build_scene(&self.state.snapshot(), &self.state.settings);
            self.renderer.draw(&cmds);
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.renderer.resize(width, height);
            self.state.set_screen_size(width as f32, height as f32);
        }
    }

    fn set_status(text: &str) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(el) = document.and_then(|d| d.get_element_by_id("slide-status")) {
            el.set_text_content(Some(text));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Slide Scroller starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        canvas.set_width(canvas.client_width().max(1) as u32);
        canvas.set_height(canvas.client_height().max(1) as u32);
        let slide_urls: Vec<String> = canvas
            .get_attribute("data-slides")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        // Optional JSON overrides on the canvas element
        let tuning = match canvas.get_attribute("data-tuning").map(|json| Tuning::from_json(&json)) {
            Some(Ok(tuning)) => tuning,
            Some(Err(e)) => {
                log::warn!("Ignoring invalid data-tuning: {}", e);
                Tuning::default()
            }
            None => Tuning::default(),
        };
        let settings = match canvas.get_attribute("data-settings").map(|json| Settings::from_json(&json)) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Ignoring invalid data-settings: {}", e);
                Settings::default()
            }
            None => Settings::default(),
        };

        let renderer = CanvasRenderer::new(canvas.clone()).expect("canvas 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, renderer, tuning, settings)));
        log::info!("Game initialized with seed: {}", seed);
        log::info!("Controls: A/D - Move, W - Jump, Space - Attack");

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(&canvas, game.clone());

        request_animation_frame(game.clone());

        if slide_urls.is_empty() {
            set_status("Using demo slides");
        } else {
            load_slides(game, slide_urls).await;
        }

        log::info!("Slide Scroller running!");
    }

    /// Decode every slide image, then swap the deck in. A page that fails to
    /// decode becomes a placeholder.
    async fn load_slides(game: Rc<RefCell<Game>>, urls: Vec<String>) {
        let mut loader = SlideLoader::new().on_progress(|progress, message| {
            set_status(&format!("Loading: {} ({:.0}%)", message, progress));
        });

        loader.begin();
        loader.parsing();
        let total = match loader.document_ready(urls.len()) {
            Ok(total) => total,
            Err(err) => {
                loader.fail(&err);
                set_status("Using demo slides");
                return;
            }
        };

        game.borrow_mut().renderer.clear_images();
        for (i, url) in urls.iter().take(total).enumerate() {
            let result = decode_image(url).await.map_err(|reason| SlideError::Decode {
                page: i + 1,
                reason,
            });
            let result = result.map(|img| game.borrow_mut().renderer.register_image(img));
            loader.record(result);
        }

        let deck = loader.finish();
        let count = deck.len();
        game.borrow_mut().state.load_slides(deck);
        set_status(&format!("Slides loaded: {}", count));
    }

    async fn decode_image(url: &str) -> Result<HtmlImageElement, String> {
        let img = HtmlImageElement::new().map_err(|e| format!("{:?}", e))?;
        img.set_src(url);
        JsFuture::from(img.decode())
            .await
            .map_err(|e| format!("{:?}", e))?;
        Ok(img)
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if game.borrow_mut().keys.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if game.borrow_mut().keys.key_up(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            // Wall-clock delta; the tick clamps it
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let w = canvas.client_width().max(1) as u32;
            let h = canvas.client_height().max(1) as u32;
            game.borrow_mut().resize(w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let visible = document_clone.visibility_state() == web_sys::VisibilityState::Visible;
                let mut g = game.borrow_mut();
                if !visible {
                    g.keys.release_all();
                }
                g.state.set_focus(visible);
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside); key-ups are lost while unfocused
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys.release_all();
                g.state.set_focus(false);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().state.set_focus(true);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Slide Scroller (native) starting...");
    log::info!("Native mode runs a headless walkthrough - build for wasm32 to play");

    run_headless(std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(1));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk right through every room, punching on a fixed rhythm
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(seed: u64) {
    use slide_scroller::sim::{GameEvent, GameState, TickInput, tick};

    const DT: f32 = 1.0 / 60.0;
    const MAX_TICKS: u64 = 60 * 120;

    let mut state = GameState::new(seed);
    state.set_on_death(|| log::warn!("Player died during the walkthrough"));
    let last_room = state.rooms.total() as u32;
    let mut defeated = 0;

    while state.time_ticks < MAX_TICKS && state.rooms.current_id() < last_room {
        let input = TickInput {
            right: true,
            attack: state.time_ticks % 20 < 10,
            jump: state.time_ticks % 90 < 5,
            ..Default::default()
        };
        tick(&mut state, &input, DT);

        for event in state.drain_events() {
            match event {
                GameEvent::EnemyDefeated { .. } => defeated += 1,
                GameEvent::RoomEntered { .. } => log::info!("{}", state.rooms.room_label()),
                _ => {}
            }
        }
    }

    log::info!(
        "Reached room {}/{} after {:.1}s, {} enemies defeated, health {}",
        state.rooms.current_id(),
        last_room,
        state.time,
        defeated,
        state.player.health
    );
}
