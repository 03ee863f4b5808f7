//! Pin Ring entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlCanvasElement, HtmlElement, HtmlInputElement, HtmlSelectElement,
        KeyboardEvent, MouseEvent, TouchEvent,
    };

    use pin_ring::audio::{AudioManager, SoundEffect};
    use pin_ring::persistence;
    use pin_ring::platform;
    use pin_ring::renderer::{RenderState, scene};
    use pin_ring::sim::{
        FrameClock, GameEvent, GamePhase, GameState, PowerUpKind, TickInput, advance_level,
        start_game, tick,
    };
    use pin_ring::tuning::ShieldPolicy;
    use pin_ring::{HighScores, PinColor, Settings, Theme, Tuning};

    type Shared = Rc<RefCell<Game>>;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        high_scores: HighScores,
        audio: AudioManager,
        render_state: Option<RenderState>,
        clock: FrameClock,
        /// Pending requestAnimationFrame handle
        frame_handle: Option<i32>,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, high_scores: HighScores) -> Self {
            let audio = AudioManager::new(&settings);
            let state =
                GameState::new(seed, Tuning::default()).with_high_score(high_scores.best());
            Self {
                state,
                settings,
                high_scores,
                audio,
                render_state: None,
                clock: FrameClock::new(),
                frame_handle: None,
                input: TickInput::default(),
            }
        }

        /// Advance one frame and hand the resulting events to collaborators
        fn step(&mut self, dt: f32) {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt);
            for event in self.state.drain_events() {
                self.handle_event(&event);
            }
        }

        fn handle_event(&mut self, event: &GameEvent) {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            platform::vibrate(event, self.settings.vibration);

            match event {
                GameEvent::LevelUp { next_level } => {
                    log::info!("Level {} cleared, {next_level} next", self.state.level);
                    persistence::save_session(&self.state);
                }
                GameEvent::GameOver { final_score } => {
                    if let Some(summary) = self.state.summary() {
                        if let Some(rank) = self.high_scores.record(&summary, js_sys::Date::now())
                        {
                            log::info!("Score {final_score} ranked #{rank}");
                            self.high_scores.save();
                        }
                    }
                    persistence::clear_session();
                }
                _ => {}
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = scene::build(&self.state, &self.settings);
            let clear = self.settings.theme.background();
            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&vertices, clear) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Throw away the current run and begin a fresh one
        fn new_run(&mut self, seed: u64) {
            self.state =
                GameState::new(seed, Tuning::default()).with_high_score(self.high_scores.best());
            start_game(&mut self.state);
            self.input = TickInput::default();
            persistence::clear_session();
            log::info!("Started new run with seed: {}", seed);
        }

        /// Adopt a stored run; a run saved between levels resumes at the next one
        fn resume(&mut self, mut state: GameState) {
            state.high_score = state.high_score.max(self.high_scores.best());
            self.state = state;
            if self.state.phase == GamePhase::LevelComplete {
                advance_level(&mut self.state);
            }
            self.input = TickInput::default();
            log::info!("Resumed run at level {}", self.state.level);
        }

        /// Queue a shot for the next frame
        fn queue_shot(&mut self) {
            self.audio.resume();
            if self.state.phase == GamePhase::Playing {
                self.input.shoot = true;
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn apply_theme(theme: Theme) {
        if let Some(body) = document().and_then(|d| d.body()) {
            let _ = body
                .class_list()
                .toggle_with_force("dark-theme", theme == Theme::Dark);
        }
    }

    // === Frame loop ===

    /// (Re)start the frame loop; earlier callbacks become stale
    fn start_loop(game: &Shared) {
        let token = game.borrow_mut().clock.start(now_ms());
        schedule_frame(game, token);
    }

    /// Stop the frame loop and cancel the pending callback
    fn stop_loop(game: &Shared) {
        let mut g = game.borrow_mut();
        g.clock.stop();
        if let (Some(handle), Some(window)) = (g.frame_handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
    }

    /// Bind the next frame, cancelling any callback still pending
    fn schedule_frame(game: &Shared, token: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut g = game.borrow_mut();
        if let Some(handle) = g.frame_handle.take() {
            let _ = window.cancel_animation_frame(handle);
        }

        let game_cb = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game_cb, token, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => g.frame_handle = Some(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Shared, token: u64, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            // Stale or duplicate callback: the live one does the work
            let Some(dt) = g.clock.frame(token, time) else {
                return;
            };
            g.frame_handle = None;

            g.step(dt);
            g.render();
            update_hud(&g);
            g.state.phase == GamePhase::Playing
        };

        // Level-up and game over end the loop until the player acts
        if keep_running {
            schedule_frame(&game, token);
        } else {
            stop_loop(&game);
        }
    }

    // === HUD ===

    fn effect_badges(state: &GameState) -> String {
        state
            .effects
            .iter()
            .map(|effect| {
                let icon = effect.kind.spec(&state.tuning).icon;
                let consumable = effect.kind == PowerUpKind::Shield
                    && state.tuning.shield_policy == ShieldPolicy::Consumable;
                if consumable {
                    icon.to_string()
                } else {
                    format!("{icon} {}s", (effect.remaining / 60.0).ceil() as u32)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// Update HUD elements and screens in the DOM
    fn update_hud(g: &Game) {
        let Some(document) = document() else {
            return;
        };
        let state = &g.state;

        set_text(&document, "hud-score", &state.score.to_string());
        set_text(&document, "hud-level", &state.level.to_string());
        set_text(&document, "hud-pins", &state.pins_remaining.to_string());
        set_text(&document, "hud-high", &state.high_score.to_string());
        set_text(&document, "hud-effects", &effect_badges(state));

        if let Some(bar) = document
            .get_element_by_id("level-progress")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let width = format!("{:.1}%", state.level_progress() * 100.0);
            let _ = bar.style().set_property("width", &width);
        }

        set_visible(&document, "hud", state.phase != GamePhase::Ready);
        set_visible(&document, "start-screen", state.phase == GamePhase::Ready);
        set_visible(
            &document,
            "level-complete",
            state.phase == GamePhase::LevelComplete,
        );
        if state.phase == GamePhase::LevelComplete {
            set_text(&document, "next-level", &(state.level + 1).to_string());
        }

        set_visible(&document, "game-over", state.phase == GamePhase::GameOver);
        if let Some(summary) = state.summary() {
            set_text(&document, "final-score", &summary.final_score.to_string());
            set_text(&document, "final-high", &state.high_score.to_string());
            set_text(&document, "final-pins", &summary.pins_placed.to_string());
            set_visible(&document, "new-high-score", summary.new_high_score);
        }
    }

    // === Wiring ===

    fn on_click(
        document: &Document,
        id: &str,
        game: &Shared,
        mut handler: impl FnMut(&Shared) + 'static,
    ) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing #{id}");
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler(&game));
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: &Shared) -> Result<(), JsValue> {
        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                game.borrow_mut().queue_shot();
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().queue_shot();
            });
            canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if platform::is_shoot_key(&event.code()) {
                    event.prevent_default();
                    game.borrow_mut().queue_shot();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(document: &Document, game: &Shared) {
        on_click(document, "start-btn", game, |game| {
            game.borrow_mut().new_run(js_sys::Date::now() as u64);
            start_loop(game);
        });

        on_click(document, "continue-btn", game, |game| {
            match persistence::load_session() {
                Some(saved) => game.borrow_mut().resume(saved),
                None => game.borrow_mut().new_run(js_sys::Date::now() as u64),
            }
            set_visible_by_id("continue-btn", false);
            start_loop(game);
        });

        on_click(document, "next-level-btn", game, |game| {
            if advance_level(&mut game.borrow_mut().state) {
                start_loop(game);
            }
        });

        on_click(document, "restart-btn", game, |game| {
            game.borrow_mut().new_run(js_sys::Date::now() as u64);
            start_loop(game);
        });

        on_click(document, "menu-btn", game, |game| {
            stop_loop(game);
            {
                let mut g = game.borrow_mut();
                let best = g.high_scores.best();
                g.state = GameState::new(js_sys::Date::now() as u64, Tuning::default())
                    .with_high_score(best);
                g.render();
                update_hud(&g);
            }
            set_visible_by_id("continue-btn", persistence::load_session().is_some());
        });
    }

    fn set_visible_by_id(id: &str, visible: bool) {
        if let Some(document) = document() {
            set_visible(&document, id, visible);
        }
    }

    fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn select_by_id(document: &Document, id: &str) -> Option<HtmlSelectElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Bind settings controls, seeding them from the loaded settings
    fn setup_settings(document: &Document, game: &Shared) {
        let settings = game.borrow().settings.clone();
        apply_theme(settings.theme);

        for (id, checked) in [
            ("sound-toggle", settings.sound),
            ("vibration-toggle", settings.vibration),
        ] {
            let Some(input) = input_by_id(document, id) else {
                continue;
            };
            input.set_checked(checked);
            let game = game.clone();
            let target = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if target.id() == "sound-toggle" {
                    g.settings.sound = target.checked();
                } else {
                    g.settings.vibration = target.checked();
                }
                let settings = g.settings.clone();
                g.audio.apply_settings(&settings);
                settings.save();
            });
            let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(select) = select_by_id(document, "theme-select") {
            select.set_value(settings.theme.as_str());
            let game = game.clone();
            let target = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(theme) = Theme::from_str(&target.value()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                g.settings.theme = theme;
                apply_theme(theme);
                g.settings.save();
                g.render();
            });
            let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(select) = select_by_id(document, "pin-color-select") {
            select.set_value(settings.pin_color.as_str());
            let game = game.clone();
            let target = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(color) = PinColor::from_str(&target.value()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                g.settings.pin_color = color;
                g.settings.save();
                g.render();
            });
            let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        log::info!("Pin Ring starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game: Shared = Rc::new(RefCell::new(Game::new(
            seed,
            Settings::load(),
            HighScores::load(),
        )));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let arena_size = game.borrow().state.tuning.arena_size;
        let render_state = RenderState::new(surface, &adapter, width, height, arena_size)
            .await
            .map_err(|e| JsValue::from_str(&format!("device: {e}")))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, &game)?;
        setup_buttons(&document, &game);
        setup_settings(&document, &game);

        // Offer to continue a stored run
        if let Some(saved) = persistence::load_session() {
            set_visible(&document, "continue-btn", true);
            set_text(&document, "continue-level", &saved.level.to_string());
            set_text(&document, "continue-score", &saved.score.to_string());
            log::info!("Found saved run at level {}", saved.level);
        } else {
            set_visible(&document, "continue-btn", false);
        }

        {
            let mut g = game.borrow_mut();
            g.render();
            update_hud(&g);
        }

        log::info!("Pin Ring ready (seed {seed})");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pin Ring (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let summary = demo::autoplay(seed, 20_000);
    println!(
        "Seed {seed}: level {}, score {}, {} pins placed{}",
        summary.level,
        summary.final_score,
        summary.pins_placed,
        if summary.new_high_score {
            " (new high score)"
        } else {
            ""
        }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted player for the native build
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use pin_ring::normalize_angle;
    use pin_ring::sim::{
        GamePhase, GameState, RunSummary, TickInput, advance_level, is_safe, start_game, tick,
    };
    use pin_ring::{HighScores, Tuning};

    /// Ring-relative angle the loaded pin would land on if fired now
    fn predicted_landing(state: &GameState) -> f32 {
        let tuning = &state.tuning;
        let travel = tuning.ring_radius() - tuning.projectile_spawn_offset();
        let frames = travel / tuning.pin_fly_speed;
        let speed_factor = state.effects.speed_factor(tuning);
        let mut ring = state.ring.clone();
        ring.angle = normalize_angle(
            ring.angle + ring.angular_speed * ring.spin.sign() * speed_factor * frames,
        );
        ring.landing_angle()
    }

    /// Play until game over or the frame limit, firing only into clear gaps
    pub fn autoplay(seed: u64, max_frames: u32) -> RunSummary {
        let mut high_scores = HighScores::new();
        let mut state = GameState::new(seed, Tuning::default()).with_high_score(high_scores.best());
        start_game(&mut state);

        for _ in 0..max_frames {
            match state.phase {
                GamePhase::LevelComplete => {
                    advance_level(&mut state);
                    log::info!("Reached level {}", state.level);
                }
                GamePhase::GameOver => break,
                _ => {}
            }

            let landing = predicted_landing(&state);
            let pins = state.pins.iter().map(|p| p.angle);
            let shoot = is_safe(landing, pins, state.tuning.collision_threshold * 1.5);
            tick(&mut state, &TickInput { shoot }, 1.0);
            for event in state.drain_events() {
                log::debug!("{event:?}");
            }
        }

        let summary = state.summary().unwrap_or(RunSummary {
            final_score: state.score,
            level: state.level,
            pins_placed: state.pins_placed,
            new_high_score: false,
        });
        if let Some(rank) = high_scores.record(&summary, 0.0) {
            log::info!("Run ranked #{rank}");
        }
        summary
    }
}
