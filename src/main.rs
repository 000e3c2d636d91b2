//! Side Runner entry point
//!
//! In the browser this wires DOM input, timers, audio and the WebGPU renderer
//! around the simulation. Natively it runs a headless autopilot demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use side_runner::audio::{AudioManager, SoundEffect};
    use side_runner::controls::{KeyAction, TapAction, key_action, tap_action};
    use side_runner::consts::*;
    use side_runner::highscores::HighScoreEntry;
    use side_runner::platform::{KeyValueStore, LocalStorage, MemoryStore, time};
    use side_runner::renderer::{RenderInitError, RenderState, build_scene};
    use side_runner::sim::{
        FeedbackLayer, GameEvent, GamePhase, SimConfig, SimulationState, TickInput, tick,
    };
    use side_runner::settings::VOLUME_STEP;
    use side_runner::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        config: SimConfig,
        state: SimulationState,
        rng: Pcg32,
        feedback: FeedbackLayer,
        render_state: Option<RenderState>,
        /// Inputs buffered since the last tick
        input: TickInput,
        idle_mode: bool,
        high_scores: HighScores,
        settings: Settings,
        store: Box<dyn KeyValueStore>,
        audio: AudioManager,
        /// Pending requestAnimationFrame handle while a run is live
        frame_request: Option<i32>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, store: Box<dyn KeyValueStore>) -> Self {
            let config = SimConfig::default();
            let settings = Settings::load(&*store);
            let high_scores = HighScores::load(&*store);
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);

            Self {
                state: SimulationState::new(seed, &config),
                config,
                rng: Pcg32::seed_from_u64(seed),
                feedback: FeedbackLayer::new(),
                render_state: None,
                input: TickInput::default(),
                idle_mode: false,
                high_scores,
                settings,
                store,
                audio,
                frame_request: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Reset the world and enter `Playing`
        fn start_run(&mut self) {
            let seed = time::now_millis();
            self.rng = Pcg32::seed_from_u64(seed);
            self.state.start(seed, &self.config);
            self.feedback.clear();
            self.input = TickInput::default();

            // A start is always a user gesture, so the browser lets music play
            if self.settings.music_enabled {
                self.audio.start_music();
            }

            show_screen(GamePhase::Playing);
        }

        /// Leave the current run (or game over screen) for the menu
        fn return_to_menu(&mut self) {
            self.cancel_frame();
            self.state.return_to_menu();
            self.feedback.clear();
            self.refresh_score_lists();
            show_screen(GamePhase::Menu);
            self.render();
        }

        fn cancel_frame(&mut self) {
            let Some(id) = self.frame_request.take() else {
                return;
            };
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }

        /// Run one simulation tick; returns whether the run continues
        fn step(&mut self, time: f64) -> bool {
            self.track_fps(time);

            let mut input = std::mem::take(&mut self.input);
            input.idle_mode = self.idle_mode;

            let outcome = tick(&self.state, &input, &self.config, &mut self.rng);
            self.state = outcome.state;

            for event in outcome.events {
                match event {
                    GameEvent::Jumped => self.audio.play(SoundEffect::Jump),
                    GameEvent::DoubleJumped => self.audio.play(SoundEffect::DoubleJump),
                    GameEvent::Collected(collected) => {
                        self.feedback.spawn(&collected);
                        self.audio.play(SoundEffect::Collect);
                    }
                    GameEvent::Crashed { score } => self.finish_run(score),
                }
            }

            self.state.is_playing()
        }

        fn finish_run(&mut self, score: u64) {
            // Checked against the board as it stood before this run
            let new_record = self.high_scores.is_new_record(score);
            let rank = self
                .high_scores
                .add_score(score, time::today_string());
            if rank.is_some() {
                self.high_scores.save(&mut *self.store);
            }

            self.audio.play(SoundEffect::Crash);
            if new_record {
                self.audio.play(SoundEffect::NewRecord);
            }
            log::info!(
                "Game over: score {} (rank {:?}, new record: {})",
                score,
                rank,
                new_record
            );

            if let Some(document) = document() {
                set_text(&document, "final-score", &score.to_string());
                set_visible(&document, "new-record", new_record);
            }
            self.refresh_score_lists();
            show_screen(GamePhase::GameOver);
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();

            // Oldest sample is the one about to be overwritten
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59_000.0 / elapsed).round() as u32;
                }
            }
        }

        fn toggle_music(&mut self) {
            let enabled = self.settings.toggle_music();
            self.settings_changed();
            if enabled {
                self.audio.start_music();
            } else {
                self.audio.stop_music();
            }
        }

        fn toggle_sfx(&mut self) {
            let enabled = self.settings.toggle_sfx();
            log::info!("Sound effects {}", if enabled { "on" } else { "off" });
            self.settings_changed();
        }

        fn toggle_fps(&mut self) {
            self.settings.toggle_show_fps();
            self.settings_changed();
            self.update_hud();
        }

        fn toggle_reduced_motion(&mut self) {
            let enabled = self.settings.toggle_reduced_motion();
            log::info!("Reduced motion: {}", enabled);
            self.settings_changed();
            if !self.state.is_playing() {
                self.render();
            }
        }

        fn adjust_volume(&mut self, delta: f32) {
            let volume = self.settings.adjust_master_volume(delta);
            log::info!("Master volume: {:.0}%", volume * 100.0);
            self.settings_changed();
        }

        /// Persist settings and push them to audio and the option buttons
        fn settings_changed(&mut self) {
            self.settings.save(&mut *self.store);
            self.audio.apply_settings(&self.settings);
            self.update_option_buttons();
        }

        fn toggle_idle(&mut self) {
            self.idle_mode = !self.idle_mode;
            log::info!("Idle mode: {}", self.idle_mode);
        }

        fn reset_scores(&mut self) {
            self.high_scores.reset(&mut *self.store);
            log::info!("High scores cleared");
            self.refresh_score_lists();
            self.update_hud();
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(
                &self.state,
                self.feedback.markers(),
                &self.config,
                &self.settings,
            );
            match render_state.render(&vertices) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else { return };

            set_text(&document, "hud-score", &self.state.score.to_string());
            let best = self.high_scores.top_score().unwrap_or(0).max(self.state.score);
            set_text(&document, "hud-best", &best.to_string());

            set_visible(&document, "hud-fps-item", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(&document, "hud-fps", &self.fps.to_string());
            }
            set_visible(&document, "hud-idle", self.idle_mode);
        }

        fn update_option_buttons(&self) {
            let Some(document) = document() else { return };
            let on_off = |on: bool| if on { "On" } else { "Off" };
            let s = &self.settings;
            set_text(&document, "music-btn", &format!("Music: {}", on_off(s.music_enabled)));
            set_text(&document, "sfx-btn", &format!("Sound: {}", on_off(s.sfx_enabled)));
            set_text(&document, "fps-btn", &format!("FPS: {}", on_off(s.show_fps)));
            set_text(
                &document,
                "motion-btn",
                &format!("Reduced motion: {}", on_off(s.reduced_motion)),
            );
            set_text(
                &document,
                "volume-value",
                &format!("{:.0}%", s.master_volume * 100.0),
            );
        }

        fn refresh_score_lists(&self) {
            let Some(document) = document() else { return };
            for id in ["menu-scores", "gameover-scores"] {
                fill_score_list(&document, id, self.high_scores.entries());
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn fill_score_list(document: &Document, id: &str, entries: &[HighScoreEntry]) {
        let Some(list) = document.get_element_by_id(id) else {
            return;
        };
        list.set_inner_html("");

        if entries.is_empty() {
            if let Ok(item) = document.create_element("li") {
                item.set_text_content(Some("No scores yet"));
                let _ = item.set_attribute("class", "empty");
                let _ = list.append_child(&item);
            }
            return;
        }

        for entry in entries {
            if let Ok(item) = document.create_element("li") {
                item.set_text_content(Some(&format!("{} - {}", entry.score, entry.date)));
                let _ = list.append_child(&item);
            }
        }
    }

    /// Show the panels belonging to a phase
    fn show_screen(phase: GamePhase) {
        let Some(document) = document() else { return };
        set_visible(&document, "menu", phase == GamePhase::Menu);
        set_visible(&document, "game-over", phase == GamePhase::GameOver);
        set_visible(&document, "hud", phase != GamePhase::Menu);
    }

    /// Start a run unless one is already live
    fn start_game(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.state.is_playing() {
                return;
            }
            g.cancel_frame();
            g.start_run();
        }
        request_frame(game);
    }

    fn on_canvas_tap(game: &Rc<RefCell<Game>>) {
        let action = tap_action(game.borrow().state.phase);
        match action {
            TapAction::Jump => game.borrow_mut().input.jump = true,
            TapAction::Start => start_game(game),
            TapAction::Ignore => {}
        }
    }

    fn on_key(game: &Rc<RefCell<Game>>, action: KeyAction) {
        match action {
            KeyAction::Jump => {
                let mut g = game.borrow_mut();
                if g.state.is_playing() {
                    g.input.jump = true;
                }
            }
            KeyAction::FastDescend => {
                let mut g = game.borrow_mut();
                if g.state.is_playing() {
                    g.input.fast_descend = true;
                }
            }
            KeyAction::Start => start_game(game),
            KeyAction::Menu => {
                let mut g = game.borrow_mut();
                if g.state.phase != GamePhase::Menu {
                    g.return_to_menu();
                }
            }
            KeyAction::ToggleMusic => game.borrow_mut().toggle_music(),
            KeyAction::ToggleSfx => game.borrow_mut().toggle_sfx(),
            KeyAction::ToggleFps => game.borrow_mut().toggle_fps(),
            KeyAction::ToggleReducedMotion => game.borrow_mut().toggle_reduced_motion(),
            KeyAction::ToggleIdle => game.borrow_mut().toggle_idle(),
            KeyAction::VolumeUp => game.borrow_mut().adjust_volume(VOLUME_STEP),
            KeyAction::VolumeDown => game.borrow_mut().adjust_volume(-VOLUME_STEP),
        }
    }

    fn request_frame(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let g = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(g, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().frame_request = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    /// One tick per animation frame; stops scheduling once the run ends
    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let playing = {
            let mut g = game.borrow_mut();
            g.frame_request = None;
            if !g.state.is_playing() {
                return;
            }
            let playing = g.step(time);
            g.render();
            g.update_hud();
            playing
        };

        if playing {
            request_frame(&game);
        }
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        world: Vec2,
    ) -> Result<RenderState, RenderInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, world).await
    }

    fn canvas_pixel_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Side Runner starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        set_visible(&document, "loading", false);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let (width, height) = canvas_pixel_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; scores will not persist", e);
                Box::new(MemoryStore::new())
            }
        };

        let seed = time::now_millis();
        let game = Rc::new(RefCell::new(Game::new(seed, store)));
        log::info!("Game initialized with seed: {}", seed);

        let world = {
            let g = game.borrow();
            Vec2::new(g.config.canvas_width, g.config.canvas_height)
        };
        match init_renderer(&canvas, width, height, world).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Renderer unavailable: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas, game.clone());
        setup_feedback_decay(game.clone());
        schedule_autoplay(game.clone());

        {
            let mut g = game.borrow_mut();
            g.refresh_score_lists();
            g.update_option_buttons();
            g.update_hud();
            g.render();
        }
        show_screen(GamePhase::Menu);

        log::info!("Side Runner running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Tap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                on_canvas_tap(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                on_canvas_tap(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(action) = key_action(&event.key(), event.repeat()) else {
                    return;
                };
                if action.blocks_default() {
                    event.prevent_default();
                }
                on_key(&game, action);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{} button", id);
            return;
        };
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        for id in ["start-btn", "restart-btn"] {
            let game = game.clone();
            on_click(&document, id, move |_| start_game(&game));
        }
        {
            let game = game.clone();
            on_click(&document, "menu-btn", move |_| game.borrow_mut().return_to_menu());
        }
        let options: [(&str, KeyAction); 6] = [
            ("music-btn", KeyAction::ToggleMusic),
            ("sfx-btn", KeyAction::ToggleSfx),
            ("fps-btn", KeyAction::ToggleFps),
            ("motion-btn", KeyAction::ToggleReducedMotion),
            ("volume-up-btn", KeyAction::VolumeUp),
            ("volume-down-btn", KeyAction::VolumeDown),
        ];
        for (id, action) in options {
            let game = game.clone();
            on_click(&document, id, move |_| on_key(&game, action));
        }
        on_click(&document, "reset-scores-btn", move |_| {
            game.borrow_mut().reset_scores()
        });
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (width, height) = canvas_pixel_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
            if !g.state.is_playing() {
                g.render();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Fade score markers on their own clock, independent of ticks
    fn setup_feedback_decay(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = game.borrow_mut();
            if g.feedback.is_empty() {
                return;
            }
            g.feedback.decay();
            // No frames are running outside a run
            if !g.state.is_playing() {
                g.render();
            }
        });
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            FEEDBACK_DECAY_INTERVAL_MS,
        ) {
            log::warn!("Feedback timer unavailable: {:?}", e);
        }
        closure.forget();
    }

    /// One deferred attempt to start music without a user gesture
    fn schedule_autoplay(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move || {
            let resume = {
                let g = game.borrow();
                if !g.settings.music_enabled || g.audio.is_music_playing() {
                    return;
                }
                g.audio.resume()
            };
            let Some(resume) = resume else { return };

            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = resume.await {
                    log::info!("Music autoplay blocked: {:?}", e);
                    return;
                }
                let mut g = game.borrow_mut();
                if g.audio.is_running() {
                    g.audio.start_music();
                } else {
                    log::info!("Music autoplay blocked until user interaction");
                }
            });
        });
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            AUTOPLAY_DELAY_MS,
        ) {
            log::warn!("Autoplay timer unavailable: {:?}", e);
        }
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Side Runner (native) starting...");
    log::info!("The playable build is web only - run with `trunk serve`");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(side_runner::platform::time::now_millis);
    headless::run_demo(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot run without a window, for exercising the simulation natively
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use side_runner::HighScores;
    use side_runner::platform::{MemoryStore, time};
    use side_runner::sim::{GameEvent, SimConfig, SimulationState, TickInput, tick};

    /// Two minutes at 60 ticks per second
    const MAX_DEMO_TICKS: u64 = 60 * 120;

    pub fn run_demo(seed: u64) {
        let config = SimConfig::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut state = SimulationState::new(seed, &config);
        state.start(seed, &config);

        let mut jumps = 0u32;
        let mut collected = 0u32;
        let input = TickInput {
            idle_mode: true,
            ..TickInput::default()
        };

        let mut final_score = None;
        for _ in 0..MAX_DEMO_TICKS {
            let outcome = tick(&state, &input, &config, &mut rng);
            for event in &outcome.events {
                match event {
                    GameEvent::Jumped | GameEvent::DoubleJumped => jumps += 1,
                    GameEvent::Collected(_) => collected += 1,
                    GameEvent::Crashed { score } => final_score = Some(*score),
                }
            }
            state = outcome.state;
            if final_score.is_some() {
                break;
            }
        }

        let score = final_score.unwrap_or(state.score);
        match final_score {
            Some(_) => log::info!("Autopilot crashed after {} ticks", state.time_ticks),
            None => log::info!("Autopilot survived {} ticks", state.time_ticks),
        }
        log::info!(
            "Seed {}: score {}, {} jumps, {} collectibles",
            seed,
            score,
            jumps,
            collected
        );

        let mut store = MemoryStore::new();
        let mut scores = HighScores::load(&store);
        if let Some(rank) = scores.add_score(score, time::today_string()) {
            scores.save(&mut store);
            log::info!("Recorded at rank {}", rank);
        }
    }

}
