//! Flappy PWA entry point
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
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use flappy_pwa::persistence::LocalStorageStore;
    use flappy_pwa::platform::input::is_flap_key;
    use flappy_pwa::platform::{HostCommand, InputEvent, UiAction, canvas_size, map_event};
    use flappy_pwa::renderer::{FrameSink, NullSink, SdfRenderState};
    use flappy_pwa::sim::{GamePhase, TickOutcome, Transition, Trigger, autopilot};
    use flappy_pwa::{Game, Settings, Tuning};

    const SERVICE_WORKER_URL: &str = "./sw.js";

    /// Host state shared by every browser callback
    struct Host {
        game: Game<LocalStorageStore>,
        render_state: Option<SdfRenderState>,
        canvas: HtmlCanvasElement,
        settings: Settings,
        /// A frame callback is pending
        scheduled: bool,
        /// Demo mode: the autopilot flaps
        autopilot: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Host {
        fn new(game: Game<LocalStorageStore>, canvas: HtmlCanvasElement, settings: Settings) -> Self {
            Self {
                game,
                render_state: None,
                canvas,
                settings,
                scheduled: false,
                autopilot: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Match the backing store to the canvas' CSS size
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = canvas_size(
                self.canvas.client_width() as f64,
                self.canvas.client_height() as f64,
                window.device_pixel_ratio(),
                self.settings.quality.max_dpr(),
            );
            if self.canvas.width() != width || self.canvas.height() != height {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                if let Some(ref mut render_state) = self.render_state {
                    render_state.resize(width, height);
                }
                log::debug!("Canvas resized to {}x{}", width, height);
            }
        }

        /// Apply a browser event; returns true if a frame must be scheduled
        fn handle(&mut self, event: InputEvent<'_>) -> bool {
            let Some(trigger) = map_event(event, self.game.phase()) else {
                return false;
            };
            let transition = self.game.trigger(trigger);
            match transition {
                Transition::Ignored => {
                    log::debug!("{:?} ignored in {:?}", trigger, self.game.phase());
                    return false;
                }
                Transition::Paused => {
                    if let InputEvent::Hidden | InputEvent::Blur = event {
                        log::info!("Auto-paused ({:?})", event);
                    }
                    self.redraw();
                }
                _ => {}
            }
            self.update_hud();

            if transition.resumes_play() && !self.scheduled {
                self.scheduled = true;
                return true;
            }
            false
        }

        /// Keys the host answers itself
        fn command(&mut self, command: HostCommand) {
            match command {
                HostCommand::ToggleAutopilot => {
                    self.autopilot = !self.autopilot;
                    log::info!("Autopilot: {}", self.autopilot);
                    return;
                }
                HostCommand::ToggleFps => {
                    self.settings.show_fps = !self.settings.show_fps;
                }
                HostCommand::ToggleReducedMotion => {
                    self.settings.reduced_motion = !self.settings.reduced_motion;
                    log::info!("Reduced motion: {}", self.settings.reduced_motion);
                }
                HostCommand::CycleQuality => {
                    self.settings.cycle_quality();
                    log::info!("Quality: {}", self.settings.quality.as_str());
                    self.fit_canvas();
                }
            }

            self.settings.save();
            if let Some(ref mut render_state) = self.render_state {
                render_state.set_settings(self.settings.clone());
            }
            self.update_hud();
            if !self.scheduled {
                self.redraw();
            }
        }

        /// Draw the current state without advancing it
        fn redraw(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                if let Err(e) = render_state.present(&self.game.snapshot()) {
                    log::warn!("Redraw skipped: {}", e);
                }
            }
        }

        /// One tick and one draw
        fn frame(&mut self, time: f64) {
            self.track_fps(time);

            if self.autopilot && autopilot::wants_flap(self.game.state()) {
                self.game.trigger(Trigger::Flap);
            }

            let outcome = match self.render_state {
                Some(ref mut render_state) => {
                    render_state.set_time(time);
                    self.game.frame(render_state)
                }
                None => self.game.frame(&mut NullSink),
            };

            if let TickOutcome::Ended { score, cause } = outcome {
                log::info!("Game over: score {} ({:?})", score, cause);
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest sample sits at the next write position
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.game.phase();
            let score = self.game.state().score;

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("high") {
                el.set_text_content(Some(&format!("Best: {}", self.game.best())));
            }

            // Overlays
            if let Some(el) = document.get_element_by_id("menu") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", phase != GamePhase::Idle);
            }
            if let Some(el) = document.get_element_by_id("gameOver") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", phase != GamePhase::Ended);
            }
            if phase == GamePhase::Ended {
                if let Some(el) = document.get_element_by_id("finalScore") {
                    el.set_text_content(Some(&format!("Score: {}", score)));
                }
            }

            if let Some(el) = document.get_element_by_id("fps") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", !self.settings.show_fps);
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy PWA starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        let tuning = Tuning::load();

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, tuning, LocalStorageStore::new());
        log::info!("Game initialized with seed: {}, best {}", seed, game.best());

        let host = Rc::new(RefCell::new(Host::new(game, canvas.clone(), settings.clone())));
        host.borrow_mut().fit_canvas();

        // Initialize WebGPU; without it the game still runs, HUD only
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let render_state = SdfRenderState::new(
                            surface,
                            &adapter,
                            canvas.width(),
                            canvas.height(),
                            settings,
                        )
                        .await;
                        match render_state {
                            Ok(mut render_state) => {
                                render_state.set_start_time(js_sys::Date::now());
                                host.borrow_mut().render_state = Some(render_state);
                            }
                            Err(e) => log::error!("Renderer init failed: {}", e),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        register_service_worker(&window);

        setup_input_handlers(&canvas, host.clone());
        setup_buttons(host.clone());
        setup_auto_pause(host.clone());
        setup_resize(host.clone());

        // First paint: menu over the idle scene
        {
            let mut h = host.borrow_mut();
            h.redraw();
            h.update_hud();
        }

        log::info!("Flappy PWA running!");
    }

    /// Install the offline worker; the game runs fine without it
    fn register_service_worker(window: &web_sys::Window) {
        let navigator = window.navigator();
        if !js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
            log::warn!("Service workers unavailable, offline play disabled");
            return;
        }

        let options = web_sys::RegistrationOptions::new();
        // sw.js imports the wasm-bindgen module
        let _ = js_sys::Reflect::set(
            &options,
            &JsValue::from_str("type"),
            &JsValue::from_str("module"),
        );
        let promise = navigator
            .service_worker()
            .register_with_options(SERVICE_WORKER_URL, &options);
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(registration) => {
                    let registration: web_sys::ServiceWorkerRegistration = registration.unchecked_into();
                    log::info!("Service worker registered for {}", registration.scope());
                }
                Err(e) => log::warn!("Service worker registration failed: {:?}", e),
            }
        });
    }

    /// Route an event to the game and schedule a frame if it resumed play
    fn dispatch(host: &Rc<RefCell<Host>>, event: InputEvent<'_>) {
        let schedule = host.borrow_mut().handle(event);
        if schedule {
            request_animation_frame(host.clone());
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Pointer down on the playfield
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                dispatch(&host, InputEvent::PointerDown);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if let Some(command) = HostCommand::from_key(&code) {
                    host.borrow_mut().command(command);
                    return;
                }
                if is_flap_key(&code) {
                    // Keep the page from scrolling
                    event.prevent_default();
                }
                dispatch(&host, InputEvent::Key(&code));
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(host: Rc<RefCell<Host>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for action in UiAction::ALL {
            let Some(btn) = document.get_element_by_id(action.element_id()) else {
                log::warn!("Missing button #{}", action.element_id());
                continue;
            };
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                dispatch(&host, InputEvent::Button(action));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let host = host.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    dispatch(&host, InputEvent::Hidden);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                dispatch(&host, InputEvent::Blur);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut h = host.borrow_mut();
            h.fit_canvas();
            // A running game redraws on its next frame anyway
            if !h.scheduled {
                h.redraw();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        let schedule = {
            let mut h = host.borrow_mut();
            h.scheduled = false;

            // Paused or ended while this callback was pending
            if !h.game.wants_frames() {
                return;
            }

            h.frame(time);
            h.update_hud();

            if h.game.wants_frames() {
                h.scheduled = true;
            }
            h.scheduled
        };

        if schedule {
            request_animation_frame(host);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    //! Headless autopilot run for native builds

    use std::time::{SystemTime, UNIX_EPOCH};

    use flappy_pwa::persistence::FileStore;
    use flappy_pwa::renderer::NullSink;
    use flappy_pwa::sim::{TickOutcome, Trigger, autopilot};
    use flappy_pwa::{Game, Tuning};

    const SESSIONS: u32 = 3;
    /// Per-session tick cap; a perfect autopilot would otherwise never stop
    const MAX_TICKS: u32 = 20_000;
    const BEST_FILE: &str = "flappy_best.json";

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run() {
        let seed = std::env::args()
            .nth(1)
            .and_then(|arg| arg.parse().ok())
            .unwrap_or_else(clock_seed);

        let store = FileStore::new(BEST_FILE);
        log::info!("Best score file: {}", store.path().display());
        let mut game = Game::new(seed, Tuning::load(), store);
        log::info!("Seed {}, stored best {}", seed, game.best());

        game.trigger(Trigger::Start);
        for session in 1..=SESSIONS {
            let mut ticks = 0;
            let mut ended = None;
            while game.wants_frames() && ticks < MAX_TICKS {
                if autopilot::wants_flap(game.state()) {
                    game.trigger(Trigger::Flap);
                }
                if let TickOutcome::Ended { score, cause } = game.frame(&mut NullSink) {
                    ended = Some((score, cause));
                }
                ticks += 1;
            }

            match ended {
                Some((score, cause)) => {
                    println!("Session {session}: score {score} ({cause:?}) after {ticks} ticks");
                }
                None => {
                    println!(
                        "Session {session}: still flying after {ticks} ticks, score {}",
                        game.state().score
                    );
                    break;
                }
            }

            if session < SESSIONS {
                game.trigger(Trigger::Reset);
            }
        }

        println!("Best: {}", game.best());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if web_sys::window().is_none() {
        // Loaded by the service worker, which only calls the sw_* exports
        let _ = console_log::init_with_level(log::Level::Info);
        return;
    }
    wasm_game::run().await;
}

/// Service worker `install` handler
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn sw_install() -> Result<JsValue, JsValue> {
    flappy_pwa::offline::web::install().await
}

/// Service worker `activate` handler
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn sw_activate() -> Result<JsValue, JsValue> {
    flappy_pwa::offline::web::activate().await
}

/// Service worker `fetch` handler
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn sw_fetch(request: web_sys::Request) -> Result<web_sys::Response, JsValue> {
    flappy_pwa::offline::web::respond(request).await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy PWA (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 to play");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
