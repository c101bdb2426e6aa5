//! Bamboo Slice entry point
//!
//! Handles platform-specific initialization and wires the page controls to
//! the game.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, Event, EventTarget, HtmlButtonElement, HtmlCanvasElement,
        HtmlElement, HtmlInputElement, HtmlSelectElement, MouseEvent, TouchEvent, Window,
    };

    use bamboo_slice::audio::WebAudio;
    use bamboo_slice::highscores::default_store;
    use bamboo_slice::input::to_field;
    use bamboo_slice::renderer::{GpuRenderer, RenderState};
    use bamboo_slice::sim::FieldSize;
    use bamboo_slice::{Difficulty, Game, HudSnapshot, Mode, Services, Settings, TaskHandle, TaskHost};

    /// Everything the browser callbacks share
    struct App {
        game: Game,
        host: WebTaskHost,
        dom: Dom,
    }

    /// `setInterval` / `requestAnimationFrame` backed task host.
    ///
    /// Interval ids and animation frame ids live in separate numbering
    /// spaces, so tasks get their own handles mapped to the browser ids.
    struct WebTaskHost {
        window: Window,
        app: Weak<RefCell<App>>,
        next: i32,
        /// Interval id plus the closure it calls; dropped on cancel
        timers: HashMap<TaskHandle, (i32, Closure<dyn FnMut()>)>,
        /// Animation frame id plus its callback; dropped on cancel
        frames: HashMap<TaskHandle, (i32, Closure<dyn FnMut(f64)>)>,
        /// Callback of the frame currently running, kept alive until the next
        /// one fires
        finished_frame: Option<Closure<dyn FnMut(f64)>>,
    }

    impl WebTaskHost {
        fn new(window: Window, app: Weak<RefCell<App>>) -> Self {
            Self {
                window,
                app,
                next: 0,
                timers: HashMap::new(),
                frames: HashMap::new(),
                finished_frame: None,
            }
        }

        fn next_handle(&mut self) -> TaskHandle {
            self.next += 1;
            TaskHandle(self.next)
        }
    }

    impl TaskHost for WebTaskHost {
        fn start_spawn_timer(&mut self, interval_ms: u32) -> TaskHandle {
            let handle = self.next_handle();
            let app = self.app.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                if let Some(app) = app.upgrade() {
                    app.borrow_mut().game.on_spawn_timer();
                }
            });
            match self
                .window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    interval_ms as i32,
                ) {
                Ok(id) => {
                    self.timers.insert(handle, (id, closure));
                }
                Err(e) => log::error!("setInterval failed: {:?}", e),
            }
            handle
        }

        fn request_frame(&mut self) -> TaskHandle {
            let handle = self.next_handle();
            let app = self.app.clone();
            let callback = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                let Some(app) = app.upgrade() else { return };
                let mut app = app.borrow_mut();
                let App { game, host, dom } = &mut *app;
                // This closure is still executing, so park it instead of dropping it
                host.finished_frame = host.frames.remove(&handle).map(|(_, closure)| closure);
                if game.on_frame(host) {
                    dom.update_hud(&game.hud());
                }
            });
            match self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
            {
                Ok(id) => {
                    self.frames.insert(handle, (id, callback));
                }
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
            handle
        }

        fn cancel(&mut self, handle: TaskHandle) {
            if let Some((id, _closure)) = self.timers.remove(&handle) {
                self.window.clear_interval_with_handle(id);
            }
            if let Some((id, _closure)) = self.frames.remove(&handle) {
                let _ = self.window.cancel_animation_frame(id);
            }
        }
    }

    /// Page elements the game writes to
    struct Dom {
        cut_count: Option<Element>,
        combo_count: Option<Element>,
        high_score: Option<Element>,
        start_btn: Option<HtmlButtonElement>,
        pause_btn: Option<HtmlButtonElement>,
        zen_btn: Option<Element>,
        difficulty_select: Option<HtmlSelectElement>,
        body: Option<HtmlElement>,
    }

    impl Dom {
        fn new(document: &Document) -> Self {
            let button = |id: &str| {
                document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            };
            Self {
                cut_count: document.get_element_by_id("cutCount"),
                combo_count: document.get_element_by_id("comboCount"),
                high_score: document.get_element_by_id("highScore"),
                start_btn: button("startBtn"),
                pause_btn: button("pauseBtn"),
                zen_btn: document.get_element_by_id("zenModeBtn"),
                difficulty_select: document
                    .get_element_by_id("difficultySelect")
                    .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok()),
                body: document.body(),
            }
        }

        fn update_hud(&self, hud: &HudSnapshot) {
            let set = |el: &Option<Element>, value: String| {
                if let Some(el) = el {
                    el.set_text_content(Some(&value));
                }
            };
            set(&self.cut_count, hud.cut_count.to_string());
            set(&self.combo_count, hud.combo.to_string());
            set(&self.high_score, hud.high_score.to_string());
        }

        fn update_controls(&self, mode: Mode) {
            if let Some(btn) = &self.start_btn {
                let running = mode.is_active();
                btn.set_disabled(running);
                btn.set_text_content(Some(if running { "Training..." } else { "Start" }));
            }
            if let Some(btn) = &self.pause_btn {
                let label = if mode == Mode::Paused { "Resume" } else { "Pause" };
                btn.set_text_content(Some(label));
            }
        }

        fn update_zen(&self, zen: bool, difficulty: Difficulty) {
            if let Some(body) = &self.body {
                let classes = body.class_list();
                let _ = if zen {
                    classes.add_1("zen-mode")
                } else {
                    classes.remove_1("zen-mode")
                };
            }
            if let Some(btn) = &self.zen_btn {
                btn.set_text_content(Some(if zen { "Zen Mode ON" } else { "Zen Mode" }));
            }
            if let Some(select) = &self.difficulty_select {
                select.set_value(difficulty.as_str());
            }
        }

        /// Sync everything after a lifecycle or settings change
        fn refresh(&self, game: &Game) {
            self.update_hud(&game.hud());
            self.update_controls(game.mode());
            self.update_zen(game.settings().zen_mode, game.settings().difficulty);
        }
    }

    /// Register an event listener for the page's lifetime
    fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn input_value(event: &Event) -> Option<String> {
        let input = event.target()?.dyn_into::<HtmlInputElement>().ok()?;
        Some(input.value())
    }

    /// Canvas size in CSS pixels
    fn field_size(canvas: &HtmlCanvasElement) -> FieldSize {
        FieldSize::new(canvas.client_width() as f32, canvas.client_height() as f32)
    }

    /// Size the canvas backing store for the device pixel ratio
    fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> FieldSize {
        let field = field_size(canvas);
        let dpr = window.device_pixel_ratio();
        canvas.set_width((field.width as f64 * dpr) as u32);
        canvas.set_height((field.height as f64 * dpr) as u32);
        field
    }

    fn canvas_origin(canvas: &HtmlCanvasElement) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(rect.left() as f32, rect.top() as f32)
    }

    fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Bamboo Slice starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let field = fit_canvas(&window, &canvas);
        let settings = Settings::load();

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            match RenderState::new(surface, &adapter, canvas.width(), canvas.height()).await {
                Ok(state) => state,
                Err(e) => {
                    log::error!("Failed to create device: {}", e);
                    return;
                }
            };

        let services = Services {
            renderer: Box::new(GpuRenderer::new(
                render_state,
                field,
                window.device_pixel_ratio() as f32,
            )),
            audio: Box::new(WebAudio::new()),
            store: default_store(),
        };

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(settings, services, field, seed);
        log::info!("Game initialized with seed: {}", seed);

        let dom = Dom::new(&document);
        let app = Rc::new_cyclic(|weak| {
            RefCell::new(App {
                game,
                host: WebTaskHost::new(window.clone(), weak.clone()),
                dom,
            })
        });

        sync_controls(&document, app.borrow().game.settings());
        setup_buttons(&document, &app);
        setup_settings(&document, &app);
        setup_pointer(&canvas, &app);
        setup_resize(&window, canvas, &app);

        {
            let mut a = app.borrow_mut();
            a.game.render();
            a.dom.refresh(&a.game);
        }

        log::info!("Bamboo Slice ready");
    }

    /// Reflect loaded settings in the form controls
    fn sync_controls(document: &Document, settings: &Settings) {
        let input = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        };
        if let Some(select) = document
            .get_element_by_id("difficultySelect")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            select.set_value(settings.difficulty.as_str());
        }
        if let Some(el) = input("bambooSize") {
            el.set_value(&settings.base_size.to_string());
        }
        if let Some(el) = input("spawnRate") {
            el.set_value(&settings.spawn_interval_ms.to_string());
        }
        if let Some(el) = input("soundEnabled") {
            el.set_checked(settings.sound_enabled);
        }
        if let Some(el) = document.get_element_by_id("sizeValue") {
            el.set_text_content(Some(&settings.base_size.to_string()));
        }
        if let Some(el) = document.get_element_by_id("rateValue") {
            el.set_text_content(Some(&rate_label(settings.spawn_interval_ms)));
        }
    }

    fn rate_label(ms: u32) -> String {
        format!("{:.1}s", ms as f32 / 1000.0)
    }

    fn setup_buttons(document: &Document, app: &Rc<RefCell<App>>) {
        let buttons: [(&str, fn(&mut App)); 4] = [
            ("startBtn", |a| {
                let App { game, host, .. } = a;
                game.start(host);
            }),
            ("pauseBtn", |a| {
                let App { game, host, .. } = a;
                game.toggle_pause(host);
            }),
            ("resetBtn", |a| {
                let App { game, host, .. } = a;
                game.reset(host);
            }),
            ("zenModeBtn", |a| {
                a.game.toggle_zen_mode();
            }),
        ];

        for (id, action) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{} button", id);
                continue;
            };
            let app = app.clone();
            listen(&btn, "click", move |_event| {
                let mut a = app.borrow_mut();
                action(&mut a);
                a.dom.refresh(&a.game);
            });
        }
    }

    fn setup_settings(document: &Document, app: &Rc<RefCell<App>>) {
        if let Some(select) = document.get_element_by_id("difficultySelect") {
            let app = app.clone();
            listen(&select, "change", move |event| {
                let Some(select) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
                else {
                    return;
                };
                app.borrow_mut()
                    .game
                    .set_difficulty(Difficulty::from_key(&select.value()));
            });
        }

        if let Some(slider) = document.get_element_by_id("bambooSize") {
            let app = app.clone();
            let label = document.get_element_by_id("sizeValue");
            listen(&slider, "input", move |event| {
                let Some(px) = input_value(&event).and_then(|v| v.parse::<u32>().ok()) else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.game.set_base_size(px);
                if let Some(label) = &label {
                    label.set_text_content(Some(&a.game.settings().base_size.to_string()));
                }
            });
        }

        if let Some(slider) = document.get_element_by_id("spawnRate") {
            let app = app.clone();
            let label = document.get_element_by_id("rateValue");
            listen(&slider, "input", move |event| {
                let Some(ms) = input_value(&event).and_then(|v| v.parse::<u32>().ok()) else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.game.set_spawn_interval(ms);
                if let Some(label) = &label {
                    label.set_text_content(Some(&rate_label(a.game.settings().spawn_interval_ms)));
                }
            });
        }

        if let Some(checkbox) = document.get_element_by_id("soundEnabled") {
            let app = app.clone();
            listen(&checkbox, "change", move |event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                app.borrow_mut().game.set_sound_enabled(input.checked());
            });
        }
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, app: &Rc<RefCell<App>>) {
        // Mouse
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            listen(canvas, "mousedown", move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else { return };
                let client = Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32);
                let pos = to_field(client, canvas_origin(&canvas_clone));
                app.borrow_mut().game.pointer_down(pos);
            });
        }
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            listen(canvas, "mousemove", move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else { return };
                let client = Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32);
                let pos = to_field(client, canvas_origin(&canvas_clone));
                app.borrow_mut().game.pointer_move(pos);
            });
        }
        {
            let app = app.clone();
            listen(canvas, "mouseup", move |_event| {
                let mut a = app.borrow_mut();
                if a.game.pointer_up(now_ms()).is_some() {
                    a.dom.update_hud(&a.game.hud());
                }
            });
        }

        // Touch
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            listen(canvas, "touchstart", move |event| {
                event.prevent_default();
                let Some(touch) = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|t| t.touches().get(0))
                else {
                    return;
                };
                let client = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                let pos = to_field(client, canvas_origin(&canvas_clone));
                app.borrow_mut().game.pointer_down(pos);
            });
        }
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            listen(canvas, "touchmove", move |event| {
                event.prevent_default();
                let Some(touch) = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|t| t.touches().get(0))
                else {
                    return;
                };
                let client = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                let pos = to_field(client, canvas_origin(&canvas_clone));
                app.borrow_mut().game.pointer_move(pos);
            });
        }
        {
            let app = app.clone();
            listen(canvas, "touchend", move |event| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                if a.game.pointer_up(now_ms()).is_some() {
                    a.dom.update_hud(&a.game.hud());
                }
            });
        }
    }

    fn setup_resize(window: &Window, canvas: HtmlCanvasElement, app: &Rc<RefCell<App>>) {
        let app = app.clone();
        let window_clone = window.clone();
        listen(window, "resize", move |_event| {
            let field = fit_canvas(&window_clone, &canvas);
            let mut a = app.borrow_mut();
            a.game.resize(field, window_clone.device_pixel_ratio() as f32);
            if a.game.mode() == Mode::Stopped {
                a.game.render();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session: scripted swipes against a seeded field
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bamboo_slice::audio::NullAudio;
    use bamboo_slice::renderer::FrameBuilder;
    use bamboo_slice::sim::FieldSize;
    use bamboo_slice::{Game, ManualTaskHost, MemoryStore, Services, Settings};
    use glam::Vec2;

    env_logger::init();
    log::info!("Bamboo Slice (native) starting...");
    log::info!("The playable version runs in the browser - build for wasm32 with `trunk serve`");

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const FRAMES: u32 = 60 * 30;

    let field = FieldSize::new(800.0, 600.0);
    let settings = Settings::load();
    let spawn_every = (settings.spawn_interval_ms as f64 / FRAME_MS).round().max(1.0) as u32;
    let services = Services {
        renderer: Box::new(FrameBuilder::new(field)),
        audio: Box::new(NullAudio),
        store: Box::new(MemoryStore::new()),
    };
    let mut game = Game::new(settings, services, field, 0x5eed);
    let mut host = ManualTaskHost::new();
    game.start(&mut host);

    for frame in 1..=FRAMES {
        if frame % spawn_every == 0 {
            game.on_spawn_timer();
        }
        if host.take_frame() {
            game.on_frame(&mut host);
        }
        // Sweep across the lower half twice a second
        if frame % 30 == 0 {
            let y = field.height * 0.6;
            game.pointer_down(Vec2::new(0.0, y));
            game.pointer_move(Vec2::new(field.width, y));
            game.pointer_up(frame as f64 * FRAME_MS);
        }
    }

    let hud = game.hud();
    println!(
        "\n{} frames: {} cuts, max combo {}, score {} ({} stalks still standing)",
        FRAMES,
        hud.cut_count,
        hud.max_combo,
        hud.score,
        game.sim().standing_stalks()
    );
}
