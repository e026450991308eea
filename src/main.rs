//! Flappy Arcade entry point
//!
//! Browser: WebGPU canvas, requestAnimationFrame loop and DOM HUD.
//! Native: headless runner for soak tests and tuning experiments.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_arcade::audio::WebAudio;
    use flappy_arcade::consts::SIM_DT;
    use flappy_arcade::game::Snapshot;
    use flappy_arcade::persistence::LocalStorageStore;
    use flappy_arcade::platform::{FlapDebounce, command_for_key};
    use flappy_arcade::renderer::RenderState;
    use flappy_arcade::sim::{Command, GameMode};
    use flappy_arcade::{Game, Tuning, autopilot};

    /// Browser host around the game
    struct Host {
        game: Game<WebAudio, LocalStorageStore>,
        render_state: Option<RenderState>,
        last_time: f64,
        debounce: FlapDebounce,
        /// Demo mode: the bot plays
        idle_mode: bool,
        /// Last snapshot pushed to the DOM
        last_hud: Option<Snapshot>,
    }

    impl Host {
        fn new(seed: u64) -> Self {
            Self {
                game: Game::new(seed, Tuning::default(), WebAudio::new(), LocalStorageStore),
                render_state: None,
                last_time: 0.0,
                debounce: FlapDebounce::default(),
                idle_mode: false,
                last_hud: None,
            }
        }

        /// Route a command, debouncing flaps
        fn command(&mut self, command: Command) {
            if command == Command::Flap {
                if !self.debounce.accept(js_sys::Date::now()) {
                    return;
                }
                // First gesture unlocks audio
                self.game.audio_mut().resume();
            }
            self.game.handle(command);
        }

        fn update(&mut self, dt: f32) {
            if self.idle_mode {
                let state = self.game.state();
                if state.mode != GameMode::Playing || autopilot::should_flap(state) {
                    self.game.handle(Command::Flap);
                }
            }
            self.game.advance_frame(dt);
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            match render_state.render(self.game.draw_list()) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Push the snapshot into the DOM, only when it changed
        fn update_hud(&mut self) {
            let snap = self.game.snapshot();
            let mut compare = snap.clone();
            // Bird motion changes every frame and is not shown
            compare.bird_pos = Default::default();
            compare.bird_velocity = 0.0;
            if self.last_hud.as_ref() == Some(&compare) {
                return;
            }
            self.last_hud = Some(compare);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "#hud-score .hud-value", &snap.score.to_string());
            set_text(&document, "#hud-best .hud-value", &snap.best_score.to_string());
            match snap.fps {
                Some(fps) => {
                    set_text(&document, "#hud-fps .hud-value", &fps.to_string());
                    show(&document, "hud-fps", true);
                }
                None => show(&document, "hud-fps", false),
            }
            show(&document, "muted-indicator", snap.muted);
            show(&document, "debug-indicator", snap.debug);
            show(&document, "title-screen", snap.mode == GameMode::Title);
            show(&document, "pause-menu", snap.mode == GameMode::Playing && snap.paused);
            show(&document, "game-over", snap.mode == GameMode::GameOver);
            if snap.mode == GameMode::GameOver {
                set_text(&document, "#final-score", &snap.score.to_string());
                set_text(&document, "#final-best", &snap.best_score.to_string());
            }
        }

        fn auto_pause(&mut self, reason: &str) {
            let state = self.game.state();
            if state.mode == GameMode::Playing && !state.paused {
                self.game.handle(Command::Pause);
                log::info!("Auto-paused ({reason})");
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Match the canvas backing store to its CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Flappy Arcade starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };
        let (width, height) = fit_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let host = Rc::new(RefCell::new(Host::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
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
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => host.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {e}");
                return;
            }
        }

        setup_input_handlers(&canvas, host.clone());
        setup_resize(canvas, host.clone());
        setup_auto_pause(host.clone());

        show(&document, "hud", true);

        request_animation_frame(host);

        log::info!("Flappy Arcade running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Keyboard
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if code == "KeyI" {
                    let mut h = host.borrow_mut();
                    h.idle_mode = !h.idle_mode;
                    log::info!("Idle mode: {}", h.idle_mode);
                    return;
                }
                let Some(command) = command_for_key(&code) else {
                    return;
                };
                // Keep Space/ArrowUp from scrolling the page
                if command == Command::Flap {
                    event.prevent_default();
                }
                host.borrow_mut().command(command);
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Mouse click
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                host.borrow_mut().command(Command::Flap);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch; the debounce also swallows the synthetic mouse event that may follow
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                host.borrow_mut().command(Command::Flap);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&canvas);
            if let Some(render_state) = host.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
                    host.borrow_mut().auto_pause("tab hidden");
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
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                host.borrow_mut().auto_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        {
            let mut h = host.borrow_mut();

            let dt = if h.last_time > 0.0 {
                ((time - h.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            h.last_time = time;

            h.update(dt);
            h.render();
            h.update_hud();
        }

        request_animation_frame(host);
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

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;

    use flappy_arcade::audio::SilentAudio;
    use flappy_arcade::consts::SIM_DT;
    use flappy_arcade::persistence::{JsonFileStore, MemoryStore, Store};
    use flappy_arcade::sim::{Command, GameMode};
    use flappy_arcade::{Game, Tuning, autopilot};

    #[derive(Parser)]
    #[command(name = "flappy-arcade")]
    #[command(about = "Run the Flappy Arcade simulation headlessly at a fixed 60 FPS")]
    pub struct Args {
        /// RNG seed for the run
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// Simulated seconds to run
        #[arg(long, default_value_t = 60.0)]
        pub seconds: f32,
        /// JSON tuning file (partial files keep defaults)
        #[arg(long)]
        pub tuning: Option<PathBuf>,
        /// JSON save file for the best score and mute flag
        #[arg(long)]
        pub save: Option<PathBuf>,
        /// Let the bot play, restarting after every crash
        #[arg(long)]
        pub autopilot: bool,
        /// Print the effective tuning as JSON and exit
        #[arg(long)]
        pub dump_tuning: bool,
    }

    fn load_tuning(args: &Args) -> Result<Tuning, Box<dyn std::error::Error>> {
        match &args.tuning {
            Some(path) => {
                let tuning = Tuning::from_json(&fs::read_to_string(path)?)?;
                log::info!("Loaded tuning from {}", path.display());
                Ok(tuning)
            }
            None => Ok(Tuning::default()),
        }
    }

    pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
        let tuning = load_tuning(&args)?;

        if args.dump_tuning {
            println!("{}", tuning.to_json()?);
            return Ok(());
        }

        match &args.save {
            Some(path) => simulate(&args, tuning, JsonFileStore::open(path)),
            None => simulate(&args, tuning, MemoryStore::default()),
        }
        Ok(())
    }

    fn simulate<S: Store>(args: &Args, tuning: Tuning, store: S) {
        let mut game = Game::new(args.seed, tuning, SilentAudio::default(), store);
        let frames = (args.seconds.max(0.0) / SIM_DT).round() as u64;

        let mut runs = 0u32;
        let mut last_mode = game.state().mode;
        let mut ticks = 0u64;
        for _ in 0..frames {
            let state = game.state();
            let start = state.mode != GameMode::Playing && (args.autopilot || runs == 0);
            if start || (args.autopilot && autopilot::should_flap(state)) {
                game.handle(Command::Flap);
            }

            ticks += u64::from(game.advance_frame(SIM_DT));

            let mode = game.state().mode;
            if mode != last_mode {
                match mode {
                    GameMode::Playing => runs += 1,
                    GameMode::GameOver => {
                        log::info!("Run {runs} ended with score {}", game.state().score)
                    }
                    GameMode::Title => {}
                }
                last_mode = mode;
            }
        }

        let snapshot = game.snapshot();
        log::info!(
            "Simulated {ticks} ticks over {frames} frames: {runs} runs, best {}",
            snapshot.best_score
        );
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => log::warn!("Failed to serialize snapshot: {e}"),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_dump_tuning_flag_parses() {
            let args = Args::parse_from(["flappy-arcade", "--dump-tuning"]);
            assert!(args.dump_tuning);
            assert!(!args.autopilot);
            assert_eq!(args.seed, 1);
        }

        #[test]
        fn test_dumped_tuning_loads_back() {
            let mut tuning = Tuning::default();
            tuning.pipes.speed = 150.0;
            let path = std::env::temp_dir().join(format!(
                "flappy_arcade_tuning_{}.json",
                std::process::id()
            ));
            fs::write(&path, tuning.to_json().unwrap()).unwrap();

            let path_arg = path.to_string_lossy().into_owned();
            let args = Args::parse_from(["flappy-arcade", "--tuning", path_arg.as_str()]);
            let loaded = load_tuning(&args).unwrap();
            let _ = fs::remove_file(&path);
            assert_eq!(loaded, tuning);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy Arcade (headless) starting...");

    let args = headless::Args::parse();
    if let Err(e) = headless::run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
