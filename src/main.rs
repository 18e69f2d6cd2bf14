//! RPS Arena entry point
//!
//! Native builds run a headless match and log the outcome. The web build
//! drives a match from `requestAnimationFrame` and mirrors counts into the HUD.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use rps_arena::web::{WasmArena, init_logging};

    type Game = Rc<RefCell<WasmArena>>;

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(game: &WasmArena) {
        let counts = game.scoreboard();
        for (id, count) in ["count-rock", "count-paper", "count-scissors"].iter().zip(&counts) {
            set_text(id, &count.to_string());
        }
        set_text("hud-time", &format!("{:.0}s", game.elapsed()));
        set_hidden("pause-menu", !game.is_paused());

        match game.winner() {
            Some(kind) => {
                set_text("winner", &kind);
                set_hidden("game-over", false);
            }
            None => set_hidden("game-over", true),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        init_logging();
        log::info!("RPS Arena starting...");

        let window = web_sys::window().ok_or("no window")?;
        let width = window.inner_width()?.as_f64().unwrap_or(800.0) as f32;
        let height = window.inner_height()?.as_f64().unwrap_or(600.0) as f32;

        let on_game_over = js_sys::Function::new_with_args(
            "kind",
            "console.log('Winner:', kind)",
        );
        let game = Rc::new(RefCell::new(WasmArena::new(width, height, Some(on_game_over))?));

        setup_input_handlers(game.clone())?;
        setup_auto_pause(game.clone())?;
        request_animation_frame(game);

        log::info!("RPS Arena running!");
        Ok(())
    }

    fn setup_input_handlers(game: Game) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Browsers only allow audio after a gesture
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resume_audio();
            });
            window.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.resume_audio();
                match event.key().as_str() {
                    " " | "p" | "P" | "Escape" => {
                        g.toggle_pause();
                    }
                    "m" | "M" => {
                        let muted = g.toggle_mute();
                        log::info!("Muted: {}", muted);
                    }
                    "r" | "R" => {
                        if let Err(e) = g.restart() {
                            log::error!("Restart failed: {:?}", e);
                        }
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_auto_pause(game: Game) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        if !rps_arena::Settings::load().pause_on_blur {
            return Ok(());
        }

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if !g.is_paused() {
                    g.toggle_pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Game) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Game, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let keep_going = g.frame(time);
            update_hud(&g);
            keep_going
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use glam::Vec2;

    use rps_arena::{Arena, ArenaError, CueLog, Runner, Tuning, World};

    /// Headless rock-paper-scissors arena
    #[derive(Parser, Debug)]
    #[command(name = "rps-arena")]
    #[command(about = "Run a headless rock-paper-scissors arena match", long_about = None)]
    pub struct Args {
        /// Match seed (0 = random from time)
        #[arg(short, long, default_value = "42")]
        pub seed: u64,

        /// Viewport width and height
        #[arg(long, default_value = "600")]
        pub size: f32,

        /// Tuning overrides as a JSON file
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Give up after this many seconds of match time
        #[arg(short, long, default_value = "600")]
        pub duration: f32,

        /// Verbose output
        #[arg(short, long)]
        pub verbose: bool,

        /// Print the final snapshot as JSON
        #[arg(long)]
        pub json: bool,
    }

    /// Simulated display refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Seconds of match time between progress lines
    const REPORT_EVERY: f32 = 10.0;

    pub fn run(args: &Args) -> Result<(), ArenaError> {
        let tuning = match &args.config {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = if args.seed == 0 {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(1)
        } else {
            args.seed
        };

        let arena = Arena::start(
            tuning,
            Vec2::splat(args.size),
            World::new(),
            CueLog::new(),
            seed,
            |kind| log::info!("{} takes the arena", kind.display_name()),
        )?;
        let mut runner = Runner::new(arena);

        let mut now = 0.0;
        let mut next_report = REPORT_EVERY;
        while runner.frame(now) {
            let arena = runner.arena();
            if arena.winner().is_some() {
                break;
            }
            if arena.elapsed() >= args.duration {
                log::warn!("No winner after {:.0}s", arena.elapsed());
                break;
            }
            if arena.elapsed() >= next_report {
                let c = arena.scoreboard();
                log::info!(
                    "t={:>4.0}s  rock={:<3} paper={:<3} scissors={:<3}",
                    arena.elapsed(),
                    c.rock,
                    c.paper,
                    c.scissors
                );
                next_report += REPORT_EVERY;
            }
            now += FRAME_MS;
        }

        let arena = runner.arena();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&arena.snapshot())?);
        } else {
            let c = arena.scoreboard();
            match arena.winner() {
                Some(kind) => println!("Winner: {} after {:.1}s", kind.display_name(), arena.elapsed()),
                None => println!("No winner after {:.1}s", arena.elapsed()),
            }
            println!(
                "Final: rock={} paper={} scissors={} ({} audio cues, seed {})",
                c.rock,
                c.paper,
                c.scissors,
                arena.audio().cues().len(),
                seed
            );
        }

        runner.stop();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    let args = headless::Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    log::info!("RPS Arena (native) starting...");
    match headless::run(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
