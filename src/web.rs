//! Browser binding
//!
//! Exposes a match to JavaScript hosts. Rendering stays on the JS side; it
//! reads `snapshotJson()` each frame.

use std::sync::Once;

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::physics::World;
use crate::runner::Runner;
use crate::settings::Settings;
use crate::sim::Arena;
use crate::tuning::Tuning;

static LOGGER: Once = Once::new();

/// Route panics and `log` output to the browser console (first call wins)
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    LOGGER.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already set".into());
        }
    });
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Call `callback(kind)` once the current call into the arena has returned,
/// so the host may stop or restart from inside it
fn defer_game_over(callback: js_sys::Function, kind: &'static str) {
    let run = Closure::once_into_js(move || {
        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(kind)) {
            log::warn!("game over callback failed: {:?}", e);
        }
    });
    match web_sys::window() {
        Some(window) => window.queue_microtask(run.unchecked_ref()),
        None => log::warn!("no window, game over callback dropped"),
    }
}

fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// One match in the browser: reference physics plus Web Audio
#[wasm_bindgen]
pub struct WasmArena {
    runner: Runner<World, WebAudio>,
    settings: Settings,
}

impl WasmArena {
    fn build(
        tuning: Tuning,
        width: f32,
        height: f32,
        on_game_over: Option<js_sys::Function>,
    ) -> Result<WasmArena, JsValue> {
        init_logging();
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(clock_seed);

        let mut audio = WebAudio::new();
        settings.apply_to(&mut audio);

        let arena = Arena::start(
            tuning,
            Vec2::new(width, height),
            World::new(),
            audio,
            seed,
            move |kind| {
                if let Some(callback) = &on_game_over {
                    defer_game_over(callback.clone(), kind.as_str());
                }
            },
        )
        .map_err(js_err)?;

        Ok(Self {
            runner: Runner::new(arena),
            settings,
        })
    }
}

#[wasm_bindgen]
impl WasmArena {
    /// Start a match with the default tuning in a `width` x `height` viewport.
    ///
    /// `on_game_over` is called once with `"rock"`, `"paper"` or `"scissors"`,
    /// after the `frame` that ended the match has returned.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, on_game_over: Option<js_sys::Function>) -> Result<WasmArena, JsValue> {
        Self::build(Tuning::default(), width, height, on_game_over)
    }

    /// Same as the constructor with tuning overrides as JSON
    #[wasm_bindgen(js_name = withTuning)]
    pub fn with_tuning(
        width: f32,
        height: f32,
        tuning_json: &str,
        on_game_over: Option<js_sys::Function>,
    ) -> Result<WasmArena, JsValue> {
        let tuning = Tuning::from_json(tuning_json).map_err(js_err)?;
        Self::build(tuning, width, height, on_game_over)
    }

    /// Feed a `requestAnimationFrame` timestamp; false once stopped
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.runner.frame(now_ms)
    }

    pub fn stop(&mut self) {
        self.runner.stop();
    }

    /// Fresh match seeded from the clock
    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.runner.restart(clock_seed()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) -> bool {
        self.runner.arena_mut().toggle_pause()
    }

    /// Toggle mute and remember the choice
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.runner.arena_mut().toggle_mute();
        self.settings.muted = muted;
        self.settings.save();
        muted
    }

    /// Call from a user gesture handler
    #[wasm_bindgen(js_name = resumeAudio)]
    pub fn resume_audio(&mut self) {
        self.runner.arena_mut().resume_audio();
    }

    /// `[rock, paper, scissors]`
    pub fn scoreboard(&self) -> Vec<u32> {
        let counts = self.runner.arena().scoreboard();
        vec![counts.rock, counts.paper, counts.scissors]
    }

    pub fn winner(&self) -> Option<String> {
        self.runner.arena().winner().map(|k| k.as_str().to_string())
    }

    pub fn elapsed(&self) -> f32 {
        self.runner.arena().elapsed()
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> bool {
        self.runner.arena().is_paused()
    }

    #[wasm_bindgen(js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Particles, walls and counts for the renderer
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.runner.arena().snapshot()).map_err(js_err)
    }
}
