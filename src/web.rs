//! Browser bindings
//!
//! Thin wasm-bindgen facade over [`VisualManager`]. Structured values cross
//! the boundary as JSON strings; the page renders from frame snapshots.

use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::manager::{Mode, ThemeObserver, VisualManager};
use crate::sim::entity::Viewport;
use crate::sim::pool::ColorCount;
use crate::themes::ThemeKind;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Maya visuals loaded");
}

/// Current window size, if there is a window to measure
fn window_viewport() -> Option<Viewport> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Viewport::new(width as f32, height as f32))
}

/// Forwards theme changes to a JS callback
struct JsObserver {
    callback: js_sys::Function,
}

impl ThemeObserver for JsObserver {
    fn on_theme_changed(&mut self, theme: ThemeKind) {
        if let Err(err) = self.callback.call1(&JsValue::NULL, &JsValue::from_str(theme.as_str())) {
            log::warn!("Theme observer failed: {:?}", err);
        }
    }
}

#[wasm_bindgen]
pub struct WasmVisuals {
    manager: VisualManager,
}

#[wasm_bindgen]
impl WasmVisuals {
    /// Build from an optional JSON config; bad JSON falls back to defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> WasmVisuals {
        let config = match config_json.as_deref() {
            Some(json) => EngineConfig::from_json(json).unwrap_or_else(|err| {
                log::warn!("{}, using defaults", err);
                EngineConfig::default()
            }),
            None => EngineConfig::default(),
        };
        let mut manager = VisualManager::new(config);
        match window_viewport() {
            Some(vp) => manager.set_viewport(vp),
            None => log::warn!("No window available, visuals render without a viewport"),
        }
        WasmVisuals { manager }
    }

    /// Returns the name of the theme actually loaded
    pub fn initialize(&mut self, theme: &str) -> String {
        self.manager.initialize(theme).as_str().to_string()
    }

    #[wasm_bindgen(js_name = onThemeChanged)]
    pub fn on_theme_changed(&mut self, callback: js_sys::Function) {
        self.manager.add_observer(Box::new(JsObserver { callback }));
    }

    #[wasm_bindgen(js_name = setThreshold)]
    pub fn set_threshold(&mut self, x: u32) {
        self.manager.set_threshold(x);
    }

    #[wasm_bindgen(js_name = getMaxCapacity)]
    pub fn max_capacity(&self) -> u32 {
        self.manager.max_capacity()
    }

    #[wasm_bindgen(js_name = onCorrect)]
    pub fn on_correct(&mut self) {
        self.manager.on_correct();
    }

    #[wasm_bindgen(js_name = onWrong)]
    pub fn on_wrong(&mut self) {
        self.manager.on_wrong();
    }

    #[wasm_bindgen(js_name = onSkip)]
    pub fn on_skip(&mut self) {
        self.manager.on_skip();
    }

    #[wasm_bindgen(js_name = onReset)]
    pub fn on_reset(&mut self) {
        self.manager.on_reset();
    }

    /// `{message, description, type, progress}` as JSON
    #[wasm_bindgen(js_name = getHint)]
    pub fn hint(&self) -> String {
        serde_json::to_string(&self.manager.get_hint()).unwrap_or_default()
    }

    /// "game" or "sample"; anything else is ignored
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) {
        match Mode::from_str(mode) {
            Some(mode) => self.manager.set_mode(mode),
            None => log::warn!("Unknown mode '{}'", mode),
        }
    }

    #[wasm_bindgen(js_name = setSampleCount)]
    pub fn set_sample_count(&mut self, count: u32) {
        self.manager.set_sample_count(count);
    }

    #[wasm_bindgen(js_name = sampleBirth)]
    pub fn sample_birth(&mut self) {
        self.manager.sample_birth();
    }

    #[wasm_bindgen(js_name = sampleAge)]
    pub fn sample_age(&mut self) {
        self.manager.sample_age();
    }

    #[wasm_bindgen(js_name = sampleColor)]
    pub fn sample_color(&mut self) {
        self.manager.sample_color();
    }

    #[wasm_bindgen(js_name = samplePulse)]
    pub fn sample_pulse(&mut self) {
        self.manager.sample_pulse();
    }

    #[wasm_bindgen(js_name = sampleWave)]
    pub fn sample_wave(&mut self) {
        self.manager.sample_wave();
    }

    #[wasm_bindgen(js_name = sampleEnd)]
    pub fn sample_end(&mut self) {
        self.manager.sample_end();
    }

    #[wasm_bindgen(js_name = sampleReset)]
    pub fn sample_reset(&mut self) {
        self.manager.sample_reset();
    }

    /// Color `count` aged entities now; `-1` starts a color wave
    pub fn color(&mut self, count: i32) -> u32 {
        self.manager.color(ColorCount::from_raw(count)) as u32
    }

    /// Due time of the next deferred task, for hosts that stop the frame loop while idle
    #[wasm_bindgen(js_name = nextWakeup)]
    pub fn next_wakeup(&self) -> Option<f64> {
        self.manager.next_wakeup()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.manager.set_viewport(Viewport::new(width, height));
    }

    /// Advance one frame; keep calling from requestAnimationFrame while this returns true
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.manager.frame(now_ms)
    }

    /// Current frame as JSON (`null` before a theme is loaded)
    pub fn snapshot(&self) -> String {
        match self.manager.theme() {
            Some(theme) => serde_json::to_string(&theme.snapshot()).unwrap_or_else(|err| {
                log::warn!("Snapshot serialization failed: {}", err);
                "null".to_string()
            }),
            None => "null".to_string(),
        }
    }
}
