use wasm_bindgen::prelude::*;

// --- LOGGING ---
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[cfg(not(target_arch = "wasm32"))]
fn log(s: &str) {
    tracing::debug!("{s}");
}
macro_rules! console_log {
    ($($t:tt)*) => (crate::log(&format!($($t)*)))
}

pub mod cli;
pub mod comment;
pub mod config;
pub mod dwell;
pub mod error;
pub mod modal;
pub mod pipeline;
pub mod serialize;
pub mod words;

pub use config::ShearConfig;
pub use error::{FixError, Result};
pub use modal::{parse_line, parse_program, step, ModalState, ParsedLine, Plane, Position};
pub use serialize::render;
pub use words::{tokenize, WordValue, Words};


#[wasm_bindgen]
pub struct ToolpathFixer {
    state: ModalState,
    config: ShearConfig,
}

fn to_js_error(err: FixError) -> JsValue {
    let msg = err.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&msg));
    JsValue::from_str(&msg)
}

#[wasm_bindgen]
impl ToolpathFixer {
    // Partial config objects are fine; missing fields take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Self {
        let config = if config.is_undefined() || config.is_null() {
            ShearConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).unwrap_or_else(|e| {
                web_sys::console::warn_1(&JsValue::from_str(&format!("invalid config: {e}")));
                ShearConfig::default()
            })
        };
        Self::with_config(config)
    }

    pub fn reset(&mut self) {
        console_log!("fixer reset");
        self.state = ModalState::new();
    }

    pub fn correct_line(&mut self, line: &str) -> std::result::Result<String, JsValue> {
        pipeline::correct_line(&mut self.state, &self.config, line)
            .map(|(text, _)| text)
            .map_err(to_js_error)
    }

    pub fn fix_dwell_line(&self, line: &str) -> std::result::Result<String, JsValue> {
        match dwell::round_dwell(line) {
            Ok(Some(fixed)) => Ok(fixed),
            Ok(None) => Ok(line.to_string()),
            Err(e) => Err(to_js_error(e)),
        }
    }

    pub fn get_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state).unwrap_or(JsValue::NULL)
    }
}

impl ToolpathFixer {
    pub fn with_config(config: ShearConfig) -> Self {
        Self {
            state: ModalState::new(),
            config,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn config(&self) -> &ShearConfig {
        &self.config
    }
}
