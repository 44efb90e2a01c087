//! Runtime settings injected by `index.html` as `window.ENV_CONFIG`.

use lazy_static::lazy_static;
use wasm_bindgen::JsValue;
use web_sys::window;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_APP_NAME: &str = "Clip Library";

lazy_static! {
    pub static ref APP_CONFIG: AppConfig = AppConfig::from_window();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub app_name: String,
    pub debug_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Builds the config from a key lookup. Missing or blank values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            api_base_url: value("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            app_name: value("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            debug_mode: value("DEBUG_MODE").is_some_and(|v| parse_flag(&v)),
        }
    }

    pub fn from_window() -> Self {
        match injected_env_config() {
            Some(env_config) => Self::from_lookup(|key| {
                js_sys::Reflect::get(&env_config, &JsValue::from_str(key))
                    .ok()
                    .and_then(|v| v.as_string())
            }),
            None => {
                web_sys::console::warn_1(&"ENV_CONFIG is undefined, using defaults".into());
                Self::default()
            }
        }
    }
}

fn injected_env_config() -> Option<JsValue> {
    let window = window()?;
    let env_config = js_sys::Reflect::get(&window, &JsValue::from_str("ENV_CONFIG")).ok()?;
    (!env_config.is_undefined()).then_some(env_config)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
