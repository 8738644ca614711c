//! Access to the data the server embeds into each page as `window` globals.

use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

use crate::error::AppError;

/// Deserialize `window[name]`. `Ok(None)` when the global is absent.
pub fn read_global<T: DeserializeOwned>(name: &str) -> Result<Option<T>, AppError> {
	let window = web_sys::window().ok_or_else(|| AppError::Dom("no window".into()))?;
	let value = js_sys::Reflect::get(&window, &JsValue::from_str(name))
		.map_err(|e| AppError::Dom(crate::error::js_error_text(&e)))?;
	if value.is_undefined() || value.is_null() {
		return Ok(None);
	}
	serde_wasm_bindgen::from_value(value)
		.map(Some)
		.map_err(|e| AppError::Decode(e.to_string()))
}

/// Like [`read_global`], but logs and falls back to `T::default()`.
pub fn read_global_or_default<T: DeserializeOwned + Default>(name: &str) -> T {
	match read_global(name) {
		Ok(Some(value)) => value,
		Ok(None) => {
			log::warn!("page global `{name}` is missing");
			T::default()
		}
		Err(e) => {
			log::error!("page global `{name}` could not be read: {e}");
			T::default()
		}
	}
}
