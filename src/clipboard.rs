use wasm_bindgen_futures::JsFuture;

use crate::error::{AppError, js_error_text};

/// Write `text` to the system clipboard.
pub async fn copy_text(text: &str) -> Result<(), AppError> {
	let window = web_sys::window().ok_or_else(|| AppError::Dom("no window".into()))?;
	let promise = window.navigator().clipboard().write_text(text);
	JsFuture::from(promise)
		.await
		.map(|_| ())
		.map_err(|e| AppError::Dom(js_error_text(&e)))
}
