use thiserror::Error;

/// Every failure a user action can end in.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
	/// Rejected on the client before any request was made.
	#[error("{0}")]
	Validation(String),
	/// The request never produced a response.
	#[error("{0}")]
	Transport(String),
	/// The backend answered with `success: false`.
	#[error("{0}")]
	Server(String),
	#[error("failed to parse response: {0}")]
	Decode(String),
	#[error("dom error: {0}")]
	Dom(String),
	#[error("spreadsheet error: {0}")]
	Export(String),
}

impl From<gloo_net::Error> for AppError {
	fn from(err: gloo_net::Error) -> Self {
		match err {
			gloo_net::Error::SerdeError(e) => AppError::Decode(e.to_string()),
			other => AppError::Transport(other.to_string()),
		}
	}
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
	fn from(err: rust_xlsxwriter::XlsxError) -> Self {
		AppError::Export(err.to_string())
	}
}

impl From<serde_json::Error> for AppError {
	fn from(err: serde_json::Error) -> Self {
		AppError::Decode(err.to_string())
	}
}

/// Render a `JsValue` error (thrown by a web API) as readable text.
pub fn js_error_text(value: &wasm_bindgen::JsValue) -> String {
	value
		.as_string()
		.or_else(|| {
			js_sys::Reflect::get(value, &"message".into())
				.ok()
				.and_then(|m| m.as_string())
		})
		.unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_are_raw_text_for_user_facing_variants() {
		assert_eq!(AppError::Server("bad file".into()).to_string(), "bad file");
		assert_eq!(
			AppError::Transport("Failed to fetch".into()).to_string(),
			"Failed to fetch"
		);
		assert_eq!(
			AppError::Decode("eof".into()).to_string(),
			"failed to parse response: eof"
		);
	}

	#[test]
	fn serde_errors_become_decode_errors() {
		let err = serde_json::from_str::<u32>("nope").unwrap_err();
		assert!(matches!(AppError::from(err), AppError::Decode(_)));
	}

	#[test]
	fn response_body_errors_split_by_cause() {
		let bad_body = serde_json::from_str::<u32>("{").unwrap_err();
		assert!(matches!(
			AppError::from(gloo_net::Error::SerdeError(bad_body)),
			AppError::Decode(_)
		));
		assert_eq!(
			AppError::from(gloo_net::Error::GlooError("network down".into())),
			AppError::Transport("network down".into())
		);
	}
}
