//! Runtime configuration.
//!
//! Defaults match the server this front end ships with. A page may override
//! any field by embedding a partial `appConfig` object before the bundle loads.

use serde::{Deserialize, Serialize};

use crate::page_data;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
	pub upload_endpoint: String,
	pub query_endpoint: String,
	/// Lower-case extensions including the leading dot.
	pub allowed_extensions: Vec<String>,
	pub status_timeout_ms: u32,
	pub progress_hide_ms: u32,
	pub copy_timeout_ms: u32,
	pub toast_timeout_ms: u32,
	pub reload_on_success: bool,
	pub export_filename: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			upload_endpoint: "/upload".into(),
			query_endpoint: "/query".into(),
			allowed_extensions: vec![".bim".into(), ".json".into(), ".tsv".into()],
			status_timeout_ms: 5000,
			progress_hide_ms: 1000,
			copy_timeout_ms: 2000,
			toast_timeout_ms: 3000,
			reload_on_success: false,
			export_filename: "power_bi_visuals.xlsx".into(),
		}
	}
}

impl AppConfig {
	/// Defaults merged with the page's `appConfig` global, if any.
	pub fn load() -> Self {
		match page_data::read_global::<AppConfig>("appConfig") {
			Ok(Some(config)) => config.normalized(),
			Ok(None) => Self::default(),
			Err(e) => {
				log::warn!("ignoring malformed appConfig: {e}");
				Self::default()
			}
		}
	}

	fn normalized(mut self) -> Self {
		for ext in &mut self.allowed_extensions {
			let lower = ext.trim().to_lowercase();
			*ext = if lower.starts_with('.') {
				lower
			} else {
				format!(".{lower}")
			};
		}
		self
	}
}
