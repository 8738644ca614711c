//! Calls to the backend's `/upload` and `/query` endpoints.

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use web_sys::{File, FormData};

use crate::error::{AppError, js_error_text};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UploadResponse {
	#[serde(default)]
	pub success: bool,
	#[serde(default)]
	pub error: Option<String>,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub data: Option<UploadData>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UploadData {
	#[serde(default)]
	pub tables: Option<Vec<Value>>,
	#[serde(default)]
	pub pages: Option<Vec<Value>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct QueryRequest<'a> {
	pub query: &'a str,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct QueryResponse {
	#[serde(default)]
	pub success: bool,
	#[serde(default)]
	pub error: Option<String>,
	#[serde(default)]
	pub result: Option<QueryResult>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QueryResult {
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default)]
	pub explanation: Option<String>,
	#[serde(default)]
	pub result: Option<ChartData>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChartData {
	#[serde(default)]
	pub chart_type: Option<String>,
	#[serde(default)]
	pub labels: Vec<String>,
	#[serde(default)]
	pub values: Vec<f64>,
}

impl UploadResponse {
	/// Collapse the envelope into the uploaded message or the server's error.
	pub fn into_result(self) -> Result<Option<String>, AppError> {
		if self.success {
			Ok(self.message)
		} else {
			Err(AppError::Server(
				self.error.unwrap_or_else(|| "unknown error".into()),
			))
		}
	}
}

impl QueryResponse {
	pub fn into_result(self) -> Result<Option<QueryResult>, AppError> {
		if self.success {
			Ok(self.result)
		} else {
			Err(AppError::Server(
				self.error.unwrap_or_else(|| "unknown error".into()),
			))
		}
	}
}

/// POST one file as `multipart/form-data` under the `file` field.
pub async fn upload_file(endpoint: &str, file: &File) -> Result<UploadResponse, AppError> {
	let form = FormData::new().map_err(|e| AppError::Dom(js_error_text(&e)))?;
	form.append_with_blob_and_filename("file", file, &file.name())
		.map_err(|e| AppError::Dom(js_error_text(&e)))?;

	let response = Request::post(endpoint).body(form)?.send().await?;
	log::debug!("upload {} -> HTTP {}", file.name(), response.status());
	Ok(response.json().await?)
}

/// POST `{"query": ..}` and decode the envelope.
pub async fn send_query(endpoint: &str, query: &str) -> Result<QueryResponse, AppError> {
	let response = Request::post(endpoint)
		.json(&QueryRequest { query })?
		.send()
		.await?;
	log::debug!("query -> HTTP {}", response.status());
	Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn data_query_response_decodes() {
		let json = r#"{
			"success": true,
			"result": {
				"type": "data",
				"explanation": "Sales by region",
				"result": {"labels": ["East", "West"], "values": [10, 20]}
			}
		}"#;
		let result = serde_json::from_str::<QueryResponse>(json)
			.unwrap()
			.into_result()
			.unwrap()
			.unwrap();
		assert_eq!(result.kind, "data");
		let chart = result.result.unwrap();
		assert_eq!(chart.labels, vec!["East", "West"]);
		assert_eq!(chart.values, vec![10.0, 20.0]);
		assert_eq!(chart.chart_type, None);
	}

	#[test]
	fn failed_query_surfaces_server_error() {
		let json = r#"{"success": false, "error": "model not loaded"}"#;
		let err = serde_json::from_str::<QueryResponse>(json)
			.unwrap()
			.into_result()
			.unwrap_err();
		assert_eq!(err, AppError::Server("model not loaded".into()));
	}

	#[test]
	fn upload_without_success_flag_is_a_failure() {
		let json = r#"{"error": "Invalid file type"}"#;
		let err = serde_json::from_str::<UploadResponse>(json)
			.unwrap()
			.into_result()
			.unwrap_err();
		assert_eq!(err.to_string(), "Invalid file type");
	}

	#[test]
	fn upload_success_keeps_message_and_data() {
		let json = r#"{"success": true, "message": "File uploaded successfully",
			"data": {"tables": [{"name": "Sales"}]}}"#;
		let response = serde_json::from_str::<UploadResponse>(json).unwrap();
		assert_eq!(response.data.as_ref().and_then(|d| d.tables.as_ref()).map(Vec::len), Some(1));
		assert_eq!(
			response.into_result().unwrap().as_deref(),
			Some("File uploaded successfully")
		);
	}

	#[test]
	fn query_request_serializes_as_query_field() {
		let body = serde_json::to_string(&QueryRequest { query: "total sales by region" }).unwrap();
		assert_eq!(body, r#"{"query":"total sales by region"}"#);
	}
}
