//! Turning query responses into chat entries.

use crate::api::{ChartData, QueryResponse};
use crate::error::AppError;

#[derive(Clone, Debug, PartialEq)]
pub enum ChatEntry {
	User(String),
	System(String),
	/// Text-only answer card.
	Answer(String),
	/// Answer card with a chart drawn into the canvas `chart_id`.
	Chart {
		chart_id: String,
		explanation: String,
		chart: ChartData,
	},
}

/// Map the outcome of one `/query` call to the entry that answers it.
/// `chart_id` is only used when the answer carries chart data.
pub fn answer_entry(outcome: Result<QueryResponse, AppError>, chart_id: String) -> ChatEntry {
	let response = match outcome {
		Ok(response) => response,
		Err(e) => return ChatEntry::System(format!("Error processing query: {e}")),
	};
	match response.into_result() {
		Ok(Some(result)) => {
			let explanation = result.explanation.unwrap_or_default();
			match result.result {
				Some(chart) if result.kind == "data" => ChatEntry::Chart {
					chart_id,
					explanation,
					chart,
				},
				_ if explanation.is_empty() => ChatEntry::Answer("No results found".into()),
				_ => ChatEntry::Answer(explanation),
			}
		}
		Ok(None) => ChatEntry::Answer("No results found".into()),
		Err(e) => ChatEntry::System(format!("Error: {e}")),
	}
}
