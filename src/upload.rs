//! File selection rules and status bookkeeping for the upload area.

use crate::error::AppError;
use crate::timer::{Generation, Ticket};

/// `.ext` of `name`, lower-cased. `None` when the name has no dot.
pub fn extension_of(name: &str) -> Option<String> {
	let (_, tail) = name.rsplit_once('.')?;
	Some(format!(".{}", tail.to_lowercase()))
}

pub fn validate_file(name: &str, allowed: &[String]) -> bool {
	extension_of(name).is_some_and(|ext| allowed.contains(&ext))
}

/// "Please upload only .bim, .json, or .tsv files"
pub fn rejection_message(allowed: &[String]) -> String {
	let list = match allowed {
		[] => String::from("supported"),
		[one] => one.clone(),
		[a, b] => format!("{a} or {b}"),
		[rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
	};
	format!("Please upload only {list} files")
}

/// Indices of the acceptable names, or a validation error when there are none.
pub fn select_files(names: &[String], allowed: &[String]) -> Result<Vec<usize>, AppError> {
	let picked: Vec<usize> = names
		.iter()
		.enumerate()
		.filter(|(_, name)| validate_file(name, allowed))
		.map(|(i, _)| i)
		.collect();
	if picked.is_empty() {
		return Err(AppError::Validation(rejection_message(allowed)));
	}
	Ok(picked)
}

pub fn progress_percent(completed: usize, total: usize) -> f64 {
	if total == 0 {
		return 0.0;
	}
	completed as f64 / total as f64 * 100.0
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadPhase {
	#[default]
	Idle,
	Uploading,
	Success(String),
	Error(String),
}

impl UploadPhase {
	pub fn message(&self) -> Option<&str> {
		match self {
			UploadPhase::Success(m) | UploadPhase::Error(m) => Some(m),
			_ => None,
		}
	}

	pub fn is_error(&self) -> bool {
		matches!(self, UploadPhase::Error(_))
	}
}

/// The upload area's status line and progress bar.
#[derive(Clone, Debug, Default)]
pub struct UploadStatus {
	pub phase: UploadPhase,
	pub progress: Option<f64>,
	status_timer: Generation,
	progress_timer: Generation,
}

impl UploadStatus {
	pub fn begin(&mut self) {
		self.phase = UploadPhase::Uploading;
		self.progress = Some(0.0);
		self.progress_timer.arm();
	}

	pub fn set_progress(&mut self, completed: usize, total: usize) {
		self.progress = Some(progress_percent(completed, total));
	}

	/// Show a terminal status; returns the ticket its hide timer must present.
	pub fn report(&mut self, outcome: Result<String, String>) -> Ticket {
		self.phase = match outcome {
			Ok(m) => UploadPhase::Success(m),
			Err(m) => UploadPhase::Error(m),
		};
		self.status_timer.arm()
	}

	pub fn hide_status(&mut self, ticket: Ticket) {
		if self.status_timer.is_current(ticket) {
			self.phase = UploadPhase::Idle;
		}
	}

	pub fn finish(&mut self) -> Ticket {
		self.progress_timer.arm()
	}

	pub fn hide_progress(&mut self, ticket: Ticket) {
		if self.progress_timer.is_current(ticket) {
			self.progress = None;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn allowed() -> Vec<String> {
		vec![".bim".into(), ".json".into(), ".tsv".into()]
	}

	#[test]
	fn accepts_listed_extensions_case_insensitively() {
		assert!(validate_file("Model.BIM", &allowed()));
		assert!(validate_file("report.json", &allowed()));
		assert!(validate_file("deps.measure.tsv", &allowed()));
	}

	#[test]
	fn rejects_everything_else() {
		assert!(!validate_file("notes.txt", &allowed()));
		assert!(!validate_file("json", &allowed()));
		assert!(!validate_file("archive.json.zip", &allowed()));
		assert!(!validate_file("", &allowed()));
	}

	#[test]
	fn rejection_message_lists_extensions() {
		assert_eq!(
			rejection_message(&allowed()),
			"Please upload only .bim, .json, or .tsv files"
		);
		assert_eq!(
			rejection_message(&[".bim".into(), ".json".into()]),
			"Please upload only .bim or .json files"
		);
	}

	#[test]
	fn selection_keeps_only_allowed_files() {
		let names: Vec<String> = vec!["model.BIM".into(), "notes.txt".into(), "data.tsv".into()];
		assert_eq!(select_files(&names, &allowed()), Ok(vec![0, 2]));

		let err = select_files(&["notes.txt".into()], &allowed()).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Please upload only .bim, .json, or .tsv files"
		);
		assert!(select_files(&[], &allowed()).is_err());
	}

	#[test]
	fn progress_is_completed_over_total() {
		assert_eq!(progress_percent(0, 4), 0.0);
		assert_eq!(progress_percent(1, 4), 25.0);
		assert_eq!(progress_percent(3, 3), 100.0);
		assert_eq!(progress_percent(0, 0), 0.0);
	}

	#[test]
	fn stale_hide_timer_keeps_newer_status() {
		let mut status = UploadStatus::default();
		status.begin();
		let first = status.report(Ok("a.bim uploaded successfully".into()));
		let second = status.report(Err("Error uploading b.json: boom".into()));
		status.hide_status(first);
		assert!(status.phase.is_error());
		status.hide_status(second);
		assert_eq!(status.phase, UploadPhase::Idle);
	}

	#[test]
	fn new_upload_cancels_pending_progress_hide() {
		let mut status = UploadStatus::default();
		status.begin();
		status.set_progress(1, 1);
		let hide = status.finish();
		status.begin();
		status.hide_progress(hide);
		assert_eq!(status.progress, Some(0.0));
	}
}
