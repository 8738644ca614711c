use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, File, FileList, HtmlInputElement};

use crate::api;
use crate::config::AppConfig;
use crate::timer::after;
use crate::upload::{UploadStatus, select_files};

fn files_of(list: Option<FileList>) -> Vec<File> {
	let Some(list) = list else {
		return Vec::new();
	};
	(0..list.length()).filter_map(|i| list.get(i)).collect()
}

fn reload_page() {
	if let Some(window) = web_sys::window() {
		let _ = window.location().reload();
	}
}

/// Upload files one at a time, reporting each outcome on `status`.
async fn handle_files(files: Vec<File>, config: AppConfig, status: RwSignal<UploadStatus>) {
	let names: Vec<String> = files.iter().map(File::name).collect();
	let valid: Vec<File> = match select_files(&names, &config.allowed_extensions) {
		Ok(picked) => picked.into_iter().map(|i| files[i].clone()).collect(),
		Err(e) => {
			log::warn!("upload rejected: {e}");
			let ticket = status
				.try_update(|s| s.report(Err(e.to_string())))
				.unwrap_or_default();
			after(config.status_timeout_ms, move || {
				status.update(|s| s.hide_status(ticket))
			});
			return;
		}
	};

	status.update(UploadStatus::begin);
	let total = valid.len();
	let mut any_success = false;

	for (i, file) in valid.iter().enumerate() {
		let name = file.name();
		let outcome = match api::upload_file(&config.upload_endpoint, file).await {
			Ok(response) => {
				status.update(|s| s.set_progress(i + 1, total));
				if let Some(data) = &response.data {
					log::debug!(
						"{name}: {} tables, {} pages",
						data.tables.as_ref().map_or(0, Vec::len),
						data.pages.as_ref().map_or(0, Vec::len)
					);
				}
				match response.into_result() {
					Ok(_) => {
						log::info!("uploaded {name}");
						any_success = true;
						Ok(format!("{name} uploaded successfully"))
					}
					Err(e) => Err(format!("Error uploading {name}: {e}")),
				}
			}
			Err(e) => {
				log::error!("upload of {name} failed: {e}");
				Err(format!("Error uploading {name}: {e}"))
			}
		};
		let ticket = status.try_update(|s| s.report(outcome)).unwrap_or_default();
		after(config.status_timeout_ms, move || {
			status.update(|s| s.hide_status(ticket))
		});
	}

	let ticket = status.try_update(UploadStatus::finish).unwrap_or_default();
	after(config.progress_hide_ms, move || {
		status.update(|s| s.hide_progress(ticket))
	});

	if any_success && config.reload_on_success {
		reload_page();
	}
}

/// Drop area plus file picker feeding sequential uploads.
#[component]
pub fn UploadArea() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let accept = config.allowed_extensions.join(",");
	let config = StoredValue::new(config);
	let status = RwSignal::new(UploadStatus::default());
	let (highlight, set_highlight) = signal(false);

	let start = move |files: Vec<File>| {
		if files.is_empty() {
			return;
		}
		let config = config.get_value();
		leptos::task::spawn_local(handle_files(files, config, status));
	};

	let on_drag_over = move |ev: DragEvent| {
		ev.prevent_default();
		ev.stop_propagation();
		set_highlight.set(true);
	};
	let on_drag_leave = move |ev: DragEvent| {
		ev.prevent_default();
		ev.stop_propagation();
		set_highlight.set(false);
	};
	let on_drop = move |ev: DragEvent| {
		ev.prevent_default();
		ev.stop_propagation();
		set_highlight.set(false);
		start(files_of(ev.data_transfer().and_then(|dt| dt.files())));
	};
	let on_pick = move |ev: web_sys::Event| {
		let input = ev
			.target()
			.and_then(|t| t.dyn_into::<HtmlInputElement>().ok());
		if let Some(input) = input {
			start(files_of(input.files()));
			// allow picking the same file again
			input.set_value("");
		}
	};

	let progress = move || status.with(|s| s.progress);

	view! {
		<div
			id="upload-area"
			class=move || if highlight.get() { "upload-area highlight" } else { "upload-area" }
			on:dragenter=on_drag_over
			on:dragover=on_drag_over
			on:dragleave=on_drag_leave
			on:drop=on_drop
		>
			<i class="fas fa-cloud-upload-alt"></i>
			<p>"Drag and drop your model file here"</p>
			<label class="btn btn-primary">
				"Browse files"
				<input
					id="file-input"
					type="file"
					multiple=true
					accept=accept
					style="display: none;"
					on:change=on_pick
				/>
			</label>
		</div>

		<div
			id="upload-progress"
			style=move || if progress().is_some() { "display: block;" } else { "display: none;" }
		>
			<div
				class="progress-bar"
				style=move || format!("width: {}%;", progress().unwrap_or(0.0))
			></div>
			<span class="progress-text">
				{move || format!("{}%", progress().unwrap_or(0.0).round())}
			</span>
		</div>

		{move || {
			status
				.with(|s| {
					s.phase.message().map(|m| (m.to_string(), s.phase.is_error()))
				})
				.map(|(message, is_error)| {
					view! {
						<div
							id="upload-status"
							class=if is_error { "upload-status error" } else { "upload-status success" }
						>
							{message}
						</div>
					}
				})
		}}
	}
}
