use leptos::prelude::*;

use crate::components::toast::Toasts;
use crate::config::AppConfig;
use crate::export::{download_xlsx, to_xlsx};
use crate::page_data::read_global_or_default;
use crate::table::{SortState, TableData, TableState};

fn cell_style(visible: bool) -> &'static str {
	if visible { "" } else { "display: none;" }
}

fn aria_sort(sort: Option<SortState>, column: usize) -> &'static str {
	match sort {
		Some(s) if s.column == column && s.ascending => "ascending",
		Some(s) if s.column == column => "descending",
		_ => "none",
	}
}

/// Searchable, sortable table of report visuals.
#[component]
pub fn TableView() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let toasts = expect_context::<Toasts>();
	let export_filename = StoredValue::new(config.export_filename);

	let table = RwSignal::new(TableState::new(read_global_or_default::<TableData>(
		"visualsTable",
	)));
	let width = table.with_untracked(|t| t.visible_columns().count());
	log::info!(
		"table view: {} columns, {} rows",
		width,
		table.with_untracked(|t| t.visible_rows().len())
	);

	let on_export = move |_| {
		let workbook = table.with(|t| {
			let (headers, rows) = t.visible_grid();
			to_xlsx(&headers, &rows)
		});
		let outcome =
			workbook.and_then(|bytes| download_xlsx(&bytes, &export_filename.get_value()));
		if let Err(e) = outcome {
			log::error!("export failed: {e}");
			toasts.error(format!("Export failed: {e}"));
		}
	};

	let columns = move || (0..width).collect::<Vec<_>>();
	let header_text = move |c: usize| table.with(|t| t.headers().get(c).cloned().unwrap_or_default());

	view! {
		<div class="table-toolbar">
			<input
				id="searchBox"
				type="text"
				placeholder="Search visuals..."
				on:input=move |ev| table.update(|t| t.set_search(&event_target_value(&ev)))
			/>
			<button class="btn" on:click=move |_| table.update(TableState::toggle_selector)>
				<i class="fas fa-columns"></i>
				" Columns"
			</button>
			<button class="btn btn-primary" on:click=on_export>
				<i class="fas fa-file-export"></i>
				" Export"
			</button>
		</div>

		<div
			id="columnSelector"
			class=move || if table.with(TableState::selector_open) { "column-selector" } else { "column-selector hidden" }
		>
			<For each=columns key=|c| *c let:c>
				<div>
					<label>
						<input
							type="checkbox"
							prop:checked=move || table.with(|t| t.is_column_visible(c))
							on:change=move |_| table.update(|t| t.toggle_column(c))
						/>
						{move || header_text(c)}
					</label>
				</div>
			</For>
		</div>

		<table id="visuals-table" class="table">
			<thead>
				<tr>
					<For each=columns key=|c| *c let:c>
						<th
							class="sortable"
							aria-sort=move || aria_sort(table.with(TableState::sort_state), c)
							style=move || cell_style(table.with(|t| t.is_column_visible(c)))
							on:click=move |_| table.update(|t| t.sort_by(c))
						>
							{move || header_text(c)}
							" "
							<i class=move || table.with(|t| t.sort_icon(c))></i>
						</th>
					</For>
				</tr>
			</thead>
			<tbody>
				<For each=move || table.with(TableState::visible_rows) key=|r| *r let:r>
					<tr>
						<For each=columns key=|c| *c let:c>
							<td style=move || cell_style(table.with(|t| t.is_column_visible(c)))>
								{table.with_untracked(|t| t.row(r).get(c).cloned().unwrap_or_default())}
							</td>
						</For>
					</tr>
				</For>
			</tbody>
		</table>
		<Show when=move || table.with(|t| !t.search().is_empty() && t.visible_rows().is_empty())>
			<p class="no-results">
				{move || table.with(|t| format!("No visuals match \"{}\"", t.search()))}
			</p>
		</Show>
	}
}
