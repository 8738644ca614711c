use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::components::force_graph::{ForceGraphCanvas, GraphData};
use crate::lineage::{
	Edge, LineageColumn, LineageGraph, LineageSort, Node, Relationship, sort_relationships,
};
use crate::page_data::read_global_or_default;

const ROW_ID_ATTR: &str = "data-measure-id";

/// Position of the first row whose measure id is `measure_id`.
fn row_position<I>(row_ids: I, measure_id: &str) -> Option<usize>
where
	I: IntoIterator<Item = Option<String>>,
{
	row_ids
		.into_iter()
		.position(|id| id.as_deref() == Some(measure_id))
}

fn scroll_row_into_view(measure_id: &str) {
	let Some(document) = web_sys::window().and_then(|w| w.document()) else {
		return;
	};
	let Ok(rows) = document.query_selector_all("#lineageTable tbody tr") else {
		return;
	};
	let rows: Vec<Element> = (0..rows.length())
		.filter_map(|i| rows.get(i))
		.filter_map(|n| n.dyn_into::<Element>().ok())
		.collect();
	let ids = rows.iter().map(|row| row.get_attribute(ROW_ID_ATTR));
	let Some(row) = row_position(ids, measure_id).map(|i| &rows[i]) else {
		log::debug!("no lineage row for {measure_id}");
		return;
	};
	let options = ScrollIntoViewOptions::new();
	options.set_behavior(ScrollBehavior::Smooth);
	options.set_block(ScrollLogicalPosition::Center);
	row.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Dependency graph of measures and columns with a synchronized table.
#[component]
pub fn LineageView() -> impl IntoView {
	let graph = StoredValue::new(LineageGraph::new(
		read_global_or_default::<Vec<Node>>("nodesArray"),
		read_global_or_default::<Vec<Edge>>("edgesArray"),
	));

	let (filter, set_filter) = signal(String::new());
	let (selected, set_selected) = signal(Option::<String>::None);
	let (sort, set_sort) = signal(LineageSort::default());

	let subset = Memo::new(move |_| graph.with_value(|g| g.filter(&filter.get())));
	let graph_data = Signal::derive(move || {
		graph.with_value(|g| GraphData::from_subset(g, &subset.get()))
	});
	let highlighted = Signal::derive(move || match selected.get() {
		Some(id) => graph.with_value(|g| {
			let mut ids: Vec<String> = g.connected_nodes(&id).into_iter().collect();
			ids.sort();
			ids
		}),
		None => Vec::new(),
	});
	let rows = Memo::new(move |_| {
		graph.with_value(|g| {
			let mut rows = g.relationships(&subset.get());
			sort_relationships(g, &mut rows, sort.get());
			rows
		})
	});

	let select = move |id: String| {
		log::debug!("lineage selection: {id}");
		set_selected.set(Some(id.clone()));
		request_animation_frame(move || scroll_row_into_view(&id));
	};

	let groups = graph.with_value(|g| g.select_groups());

	view! {
		<div class="lineage-controls">
			<select
				id="measureSelect"
				on:change=move |ev| {
					set_selected.set(None);
					set_filter.set(event_target_value(&ev));
				}
			>
				<option value="">"All Measures"</option>
				{groups
					.into_iter()
					.map(|group| {
						view! {
							<optgroup label=group.category.group_label()>
								{group
									.options
									.into_iter()
									.map(|(id, label)| view! { <option value=id>{label}</option> })
									.collect_view()}
							</optgroup>
						}
					})
					.collect_view()}
			</select>
		</div>

		<div id="mynetwork" class="lineage-graph">
			<ForceGraphCanvas
				data=graph_data
				highlighted=highlighted
				on_select=Callback::new(select)
			/>
		</div>

		<table id="lineageTable" class="table">
			<thead>
				<tr>
					{LineageColumn::ALL
						.iter()
						.enumerate()
						.map(|(i, column)| {
							view! {
								<th
									class=move || sort.with(|s| s.class_for(i))
									on:click=move |_| set_sort.update(|s| s.click(i))
								>
									{column.title()}
								</th>
							}
						})
						.collect_view()}
				</tr>
			</thead>
			<tbody>
				<For
					each=move || rows.get()
					key=|row: &Relationship| row.measure
					children=move |row: Relationship| {
						let id = graph.with_value(|g| g.nodes()[row.measure].id.clone());
						let cells = graph.with_value(|g| {
							LineageColumn::ALL.map(|c| c.cell(g, &row))
						});
						let [measure, parents, columns] = cells;
						let is_selected = {
							let id = id.clone();
							move || selected.with(|s| s.as_deref() == Some(id.as_str()))
						};
						let row_id = id.clone();
						view! {
							<tr
								data-measure-id=id
								class:selected-row=is_selected
								on:click=move |_| select(row_id.clone())
							>
								<td class="measure-cell">{measure}</td>
								<td class="parent-cell">{parents}</td>
								<td class="columns-cell">{columns}</td>
							</tr>
						}
					}
				/>
			</tbody>
		</table>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finds_the_row_carrying_the_measure_id() {
		let ids = vec![None, Some("Total".to_string()), Some("Margin".to_string())];
		assert_eq!(row_position(ids.clone(), "Margin"), Some(2));
		assert_eq!(row_position(ids.clone(), "Total"), Some(1));
		assert_eq!(row_position(ids, "Cost"), None);
		assert_eq!(row_position(Vec::new(), ""), None);
	}
}
