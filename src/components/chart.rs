//! Query result charts and complexity donuts, drawn by ECharts.
//!
//! Options are plain JSON built on the Rust side; the page loads `echarts`
//! as a global.

use std::sync::atomic::{AtomicUsize, Ordering};

use leptos::prelude::*;
use serde::Serialize;
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::api::ChartData;
use crate::complexity::Tier;
use crate::error::js_error_text;

const SERIES_COLOR: &str = "#0078d4";
const TRACK_COLOR: &str = "rgba(255, 255, 255, 0.1)";
const PALETTE: &[&str] = &[
	"#0078d4", "#f97316", "#22c55e", "#eab308", "#9467bd", "#ef4444", "#17becf", "#8c564b",
];

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(catch, js_namespace = echarts, js_name = init)]
	fn echarts_init(dom: &Element) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(catch, js_namespace = echarts, js_name = getInstanceByDom)]
	fn echarts_get_instance(dom: &Element) -> Result<JsValue, JsValue>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
	Bar,
	Line,
	Pie,
	Doughnut,
}

impl ChartKind {
	/// Unknown or missing types draw as bars.
	pub fn parse(name: Option<&str>) -> Self {
		match name.map(str::to_ascii_lowercase).as_deref() {
			Some("line") => ChartKind::Line,
			Some("pie") => ChartKind::Pie,
			Some("doughnut") | Some("donut") => ChartKind::Doughnut,
			_ => ChartKind::Bar,
		}
	}
}

/// Option for a query result. Labels and values beyond the shorter list are
/// dropped; pie slices never go negative.
pub fn result_option(chart: &ChartData) -> Value {
	let n = chart.labels.len().min(chart.values.len());
	let (labels, values) = (&chart.labels[..n], &chart.values[..n]);

	match ChartKind::parse(chart.chart_type.as_deref()) {
		kind @ (ChartKind::Bar | ChartKind::Line) => {
			let series_type = if kind == ChartKind::Line { "line" } else { "bar" };
			json!({
				"tooltip": { "trigger": "axis" },
				"grid": { "left": 48, "right": 16, "top": 16, "bottom": 32 },
				"xAxis": { "type": "category", "data": labels },
				"yAxis": { "type": "value" },
				"series": [{
					"type": series_type,
					"data": values,
					"itemStyle": { "color": SERIES_COLOR },
				}],
			})
		}
		kind @ (ChartKind::Pie | ChartKind::Doughnut) => {
			let radius = if kind == ChartKind::Doughnut {
				json!(["40%", "70%"])
			} else {
				json!("70%")
			};
			let slices: Vec<Value> = labels
				.iter()
				.zip(values)
				.map(|(name, v)| json!({ "name": name, "value": v.max(0.0) }))
				.collect();
			json!({
				"tooltip": { "trigger": "item" },
				"color": PALETTE,
				"series": [{ "type": "pie", "radius": radius, "data": slices }],
			})
		}
	}
}

/// Gauge ring filled clockwise from 12 o'clock to `score` out of 100, in the
/// score's tier color.
pub fn donut_option(score: u32) -> Value {
	let score = score.min(100);
	json!({
		"animation": false,
		"series": [{
			"type": "pie",
			"radius": ["80%", "100%"],
			"startAngle": 90,
			"silent": true,
			"label": { "show": false },
			"data": [
				{ "value": score, "itemStyle": { "color": Tier::for_score(score).color() } },
				{ "value": 100 - score, "itemStyle": { "color": TRACK_COLOR } },
			],
		}],
	})
}

fn call_method(target: &JsValue, name: &str, args: &[&JsValue]) -> Result<JsValue, JsValue> {
	let method: js_sys::Function = js_sys::Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
	match args {
		[] => method.call0(target),
		[a] => method.call1(target, a),
		[a, b, ..] => method.call2(target, a, b),
	}
}

fn existing_instance(element: &Element) -> Option<JsValue> {
	echarts_get_instance(element)
		.ok()
		.filter(|i| !i.is_null() && !i.is_undefined())
}

fn render(element: &Element, option: &Value) -> Result<(), JsValue> {
	let chart = match existing_instance(element) {
		Some(chart) => chart,
		None => echarts_init(element)?,
	};
	let option = option
		.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
		.map_err(JsValue::from)?;
	// replace rather than merge, so a shorter series does not keep old points
	call_method(&chart, "setOption", &[&option, &JsValue::TRUE])?;
	Ok(())
}

fn dispose(id: &str) {
	let Some(element) = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(id))
	else {
		return;
	};
	if let Some(chart) = existing_instance(&element) {
		let _ = call_method(&chart, "dispose", &[]);
	}
}

/// Draw `option` into the div `id` once it is mounted and dispose the chart
/// with the owning component.
fn mount_chart(id: String, node_ref: NodeRef<leptos::html::Div>, option: Signal<Value>) {
	Effect::new(move |_| {
		let option = option.get();
		let Some(element) = node_ref.get() else {
			return;
		};
		if let Err(e) = render(&element, &option) {
			log::error!("chart render failed: {}", js_error_text(&e));
		}
	});
	on_cleanup(move || dispose(&id));
}

fn next_donut_id() -> String {
	static NEXT: AtomicUsize = AtomicUsize::new(1);
	format!("donut-{}", NEXT.fetch_add(1, Ordering::Relaxed))
}

/// A query result chart. `id` is the DOM id of the chart element.
#[component]
pub fn ResultChart(id: String, chart: ChartData) -> impl IntoView {
	let node_ref = NodeRef::<leptos::html::Div>::new();
	let option = result_option(&chart);
	mount_chart(id.clone(), node_ref, Signal::derive(move || option.clone()));

	view! { <div id=id class="result-chart" node_ref=node_ref /> }
}

/// Complexity gauge; redraws whenever `score` changes.
#[component]
pub fn DonutChart(
	#[prop(into)] score: Signal<u32>,
	#[prop(default = 64.0)] size: f64,
	#[prop(optional, into)] class: String,
) -> impl IntoView {
	let node_ref = NodeRef::<leptos::html::Div>::new();
	let id = next_donut_id();
	mount_chart(id.clone(), node_ref, Signal::derive(move || donut_option(score.get())));

	view! {
		<div
			id=id
			class=class
			node_ref=node_ref
			style=format!("width: {size}px; height: {size}px;")
		/>
	}
}
