use leptos::prelude::*;

use super::chart::ResultChart;
use crate::api;
use crate::config::AppConfig;
use crate::query::{ChatEntry, answer_entry};

/// Free-text question box whose answers render as chat bubbles.
#[component]
pub fn QueryChat() -> impl IntoView {
	let endpoint = StoredValue::new(expect_context::<AppConfig>().query_endpoint);
	let entries = RwSignal::new(Vec::<(u64, ChatEntry)>::new());
	let next_id = StoredValue::new(0u64);
	let (input, set_input) = signal(String::new());
	let container_ref = NodeRef::<leptos::html::Div>::new();

	let push = move |entry: ChatEntry| -> u64 {
		let id = next_id.get_value();
		next_id.set_value(id + 1);
		entries.update(|e| e.push((id, entry)));
		if let Some(container) = container_ref.get_untracked() {
			request_animation_frame(move || {
				container.set_scroll_top(container.scroll_height());
			});
		}
		id
	};

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let query = input.get_untracked().trim().to_string();
		if query.is_empty() {
			return;
		}
		push(ChatEntry::User(query.clone()));
		set_input.set(String::new());

		leptos::task::spawn_local(async move {
			let outcome = api::send_query(&endpoint.get_value(), &query).await;
			if let Err(e) = &outcome {
				log::error!("query failed: {e}");
			}
			// unique per page lifetime
			let chart_id = format!("chart-{}", next_id.get_value());
			push(answer_entry(outcome, chart_id));
		});
	};

	view! {
		<div class="chat-container" node_ref=container_ref>
			<For each=move || entries.get() key=|(id, _)| *id let:item>
				{match item.1 {
					ChatEntry::User(text) => {
						view! { <div class="message user-message">{text}</div> }.into_any()
					}
					ChatEntry::System(text) => {
						view! { <div class="message system-message">{text}</div> }.into_any()
					}
					ChatEntry::Answer(text) => {
						view! { <div class="data-card mt-3">{text}</div> }.into_any()
					}
					ChatEntry::Chart { chart_id, explanation, chart } => {
						view! {
							<div class="data-card mt-3">
								<p>{explanation}</p>
								<div class="chart-container" style="height: 300px;">
									<ResultChart id=chart_id chart=chart />
								</div>
							</div>
						}
							.into_any()
					}
				}}
			</For>
		</div>
		<form id="query-form" on:submit=on_submit>
			<input
				class="query-input"
				type="text"
				placeholder="Ask a question about your model..."
				prop:value=input
				on:input=move |ev| set_input.set(event_target_value(&ev))
			/>
			<button type="submit" class="btn btn-primary">
				<i class="fas fa-paper-plane"></i>
			</button>
		</form>
	}
}
