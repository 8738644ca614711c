use leptos::prelude::*;

use crate::clipboard::copy_text;
use crate::components::chart::DonutChart;
use crate::components::toast::Toasts;
use crate::complexity::{ComplexityScore, unescape_expression};
use crate::config::AppConfig;
use crate::page_data::read_global_or_default;
use crate::timer::{Generation, after};

#[derive(Clone, Debug, PartialEq)]
struct Expression {
	name: String,
	text: String,
	score: ComplexityScore,
}

impl Expression {
	fn new(name: String, raw: &str) -> Self {
		let text = unescape_expression(raw);
		let score = ComplexityScore::of(&text);
		Self { name, text, score }
	}

	/// `term` must already be lower-cased.
	fn matches(&self, term: &str) -> bool {
		term.is_empty()
			|| self.name.to_lowercase().contains(term)
			|| self.text.to_lowercase().contains(term)
	}
}

/// A copy button's icon state; the check mark reverts after a delay unless a
/// newer copy re-armed it.
#[derive(Clone, Copy)]
struct CopyFeedback {
	copied: RwSignal<bool>,
	generation: StoredValue<Generation>,
}

impl CopyFeedback {
	fn new() -> Self {
		Self {
			copied: RwSignal::new(false),
			generation: StoredValue::new(Generation::default()),
		}
	}

	fn icon(&self) -> &'static str {
		if self.copied.get() { "fas fa-check" } else { "fas fa-copy" }
	}

	fn copy(self, text: String, toasts: Toasts, revert_ms: u32) {
		leptos::task::spawn_local(async move {
			match copy_text(&text).await {
				Ok(()) => {
					self.copied.set(true);
					let ticket = self.generation.try_update_value(Generation::arm).unwrap_or_default();
					toasts.success("Expression copied to clipboard!");
					after(revert_ms, move || {
						if self.generation.with_value(|g| g.is_current(ticket)) {
							self.copied.set(false);
						}
					});
				}
				Err(e) => {
					log::warn!("clipboard write failed: {e}");
					toasts.error("Failed to copy expression");
				}
			}
		});
	}
}

#[component]
fn ScoreRow(label: &'static str, value: u32) -> impl IntoView {
	view! {
		<div class="score-row">
			<span class="score-label">{label}</span>
			<span class="score-value">{format!("{value}%")}</span>
		</div>
	}
}

#[component]
fn ExpressionModal(expression: Expression, on_close: Callback<()>) -> impl IntoView {
	let revert_ms = expect_context::<AppConfig>().copy_timeout_ms;
	let toasts = expect_context::<Toasts>();
	let feedback = CopyFeedback::new();
	let score = expression.score;
	let text = StoredValue::new(expression.text.clone());

	view! {
		<div class="modal-backdrop" on:click=move |_| on_close.run(())>
			<div class="modal-content" on:click=|ev| ev.stop_propagation()>
				<div class="modal-header">
					<h2>{expression.name}</h2>
					<button class="btn modal-close" on:click=move |_| on_close.run(())>
						<i class="fas fa-times"></i>
					</button>
				</div>
				<div class="modal-scores">
					<DonutChart score=score.total size=120.0 class="modal-donut" />
					<div class="complexity-score" style=format!("color: {};", score.tier().color())>
						{format!("{}%", score.total)}
					</div>
					<ScoreRow label="Length" value=score.length />
					<ScoreRow label="Functions" value=score.functions />
					<ScoreRow label="Nesting" value=score.nesting />
				</div>
				<div class="code-wrapper">
					<button
						class="btn copy-button"
						on:click=move |_| {
							feedback.copy(text.get_value(), toasts, revert_ms)
						}
					>
						<i class=move || feedback.icon()></i>
					</button>
					<pre><code>{expression.text}</code></pre>
				</div>
			</div>
		</div>
	}
}

#[component]
fn ExpressionCard(expression: Expression, on_expand: Callback<Expression>) -> impl IntoView {
	let revert_ms = expect_context::<AppConfig>().copy_timeout_ms;
	let toasts = expect_context::<Toasts>();
	let feedback = CopyFeedback::new();
	let total = expression.score.total;
	let tier_color = format!("color: {};", expression.score.tier().color());
	let stored = StoredValue::new(expression.clone());

	view! {
		<div class="expression-card">
			<div class="card-header">
				<h3>{expression.name}</h3>
				<div class="complexity">
					<DonutChart score=total />
					<span class="complexity-score" style=tier_color>{format!("{total}%")}</span>
				</div>
			</div>
			<div class="code-wrapper">
				<button
					class="btn copy-button"
					on:click=move |_| {
						feedback.copy(stored.with_value(|e| e.text.clone()), toasts, revert_ms)
					}
				>
					<i class=move || feedback.icon()></i>
				</button>
				<button class="btn expand-button" on:click=move |_| on_expand.run(stored.get_value())>
					<i class="fas fa-expand"></i>
				</button>
				<pre><code>{expression.text}</code></pre>
			</div>
		</div>
	}
}

/// Cards for each DAX expression, scored by complexity.
#[component]
pub fn DaxExplorer() -> impl IntoView {
	let expressions: Vec<Expression> =
		read_global_or_default::<Vec<(String, String)>>("daxExpressions")
			.into_iter()
			.map(|(name, raw)| Expression::new(name, &raw))
			.collect();
	log::info!("dax explorer: {} expressions", expressions.len());
	let expressions = StoredValue::new(expressions);

	let (search, set_search) = signal(String::new());
	let (expanded, set_expanded) = signal(Option::<Expression>::None);

	let visible = move || {
		let term = search.get();
		expressions.with_value(|all| {
			all.iter()
				.enumerate()
				.filter(|(_, e)| e.matches(&term))
				.map(|(i, e)| (i, e.clone()))
				.collect::<Vec<_>>()
		})
	};

	let on_expand = Callback::new(move |e: Expression| set_expanded.set(Some(e)));
	let on_close = Callback::new(move |()| set_expanded.set(None));

	view! {
		<div class="dax-toolbar">
			<input
				id="daxSearch"
				type="text"
				placeholder="Search expressions..."
				on:input=move |ev| set_search.set(event_target_value(&ev).to_lowercase())
			/>
		</div>

		<div class="expressions-grid">
			<For each=visible key=|(i, _)| *i let:item>
				<ExpressionCard expression=item.1 on_expand=on_expand />
			</For>
		</div>

		{move || {
			expanded
				.get()
				.map(|expression| view! { <ExpressionModal expression=expression on_close=on_close /> })
		}}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expressions_are_unescaped_before_scoring() {
		let e = Expression::new("Total".into(), "SUM(Sales[Amount])\\n");
		assert_eq!(e.text, "SUM(Sales[Amount])\n");
		assert_eq!(e.score, ComplexityScore::of("SUM(Sales[Amount])\n"));
	}

	#[test]
	fn search_matches_name_or_expression() {
		let e = Expression::new("Total Sales".into(), "CALCULATE(SUM(Sales[Amount]))");
		assert!(e.matches(""));
		assert!(e.matches("total"));
		assert!(e.matches("calculate"));
		assert!(e.matches("sales[amount]"));
		assert!(!e.matches("margin"));
	}
}
