use leptos::prelude::*;

use crate::timer::after;

const SHOW_DELAY_MS: u32 = 100;
const FADE_MS: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
	Success,
	Error,
}

impl ToastKind {
	fn class(self) -> &'static str {
		match self {
			ToastKind::Success => "success",
			ToastKind::Error => "error",
		}
	}

	fn icon(self) -> &'static str {
		match self {
			ToastKind::Success => "fas fa-check",
			ToastKind::Error => "fas fa-exclamation-circle",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
struct Toast {
	id: u64,
	message: String,
	kind: ToastKind,
	shown: bool,
}

/// Transient notifications; each toast fades in, stays for `timeout_ms`, then
/// fades out and is removed.
#[derive(Clone, Copy)]
pub struct Toasts {
	items: RwSignal<Vec<Toast>>,
	next_id: StoredValue<u64>,
	timeout_ms: u32,
}

impl Toasts {
	pub fn new(timeout_ms: u32) -> Self {
		Self {
			items: RwSignal::new(Vec::new()),
			next_id: StoredValue::new(0),
			timeout_ms,
		}
	}

	pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
		let id = self.next_id.get_value();
		self.next_id.set_value(id + 1);
		self.items.update(|items| {
			items.push(Toast {
				id,
				message: message.into(),
				kind,
				shown: false,
			})
		});

		let items = self.items;
		let set_shown = move |shown: bool| {
			items.update(|items| {
				if let Some(t) = items.iter_mut().find(|t| t.id == id) {
					t.shown = shown;
				}
			})
		};
		after(SHOW_DELAY_MS, move || set_shown(true));
		after(self.timeout_ms, move || {
			set_shown(false);
			after(FADE_MS, move || items.update(|items| items.retain(|t| t.id != id)));
		});
	}

	pub fn success(&self, message: impl Into<String>) {
		self.show(message, ToastKind::Success);
	}

	pub fn error(&self, message: impl Into<String>) {
		self.show(message, ToastKind::Error);
	}
}

/// Renders the toasts provided through context.
#[component]
pub fn ToastHost() -> impl IntoView {
	let toasts = expect_context::<Toasts>();

	view! {
		<div class="toast-host">
			<For each=move || toasts.items.get() key=|t| (t.id, t.shown) let:toast>
				<div class=format!(
					"toast {}{}",
					toast.kind.class(),
					if toast.shown { " show" } else { "" },
				)>
					<i class=toast.kind.icon()></i>
					<span>{toast.message.clone()}</span>
				</div>
			</For>
		</div>
	}
}
