use gloo_timers::future::TimeoutFuture;

/// Identifies one arming of a timer; see [`Generation`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ticket(u64);

/// Tracks which arming of a repeatable timer is the latest.
///
/// A callback armed with a ticket only acts while that ticket is current, so a
/// burst of triggers resolves to the state of the last one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Generation {
	current: u64,
}

impl Generation {
	pub fn arm(&mut self) -> Ticket {
		self.current += 1;
		Ticket(self.current)
	}

	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.current == ticket.0
	}
}

/// Run `f` once after `ms` milliseconds on the UI thread.
pub fn after(ms: u32, f: impl FnOnce() + 'static) {
	leptos::task::spawn_local(async move {
		TimeoutFuture::new(ms).await;
		f();
	});
}
