use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

// requestAnimationFrame handles are always non-zero
const NO_FRAME: i32 = 0;

/// Run flag and pending frame of one canvas animation loop.
///
/// Shared between the frame callback and the unmount cleanup, which has to be
/// `Send`.
#[derive(Clone, Debug)]
pub struct FrameLoop {
	running: Arc<AtomicBool>,
	pending: Arc<AtomicI32>,
}

impl FrameLoop {
	pub fn new() -> Self {
		Self {
			running: Arc::new(AtomicBool::new(true)),
			pending: Arc::new(AtomicI32::new(NO_FRAME)),
		}
	}

	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::Acquire)
	}

	pub fn scheduled(&self, handle: i32) {
		self.pending.store(handle, Ordering::Release);
	}

	pub fn fired(&self) {
		self.pending.store(NO_FRAME, Ordering::Release);
	}

	/// Stop the loop. Returns the frame still queued, which the caller cancels.
	pub fn stop(&self) -> Option<i32> {
		self.running.store(false, Ordering::Release);
		let handle = self.pending.swap(NO_FRAME, Ordering::AcqRel);
		(handle != NO_FRAME).then_some(handle)
	}
}
