use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide counters and recording status.
///
/// Mutated from the event loop, the ingestion worker and dispatch tasks, so
/// everything is atomic; reads are heartbeat/diagnostic only.
#[derive(Debug, Default)]
pub struct RelayState {
	// Ingestion
	pub blocks_received: AtomicU64,
	pub bytes_received: AtomicU64,
	pub blocks_dropped: AtomicU64,
	pub blocks_discarded: AtomicU64,

	// Dispatch
	pub flushes: AtomicU64,
	pub dispatches_completed: AtomicU64,
	pub dispatches_failed: AtomicU64,
	pub transcripts_published: AtomicU64,

	pub is_recording: AtomicBool,
}

impl RelayState {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn set_recording(&self, value: bool) {
		self.is_recording.store(value, Ordering::Relaxed);
	}

	pub fn is_recording(&self) -> bool {
		self.is_recording.load(Ordering::Relaxed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_recording_flag_round_trip() {
		let state = RelayState::new();
		assert!(!state.is_recording());
		state.set_recording(true);
		assert!(state.is_recording());
		state.set_recording(false);
		assert!(!state.is_recording());
	}
}
