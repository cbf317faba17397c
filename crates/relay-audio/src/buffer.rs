//! Per-speaker utterance buffering with the dual flush policy.
//!
//! A buffer accumulates attributed audio until either the ingestion loop
//! observes a silence gap (the primary end-of-utterance signal) or a size or
//! elapsed-time cap forces a flush mid-utterance. Both paths go through the
//! same minimum-size gate so the recognizer never sees sub-word fragments.

use std::time::{Duration, Instant};

/// Flush thresholds for one speaker's utterance buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
	/// Payloads smaller than this are discarded rather than dispatched.
	pub min_flush_bytes: usize,
	/// High-water mark; the append that crosses it forces a flush.
	pub max_pending_bytes: usize,
	/// Maximum time between flushes while input keeps arriving.
	pub max_duration: Duration,
	/// Gap in input after which pending audio counts as a finished utterance.
	pub silence_timeout: Duration,
}

impl FlushPolicy {
	/// Stereo relay defaults: short utterances, fast turnaround.
	pub fn stereo() -> Self {
		Self {
			min_flush_bytes: 4000,
			max_pending_bytes: 320_000,
			max_duration: Duration::from_secs(10),
			silence_timeout: Duration::from_millis(1000),
		}
	}

	/// Mono relay defaults: a single speaker pauses longer between thoughts.
	pub fn mono() -> Self {
		Self {
			min_flush_bytes: 3200,
			max_pending_bytes: 320_000,
			max_duration: Duration::from_secs(15),
			silence_timeout: Duration::from_millis(3000),
		}
	}
}

/// Accumulates one speaker's attributed audio until it is complete enough to
/// hand to the dispatch worker.
///
/// Owned and mutated by the single ingestion worker only; the flush snapshot
/// is moved out, so no audio is ever dispatched twice.
#[derive(Debug)]
pub struct ChannelBuffer {
	policy: FlushPolicy,
	pending: Vec<u8>,
	pub last_input_at: Instant,
	pub last_flush_at: Instant,
}

impl ChannelBuffer {
	pub fn new(policy: FlushPolicy) -> Self {
		let now = Instant::now();
		Self {
			policy,
			pending: Vec::new(),
			last_input_at: now,
			last_flush_at: now,
		}
	}

	pub fn pending_len(&self) -> usize {
		self.pending.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Append one attributed block. No-op on empty input.
	///
	/// Returns a flush snapshot when this append crossed the size high-water
	/// mark or the max-duration window since the last flush.
	pub fn append(&mut self, data: &[u8]) -> Option<Vec<u8>> {
		if data.is_empty() {
			return None;
		}

		self.pending.extend_from_slice(data);
		self.last_input_at = Instant::now();

		if self.pending.len() > self.policy.max_pending_bytes || self.last_flush_at.elapsed() > self.policy.max_duration {
			return self.flush();
		}

		None
	}

	/// Silence probe, called when the ingestion loop's poll comes up empty.
	///
	/// Flushes if there is pending audio and no input has arrived for longer
	/// than the silence timeout.
	pub fn check_silence(&mut self) -> Option<Vec<u8>> {
		if !self.pending.is_empty() && self.last_input_at.elapsed() > self.policy.silence_timeout {
			return self.flush();
		}
		None
	}

	/// Swap the pending buffer out. Payloads below the minimum size are
	/// discarded silently; either way the buffer is empty afterwards and
	/// `last_flush_at` is reset.
	fn flush(&mut self) -> Option<Vec<u8>> {
		self.last_flush_at = Instant::now();

		if self.pending.len() < self.policy.min_flush_bytes {
			self.pending.clear();
			return None;
		}

		Some(std::mem::take(&mut self.pending))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_policy() -> FlushPolicy {
		FlushPolicy {
			min_flush_bytes: 100,
			max_pending_bytes: 1000,
			max_duration: Duration::from_secs(10),
			silence_timeout: Duration::from_secs(1),
		}
	}

	#[test]
	fn test_new_buffer_is_empty() {
		let buffer = ChannelBuffer::new(test_policy());
		assert!(buffer.is_empty());
		assert_eq!(buffer.pending_len(), 0);
	}

	#[test]
	fn test_append_empty_input_is_noop() {
		let mut buffer = ChannelBuffer::new(test_policy());
		let before = buffer.last_input_at;

		std::thread::sleep(Duration::from_millis(5));
		assert!(buffer.append(&[]).is_none());

		assert!(buffer.is_empty());
		assert_eq!(buffer.last_input_at, before);
	}

	#[test]
	fn test_append_updates_last_input() {
		let mut buffer = ChannelBuffer::new(test_policy());
		let before = buffer.last_input_at;

		std::thread::sleep(Duration::from_millis(5));
		buffer.append(&[0; 50]);

		assert!(buffer.last_input_at > before);
		assert_eq!(buffer.pending_len(), 50);
	}

	#[test]
	fn test_append_below_high_water_does_not_flush() {
		let mut buffer = ChannelBuffer::new(test_policy());
		assert!(buffer.append(&[0; 500]).is_none());
		assert_eq!(buffer.pending_len(), 500);
	}

	#[test]
	fn test_force_flush_on_append_crossing_size_mark() {
		let mut buffer = ChannelBuffer::new(test_policy());
		assert!(buffer.append(&[0; 600]).is_none());

		// This append crosses 1000 pending bytes and must flush immediately,
		// not wait for a later silence check
		let snapshot = buffer.append(&[0; 600]).expect("force flush expected");
		assert_eq!(snapshot.len(), 1200);
		assert!(buffer.is_empty());
	}

	#[test]
	fn test_force_flush_on_max_duration() {
		let mut buffer = ChannelBuffer::new(test_policy());
		buffer.append(&[0; 200]);

		buffer.last_flush_at = Instant::now() - Duration::from_secs(11);
		let snapshot = buffer.append(&[0; 200]).expect("duration flush expected");
		assert_eq!(snapshot.len(), 400);
	}

	#[test]
	fn test_silence_flush_after_gap() {
		let mut buffer = ChannelBuffer::new(test_policy());
		buffer.append(&[0; 200]);

		assert!(buffer.check_silence().is_none());

		buffer.last_input_at = Instant::now() - Duration::from_millis(1100);
		let snapshot = buffer.check_silence().expect("silence flush expected");
		assert_eq!(snapshot.len(), 200);
		assert!(buffer.is_empty());
	}

	#[test]
	fn test_silence_check_on_empty_buffer_is_noop() {
		let mut buffer = ChannelBuffer::new(test_policy());
		buffer.last_input_at = Instant::now() - Duration::from_secs(60);
		assert!(buffer.check_silence().is_none());
	}

	#[test]
	fn test_flush_never_emits_below_minimum() {
		let mut buffer = ChannelBuffer::new(test_policy());
		buffer.append(&[0; 50]);

		buffer.last_input_at = Instant::now() - Duration::from_secs(2);
		assert!(buffer.check_silence().is_none());

		// The short payload is discarded, not retained
		assert!(buffer.is_empty());
	}

	#[test]
	fn test_flush_resets_last_flush_at() {
		let mut buffer = ChannelBuffer::new(test_policy());
		buffer.append(&[0; 200]);

		let stale = Instant::now() - Duration::from_secs(5);
		buffer.last_flush_at = stale;
		buffer.last_input_at = Instant::now() - Duration::from_secs(2);

		buffer.check_silence().expect("flush expected");
		assert!(buffer.last_flush_at > stale);
	}

	#[test]
	fn test_discarding_flush_also_resets_last_flush_at() {
		let mut buffer = ChannelBuffer::new(test_policy());
		buffer.append(&[0; 50]);

		let stale = Instant::now() - Duration::from_secs(11);
		buffer.last_flush_at = stale;

		// Below minimum: discarded, but the flush clock still restarts so the
		// next append does not immediately re-trigger the duration cap
		buffer.last_input_at = Instant::now() - Duration::from_secs(2);
		assert!(buffer.check_silence().is_none());
		assert!(buffer.last_flush_at > stale);
	}

	#[test]
	fn test_no_data_is_flushed_twice() {
		let mut buffer = ChannelBuffer::new(test_policy());
		buffer.append(&[7; 200]);

		buffer.last_input_at = Instant::now() - Duration::from_secs(2);
		let first = buffer.check_silence().expect("flush expected");
		assert_eq!(first.len(), 200);

		buffer.last_input_at = Instant::now() - Duration::from_secs(2);
		assert!(buffer.check_silence().is_none());
	}

	#[test]
	fn test_continuous_input_flushes_by_size_before_duration() {
		// 21 seconds of audio at a rate that crosses the byte mark first:
		// the size trigger must fire even though the duration cap has not
		let mut buffer = ChannelBuffer::new(FlushPolicy::stereo());

		let mut flushes = Vec::new();
		// 32000 bytes/s of mono 16-bit audio in 2048-byte blocks
		for _ in 0..400 {
			if let Some(snapshot) = buffer.append(&[0; 2048]) {
				flushes.push(snapshot);
			}
		}

		assert!(!flushes.is_empty());
		for snapshot in &flushes {
			assert!(snapshot.len() > 320_000);
		}
	}
}
