//! Recording session lifecycle and the audio ingestion loop.
//!
//! One session at a time, one ingestion worker per session. The worker owns
//! both channel buffers outright; nothing else touches them, so the flush
//! policy runs without locks. Audio arrives on a FIFO queue fed by the
//! WebSocket handler and is processed strictly in arrival order.

use crate::config::ChannelMode;
use crate::dispatch::Dispatcher;
use crate::state::RelayState;
use relay_audio::{rms, split_channels, Attribution, AttributionPolicy, ChannelBuffer, FlushPolicy};
use relay_events::Speaker;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Queue poll granularity; also bounds silence-detection latency.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long `stop` waits for the ingestion worker before abandoning it.
pub const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

const AUDIO_QUEUE_CAPACITY: usize = 256;
const LEVEL_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the recording lifecycle (`idle → recording → idle`) and the inbound
/// audio queue.
pub struct SessionCoordinator {
	mode: ChannelMode,
	digital_gain: f32,
	attribution: AttributionPolicy,
	flush_policy: FlushPolicy,
	dispatcher: Dispatcher,
	state: Arc<RelayState>,
	audio_tx: Mutex<Option<mpsc::Sender<Vec<u8>>>>,
	worker: Mutex<Option<IngestionWorker>>,
}

struct IngestionWorker {
	cancel: CancellationToken,
	handle: JoinHandle<()>,
}

impl SessionCoordinator {
	pub fn new(mode: ChannelMode, digital_gain: f32, attribution: AttributionPolicy, flush_policy: FlushPolicy, dispatcher: Dispatcher, state: Arc<RelayState>) -> Arc<Self> {
		Arc::new(Self {
			mode,
			digital_gain,
			attribution,
			flush_policy,
			dispatcher,
			state,
			audio_tx: Mutex::new(None),
			worker: Mutex::new(None),
		})
	}

	/// Begin recording. No-op if a session is already running.
	///
	/// A fresh queue is created per session, so stale blocks from a previous
	/// run can never leak into the new one.
	pub async fn start(&self) {
		let mut worker = self.worker.lock().await;
		if worker.is_some() {
			debug!("start ignored, session already recording");
			return;
		}

		let (tx, rx) = mpsc::channel(AUDIO_QUEUE_CAPACITY);
		*self.audio_tx.lock().await = Some(tx);
		self.state.set_recording(true);

		let cancel = CancellationToken::new();
		let context = IngestionContext {
			mode: self.mode,
			digital_gain: self.digital_gain,
			attribution: self.attribution,
			flush_policy: self.flush_policy,
			dispatcher: self.dispatcher.clone(),
			state: Arc::clone(&self.state),
		};
		let handle = tokio::spawn(ingestion_loop(context, rx, cancel.clone()));

		*worker = Some(IngestionWorker { cancel, handle });
		info!(mode = ?self.mode, "✅ recording started");
	}

	/// End recording. No-op if already idle.
	///
	/// Signals the worker cooperatively and waits a bounded time for it to
	/// exit. Pending buffer contents are not force-flushed: a trailing
	/// partial utterance is dropped by design.
	pub async fn stop(&self) {
		let mut worker_slot = self.worker.lock().await;
		let Some(worker) = worker_slot.take() else {
			debug!("stop ignored, session already idle");
			return;
		};

		self.state.set_recording(false);
		*self.audio_tx.lock().await = None;

		worker.cancel.cancel();
		if tokio::time::timeout(STOP_JOIN_TIMEOUT, worker.handle).await.is_err() {
			warn!("ingestion worker did not exit within {STOP_JOIN_TIMEOUT:?}, abandoning it");
		}

		info!("✅ recording stopped");
	}

	/// Route one binary frame into the session queue. Frames arriving while
	/// idle are discarded; a full queue drops the block rather than stalling
	/// the event loop.
	pub async fn enqueue_audio(&self, block: Vec<u8>) {
		if !self.state.is_recording() {
			return;
		}

		let block_len = block.len() as u64;
		let guard = self.audio_tx.lock().await;
		let Some(tx) = guard.as_ref() else {
			return;
		};

		match tx.try_send(block) {
			Ok(()) => {
				self.state.blocks_received.fetch_add(1, Ordering::Relaxed);
				self.state.bytes_received.fetch_add(block_len, Ordering::Relaxed);
			}
			Err(mpsc::error::TrySendError::Full(_)) => {
				self.state.blocks_dropped.fetch_add(1, Ordering::Relaxed);
				debug!("audio queue full, block dropped");
			}
			Err(mpsc::error::TrySendError::Closed(_)) => {}
		}
	}
}

struct IngestionContext {
	mode: ChannelMode,
	digital_gain: f32,
	attribution: AttributionPolicy,
	flush_policy: FlushPolicy,
	dispatcher: Dispatcher,
	state: Arc<RelayState>,
}

/// The per-session worker: pull blocks in arrival order, attribute, buffer,
/// and probe for silence whenever the queue poll comes up empty.
async fn ingestion_loop(context: IngestionContext, mut rx: mpsc::Receiver<Vec<u8>>, cancel: CancellationToken) {
	info!(mode = ?context.mode, gain = context.digital_gain, ratio = context.attribution.dominance_ratio, "🎧 ingestion worker started");

	let (speaker_a, speaker_b) = context.mode.speakers();
	let mut buffer_a = ChannelBuffer::new(context.flush_policy);
	let mut buffer_b = ChannelBuffer::new(context.flush_policy);
	let mut last_level_log = Instant::now();

	loop {
		tokio::select! {
			() = cancel.cancelled() => {
				info!("🛑 ingestion worker cancelled");
				break;
			}
			polled = tokio::time::timeout(POLL_INTERVAL, rx.recv()) => match polled {
				Ok(Some(block)) => match context.mode {
					ChannelMode::Stereo => {
						let routed = route_stereo_block(&block, context.digital_gain, &context.attribution, &context.state, &mut buffer_a, &mut buffer_b);

						if last_level_log.elapsed() > LEVEL_LOG_INTERVAL {
							debug!(rms_left = format!("{:.0}", routed.rms_a), rms_right = format!("{:.0}", routed.rms_b), "🎚️ mic levels");
							last_level_log = Instant::now();
						}

						for (speaker, snapshot) in routed.flushes {
							context.dispatcher.dispatch(speaker, snapshot);
						}
					}
					ChannelMode::Mono => {
						// Single speaker: buffer everything, the flush policy does the rest
						if let Some(snapshot) = buffer_a.append(&block) {
							context.dispatcher.dispatch(speaker_a, snapshot);
						}
					}
				},
				Ok(None) => {
					debug!("audio queue closed");
					break;
				}
				Err(_) => {
					// Poll timeout: the primary end-of-utterance detector
					if let Some(snapshot) = buffer_a.check_silence() {
						context.dispatcher.dispatch(speaker_a, snapshot);
					}
					if context.mode == ChannelMode::Stereo {
						if let Some(snapshot) = buffer_b.check_silence() {
							context.dispatcher.dispatch(speaker_b, snapshot);
						}
					}
				}
			}
		}
	}

	info!("ingestion worker exited");
}

struct RoutedBlock {
	rms_a: f32,
	rms_b: f32,
	flushes: Vec<(Speaker, Vec<u8>)>,
}

/// Separate, attribute and buffer one interleaved block, collecting any flush
/// snapshots its appends triggered.
fn route_stereo_block(block: &[u8], gain: f32, policy: &AttributionPolicy, state: &RelayState, buffer_a: &mut ChannelBuffer, buffer_b: &mut ChannelBuffer) -> RoutedBlock {
	let (channel_a, channel_b) = split_channels(block, gain);
	let rms_a = rms(&channel_a);
	let rms_b = rms(&channel_b);

	let mut flushes = Vec::new();
	match policy.attribute(rms_a, rms_b) {
		Attribution::Neither => {
			state.blocks_discarded.fetch_add(1, Ordering::Relaxed);
		}
		Attribution::A => {
			if let Some(snapshot) = buffer_a.append(&channel_a) {
				flushes.push((Speaker::Left, snapshot));
			}
		}
		Attribution::B => {
			if let Some(snapshot) = buffer_b.append(&channel_b) {
				flushes.push((Speaker::Right, snapshot));
			}
		}
		Attribution::Both => {
			// Ambiguous overlap: both buffers get their own independent copy
			if let Some(snapshot) = buffer_a.append(&channel_a) {
				flushes.push((Speaker::Left, snapshot));
			}
			if let Some(snapshot) = buffer_b.append(&channel_b) {
				flushes.push((Speaker::Right, snapshot));
			}
		}
	}

	RoutedBlock { rms_a, rms_b, flushes }
}
