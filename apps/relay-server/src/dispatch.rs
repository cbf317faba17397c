//! Off-path transcription dispatch.
//!
//! Each flushed utterance becomes one detached task: WAV-frame the PCM,
//! upload, correct, broadcast. A semaphore bounds how many uploads run at
//! once under bursty flushing; the permit is acquired inside the task so the
//! ingestion worker never waits on it. Failures drop the utterance — the
//! session must keep flowing whether or not the cloud answers.

use crate::state::RelayState;
use crate::subscribers::Subscribers;
use relay_audio::wrap_pcm;
use relay_events::{ServerEvent, Speaker};
use speech_client::{BoostingVocabulary, CorrectionTable, RecognizeParams, SpeechClient};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::{RwLock, Semaphore};
use tracing::{debug, info, warn};

/// Clonable handle that ships flushed utterances to the recognizer without
/// blocking the ingestion loop.
#[derive(Clone)]
pub struct Dispatcher {
	client: SpeechClient,
	language: String,
	boostings: Arc<RwLock<BoostingVocabulary>>,
	corrections: Arc<RwLock<CorrectionTable>>,
	subscribers: Arc<Subscribers>,
	state: Arc<RelayState>,
	limiter: Arc<Semaphore>,
}

impl Dispatcher {
	pub fn new(
		client: SpeechClient,
		language: String,
		boostings: Arc<RwLock<BoostingVocabulary>>,
		corrections: Arc<RwLock<CorrectionTable>>,
		subscribers: Arc<Subscribers>,
		state: Arc<RelayState>,
		max_inflight: usize,
	) -> Self {
		Self {
			client,
			language,
			boostings,
			corrections,
			subscribers,
			state,
			limiter: Arc::new(Semaphore::new(max_inflight)),
		}
	}

	/// Spawn one detached recognition task for a flushed utterance.
	///
	/// Dispatches for different speakers run concurrently; published
	/// transcripts carry the speaker tag but no cross-speaker ordering.
	pub fn dispatch(&self, speaker: Speaker, pcm: Vec<u8>) {
		self.state.flushes.fetch_add(1, Ordering::Relaxed);

		let this = self.clone();
		tokio::spawn(async move {
			let Ok(_permit) = Arc::clone(&this.limiter).acquire_owned().await else {
				return;
			};

			let params = {
				let boostings = this.boostings.read().await;
				RecognizeParams::relay(&this.language, &boostings)
			};

			debug!(%speaker, bytes = pcm.len(), "📤 dispatching utterance");
			let wav = wrap_pcm(&pcm);

			match this.client.recognize(wav, &params).await {
				Ok(response) if !response.text.is_empty() => {
					let corrected = this.corrections.read().await.apply(&response.text);
					if corrected != response.text {
						debug!(original = %response.text, corrected = %corrected, "🔧 corrections applied");
					}

					info!(%speaker, text = %corrected, "📝 transcript");
					this.subscribers.broadcast(&ServerEvent::Transcript { text: corrected, speaker }).await;

					this.state.dispatches_completed.fetch_add(1, Ordering::Relaxed);
					this.state.transcripts_published.fetch_add(1, Ordering::Relaxed);
				}
				Ok(_) => {
					debug!(%speaker, "⚪ empty recognition result");
					this.state.dispatches_completed.fetch_add(1, Ordering::Relaxed);
				}
				Err(e) => {
					// No retry, no requeue: the utterance is lost, the session is not
					warn!(%speaker, error = %e, "❌ recognition failed, utterance dropped");
					this.state.dispatches_failed.fetch_add(1, Ordering::Relaxed);
				}
			}
		});
	}
}
