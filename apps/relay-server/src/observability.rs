use crate::state::RelayState;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber. Local logs only; the relay runs on a
/// single LAN box.
pub fn init_tracing() {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,relay_server=debug"));

	tracing_subscriber::registry().with(env_filter).with(tracing_subscriber::fmt::layer().with_target(true)).init();
}

/// Periodic service-health log of the ingestion and dispatch counters.
pub fn spawn_heartbeat(state: Arc<RelayState>, interval: Duration) {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(interval);
		ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
		// The first tick fires immediately; skip it
		ticker.tick().await;

		loop {
			ticker.tick().await;
			info!(
				blocks_received = state.blocks_received.load(Ordering::Relaxed),
				bytes_received = state.bytes_received.load(Ordering::Relaxed),
				blocks_dropped = state.blocks_dropped.load(Ordering::Relaxed),
				blocks_discarded = state.blocks_discarded.load(Ordering::Relaxed),
				flushes = state.flushes.load(Ordering::Relaxed),
				dispatches_completed = state.dispatches_completed.load(Ordering::Relaxed),
				dispatches_failed = state.dispatches_failed.load(Ordering::Relaxed),
				transcripts_published = state.transcripts_published.load(Ordering::Relaxed),
				is_recording = state.is_recording(),
				"💓 heartbeat"
			);
		}
	});
}
