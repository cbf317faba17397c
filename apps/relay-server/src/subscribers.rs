use relay_events::ServerEvent;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

/// Connected WebSocket subscribers and the outbound event fan-out.
///
/// Each subscriber is an unbounded sender into that connection's write pump.
/// Broadcast snapshots the sender list before iterating, so connects and
/// disconnects during a broadcast cannot invalidate the iteration, and a
/// failed send to one subscriber never blocks delivery to the rest.
#[derive(Debug, Default)]
pub struct Subscribers {
	senders: Mutex<HashMap<u64, mpsc::UnboundedSender<String>>>,
	next_id: AtomicU64,
}

impl Subscribers {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub async fn add(&self, sender: mpsc::UnboundedSender<String>) -> u64 {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		self.senders.lock().await.insert(id, sender);
		id
	}

	pub async fn remove(&self, id: u64) {
		self.senders.lock().await.remove(&id);
	}

	pub async fn count(&self) -> usize {
		self.senders.lock().await.len()
	}

	/// Serialize once and fan out. Send failures are counted, not propagated.
	pub async fn broadcast(&self, event: &ServerEvent) {
		let message = match event.to_json() {
			Ok(message) => message,
			Err(e) => {
				warn!(error = %e, "failed to encode outbound event");
				return;
			}
		};

		let snapshot: Vec<mpsc::UnboundedSender<String>> = self.senders.lock().await.values().cloned().collect();
		if snapshot.is_empty() {
			return;
		}

		let mut failed = 0_usize;
		for sender in &snapshot {
			if sender.send(message.clone()).is_err() {
				failed += 1;
			}
		}

		if failed > 0 {
			debug!(failed, total = snapshot.len(), "some subscribers missed a broadcast");
		}
	}
}
