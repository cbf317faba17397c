//! WebSocket command surface.
//!
//! One endpoint carries everything: text frames are JSON commands, binary
//! frames are raw PCM audio blocks. Every connected client is also a
//! transcript subscriber.

use crate::session::SessionCoordinator;
use crate::state::RelayState;
use crate::subscribers::Subscribers;
use axum::{
	extract::{
		ws::{Message, WebSocket, WebSocketUpgrade},
		ConnectInfo, State,
	},
	response::IntoResponse,
	routing::get,
	Router,
};
use futures::{SinkExt, StreamExt};
use relay_events::{ClientCommand, ServerEvent};
use speech_client::{BoostingVocabulary, CorrectionTable};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
	pub session: Arc<SessionCoordinator>,
	pub subscribers: Arc<Subscribers>,
	pub boostings: Arc<RwLock<BoostingVocabulary>>,
	pub corrections: Arc<RwLock<CorrectionTable>>,
	pub corrections_path: PathBuf,
	pub state: Arc<RelayState>,
}

pub fn router(state: AppState) -> Router {
	Router::new().route("/ws", get(websocket_handler)).with_state(state)
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>, ConnectInfo(addr): ConnectInfo<SocketAddr>) -> impl IntoResponse {
	info!(%addr, "incoming websocket connection");
	ws.on_upgrade(move |socket| handle_socket(socket, state, addr))
}

async fn handle_socket(socket: WebSocket, state: AppState, addr: SocketAddr) {
	let (mut sink, mut stream) = socket.split();

	// Outbound pump: broadcasts land in this channel and drain to the socket
	let (event_tx, mut event_rx) = mpsc::unbounded_channel::<String>();
	let subscriber_id = state.subscribers.add(event_tx).await;

	let writer = tokio::spawn(async move {
		while let Some(message) = event_rx.recv().await {
			if sink.send(Message::Text(message)).await.is_err() {
				break;
			}
		}
	});

	while let Some(received) = stream.next().await {
		let Ok(message) = received else {
			break;
		};

		match message {
			Message::Binary(block) => state.session.enqueue_audio(block).await,
			Message::Text(text) => handle_command(&state, &text).await,
			Message::Close(_) => break,
			Message::Ping(_) | Message::Pong(_) => {}
		}
	}

	state.subscribers.remove(subscriber_id).await;
	writer.abort();
	let remaining = state.subscribers.count().await;
	info!(%addr, remaining, "websocket disconnected");
}

/// Decode and execute one JSON command. Malformed or unknown input is
/// ignored; the connection stays open either way.
async fn handle_command(state: &AppState, raw: &str) {
	let command = match serde_json::from_str::<ClientCommand>(raw) {
		Ok(command) => command,
		Err(e) => {
			debug!(error = %e, "ignoring malformed command frame");
			return;
		}
	};

	match command {
		ClientCommand::Start => state.session.start().await,
		ClientCommand::Stop => state.session.stop().await,
		ClientCommand::UpdateKeywords { keywords } => {
			if keywords.is_empty() {
				return;
			}
			let mut boostings = state.boostings.write().await;
			boostings.merge(&keywords);
			info!(total = boostings.len(), "📚 boosting vocabulary updated");
		}
		ClientCommand::GetCorrections => {
			let data = state.corrections.read().await.entries().clone();
			state.subscribers.broadcast(&ServerEvent::Corrections { data }).await;
		}
		ClientCommand::SaveCorrections { data } => {
			let snapshot = {
				let mut corrections = state.corrections.write().await;
				corrections.replace_all(data);
				if let Err(e) = corrections.save(&state.corrections_path) {
					warn!(error = %e, "failed to persist corrections");
				}
				corrections.entries().clone()
			};
			state.subscribers.broadcast(&ServerEvent::Corrections { data: snapshot }).await;
		}
	}
}
