mod config;
mod dispatch;
mod observability;
mod server;
mod session;
mod state;
mod subscribers;

use anyhow::Result;
use clap::Parser;
use config::Config;
use dispatch::Dispatcher;
use session::SessionCoordinator;
use speech_client::{BoostingVocabulary, CorrectionTable, SpeechClient};
use state::RelayState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use subscribers::Subscribers;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{info, warn};

const RECOGNIZE_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
	dotenvy::dotenv().ok();

	let config = Config::parse();
	config.validate().map_err(anyhow::Error::msg)?;

	observability::init_tracing();

	info!(
		mode = ?config.mode,
		gain = config.digital_gain,
		ratio = config.dominance_ratio,
		"🎯 starting speech relay"
	);

	let boostings = load_boostings(&config);
	let corrections = load_corrections(&config);

	let client = SpeechClient::new(&config.invoke_url, &config.secret_key, RECOGNIZE_TIMEOUT)?;

	let state = RelayState::new();
	let subscribers = Subscribers::new();
	let boostings = Arc::new(RwLock::new(boostings));
	let corrections = Arc::new(RwLock::new(corrections));

	let dispatcher = Dispatcher::new(
		client,
		config.language.clone(),
		Arc::clone(&boostings),
		Arc::clone(&corrections),
		Arc::clone(&subscribers),
		Arc::clone(&state),
		config.max_inflight_dispatches,
	);

	let session = SessionCoordinator::new(
		config.mode,
		config.digital_gain,
		config.attribution_policy(),
		config.flush_policy(),
		dispatcher,
		Arc::clone(&state),
	);

	observability::spawn_heartbeat(Arc::clone(&state), Duration::from_secs(config.heartbeat_interval_secs));

	let app = server::router(server::AppState {
		session,
		subscribers,
		boostings,
		corrections,
		corrections_path: config.corrections_path.clone(),
		state,
	});

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
	info!(addr = %listener.local_addr()?, "🚀 relay listening");

	axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
		.with_graceful_shutdown(wait_for_shutdown_signal())
		.await?;

	info!("✅ relay shut down");
	Ok(())
}

fn load_boostings(config: &Config) -> BoostingVocabulary {
	if !config.boostings_path.exists() {
		info!(path = %config.boostings_path.display(), "no boostings file, starting with an empty vocabulary");
		return BoostingVocabulary::default();
	}

	match BoostingVocabulary::load(&config.boostings_path) {
		Ok(vocabulary) => vocabulary,
		Err(e) => {
			warn!(error = %e, "⚠️ failed to load boostings, starting empty");
			BoostingVocabulary::default()
		}
	}
}

fn load_corrections(config: &Config) -> CorrectionTable {
	match CorrectionTable::load(&config.corrections_path) {
		Ok(table) => table,
		Err(e) => {
			warn!(error = %e, "⚠️ failed to load corrections, starting empty");
			CorrectionTable::default()
		}
	}
}

async fn wait_for_shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install SIGTERM handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	info!("🛑 shutdown signal received");
}
