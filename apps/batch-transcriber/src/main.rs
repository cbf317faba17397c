mod config;
mod ffmpeg;
mod pipeline;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use speech_client::{BoostingVocabulary, RecognizeParams, RecognizeResponse, SpeechClient};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const RECOGNIZE_TIMEOUT: Duration = Duration::from_secs(30);
const CHUNK_PAUSE: Duration = Duration::from_millis(500);
const AUDIO_EXTENSIONS: [&str; 4] = ["mp4", "m4a", "wav", "mp3"];

#[tokio::main]
async fn main() -> Result<()> {
	dotenvy::dotenv().ok();

	let config = Config::parse();
	config.validate().map_err(anyhow::Error::msg)?;

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,batch_transcriber=debug"));
	tracing_subscriber::registry().with(env_filter).with(tracing_subscriber::fmt::layer().with_target(true)).init();

	let boostings = load_boostings(&config.boostings_path);
	let client = SpeechClient::new(&config.invoke_url, &config.secret_key, RECOGNIZE_TIMEOUT)?;

	tokio::fs::create_dir_all(&config.transcripts_dir).await?;

	let recordings = scan_recordings(&config.recordings_dir)?;
	if recordings.is_empty() {
		warn!(dir = %config.recordings_dir.display(), "no audio files found");
		return Ok(());
	}

	info!(files = recordings.len(), "found recordings to process");

	for recording in recordings {
		let stem = recording.file_stem().and_then(|s| s.to_str()).unwrap_or("session").to_string();
		let json_path = config.transcripts_dir.join(format!("{stem}.json"));
		let txt_path = config.transcripts_dir.join(format!("{stem}.txt"));

		if json_path.exists() {
			info!(file = %recording.display(), "⏭️ already processed, skipping");
			continue;
		}

		match process_recording(&config, &client, &boostings, &recording).await {
			Ok(transcript) if !transcript.is_empty() => {
				tokio::fs::write(&json_path, serde_json::to_string_pretty(&transcript)?).await?;
				tokio::fs::write(&txt_path, &transcript.text).await?;
				info!(output = %txt_path.display(), "💾 transcript saved");
			}
			Ok(_) => warn!(file = %recording.display(), "⚠️ nothing recognized"),
			Err(e) => warn!(file = %recording.display(), error = %e, "❌ processing failed"),
		}
	}

	Ok(())
}

/// Audio files in the recordings directory, in name order.
fn scan_recordings(dir: &Path) -> Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	for entry in std::fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))? {
		let path = entry?.path();
		let is_audio = path
			.extension()
			.and_then(|e| e.to_str())
			.map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
			.unwrap_or(false);
		if is_audio {
			files.push(path);
		}
	}
	files.sort();
	Ok(files)
}

/// Convert, chunk, upload and merge one recording.
async fn process_recording(config: &Config, client: &SpeechClient, boostings: &BoostingVocabulary, recording: &Path) -> Result<pipeline::SessionTranscript> {
	info!(file = %recording.display(), "🎬 processing recording");

	// Already-normalized WAV input skips the conversion pass
	let is_wav = recording.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("wav")).unwrap_or(false);
	let wav_path = if is_wav {
		recording.to_path_buf()
	} else {
		ffmpeg::convert_to_wav(&config.ffmpeg_path, recording).await?
	};

	let (chunks, chunk_dir) = ffmpeg::split_wav(&config.ffmpeg_path, &wav_path, config.segment_secs).await?;
	info!(chunks = chunks.len(), "🚀 transcribing chunks");

	let params = RecognizeParams::batch(&config.language, boostings);
	let mut results: Vec<Option<RecognizeResponse>> = Vec::with_capacity(chunks.len());

	for (index, chunk) in chunks.iter().enumerate() {
		let wav = tokio::fs::read(chunk).await?;
		match client.recognize(wav, &params).await {
			Ok(response) => results.push(Some(response)),
			Err(e) => {
				warn!(chunk = index + 1, error = %e, "chunk recognition failed");
				results.push(None);
			}
		}
		// Politeness pause between uploads
		tokio::time::sleep(CHUNK_PAUSE).await;
	}

	let transcript = pipeline::merge_chunk_results(&results, u64::from(config.segment_secs));

	// Cleanup: chunks always, the intermediate wav only if we created it
	if let Err(e) = tokio::fs::remove_dir_all(&chunk_dir).await {
		warn!(dir = %chunk_dir.display(), error = %e, "failed to remove chunk directory");
	}
	if wav_path != recording {
		if let Err(e) = tokio::fs::remove_file(&wav_path).await {
			warn!(file = %wav_path.display(), error = %e, "failed to remove intermediate wav");
		}
	}

	info!(file = %recording.display(), "✅ transcription complete");
	Ok(transcript)
}

fn load_boostings(path: &Path) -> BoostingVocabulary {
	if !path.exists() {
		return BoostingVocabulary::default();
	}
	match BoostingVocabulary::load(path) {
		Ok(vocabulary) => vocabulary,
		Err(e) => {
			warn!(error = %e, "⚠️ failed to load boostings, continuing without");
			BoostingVocabulary::default()
		}
	}
}
