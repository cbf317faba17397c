//! ffmpeg invocations for the offline pipeline: normalize any recording to
//! 16kHz mono WAV, then split it into fixed-length chunks the recognizer's
//! synchronous endpoint will accept.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Convert a recording to 16kHz mono WAV next to the input file.
pub async fn convert_to_wav(ffmpeg: &str, input: &Path) -> Result<PathBuf> {
	let wav_path = input.with_extension("wav");
	info!(input = %input.display(), "🔄 converting to 16kHz mono wav");

	let output = Command::new(ffmpeg)
		.arg("-i")
		.arg(input)
		.args(["-ar", "16000", "-ac", "1", "-y"])
		.arg(&wav_path)
		.output()
		.await
		.with_context(|| format!("failed to run {ffmpeg}"))?;

	if !output.status.success() {
		bail!("ffmpeg conversion failed for {}: {}", input.display(), String::from_utf8_lossy(&output.stderr));
	}

	Ok(wav_path)
}

/// Split a WAV file into `segment_secs` chunks with stream copy (no
/// re-encode). Returns the sorted chunk paths and the directory holding
/// them, which the caller removes after upload.
pub async fn split_wav(ffmpeg: &str, wav: &Path, segment_secs: u32) -> Result<(Vec<PathBuf>, PathBuf)> {
	let stem = wav.file_stem().and_then(|s| s.to_str()).unwrap_or("session");
	let parent = wav.parent().unwrap_or_else(|| Path::new("."));
	let chunk_dir = parent.join(format!("chunks_{stem}"));

	if chunk_dir.exists() {
		tokio::fs::remove_dir_all(&chunk_dir).await?;
	}
	tokio::fs::create_dir_all(&chunk_dir).await?;

	info!(wav = %wav.display(), segment_secs, "✂️ splitting into chunks");

	let pattern = chunk_dir.join("chunk_%03d.wav");
	let output = Command::new(ffmpeg)
		.arg("-i")
		.arg(wav)
		.args(["-f", "segment", "-segment_time", &segment_secs.to_string(), "-c", "copy"])
		.arg(&pattern)
		.output()
		.await
		.with_context(|| format!("failed to run {ffmpeg}"))?;

	if !output.status.success() {
		bail!("ffmpeg segmenting failed for {}: {}", wav.display(), String::from_utf8_lossy(&output.stderr));
	}

	let mut chunks = Vec::new();
	let mut entries = tokio::fs::read_dir(&chunk_dir).await?;
	while let Some(entry) = entries.next_entry().await? {
		let path = entry.path();
		if path.extension().and_then(|e| e.to_str()) == Some("wav") {
			chunks.push(path);
		}
	}
	chunks.sort();

	debug!(chunks = chunks.len(), "chunking complete");
	Ok((chunks, chunk_dir))
}
