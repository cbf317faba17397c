use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "batch-transcriber")]
#[command(about = "Offline transcription of recorded sessions", long_about = None)]
pub struct Config {
	/// Directory of recorded session files (mp4/m4a/wav/mp3)
	#[arg(long, env = "RECORDINGS_DIR", default_value = "recordings")]
	pub recordings_dir: PathBuf,

	/// Output directory for transcripts
	#[arg(long, env = "TRANSCRIPTS_DIR", default_value = "transcripts")]
	pub transcripts_dir: PathBuf,

	/// Speech API invoke URL
	#[arg(long, env = "SPEECH_INVOKE_URL")]
	pub invoke_url: String,

	/// Speech API secret key
	#[arg(long, env = "SPEECH_SECRET_KEY")]
	pub secret_key: String,

	/// Recognition language tag
	#[arg(long, env = "SPEECH_LANGUAGE", default_value = "ko-KR")]
	pub language: String,

	/// Chunk length in seconds for the upload splits
	#[arg(long, env = "SEGMENT_SECS", default_value = "60")]
	pub segment_secs: u32,

	/// ffmpeg executable
	#[arg(long, env = "FFMPEG_PATH", default_value = "ffmpeg")]
	pub ffmpeg_path: String,

	/// Boosting vocabulary file
	#[arg(long, env = "BOOSTINGS_PATH", default_value = "boostings.txt")]
	pub boostings_path: PathBuf,
}

impl Config {
	/// Validate configuration values
	pub fn validate(&self) -> Result<(), String> {
		if self.segment_secs == 0 {
			return Err("segment_secs must be greater than 0".to_string());
		}

		if self.invoke_url.is_empty() {
			return Err("invoke_url must not be empty".to_string());
		}

		Ok(())
	}
}
