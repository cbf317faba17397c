use clap::{Parser, ValueEnum};
use relay_audio::{AttributionPolicy, FlushPolicy};
use relay_events::Speaker;
use std::path::PathBuf;
use std::time::Duration;

/// Input channel layout of the consultation-room microphone feed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
	/// Interleaved two-channel feed, one speaker per channel.
	Stereo,
	/// Flat single-channel feed from the director's desk mic.
	Mono,
}

impl ChannelMode {
	/// Speaker labels for the (first, second) channel buffer.
	pub fn speakers(self) -> (Speaker, Speaker) {
		match self {
			ChannelMode::Stereo => (Speaker::Left, Speaker::Right),
			ChannelMode::Mono => (Speaker::Director, Speaker::Director),
		}
	}
}

#[derive(Parser, Debug, Clone)]
#[command(name = "relay-server")]
#[command(about = "Live two-speaker speech relay", long_about = None)]
pub struct Config {
	/// Bind address
	#[arg(long, env = "RELAY_HOST", default_value = "127.0.0.1")]
	pub host: String,

	/// Bind port
	#[arg(long, env = "RELAY_PORT", default_value = "3001")]
	pub port: u16,

	/// Channel layout of the inbound audio
	#[arg(long, env = "RELAY_MODE", value_enum, default_value = "stereo")]
	pub mode: ChannelMode,

	/// Speech API invoke URL
	#[arg(long, env = "SPEECH_INVOKE_URL")]
	pub invoke_url: String,

	/// Speech API secret key
	#[arg(long, env = "SPEECH_SECRET_KEY")]
	pub secret_key: String,

	/// Recognition language tag
	#[arg(long, env = "SPEECH_LANGUAGE", default_value = "ko-KR")]
	pub language: String,

	/// Pre-attribution gain factor (high, to pick up whispers)
	#[arg(long, env = "DIGITAL_GAIN", default_value = "30.0")]
	pub digital_gain: f32,

	/// Noise floor for voice activity; defaults to 500 (stereo) / 300 (mono)
	#[arg(long, env = "VAD_THRESHOLD")]
	pub vad_threshold: Option<f32>,

	/// Loudness multiple for winner-take-all attribution
	#[arg(long, env = "DOMINANCE_RATIO", default_value = "1.05")]
	pub dominance_ratio: f32,

	/// End-of-utterance silence gap in seconds; defaults to 1.0 (stereo) / 3.0 (mono)
	#[arg(long, env = "SILENCE_TIMEOUT_SECS")]
	pub silence_timeout_secs: Option<f64>,

	/// Force-flush window in seconds; defaults to 10 (stereo) / 15 (mono)
	#[arg(long, env = "MAX_DURATION_SECS")]
	pub max_duration_secs: Option<f64>,

	/// Boosting vocabulary file
	#[arg(long, env = "BOOSTINGS_PATH", default_value = "boostings.txt")]
	pub boostings_path: PathBuf,

	/// Correction table file
	#[arg(long, env = "CORRECTIONS_PATH", default_value = "corrections.json")]
	pub corrections_path: PathBuf,

	/// Concurrent recognition uploads under bursty flushing
	#[arg(long, env = "MAX_INFLIGHT_DISPATCHES", default_value = "8")]
	pub max_inflight_dispatches: usize,

	/// Heartbeat log interval in seconds
	#[arg(long, env = "HEARTBEAT_INTERVAL", default_value = "30")]
	pub heartbeat_interval_secs: u64,
}

impl Config {
	/// Validate configuration values
	pub fn validate(&self) -> Result<(), String> {
		if self.digital_gain <= 0.0 {
			return Err("digital_gain must be positive".to_string());
		}

		if self.dominance_ratio < 1.0 {
			return Err("dominance_ratio below 1.0 would attribute a quieter channel as dominant".to_string());
		}

		if self.max_inflight_dispatches == 0 {
			return Err("max_inflight_dispatches must be at least 1".to_string());
		}

		if self.heartbeat_interval_secs == 0 {
			return Err("heartbeat_interval_secs must be greater than 0".to_string());
		}

		Ok(())
	}

	pub fn attribution_policy(&self) -> AttributionPolicy {
		let default_threshold = match self.mode {
			ChannelMode::Stereo => 500.0,
			ChannelMode::Mono => 300.0,
		};
		AttributionPolicy {
			vad_threshold: self.vad_threshold.unwrap_or(default_threshold),
			dominance_ratio: self.dominance_ratio,
		}
	}

	pub fn flush_policy(&self) -> FlushPolicy {
		let mut policy = match self.mode {
			ChannelMode::Stereo => FlushPolicy::stereo(),
			ChannelMode::Mono => FlushPolicy::mono(),
		};
		if let Some(secs) = self.silence_timeout_secs {
			policy.silence_timeout = Duration::from_secs_f64(secs);
		}
		if let Some(secs) = self.max_duration_secs {
			policy.max_duration = Duration::from_secs_f64(secs);
		}
		policy
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn base_config() -> Config {
		Config::parse_from(["relay-server", "--invoke-url", "https://example.invalid/v1", "--secret-key", "secret"])
	}

	#[test]
	fn test_defaults_are_stereo() {
		let config = base_config();
		assert_eq!(config.mode, ChannelMode::Stereo);
		assert_eq!(config.port, 3001);

		let policy = config.flush_policy();
		assert_eq!(policy, FlushPolicy::stereo());

		let attribution = config.attribution_policy();
		assert!((attribution.vad_threshold - 500.0).abs() < f32::EPSILON);
	}

	#[test]
	fn test_mono_defaults() {
		let mut config = base_config();
		config.mode = ChannelMode::Mono;

		assert_eq!(config.flush_policy(), FlushPolicy::mono());
		assert!((config.attribution_policy().vad_threshold - 300.0).abs() < f32::EPSILON);
	}

	#[test]
	fn test_overrides_win_over_mode_defaults() {
		let mut config = base_config();
		config.vad_threshold = Some(750.0);
		config.silence_timeout_secs = Some(0.5);

		assert!((config.attribution_policy().vad_threshold - 750.0).abs() < f32::EPSILON);
		assert_eq!(config.flush_policy().silence_timeout, Duration::from_millis(500));
	}

	#[test]
	fn test_validate_rejects_bad_values() {
		let mut config = base_config();
		config.dominance_ratio = 0.9;
		assert!(config.validate().is_err());

		let mut config = base_config();
		config.digital_gain = 0.0;
		assert!(config.validate().is_err());

		let mut config = base_config();
		config.max_inflight_dispatches = 0;
		assert!(config.validate().is_err());
	}
}
