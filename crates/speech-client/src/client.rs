//! HTTP collaborator for the cloud speech recognition service.
//!
//! One multipart POST per utterance: a WAV-framed `media` part plus a JSON
//! `params` part. The request carries a hard timeout; any failure is
//! terminal for that utterance.

use crate::boosting::BoostingVocabulary;
use crate::error::{Result, SpeechError};
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "X-CLOVASPEECH-API-KEY";

/// JSON parameter blob accompanying the media part.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeParams {
	pub language: String,
	pub completion: String,
	pub boostings: serde_json::Value,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub word_alignment: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub full_text: Option<bool>,
}

impl RecognizeParams {
	/// Live relay upload: synchronous completion, boostings only.
	pub fn relay(language: &str, boostings: &BoostingVocabulary) -> Self {
		Self {
			language: language.to_string(),
			completion: "sync".to_string(),
			boostings: boostings.to_params(),
			word_alignment: None,
			full_text: None,
		}
	}

	/// Offline batch upload: full text with segments, no word alignment.
	pub fn batch(language: &str, boostings: &BoostingVocabulary) -> Self {
		Self {
			language: language.to_string(),
			completion: "sync".to_string(),
			boostings: boostings.to_params(),
			word_alignment: Some(false),
			full_text: Some(true),
		}
	}
}

/// One recognized segment with millisecond offsets, present in batch mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
	pub start: u64,
	pub end: u64,
	pub text: String,
}

/// Decoded recognizer response. `text` is empty when nothing was recognized,
/// which is not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognizeResponse {
	#[serde(default)]
	pub text: String,
	#[serde(default)]
	pub segments: Vec<Segment>,
}

/// Client for the recognizer upload endpoint.
#[derive(Debug, Clone)]
pub struct SpeechClient {
	http: reqwest::Client,
	invoke_url: String,
	secret_key: String,
}

impl SpeechClient {
	/// `timeout` is the hard per-request deadline: 10s for the live relay,
	/// 30s for the batch pipeline's 60-second chunks.
	pub fn new(invoke_url: &str, secret_key: &str, timeout: Duration) -> Result<Self> {
		let http = reqwest::Client::builder().timeout(timeout).build()?;
		Ok(Self {
			http,
			invoke_url: invoke_url.trim_end_matches('/').to_string(),
			secret_key: secret_key.to_string(),
		})
	}

	/// Upload WAV-framed audio and return the decoded response.
	pub async fn recognize(&self, wav: Vec<u8>, params: &RecognizeParams) -> Result<RecognizeResponse> {
		let url = format!("{}/recognizer/upload", self.invoke_url);
		let payload_len = wav.len();

		let media = multipart::Part::bytes(wav).file_name("speech.wav").mime_str("audio/wav")?;
		let params_part = multipart::Part::text(serde_json::to_string(params)?).mime_str("application/json")?;
		let form = multipart::Form::new().part("media", media).part("params", params_part);

		debug!(url = %url, payload_bytes = payload_len, "📤 uploading audio");

		let response = self.http.post(&url).header(API_KEY_HEADER, &self.secret_key).multipart(form).send().await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(SpeechError::Status { status: status.as_u16(), body });
		}

		let body = response.text().await?;
		let decoded: RecognizeResponse = serde_json::from_str(&body).map_err(|e| SpeechError::MalformedResponse(e.to_string()))?;
		Ok(decoded)
	}
}
