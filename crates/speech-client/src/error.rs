/// Errors from the recognition upload path.
///
/// Every variant is terminal for the utterance in question: callers log and
/// drop, they never retry.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
	/// Network failure, including the hard request timeout.
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),

	/// Upstream answered with a non-2xx status.
	#[error("speech api returned status {status}: {body}")]
	Status { status: u16, body: String },

	/// Upstream answered 2xx but the body was not the expected JSON.
	#[error("malformed response: {0}")]
	MalformedResponse(String),

	/// The parameter blob failed to serialize.
	#[error("failed to encode request params: {0}")]
	Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpeechError>;
