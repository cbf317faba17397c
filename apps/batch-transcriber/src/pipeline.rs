//! Chunk-result merging for the offline pipeline.

use serde::Serialize;
use speech_client::{RecognizeResponse, Segment};

/// Merged transcript of one recorded session: the concatenated text plus the
/// recognizer segments re-based onto the session timeline.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionTranscript {
	pub text: String,
	pub segments: Vec<Segment>,
}

impl SessionTranscript {
	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

/// Merge per-chunk results in chunk order. Failed chunks (`None`) contribute
/// nothing but still advance the time offset, so later segments stay aligned
/// with the recording.
pub fn merge_chunk_results(results: &[Option<RecognizeResponse>], segment_secs: u64) -> SessionTranscript {
	let mut text = String::new();
	let mut segments = Vec::new();

	for (index, result) in results.iter().enumerate() {
		let Some(response) = result else {
			continue;
		};

		if !response.text.is_empty() {
			if !text.is_empty() {
				text.push(' ');
			}
			text.push_str(&response.text);
		}

		let offset_ms = index as u64 * segment_secs * 1000;
		for segment in &response.segments {
			segments.push(Segment {
				start: segment.start + offset_ms,
				end: segment.end + offset_ms,
				text: segment.text.clone(),
			});
		}
	}

	SessionTranscript { text, segments }
}
