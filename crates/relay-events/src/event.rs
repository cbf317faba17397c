use crate::Speaker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outbound JSON events broadcast to every connected subscriber.
///
/// Transcripts form a loosely ordered stream: a fast-returning short
/// utterance can publish before a slower long one that started earlier, so
/// consumers must key on the speaker tag, not arrival order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
	Transcript { text: String, speaker: Speaker },
	Corrections { data: BTreeMap<String, String> },
}

impl ServerEvent {
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}
}
