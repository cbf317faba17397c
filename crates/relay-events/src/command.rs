use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inbound JSON commands on the WebSocket channel.
///
/// Unknown commands and malformed JSON fail to deserialize; the server
/// ignores them and keeps the connection open.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ClientCommand {
	/// Begin a recording session. No-op while already recording.
	Start,
	/// End the recording session. No-op while idle.
	Stop,
	/// Merge words into the boosting vocabulary (capped upstream).
	UpdateKeywords {
		#[serde(default)]
		keywords: Vec<String>,
	},
	/// Ask for the current correction table as a `corrections` event.
	GetCorrections,
	/// Persist and replace the correction table.
	SaveCorrections {
		#[serde(default)]
		data: BTreeMap<String, String>,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_start_and_stop() {
		assert_eq!(serde_json::from_str::<ClientCommand>(r#"{"command":"start"}"#).unwrap(), ClientCommand::Start);
		assert_eq!(serde_json::from_str::<ClientCommand>(r#"{"command":"stop"}"#).unwrap(), ClientCommand::Stop);
	}

	#[test]
	fn test_parse_update_keywords() {
		let cmd = serde_json::from_str::<ClientCommand>(r#"{"command":"update_keywords","keywords":["추나","도수치료"]}"#).unwrap();
		assert_eq!(
			cmd,
			ClientCommand::UpdateKeywords {
				keywords: vec!["추나".to_string(), "도수치료".to_string()],
			}
		);
	}

	#[test]
	fn test_parse_update_keywords_without_payload() {
		let cmd = serde_json::from_str::<ClientCommand>(r#"{"command":"update_keywords"}"#).unwrap();
		assert_eq!(cmd, ClientCommand::UpdateKeywords { keywords: Vec::new() });
	}

	#[test]
	fn test_parse_save_corrections() {
		let cmd = serde_json::from_str::<ClientCommand>(r#"{"command":"save_corrections","data":{"치나":"추나"}}"#).unwrap();
		match cmd {
			ClientCommand::SaveCorrections { data } => {
				assert_eq!(data.get("치나").map(String::as_str), Some("추나"));
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn test_unknown_command_is_an_error() {
		assert!(serde_json::from_str::<ClientCommand>(r#"{"command":"reboot"}"#).is_err());
	}

	#[test]
	fn test_invalid_json_is_an_error() {
		assert!(serde_json::from_str::<ClientCommand>("not json").is_err());
	}
}
