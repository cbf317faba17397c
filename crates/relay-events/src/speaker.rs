use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed speaker roles for a recording session.
///
/// Stereo sessions map channel position to `Left`/`Right`; the front-end
/// renames those to its clinic roles. Mono sessions always report `Director`.
/// Identity comes from channel position and relative loudness only, never
/// from voice characteristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Speaker {
	Left,
	Right,
	Director,
}

impl Speaker {
	pub fn as_str(&self) -> &'static str {
		match self {
			Speaker::Left => "Left",
			Speaker::Right => "Right",
			Speaker::Director => "Director",
		}
	}
}

impl fmt::Display for Speaker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_wire_strings_match_front_end_expectations() {
		assert_eq!(serde_json::to_string(&Speaker::Left).unwrap(), "\"Left\"");
		assert_eq!(serde_json::to_string(&Speaker::Right).unwrap(), "\"Right\"");
		assert_eq!(serde_json::to_string(&Speaker::Director).unwrap(), "\"Director\"");
	}
}
