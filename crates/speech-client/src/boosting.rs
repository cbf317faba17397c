//! Recognition-boosting vocabulary.
//!
//! A flat word list shipped with every upload to bias the recognizer toward
//! clinic terminology. The upstream API caps the list, so merges re-apply the
//! cap after deduplication.

use serde_json::{json, Value};
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tracing::info;

/// Upstream limit on boosting entries.
pub const MAX_BOOSTING_WORDS: usize = 1000;

/// Ordered, deduplicated word list, capped at [`MAX_BOOSTING_WORDS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoostingVocabulary {
	words: Vec<String>,
}

impl BoostingVocabulary {
	/// Build from raw words: trimmed, empties dropped, first occurrence wins,
	/// capped at the upstream limit.
	pub fn from_words<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut seen = HashSet::new();
		let mut out = Vec::new();

		for word in words {
			let trimmed = word.as_ref().trim();
			if trimmed.is_empty() {
				continue;
			}
			if seen.insert(trimmed.to_string()) {
				out.push(trimmed.to_string());
			}
			if out.len() == MAX_BOOSTING_WORDS {
				break;
			}
		}

		Self { words: out }
	}

	/// Load from a `boostings.txt` file: words separated by commas and/or
	/// newlines. A missing file is the caller's concern; an empty file yields
	/// an empty vocabulary.
	pub fn load(path: &Path) -> io::Result<Self> {
		let content = std::fs::read_to_string(path)?;
		let vocabulary = Self::from_words(content.split(['\n', ',']));
		info!(path = %path.display(), words = vocabulary.len(), "📚 boosting vocabulary loaded");
		Ok(vocabulary)
	}

	/// Merge extra words, keeping existing order, then re-apply the cap.
	pub fn merge<S: AsRef<str>>(&mut self, extra: &[S]) {
		let mut combined = std::mem::take(&mut self.words);
		combined.extend(extra.iter().map(|word| word.as_ref().to_string()));
		*self = Self::from_words(combined);
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// The `boostings` value of the upload parameter blob: a single entry
	/// with all words comma-joined, or an empty list.
	pub fn to_params(&self) -> Value {
		if self.words.is_empty() {
			json!([])
		} else {
			json!([{ "words": self.words.join(",") }])
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_from_words_trims_and_drops_empties() {
		let vocabulary = BoostingVocabulary::from_words([" 추나 ", "", "  ", "도수치료"]);
		assert_eq!(vocabulary.words(), ["추나", "도수치료"]);
	}

	#[test]
	fn test_from_words_dedupes_keeping_first() {
		let vocabulary = BoostingVocabulary::from_words(["a", "b", "a", "c", "b"]);
		assert_eq!(vocabulary.words(), ["a", "b", "c"]);
	}

	#[test]
	fn test_cap_applies() {
		let many: Vec<String> = (0..1500).map(|i| format!("word{i}")).collect();
		let vocabulary = BoostingVocabulary::from_words(&many);
		assert_eq!(vocabulary.len(), MAX_BOOSTING_WORDS);
	}

	#[test]
	fn test_merge_dedupes_and_recaps() {
		let mut vocabulary = BoostingVocabulary::from_words(["a", "b"]);
		vocabulary.merge(&["b", "c"]);
		assert_eq!(vocabulary.words(), ["a", "b", "c"]);

		let many: Vec<String> = (0..1200).map(|i| format!("extra{i}")).collect();
		vocabulary.merge(&many);
		assert_eq!(vocabulary.len(), MAX_BOOSTING_WORDS);
		// Existing words survive a capped merge
		assert_eq!(vocabulary.words()[0], "a");
	}

	#[test]
	fn test_load_splits_on_commas_and_newlines() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "추나,도수치료").unwrap();
		writeln!(file, "물리치료").unwrap();

		let vocabulary = BoostingVocabulary::load(file.path()).unwrap();
		assert_eq!(vocabulary.words(), ["추나", "도수치료", "물리치료"]);
	}

	#[test]
	fn test_params_shape() {
		let vocabulary = BoostingVocabulary::from_words(["a", "b"]);
		assert_eq!(vocabulary.to_params(), serde_json::json!([{ "words": "a,b" }]));

		let empty = BoostingVocabulary::default();
		assert_eq!(empty.to_params(), serde_json::json!([]));
	}
}
