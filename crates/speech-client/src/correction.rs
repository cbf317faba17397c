//! Literal substring corrections applied to every transcript before
//! publication.
//!
//! Replacement is sequential in the table's iteration order, and overlapping
//! matches are not specially resolved. A replacement value that itself
//! contains a later "wrong" key will be rewritten again by that later entry;
//! the clinic curates the table with that in mind.

use serde_json::to_string_pretty;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CorrectionStoreError {
	#[error("io error: {0}")]
	Io(#[from] io::Error),
	#[error("parse error: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Mapping from mis-transcribed substrings to their corrected forms,
/// persisted as a flat JSON object and editable at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionTable {
	entries: BTreeMap<String, String>,
}

impl CorrectionTable {
	pub fn new(entries: BTreeMap<String, String>) -> Self {
		Self { entries }
	}

	/// Load from `corrections.json`. A missing file yields an empty table;
	/// any other failure is surfaced so the caller can decide.
	pub fn load(path: &Path) -> Result<Self, CorrectionStoreError> {
		if !path.exists() {
			return Ok(Self::default());
		}
		let content = std::fs::read_to_string(path)?;
		let entries: BTreeMap<String, String> = serde_json::from_str(&content)?;
		info!(path = %path.display(), entries = entries.len(), "🔧 correction table loaded");
		Ok(Self { entries })
	}

	pub fn save(&self, path: &Path) -> Result<(), CorrectionStoreError> {
		let content = to_string_pretty(&self.entries)?;
		std::fs::write(path, content)?;
		info!(path = %path.display(), entries = self.entries.len(), "✅ correction table saved");
		Ok(())
	}

	/// Replace every occurrence of each "wrong" substring with its corrected
	/// value, one table entry at a time.
	pub fn apply(&self, text: &str) -> String {
		let mut corrected = text.to_string();
		for (wrong, correct) in &self.entries {
			if corrected.contains(wrong.as_str()) {
				corrected = corrected.replace(wrong.as_str(), correct);
			}
		}
		corrected
	}

	/// Swap in a full replacement table (the `save_corrections` command).
	pub fn replace_all(&mut self, entries: BTreeMap<String, String>) {
		self.entries = entries;
	}

	pub fn entries(&self) -> &BTreeMap<String, String> {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table(pairs: &[(&str, &str)]) -> CorrectionTable {
		CorrectionTable::new(pairs.iter().map(|(w, c)| (w.to_string(), c.to_string())).collect())
	}

	#[test]
	fn test_apply_replaces_every_occurrence() {
		let table = table(&[("치나", "추나")]);
		assert_eq!(table.apply("치나 요법과 치나 치료"), "추나 요법과 추나 치료");
	}

	#[test]
	fn test_apply_untouched_text_passes_through() {
		let table = table(&[("치나", "추나")]);
		assert_eq!(table.apply("도수치료 예약"), "도수치료 예약");
	}

	#[test]
	fn test_apply_empty_table_is_identity() {
		let table = CorrectionTable::default();
		assert_eq!(table.apply("그대로"), "그대로");
	}

	#[test]
	fn test_apply_is_sequential_over_entries() {
		// "ab" fires before "bc" (BTreeMap order), consuming the shared "b"
		let table = table(&[("ab", "x"), ("bc", "y")]);
		assert_eq!(table.apply("abc"), "xc");
	}

	#[test]
	fn test_replacement_can_retrigger_later_entry() {
		// Known sharp edge: a replacement value containing a later key is
		// rewritten again by that entry
		let table = table(&[("a", "b"), ("b", "c")]);
		assert_eq!(table.apply("a"), "c");
	}

	#[test]
	fn test_load_missing_file_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		let table = CorrectionTable::load(&dir.path().join("corrections.json")).unwrap();
		assert!(table.is_empty());
	}

	#[test]
	fn test_save_then_load_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corrections.json");

		let original = table(&[("치나", "추나"), ("도수 치료", "도수치료")]);
		original.save(&path).unwrap();

		let loaded = CorrectionTable::load(&path).unwrap();
		assert_eq!(loaded, original);
	}

	#[test]
	fn test_load_rejects_malformed_json() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corrections.json");
		std::fs::write(&path, "{ not json").unwrap();

		assert!(matches!(CorrectionTable::load(&path), Err(CorrectionStoreError::Parse(_))));
	}

	#[test]
	fn test_replace_all_swaps_table() {
		let mut current = table(&[("a", "b")]);
		current.replace_all(table(&[("c", "d")]).entries().clone());
		assert_eq!(current.apply("ac"), "ad");
	}
}
