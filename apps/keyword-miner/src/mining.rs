//! Term-frequency mining over accumulated transcripts.
//!
//! Tokens are whitespace-delimited words with surrounding punctuation
//! stripped; single-character tokens carry too little signal and are
//! dropped. Ties sort by word so reruns over the same corpus are stable.

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KeywordCount {
	pub word: String,
	pub count: u64,
}

/// Count token frequencies across the corpus and keep the `top_n` most
/// frequent words of at least `min_chars` characters.
pub fn mine_keywords(corpus: &str, min_chars: usize, top_n: usize) -> Vec<KeywordCount> {
	let mut counts: HashMap<String, u64> = HashMap::new();

	for raw in corpus.split_whitespace() {
		let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
		if token.chars().count() < min_chars {
			continue;
		}
		*counts.entry(token.to_string()).or_insert(0) += 1;
	}

	let mut ranked: Vec<KeywordCount> = counts.into_iter().map(|(word, count)| KeywordCount { word, count }).collect();
	ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
	ranked.truncate(top_n);
	ranked
}
