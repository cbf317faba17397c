mod mining;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug, Clone)]
#[command(name = "keyword-miner")]
#[command(about = "Tune the boosting vocabulary from accumulated transcripts", long_about = None)]
struct Config {
	/// Directory of transcript .txt files
	#[arg(long, env = "TRANSCRIPTS_DIR", default_value = "transcripts")]
	transcripts_dir: PathBuf,

	/// Detailed keyword output (word + count)
	#[arg(long, env = "KEYWORDS_PATH", default_value = "keywords.json")]
	keywords_path: PathBuf,

	/// Boosting list output, one word per line
	#[arg(long, env = "BOOSTINGS_PATH", default_value = "boostings.txt")]
	boostings_path: PathBuf,

	/// How many keywords to keep
	#[arg(long, default_value = "100")]
	top_n: usize,

	/// Minimum word length in characters
	#[arg(long, default_value = "2")]
	min_chars: usize,
}

fn main() -> Result<()> {
	let config = Config::parse();

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::registry().with(env_filter).with(tracing_subscriber::fmt::layer().with_target(true)).init();

	let corpus = read_corpus(&config)?;
	if corpus.is_empty() {
		warn!(dir = %config.transcripts_dir.display(), "no transcript files found");
		return Ok(());
	}

	let ranked = mining::mine_keywords(&corpus, config.min_chars, config.top_n);
	info!(keywords = ranked.len(), "🔍 keywords mined");

	for keyword in ranked.iter().take(20) {
		info!(word = %keyword.word, count = keyword.count, "top keyword");
	}

	std::fs::write(&config.keywords_path, serde_json::to_string_pretty(&ranked)?)?;
	info!(path = %config.keywords_path.display(), "💾 keyword details saved");

	let boosting_list: Vec<&str> = ranked.iter().map(|k| k.word.as_str()).collect();
	std::fs::write(&config.boostings_path, boosting_list.join("\n") + "\n")?;
	info!(path = %config.boostings_path.display(), words = boosting_list.len(), "💾 boosting list saved");

	Ok(())
}

/// Concatenate every .txt transcript in the directory.
fn read_corpus(config: &Config) -> Result<String> {
	let mut corpus = String::new();

	let entries = std::fs::read_dir(&config.transcripts_dir).with_context(|| format!("cannot read {}", config.transcripts_dir.display()))?;

	let mut paths: Vec<PathBuf> = entries
		.filter_map(std::result::Result::ok)
		.map(|entry| entry.path())
		.filter(|path| path.extension().and_then(|e| e.to_str()) == Some("txt"))
		.collect();
	paths.sort();

	info!(files = paths.len(), "📚 reading transcripts");

	for path in paths {
		let content = std::fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))?;
		corpus.push_str(&content);
		corpus.push('\n');
	}

	Ok(corpus)
}
