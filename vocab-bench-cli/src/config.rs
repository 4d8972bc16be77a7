//! Optional JSON configuration providing defaults for command-line flags.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use vocab_bench_core::model::ngram_model::DEFAULT_MAX_WORD_LEN;
use vocab_bench_core::model::synthesis_input::DEFAULT_NGRAM_ORDER;

/// Benchmark settings
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BenchConfig {
	/// Seed of the random generator; OS entropy when absent
	#[serde(default)]
	pub seed: Option<u64>,
	/// Order of the novel-word character model
	#[serde(default = "default_ngram_order")]
	pub ngram_order: usize,
	/// Cutoff on the length of invented words
	#[serde(default = "default_max_word_len")]
	pub max_word_len: usize,
	/// Target share of novel-word insertions for the CRP
	#[serde(default)]
	pub oov_rate: Option<f64>,
	/// A test word counts as known above this many occurrences
	#[serde(default)]
	pub memory_threshold: u64,
}

fn default_ngram_order() -> usize {
	DEFAULT_NGRAM_ORDER
}

fn default_max_word_len() -> usize {
	DEFAULT_MAX_WORD_LEN
}

impl Default for BenchConfig {
	fn default() -> Self {
		Self {
			seed: None,
			ngram_order: default_ngram_order(),
			max_word_len: default_max_word_len(),
			oov_rate: None,
			memory_threshold: 0,
		}
	}
}

/// Loads the configuration file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<BenchConfig> {
	let Some(path) = path else {
		return Ok(BenchConfig::default());
	};
	let content = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
	let config: BenchConfig =
		serde_json::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
	log::debug!("loaded config {}: {config:?}", path.display());
	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_take_defaults() {
		let config: BenchConfig = serde_json::from_str(r#"{"seed": 7, "oov_rate": 0.02}"#).unwrap();
		assert_eq!(config.seed, Some(7));
		assert_eq!(config.oov_rate, Some(0.02));
		assert_eq!(config.ngram_order, DEFAULT_NGRAM_ORDER);
		assert_eq!(config.max_word_len, DEFAULT_MAX_WORD_LEN);
	}

	#[test]
	fn no_path_means_defaults() {
		assert_eq!(load_config(None).unwrap(), BenchConfig::default());
	}

	#[test]
	fn config_file_is_read() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bench.json");
		fs::write(&path, r#"{"memory_threshold": 3, "ngram_order": 4}"#).unwrap();
		let config = load_config(Some(path.as_path())).unwrap();
		assert_eq!(config.memory_threshold, 3);
		assert_eq!(config.ngram_order, 4);

		fs::write(&path, "not json").unwrap();
		assert!(load_config(Some(path.as_path())).is_err());
	}
}
