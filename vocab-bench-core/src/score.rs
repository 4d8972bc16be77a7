//! Comparison between generated and reference vocabularies.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::frequency_table::FrequencyTable;
use crate::stats::{TokenStats, accu_model_tok_stats};

/// Accumulator-model statistics of every reference word for a generated
/// corpus of `gen_corpus_size` tokens (the reference size when `None`).
///
/// Rows come in reference order as `(word, reference count, stats)`.
pub fn accumulator_scores(
	reference: &FrequencyTable,
	gen_corpus_size: Option<u64>,
) -> Result<Vec<(String, u64, TokenStats)>> {
	let total = reference.total();
	reference
		.iter()
		.map(|row| {
			let stats = accu_model_tok_stats(row.count, total, gen_corpus_size)?;
			Ok((row.word.clone(), row.count, stats))
		})
		.collect()
}

/// Share of test words produced strictly more than `memory_threshold` times.
///
/// Words missing from `generated` count as zero. Duplicated test words are
/// scored once. Returns `None` for an empty test vocabulary.
pub fn threshold_score<S: AsRef<str>>(
	generated: &FrequencyTable,
	test_words: &[S],
	memory_threshold: u64,
) -> Option<f64> {
	let mut seen: HashMap<&str, bool> = HashMap::new();
	for word in test_words {
		let word = word.as_ref();
		seen.entry(word)
			.or_insert_with(|| generated.get(word).unwrap_or(0) > memory_threshold);
	}
	if seen.is_empty() {
		return None;
	}
	let known = seen.values().filter(|&&known| known).count();
	Some(known as f64 / seen.len() as f64)
}

/// Share of generated tokens whose word is absent from `reference`.
///
/// Returns `None` for an empty generated table.
pub fn oov_rate(generated: &FrequencyTable, reference: &FrequencyTable) -> Option<f64> {
	if generated.total() == 0 {
		return None;
	}
	let oov: u64 = generated
		.iter()
		.filter(|row| !reference.contains(&row.word))
		.map(|row| row.count)
		.sum();
	Some(oov as f64 / generated.total() as f64)
}

/// Share of generated types absent from `reference`.
pub fn oov_type_rate(generated: &FrequencyTable, reference: &FrequencyTable) -> Option<f64> {
	if generated.is_empty() {
		return None;
	}
	let oov = generated.words().filter(|word| !reference.contains(word)).count();
	Some(oov as f64 / generated.len() as f64)
}
