use serde::Serialize;

use crate::error::{Error, Result};

use super::cascade::{p_miss, probability_of_fewer_than_k, probability_of_k_observations};

/// Frequency statistics of one word in a corpus generated by an accumulator
/// model (perfect memory of the reference corpus).
///
/// # Fields
/// - `p_miss`: probability of never producing the word
/// - `p_once`: probability of producing it exactly once
/// - `p_same`: probability of producing it exactly `gen_token_count` times
/// - `p_less` / `p_more`: probability of producing it fewer / more times than expected
/// - `score`: expected score, +1 for "more than expected" and -1 for "less"
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenStats {
	pub gen_token_count: u64,
	pub p_miss: f64,
	pub p_once: f64,
	pub p_same: f64,
	pub p_less: f64,
	pub p_more: f64,
	pub score: f64,
}

/// Computes the accumulator-model statistics of a word seen `token_count`
/// times in a reference corpus of `ref_corpus_size` tokens.
///
/// The generated corpus has `gen_corpus_size` tokens, defaulting to the
/// reference size. The expected count is `token_count` rescaled to the
/// generated size and rounded half-to-even.
///
/// # Errors
/// Returns `Error::InvalidInput` if `ref_corpus_size` is zero or smaller
/// than `token_count`.
pub fn accu_model_tok_stats(
	token_count: u64,
	ref_corpus_size: u64,
	gen_corpus_size: Option<u64>,
) -> Result<TokenStats> {
	if ref_corpus_size == 0 {
		return Err(Error::invalid("reference corpus is empty"));
	}
	if token_count > ref_corpus_size {
		return Err(Error::invalid(format!(
			"token count {token_count} exceeds reference corpus size {ref_corpus_size}"
		)));
	}
	let gen_corpus_size = gen_corpus_size.unwrap_or(ref_corpus_size);

	let prob_token = token_count as f64 / ref_corpus_size as f64;
	let gen_token_count = (prob_token * gen_corpus_size as f64).round_ties_even() as u64;

	let p_same = probability_of_k_observations(gen_token_count, prob_token, gen_corpus_size);
	let p_less = probability_of_fewer_than_k(gen_token_count, prob_token, gen_corpus_size);
	let p_more = 1.0 - p_same - p_less;

	Ok(TokenStats {
		gen_token_count,
		p_miss: p_miss(prob_token, gen_corpus_size),
		p_once: probability_of_k_observations(1, prob_token, gen_corpus_size),
		p_same,
		p_less,
		p_more,
		score: p_more - p_less,
	})
}
