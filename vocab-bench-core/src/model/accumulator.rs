use rand::Rng;

use super::frequency_table::FrequencyTable;
use super::weighted_tree::WeightedTree;
use crate::error::{Error, Result};

/// Accumulator model: a speaker with perfect memory of the reference corpus
/// who produces each token independently with the reference probabilities.
///
/// Draws a multinomial sample of `target_token_count` tokens (the reference
/// size when `None`). Words that are never produced are dropped.
///
/// # Errors
/// Returns `Error::InvalidInput` if the reference is empty or the target is zero.
pub fn make_accu<R: Rng + ?Sized>(
	reference: &FrequencyTable,
	target_token_count: Option<u64>,
	rng: &mut R,
) -> Result<FrequencyTable> {
	let total = reference.total();
	if total == 0 {
		return Err(Error::invalid("reference corpus has no tokens"));
	}
	let target = target_token_count.unwrap_or(total);
	if target == 0 {
		return Err(Error::invalid("target token count must be > 0"));
	}

	let weights = WeightedTree::from_weights(reference.iter().map(|row| row.count));
	let mut counts = vec![0u64; reference.len()];
	for _ in 0..target {
		if let Some(i) = weights.find(rng.random_range(0..total)) {
			counts[i] += 1;
		}
	}

	let table = FrequencyTable::from_counts(
		reference
			.words()
			.zip(counts)
			.filter(|(_, count)| *count > 0)
			.map(|(word, count)| (word.to_owned(), count)),
	);
	log::debug!("accumulator: {} of {} reference types produced", table.len(), reference.len());
	Ok(table)
}
