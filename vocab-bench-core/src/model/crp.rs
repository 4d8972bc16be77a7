use std::collections::HashMap;

use rand::Rng;

use super::frequency_table::FrequencyTable;
use super::ngram_model::NGramModel;
use super::synthesis_input::SynthesisInput;
use super::weighted_tree::WeightedTree;
use crate::error::{Error, Result};

/// One table (word type) of the restaurant.
#[derive(Clone, Debug)]
struct TableRow {
	word: String,
	/// Prior weight inherited from the reference corpus.
	pseudo_count: u64,
	/// Customers seated during synthesis.
	observed_count: u64,
}

/// Result of a CRP synthesis run.
#[derive(Clone, Debug)]
pub struct CrpOutcome {
	/// Synthesized frequency table (rows never observed are dropped).
	pub table: FrequencyTable,
	/// Steps that took the new-table branch.
	pub novel_insertions: u64,
	/// New-table steps whose sampled word already existed.
	pub collisions: u64,
}

/// Chinese Restaurant Process corpus synthesizer.
///
/// Seeds one table per reference word with the reference count as a
/// pseudo-count, then seats `target_token_count` customers one at a time:
/// - with probability `α / (N + i - 1 + α)` a word is invented by the
///   character n-gram model (an existing row if the word already exists)
/// - otherwise an existing row is drawn with probability proportional to
///   `pseudo_count + observed_count`
///
/// `N` is the reference corpus size and `i` the 1-based step.
///
/// # Invariants
/// - `index[word]` is the row of `word` in `rows`
/// - `weights` holds `pseudo_count + observed_count` for every row
/// - the sum of `observed_count` equals the number of steps run
#[derive(Debug)]
pub struct CrpSynthesizer {
	ngram: NGramModel,
	rows: Vec<TableRow>,
	index: HashMap<String, usize>,
	weights: WeightedTree,
	reference_tokens: u64,
	target_token_count: u64,
	concentration: f64,
	novel_insertions: u64,
	collisions: u64,
}

impl CrpSynthesizer {
	/// Prepares a synthesizer seeded from `reference`.
	///
	/// The novel-word model is trained on the reference vocabulary.
	///
	/// # Errors
	/// Returns `Error::InvalidInput` if the reference corpus is empty or the
	/// target token count is zero.
	pub fn new(reference: &FrequencyTable, input: &SynthesisInput) -> Result<Self> {
		let reference_tokens = reference.total();
		if reference_tokens == 0 {
			return Err(Error::invalid("reference corpus has no tokens"));
		}
		let target_token_count = input.target_token_count().unwrap_or(reference_tokens);
		if target_token_count == 0 {
			return Err(Error::invalid("target token count must be > 0"));
		}

		let ngram = NGramModel::build(reference.words(), input.ngram_order())?
			.with_max_word_len(input.max_word_len);

		let rows: Vec<TableRow> = reference
			.iter()
			.map(|row| TableRow {
				word: row.word.clone(),
				pseudo_count: row.count,
				observed_count: 0,
			})
			.collect();
		let index = rows.iter().enumerate().map(|(i, row)| (row.word.clone(), i)).collect();
		let weights = WeightedTree::from_weights(rows.iter().map(|row| row.pseudo_count));

		Ok(Self {
			ngram,
			rows,
			index,
			weights,
			reference_tokens,
			target_token_count,
			concentration: input.concentration(),
			novel_insertions: 0,
			collisions: 0,
		})
	}

	/// Probability of opening a new table at 1-based step `i`.
	pub fn new_table_probability(&self, i: u64) -> f64 {
		let seated = (self.reference_tokens + i - 1) as f64;
		self.concentration / (seated + self.concentration)
	}

	/// Seats every customer and returns the synthesized table.
	pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> CrpOutcome {
		log::debug!(
			"CRP: {} reference types, {} reference tokens, {} steps, concentration {}",
			self.rows.len(),
			self.reference_tokens,
			self.target_token_count,
			self.concentration
		);

		for i in 1..=self.target_token_count {
			let p_new_table = self.new_table_probability(i);
			if rng.random::<f64>() < p_new_table {
				self.seat_new_table(rng);
			} else {
				self.seat_existing_table(rng);
			}
		}

		log::info!(
			"CRP: {} novel insertions ({} collided with existing words), {} types",
			self.novel_insertions,
			self.collisions,
			self.rows.len()
		);

		let table = FrequencyTable::from_counts(
			self.rows
				.into_iter()
				.filter(|row| row.observed_count > 0)
				.map(|row| (row.word, row.observed_count)),
		);
		CrpOutcome {
			table,
			novel_insertions: self.novel_insertions,
			collisions: self.collisions,
		}
	}

	/// Invents a word; increments it if it already exists.
	fn seat_new_table<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		self.novel_insertions += 1;
		let word = self.ngram.sample_word(rng);
		match self.index.get(&word) {
			Some(&i) => {
				self.collisions += 1;
				self.seat_at(i);
			}
			None => {
				let i = self.weights.push(1);
				self.index.insert(word.clone(), i);
				self.rows.push(TableRow { word, pseudo_count: 0, observed_count: 1 });
			}
		}
	}

	/// Draws an existing row proportionally to `pseudo_count + observed_count`.
	fn seat_existing_table<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		let target = rng.random_range(0..self.weights.total());
		// total > 0: the reference has tokens and weights only grow
		if let Some(i) = self.weights.find(target) {
			self.seat_at(i);
		}
	}

	fn seat_at(&mut self, i: usize) {
		self.rows[i].observed_count += 1;
		self.weights.add(i, 1);
	}
}

/// Synthesizes a corpus of `target_token_count` tokens with a CRP seeded
/// from `reference`, inventing words with a 3-gram character model.
///
/// # Errors
/// Returns `Error::InvalidInput` for an empty reference, a zero target or
/// a negative / non-finite concentration.
pub fn synthesize<R: Rng + ?Sized>(
	reference: &FrequencyTable,
	concentration: f64,
	target_token_count: u64,
	rng: &mut R,
) -> Result<FrequencyTable> {
	let mut input = SynthesisInput::new(concentration)?;
	input.set_target_token_count(target_token_count)?;
	Ok(CrpSynthesizer::new(reference, &input)?.run(rng).table)
}
