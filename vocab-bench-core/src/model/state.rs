use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};


/// Represents a state in a character n-gram model.
///
/// A `State` corresponds to a fixed (n-1)-character prefix (`key`) and stores
/// all observed transitions from this prefix to the next character.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences while the model is built
/// - Expose the normalised next-character distribution
/// - Draw the next character by weighted random sampling
/// - Merge with another state having the same key
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
/// - Transitions are kept in character order, so a seeded generator
///   always walks them the same way
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct State {
	/// Identifier of the state (n-1 character prefix).
	key: String,
	/// Outgoing transitions indexed by the next character.
	/// Example: { 'a' => 42, 'e' => 3 }
	transitions: BTreeMap<char, usize>,
}

impl State {
	/// Creates a new empty state for the given prefix.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			transitions: BTreeMap::new(),
		}
	}

	/// Records an occurrence of a transition toward `next_char`.
	pub fn add_transition(&mut self, next_char: char) {
		*self.transitions.entry(next_char).or_insert(0) += 1;
	}

	/// Total number of observed transitions.
	pub fn total(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Probability of each next character; values sum to 1.
	pub fn distribution(&self) -> BTreeMap<char, f64> {
		let total = self.total() as f64;
		self.transitions
			.iter()
			.map(|(c, occurrence)| (*c, *occurrence as f64 / total))
			.collect()
	}

	/// Draws the next character with probability proportional to its
	/// occurrence count.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<char> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (next_char, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(*next_char);
			}
			r -= occurrence;
		}

		// Unreachable while r < total
		self.transitions.keys().next_back().copied()
	}

	/// Merges another state into this one, summing transition counts.
	///
	/// # Errors
	/// Returns an error if the state keys do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.key != other.key {
			return Err(format!("Key mismatch: '{}' vs '{}'", self.key, other.key));
		}

		for (next_char, occurrence) in &other.transitions {
			*self.transitions.entry(*next_char).or_insert(0) += *occurrence;
		}

		Ok(())
	}
}
