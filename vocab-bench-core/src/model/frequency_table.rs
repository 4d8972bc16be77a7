use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One row of a frequency table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WordCount {
	pub word: String,
	pub count: u64,
}

/// Word frequency table of a corpus.
///
/// Rows keep their insertion order, which makes every synthesizer
/// driven by a seeded generator reproducible.
///
/// # Invariants
/// - Each word appears in exactly one row
/// - `index[word]` is the position of that row in `rows`
/// - `total` is the sum of all counts (the corpus size in tokens)
#[derive(Clone, Debug, Default)]
pub struct FrequencyTable {
	rows: Vec<WordCount>,
	index: HashMap<String, usize>,
	total: u64,
}

impl FrequencyTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from `(word, count)` pairs; repeated words are summed.
	pub fn from_counts<I, S>(counts: I) -> Self
	where
		I: IntoIterator<Item = (S, u64)>,
		S: Into<String>,
	{
		let mut table = Self::new();
		for (word, count) in counts {
			table.add(word, count);
		}
		table
	}

	/// Counts the whitespace-separated tokens of transcript lines.
	///
	/// Tokens are lowercased.
	pub fn from_lines<I, S>(lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut table = Self::new();
		for line in lines {
			for token in line.as_ref().split_whitespace() {
				table.add(token.to_lowercase(), 1);
			}
		}
		table
	}

	/// Adds `count` occurrences of `word`, creating the row if needed.
	pub fn add<S: Into<String>>(&mut self, word: S, count: u64) {
		let word = word.into();
		match self.index.get(&word) {
			Some(&i) => self.rows[i].count += count,
			None => {
				self.index.insert(word.clone(), self.rows.len());
				self.rows.push(WordCount { word, count });
			}
		}
		self.total += count;
	}

	/// Count of `word`, `None` if the word is not in the table.
	pub fn get(&self, word: &str) -> Option<u64> {
		self.index.get(word).map(|&i| self.rows[i].count)
	}

	pub fn contains(&self, word: &str) -> bool {
		self.index.contains_key(word)
	}

	/// Number of tokens.
	pub fn total(&self) -> u64 {
		self.total
	}

	/// Number of types (rows).
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &WordCount> {
		self.rows.iter()
	}

	pub fn words(&self) -> impl Iterator<Item = &str> {
		self.rows.iter().map(|row| row.word.as_str())
	}

	/// Frequency per million tokens, `None` for unknown words or an empty table.
	pub fn freq_m(&self, word: &str) -> Option<f64> {
		if self.total == 0 {
			return None;
		}
		self.get(word).map(|count| count as f64 / self.total as f64 * 1_000_000.0)
	}

	/// Returns a copy sorted by descending count (ties broken alphabetically).
	pub fn sorted_by_count(&self) -> Self {
		let mut rows = self.rows.clone();
		rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
		Self::from_counts(rows.into_iter().map(|row| (row.word, row.count)))
	}
}
