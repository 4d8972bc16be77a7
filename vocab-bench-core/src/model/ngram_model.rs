use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::State;
use crate::error::{Error, Result};
use crate::io::{build_output_path, read_file};

/// Sentinel padding the beginning of every word.
pub const DEFAULT_START_CHAR: char = '^';

/// Sentinel padding the end of every word.
pub const DEFAULT_END_CHAR: char = '$';

/// Longest word `sample_word` will produce before cutting generation short.
pub const DEFAULT_MAX_WORD_LEN: usize = 64;

/// Character n-gram model of a vocabulary.
///
/// The `NGramModel` stores states for prefixes of length `n-1`
/// and generates new word forms one character at a time.
///
/// # Responsibilities
/// - Build the model from a word list (each word padded with `n-1`
///   start and `n-1` end sentinels)
/// - Expose the next-character distribution of every prefix
/// - Sample new words with a caller-provided random generator
/// - Merge with another model of the same order and sentinels
/// - Cache itself to disk in a compact binary format
///
/// # Invariants
/// - `n` is always >= 2
/// - Each state in `states` corresponds to a unique prefix of `n-1` characters
/// - All state transitions have occurrence counts >= 1
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NGramModel {
	/// The order of the model (number of characters in the n-gram)
	n: usize,
	start_char: char,
	end_char: char,
	max_word_len: usize,

	/// Mapping from a prefix (length n-1) to its corresponding state
	states: HashMap<String, State>,
}

impl NGramModel {
	/// Creates an empty model of order `n` with the default `^`/`$` sentinels.
	///
	/// # Errors
	/// Returns an error if `n < 2`.
	pub fn new(n: usize) -> Result<Self> {
		Self::with_sentinels(n, DEFAULT_START_CHAR, DEFAULT_END_CHAR)
	}

	/// Creates an empty model of order `n` with custom sentinels.
	///
	/// # Errors
	/// Returns an error if `n < 2` or if both sentinels are the same character.
	pub fn with_sentinels(n: usize, start_char: char, end_char: char) -> Result<Self> {
		if n < 2 {
			return Err(Error::invalid("n must be >= 2"));
		}
		if start_char == end_char {
			return Err(Error::invalid("start and end sentinels must differ"));
		}
		Ok(Self {
			n,
			start_char,
			end_char,
			max_word_len: DEFAULT_MAX_WORD_LEN,
			states: HashMap::new(),
		})
	}

	/// Builds a model of order `n` from a vocabulary.
	pub fn build<I, S>(words: I, n: usize) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut model = Self::new(n)?;
		for word in words {
			model.add_word(word.as_ref());
		}
		Ok(model)
	}

	/// Sets the safety cutoff on generated word length.
	pub fn with_max_word_len(mut self, max_word_len: usize) -> Self {
		self.max_word_len = max_word_len;
		self
	}

	pub fn order(&self) -> usize {
		self.n
	}

	pub fn start_char(&self) -> char {
		self.start_char
	}

	pub fn end_char(&self) -> char {
		self.end_char
	}

	pub fn max_word_len(&self) -> usize {
		self.max_word_len
	}

	/// Number of distinct prefixes.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// All known prefixes, in no particular order.
	pub fn prefixes(&self) -> impl Iterator<Item = &str> {
		self.states.keys().map(String::as_str)
	}

	/// Adds one word to the model.
	///
	/// The word is padded with `n-1` sentinels on each side, then every
	/// window of `n` characters records a `prefix -> next` transition.
	pub fn add_word(&mut self, word: &str) {
		let pad = self.n - 1;
		let chars: Vec<char> = std::iter::repeat_n(self.start_char, pad)
			.chain(word.chars())
			.chain(std::iter::repeat_n(self.end_char, pad))
			.collect();

		for window in chars.windows(self.n) {
			let prefix: String = window[..pad].iter().collect();
			let next_char = window[pad];
			self.states
				.entry(prefix)
				.or_insert_with_key(|key| State::new(key))
				.add_transition(next_char);
		}
	}

	/// Next-character probabilities after `prefix`.
	///
	/// Returns `None` if the prefix was never observed.
	pub fn distribution(&self, prefix: &str) -> Option<BTreeMap<char, f64>> {
		self.states.get(prefix).map(State::distribution)
	}

	/// Samples one word from the model.
	///
	/// Generation starts from `n-1` start sentinels and slides the context
	/// one character at a time. It stops on the end sentinel, on a context
	/// that was never observed, or once `max_word_len` characters have been
	/// produced. An empty string is a valid result.
	pub fn sample_word<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
		let mut word = String::new();
		let mut context: VecDeque<char> = std::iter::repeat_n(self.start_char, self.n - 1).collect();
		let mut length = 0;

		loop {
			if length >= self.max_word_len {
				log::debug!("word generation cut at {} characters: {word}", self.max_word_len);
				break;
			}
			let key: String = context.iter().collect();
			let next_char = match self.states.get(&key).and_then(|state| state.predict(rng)) {
				Some(c) => c,
				None => break,
			};
			if next_char == self.end_char {
				break;
			}
			word.push(next_char);
			length += 1;
			context.pop_front();
			context.push_back(next_char);
		}

		word
	}

	/// Merges another n-gram model into this one.
	///
	/// # Errors
	/// Returns an error if the orders or sentinels do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.n != other.n {
			return Err(Error::invalid(format!("n mismatch: {} vs {}", self.n, other.n)));
		}
		if self.start_char != other.start_char || self.end_char != other.end_char {
			return Err(Error::invalid(format!(
				"Start/end char mismatch: self=({}-{}), other=({}-{})",
				self.start_char, self.end_char, other.start_char, other.end_char
			)));
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state).map_err(Error::InvalidInput)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}

	/// Writes the model to `path` (postcard encoding).
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	/// Reads a model written by `save`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}

	/// Loads the model of a word list, using a binary cache when available.
	///
	/// - `words_path` is a text file with one word per line.
	/// - The cache lives next to it with a `.bin` extension.
	/// - A cache of a different order is ignored and overwritten.
	pub fn load_or_build<P: AsRef<Path>>(words_path: P, n: usize) -> Result<Self> {
		let binary_data_path = build_output_path(&words_path, "bin")?;
		if binary_data_path.exists() {
			match Self::load(&binary_data_path) {
				Ok(model) if model.n == n => {
					log::debug!("loaded cached model {}", binary_data_path.display());
					return Ok(model);
				}
				Ok(model) => log::info!("cached model has order {}, rebuilding with {n}", model.n),
				Err(e) => log::warn!("ignoring unreadable cache {}: {e}", binary_data_path.display()),
			}
		}

		let lines = read_file(&words_path)?;
		let model = Self::build(lines.iter().map(|line| line.trim()).filter(|w| !w.is_empty()), n)?;
		model.save(&binary_data_path)?;
		log::info!("built {n}-gram model with {} prefixes", model.len());
		Ok(model)
	}
}
