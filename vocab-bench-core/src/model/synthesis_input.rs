use crate::error::{Error, Result};

use super::ngram_model::DEFAULT_MAX_WORD_LEN;

/// Order of the character model used to invent novel words.
pub const DEFAULT_NGRAM_ORDER: usize = 3;

/// Parameters of a corpus synthesis run.
///
/// # Responsibilities
/// - Track the CRP concentration, the target corpus size and the
///   novel-word model settings
/// - Reject values outside their domain at the point they are set
///
/// # Invariants
/// - `concentration` is finite and >= 0
/// - `target_token_count`, when set, is > 0
/// - `ngram_order` is >= 2
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesisInput {
	concentration: f64,

	/// Size of the synthesized corpus; `None` means "same as the reference".
	target_token_count: Option<u64>,

	ngram_order: usize,

	/// Safety cutoff for novel word length.
	pub max_word_len: usize,
}

impl Default for SynthesisInput {
	fn default() -> Self {
		Self {
			concentration: 0.0,
			target_token_count: None,
			ngram_order: DEFAULT_NGRAM_ORDER,
			max_word_len: DEFAULT_MAX_WORD_LEN,
		}
	}
}

impl SynthesisInput {
	/// Creates parameters with the given concentration and default settings.
	///
	/// # Errors
	/// Returns an error if `concentration` is negative or not finite.
	pub fn new(concentration: f64) -> Result<Self> {
		let mut input = Self::default();
		input.set_concentration(concentration)?;
		Ok(input)
	}

	pub fn concentration(&self) -> f64 {
		self.concentration
	}

	pub fn target_token_count(&self) -> Option<u64> {
		self.target_token_count
	}

	pub fn ngram_order(&self) -> usize {
		self.ngram_order
	}

	/// Sets the CRP concentration parameter.
	pub fn set_concentration(&mut self, concentration: f64) -> Result<()> {
		if !concentration.is_finite() || concentration < 0.0 {
			return Err(Error::invalid(format!(
				"concentration must be finite and >= 0, got {concentration}"
			)));
		}
		self.concentration = concentration;
		Ok(())
	}

	/// Sets the concentration that yields `oov_rate` novel insertions
	/// over the target corpus size.
	///
	/// # Errors
	/// Returns an error if no target size is set yet or the rate is outside [0, 1].
	pub fn set_oov_rate(&mut self, oov_rate: f64) -> Result<()> {
		let target = self
			.target_token_count
			.ok_or_else(|| Error::invalid("set a target token count before an OOV rate"))?;
		self.set_concentration(concentration_for_oov_rate(oov_rate, target)?)
	}

	/// Sets the synthesized corpus size.
	pub fn set_target_token_count(&mut self, target: u64) -> Result<()> {
		if target == 0 {
			return Err(Error::invalid("target token count must be > 0"));
		}
		self.target_token_count = Some(target);
		Ok(())
	}

	/// Sets the order of the novel-word model.
	pub fn set_ngram_order(&mut self, n: usize) -> Result<()> {
		if n < 2 {
			return Err(Error::invalid("n must be >= 2"));
		}
		self.ngram_order = n;
		Ok(())
	}
}

/// Concentration giving roughly `oov_rate * target` novel-word insertions.
///
/// # Errors
/// Returns an error if `oov_rate` is outside [0, 1].
pub fn concentration_for_oov_rate(oov_rate: f64, target_token_count: u64) -> Result<f64> {
	if !(0.0..=1.0).contains(&oov_rate) {
		return Err(Error::invalid(format!("OOV rate must be between 0.0 and 1.0, got {oov_rate}")));
	}
	Ok(oov_rate * target_token_count as f64)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn setters_validate() {
		let mut input = SynthesisInput::new(1.5).unwrap();
		assert!(input.set_concentration(-1.0).is_err());
		assert!(input.set_concentration(f64::NAN).is_err());
		assert_eq!(input.concentration(), 1.5);
		assert!(input.set_target_token_count(0).is_err());
		assert!(input.set_ngram_order(1).is_err());
		assert_eq!(input.ngram_order(), DEFAULT_NGRAM_ORDER);
	}

	#[test]
	fn oov_rate_needs_a_target() {
		let mut input = SynthesisInput::default();
		assert!(input.set_oov_rate(0.01).is_err());
		input.set_target_token_count(1_000).unwrap();
		input.set_oov_rate(0.01).unwrap();
		assert!((input.concentration() - 10.0).abs() < 1e-12);
		assert!(input.set_oov_rate(2.0).is_err());
	}
}
