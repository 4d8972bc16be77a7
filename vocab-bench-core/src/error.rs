use thiserror::Error;

/// Errors returned by the vocabulary benchmark library.
///
/// The probability cascade never fails and has no variant here.
/// Everything else (table loading, synthesis parameters, model caches)
/// reports through this type.
#[derive(Debug, Error)]
pub enum Error {
	/// A parameter is outside its valid domain (empty corpus, zero target, ...).
	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	/// Binary model cache could not be encoded or decoded.
	#[error("serialization error: {0}")]
	Serialization(#[from] postcard::Error),

	/// A single CSV row could not be interpreted.
	#[error("malformed row at line {line}: {reason}")]
	MalformedRow { line: u64, reason: String },
}

impl Error {
	/// Shorthand for `Error::InvalidInput`.
	pub(crate) fn invalid<S: Into<String>>(reason: S) -> Self {
		Error::InvalidInput(reason.into())
	}
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
