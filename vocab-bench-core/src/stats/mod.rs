//! Statistics of token observations under an accumulator model.
//!
//! - `special`: log-gamma, error function and normal CDF
//! - `cascade`: probability of observing a token `k` times, with overflow-safe fallbacks
//! - `token_stats`: the composite per-word record consumed by the comparison layer
//! - `format`: number formatting shared by reports

pub mod cascade;

pub mod format;

/// Special functions backing the cascade.
pub mod special;

pub mod token_stats;

pub use cascade::{probability_of_fewer_than_k, probability_of_k_observations};
pub use token_stats::{accu_model_tok_stats, TokenStats};
