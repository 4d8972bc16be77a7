//! Vocabulary acquisition benchmark library.
//!
//! This crate provides the numerical core used to score generated
//! vocabularies against child-directed reference corpora:
//! - Word frequency tables built from transcripts or CSV files
//! - Token-observation probabilities under an accumulator model
//!   (exact binomial, Poisson and Gaussian approximations)
//! - Character-level n-gram models used to invent plausible novel words
//! - Corpus synthesizers (Chinese Restaurant Process and accumulator)
//! - Comparison scores between generated and reference vocabularies
//! - Month segmentation of transcripts and generated tables
//!
//! All randomness goes through a caller-provided `rand::Rng`, so every
//! synthesizer is reproducible with a seeded generator.

/// Crate error type and `Result` alias.
pub mod error;

/// Frequency tables, n-gram word models and corpus synthesizers.
pub mod model;

/// Probability cascade, composite token statistics and number formatting.
pub mod stats;

/// Comparison of generated tables against reference and test vocabularies.
pub mod score;

/// Month segmentation of transcripts and generated tables.
pub mod segment;

/// I/O utilities (file loading, path helpers, CSV tables).
pub mod io;

pub use error::{Error, Result};
pub use model::frequency_table::FrequencyTable;
