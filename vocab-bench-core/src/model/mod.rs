//! Corpus models for the vocabulary benchmark.
//!
//! This module provides:
//! - Word frequency tables (`FrequencyTable`)
//! - Character n-gram word models (`NGramModel`) and their states (`State`)
//! - A Chinese Restaurant Process synthesizer (`CrpSynthesizer`)
//! - An accumulator (multinomial) synthesizer (`make_accu`)
//! - Synthesis parameters (`SynthesisInput`)

/// Accumulator model: multinomial resampling of a reference corpus.
pub mod accumulator;

/// Chinese Restaurant Process synthesizer.
///
/// Reuses reference words proportionally to their accumulated counts and
/// invents new ones through a character n-gram model.
pub mod crp;

/// Word -> count tables built from transcripts or CSV files.
pub mod frequency_table;

/// Fixed-order character n-gram model (`n >= 2`).
///
/// Handles vocabulary ingestion with start/end sentinels, next-character
/// distributions, word sampling and model caching.
pub mod ngram_model;

/// Internal representation of a single n-gram state (prefix).
///
/// Tracks outgoing transitions and supports weighted random sampling.
pub mod state;

/// Validated parameters of a synthesis run.
pub mod synthesis_input;

/// Cumulative-weight tree for O(log n) weighted draws.
pub mod weighted_tree;

pub use crp::{synthesize, CrpOutcome, CrpSynthesizer};
pub use ngram_model::NGramModel;
pub use synthesis_input::SynthesisInput;
