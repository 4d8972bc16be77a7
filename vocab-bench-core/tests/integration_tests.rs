//! End-to-end checks of the benchmark pipeline: tables on disk, the
//! probability cascade and the corpus synthesizers.

use rand::SeedableRng;
use rand::rngs::StdRng;

use vocab_bench_core::io::{read_frequency_table, write_frequency_table, write_token_stats};
use vocab_bench_core::model::accumulator::make_accu;
use vocab_bench_core::model::{CrpSynthesizer, NGramModel, SynthesisInput, synthesize};
use vocab_bench_core::score::{accumulator_scores, oov_rate, threshold_score};
use vocab_bench_core::stats::cascade::{Stage, probability_with_stage};
use vocab_bench_core::stats::format::custom_format;
use vocab_bench_core::stats::{accu_model_tok_stats, probability_of_fewer_than_k, probability_of_k_observations};
use vocab_bench_core::{Error, FrequencyTable};

#[test]
fn test_accumulator_stats_scenario() {
	let stats = accu_model_tok_stats(10, 100, Some(100)).unwrap();
	assert_eq!(stats.gen_token_count, 10);
	assert!((stats.p_miss - 2.66e-5).abs() < 1e-7);
	assert_eq!(custom_format(stats.p_miss), "2.656e-05");
}

#[test]
fn test_fewer_than_zero_is_impossible() {
	for p in [0.0, 0.5, 1.0] {
		for n in [0, 7, 100, 2_000_000] {
			assert_eq!(probability_of_fewer_than_k(0, p, n), 0.0);
		}
	}
}

#[test]
fn test_binomial_mass_sums_to_one() {
	let total: f64 = (0..=20).map(|k| probability_of_k_observations(k, 0.37, 20)).sum();
	assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_cascade_is_continuous_across_stages() {
	// Exact binomial stops at k = 50 for a million trials; Poisson takes over
	let (n, p) = (1_000_000, 4.9e-5);
	let (below, stage_below) = probability_with_stage(49, p, n);
	let (above, stage_above) = probability_with_stage(50, p, n);
	assert_eq!(stage_below, Stage::Exact);
	assert_eq!(stage_above, Stage::Poisson);
	let poisson_below = (49.0f64 * (n as f64 * p).ln() - n as f64 * p
		- vocab_bench_core::stats::special::ln_gamma(50.0))
	.exp();
	assert!((below - poisson_below).abs() < 1e-5);
	assert!(above > 0.0 && above < 1.0);
}

#[test]
fn test_ngram_model_of_two_words() {
	let model = NGramModel::build(["cat", "cap"], 2).unwrap();
	assert_eq!(model.distribution("^").unwrap().into_iter().collect::<Vec<_>>(), vec![('c', 1.0)]);
	assert_eq!(model.distribution("c").unwrap().into_iter().collect::<Vec<_>>(), vec![('a', 1.0)]);
	assert_eq!(
		model.distribution("a").unwrap().into_iter().collect::<Vec<_>>(),
		vec![('p', 0.5), ('t', 0.5)]
	);
}

#[test]
fn test_crp_without_concentration_keeps_reference_vocabulary() {
	let reference = FrequencyTable::from_counts([("a", 100), ("b", 1)]);
	let mut rng = StdRng::seed_from_u64(2024);
	let generated = synthesize(&reference, 0.0, 101, &mut rng).unwrap();
	assert_eq!(generated.total(), 101);
	assert!(generated.words().all(|w| w == "a" || w == "b"));
	assert_eq!(oov_rate(&generated, &reference), Some(0.0));
}

#[test]
fn test_crp_total_equals_target() {
	let reference = FrequencyTable::from_lines([
		"you want the ball",
		"look at the doggy",
		"where is the ball",
		"the doggy wants the ball",
	]);
	let mut input = SynthesisInput::new(0.0).unwrap();
	input.set_target_token_count(1_000).unwrap();
	input.set_oov_rate(0.05).unwrap();
	let outcome = CrpSynthesizer::new(&reference, &input).unwrap().run(&mut StdRng::seed_from_u64(8));
	assert_eq!(outcome.table.total(), 1_000);
	assert!(outcome.novel_insertions > 0);
	assert!(outcome.collisions <= outcome.novel_insertions);
	let rate = oov_rate(&outcome.table, &reference).unwrap();
	assert!((0.0..=1.0).contains(&rate));
}

#[test]
fn test_crp_rejects_empty_reference() {
	let mut rng = StdRng::seed_from_u64(0);
	let result = synthesize(&FrequencyTable::from_counts([("a", 0)]), 1.0, 10, &mut rng);
	assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_tables_round_trip_through_csv() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("ref.csv");
	let reference = FrequencyTable::from_counts([("ball", 3), ("dog", 2), ("a,b", 1)]);
	write_frequency_table(&path, &reference).unwrap();

	let loaded = read_frequency_table(&path).unwrap();
	assert_eq!(loaded.total(), 6);
	assert_eq!(loaded.get("a,b"), Some(1));
	assert_eq!(loaded.words().collect::<Vec<_>>(), vec!["ball", "dog", "a,b"]);
}

#[test]
fn test_malformed_rows_are_skipped() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("messy.csv");
	std::fs::write(&path, "idx,word,count\n0,ball,3\n1,dog,lots\n2,cat,2.0\n3,moon\n").unwrap();
	let table = read_frequency_table(&path).unwrap();
	assert_eq!(table.get("ball"), Some(3));
	assert_eq!(table.get("cat"), Some(2));
	assert!(!table.contains("dog"));
	assert!(!table.contains("moon"));

	std::fs::write(&path, "word,freq\nball,3\n").unwrap();
	assert!(matches!(read_frequency_table(&path), Err(Error::InvalidInput(_))));
}

#[test]
fn test_accumulator_corpus_scores_against_test_words() {
	let reference = FrequencyTable::from_counts([("mommy", 50), ("ball", 30), ("giraffe", 1)]);
	let mut rng = StdRng::seed_from_u64(77);
	let generated = make_accu(&reference, Some(810), &mut rng).unwrap();
	assert_eq!(generated.total(), 810);
	let score = threshold_score(&generated, &["mommy", "ball", "unicorn"], 5).unwrap();
	assert!((score - 2.0 / 3.0).abs() < 1e-12);

	let dir = tempfile::tempdir().unwrap();
	let rows = accumulator_scores(&reference, Some(810)).unwrap();
	let path = dir.path().join("stats.csv");
	write_token_stats(&path, &rows).unwrap();
	let written = std::fs::read_to_string(&path).unwrap();
	assert!(written.starts_with("word,count,gen_token_count,p_miss,p_once,p_same,p_less,p_more,score"));
	assert_eq!(written.lines().count(), 4);
}
