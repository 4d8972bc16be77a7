use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use vocab_bench_core::FrequencyTable;
use vocab_bench_core::io::{self, get_filename, list_files, sort_by_month};
use vocab_bench_core::model::accumulator::make_accu;
use vocab_bench_core::model::{CrpSynthesizer, NGramModel, SynthesisInput};
use vocab_bench_core::score::{accumulator_scores, oov_rate, oov_type_rate, threshold_score};
use vocab_bench_core::segment::{chunk_lines, split_by_budgets};
use vocab_bench_core::stats::accu_model_tok_stats;
use vocab_bench_core::stats::cascade::{probability_with_stage, stage_breakdown};
use vocab_bench_core::stats::format::custom_format;

mod config;

use config::{BenchConfig, load_config};

#[derive(Parser, Debug)]
#[command(name = "vocab-bench", about = "Vocabulary acquisition benchmark tools")]
struct Args {
	/// JSON file with default settings
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	/// Random seed (overrides the config file)
	#[arg(long, global = true)]
	seed: Option<u64>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Count the words of a transcript (one utterance per line)
	Count {
		#[arg(short, long)]
		input: PathBuf,
		#[arg(short, long)]
		output: PathBuf,
	},
	/// Cut a transcript into monthly frequency tables (`1.csv`, `2.csv`, ...)
	Chunk {
		#[arg(short, long)]
		input: PathBuf,
		/// Output directory
		#[arg(short, long)]
		output: PathBuf,
		#[arg(long)]
		months: usize,
	},
	/// Hand consecutive rows of a generated table to months with token budgets
	Split {
		#[arg(short, long)]
		generated: PathBuf,
		/// Output directory
		#[arg(short, long)]
		output: PathBuf,
		/// Tokens per month, comma separated
		#[arg(long, value_delimiter = ',', required = true)]
		budgets: Vec<u64>,
	},
	/// Accumulator-model statistics of a single word
	Stats {
		/// Occurrences of the word in the reference corpus
		#[arg(long)]
		count: u64,
		/// Reference corpus size in tokens
		#[arg(long)]
		ref_size: u64,
		/// Generated corpus size (defaults to the reference size)
		#[arg(long)]
		gen_size: Option<u64>,
	},
	/// Value of every approximation for P(k observations | p, n)
	Cascade {
		#[arg(short)]
		k: u64,
		#[arg(short)]
		p: f64,
		#[arg(short)]
		n: u64,
	},
	/// Accumulator-model statistics of every word of a reference table
	Estimate {
		#[arg(short, long)]
		reference: PathBuf,
		#[arg(short, long)]
		output: PathBuf,
		#[arg(long)]
		gen_size: Option<u64>,
	},
	/// Synthesize a corpus with the Chinese Restaurant Process
	Crp {
		#[arg(short, long)]
		reference: PathBuf,
		#[arg(short, long)]
		output: PathBuf,
		/// Corpus size in tokens (defaults to the reference size)
		#[arg(long)]
		target: Option<u64>,
		/// Concentration parameter (takes precedence over --oov-rate)
		#[arg(long)]
		concentration: Option<f64>,
		/// Desired share of novel-word insertions
		#[arg(long)]
		oov_rate: Option<f64>,
		#[arg(long)]
		ngram_order: Option<usize>,
		#[arg(long)]
		max_word_len: Option<usize>,
	},
	/// Synthesize a corpus with the accumulator (multinomial) model
	Accu {
		#[arg(short, long)]
		reference: PathBuf,
		#[arg(short, long)]
		output: PathBuf,
		#[arg(long)]
		target: Option<u64>,
	},
	/// Sample words from a character n-gram model of a word list
	Sample {
		/// One word per line; the model is cached next to it
		#[arg(short, long)]
		words: PathBuf,
		#[arg(long)]
		ngram_order: Option<usize>,
		#[arg(long, default_value_t = 10)]
		number: usize,
	},
	/// Score generated tables against a test vocabulary
	Score {
		/// A generated table, or a directory of monthly tables
		#[arg(short, long)]
		generated: PathBuf,
		/// CSV with a `word` column
		#[arg(short, long)]
		test: PathBuf,
		/// Reference table, to report OOV rates
		#[arg(short, long)]
		reference: Option<PathBuf>,
		#[arg(long)]
		threshold: Option<u64>,
	},
}

fn make_rng(seed: Option<u64>) -> StdRng {
	match seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	}
}

fn read_reference(path: &Path) -> anyhow::Result<FrequencyTable> {
	let table = io::read_frequency_table(path).with_context(|| format!("reading {}", path.display()))?;
	log::info!("{}: {} types, {} tokens", path.display(), table.len(), table.total());
	Ok(table)
}

/// Builds the CRP parameters: flags first, then the config file.
fn synthesis_input(
	config: &BenchConfig,
	reference: &FrequencyTable,
	target: Option<u64>,
	concentration: Option<f64>,
	oov_rate: Option<f64>,
	ngram_order: Option<usize>,
	max_word_len: Option<usize>,
) -> anyhow::Result<SynthesisInput> {
	let mut input = SynthesisInput::default();
	input.set_target_token_count(target.unwrap_or(reference.total()))?;
	input.set_ngram_order(ngram_order.unwrap_or(config.ngram_order))?;
	input.max_word_len = max_word_len.unwrap_or(config.max_word_len);

	match (concentration, oov_rate.or(config.oov_rate)) {
		(Some(concentration), _) => input.set_concentration(concentration)?,
		(None, Some(rate)) => input.set_oov_rate(rate)?,
		(None, None) => bail!("either --concentration or --oov-rate is required"),
	}
	Ok(input)
}

fn score_file(
	path: &Path,
	test_words: &[String],
	reference: Option<&FrequencyTable>,
	threshold: u64,
) -> anyhow::Result<()> {
	let generated = read_reference(path)?;
	let name = get_filename(path)?;
	let score = threshold_score(&generated, test_words, threshold);
	let mut line = format!("{name}\tscore={}", score.map_or("nan".to_owned(), custom_format));
	if let Some(reference) = reference {
		let tokens = oov_rate(&generated, reference).unwrap_or(f64::NAN);
		let types = oov_type_rate(&generated, reference).unwrap_or(f64::NAN);
		line.push_str(&format!("\toov_tokens={}\toov_types={}", custom_format(tokens), custom_format(types)));
	}
	println!("{line}");
	Ok(())
}

/// Writes `<month>.csv` tables, months numbered from 1.
fn write_months(dir: &Path, months: &[FrequencyTable]) -> anyhow::Result<()> {
	fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
	for (i, table) in months.iter().enumerate() {
		let path = dir.join(format!("{}.csv", i + 1));
		io::write_frequency_table(&path, table)?;
		log::info!("{}: {} types, {} tokens", path.display(), table.len(), table.total());
	}
	Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
	let config = load_config(args.config.as_deref())?;
	let mut rng = make_rng(args.seed.or(config.seed));

	match args.command {
		Command::Count { input, output } => {
			let lines = io::read_file(&input).with_context(|| format!("reading {}", input.display()))?;
			let table = FrequencyTable::from_lines(&lines).sorted_by_count();
			io::write_frequency_table(&output, &table)?;
			log::info!("{}: {} types, {} tokens", output.display(), table.len(), table.total());
		}
		Command::Chunk { input, output, months } => {
			let lines = io::read_file(&input).with_context(|| format!("reading {}", input.display()))?;
			write_months(&output, &chunk_lines(&lines, months)?)?;
		}
		Command::Split { generated, output, budgets } => {
			let table = read_reference(&generated)?;
			write_months(&output, &split_by_budgets(&table, &budgets))?;
		}
		Command::Stats { count, ref_size, gen_size } => {
			let stats = accu_model_tok_stats(count, ref_size, gen_size)?;
			println!("gen_token_count\t{}", stats.gen_token_count);
			for (name, value) in [
				("p_miss", stats.p_miss),
				("p_once", stats.p_once),
				("p_same", stats.p_same),
				("p_less", stats.p_less),
				("p_more", stats.p_more),
				("score", stats.score),
			] {
				println!("{name}\t{}", custom_format(value));
			}
		}
		Command::Cascade { k, p, n } => {
			if !(0.0..=1.0).contains(&p) {
				bail!("p must be between 0.0 and 1.0, got {p}");
			}
			let breakdown = stage_breakdown(k, p, n);
			let show = |value: Option<f64>| value.map_or("-".to_owned(), custom_format);
			println!("exact\t{}", show(breakdown.exact));
			println!("poisson\t{}", show(breakdown.poisson));
			println!("poisson_stirling\t{}", show(breakdown.poisson_stirling));
			println!("gaussian\t{}", show(breakdown.gaussian));
			let (_, stage) = probability_with_stage(k, p, n);
			println!("total\t{}\t({stage:?})", custom_format(breakdown.total));
		}
		Command::Estimate { reference, output, gen_size } => {
			let table = read_reference(&reference)?;
			let rows = accumulator_scores(&table, gen_size)?;
			io::write_token_stats(&output, &rows)?;
			let mean = rows.iter().map(|(_, _, s)| s.score).sum::<f64>() / rows.len().max(1) as f64;
			log::info!("{}: {} words, mean score {}", output.display(), rows.len(), custom_format(mean));
		}
		Command::Crp {
			reference,
			output,
			target,
			concentration,
			oov_rate,
			ngram_order,
			max_word_len,
		} => {
			let table = read_reference(&reference)?;
			let input = synthesis_input(
				&config,
				&table,
				target,
				concentration,
				oov_rate,
				ngram_order,
				max_word_len,
			)?;
			let outcome = CrpSynthesizer::new(&table, &input)?.run(&mut rng);
			io::write_frequency_table(&output, &outcome.table)?;
			log::info!(
				"{}: {} types, {} tokens, {} novel insertions",
				output.display(),
				outcome.table.len(),
				outcome.table.total(),
				outcome.novel_insertions
			);
		}
		Command::Accu { reference, output, target } => {
			let table = read_reference(&reference)?;
			let generated = make_accu(&table, target, &mut rng)?;
			io::write_frequency_table(&output, &generated)?;
			log::info!("{}: {} types, {} tokens", output.display(), generated.len(), generated.total());
		}
		Command::Sample { words, ngram_order, number } => {
			let model = NGramModel::load_or_build(&words, ngram_order.unwrap_or(config.ngram_order))?
				.with_max_word_len(config.max_word_len);
			for i in 0..number {
				println!("Generated word {}: {}", i + 1, model.sample_word(&mut rng));
			}
		}
		Command::Score { generated, test, reference, threshold } => {
			let test_words = io::read_word_column(&test)?;
			let reference = reference.as_deref().map(read_reference).transpose()?;
			let threshold = threshold.unwrap_or(config.memory_threshold);

			if generated.is_dir() {
				let mut files = list_files(&generated, "csv")?;
				sort_by_month(&mut files);
				for file in files {
					// One bad table does not stop the others
					if let Err(e) = score_file(&generated.join(&file), &test_words, reference.as_ref(), threshold) {
						log::warn!("skipping {file}: {e:#}");
					}
				}
			} else {
				score_file(&generated, &test_words, reference.as_ref(), threshold)?;
			}
		}
	}
	Ok(())
}

fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	run(Args::parse())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn arguments_parse() {
		let args = Args::try_parse_from([
			"vocab-bench", "--seed", "3", "crp", "-r", "ref.csv", "-o", "out.csv", "--oov-rate", "0.01",
		])
		.unwrap();
		assert_eq!(args.seed, Some(3));
		assert!(matches!(args.command, Command::Crp { oov_rate: Some(_), concentration: None, .. }));
	}

	#[test]
	fn concentration_flag_wins_over_oov_rate() {
		let reference = FrequencyTable::from_counts([("a", 10)]);
		let config = BenchConfig { oov_rate: Some(0.5), ..BenchConfig::default() };
		let input = synthesis_input(&config, &reference, None, Some(2.0), None, None, None).unwrap();
		assert_eq!(input.concentration(), 2.0);
		assert_eq!(input.target_token_count(), Some(10));

		let input = synthesis_input(&config, &reference, Some(100), None, None, None, None).unwrap();
		assert_eq!(input.concentration(), 50.0);

		let bare = BenchConfig::default();
		assert!(synthesis_input(&bare, &reference, None, None, None, None, None).is_err());
	}

	#[test]
	fn crp_command_writes_a_table() {
		let dir = tempfile::tempdir().unwrap();
		let reference = dir.path().join("ref.csv");
		let output = dir.path().join("gen.csv");
		std::fs::write(&reference, "word,count\nball,6\ndog,3\ncat,1\n").unwrap();
		let args = Args::try_parse_from([
			"vocab-bench",
			"--seed",
			"1",
			"crp",
			"-r",
			reference.to_str().unwrap(),
			"-o",
			output.to_str().unwrap(),
			"--concentration",
			"1.0",
		])
		.unwrap();
		run(args).unwrap();
		let generated = io::read_frequency_table(&output).unwrap();
		assert_eq!(generated.total(), 10);
	}

	#[test]
	fn split_command_writes_months_in_order() {
		let dir = tempfile::tempdir().unwrap();
		let generated = dir.path().join("gen.csv");
		let months = dir.path().join("months");
		let rows: String = (0..10).map(|i| format!("w{i},{}\n", i + 1)).collect();
		std::fs::write(&generated, format!("word,count\n{rows}")).unwrap();
		let budgets = (1..=10).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
		let args = Args::try_parse_from([
			"vocab-bench",
			"split",
			"-g",
			generated.to_str().unwrap(),
			"-o",
			months.to_str().unwrap(),
			"--budgets",
			budgets.as_str(),
		])
		.unwrap();
		run(args).unwrap();

		let mut files = list_files(&months, "csv").unwrap();
		sort_by_month(&mut files);
		let expected: Vec<String> = (1..=10).map(|i| format!("{i}.csv")).collect();
		assert_eq!(files, expected);
		let tenth = io::read_frequency_table(months.join("10.csv")).unwrap();
		assert_eq!(tenth.get("w9"), Some(10));
	}

	#[test]
	fn chunk_command_splits_a_transcript() {
		let dir = tempfile::tempdir().unwrap();
		let transcript = dir.path().join("child.txt");
		let months = dir.path().join("months");
		std::fs::write(&transcript, "look at the ball\nthe doggy\nwhere is the ball\n").unwrap();
		let args = Args::try_parse_from([
			"vocab-bench",
			"chunk",
			"-i",
			transcript.to_str().unwrap(),
			"-o",
			months.to_str().unwrap(),
			"--months",
			"2",
		])
		.unwrap();
		run(args).unwrap();

		let first = io::read_frequency_table(months.join("1.csv")).unwrap();
		let second = io::read_frequency_table(months.join("2.csv")).unwrap();
		assert_eq!(first.total() + second.total(), 10);
		assert_eq!(first.get("look"), Some(1));
		assert_eq!(second.get("where"), Some(1));
	}
}
