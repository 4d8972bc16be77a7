use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::frequency_table::FrequencyTable;
use crate::stats::TokenStats;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/words.txt` + `"bin"` → `data/words.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./gen/12.csv"` → `"12"`
/// - `"12.csv"` → `"12"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Month number encoded in a file name (`"12.csv"` → `12`).
pub fn month_key<P: AsRef<Path>>(path: P) -> Option<u64> {
	path.as_ref().file_stem()?.to_str()?.parse().ok()
}

/// Sorts file names by month number, so that `2.csv` comes before `10.csv`.
///
/// Names without a month number come last, by name.
pub fn sort_by_month(files: &mut [String]) {
	files.sort_by_cached_key(|name| {
		let month = month_key(name);
		(month.is_none(), month, name.clone())
	});
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
	headers
		.iter()
		.position(|h| h.trim() == name)
		.ok_or_else(|| Error::invalid(format!("missing '{name}' column")))
}

/// Counts written by dataframe tools may come out as `3.0`.
fn parse_count(raw: &str) -> std::result::Result<u64, String> {
	let raw = raw.trim();
	if let Ok(count) = raw.parse::<u64>() {
		return Ok(count);
	}
	match raw.parse::<f64>() {
		Ok(value) if value >= 0.0 && value.fract() == 0.0 && value.is_finite() => Ok(value as u64),
		_ => Err(format!("invalid count '{raw}'")),
	}
}

fn parse_row(record: &csv::StringRecord, word_col: usize, count_col: usize) -> Result<(String, u64)> {
	let line = record.position().map_or(0, |p| p.line());
	let word = record
		.get(word_col)
		.ok_or_else(|| Error::MalformedRow { line, reason: "missing word".to_owned() })?;
	let raw = record
		.get(count_col)
		.ok_or_else(|| Error::MalformedRow { line, reason: "missing count".to_owned() })?;
	let count = parse_count(raw).map_err(|reason| Error::MalformedRow { line, reason })?;
	Ok((word.to_owned(), count))
}

/// Reads a frequency table from a CSV file with `word` and `count` columns.
///
/// Other columns are ignored and repeated words are summed. Rows that
/// cannot be read are logged and skipped.
///
/// # Errors
/// Fails if the file cannot be opened or lacks one of the two columns.
pub fn read_frequency_table<P: AsRef<Path>>(path: P) -> Result<FrequencyTable> {
	let path = path.as_ref();
	let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
	let headers = reader.headers()?.clone();
	let word_col = column(&headers, "word")?;
	let count_col = column(&headers, "count")?;

	let mut table = FrequencyTable::new();
	let mut skipped = 0;
	for record in reader.records() {
		let parsed = record
			.map_err(Error::from)
			.and_then(|record| parse_row(&record, word_col, count_col));
		match parsed {
			Ok((word, count)) => table.add(word, count),
			Err(e) => {
				skipped += 1;
				log::warn!("{}: {e}", path.display());
			}
		}
	}

	log::debug!(
		"{}: {} types, {} tokens, {skipped} rows skipped",
		path.display(),
		table.len(),
		table.total()
	);
	Ok(table)
}

/// Reads the `word` column of a CSV file (a test vocabulary).
pub fn read_word_column<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
	let mut reader = csv::Reader::from_path(path)?;
	let word_col = column(reader.headers()?, "word")?;
	let mut words = Vec::new();
	for record in reader.records() {
		match record {
			Ok(record) => words.extend(record.get(word_col).map(str::to_owned)),
			Err(e) => log::warn!("skipping row: {e}"),
		}
	}
	Ok(words)
}

#[derive(Serialize)]
struct TableRecord<'a> {
	word: &'a str,
	count: u64,
	freq_m: f64,
}

/// Writes a table as `word,count,freq_m`.
pub fn write_frequency_table<P: AsRef<Path>>(path: P, table: &FrequencyTable) -> Result<()> {
	let mut writer = csv::Writer::from_path(path)?;
	// Serializing writes the header with the first record only
	if table.is_empty() {
		writer.write_record(["word", "count", "freq_m"])?;
	}
	for row in table.iter() {
		writer.serialize(TableRecord {
			word: &row.word,
			count: row.count,
			freq_m: table.freq_m(&row.word).unwrap_or(0.0),
		})?;
	}
	writer.flush()?;
	Ok(())
}

#[derive(Serialize)]
struct StatsRecord<'a> {
	word: &'a str,
	count: u64,
	gen_token_count: u64,
	p_miss: f64,
	p_once: f64,
	p_same: f64,
	p_less: f64,
	p_more: f64,
	score: f64,
}

/// Writes per-word accumulator statistics.
pub fn write_token_stats<P: AsRef<Path>>(path: P, rows: &[(String, u64, TokenStats)]) -> Result<()> {
	let mut writer = csv::Writer::from_path(path)?;
	for (word, count, stats) in rows {
		writer.serialize(StatsRecord {
			word,
			count: *count,
			gen_token_count: stats.gen_token_count,
			p_miss: stats.p_miss,
			p_once: stats.p_once,
			p_same: stats.p_same,
			p_less: stats.p_less,
			p_more: stats.p_more,
			score: stats.score,
		})?;
	}
	writer.flush()?;
	Ok(())
}
