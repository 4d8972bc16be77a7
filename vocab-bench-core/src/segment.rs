//! Month segmentation of transcripts and generated tables.
//!
//! A longitudinal corpus is cut into consecutive chunks of roughly equal
//! size, one per month of recording. Generated tables are cut the other
//! way round: consecutive rows are handed to each month until its token
//! budget is met.

use crate::error::{Error, Result};
use crate::model::frequency_table::FrequencyTable;

/// Assigns a chunk number (from 1) to each row of token counts.
///
/// Chunks hold about `ceil(total / num_chunks)` tokens. A row opens the
/// next chunk when it would overflow a non-empty current one; the last
/// chunk takes everything left. Rows are never split, so trailing chunks
/// stay empty when a few large rows fill the earlier ones.
///
/// # Errors
/// Returns `Error::InvalidInput` if `num_chunks` is zero.
pub fn assign_chunks(token_counts: &[u64], num_chunks: usize) -> Result<Vec<usize>> {
	if num_chunks == 0 {
		return Err(Error::invalid("number of chunks must be > 0"));
	}
	let total: u64 = token_counts.iter().sum();
	let per_chunk = total.div_ceil(num_chunks as u64);

	let mut chunk = 1;
	let mut filled = 0;
	let mut chunks = Vec::with_capacity(token_counts.len());
	for &count in token_counts {
		if filled > 0 && filled + count > per_chunk && chunk < num_chunks {
			chunk += 1;
			filled = 0;
		}
		chunks.push(chunk);
		filled += count;
	}
	Ok(chunks)
}

/// Splits transcript lines into `num_chunks` consecutive frequency tables.
///
/// Each line weighs its number of whitespace-separated tokens. Chunks that
/// receive no line come back as empty tables.
pub fn chunk_lines<S: AsRef<str>>(lines: &[S], num_chunks: usize) -> Result<Vec<FrequencyTable>> {
	let sizes: Vec<u64> = lines
		.iter()
		.map(|line| line.as_ref().split_whitespace().count() as u64)
		.collect();
	let chunks = assign_chunks(&sizes, num_chunks)?;

	let mut tables = vec![FrequencyTable::new(); num_chunks];
	for (line, chunk) in lines.iter().zip(chunks) {
		for token in line.as_ref().split_whitespace() {
			tables[chunk - 1].add(token.to_lowercase(), 1);
		}
	}
	Ok(tables)
}

/// Splits `table` after the first row where the running token count
/// reaches `target`.
///
/// Returns `(head, rest)`. When the table holds fewer than `target` tokens,
/// or `target` is zero, the head is empty and `rest` is the whole table.
pub fn split_at_token_sum(table: &FrequencyTable, target: u64) -> (FrequencyTable, FrequencyTable) {
	let mut running = 0;
	let split = match target {
		0 => None,
		_ => table.iter().position(|row| {
			running += row.count;
			running >= target
		}),
	};
	let Some(last) = split else {
		return (FrequencyTable::new(), table.clone());
	};

	let mut head = FrequencyTable::new();
	let mut rest = FrequencyTable::new();
	for (i, row) in table.iter().enumerate() {
		let part = if i <= last { &mut head } else { &mut rest };
		part.add(row.word.clone(), row.count);
	}
	(head, rest)
}

/// Hands consecutive rows of `table` to each month, one token budget per month.
///
/// A month whose budget cannot be met by the remaining rows gets an empty
/// table and leaves the rows to the following months.
pub fn split_by_budgets(table: &FrequencyTable, budgets: &[u64]) -> Vec<FrequencyTable> {
	let mut rest = table.clone();
	let mut months = Vec::with_capacity(budgets.len());
	for &budget in budgets {
		let (head, tail) = split_at_token_sum(&rest, budget);
		if head.is_empty() && budget > 0 {
			log::warn!("month budget of {budget} tokens exceeds the {} tokens left", rest.total());
		}
		months.push(head);
		rest = tail;
	}
	months
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn chunks_follow_cumulative_counts() {
		// 12 tokens in 3 chunks of 4
		assert_eq!(assign_chunks(&[2, 2, 3, 1, 4], 3).unwrap(), vec![1, 1, 2, 2, 3]);
		// The last chunk absorbs any overflow
		assert_eq!(assign_chunks(&[1, 1, 1, 9], 2).unwrap(), vec![1, 1, 1, 2]);
		assert_eq!(assign_chunks(&[5, 5, 5], 1).unwrap(), vec![1, 1, 1]);
		assert!(assign_chunks(&[], 4).unwrap().is_empty());
		assert!(matches!(assign_chunks(&[1], 0), Err(Error::InvalidInput(_))));
	}

	#[test]
	fn lines_become_month_tables() {
		let lines = ["the ball", "a dog", "the dog", "Ball"];
		let months = chunk_lines(&lines, 2).unwrap();
		assert_eq!(months.len(), 2);
		assert_eq!(months[0].total(), 4);
		assert_eq!(months[0].get("the"), Some(1));
		assert_eq!(months[1].get("dog"), Some(1));
		assert_eq!(months[1].get("ball"), Some(1));

		let sparse = chunk_lines(&["one two three"], 3).unwrap();
		assert_eq!(sparse.iter().map(FrequencyTable::total).collect::<Vec<_>>(), vec![3, 0, 0]);
	}

	#[test]
	fn split_includes_the_row_reaching_the_target() {
		let table = FrequencyTable::from_counts([("a", 3), ("b", 2), ("c", 5)]);
		let (head, rest) = split_at_token_sum(&table, 4);
		assert_eq!(head.words().collect::<Vec<_>>(), vec!["a", "b"]);
		assert_eq!(rest.words().collect::<Vec<_>>(), vec!["c"]);

		let (head, rest) = split_at_token_sum(&table, 3);
		assert_eq!(head.total(), 3);
		assert_eq!(rest.total(), 7);

		let (head, rest) = split_at_token_sum(&table, 11);
		assert!(head.is_empty());
		assert_eq!(rest.total(), 10);

		let (head, _) = split_at_token_sum(&table, 0);
		assert!(head.is_empty());
	}

	#[test]
	fn budgets_consume_the_table_in_order() {
		let table = FrequencyTable::from_counts([("a", 3), ("b", 2), ("c", 5), ("d", 1)]);
		let months = split_by_budgets(&table, &[3, 20, 6, 1]);
		assert_eq!(months[0].words().collect::<Vec<_>>(), vec!["a"]);
		assert!(months[1].is_empty());
		assert_eq!(months[2].words().collect::<Vec<_>>(), vec!["b", "c"]);
		assert_eq!(months[3].words().collect::<Vec<_>>(), vec!["d"]);
	}
}
