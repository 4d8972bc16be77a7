/// Fenwick (binary indexed) tree over integer weights.
///
/// Supports appending rows, incrementing a row and drawing a row with
/// probability proportional to its weight, all in O(log n).
///
/// # Invariants
/// - `tree[0]` is unused; `tree[i]` holds the sum of the `i & -i` weights ending at row `i - 1`
/// - `total` is the sum of all weights
#[derive(Clone, Debug)]
pub struct WeightedTree {
	tree: Vec<u64>,
	total: u64,
}

impl Default for WeightedTree {
	fn default() -> Self {
		Self::new()
	}
}

impl WeightedTree {
	pub fn new() -> Self {
		Self { tree: vec![0], total: 0 }
	}

	/// Builds a tree from initial weights in O(n).
	pub fn from_weights<I: IntoIterator<Item = u64>>(weights: I) -> Self {
		let mut tree = vec![0];
		tree.extend(weights);
		let total = tree.iter().sum();
		for i in 1..tree.len() {
			let parent = i + lowbit(i);
			if parent < tree.len() {
				tree[parent] += tree[i];
			}
		}
		Self { tree, total }
	}

	/// Number of rows.
	pub fn len(&self) -> usize {
		self.tree.len() - 1
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Sum of all weights.
	pub fn total(&self) -> u64 {
		self.total
	}

	/// Sum of the weights of the first `count` rows.
	pub fn prefix_sum(&self, count: usize) -> u64 {
		let mut i = count.min(self.len());
		let mut sum = 0;
		while i > 0 {
			sum += self.tree[i];
			i -= lowbit(i);
		}
		sum
	}

	/// Appends a row and returns its index.
	pub fn push(&mut self, weight: u64) -> usize {
		let i = self.tree.len();
		let covered = self.prefix_sum(i - 1) - self.prefix_sum(i - lowbit(i));
		self.tree.push(weight + covered);
		self.total += weight;
		i - 1
	}

	/// Adds `delta` to the weight of row `index`.
	pub fn add(&mut self, index: usize, delta: u64) {
		let mut i = index + 1;
		while i < self.tree.len() {
			self.tree[i] += delta;
			i += lowbit(i);
		}
		self.total += delta;
	}

	/// Row whose cumulative weight range contains `target`.
	///
	/// Returns the smallest index with `prefix_sum(index + 1) > target`, so
	/// zero-weight rows are never returned. `None` if `target >= total`.
	pub fn find(&self, target: u64) -> Option<usize> {
		if target >= self.total {
			return None;
		}
		let n = self.len();
		let mut pos = 0;
		let mut remaining = target;
		let mut step = if n == 0 { 0 } else { 1 << (usize::BITS - 1 - n.leading_zeros()) };
		while step > 0 {
			let next = pos + step;
			if next <= n && self.tree[next] <= remaining {
				pos = next;
				remaining -= self.tree[next];
			}
			step >>= 1;
		}
		Some(pos)
	}
}

fn lowbit(i: usize) -> usize {
	i & i.wrapping_neg()
}
