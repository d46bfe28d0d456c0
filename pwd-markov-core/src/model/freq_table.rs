use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Accumulated n-gram counts of a Markov model.
///
/// Maps each n-gram (1 to `order` characters) to its weight-accumulated
/// count. The table is created empty, mutated only by the trainers
/// during training, and read-only afterwards. It is the entire
/// serialized state of a model: the on-disk form is the flat JSON
/// object `{ "ngram": count, ... }` with no metadata.
///
/// # Invariants
/// - Every increment carries a nonzero weight
/// - No stored n-gram is longer than the model order
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(transparent)]
pub struct FreqTable {
	counts: HashMap<String, f64>,
}

impl FreqTable {
	pub fn new() -> Self {
		Self { counts: HashMap::new() }
	}

	/// Adds `weight` to the count of `ngram`.
	///
	/// # Panics
	/// A zero weight or an n-gram longer than `order` is a caller bug,
	/// not a recoverable condition, and panics.
	pub fn increment(&mut self, ngram: String, weight: f64, order: usize) {
		assert!(weight != 0.0, "zero-weight increment for ngram {:?}", ngram);
		assert!(
			ngram.chars().count() <= order,
			"ngram {:?} longer than order {}",
			ngram,
			order
		);
		*self.counts.entry(ngram).or_insert(0.0) += weight;
	}

	/// Count of an n-gram; unobserved n-grams count as zero.
	pub fn get(&self, ngram: &str) -> f64 {
		self.counts.get(ngram).copied().unwrap_or(0.0)
	}

	/// Number of distinct n-grams observed.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Sums another table into this one.
	///
	/// Intended for parallel training, where partial tables built on
	/// corpus chunks are combined into a single one. Addition of counts
	/// makes the result identical to a sequential fold.
	pub fn merge(&mut self, other: &Self) {
		for (ngram, count) in &other.counts {
			*self.counts.entry(ngram.clone()).or_insert(0.0) += count;
		}
	}
}
