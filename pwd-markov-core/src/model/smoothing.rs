use super::alphabet::Alphabet;
use super::config::{MarkovConfig, Smoothing};
use super::freq_table::FreqTable;

/// Smoothing strategy bound to a trained model.
///
/// A closed set of variants behind one capability: compute the
/// next-character distribution for a context. The variant is selected
/// once, from the configuration, when training finishes or a model is
/// loaded; it is never swapped at runtime.
///
/// # Invariants
/// - The distribution written by `predict` sums to 1, or an error is
///   returned; a degenerate vector is never produced
/// - `Backoff` requires the backoff-oriented trainer, which guarantees
///   every length-1 context has nonzero mass
#[derive(Clone, Debug)]
pub enum Smoother {
	/// Raw relative frequencies.
	NoSmoothing,
	/// Every count raised by `amount`.
	Additive { amount: f64 },
	/// Additive counts floored to zero below `threshold`; zero-mass
	/// contexts fall back to their shorter suffix.
	Backoff { amount: f64, threshold: f64 },
}

impl Smoother {
	/// Builds the smoother matching the configured smoothing kind.
	///
	/// Deterministic: rebuilding from the same configuration always
	/// yields the same strategy, which is what makes save/load
	/// round-trips bit-identical.
	pub fn from_config(config: &MarkovConfig) -> Self {
		match config.smoothing {
			Smoothing::None => Self::NoSmoothing,
			Smoothing::Additive => Self::Additive {
				amount: config.additive_smoothing_amount,
			},
			Smoothing::Backoff => Self::Backoff {
				amount: config.additive_smoothing_amount,
				threshold: config.backoff_smoothing_threshold,
			},
		}
	}

	/// Smoothed count of one n-gram.
	fn freq(&self, table: &FreqTable, ngram: &str) -> f64 {
		match self {
			Self::NoSmoothing => table.get(ngram),
			Self::Additive { amount } => table.get(ngram) + amount,
			Self::Backoff { amount, threshold } => {
				let freq = table.get(ngram) + amount;
				if freq < *threshold { 0.0 } else { freq }
			}
		}
	}

	/// Writes the smoothed count of `context + c` for every alphabet
	/// character `c` into `answer` and returns the total.
	fn sum_elems(&self, alphabet: &Alphabet, table: &FreqTable, context: &str, answer: &mut [f64]) -> f64 {
		let mut total = 0.0;
		let mut ngram = String::with_capacity(context.len() + 4);
		for (i, next_char) in alphabet.chars().iter().enumerate() {
			ngram.clear();
			ngram.push_str(context);
			ngram.push(*next_char);
			let freq = self.freq(table, &ngram);
			answer[i] = freq;
			total += freq;
		}
		total
	}

	/// Computes the next-character distribution for a context.
	///
	/// `context` must already be truncated to at most `order - 1`
	/// characters; the model façade is the single place enforcing that.
	///
	/// # Errors
	/// Returns an undefined-distribution error when the total mass is
	/// zero and the strategy has no fallback (none, or additive with a
	/// zero amount).
	///
	/// # Panics
	/// - If `answer` does not match the alphabet size (caller bug).
	/// - If the backoff fallback reaches the empty context with zero
	///   total: the backoff trainer guarantees length-1 contexts have
	///   mass, so this indicates inconsistent training and must fail
	///   loudly rather than loop or divide by zero.
	pub fn predict(&self, alphabet: &Alphabet, table: &FreqTable, context: &str, answer: &mut [f64]) -> Result<(), String> {
		assert_eq!(
			answer.len(),
			alphabet.len(),
			"output vector length does not match alphabet size"
		);

		let mut ctx = context;
		loop {
			let total = self.sum_elems(alphabet, table, ctx, answer);
			if total != 0.0 {
				for p in answer.iter_mut() {
					*p /= total;
				}
				return Ok(());
			}

			if !matches!(self, Self::Backoff { .. }) {
				return Err(format!(
					"Undefined distribution: context {:?} was never observed",
					ctx
				));
			}

			// Widen the backoff window by dropping the leftmost character
			assert!(!ctx.is_empty(), "backing off on an empty context");
			let mut rest = ctx.chars();
			rest.next();
			ctx = rest.as_str();
		}
	}
}
