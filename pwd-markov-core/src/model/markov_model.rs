use std::fs;
use std::path::Path;

use log::info;

use super::alphabet::Alphabet;
use super::config::{MarkovConfig, Smoothing};
use super::freq_table::FreqTable;
use super::smoothing::Smoother;
use super::trainer;

/// How often training progress is reported, in passwords.
const LOGGING_FREQUENCY: usize = 1_000_000;

/// Order-k character Markov model over passwords.
///
/// Composes the sorted alphabet, the frequency table and the smoothing
/// strategy, and exposes the public prediction interface consumed by
/// external search and sampling strategies.
///
/// # Responsibilities
/// - Accumulate n-gram counts from a weighted password corpus
/// - Enforce the context window (`order - 1` characters)
/// - Compute next-character distributions through the bound smoother
/// - Persist and reload the frequency table
///
/// # Invariants
/// - The frequency table is mutated only during training and read-only
///   afterwards
/// - The smoother is unbound until `train` (or loading) completes;
///   predicting before that is a contract violation and panics
/// - Once the smoother is bound, `predict` is pure and safe to call
///   concurrently from multiple readers
pub struct MarkovModel {
	config: MarkovConfig,
	alphabet: Alphabet,
	freq_table: FreqTable,
	smoother: Option<Smoother>,
}

impl MarkovModel {
	/// Creates an untrained model from a validated configuration.
	///
	/// Backoff smoothing selects the backoff-oriented trainer and adds
	/// the start sentinel to the alphabet; this is a single
	/// construction-time choice, not a runtime property.
	///
	/// # Errors
	/// Returns an error if the configuration is invalid.
	pub fn new(config: MarkovConfig) -> Result<Self, String> {
		config.validate()?;
		let with_start = config.smoothing == Smoothing::Backoff;
		let alphabet = Alphabet::from_config(&config, with_start)?;
		Ok(Self {
			config,
			alphabet,
			freq_table: FreqTable::new(),
			smoother: None,
		})
	}

	/// The model's alphabet, defining the probability-vector layout.
	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	pub fn config(&self) -> &MarkovConfig {
		&self.config
	}

	/// Maximum n-gram length.
	pub fn order(&self) -> usize {
		self.config.order
	}

	/// Folds one `(password, weight)` pair into the frequency table.
	///
	/// # Panics
	/// Panics on a zero weight (caller bug).
	pub fn train_on_pwd(&mut self, pwd: &str, weight: f64) {
		match self.config.smoothing {
			Smoothing::Backoff => trainer::train_backoff(
				&mut self.freq_table,
				self.config.order,
				self.config.end_char,
				pwd,
				weight,
			),
			_ => trainer::train_standard(
				&mut self.freq_table,
				self.config.order,
				self.config.end_char,
				pwd,
				weight,
			),
		}
	}

	/// Trains on a weighted password corpus, then freezes the model.
	///
	/// A strictly sequential left-to-right fold; corpus loading and
	/// weighting are the caller's concern.
	pub fn train<I>(&mut self, pwds: I)
	where
		I: IntoIterator<Item = (String, f64)>,
	{
		let mut ctr: usize = 0;
		for (pwd, weight) in pwds {
			ctr += 1;
			if ctr % LOGGING_FREQUENCY == 0 {
				info!("Training on password {}", ctr);
			}
			self.train_on_pwd(&pwd, weight);
		}
		self.finish_training();
	}

	/// Freezes training by binding the smoothing strategy to the
	/// accumulated table.
	///
	/// Called automatically by `train`; only needed directly when
	/// feeding the model through `train_on_pwd` or `merge`.
	pub fn finish_training(&mut self) {
		self.smoother = Some(Smoother::from_config(&self.config));
	}

	/// Sums another model's frequency table into this one.
	///
	/// Intended for parallel training: partial models built on corpus
	/// chunks are merged, then frozen. Count addition makes the result
	/// identical to a sequential fold over the whole corpus.
	///
	/// # Errors
	/// Returns an error if the configurations differ.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.config != other.config {
			return Err("Config mismatch".to_owned());
		}
		self.freq_table.merge(&other.freq_table);
		Ok(())
	}

	/// Truncates a context to the trailing `order - 1` characters.
	///
	/// The single place where context-window semantics are enforced;
	/// smoothers never see a longer context.
	pub fn truncate_context<'a>(&self, context: &'a str) -> &'a str {
		let len = context.chars().count();
		if len >= self.config.order {
			let mut rest = context.chars();
			for _ in 0..len - (self.config.order - 1) {
				rest.next();
			}
			rest.as_str()
		} else {
			context
		}
	}

	/// Writes the next-character distribution for `context` into
	/// `answer`, indexed by sorted alphabet position.
	///
	/// # Errors
	/// Returns an undefined-distribution error when the strategy cannot
	/// produce a normalized vector (see `Smoother::predict`).
	///
	/// # Panics
	/// Panics if called before training/loading completed, or if
	/// `answer` does not match the alphabet size.
	pub fn predict(&self, context: &str, answer: &mut [f64]) -> Result<(), String> {
		let smoother = self
			.smoother
			.as_ref()
			.expect("predict called before train() or from_model_file()");
		smoother.predict(
			&self.alphabet,
			&self.freq_table,
			self.truncate_context(context),
			answer,
		)
	}

	/// Probability of `next_char` following `context`.
	///
	/// # Errors
	/// Returns an error if `next_char` is outside the alphabet, or if
	/// the underlying prediction fails.
	pub fn probability_next_char(&self, context: &str, next_char: char) -> Result<f64, String> {
		let index = self.alphabet.index_of(next_char).ok_or_else(|| {
			format!("{:?} not in alphabet, please change the config", next_char)
		})?;
		let mut probs = vec![0.0; self.alphabet.len()];
		self.predict(context, &mut probs)?;
		Ok(probs[index])
	}

	/// Serializes the frequency table to `path` as a flat JSON object
	/// mapping n-grams to counts. No other metadata is embedded.
	pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
		info!("Saving model to {}", path.as_ref().display());
		let json = serde_json::to_string(&self.freq_table)?;
		fs::write(path, json)?;
		Ok(())
	}

	/// Loads a frequency table saved by `save_model` and rebuilds the
	/// smoother from `config`.
	///
	/// The smoothing configuration is not embedded in the file and must
	/// be supplied again; with the same configuration, predictions on
	/// the reloaded model are bit-identical to the original.
	///
	/// # Errors
	/// Returns an error on I/O failure, malformed JSON, or an invalid
	/// configuration.
	pub fn from_model_file<P: AsRef<Path>>(
		path: P,
		config: MarkovConfig,
	) -> Result<Self, Box<dyn std::error::Error>> {
		info!("Loading model from {}", path.as_ref().display());
		let contents = fs::read_to_string(path)?;
		let freq_table: FreqTable = serde_json::from_str(&contents)?;

		let mut model = Self::new(config)?;
		model.freq_table = freq_table;
		model.finish_training();
		Ok(model)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(char_bag: &str, end_char: char, order: usize, smoothing: Smoothing) -> MarkovConfig {
		MarkovConfig {
			char_bag: char_bag.to_owned(),
			end_char,
			order,
			smoothing,
			// Low enough for the tiny corpora used here
			backoff_smoothing_threshold: 0.0,
			..MarkovConfig::default()
		}
	}

	fn trained_ab_model() -> MarkovModel {
		let mut model = MarkovModel::new(config("ab$", '$', 2, Smoothing::None)).unwrap();
		model.train(vec![("ab".to_owned(), 1.0)]);
		model
	}

	#[test]
	fn end_to_end_order_two_example() {
		let model = trained_ab_model();

		// Alphabet sorts as $ < a < b
		let mut probs = vec![0.0; model.alphabet().len()];
		model.predict("a", &mut probs).unwrap();
		assert_eq!(probs, vec![0.0, 0.0, 1.0]);

		assert_eq!(model.probability_next_char("a", 'b').unwrap(), 1.0);
		assert_eq!(model.probability_next_char("a", 'a').unwrap(), 0.0);
		assert_eq!(model.probability_next_char("a", '$').unwrap(), 0.0);
	}

	#[test]
	fn distributions_sum_to_one() {
		let mut model = MarkovModel::new(config("ab$", '$', 3, Smoothing::Backoff)).unwrap();
		model.train(vec![
			("ab".to_owned(), 2.0),
			("aab".to_owned(), 1.0),
			("ba".to_owned(), 1.0),
		]);

		let mut probs = vec![0.0; model.alphabet().len()];
		for context in ["", "a", "b", "ab", "ba", "zzz"] {
			model.predict(context, &mut probs).unwrap();
			let total: f64 = probs.iter().sum();
			assert!((total - 1.0).abs() < 1e-9, "context {:?} sums to {}", context, total);
			assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
		}
	}

	#[test]
	fn truncation_keeps_trailing_window() {
		let model = MarkovModel::new(config("ab$", '$', 3, Smoothing::None)).unwrap();
		assert_eq!(model.truncate_context("abab"), "ab");
		assert_eq!(model.truncate_context("aba"), "ba");
		assert_eq!(model.truncate_context("ab"), "ab");
		assert_eq!(model.truncate_context("a"), "a");
		assert_eq!(model.truncate_context(""), "");
	}

	#[test]
	fn truncation_with_order_one_yields_empty_context() {
		let model = MarkovModel::new(config("ab$", '$', 1, Smoothing::None)).unwrap();
		assert_eq!(model.truncate_context("ab"), "");
		assert_eq!(model.truncate_context(""), "");
	}

	#[test]
	fn unknown_next_char_is_rejected() {
		let model = trained_ab_model();
		assert!(model.probability_next_char("a", 'z').is_err());
	}

	#[test]
	fn unseen_context_is_an_explicit_error() {
		let model = trained_ab_model();
		let mut probs = vec![0.0; model.alphabet().len()];
		assert!(model.predict("$", &mut probs).is_err());
	}

	#[test]
	#[should_panic(expected = "predict called before train")]
	fn predicting_before_training_panics() {
		let model = MarkovModel::new(config("ab$", '$', 2, Smoothing::None)).unwrap();
		let mut probs = vec![0.0; model.alphabet().len()];
		let _ = model.predict("a", &mut probs);
	}

	#[test]
	fn invalid_config_is_rejected_at_construction() {
		assert!(MarkovModel::new(config("ab", '$', 2, Smoothing::None)).is_err());
		assert!(MarkovModel::new(config("ab$", '$', 0, Smoothing::None)).is_err());
	}

	#[test]
	fn merge_is_equivalent_to_sequential_training() {
		let cfg = config("ab$", '$', 2, Smoothing::Additive);

		let mut sequential = MarkovModel::new(cfg.clone()).unwrap();
		sequential.train(vec![("ab".to_owned(), 1.0), ("aa".to_owned(), 2.0)]);

		let mut left = MarkovModel::new(cfg.clone()).unwrap();
		left.train_on_pwd("ab", 1.0);
		let mut right = MarkovModel::new(cfg).unwrap();
		right.train_on_pwd("aa", 2.0);
		left.merge(&right).unwrap();
		left.finish_training();

		let mut expected = vec![0.0; sequential.alphabet().len()];
		let mut merged = vec![0.0; left.alphabet().len()];
		for context in ["a", "b", ""] {
			sequential.predict(context, &mut expected).unwrap();
			left.predict(context, &mut merged).unwrap();
			assert_eq!(expected, merged, "context {:?}", context);
		}
	}

	#[test]
	fn merge_rejects_mismatched_configs() {
		let mut left = MarkovModel::new(config("ab$", '$', 2, Smoothing::None)).unwrap();
		let right = MarkovModel::new(config("ab$", '$', 3, Smoothing::None)).unwrap();
		assert!(left.merge(&right).is_err());
	}

	#[test]
	fn save_and_load_round_trip_is_bit_identical() {
		let cfg = config("ab$", '$', 3, Smoothing::Backoff);
		let mut model = MarkovModel::new(cfg.clone()).unwrap();
		model.train(vec![
			("ab".to_owned(), 2.0),
			("aab".to_owned(), 1.0),
			("ba".to_owned(), 3.0),
		]);

		let path = std::env::temp_dir().join("pwd-markov-round-trip.json");
		model.save_model(&path).unwrap();
		let reloaded = MarkovModel::from_model_file(&path, cfg).unwrap();
		std::fs::remove_file(&path).unwrap();

		let mut original = vec![0.0; model.alphabet().len()];
		let mut loaded = vec![0.0; reloaded.alphabet().len()];
		for context in ["", "a", "b", "ab", "ba", "aab"] {
			model.predict(context, &mut original).unwrap();
			reloaded.predict(context, &mut loaded).unwrap();
			assert_eq!(original, loaded, "context {:?}", context);
		}
	}

	#[test]
	#[should_panic(expected = "backing off on an empty context")]
	fn backoff_model_with_empty_table_fails_loudly() {
		let path = std::env::temp_dir().join("pwd-markov-empty-table.json");
		std::fs::write(&path, "{}").unwrap();
		let model =
			MarkovModel::from_model_file(&path, config("ab$", '$', 2, Smoothing::Backoff)).unwrap();
		std::fs::remove_file(&path).unwrap();

		let mut probs = vec![0.0; model.alphabet().len()];
		let _ = model.predict("a", &mut probs);
	}
}
