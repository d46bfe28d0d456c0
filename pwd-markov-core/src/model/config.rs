use serde::{Deserialize, Serialize};

/// Character bag used when no configuration file overrides it.
///
/// Printable ASCII plus the default end-of-password sentinel (`\n`).
const DEFAULT_CHAR_BAG: &str = concat!(
	"abcdefghijklmnopqrstuvwxyz",
	"ABCDEFGHIJKLMNOPQRSTUVWXYZ",
	"0123456789",
	"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ ",
	"\n"
);

/// Smoothing strategy selector.
///
/// Chosen once at model construction and never changed at runtime.
/// `Backoff` also selects the backoff-oriented training algorithm and
/// adds the start-of-password sentinel to the alphabet.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Smoothing {
	/// Raw relative frequencies. Unobserved contexts yield an
	/// undefined-distribution error.
	None,
	/// Laplace-style smoothing: every count is raised by a constant
	/// amount, so the distribution is strictly positive everywhere.
	Additive,
	/// Additive counts floored below a threshold, with recursive
	/// fallback to shorter contexts when a context has no mass.
	Backoff,
}

impl std::str::FromStr for Smoothing {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"none" => Ok(Self::None),
			"additive" => Ok(Self::Additive),
			"backoff" => Ok(Self::Backoff),
			other => Err(format!("Unknown smoothing kind: {} (expected none, additive or backoff)", other)),
		}
	}
}

/// Configuration of a password Markov model.
///
/// # Responsibilities
/// - Define the character bag and the end-of-password sentinel
/// - Select the model order and the smoothing strategy
/// - Carry the smoothing parameters (additive amount, backoff threshold)
///
/// # Invariants (checked by `validate`)
/// - `order >= 1`
/// - `char_bag` contains `end_char`
/// - `additive_smoothing_amount` and `backoff_smoothing_threshold` are
///   finite and non-negative
///
/// All fields are plain typed values; configuration files are plain JSON
/// deserialized into this struct. No configuration value is ever
/// evaluated as code.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MarkovConfig {
	/// Legal password characters, including the end sentinel.
	pub char_bag: String,

	/// End-of-password sentinel. Must be part of `char_bag`.
	pub end_char: char,

	/// Maximum n-gram length; `order - 1` characters of context are
	/// used for prediction.
	pub order: usize,

	/// Smoothing strategy (and, for `Backoff`, training variant).
	pub smoothing: Smoothing,

	/// Constant added to every count by the additive and backoff
	/// strategies.
	pub additive_smoothing_amount: f64,

	/// Counts below this value are treated as absent by the backoff
	/// strategy.
	pub backoff_smoothing_threshold: f64,
}

impl Default for MarkovConfig {
	fn default() -> Self {
		Self {
			char_bag: DEFAULT_CHAR_BAG.to_owned(),
			end_char: '\n',
			order: 2,
			smoothing: Smoothing::None,
			additive_smoothing_amount: 0.0,
			backoff_smoothing_threshold: 10.0,
		}
	}
}

impl MarkovConfig {
	/// Checks the configuration invariants.
	///
	/// # Errors
	/// Returns an error if the order is zero, the end sentinel is
	/// missing from the character bag, or a smoothing parameter is
	/// negative or not finite.
	pub fn validate(&self) -> Result<(), String> {
		if self.order < 1 {
			return Err("Order must be >= 1".to_owned());
		}
		if !self.char_bag.contains(self.end_char) {
			return Err(format!(
				"End sentinel {:?} not in char bag, please change the config",
				self.end_char
			));
		}
		if !self.additive_smoothing_amount.is_finite() || self.additive_smoothing_amount < 0.0 {
			return Err(format!(
				"Additive smoothing amount must be finite and >= 0, got {}",
				self.additive_smoothing_amount
			));
		}
		if !self.backoff_smoothing_threshold.is_finite() || self.backoff_smoothing_threshold < 0.0 {
			return Err(format!(
				"Backoff smoothing threshold must be finite and >= 0, got {}",
				self.backoff_smoothing_threshold
			));
		}
		Ok(())
	}
}
