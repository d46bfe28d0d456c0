use std::collections::HashMap;

use super::config::MarkovConfig;

/// Start-of-password sentinel used by the backoff-oriented training
/// algorithm. Not part of the configuration surface; passwords never
/// contain it.
pub const PASSWORD_START: char = '\t';

/// Immutable, sorted alphabet of a Markov model.
///
/// The alphabet is built once from the configured character bag and
/// defines the index layout of every probability vector: entry `i` of a
/// prediction always refers to `chars()[i]`. Characters are sorted by
/// code point and deduplicated, so the layout is deterministic across
/// training, inference and save/load.
///
/// # Invariants
/// - `chars` is sorted and contains no duplicates
/// - The end-of-password sentinel is always present
/// - The start-of-password sentinel is present iff the model uses
///   backoff-oriented training
#[derive(Clone, Debug)]
pub struct Alphabet {
	/// Sorted, unique characters.
	chars: Vec<char>,
	/// Reverse lookup from character to vector index.
	index: HashMap<char, usize>,
}

impl Alphabet {
	/// Builds the alphabet from a configuration.
	///
	/// When `with_start` is true (backoff-oriented training) the start
	/// sentinel is added before sorting, so it occupies its sorted
	/// position like any other character.
	///
	/// # Errors
	/// Returns an error if the end sentinel is missing from the
	/// character bag.
	pub(crate) fn from_config(config: &MarkovConfig, with_start: bool) -> Result<Self, String> {
		if !config.char_bag.contains(config.end_char) {
			return Err(format!(
				"End sentinel {:?} not in char bag, please change the config",
				config.end_char
			));
		}

		let mut chars: Vec<char> = config.char_bag.chars().collect();
		if with_start {
			chars.push(PASSWORD_START);
		}
		chars.sort_unstable();
		chars.dedup();

		let index = chars.iter().enumerate().map(|(i, c)| (*c, i)).collect();
		Ok(Self { chars, index })
	}

	/// Number of characters, i.e. the length of every probability vector.
	pub fn len(&self) -> usize {
		self.chars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	/// Sorted character sequence defining the vector layout.
	pub fn chars(&self) -> &[char] {
		&self.chars
	}

	/// Vector index of a character, or `None` if it is outside the
	/// alphabet.
	pub fn index_of(&self, c: char) -> Option<usize> {
		self.index.get(&c).copied()
	}

	pub fn contains(&self, c: char) -> bool {
		self.index.contains_key(&c)
	}
}
