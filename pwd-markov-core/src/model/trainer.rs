use super::alphabet::PASSWORD_START;
use super::freq_table::FreqTable;

/// Standard n-gram extraction for one `(password, weight)` pair.
///
/// Three groups of increments:
/// 1. Every prefix of length `1..min(order - 1, len)`, capturing the
///    distribution of the first characters when less than a full
///    context window is available.
/// 2. Every sliding window of exactly `order` characters, the bulk of
///    the training signal.
/// 3. The trailing `order - 1` characters followed by the end sentinel,
///    teaching the model when to terminate.
///
/// # Panics
/// Panics on a zero weight (contract of `FreqTable::increment`).
pub fn train_standard(table: &mut FreqTable, order: usize, end_char: char, pwd: &str, weight: f64) {
	let chars: Vec<char> = pwd.chars().collect();
	let len_plus_one = chars.len() + 1;

	// Cold-start prefixes shorter than a full window
	for j in 1..order.min(len_plus_one) {
		table.increment(chars[..j].iter().collect(), weight, order);
	}

	// Fixed-width context -> next-char transitions
	for i in 0..len_plus_one.saturating_sub(order) {
		table.increment(chars[i..i + order].iter().collect(), weight, order);
	}

	// Terminal transition after the observed suffix context
	let tail = chars.len().saturating_sub(order - 1);
	let mut ngram: String = chars[tail..].iter().collect();
	ngram.push(end_char);
	table.increment(ngram, weight, order);
}

/// Backoff-oriented n-gram extraction for one `(password, weight)` pair.
///
/// The password is normalized to `start + pwd + end`, then every
/// substring of length `1..=order` at every position is incremented.
/// This densely populates counts for every context length, which the
/// backoff smoothing strategy relies on: every length-1 context is
/// guaranteed nonzero mass, so the fallback recursion always
/// terminates.
pub fn train_backoff(table: &mut FreqTable, order: usize, end_char: char, pwd: &str, weight: f64) {
	let mut norm: Vec<char> = Vec::with_capacity(pwd.len() + 2);
	norm.push(PASSWORD_START);
	norm.extend(pwd.chars());
	norm.push(end_char);

	for p in 0..norm.len() {
		for l in 1..=order.min(norm.len() - p) {
			table.increment(norm[p..p + l].iter().collect(), weight, order);
		}
	}
}
