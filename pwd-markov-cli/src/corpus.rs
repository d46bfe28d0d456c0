use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use pwd_markov_core::model::config::MarkovConfig;
use pwd_markov_core::model::markov_model::MarkovModel;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
fn read_file<P: AsRef<Path>>(filename: P) -> std::io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Loads a weighted password corpus from a file.
///
/// # Formats
/// - `list`: one password per line, weight 1.
/// - `tsv`: `password<TAB>weight` per line.
///
/// Empty lines are skipped. The model itself never parses files; this
/// reader is the external corpus-loading collaborator.
///
/// # Errors
/// Returns an error on I/O failure, an unknown format, or a malformed
/// tsv line.
pub fn read_corpus<P: AsRef<Path>>(
	path: P,
	format: &str,
) -> Result<Vec<(String, f64)>, Box<dyn std::error::Error>> {
	let lines = read_file(path)?;
	match format {
		"list" => Ok(lines
			.into_iter()
			.filter(|line| !line.is_empty())
			.map(|line| (line, 1.0))
			.collect()),
		"tsv" => lines
			.into_iter()
			.filter(|line| !line.is_empty())
			.map(|line| {
				let (pwd, weight) = line
					.split_once('\t')
					.ok_or_else(|| format!("Malformed tsv line: {:?}", line))?;
				let weight: f64 = weight
					.parse()
					.map_err(|_| format!("Malformed weight in tsv line: {:?}", line))?;
				Ok((pwd.to_owned(), weight))
			})
			.collect::<Result<Vec<_>, String>>()
			.map_err(Into::into),
		other => Err(format!("Unknown train format: {} (expected list or tsv)", other).into()),
	}
}

/// Trains a model on a corpus using one partial model per chunk.
///
/// Lines are split into `cpu_count * 8` chunks; each thread folds its
/// chunk into a partial model, and partial tables are merged over an
/// mpsc channel before the final model is frozen. Count addition makes
/// the result identical to a sequential fold.
///
/// # Errors
/// Returns an error if the configuration is invalid or a merge fails.
pub fn train_parallel(
	config: MarkovConfig,
	pwds: Vec<(String, f64)>,
) -> Result<MarkovModel, Box<dyn std::error::Error>> {
	let mut model = MarkovModel::new(config.clone())?;
	if pwds.is_empty() {
		model.finish_training();
		return Ok(model);
	}

	let cpus = num_cpus::get();
	let factor = 8;
	let chunks = cpus * factor;
	let chunk_size = ((pwds.len() + chunks - 1) / chunks).max(1);

	let (tx, rx) = mpsc::channel();
	for chunk in pwds.chunks(chunk_size) {
		let tx = tx.clone();
		let chunk: Vec<(String, f64)> = chunk.to_vec();
		let config = config.clone();

		thread::spawn(move || {
			// Config was validated above, construction cannot fail
			let mut partial = MarkovModel::new(config).expect("validated config");
			for (pwd, weight) in &chunk {
				partial.train_on_pwd(pwd, *weight);
			}
			tx.send(partial).expect("Failed to send from thread");
		});
	}
	drop(tx);

	for partial in rx.iter() {
		model.merge(&partial)?;
	}
	model.finish_training();

	Ok(model)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pwd_markov_core::model::config::Smoothing;

	fn config() -> MarkovConfig {
		MarkovConfig {
			char_bag: "ab$".to_owned(),
			end_char: '$',
			order: 2,
			smoothing: Smoothing::None,
			..MarkovConfig::default()
		}
	}

	#[test]
	fn parallel_training_matches_sequential() {
		let corpus: Vec<(String, f64)> = (0..200)
			.map(|i| {
				if i % 2 == 0 {
					("ab".to_owned(), 1.0)
				} else {
					("aa".to_owned(), 2.0)
				}
			})
			.collect();

		let mut sequential = MarkovModel::new(config()).unwrap();
		sequential.train(corpus.clone());

		let parallel = train_parallel(config(), corpus).unwrap();

		let mut expected = vec![0.0; sequential.alphabet().len()];
		let mut actual = vec![0.0; parallel.alphabet().len()];
		for context in ["", "a", "b"] {
			sequential.predict(context, &mut expected).unwrap();
			parallel.predict(context, &mut actual).unwrap();
			assert_eq!(expected, actual, "context {:?}", context);
		}
	}

	#[test]
	fn empty_corpus_yields_a_frozen_model() {
		let model = train_parallel(config(), Vec::new()).unwrap();
		let mut probs = vec![0.0; model.alphabet().len()];
		// Nothing was trained, every context is undefined
		assert!(model.predict("a", &mut probs).is_err());
	}

	#[test]
	fn tsv_lines_parse_password_and_weight() {
		let dir = std::env::temp_dir().join("pwd-markov-corpus-tsv.txt");
		std::fs::write(&dir, "ab\t3\naa\t1.5\n").unwrap();
		let corpus = read_corpus(&dir, "tsv").unwrap();
		std::fs::remove_file(&dir).unwrap();

		assert_eq!(corpus, vec![("ab".to_owned(), 3.0), ("aa".to_owned(), 1.5)]);
	}

	#[test]
	fn list_lines_default_to_weight_one() {
		let dir = std::env::temp_dir().join("pwd-markov-corpus-list.txt");
		std::fs::write(&dir, "ab\n\naa\n").unwrap();
		let corpus = read_corpus(&dir, "list").unwrap();
		std::fs::remove_file(&dir).unwrap();

		assert_eq!(corpus, vec![("ab".to_owned(), 1.0), ("aa".to_owned(), 1.0)]);
	}

	#[test]
	fn unknown_format_is_rejected() {
		let dir = std::env::temp_dir().join("pwd-markov-corpus-bad.txt");
		std::fs::write(&dir, "ab\n").unwrap();
		let result = read_corpus(&dir, "csv");
		std::fs::remove_file(&dir).unwrap();
		assert!(result.is_err());
	}
}
