use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use pwd_markov_core::model::config::{MarkovConfig, Smoothing};
use pwd_markov_core::model::markov_model::MarkovModel;

mod corpus;

/// Train and query a character-level Markov password model.
#[derive(Parser, Debug)]
#[command(name = "pwd-markov", about = "Train and query a character-level Markov password model")]
struct Args {
	/// Training file; will train a model
	#[arg(short = 't', long)]
	train_file: Option<PathBuf>,

	/// Output file for the trained model
	#[arg(short = 'o', long)]
	ofile: Option<PathBuf>,

	/// Model file; will answer context queries
	#[arg(short = 'm', long)]
	model_file: Option<PathBuf>,

	/// Context to query against a loaded model
	#[arg(long)]
	context: Option<String>,

	/// Order k: 2 means one character of context predicts the next
	#[arg(short = 'k', long, default_value_t = 2)]
	k_order: usize,

	/// JSON configuration file (char bag, sentinel, smoothing parameters)
	#[arg(short = 'c', long)]
	config: Option<PathBuf>,

	/// Smoothing strategy: none, additive or backoff
	#[arg(short = 's', long, default_value = "none")]
	smoothing: Smoothing,

	/// Training corpus format: list or tsv
	#[arg(short = 'f', long, default_value = "tsv")]
	train_format: String,
}

/// Builds the model configuration from the optional JSON file, then
/// applies the command-line order and smoothing overrides.
///
/// Configuration files are plain typed JSON; no value is ever evaluated
/// as code.
fn read_config(args: &Args) -> Result<MarkovConfig, Box<dyn std::error::Error>> {
	let mut config = match &args.config {
		Some(path) => {
			info!("Reading config from {}", path.display());
			serde_json::from_str(&fs::read_to_string(path)?)?
		}
		None => {
			info!("Using default config");
			MarkovConfig::default()
		}
	};

	config.order = args.k_order;
	config.smoothing = args.smoothing;
	config.validate()?;
	Ok(config)
}

/// Trains a model on the corpus file and saves it to `--ofile`.
fn train(args: &Args, config: MarkovConfig) -> Result<(), Box<dyn std::error::Error>> {
	let train_file = args.train_file.as_ref().expect("checked by caller");
	let ofile = args
		.ofile
		.as_ref()
		.ok_or("Must provide --ofile when training")?;

	info!("Beginning training of {}-gram model", config.order);
	let pwds = corpus::read_corpus(train_file, &args.train_format)?;
	let model = corpus::train_parallel(config, pwds)?;
	model.save_model(ofile)?;
	Ok(())
}

/// Loads a model and prints the next-character distribution for the
/// queried context, most likely first.
fn query(args: &Args, config: MarkovConfig) -> Result<(), Box<dyn std::error::Error>> {
	let model_file = args.model_file.as_ref().expect("checked by caller");
	let context = args
		.context
		.as_ref()
		.ok_or("Must provide --context when querying a model")?;

	let model = MarkovModel::from_model_file(model_file, config)?;

	let mut probs = vec![0.0; model.alphabet().len()];
	model.predict(context, &mut probs)?;

	let mut ranked: Vec<(char, f64)> = model
		.alphabet()
		.chars()
		.iter()
		.copied()
		.zip(probs)
		.collect();
	ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

	for (next_char, probability) in ranked {
		if probability > 0.0 {
			println!("{:?}\t{}", next_char, probability);
		}
	}
	Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let args = Args::parse();
	let config = read_config(&args)?;

	if args.train_file.is_some() {
		train(&args, config)
	} else if args.model_file.is_some() {
		query(&args, config)
	} else {
		Err("Must provide --train-file or --model-file".into())
	}
}
