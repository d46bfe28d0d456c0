use pwd_markov_core::model::alphabet::PASSWORD_START;
use pwd_markov_core::model::config::{MarkovConfig, Smoothing};
use pwd_markov_core::model::markov_model::MarkovModel;

use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A small weighted corpus, as an external corpus loader would supply it.
    // Weights typically come from leak frequencies.
    let corpus = [
        ("password", 5.0),
        ("passw0rd", 2.0),
        ("pass123", 2.0),
        ("letmein", 3.0),
        ("dragon", 2.0),
        ("monkey", 1.0),
        ("abc123", 2.0),
    ];

    // Configure an order-3 model with backoff smoothing.
    // Backoff also selects the dense training variant, so every
    // shorter context has mass and the fallback always terminates.
    let config = MarkovConfig {
        order: 3,
        smoothing: Smoothing::Backoff,
        backoff_smoothing_threshold: 1.0,
        ..MarkovConfig::default()
    };

    let mut model = MarkovModel::new(config)?;
    model.train(corpus.iter().map(|(pwd, weight)| (pwd.to_string(), *weight)));

    // Inspect the next-character distribution after the context "pa"
    let mut probs = vec![0.0; model.alphabet().len()];
    model.predict("pa", &mut probs)?;

    println!("Most likely characters after \"pa\":");
    let mut ranked: Vec<(char, f64)> = model.alphabet().chars().iter().copied().zip(probs).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (next_char, probability) in ranked.iter().take(5) {
        println!("  {:?} -> {:.4}", next_char, probability);
    }

    // Single next-character probability
    println!("P('s' | \"pa\") = {:.4}", model.probability_next_char("pa", 's')?);

    // A minimal random-walk sampling strategy. The model is injected as
    // a plain dependency; the strategy only uses the prediction API.
    for i in 0..10 {
        println!("Sampled password {}: {:?}", i + 1, sample_password(&model)?);
    }

    Ok(())
}

/// Samples one password by walking the model from the start sentinel,
/// drawing each next character from the predicted distribution until
/// the end sentinel is drawn.
fn sample_password(model: &MarkovModel) -> Result<String, Box<dyn std::error::Error>> {
    let end_char = model.config().end_char;
    let mut rng = rand::rng();

    let mut prefix = String::from(PASSWORD_START);
    let mut pwd = String::new();
    let mut probs = vec![0.0; model.alphabet().len()];

    // Length guard in case the model never terminates a walk
    while pwd.chars().count() < 30 {
        model.predict(&prefix, &mut probs)?;

        let mut draw: f64 = rng.random();
        let mut next_char = end_char;
        for (i, c) in model.alphabet().chars().iter().enumerate() {
            if draw < probs[i] {
                next_char = *c;
                break;
            }
            draw -= probs[i];
        }

        if next_char == end_char {
            break;
        }
        pwd.push(next_char);
        prefix.push(next_char);
    }

    Ok(pwd)
}
