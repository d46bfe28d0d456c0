//! Top-level module for the password Markov model.
//!
//! This module provides an order-k character n-gram model, including:
//! - Statically-typed configuration (`MarkovConfig`)
//! - The sorted alphabet with sentinel handling (`Alphabet`)
//! - Internal frequency accumulation (`FreqTable`)
//! - Two n-gram extraction algorithms (standard and backoff-oriented)
//! - Smoothing strategies (none, additive, backoff)
//! - The public model façade (`MarkovModel`)

/// Model configuration: character bag, sentinels, order, smoothing
/// parameters. Validated before any training happens.
pub mod config;

/// Sorted alphabet over the configured character bag.
///
/// Defines the index layout of every probability vector.
pub mod alphabet;

/// Public model façade composing alphabet, frequency table and
/// smoothing strategy.
///
/// Exposes training, context truncation, prediction and persistence.
pub mod markov_model;

/// Internal frequency table mapping n-grams to accumulated weights.
///
/// This module is not exposed publicly; external callers interact with
/// counts only through the prediction interface.
mod freq_table;

/// Internal n-gram extraction algorithms.
///
/// Selected at model construction, sharing only the increment primitive.
mod trainer;

/// Internal smoothing strategies turning raw counts into distributions.
mod smoothing;
