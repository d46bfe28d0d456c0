//! Character-level Markov model library for password probability estimation.
//!
//! This crate provides the probability core of a password-guessing and
//! strength-estimation pipeline:
//! - An order-k character n-gram (Markov) model over passwords
//! - Selectable smoothing (none, additive, backoff)
//! - Two training algorithms (standard and backoff-oriented)
//! - Persistence of the trained frequency table
//!
//! Search and sampling strategies are deliberately not part of this crate.
//! They consume the model solely through its prediction interface
//! (`predict` / `probability_next_char`), which is pure and safe to call
//! from multiple readers once training has completed.

/// Core model: alphabet, frequency table, trainers, smoothing, façade.
///
/// This module exposes the high-level model interface while keeping
/// internal representations (frequency table, trainers, smoothers)
/// private.
pub mod model;
