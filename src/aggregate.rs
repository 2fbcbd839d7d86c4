//! Reducing per-frame estimates to a single frequency.

use serde::Serialize;

use crate::note::NotePolicy;

/// Note reported when a capture stopped without any audio.
pub const NO_AUDIO: &str = "No audio";
/// Note reported when the input could not be read.
pub const ERROR: &str = "Error";

/// Terminal output of one analysis pass. A frequency of `0.0` means no
/// pitch was found; `note` then carries a sentinel instead of a note name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub frequency: f32,
    pub note: String,
}

impl AggregateResult {
    pub fn from_frequency(frequency: f32, policy: NotePolicy) -> Self {
        AggregateResult {
            frequency,
            note: policy.note_name(frequency).to_string(),
        }
    }

    pub fn no_audio() -> Self {
        AggregateResult {
            frequency: 0.0,
            note: NO_AUDIO.to_string(),
        }
    }

    pub fn error() -> Self {
        AggregateResult {
            frequency: 0.0,
            note: ERROR.to_string(),
        }
    }

    pub fn is_pitched(&self) -> bool {
        self.frequency > 0.0
    }
}

/// Collects in-band estimates and averages them.
#[derive(Debug, Clone)]
pub struct Aggregator {
    min_frequency: f32,
    max_frequency: f32,
    max_estimates: Option<usize>,
    sum: f64,
    count: usize,
}

impl Aggregator {
    pub fn new(min_frequency: f32, max_frequency: f32, max_estimates: Option<usize>) -> Self {
        Aggregator {
            min_frequency,
            max_frequency,
            max_estimates,
            sum: 0.0,
            count: 0,
        }
    }

    /// Offer an estimate. Returns whether it was retained: it has to lie
    /// within `[min_frequency, max_frequency]` and the cap must not be reached.
    pub fn offer(&mut self, frequency: f32) -> bool {
        if self.is_full()
            || !(frequency >= self.min_frequency && frequency <= self.max_frequency)
        {
            return false;
        }
        self.sum += frequency as f64;
        self.count += 1;
        true
    }

    /// True once the estimate cap is reached; the caller stops scanning frames.
    pub fn is_full(&self) -> bool {
        self.max_estimates.map_or(false, |max| self.count >= max)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean of the retained estimates, or `0.0` without any.
    pub fn mean(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum / self.count as f64) as f32
    }
}
