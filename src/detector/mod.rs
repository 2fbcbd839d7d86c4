use serde::{Deserialize, Serialize};

use crate::detector::autocorrelation::AutocorrelationDetector;
use crate::detector::internals::Pitch;
use crate::detector::yin::YINDetector;
use crate::float::Float;

pub mod autocorrelation;
pub mod internals;
pub mod yin;

/// A pitch estimator for single frames of a fixed size.
///
/// Frames that are silent, too short, of the wrong size or without a
/// reliable period yield `None`; detectors never panic on their input.
pub trait PitchDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, signal: &[T], sample_rate: usize) -> Option<Pitch<T>>;
}

/// Which [PitchDetector] an analysis uses. The choice is made once per
/// analysis profile; the detectors never fall back to one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Autocorrelation,
    Yin,
}

impl Algorithm {
    /// Build a detector for frames of `size` samples. `yin_threshold` is
    /// only used by [Algorithm::Yin].
    pub fn detector<T>(self, size: usize, yin_threshold: T) -> Box<dyn PitchDetector<T> + Send>
    where
        T: Float,
    {
        match self {
            Algorithm::Autocorrelation => Box::new(AutocorrelationDetector::<T>::new(size)),
            Algorithm::Yin => Box::new(YINDetector::<T>::with_threshold(size, yin_threshold)),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Autocorrelation => write!(f, "autocorrelation"),
            Algorithm::Yin => write!(f, "YIN"),
        }
    }
}
