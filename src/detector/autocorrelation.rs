//! Pitch detection by picking the strongest autocorrelation peak.
//!
//! The search only considers lags corresponding to periods between
//! [MIN_FREQUENCY] and [MAX_FREQUENCY], which keeps the detector away from
//! the trivial peak at lag zero and from sub-harmonics below the range.

use crate::detector::internals::DetectorInternals;
use crate::detector::internals::Pitch;
use crate::detector::PitchDetector;
use crate::float::{cast, Float};
use crate::utils::peak::first_maximum;

/// Lowest frequency the lag search covers, in Hz.
pub const MIN_FREQUENCY: f64 = 50.0;
/// Highest frequency the lag search covers, in Hz.
pub const MAX_FREQUENCY: f64 = 500.0;

pub struct AutocorrelationDetector<T>
where
    T: Float,
{
    internals: DetectorInternals<T>,
}

impl<T> AutocorrelationDetector<T>
where
    T: Float,
{
    pub fn new(size: usize) -> Self {
        let internals = DetectorInternals::new(size, size);
        AutocorrelationDetector { internals }
    }
}

/// Lag search range `[round(sr / 500), round(sr / 50))`. The lower bound is
/// kept at one or more so a pitch never divides by zero.
pub fn lag_range(sample_rate: usize) -> std::ops::Range<usize> {
    let sample_rate = sample_rate as f64;
    let min_lag = ((sample_rate / MAX_FREQUENCY).round() as usize).max(1);
    let max_lag = (sample_rate / MIN_FREQUENCY).round() as usize;
    min_lag..max_lag
}

impl<T> PitchDetector<T> for AutocorrelationDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, signal: &[T], sample_rate: usize) -> Option<Pitch<T>> {
        if signal.len() != self.internals.size || signal.len() < 2 {
            log::debug!(
                "Autocorrelation: rejecting frame of {} samples (expected {})",
                signal.len(),
                self.internals.size
            );
            return None;
        }

        let lags = lag_range(sample_rate);
        let autocorr = self.internals.autocorrelation(signal);
        if lags.end >= autocorr.len() {
            log::debug!(
                "Autocorrelation: frame of {} samples too short for lag {} at {} Hz",
                autocorr.len(),
                lags.end,
                sample_rate
            );
            return None;
        }

        let energy = autocorr[0];
        let (lag, peak) = first_maximum(autocorr, lags)?;
        let frequency = cast::<T>(sample_rate as f64) / cast::<T>(lag as f64);
        let clarity = if energy > T::zero() {
            peak / energy
        } else {
            T::zero()
        };

        Some(Pitch { frequency, clarity })
    }
}
