//! The YIN pitch detection algorithm is based on the algorithm from the paper
//! *[YIN, a fundamental frequency estimator for speech and music](http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf)*.
//! It is efficient and offers an improvement over basic autocorrelation.
//!
//! Let $S=(s_0,s_1,\ldots,s_{N-1})$ be a discrete signal. The *square difference function* at lag $t$
//! is defined by
//! $$ d(t) = \sum_{i=0}^{N-1-t} (s_i-s_{i+t})^2. $$
//! This function is close to zero when the signal "lines up" with itself. However, *close* is a relative term,
//! and the value of $d(t)$ depends on volume, which should not affect the pitch of the signal. For this
//! reason, the signal is normalized. The YIN algorithm computes the *cumulative mean normalized difference function*,
//! $$ d\'(t) = \begin{cases}1&\text{if }t=0\\\\ d(t) / \left[ \tfrac{1}{t}\sum_{i=1}^t d(i) + \epsilon \right] & \text{otherwise}\end{cases}. $$
//! Then, it searches for the first lag where $d\'(t)$ drops below a given threshold.
//!
//! ## Implementation
//! Lags are searched over `1..N/2`. $d(t)$ is derived from the autocorrelation, which is computed with an
//! [FFT](https://en.wikipedia.org/wiki/Fast_Fourier_transform).
//!
//! Once a lag crosses the threshold, the search follows $d\'(t)$ down to the bottom of that dip, and parabolic
//! interpolation over the three surrounding values gives a sub-sample period.
//!
//! The current implementation does not perform *Step 6* of the algorithm specified in the YIN paper.

use crate::detector::internals::{
    cumulative_mean_normalized_difference, square_difference, DetectorInternals, Pitch,
};
use crate::detector::PitchDetector;
use crate::float::{cast, Float};
use crate::utils::buffer::new_real_buffer;
use crate::utils::peak::{descend_to_minimum, first_below, parabolic_vertex};

/// Default absolute threshold on the normalized difference.
pub const DEFAULT_THRESHOLD: f64 = 0.15;

pub struct YINDetector<T>
where
    T: Float,
{
    internals: DetectorInternals<T>,
    difference: Vec<T>,
    threshold: T,
}

impl<T> YINDetector<T>
where
    T: Float,
{
    pub fn new(size: usize) -> Self {
        Self::with_threshold(size, cast(DEFAULT_THRESHOLD))
    }

    pub fn with_threshold(size: usize, threshold: T) -> Self {
        let internals = DetectorInternals::<T>::new(size, size);
        YINDetector {
            internals,
            difference: new_real_buffer(size / 2),
            threshold,
        }
    }
}

/// Pitch detection based on the YIN algorithm. See <http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf>
impl<T> PitchDetector<T> for YINDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, signal: &[T], sample_rate: usize) -> Option<Pitch<T>> {
        let window_size = signal.len() / 2;

        if signal.len() != self.internals.size || window_size < 3 {
            log::debug!(
                "YIN: rejecting frame of {} samples (expected {})",
                signal.len(),
                self.internals.size
            );
            return None;
        }

        // STEP 2: Calculate the difference function, d_t.
        let autocorr = self.internals.autocorrelation(signal);
        if autocorr[0] <= T::zero() {
            return None;
        }
        let result = &mut self.difference[..window_size];
        square_difference(signal, autocorr, result);

        // STEP 3: Calculate the cumulative mean normalized difference function, d_t'.
        cumulative_mean_normalized_difference(result);

        // STEP 4: The absolute threshold. We want the first dip below `threshold`,
        // followed down to its minimum.
        let crossing = first_below(result, 1, self.threshold)?;
        let tau = descend_to_minimum(result, crossing);

        // STEP 5: Use parabolic interpolation to fine-tune the period.
        let period = parabolic_vertex(result, tau);
        let frequency = cast::<T>(sample_rate as f64) / period;
        if !frequency.is_finite() || frequency <= T::zero() {
            return None;
        }

        // YIN has no clarity of its own; a dip closer to zero is a cleaner period.
        let clarity = T::one() - result[tau];

        Some(Pitch { frequency, clarity })
    }
}
