use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::float::{cast, Float};
use crate::utils::buffer::{
    copy_complex_to_real, copy_real_to_complex, modulus_squared, new_complex_buffer,
    new_real_buffer,
};

/// Guards the YIN normalization against a zero running mean.
pub const CMNDF_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch<T>
where
    T: Float,
{
    pub frequency: T,
    pub clarity: T,
}

/// Data structure to hold the FFT plans and buffers needed for pitch
/// computation. Everything is allocated once per detector rather than once
/// per frame.
pub struct DetectorInternals<T>
where
    T: Float,
{
    pub size: usize,
    pub padding: usize,
    fft: Arc<dyn Fft<T>>,
    inv_fft: Arc<dyn Fft<T>>,
    spectrum: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
    correlation: Vec<T>,
}

impl<T> DetectorInternals<T>
where
    T: Float,
{
    /// `padding` must be at least `size - 1` for the correlation to be linear
    /// rather than circular; detectors pass `padding = size`.
    pub fn new(size: usize, padding: usize) -> Self {
        let fft_len = (size + padding).max(1);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_len);
        let inv_fft = planner.plan_fft_inverse(fft_len);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(inv_fft.get_inplace_scratch_len());

        DetectorInternals {
            size,
            padding,
            fft,
            inv_fft,
            spectrum: new_complex_buffer(fft_len),
            scratch: new_complex_buffer(scratch_len),
            correlation: new_real_buffer(size),
        }
    }

    /// Compute the autocorrelation of `signal`,
    ///
    /// > r(t) = sum_{i=0}^{N-1-t} x_i*x_{i+t},  t in 0..N
    ///
    /// via the power spectrum of the zero padded signal. The returned slice
    /// has one value per lag and stays valid until the next call.
    pub fn autocorrelation(&mut self, signal: &[T]) -> &[T] {
        assert!(
            signal.len() <= self.size,
            "Signal is longer than the detector's frame size"
        );

        copy_real_to_complex(signal, &mut self.spectrum);
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);
        modulus_squared(&mut self.spectrum);
        self.inv_fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        // rustfft doesn't normalize, so a forward/inverse pair scales by the FFT length.
        let normalization = T::one() / cast::<T>(self.spectrum.len() as f64);
        let result = &mut self.correlation[..signal.len()];
        copy_complex_to_real(&self.spectrum, result, normalization);
        result
    }
}

/// Compute the square difference function of `signal` from its
/// autocorrelation,
///
///  > d(t) = sum_{i=0}^{N-1-t} (x_i - x_{i+t})^2
///
/// for `t` in `0..result.len()`. Expanding the square gives
/// `d(t) = head(t) + tail(t) - 2*r(t)`, where `head(t)` is the power of
/// `x_0..x_{N-t}` and `tail(t)` the power of `x_t..x_N`. Rounding in the FFT
/// can push tiny values below zero, so the result is clamped.
pub fn square_difference<T: Float>(signal: &[T], autocorr: &[T], result: &mut [T]) {
    let n = signal.len();
    assert!(result.len() <= n && autocorr.len() >= result.len());

    let two = cast::<T>(2.0);
    let power = signal.iter().map(|&s| s * s).sum::<T>();
    let mut head = power;
    let mut tail = power;

    for (tau, d) in result.iter_mut().enumerate() {
        if tau > 0 {
            head = head - signal[n - tau] * signal[n - tau];
            tail = tail - signal[tau - 1] * signal[tau - 1];
        }
        let value = head + tail - two * autocorr[tau];
        *d = if value > T::zero() { value } else { T::zero() };
    }
    if let Some(first) = result.first_mut() {
        *first = T::zero();
    }
}

/// Calculate the "cumulative mean normalized difference function" as
/// specified in the YIN paper, in place. If _d(t)_ is the square difference
/// function, compute _d'(0) = 1_ and for _t > 0_
///
///  > d'(t) = d(t) / [ (1/t) * sum_{i=1}^t d(i) + eps ]
pub fn cumulative_mean_normalized_difference<T: Float>(difference: &mut [T]) {
    if difference.is_empty() {
        return;
    }
    let epsilon = cast::<T>(CMNDF_EPSILON);
    let mut sum = T::zero();
    difference[0] = T::one();
    difference
        .iter_mut()
        .enumerate()
        .skip(1)
        .for_each(|(tau, d)| {
            sum = sum + *d;
            *d = *d / (sum / cast::<T>(tau as f64) + epsilon);
        });
}
