use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copy `input` into the real part of `output`, zeroing the imaginary parts
/// and any trailing elements of `output` (the zero padding).
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
        o.re = *i;
        o.im = T::zero();
    });
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

/// Copy the real parts of `input` into `output`, multiplied by `scale`.
/// Only `min(input.len(), output.len())` elements are written.
pub fn copy_complex_to_real<T: Float>(input: &[Complex<T>], output: &mut [T], scale: T) {
    input
        .iter()
        .zip(output.iter_mut())
        .for_each(|(i, o)| *o = i.re * scale);
}

/// Computes |x|^2 for each complex value x in `arr`. This function
/// modifies `arr` in place and leaves the complex component zero.
pub fn modulus_squared<T: Float>(arr: &mut [Complex<T>]) {
    for s in arr {
        s.re = s.re * s.re + s.im * s.im;
        s.im = T::zero();
    }
}

/// Compute the sum of the square of each element of `arr`.
pub fn square_sum<T: Float>(arr: &[T]) -> T {
    arr.iter().map(|&s| s * s).sum::<T>()
}

/// Root-mean-square amplitude of `arr`. An empty slice has no energy.
pub fn rms<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    let len = T::from_usize(arr.len()).unwrap_or_else(T::one);
    (square_sum(arr) / len).sqrt()
}

/// A frame is silent when its RMS falls strictly below `threshold`.
pub fn is_silent<T: Float>(frame: &[T], threshold: T) -> bool {
    rms(frame) < threshold
}
