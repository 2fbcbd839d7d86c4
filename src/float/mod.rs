//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::Float as NumFloat;
use rustfft::FftNum;
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
pub trait Float: Display + Debug + NumFloat + FftNum + Sum {}

impl Float for f64 {}
impl Float for f32 {}

/// Convert an `f64` constant into `T`. Both `f32` and `f64` accept every
/// finite `f64`, so the fallback only triggers for exotic implementors.
pub fn cast<T: Float>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// `|value|` for any [Float].
pub fn abs<T: Float>(value: T) -> T {
    NumFloat::abs(value)
}
