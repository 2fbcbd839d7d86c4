use crate::float::{cast, Float};

/// Hann coefficient `i` of a window of length `size`:
/// `0.5 * (1 - cos(2πi / (size - 1)))`.
pub fn hann_coefficient(i: usize, size: usize) -> f64 {
    if size <= 1 {
        return 1.0;
    }
    0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (size - 1) as f64).cos())
}

/// Precomputed Hann window, reused for every frame of an analysis pass.
/// Windows of length 0 or 1 are the identity.
#[derive(Debug, Clone)]
pub struct HannWindow<T> {
    coefficients: Vec<T>,
}

impl<T: Float> HannWindow<T> {
    pub fn new(size: usize) -> Self {
        let coefficients = (0..size)
            .map(|i| cast(hann_coefficient(i, size)))
            .collect();
        HannWindow { coefficients }
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Write `frame * window` into `output`, resizing it to the frame length.
    /// A frame whose length differs from the window is copied unchanged.
    pub fn apply(&self, frame: &[T], output: &mut Vec<T>) {
        output.clear();
        if frame.len() != self.coefficients.len() || frame.len() <= 1 {
            output.extend_from_slice(frame);
            return;
        }
        output.extend(
            frame
                .iter()
                .zip(self.coefficients.iter())
                .map(|(&s, &w)| s * w),
        );
    }
}

/// Apply a Hann window to `frame`, returning a new buffer.
pub fn hann<T: Float>(frame: &[T]) -> Vec<T> {
    let mut output = Vec::with_capacity(frame.len());
    HannWindow::new(frame.len()).apply(frame, &mut output);
    output
}
