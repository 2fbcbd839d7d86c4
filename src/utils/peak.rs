use std::ops::Range;

use crate::float::{abs, cast, Float};

/// Denominators smaller than this make the parabolic fit meaningless.
const MIN_CURVATURE: f64 = 1e-6;

/// Find the first strictly positive maximum of `arr` within `range`, scanning
/// in increasing index order. Later values only win with a strictly greater
/// value, so the first of several equal maxima is kept.
pub fn first_maximum<T: Float>(arr: &[T], range: Range<usize>) -> Option<(usize, T)> {
    let end = range.end.min(arr.len());
    let start = range.start.min(end);
    let mut best: Option<(usize, T)> = None;
    let mut best_value = T::zero();
    for (idx, &value) in arr[start..end].iter().enumerate() {
        if value > best_value {
            best_value = value;
            best = Some((start + idx, value));
        }
    }
    best
}

/// Index of the first value of `arr` strictly below `threshold`, starting
/// the scan at `start`.
pub fn first_below<T: Float>(arr: &[T], start: usize, threshold: T) -> Option<usize> {
    arr.iter()
        .enumerate()
        .skip(start)
        .find(|&(_, &v)| v < threshold)
        .map(|(idx, _)| idx)
}

/// Follow `arr` from `idx` while the next value keeps decreasing and return
/// the index of the bottom of that dip.
pub fn descend_to_minimum<T: Float>(arr: &[T], mut idx: usize) -> usize {
    while idx + 1 < arr.len() && arr[idx + 1] < arr[idx] {
        idx += 1;
    }
    idx
}

/// Refine the extremum at `idx` by fitting a parabola through
/// `arr[idx - 1]`, `arr[idx]` and `arr[idx + 1]`, returning the fractional
/// index of its vertex.
///
/// Indices on the boundary of `arr`, or a (nearly) flat neighbourhood, return
/// `idx` unchanged.
pub fn parabolic_vertex<T: Float>(arr: &[T], idx: usize) -> T {
    let unrefined = cast::<T>(idx as f64);
    if idx == 0 || idx + 1 >= arr.len() {
        return unrefined;
    }
    let (x0, x1, x2) = (arr[idx - 1], arr[idx], arr[idx + 1]);
    let two = cast::<T>(2.0);
    let denominator = two * (two * x1 - x2 - x0);
    if abs(denominator) < cast(MIN_CURVATURE) {
        return unrefined;
    }
    unrefined + (x2 - x0) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parabolic_vertex_of_exact_parabola() {
        let arr: Vec<f64> = (0..10)
            .map(|i| {
                let x = i as f64 - 5.3;
                x * x
            })
            .collect();
        let vertex = parabolic_vertex(&arr, 5);
        assert!((vertex - 5.3).abs() < 1e-9);
    }

    #[test]
    fn parabolic_vertex_boundaries_are_unrefined() {
        let arr = [3.0_f64, 1.0, 2.0];
        assert_eq!(parabolic_vertex(&arr, 0), 0.0);
        assert_eq!(parabolic_vertex(&arr, 2), 2.0);
        assert_eq!(parabolic_vertex(&[1.0_f64, 1.0, 1.0], 1), 1.0);
    }

    #[test]
    fn first_maximum_keeps_earliest_tie() {
        let arr = [0.0_f32, 2.0, 5.0, 1.0, 5.0, 4.0];
        assert_eq!(first_maximum(&arr, 0..6), Some((2, 5.0)));
        assert_eq!(first_maximum(&arr, 3..6), Some((4, 5.0)));
        assert_eq!(first_maximum(&arr, 3..100), Some((4, 5.0)));
    }

    #[test]
    fn first_maximum_requires_positive_peak() {
        let arr = [-1.0_f32, -0.5, 0.0, -2.0];
        assert_eq!(first_maximum(&arr, 0..4), None);
        assert_eq!(first_maximum(&arr, 4..2), None);
    }

    #[test]
    fn threshold_crossing_then_descend() {
        let arr = [1.0_f64, 0.8, 0.14, 0.09, 0.05, 0.07, 0.3];
        let crossing = first_below(&arr, 1, 0.15).unwrap();
        assert_eq!(crossing, 2);
        assert_eq!(descend_to_minimum(&arr, crossing), 4);
        assert_eq!(first_below(&arr, 1, 0.01), None);
    }
}
