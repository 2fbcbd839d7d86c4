//! Splitting a signal into fixed-size analysis frames.
//!
//! Frame *i* starts at `i * hop_size`. Frames are borrowed views into the
//! signal, so they never outlive the analysis pass that created them.

/// A contiguous, fixed-length view into a signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisFrame<'a, T> {
    /// Index of the first sample of the frame within the signal.
    pub offset: usize,
    pub samples: &'a [T],
}

/// Lazy iterator over the frames of a signal. See [frames].
#[derive(Debug, Clone)]
pub struct Frames<'a, T> {
    signal: &'a [T],
    frame_size: usize,
    hop_size: usize,
    next_index: usize,
    remaining: usize,
}

/// Number of frames [frames] produces for a signal of `len` samples:
/// `floor((len - frame_size) / hop_size) + 1`, or zero when the signal is
/// shorter than one frame, capped by `max_frames`.
///
/// A zero `frame_size` or `hop_size` is degenerate and produces no frames.
pub fn frame_count(
    len: usize,
    frame_size: usize,
    hop_size: usize,
    max_frames: Option<usize>,
) -> usize {
    if frame_size == 0 || hop_size == 0 || len < frame_size {
        return 0;
    }
    let count = (len - frame_size) / hop_size + 1;
    max_frames.map_or(count, |max| count.min(max))
}

/// Iterate over the frames of `signal`. Iteration stops before a frame would
/// run past the end of the signal, or once `max_frames` frames were produced.
pub fn frames<T>(
    signal: &[T],
    frame_size: usize,
    hop_size: usize,
    max_frames: Option<usize>,
) -> Frames<'_, T> {
    if frame_size == 0 || hop_size == 0 {
        log::debug!(
            "Degenerate framing (frame_size={}, hop_size={}), no frames produced",
            frame_size,
            hop_size
        );
    }
    Frames {
        signal,
        frame_size,
        hop_size,
        next_index: 0,
        remaining: frame_count(signal.len(), frame_size, hop_size, max_frames),
    }
}

impl<'a, T> Iterator for Frames<'a, T> {
    type Item = AnalysisFrame<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let offset = self.next_index * self.hop_size;
        let samples = self.signal.get(offset..offset + self.frame_size)?;
        self.next_index += 1;
        self.remaining -= 1;
        Some(AnalysisFrame { offset, samples })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Frames<'_, T> {}
