//! The batch analysis pipeline.
//!
//! One pass over a [SampleBuffer] runs:
//!
//! 1. restrict the signal to the profile's analysis span,
//! 2. split it into frames,
//! 3. skip silent frames,
//! 4. optionally apply a Hann window,
//! 5. estimate a pitch per frame with the profile's detector,
//! 6. average the in-band estimates and name the note.
//!
//! The pass is synchronous and deterministic: the same buffer and profile
//! give the same [AggregateResult].

use crate::aggregate::{AggregateResult, Aggregator};
use crate::detector::PitchDetector;
use crate::profile::AnalysisProfile;
use crate::progress::{NoProgress, ProgressReporter, ProgressTracker};
use crate::sample::{DecodedAudio, SampleBuffer};
use crate::utils::buffer::is_silent;
use crate::utils::frames::frames;
use crate::utils::window::HannWindow;

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    profile: AnalysisProfile,
}

impl Analyzer {
    pub fn new(profile: AnalysisProfile) -> Self {
        Analyzer { profile }
    }

    pub fn profile(&self) -> &AnalysisProfile {
        &self.profile
    }

    pub fn analyze(&self, buffer: &SampleBuffer) -> AggregateResult {
        self.analyze_with_progress(buffer, &mut NoProgress)
    }

    /// Run the pipeline, reporting progress per frame. The last value
    /// reported is always 100.
    pub fn analyze_with_progress(
        &self,
        buffer: &SampleBuffer,
        reporter: &mut dyn ProgressReporter,
    ) -> AggregateResult {
        let frequency = self.estimate_frequency(buffer, reporter);
        let result = AggregateResult::from_frequency(frequency, self.profile.note_policy);
        log::info!(
            "Analysis result: {:.2} Hz ({})",
            result.frequency,
            result.note
        );
        result
    }

    /// Down-mix decoded audio and analyse it. Input that cannot be turned
    /// into a mono buffer yields [AggregateResult::error]; progress still
    /// completes.
    pub fn analyze_decoded(
        &self,
        audio: &DecodedAudio<'_>,
        reporter: &mut dyn ProgressReporter,
    ) -> AggregateResult {
        match audio.to_mono() {
            Ok(buffer) => self.analyze_with_progress(&buffer, reporter),
            Err(e) => {
                log::warn!("Cannot analyse decoded audio: {}", e);
                ProgressTracker::start(reporter).finish();
                AggregateResult::error()
            }
        }
    }

    /// Mean of the in-band per-frame estimates, or `0.0` when no frame
    /// produced one.
    pub fn estimate_frequency(
        &self,
        buffer: &SampleBuffer,
        reporter: &mut dyn ProgressReporter,
    ) -> f32 {
        let profile = &self.profile;
        let mut progress = ProgressTracker::start(reporter);

        let span = profile.analysis_span(buffer.len(), buffer.sample_rate());
        let signal = &buffer.samples()[span.clone()];
        let frames = frames(signal, profile.frame_size, profile.hop_size, profile.max_frames);
        let total = frames.len();
        log::debug!(
            "Analysing samples {}..{} at {} Hz in {} frame(s) with {}",
            span.start,
            span.end,
            buffer.sample_rate(),
            total,
            profile.algorithm
        );

        let mut detector: Box<dyn PitchDetector<f32> + Send> = profile
            .algorithm
            .detector(profile.frame_size, profile.yin_threshold);
        let window = if profile.apply_window {
            Some(HannWindow::<f32>::new(profile.frame_size))
        } else {
            None
        };
        let mut windowed = Vec::with_capacity(profile.frame_size);
        let mut aggregator = Aggregator::new(
            profile.min_frequency,
            profile.max_frequency,
            profile.max_estimates,
        );
        let mut silent = 0;
        let mut rejected = 0;

        for (index, frame) in frames.enumerate() {
            progress.advance(index, total);
            if is_silent(frame.samples, profile.silence_threshold) {
                silent += 1;
                continue;
            }
            let samples = match &window {
                Some(window) => {
                    window.apply(frame.samples, &mut windowed);
                    &windowed[..]
                }
                None => frame.samples,
            };
            match detector.get_pitch(samples, buffer.sample_rate() as usize) {
                Some(pitch) if aggregator.offer(pitch.frequency) => {
                    log::trace!(
                        "Frame at {}: {:.2} Hz (clarity {:.3})",
                        frame.offset,
                        pitch.frequency,
                        pitch.clarity
                    );
                }
                _ => {
                    log::debug!("Frame at {} gave no in-band pitch", frame.offset);
                    rejected += 1;
                }
            }
            if aggregator.is_full() {
                break;
            }
        }
        progress.finish();

        log::debug!(
            "{} estimate(s) kept, {} silent frame(s), {} rejected",
            aggregator.count(),
            silent,
            rejected
        );
        aggregator.mean()
    }
}
