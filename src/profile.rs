//! Analysis profiles: every constant one analysis pass depends on.
//!
//! Profiles can be built in code ([AnalysisProfile::file],
//! [AnalysisProfile::live], [AnalysisProfile::quick]) or loaded from TOML,
//! where missing keys fall back to the file profile:
//!
//! ```toml
//! algorithm = "autocorrelation"
//! hop_size = 1024
//! max_frames = 10
//! apply_window = true
//! note_policy = "nearest_table"
//! ```

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detector::Algorithm;
use crate::error::PitchError;
use crate::note::NotePolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisProfile {
    pub algorithm: Algorithm,
    /// Samples per analysis frame.
    pub frame_size: usize,
    /// Samples between the starts of consecutive frames.
    pub hop_size: usize,
    /// Frames with an RMS below this are skipped.
    pub silence_threshold: f32,
    /// Stop after this many frames were scanned, silent ones included.
    pub max_frames: Option<usize>,
    /// Stop after this many in-band estimates were collected.
    pub max_estimates: Option<usize>,
    /// Only the first seconds of audio (after `skip_secs`) are analysed.
    pub max_duration_secs: Option<f32>,
    /// Leading audio ignored by the analysis, in seconds.
    pub skip_secs: f32,
    pub min_frequency: f32,
    pub max_frequency: f32,
    /// Apply a Hann window to each frame before estimation.
    pub apply_window: bool,
    pub yin_threshold: f32,
    pub note_policy: NotePolicy,
}

impl AnalysisProfile {
    /// One-shot analysis of a recorded file: sparse YIN frames over at most
    /// 15 seconds, averaging the first 30 estimates between 80 and 1500 Hz.
    pub fn file() -> Self {
        AnalysisProfile {
            algorithm: Algorithm::Yin,
            frame_size: 2048,
            hop_size: 4096,
            silence_threshold: 0.01,
            max_frames: None,
            max_estimates: Some(30),
            max_duration_secs: Some(15.0),
            skip_secs: 0.0,
            min_frequency: 80.0,
            max_frequency: 1500.0,
            apply_window: false,
            yin_threshold: 0.15,
            note_policy: NotePolicy::LogDistance,
        }
    }

    /// Analysis of a stopped live capture: the first ten half-overlapping
    /// frames, Hann windowed, by autocorrelation between 50 and 1000 Hz.
    pub fn live() -> Self {
        AnalysisProfile {
            algorithm: Algorithm::Autocorrelation,
            frame_size: 2048,
            hop_size: 1024,
            silence_threshold: 0.005,
            max_frames: Some(10),
            max_estimates: None,
            max_duration_secs: None,
            skip_secs: 0.0,
            min_frequency: 50.0,
            max_frequency: 1000.0,
            apply_window: true,
            yin_threshold: 0.15,
            note_policy: NotePolicy::LogDistance,
        }
    }

    /// A short look at a recording: skips the first two seconds (count-in,
    /// attack) and averages five frames, naming the note from the one-octave
    /// table.
    pub fn quick() -> Self {
        AnalysisProfile {
            algorithm: Algorithm::Autocorrelation,
            frame_size: 2048,
            hop_size: 1024,
            silence_threshold: 0.001,
            max_frames: Some(5),
            max_estimates: None,
            max_duration_secs: None,
            skip_secs: 2.0,
            min_frequency: 50.0,
            max_frequency: 500.0,
            apply_window: true,
            yin_threshold: 0.15,
            note_policy: NotePolicy::NearestTable,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PitchError> {
        let profile: AnalysisProfile =
            toml::from_str(content).map_err(|e| PitchError::Configuration(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self, PitchError> {
        let content = std::fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&content)?;
        log::info!("Loaded analysis profile from {}", path.display());
        Ok(profile)
    }

    /// Reject degenerate values. Profiles built in code are not validated
    /// by the pipeline, which rejects frames instead of failing.
    pub fn validate(&self) -> Result<(), PitchError> {
        let fail = |msg: String| -> Result<(), PitchError> { Err(PitchError::Configuration(msg)) };
        if self.frame_size <= 1 {
            return fail(format!("frame_size must be > 1, got {}", self.frame_size));
        }
        if self.hop_size == 0 {
            return fail("hop_size must be > 0".to_string());
        }
        if !(self.silence_threshold >= 0.0) {
            return fail(format!(
                "silence_threshold must be >= 0, got {}",
                self.silence_threshold
            ));
        }
        if !(self.min_frequency >= 0.0 && self.min_frequency <= self.max_frequency) {
            return fail(format!(
                "frequency band [{}, {}] is empty",
                self.min_frequency, self.max_frequency
            ));
        }
        if !(self.yin_threshold > 0.0 && self.yin_threshold < 1.0) {
            return fail(format!(
                "yin_threshold must be in (0, 1), got {}",
                self.yin_threshold
            ));
        }
        if !(self.skip_secs >= 0.0) {
            return fail(format!("skip_secs must be >= 0, got {}", self.skip_secs));
        }
        if let Some(secs) = self.max_duration_secs {
            if !(secs > 0.0) {
                return fail(format!("max_duration_secs must be > 0, got {}", secs));
            }
        }
        Ok(())
    }

    /// The sample range of a `len` sample signal this profile analyses:
    /// `skip_secs` are dropped from the front, then at most
    /// `max_duration_secs` are kept.
    pub fn analysis_span(&self, len: usize, sample_rate: u32) -> Range<usize> {
        let to_samples = |secs: f32| (secs.max(0.0) as f64 * sample_rate as f64) as usize;
        let start = to_samples(self.skip_secs).min(len);
        let end = match self.max_duration_secs {
            Some(secs) => start.saturating_add(to_samples(secs)).min(len),
            None => len,
        };
        start..end
    }
}

impl Default for AnalysisProfile {
    fn default() -> Self {
        Self::file()
    }
}
