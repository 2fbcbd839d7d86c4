//! # Pitch Analysis
//! *pitch_analysis* estimates the dominant fundamental frequency of a mono
//! recording and names the closest musical note. Audio either comes in as a
//! decoded buffer (batch analysis) or as chunks pushed by a live input
//! ([LiveCapture]), which is analysed once the capture stops.
//!
//! # Detectors
//! A *detector* estimates the pitch of a single frame. Profiles pick one:
//!
//!   * [AutocorrelationDetector][detector::autocorrelation]
//!   * [YINDetector][detector::yin]
//!
//! # Pipeline
//! An [Analyzer] frames the signal, skips silent frames, estimates a pitch
//! per frame and averages the estimates inside the profile's frequency band.
//! Every constant involved lives in an [AnalysisProfile].
//!
//! # Examples
//! ```
//! use pitch_analysis::{AnalysisProfile, Analyzer, SampleBuffer};
//!
//! fn main() {
//!     const SAMPLE_RATE: u32 = 44100;
//!
//!     // Three seconds of A3 from some source (decoder, microphone, generated...)
//!     let freq = 220.0;
//!     let samples: Vec<f32> = (0..SAMPLE_RATE as usize * 3)
//!         .map(|i| {
//!             let t = i as f64 / SAMPLE_RATE as f64;
//!             (0.5 * (2.0 * std::f64::consts::PI * freq * t).sin()) as f32
//!         })
//!         .collect();
//!     let buffer = SampleBuffer::new(samples, SAMPLE_RATE).unwrap();
//!
//!     let result = Analyzer::new(AnalysisProfile::file()).analyze(&buffer);
//!
//!     println!("Frequency: {}, Note: {}", result.frequency, result.note);
//!     assert_eq!(result.note, "A");
//! }
//! ```

pub use aggregate::AggregateResult;
pub use analyzer::Analyzer;
pub use detector::internals::Pitch;
pub use detector::{Algorithm, PitchDetector};
pub use error::PitchError;
pub use live::{CaptureOutcome, CaptureStatus, LiveCapture};
pub use note::NotePolicy;
pub use persist::{CapturePersister, WavPersister};
pub use profile::AnalysisProfile;
pub use progress::{ChannelProgress, NoProgress, ProgressReporter};
pub use sample::{DecodedAudio, SampleBuffer};

pub mod aggregate;
pub mod analyzer;
pub mod detector;
pub mod error;
pub mod float;
pub mod live;
pub mod note;
pub mod persist;
pub mod profile;
pub mod progress;
pub mod sample;
pub mod utils;
