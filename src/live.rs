//! Live capture sessions.
//!
//! A capture accumulates mono chunks pushed by an audio input callback and
//! runs the batch pipeline over everything it collected once stopped.
//!
//! ```text
//! Idle --start--> Capturing --stop--> Draining --(analysis done)--> Idle
//! ```
//!
//! Only one session runs per [LiveCapture] at a time. Chunks may arrive from
//! any thread; the accumulated samples are only read after `stop` took them
//! out of the session, so the analysis never sees a partially appended chunk.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

use crate::aggregate::AggregateResult;
use crate::analyzer::Analyzer;
use crate::error::PitchError;
use crate::persist::{CapturePersister, WavPersister};
use crate::profile::AnalysisProfile;
use crate::sample::SampleBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    Idle,
    Capturing,
    /// Stopped; the captured audio is being analysed.
    Draining,
}

impl fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureStatus::Idle => write!(f, "idle"),
            CaptureStatus::Capturing => write!(f, "capturing"),
            CaptureStatus::Draining => write!(f, "draining"),
        }
    }
}

/// What a stopped capture produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOutcome {
    pub result: AggregateResult,
    /// Where the captured audio was stored, if it could be stored.
    pub artifact: Option<PathBuf>,
}

struct Session {
    sample_rate: u32,
    samples: Vec<f32>,
}

enum CaptureState {
    Idle,
    Capturing(Session),
    Draining,
}

impl CaptureState {
    fn status(&self) -> CaptureStatus {
        match self {
            CaptureState::Idle => CaptureStatus::Idle,
            CaptureState::Capturing(_) => CaptureStatus::Capturing,
            CaptureState::Draining => CaptureStatus::Draining,
        }
    }
}

pub struct LiveCapture {
    analyzer: Analyzer,
    persister: Option<Box<dyn CapturePersister>>,
    state: Mutex<CaptureState>,
}

static SHARED: Lazy<LiveCapture> = Lazy::new(|| {
    LiveCapture::new(AnalysisProfile::live()).with_persister(WavPersister::in_temp_dir())
});

impl LiveCapture {
    /// A capture that analyses with `profile` and does not store audio.
    pub fn new(profile: AnalysisProfile) -> Self {
        LiveCapture {
            analyzer: Analyzer::new(profile),
            persister: None,
            state: Mutex::new(CaptureState::Idle),
        }
    }

    pub fn with_persister<P>(mut self, persister: P) -> Self
    where
        P: CapturePersister + 'static,
    {
        self.persister = Some(Box::new(persister));
        self
    }

    /// The process-wide capture, using the live profile and storing each
    /// capture as `recorded_audio.wav` in the temp directory.
    pub fn shared() -> &'static LiveCapture {
        &SHARED
    }

    pub fn profile(&self) -> &AnalysisProfile {
        self.analyzer.profile()
    }

    pub fn status(&self) -> CaptureStatus {
        self.lock().status()
    }

    /// Begin a session at the input's `sample_rate`. Fails unless idle.
    pub fn start(&self, sample_rate: u32) -> Result<(), PitchError> {
        if sample_rate == 0 {
            return Err(PitchError::InputUnavailable(
                "input reports a sample rate of 0".to_string(),
            ));
        }
        let mut state = self.lock();
        if !matches!(*state, CaptureState::Idle) {
            return Err(PitchError::InvalidState {
                operation: "start",
                state: state.status(),
            });
        }
        *state = CaptureState::Capturing(Session {
            sample_rate,
            samples: Vec::new(),
        });
        log::info!("Capture started at {} Hz", sample_rate);
        Ok(())
    }

    /// Append a chunk of mono samples to the running session.
    pub fn on_samples_available(&self, chunk: &[f32]) -> Result<(), PitchError> {
        match &mut *self.lock() {
            CaptureState::Capturing(session) => {
                session.samples.extend_from_slice(chunk);
                Ok(())
            }
            state => Err(PitchError::InvalidState {
                operation: "append samples",
                state: state.status(),
            }),
        }
    }

    /// End the session, analyse the captured audio and store it.
    ///
    /// A session without samples yields [AggregateResult::no_audio], one
    /// holding non-finite samples [AggregateResult::error]. Storing
    /// the audio is best effort: a failure is logged and leaves
    /// [CaptureOutcome::artifact] empty.
    pub fn stop(&self) -> Result<CaptureOutcome, PitchError> {
        let session = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, CaptureState::Draining) {
                CaptureState::Capturing(session) => session,
                other => {
                    let status = other.status();
                    *state = other;
                    return Err(PitchError::InvalidState {
                        operation: "stop",
                        state: status,
                    });
                }
            }
        };
        let _idle = ResetOnDrop(&self.state);

        if session.samples.is_empty() {
            log::info!("Capture stopped without audio");
            return Ok(CaptureOutcome {
                result: AggregateResult::no_audio(),
                artifact: None,
            });
        }

        let buffer = match SampleBuffer::new(session.samples, session.sample_rate) {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("Cannot analyse captured audio: {}", e);
                return Ok(CaptureOutcome {
                    result: AggregateResult::error(),
                    artifact: None,
                });
            }
        };
        log::info!(
            "Capture stopped after {:.2} s, analysing",
            buffer.duration_secs()
        );
        let result = self.analyzer.analyze(&buffer);
        let artifact = self.persister.as_ref().and_then(|persister| {
            persister
                .persist(&buffer)
                .map_err(|e| log::warn!("Could not store capture: {}", e))
                .ok()
        });
        Ok(CaptureOutcome { result, artifact })
    }

    fn lock(&self) -> MutexGuard<'_, CaptureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the capture to idle when the draining phase ends, whichever way.
struct ResetOnDrop<'a>(&'a Mutex<CaptureState>);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = CaptureState::Idle;
    }
}
