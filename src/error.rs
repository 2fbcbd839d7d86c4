use thiserror::Error;

use crate::live::CaptureStatus;

#[derive(Debug, Error)]
pub enum PitchError {
    /// Decoded or live input could not be turned into a sample buffer.
    #[error("audio input unavailable: {0}")]
    InputUnavailable(String),

    /// A capture lifecycle method was called in the wrong state.
    #[error("cannot {operation} while capture is {state}")]
    InvalidState {
        operation: &'static str,
        state: CaptureStatus,
    },

    #[error("invalid analysis profile: {0}")]
    Configuration(String),

    #[error("failed to write capture: {0}")]
    Persistence(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
