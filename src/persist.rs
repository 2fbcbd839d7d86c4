//! Writing captured audio to disk.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::PitchError;
use crate::sample::SampleBuffer;

/// File name used by [WavPersister::in_temp_dir].
pub const CAPTURE_FILE_NAME: &str = "recorded_audio.wav";

/// Stores a finished capture and returns where it went.
pub trait CapturePersister: Send + Sync {
    fn persist(&self, buffer: &SampleBuffer) -> Result<PathBuf, PitchError>;
}

/// Writes mono 32-bit float WAV files, replacing any file at `path`.
#[derive(Debug, Clone)]
pub struct WavPersister {
    path: PathBuf,
}

impl WavPersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        WavPersister { path: path.into() }
    }

    /// A persister writing to [CAPTURE_FILE_NAME] in the system temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join(CAPTURE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CapturePersister for WavPersister {
    fn persist(&self, buffer: &SampleBuffer) -> Result<PathBuf, PitchError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: buffer.sample_rate(),
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&self.path, spec)?;
        for &sample in buffer.samples() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        log::info!(
            "Wrote {} samples ({:.2} s) to {}",
            buffer.len(),
            buffer.duration_secs(),
            self.path.display()
        );
        Ok(self.path.clone())
    }
}
