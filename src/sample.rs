//! Mono sample buffers and down-mixing of decoded multi-channel audio.

use crate::error::PitchError;
use crate::utils::frames::{frames, Frames};

/// Mono single-precision samples at a fixed sample rate.
///
/// The sample rate is positive and every sample is finite; both are checked
/// on construction and the buffer is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, PitchError> {
        if sample_rate == 0 {
            return Err(PitchError::InputUnavailable(
                "sample rate must be positive".to_string(),
            ));
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(PitchError::InputUnavailable(format!(
                "sample {} is not finite",
                index
            )));
        }
        Ok(SampleBuffer {
            samples,
            sample_rate,
        })
    }

    /// Down-mix interleaved frames (`l r l r ...`) by averaging the channels.
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(
        samples: &[f32],
        channels: usize,
        sample_rate: u32,
    ) -> Result<Self, PitchError> {
        if channels == 0 {
            return Err(PitchError::InputUnavailable(
                "input format has 0 channels".to_string(),
            ));
        }
        let mono = if channels == 1 {
            samples.to_vec()
        } else {
            samples
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };
        Self::new(mono, sample_rate)
    }

    /// Down-mix one buffer per channel by averaging the channels. Channels of
    /// unequal length are truncated to the shortest one.
    pub fn from_planar<C>(channels: &[C], sample_rate: u32) -> Result<Self, PitchError>
    where
        C: AsRef<[f32]>,
    {
        let len = channels
            .iter()
            .map(|c| c.as_ref().len())
            .min()
            .ok_or_else(|| {
                PitchError::InputUnavailable("input format has 0 channels".to_string())
            })?;
        let count = channels.len() as f32;
        let mut mono = vec![0.0_f32; len];
        for channel in channels {
            for (m, &s) in mono.iter_mut().zip(channel.as_ref()) {
                *m += s;
            }
        }
        mono.iter_mut().for_each(|m| *m /= count);
        Self::new(mono, sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn frames(
        &self,
        frame_size: usize,
        hop_size: usize,
        max_frames: Option<usize>,
    ) -> Frames<'_, f32> {
        frames(&self.samples, frame_size, hop_size, max_frames)
    }
}

/// Decoded audio as handed over by a file decoder, before down-mixing.
#[derive(Debug, Clone, Copy)]
pub enum DecodedAudio<'a> {
    Interleaved {
        samples: &'a [f32],
        channels: usize,
        sample_rate: u32,
    },
    Planar {
        channels: &'a [Vec<f32>],
        sample_rate: u32,
    },
}

impl DecodedAudio<'_> {
    pub fn to_mono(&self) -> Result<SampleBuffer, PitchError> {
        match *self {
            DecodedAudio::Interleaved {
                samples,
                channels,
                sample_rate,
            } => SampleBuffer::from_interleaved(samples, channels, sample_rate),
            DecodedAudio::Planar {
                channels,
                sample_rate,
            } => SampleBuffer::from_planar(channels, sample_rate),
        }
    }
}
