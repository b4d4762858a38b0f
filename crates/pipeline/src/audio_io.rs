//! Audio decoding and resampling
//!
//! All downstream processing expects 16 kHz mono f32 samples. WAV input is
//! decoded with hound and resampled with rubato when the source rate
//! differs.

use crate::PipelineError;
use rubato::{FftFixedIn, Resampler};
use std::path::Path;

/// Target sample rate for VAD and ASR.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Decoded, normalized audio.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// 16 kHz mono samples in [-1, 1].
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Load a WAV file as 16 kHz mono f32.
pub fn load_audio_mono_16k(path: &Path) -> Result<DecodedAudio, PipelineError> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| PipelineError::AudioDecode(format!("{}: {e}", path.display())))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| PipelineError::AudioDecode(e.to_string()))?,
        hound::SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<_, _>>()
                .map_err(|e| PipelineError::AudioDecode(e.to_string()))?
        }
    };

    let mono = downmix(&samples, spec.channels as usize);
    let samples = if spec.sample_rate == TARGET_SAMPLE_RATE {
        mono
    } else {
        resample(&mono, spec.sample_rate, TARGET_SAMPLE_RATE)?
    };

    Ok(DecodedAudio {
        samples,
        sample_rate: TARGET_SAMPLE_RATE,
    })
}

/// Average interleaved channels down to mono.
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample mono audio between rates.
fn resample(samples: &[f32], from: u32, to: u32) -> Result<Vec<f32>, PipelineError> {
    if from == to || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    const CHUNK: usize = 1024;
    let mut resampler = FftFixedIn::<f32>::new(from as usize, to as usize, CHUNK, 2, 1)
        .map_err(|e| PipelineError::Resample(e.to_string()))?;

    let mut output = Vec::with_capacity(samples.len() * to as usize / from as usize + CHUNK);
    let mut position = 0;

    while position < samples.len() {
        let end = (position + CHUNK).min(samples.len());
        let mut block = samples[position..end].to_vec();
        block.resize(CHUNK, 0.0);

        let processed = resampler
            .process(&[block], None)
            .map_err(|e| PipelineError::Resample(e.to_string()))?;
        output.extend_from_slice(&processed[0]);
        position = end;
    }

    Ok(output)
}

/// Slice a window of samples by time.
pub fn extract_window(samples: &[f32], sample_rate: u32, start_s: f64, end_s: f64) -> Vec<f32> {
    let start = ((start_s * sample_rate as f64) as usize).min(samples.len());
    let end = ((end_s * sample_rate as f64) as usize).min(samples.len());
    samples[start..end].to_vec()
}
