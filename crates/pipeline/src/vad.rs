//! Voice-activity chunking
//!
//! Classifies fixed-size frames as speech or non-speech, groups contiguous
//! speech into candidate spans, splits spans that exceed the maximum chunk
//! duration and extends chunk boundaries by the configured overlap.

use crate::audio_io::{self, load_audio_mono_16k, TARGET_SAMPLE_RATE};
use crate::PipelineError;
use katha_core::{AudioChunk, AudioRef};
use std::path::Path;
use std::sync::Arc;

/// VAD chunker configuration
#[derive(Debug, Clone)]
pub struct VadChunkerConfig {
    /// Detector aggressiveness (0-3). Higher values require more energy to
    /// call a frame speech.
    pub aggressiveness: u8,
    /// Frame duration in milliseconds (10, 20 or 30).
    pub frame_ms: u32,
    pub min_chunk_s: f64,
    pub max_chunk_s: f64,
    pub overlap_s: f64,
}

impl Default for VadChunkerConfig {
    fn default() -> Self {
        Self {
            aggressiveness: 2,
            frame_ms: 30,
            min_chunk_s: 1.0,
            max_chunk_s: 30.0,
            overlap_s: 0.5,
        }
    }
}

/// Candidate speech span before overlap handling.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    start: f64,
    end: f64,
}

impl Span {
    fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Frame-level speech detector with aggressiveness-dependent thresholds.
///
/// Uses short-time energy with a zero-crossing gate. Aggressiveness raises
/// the energy floor so quiet or ambiguous frames drop out first.
#[derive(Debug, Clone, Copy)]
struct FrameClassifier {
    energy_threshold_db: f32,
    max_zero_crossing_rate: f32,
}

impl FrameClassifier {
    fn new(aggressiveness: u8) -> Self {
        // Higher aggressiveness = higher floor = fewer frames pass.
        let energy_threshold_db = match aggressiveness {
            0 => -55.0,
            1 => -50.0,
            2 => -45.0,
            _ => -40.0,
        };
        Self {
            energy_threshold_db,
            max_zero_crossing_rate: 0.35,
        }
    }

    fn energy_db(frame: &[f32]) -> f32 {
        let mean_square: f32 =
            frame.iter().map(|s| s * s).sum::<f32>() / frame.len().max(1) as f32;
        10.0 * (mean_square + 1e-10).log10()
    }

    fn zero_crossing_rate(frame: &[f32]) -> f32 {
        if frame.len() < 2 {
            return 0.0;
        }
        let crossings = frame
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        crossings as f32 / (frame.len() - 1) as f32
    }

    fn is_speech(&self, frame: &[f32]) -> bool {
        Self::energy_db(frame) > self.energy_threshold_db
            && Self::zero_crossing_rate(frame) < self.max_zero_crossing_rate
    }
}

/// Voice-activity chunker.
pub struct VadChunker {
    config: VadChunkerConfig,
    classifier: FrameClassifier,
}

impl VadChunker {
    pub fn new(config: VadChunkerConfig) -> Result<Self, PipelineError> {
        if config.aggressiveness > 3 {
            return Err(PipelineError::Vad(format!(
                "aggressiveness must be 0-3, got {}",
                config.aggressiveness
            )));
        }
        if ![10, 20, 30].contains(&config.frame_ms) {
            return Err(PipelineError::Vad(format!(
                "frame_ms must be 10, 20 or 30, got {}",
                config.frame_ms
            )));
        }
        let classifier = FrameClassifier::new(config.aggressiveness);
        Ok(Self { config, classifier })
    }

    /// Chunk an audio file into speech segments with overlap.
    ///
    /// Unreadable audio is fatal; audio without speech yields an empty list.
    pub fn chunk_file(&self, path: &Path) -> Result<Vec<AudioChunk>, PipelineError> {
        let decoded = load_audio_mono_16k(path)?;
        let spans = self.detect_spans(&decoded.samples);
        let spans = self.split_and_filter(spans);
        let spans = self.apply_overlap(spans);

        let chunks = spans
            .into_iter()
            .map(|s| AudioChunk::new(s.start, s.end, AudioRef::File(path.to_path_buf())))
            .collect::<Vec<_>>();

        tracing::debug!(
            path = %path.display(),
            chunks = chunks.len(),
            "VAD chunking complete"
        );
        Ok(chunks)
    }

    /// Chunk raw 16 kHz mono samples (live mode path). Chunks carry their
    /// samples; `base_time` offsets the reported timestamps.
    pub fn chunk_samples(&self, samples: &[f32], base_time: f64) -> Vec<AudioChunk> {
        let spans = self.detect_spans(samples);
        let spans = self.split_and_filter(spans);
        let spans = self.apply_overlap(spans);

        spans
            .into_iter()
            .map(|s| {
                let window =
                    audio_io::extract_window(samples, TARGET_SAMPLE_RATE, s.start, s.end);
                AudioChunk::new(
                    base_time + s.start,
                    base_time + s.end,
                    AudioRef::Samples(Arc::from(window.into_boxed_slice())),
                )
            })
            .collect()
    }

    /// Group contiguous speech frames into candidate spans.
    fn detect_spans(&self, samples: &[f32]) -> Vec<Span> {
        let frame_len = (TARGET_SAMPLE_RATE as usize * self.config.frame_ms as usize) / 1000;
        let frame_s = self.config.frame_ms as f64 / 1000.0;

        let mut spans = Vec::new();
        let mut current: Option<Span> = None;

        for (i, frame) in samples.chunks_exact(frame_len).enumerate() {
            let t = i as f64 * frame_s;
            if self.classifier.is_speech(frame) {
                match &mut current {
                    Some(span) => span.end = t + frame_s,
                    None => {
                        current = Some(Span {
                            start: t,
                            end: t + frame_s,
                        })
                    }
                }
            } else if let Some(span) = current.take() {
                spans.push(span);
            }
        }
        if let Some(span) = current {
            spans.push(span);
        }

        spans
    }

    /// Drop sub-minimum spans; split spans above the maximum into equal
    /// sub-spans.
    fn split_and_filter(&self, spans: Vec<Span>) -> Vec<Span> {
        let mut result = Vec::new();

        for span in spans {
            let duration = span.duration();
            if duration < self.config.min_chunk_s {
                continue;
            }
            if duration > self.config.max_chunk_s {
                let splits = (duration / self.config.max_chunk_s).ceil() as usize;
                let split_duration = duration / splits as f64;
                for j in 0..splits {
                    let start = span.start + j as f64 * split_duration;
                    let end = (start + split_duration).min(span.end);
                    result.push(Span { start, end });
                }
            } else {
                result.push(span);
            }
        }

        result
    }

    /// Extend starts backward and ends forward by the overlap window.
    /// The first start and last end stay put; an extended end never crosses
    /// the next chunk's (pre-extension) start. Re-filters by minimum
    /// duration afterwards.
    fn apply_overlap(&self, spans: Vec<Span>) -> Vec<Span> {
        let overlap = self.config.overlap_s;
        if overlap <= 0.0 || spans.len() < 2 {
            return spans
                .into_iter()
                .filter(|s| s.duration() >= self.config.min_chunk_s)
                .collect();
        }

        let mut overlapped = Vec::with_capacity(spans.len());
        for (i, span) in spans.iter().enumerate() {
            let start = if i > 0 {
                (span.start - overlap).max(0.0)
            } else {
                span.start
            };
            let end = if i + 1 < spans.len() {
                (span.end + overlap).min(spans[i + 1].start)
            } else {
                span.end
            };
            overlapped.push(Span { start, end });
        }

        overlapped
            .into_iter()
            .filter(|s| s.duration() >= self.config.min_chunk_s)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Synthetic voiced signal: low-frequency sine, high energy, low ZCR.
    fn speech(seconds: f64) -> Vec<f32> {
        let n = (seconds * TARGET_SAMPLE_RATE as f64) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 16_000.0).sin() * 0.5)
            .collect()
    }

    fn silence(seconds: f64) -> Vec<f32> {
        vec![0.0; (seconds * TARGET_SAMPLE_RATE as f64) as usize]
    }

    fn chunker(config: VadChunkerConfig) -> VadChunker {
        VadChunker::new(config).unwrap()
    }

    fn default_chunker() -> VadChunker {
        chunker(VadChunkerConfig::default())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_aggr = VadChunkerConfig {
            aggressiveness: 5,
            ..Default::default()
        };
        assert!(VadChunker::new(bad_aggr).is_err());

        let bad_frame = VadChunkerConfig {
            frame_ms: 15,
            ..Default::default()
        };
        assert!(VadChunker::new(bad_frame).is_err());
    }

    #[test]
    fn test_silence_yields_no_chunks() {
        let chunks = default_chunker().chunk_samples(&silence(5.0), 0.0);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_continuous_speech_one_chunk() {
        let chunks = default_chunker().chunk_samples(&speech(3.0), 0.0);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].start_time < 0.1);
        assert!((chunks[0].end_time - 3.0).abs() < 0.1);
    }

    #[test]
    fn test_speech_pause_speech_two_chunks_with_overlap() {
        let mut samples = speech(2.0);
        samples.extend(silence(2.0));
        samples.extend(speech(2.0));

        let chunks = default_chunker().chunk_samples(&samples, 0.0);
        assert_eq!(chunks.len(), 2);

        // Second chunk's start extends back into the pause by the overlap
        let gap_start = 2.0;
        assert!(chunks[1].start_time < 4.0);
        assert!(chunks[1].start_time >= gap_start);
        // First chunk's end extends forward but never past the second's
        // pre-extension start
        assert!(chunks[0].end_time <= chunks[1].start_time + 0.5 + 1e-9);
    }

    #[test]
    fn test_short_blip_discarded() {
        let mut samples = silence(1.0);
        samples.extend(speech(0.3)); // below min_chunk_s = 1.0
        samples.extend(silence(1.0));

        let chunks = default_chunker().chunk_samples(&samples, 0.0);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_long_span_split() {
        let config = VadChunkerConfig {
            max_chunk_s: 2.0,
            overlap_s: 0.0,
            ..Default::default()
        };
        let chunks = chunker(config).chunk_samples(&speech(5.0), 0.0);
        // ceil(5 / 2) = 3 sub-spans of ~1.67s each
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.duration() <= 2.0 + 1e-9);
            assert!(chunk.duration() >= 1.0);
        }
    }

    #[test]
    fn test_chunks_strictly_ordered() {
        let mut samples = Vec::new();
        for _ in 0..3 {
            samples.extend(speech(1.5));
            samples.extend(silence(1.0));
        }
        let chunks = default_chunker().chunk_samples(&samples, 0.0);
        assert!(chunks.len() >= 2);
        for pair in chunks.windows(2) {
            assert!(pair[0].start_time < pair[1].start_time);
        }
    }

    #[test]
    fn test_duration_bounds_invariant() {
        let config = VadChunkerConfig::default();
        let mut samples = Vec::new();
        samples.extend(speech(40.0)); // forces splitting
        samples.extend(silence(2.0));
        samples.extend(speech(2.0));

        let chunks = chunker(config.clone()).chunk_samples(&samples, 0.0);
        for chunk in &chunks {
            assert!(chunk.duration() >= config.min_chunk_s - 1e-9);
            assert!(chunk.duration() <= config.max_chunk_s + 2.0 * config.overlap_s + 1e-9);
        }
    }

    #[test]
    fn test_base_time_offsets_live_chunks() {
        let chunks = default_chunker().chunk_samples(&speech(2.0), 100.0);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].start_time >= 100.0);
        assert!(matches!(chunks[0].audio, AudioRef::Samples(_)));
    }

    #[test]
    fn test_aggressiveness_monotone() {
        // A moderately quiet signal passes at 0 but not at 3.
        let quiet: Vec<f32> = (0..32_000)
            .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 16_000.0).sin() * 0.006)
            .collect();

        let lenient = chunker(VadChunkerConfig {
            aggressiveness: 0,
            ..Default::default()
        })
        .chunk_samples(&quiet, 0.0);
        let strict = chunker(VadChunkerConfig {
            aggressiveness: 3,
            ..Default::default()
        })
        .chunk_samples(&quiet, 0.0);

        assert!(lenient.len() >= strict.len());
        assert!(strict.is_empty());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = default_chunker().chunk_file(Path::new("/no/such.wav")).unwrap_err();
        assert!(matches!(err, PipelineError::AudioDecode(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_chunk_ordering_and_bounds(
            segs in proptest::collection::vec((0.5f64..4.0, 0.2f64..2.0), 1..5)
        ) {
            let config = VadChunkerConfig::default();
            let mut samples = Vec::new();
            for (speech_s, silence_s) in &segs {
                samples.extend(speech(*speech_s));
                samples.extend(silence(*silence_s));
            }

            let chunks = chunker(config.clone()).chunk_samples(&samples, 0.0);
            for pair in chunks.windows(2) {
                prop_assert!(pair[0].start_time < pair[1].start_time);
            }
            for chunk in &chunks {
                prop_assert!(chunk.duration() >= config.min_chunk_s - 1e-9);
                prop_assert!(
                    chunk.duration() <= config.max_chunk_s + 2.0 * config.overlap_s + 1e-9
                );
            }
        }
    }
}
