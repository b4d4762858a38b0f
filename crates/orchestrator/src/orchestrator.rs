//! Per-chunk pipeline orchestration
//!
//! Batch mode: (optional) denoise -> VAD chunking -> sequential per-chunk
//! processing -> metrics. Live mode: the same per-chunk procedure over
//! streamed chunks, with draft and verified events per chunk.
//!
//! Failure isolation: an auxiliary engine failure drops only its
//! hypothesis; a primary engine failure yields a placeholder segment for
//! that chunk; post-processing failures pass the pre-failure text through
//! with `needs_review` set.

use crate::events::{DraftEvent, ErrorEvent, LiveEvent, VerifiedEvent};
use crate::prompt::gurbani_prompt;
use futures::stream::{FuturesUnordered, StreamExt};
use katha_config::Settings;
use katha_core::{
    AudioChunk, AudioRef, Denoiser, FusionResult, Hypothesis, MatchMethod, ProcessedSegment,
    QuoteCandidate, QuoteMatch, Result, Route, SegmentType, TranscriptionMetrics,
    TranscriptionResult,
};
use katha_lexicon::Lexicon;
use katha_pipeline::{EngineRegistry, FusionEngine, FusionEngineConfig, RouteIdentifier, VadChunker, VadChunkerConfig};
use katha_scripture::{
    apply_quote_match, AssistedMatcher, MatcherConfig, QuoteContextDetector, ShabadTracker,
};
use katha_text::{DomainCorrector, DriftDetector, DriftSeverity, ScriptLock};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex as AsyncMutex};

/// Review gate on fused confidence, independent of drift.
const SEGMENT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Sentinel for segments whose transcription could not be recovered.
const FAILED_SEGMENT_TEXT: &str = "[Transcription failed - review audio]";

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder {
    settings: Settings,
    registry: Arc<EngineRegistry>,
    lexicon: Arc<Lexicon>,
    matcher: Option<AssistedMatcher>,
    denoiser: Option<Arc<dyn Denoiser>>,
    shabad_tracker: Option<ShabadTracker>,
}

impl OrchestratorBuilder {
    pub fn new(settings: Settings, registry: Arc<EngineRegistry>) -> Self {
        Self {
            settings,
            registry,
            lexicon: Arc::new(Lexicon::default()),
            matcher: None,
            denoiser: None,
            shabad_tracker: None,
        }
    }

    pub fn with_lexicon(mut self, lexicon: Arc<Lexicon>) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Enable scripture matching. Without a matcher, quote detection is
    /// skipped for the whole run (store unavailable is not fatal).
    pub fn with_matcher(mut self, matcher: AssistedMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn with_denoiser(mut self, denoiser: Arc<dyn Denoiser>) -> Self {
        self.denoiser = Some(denoiser);
        self
    }

    /// Enable live shabad tracking for continuation-biased matching.
    pub fn with_shabad_tracker(mut self, tracker: ShabadTracker) -> Self {
        self.shabad_tracker = Some(tracker);
        self
    }

    pub fn build(self) -> Result<Orchestrator> {
        let vad_config = VadChunkerConfig {
            aggressiveness: self.settings.vad.aggressiveness,
            frame_ms: self.settings.vad.frame_ms,
            min_chunk_s: self.settings.vad.min_chunk_s,
            max_chunk_s: self.settings.vad.max_chunk_s,
            overlap_s: self.settings.vad.overlap_s,
        };
        let chunker = VadChunker::new(vad_config).map_err(katha_core::Error::from)?;

        let fusion = FusionEngine::new(FusionEngineConfig {
            agreement_threshold: self.settings.fusion.agreement_threshold,
            confidence_boost: self.settings.fusion.confidence_boost,
            redecode_threshold: self.settings.fusion.redecode_threshold,
            max_redecode_attempts: self.settings.fusion.max_redecode_attempts,
        });

        let mode = self.settings.script.domain_mode;
        let drift_detector = DriftDetector::new(mode, self.lexicon.clone()).with_thresholds(
            self.settings.script.script_purity_threshold,
            self.settings.script.latin_ratio_threshold,
            self.settings.script.oov_ratio_threshold,
        );
        let corrector = DomainCorrector::new(mode, self.lexicon.clone())
            .with_limits(self.settings.script.max_edit_distance, 0.5);

        let (event_tx, _) = broadcast::channel(1024);

        Ok(Orchestrator {
            settings: self.settings,
            registry: self.registry,
            chunker,
            fusion,
            route_identifier: RouteIdentifier::default(),
            script_lock: ScriptLock::new(),
            drift_detector,
            corrector,
            matcher: self.matcher,
            denoiser: self.denoiser,
            shabad_tracker: self.shabad_tracker.map(AsyncMutex::new),
            quote_context: Mutex::new(QuoteContextDetector::new()),
            event_tx,
        })
    }
}

/// Transcription orchestrator. Owns the per-run state; shared resources
/// (registry, lexicon, stores) come in behind `Arc`.
pub struct Orchestrator {
    settings: Settings,
    registry: Arc<EngineRegistry>,
    chunker: VadChunker,
    fusion: FusionEngine,
    route_identifier: RouteIdentifier,
    script_lock: ScriptLock,
    drift_detector: DriftDetector,
    corrector: DomainCorrector,
    matcher: Option<AssistedMatcher>,
    denoiser: Option<Arc<dyn Denoiser>>,
    /// Live-session shabad context; exclusive to one session.
    shabad_tracker: Option<AsyncMutex<ShabadTracker>>,
    /// Quote intro/continuation state across segments of one session.
    quote_context: Mutex<QuoteContextDetector>,
    event_tx: broadcast::Sender<LiveEvent>,
}

impl Orchestrator {
    pub fn builder(settings: Settings, registry: Arc<EngineRegistry>) -> OrchestratorBuilder {
        OrchestratorBuilder::new(settings, registry)
    }

    /// Subscribe to live events (draft, verified, error).
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.event_tx.subscribe()
    }

    /// Transcribe an audio file end to end.
    pub async fn transcribe_file(&self, path: &Path) -> Result<TranscriptionResult> {
        let job_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        tracing::info!(job_id = %job_id, path = %path.display(), "starting transcription");

        // Step 0: optional denoising into a temp file, cleaned up on exit
        let mut denoise_tmp: Option<tempfile::NamedTempFile> = None;
        let working_path = match self.maybe_denoise(path, &job_id, &mut denoise_tmp).await {
            Some(p) => p,
            None => path.to_path_buf(),
        };

        // Step 1: VAD chunking (fatal on unreadable audio)
        let chunks = self
            .chunker
            .chunk_file(&working_path)
            .map_err(katha_core::Error::from)?;
        tracing::info!(job_id = %job_id, chunks = chunks.len(), "VAD chunking complete");

        // Step 2: process chunks sequentially to preserve ordering
        let mut segments = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let segment = self.process_chunk(chunk, &job_id, false).await;
            segments.push(segment);
        }

        let metrics = TranscriptionMetrics::from_segments(&segments, chunks.len());
        tracing::info!(
            job_id = %job_id,
            segments = metrics.total_segments,
            review = metrics.segments_needing_review,
            avg_confidence = format!("{:.2}", metrics.average_confidence),
            "transcription complete"
        );

        Ok(TranscriptionResult {
            job_id,
            segments,
            metrics,
        })
    }

    /// Process one live-streamed chunk. Emits a draft event after the
    /// primary engine and a verified event after the full pipeline.
    pub async fn process_stream_chunk(
        &self,
        session_id: &str,
        samples: Arc<[f32]>,
        start: f64,
        end: f64,
    ) -> ProcessedSegment {
        let chunk = AudioChunk::new(start, end, AudioRef::Samples(samples));
        self.process_chunk(&chunk, session_id, true).await
    }

    /// Reset per-session state (quote context, shabad tracking).
    pub async fn reset_session(&self) {
        self.quote_context.lock().reset();
        if let Some(tracker) = &self.shabad_tracker {
            tracker.lock().await.reset();
        }
    }

    async fn maybe_denoise(
        &self,
        path: &Path,
        job_id: &str,
        tmp_slot: &mut Option<tempfile::NamedTempFile>,
    ) -> Option<std::path::PathBuf> {
        if !self.settings.denoise.enabled {
            return None;
        }
        let denoiser = self.denoiser.as_ref()?;

        let level = match denoiser.estimate_noise_level(path).await {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "noise estimation failed, skipping denoise");
                return None;
            }
        };
        if level < self.settings.denoise.auto_threshold {
            tracing::debug!(
                job_id = %job_id,
                level = format!("{level:.2}"),
                "noise level below threshold, skipping denoise"
            );
            return None;
        }

        let tmp = match tempfile::Builder::new().suffix(".wav").tempfile() {
            Ok(tmp) => tmp,
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "temp file creation failed, skipping denoise");
                return None;
            }
        };

        match denoiser.denoise_file(path, tmp.path()).await {
            Ok(out) => {
                tracing::info!(
                    job_id = %job_id,
                    level = format!("{level:.2}"),
                    "denoised audio to temporary file"
                );
                *tmp_slot = Some(tmp);
                Some(out)
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "denoising failed, using original audio");
                None
            }
        }
    }

    fn engines_for_route(&self, route: Route) -> Vec<String> {
        let engines = &self.settings.engines;
        match route {
            Route::PunjabiSpeech | Route::ScriptureQuoteLikely => vec![engines.indic.clone()],
            Route::EnglishSpeech => vec![engines.english.clone()],
            Route::Mixed => vec![engines.indic.clone(), engines.english.clone()],
        }
    }

    fn route_language(&self, route: Route) -> Option<String> {
        self.settings
            .engines
            .route_languages
            .get(route.as_str())
            .cloned()
    }

    /// Run auxiliary engines with a per-engine timeout. Engines that fail
    /// to load, error, or time out are omitted. Hypotheses come back in
    /// completion order.
    async fn run_auxiliaries(&self, chunk: &AudioChunk, route: Route) -> Vec<Hypothesis> {
        let timeout = Duration::from_secs(self.settings.fusion.asr_timeout_s);
        let language = self.route_language(route);
        let engine_ids = self.engines_for_route(route);

        let mut engines = Vec::new();
        for id in engine_ids {
            match self.registry.get(&id) {
                Ok(engine) => engines.push((id, engine)),
                Err(e) => {
                    tracing::debug!(engine = %id, error = %e, "auxiliary engine unavailable")
                }
            }
        }

        let mut hypotheses = Vec::new();
        if self.settings.fusion.parallel_execution {
            // Concurrent launch; hypotheses collected in completion order
            let mut tasks = FuturesUnordered::new();
            for (id, engine) in engines {
                let language = language.clone();
                tasks.push(async move {
                    let result = tokio::time::timeout(
                        timeout,
                        engine.transcribe_chunk(chunk, language.as_deref(), Some(route), None),
                    )
                    .await;
                    (id, result)
                });
            }
            while let Some((id, result)) = tasks.next().await {
                match result {
                    Ok(Ok(hypothesis)) => hypotheses.push(hypothesis),
                    Ok(Err(e)) => {
                        tracing::warn!(engine = %id, error = %e, "auxiliary engine failed, dropped")
                    }
                    Err(_) => {
                        tracing::warn!(
                            engine = %id,
                            timeout_s = timeout.as_secs(),
                            "auxiliary engine timed out, dropped"
                        )
                    }
                }
            }
        } else {
            for (id, engine) in engines {
                let result = tokio::time::timeout(
                    timeout,
                    engine.transcribe_chunk(chunk, language.as_deref(), Some(route), None),
                )
                .await;
                match result {
                    Ok(Ok(hypothesis)) => hypotheses.push(hypothesis),
                    Ok(Err(e)) => {
                        tracing::warn!(engine = %id, error = %e, "auxiliary engine failed, dropped")
                    }
                    Err(_) => tracing::warn!(engine = %id, "auxiliary engine timed out, dropped"),
                }
            }
        }

        hypotheses
    }

    /// Retry empty transcriptions with the Indic engine; fall back to the
    /// sentinel text when every attempt stays empty.
    async fn retry_empty(&self, chunk: &AudioChunk, route: Route, fusion: &mut FusionResult) {
        if !self.settings.retry.segment_retry_on_empty
            || !fusion.fused_text.trim().is_empty()
        {
            return;
        }

        let language = self.route_language(route);
        for attempt in 1..=self.settings.retry.max_segment_retries {
            tracing::warn!(attempt, "empty transcription, retrying with Indic engine");
            let engine = match self.registry.get(&self.settings.engines.indic) {
                Ok(engine) => engine,
                Err(_) => break,
            };
            match engine
                .transcribe_chunk(chunk, language.as_deref(), Some(route), None)
                .await
            {
                Ok(hypothesis) if !hypothesis.text.trim().is_empty() => {
                    tracing::info!(attempt, "retry recovered transcription");
                    fusion.fused_text = hypothesis.text.clone();
                    fusion.fused_confidence = hypothesis.confidence;
                    fusion.selected_engine = hypothesis.engine_id.clone();
                    fusion.hypotheses = vec![hypothesis];
                    return;
                }
                Ok(_) => tracing::warn!(attempt, "retry also produced empty transcription"),
                Err(e) => tracing::warn!(attempt, error = %e, "retry attempt failed"),
            }
        }

        tracing::error!("all retries empty, marking segment for review");
        fusion.fused_text = FAILED_SEGMENT_TEXT.to_string();
        fusion.fused_confidence = 0.0;
    }

    /// Single re-decode pass via the configured re-decode engine.
    async fn maybe_redecode(
        &self,
        chunk: &AudioChunk,
        route: Route,
        fusion: FusionResult,
    ) -> FusionResult {
        // Exhausted-retry sentinel is final; re-fusing would discard it
        if fusion.fused_text == FAILED_SEGMENT_TEXT {
            return fusion;
        }
        if !self.fusion.should_redecode(&fusion) {
            return fusion;
        }

        tracing::warn!(
            confidence = format!("{:.2}", fusion.fused_confidence),
            agreement = format!("{:.2}", fusion.agreement_score),
            "low confidence, triggering re-decode"
        );

        let engine = match self.registry.get(&self.settings.engines.redecode_engine) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::warn!(error = %e, "re-decode engine unavailable");
                return fusion;
            }
        };

        let language = self.route_language(route);
        match engine
            .transcribe_chunk(chunk, language.as_deref(), Some(route), None)
            .await
        {
            Ok(hypothesis) => match self.fusion.apply_redecode(fusion.clone(), hypothesis) {
                Ok(updated) => {
                    tracing::info!(
                        confidence = format!("{:.2}", updated.fused_confidence),
                        "re-decode applied"
                    );
                    updated
                }
                Err(e) => {
                    tracing::warn!(error = %e, "re-decode fusion failed");
                    fusion
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "re-decode engine failed");
                fusion
            }
        }
    }

    fn emit(&self, event: LiveEvent) {
        let _ = self.event_tx.send(event);
    }

    /// The per-chunk pipeline. Never fails: chunk-scope errors produce a
    /// placeholder segment so ordering and time coverage are preserved.
    pub async fn process_chunk(
        &self,
        chunk: &AudioChunk,
        session_id: &str,
        emit_events: bool,
    ) -> ProcessedSegment {
        let segment_id = LiveEvent::segment_id(chunk.start_time, chunk.end_time);

        // Step 1: primary engine (fatal for the chunk on failure)
        let primary_engine = match self.registry.get(&self.settings.engines.primary) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %e, "primary engine unavailable");
                if emit_events {
                    self.emit(LiveEvent::Error(ErrorEvent {
                        message: e.to_string(),
                        start: Some(chunk.start_time),
                        end: Some(chunk.end_time),
                    }));
                }
                return ProcessedSegment::placeholder(
                    chunk.start_time,
                    chunk.end_time,
                    Route::Mixed,
                    "primary engine unavailable",
                );
            }
        };

        let prompt = gurbani_prompt(self.settings.script.domain_mode, None);
        let primary = match primary_engine
            .transcribe_chunk(chunk, None, None, Some(&prompt))
            .await
        {
            Ok(hypothesis) => hypothesis,
            Err(e) => {
                tracing::error!(error = %e, "primary engine failed for chunk");
                if emit_events {
                    self.emit(LiveEvent::Error(ErrorEvent {
                        message: e.to_string(),
                        start: Some(chunk.start_time),
                        end: Some(chunk.end_time),
                    }));
                }
                return ProcessedSegment::placeholder(
                    chunk.start_time,
                    chunk.end_time,
                    Route::Mixed,
                    "primary engine failed",
                );
            }
        };

        // Draft event precedes everything downstream
        if emit_events {
            let (draft_gurmukhi, _) = self.script_lock.repair(&primary.text);
            self.emit(LiveEvent::Draft(DraftEvent {
                session_id: session_id.to_string(),
                segment_id: segment_id.clone(),
                start: chunk.start_time,
                end: chunk.end_time,
                text: primary.text.clone(),
                gurmukhi: draft_gurmukhi,
                roman: None,
                confidence: primary.confidence,
            }));
        }

        // Step 2: route identification from the primary pass
        let route = self.route_identifier.identify(&primary);
        let language = primary.language.clone();
        tracing::debug!(route = %route, "chunk route identified");

        // Step 3: auxiliary engines per route
        let auxiliaries = self.run_auxiliaries(chunk, route).await;

        // Step 4: fusion
        let mut all = vec![primary];
        all.extend(auxiliaries);
        let mut fusion = match self.fusion.fuse(all) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "fusion failed for chunk");
                return ProcessedSegment::placeholder(
                    chunk.start_time,
                    chunk.end_time,
                    route,
                    "fusion failed",
                );
            }
        };

        // Step 5: empty-transcription retry, then re-decode policy
        self.retry_empty(chunk, route, &mut fusion).await;
        let fusion = self.maybe_redecode(chunk, route, fusion).await;

        let mut segment = self.post_process(chunk, route, &language, fusion).await;

        // Live sessions advance the shabad pointer before the verified
        // event so the event carries the final text
        if emit_events && segment.segment_type == SegmentType::Speech {
            self.track_shabad(&mut segment).await;
        }

        if emit_events {
            self.emit(LiveEvent::Verified(VerifiedEvent {
                session_id: session_id.to_string(),
                segment_id,
                start: segment.start,
                end: segment.end,
                gurmukhi: segment.text.clone(),
                roman: segment.roman.clone().unwrap_or_default(),
                confidence: segment.confidence,
                quote_match: segment.quote_match.clone(),
                needs_review: segment.needs_review,
            }));
        }

        segment
    }

    /// Post-ASR pipeline: script lock, drift, correction, quote matching.
    /// Recoverable failures pass the pre-failure text through with
    /// `needs_review` set.
    async fn post_process(
        &self,
        chunk: &AudioChunk,
        route: Route,
        language: &str,
        fusion: FusionResult,
    ) -> ProcessedSegment {
        // Sentinel text bypasses post-processing; it is a marker, not
        // transcription
        if fusion.fused_text == FAILED_SEGMENT_TEXT {
            return ProcessedSegment {
                start: chunk.start_time,
                end: chunk.end_time,
                route,
                segment_type: SegmentType::Speech,
                text: fusion.fused_text.clone(),
                confidence: 0.0,
                language: language.to_string(),
                hypotheses: fusion.hypothesis_snapshots(),
                needs_review: true,
                roman: None,
                original_script: None,
                script_confidence: None,
                quote_match: None,
                spoken_text: None,
            };
        }

        let mut text = fusion.fused_text.clone();
        let mut domain_needs_review = false;
        let mut original_script = None;
        let mut script_confidence = None;

        // Drift detection on the fused text
        let drift = self.drift_detector.detect(&text);
        tracing::debug!(
            purity = format!("{:.2}", drift.script_purity),
            latin = format!("{:.3}", drift.latin_ratio),
            oov = format!("{:.2}", drift.oov_ratio),
            severity = ?drift.severity,
            "drift detection"
        );

        // Script lock in strict mode, or whenever drift recommends it
        if self.settings.script.strict_gurmukhi || drift.should_redecode {
            let (locked, analysis, was_repaired) = self
                .script_lock
                .enforce(&text, self.settings.script.strict_gurmukhi);
            if was_repaired {
                tracing::info!("script lock repaired non-Gurmukhi characters");
                original_script = Some("mixed".to_string());
                script_confidence = Some(analysis.script_purity());
                text = locked;
            }
        }

        // Domain correction when drift recommends it
        if drift.should_correct {
            let (corrected, results) = self.corrector.correct_text(&text, false);
            let corrections = results.iter().filter(|r| r.was_corrected).count();
            if corrections > 0 {
                tracing::info!(corrections, "domain corrector applied");
                text = corrected;
            }
        }

        if matches!(drift.severity, DriftSeverity::High | DriftSeverity::Critical) {
            domain_needs_review = true;
            tracing::warn!(severity = ?drift.severity, "segment flagged for review due to drift");
        }

        let mut segment = ProcessedSegment {
            start: chunk.start_time,
            end: chunk.end_time,
            route,
            segment_type: SegmentType::Speech,
            text,
            confidence: fusion.fused_confidence,
            language: language.to_string(),
            hypotheses: fusion.hypothesis_snapshots(),
            needs_review: domain_needs_review,
            roman: None,
            original_script,
            script_confidence,
            quote_match: None,
            spoken_text: None,
        };

        // Quote detection and canonical matching
        self.match_quotes(&mut segment, &fusion, route).await;

        // Final review gate
        segment.needs_review = segment.needs_review
            || fusion.fused_confidence < SEGMENT_CONFIDENCE_THRESHOLD
            || fusion.agreement_score < 0.5;

        segment
    }

    /// Run the scripture matcher when the route or quote-context signals
    /// suggest a citation. Matching failures are recoverable.
    async fn match_quotes(
        &self,
        segment: &mut ProcessedSegment,
        fusion: &FusionResult,
        route: Route,
    ) {
        let Some(matcher) = &self.matcher else {
            return;
        };

        let (context_result, mut candidates) = {
            let mut detector = self.quote_context.lock();
            let result = detector.detect(&segment.text);
            let candidates = detector.candidates(&segment.text, &result);
            (result, candidates)
        };

        let should_match = route.suggests_scripture()
            || (context_result.is_quote_likely && context_result.confidence >= 0.4);
        if !should_match {
            return;
        }

        if candidates.is_empty() {
            // Route hint alone is enough to attempt a match
            candidates.push(QuoteCandidate {
                text: segment.text.clone(),
                confidence: 0.6,
                detection_reason: "route_hint".to_string(),
            });
        }

        let alternatives: Vec<String> = fusion
            .hypotheses
            .iter()
            .map(|h| h.text.clone())
            .filter(|t| *t != segment.text)
            .collect();

        match matcher.find_match(&candidates, &alternatives).await {
            Ok(Some(quote_match)) => {
                apply_quote_match(
                    segment,
                    quote_match,
                    matcher.config().replacement_threshold,
                );
            }
            Ok(None) => {
                tracing::debug!("no canonical match for quote candidates");
            }
            Err(e) => {
                tracing::warn!(error = %e, "quote matching failed, continuing without match");
                segment.needs_review = true;
            }
        }
    }

    /// Live-mode shabad tracking: bias toward the expected next line and
    /// snap when it matches.
    async fn track_shabad(&self, segment: &mut ProcessedSegment) {
        let Some(tracker) = &self.shabad_tracker else {
            return;
        };

        let mut tracker = tracker.lock().await;
        match tracker.match_line(&segment.text).await {
            Ok(Some((line, score))) if score >= self.settings.quote.review_threshold => {
                let quote_match = QuoteMatch {
                    source: line.source,
                    line_id: line.line_id.clone(),
                    canonical_text: line.gurmukhi.clone(),
                    canonical_roman: line.roman.clone(),
                    spoken_text: segment.text.clone(),
                    confidence: score,
                    ang: line.ang,
                    raag: line.raag.clone(),
                    author: line.author.clone(),
                    match_method: MatchMethod::Alignment,
                };
                apply_quote_match(
                    segment,
                    quote_match,
                    self.settings.quote.replacement_threshold,
                );
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "shabad tracking lookup failed"),
        }
    }
}
