//! Domain lexicon: scripture-derived vocabulary with frequencies
//!
//! The lexicon is built once from the scripture stores, persisted as a JSON
//! artifact, and read-only after load. Correction and OOV checks consult the
//! combined vocabulary for the active domain mode.

use crate::data;
use katha_config::DomainMode;
use katha_core::{Error, Result, ScriptureStore};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

static GURMUKHI_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{0A00}-\u{0A7F}]+").expect("static regex"));

/// Domain-specific vocabulary for Gurbani transcription.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Lexicon {
    /// Words extracted from SGGS.
    pub sggs_vocab: HashSet<String>,
    /// Words extracted from Dasam Granth.
    pub dasam_vocab: HashSet<String>,
    /// Word frequencies across the corpus (higher = more common).
    pub word_frequencies: HashMap<String, u32>,
    /// Build metadata.
    pub build_version: String,
    pub sggs_line_count: usize,
    pub dasam_line_count: usize,
}

impl Lexicon {
    /// Combined vocabulary for a domain mode. Curated sets are always
    /// included; both corpus vocabularies are searchable in every mode, the
    /// mode only changes correction priority elsewhere.
    pub fn combined_vocab(&self, _mode: DomainMode) -> HashSet<&str> {
        let mut combined: HashSet<&str> = HashSet::new();
        combined.extend(data::common_particles().iter().copied());
        combined.extend(data::honorifics().iter().copied());
        combined.extend(data::raag_names().iter().copied());
        combined.extend(data::theological_terms().iter().copied());
        combined.extend(self.sggs_vocab.iter().map(String::as_str));
        combined.extend(self.dasam_vocab.iter().map(String::as_str));
        combined
    }

    /// Whether a word is in-domain. Both corpus vocabularies are searched in
    /// every mode; `mode` selects correction priority, not membership.
    pub fn contains(&self, word: &str, _mode: DomainMode) -> bool {
        data::common_particles().contains(word)
            || data::honorifics().contains(word)
            || data::raag_names().contains(word)
            || data::theological_terms().contains(word)
            || self.sggs_vocab.contains(word)
            || self.dasam_vocab.contains(word)
    }

    /// Word frequency in the corpus; unknown words score 0.
    pub fn frequency(&self, word: &str) -> u32 {
        self.word_frequencies.get(word).copied().unwrap_or(0)
    }

    pub fn high_frequency_words(&self, min_freq: u32) -> HashSet<&str> {
        self.word_frequencies
            .iter()
            .filter(|(_, f)| **f >= min_freq)
            .map(|(w, _)| w.as_str())
            .collect()
    }

    pub fn total_vocab_size(&self) -> usize {
        self.combined_vocab(DomainMode::Sggs).len()
    }

    /// Persist as a JSON artifact.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self).map_err(|e| Error::Lexicon(e.to_string()))?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), words = self.total_vocab_size(), "saved lexicon");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| Error::Lexicon(e.to_string()))
    }
}

/// Builds a [`Lexicon`] from the scripture stores.
pub struct LexiconBuilder {
    /// Minimum word length to keep.
    min_word_len: usize,
    /// Cap on lines read per store (None = all).
    max_lines: Option<usize>,
}

impl Default for LexiconBuilder {
    fn default() -> Self {
        Self {
            min_word_len: 1,
            max_lines: None,
        }
    }
}

impl LexiconBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    /// Extract Gurmukhi words from a line of scripture.
    fn extract_words<'t>(&self, line: &'t str) -> Vec<&'t str> {
        GURMUKHI_WORD
            .find_iter(line)
            .map(|m| m.as_str())
            .filter(|w| w.chars().count() >= self.min_word_len)
            .collect()
    }

    async fn extract_from_store(
        &self,
        store: &dyn ScriptureStore,
        vocab: &mut HashSet<String>,
        frequencies: &mut HashMap<String, u32>,
    ) -> Result<usize> {
        // Stores expose search, not enumeration; an empty fuzzy query is the
        // agreed spelling of "give me the corpus" for lexicon builds.
        let lines = store
            .search_by_text("", self.max_lines.unwrap_or(usize::MAX), false)
            .await?;

        let mut count = 0;
        for line in &lines {
            for word in self.extract_words(&line.gurmukhi) {
                vocab.insert(word.to_string());
                *frequencies.entry(word.to_string()).or_insert(0) += 1;
            }
            count += 1;
        }
        Ok(count)
    }

    /// Build the lexicon from whichever stores are available. A missing
    /// store contributes nothing; the curated sets always apply.
    pub async fn build(
        &self,
        sggs: Option<&dyn ScriptureStore>,
        dasam: Option<&dyn ScriptureStore>,
    ) -> Result<Lexicon> {
        let mut lexicon = Lexicon {
            build_version: "1.0".to_string(),
            ..Default::default()
        };

        if let Some(store) = sggs {
            match self
                .extract_from_store(store, &mut lexicon.sggs_vocab, &mut lexicon.word_frequencies)
                .await
            {
                Ok(count) => lexicon.sggs_line_count = count,
                Err(e) => tracing::warn!(error = %e, "failed to extract SGGS vocabulary"),
            }
        }

        if let Some(store) = dasam {
            match self
                .extract_from_store(store, &mut lexicon.dasam_vocab, &mut lexicon.word_frequencies)
                .await
            {
                Ok(count) => lexicon.dasam_line_count = count,
                Err(e) => tracing::warn!(error = %e, "failed to extract Dasam vocabulary"),
            }
        }

        tracing::info!(
            sggs_lines = lexicon.sggs_line_count,
            dasam_lines = lexicon.dasam_line_count,
            vocab = lexicon.total_vocab_size(),
            "lexicon built"
        );

        Ok(lexicon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use katha_core::{ScriptureLine, ScriptureSource};

    struct FixtureStore {
        lines: Vec<ScriptureLine>,
    }

    #[async_trait]
    impl ScriptureStore for FixtureStore {
        async fn search_by_text(
            &self,
            _text: &str,
            top_k: usize,
            _fuzzy: bool,
        ) -> katha_core::Result<Vec<ScriptureLine>> {
            Ok(self.lines.iter().take(top_k).cloned().collect())
        }

        async fn line_by_id(&self, line_id: &str) -> katha_core::Result<Option<ScriptureLine>> {
            Ok(self.lines.iter().find(|l| l.line_id == line_id).cloned())
        }

        async fn context(
            &self,
            _line_id: &str,
            _window: usize,
        ) -> katha_core::Result<Vec<ScriptureLine>> {
            Ok(Vec::new())
        }
    }

    fn line(id: &str, gurmukhi: &str) -> ScriptureLine {
        ScriptureLine {
            line_id: id.to_string(),
            source: ScriptureSource::Sggs,
            gurmukhi: gurmukhi.to_string(),
            roman: None,
            ang: Some(1),
            raag: None,
            author: None,
            shabad_id: None,
        }
    }

    #[tokio::test]
    async fn test_build_extracts_words_and_frequencies() {
        let store = FixtureStore {
            lines: vec![
                line("1", "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ"),
                line("2", "ਸਤਿ ਸਤਿ ਨਾਮੁ ॥"),
            ],
        };
        let lexicon = LexiconBuilder::new().build(Some(&store), None).await.unwrap();

        assert_eq!(lexicon.sggs_line_count, 2);
        assert!(lexicon.sggs_vocab.contains("ਕਰਤਾ"));
        assert_eq!(lexicon.frequency("ਸਤਿ"), 3);
        assert_eq!(lexicon.frequency("ਨਾਮੁ"), 2);
        assert_eq!(lexicon.frequency("ਅਣਜਾਣ"), 0);
        assert!(lexicon.contains("ਪੁਰਖੁ", DomainMode::Sggs));
    }

    #[tokio::test]
    async fn test_curated_sets_always_present() {
        let lexicon = Lexicon::default();
        // No corpus loaded at all, curated vocabulary still answers.
        assert!(lexicon.contains("ਨਾਨਕ", DomainMode::Sggs));
        assert!(lexicon.contains("ਵਾਹਿਗੁਰੂ", DomainMode::Dasam));
        assert!(!lexicon.contains("ਅਣਜਾਣਸ਼ਬਦ", DomainMode::Sggs));
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let store = FixtureStore {
            lines: vec![line("1", "ਹਰਿ ਹਰਿ ਨਾਮੁ")],
        };
        let lexicon = LexiconBuilder::new().build(Some(&store), None).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        lexicon.save(&path).unwrap();

        let loaded = Lexicon::load(&path).unwrap();
        assert_eq!(loaded.sggs_vocab, lexicon.sggs_vocab);
        assert_eq!(loaded.frequency("ਹਰਿ"), 2);
    }

    #[test]
    fn test_high_frequency_filter() {
        let mut lexicon = Lexicon::default();
        lexicon.word_frequencies.insert("ਹਰਿ".into(), 50);
        lexicon.word_frequencies.insert("ਦੁਰਲਭ".into(), 2);
        let frequent = lexicon.high_frequency_words(10);
        assert!(frequent.contains("ਹਰਿ"));
        assert!(!frequent.contains("ਦੁਰਲਭ"));
    }
}
