//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::ConfigError;

/// Domain mode selecting which vocabulary and register weights apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DomainMode {
    /// Sri Guru Granth Sahib Ji mode.
    #[default]
    Sggs,
    /// Dasam Granth mode.
    Dasam,
    /// Generic Punjabi fallback.
    Generic,
}

/// Unicode normalization form applied at text ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnicodeForm {
    #[default]
    NFC,
    NFD,
    NFKC,
    NFKD,
}

/// Denoiser strength preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DenoiseStrength {
    Light,
    #[default]
    Medium,
    Aggressive,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub vad: VadSettings,

    #[serde(default)]
    pub fusion: FusionSettings,

    #[serde(default)]
    pub script: ScriptSettings,

    #[serde(default)]
    pub denoise: DenoiseSettings,

    #[serde(default)]
    pub quote: QuoteSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub engines: EngineSettings,
}

/// VAD chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VadSettings {
    /// Detector aggressiveness (0-3, higher drops more non-speech).
    #[serde(default = "default_aggressiveness")]
    pub aggressiveness: u8,

    /// Frame duration in milliseconds (10, 20 or 30).
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u32,

    /// Minimum chunk duration in seconds.
    #[serde(default = "default_min_chunk_s")]
    pub min_chunk_s: f64,

    /// Maximum chunk duration in seconds.
    #[serde(default = "default_max_chunk_s")]
    pub max_chunk_s: f64,

    /// Overlap between neighbouring chunks in seconds.
    #[serde(default = "default_overlap_s")]
    pub overlap_s: f64,
}

fn default_aggressiveness() -> u8 {
    2
}
fn default_frame_ms() -> u32 {
    30
}
fn default_min_chunk_s() -> f64 {
    1.0
}
fn default_max_chunk_s() -> f64 {
    30.0
}
fn default_overlap_s() -> f64 {
    0.5
}

impl Default for VadSettings {
    fn default() -> Self {
        Self {
            aggressiveness: default_aggressiveness(),
            frame_ms: default_frame_ms(),
            min_chunk_s: default_min_chunk_s(),
            max_chunk_s: default_max_chunk_s(),
            overlap_s: default_overlap_s(),
        }
    }
}

impl VadSettings {
    /// Validate constrained fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aggressiveness > 3 {
            return Err(ConfigError::InvalidValue {
                field: "vad.aggressiveness".into(),
                message: format!("must be 0-3, got {}", self.aggressiveness),
            });
        }
        if ![10, 20, 30].contains(&self.frame_ms) {
            return Err(ConfigError::InvalidValue {
                field: "vad.frame_ms".into(),
                message: format!("must be 10, 20 or 30, got {}", self.frame_ms),
            });
        }
        if self.min_chunk_s <= 0.0 || self.max_chunk_s <= self.min_chunk_s {
            return Err(ConfigError::InvalidValue {
                field: "vad.max_chunk_s".into(),
                message: "require 0 < min_chunk_s < max_chunk_s".into(),
            });
        }
        Ok(())
    }
}

/// Multi-engine fusion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionSettings {
    /// Mean pairwise similarity above which engines "agree".
    #[serde(default = "default_agreement_threshold")]
    pub agreement_threshold: f64,

    /// Confidence boost applied when the winner has high agreement.
    #[serde(default = "default_confidence_boost")]
    pub confidence_boost: f64,

    /// Fused confidence below which a re-decode is triggered.
    #[serde(default = "default_redecode_threshold")]
    pub redecode_threshold: f64,

    #[serde(default = "default_max_redecode_attempts")]
    pub max_redecode_attempts: u32,

    /// Per-auxiliary-engine timeout in seconds.
    #[serde(default = "default_asr_timeout_s")]
    pub asr_timeout_s: u64,

    /// Run auxiliary engines concurrently.
    #[serde(default = "default_true")]
    pub parallel_execution: bool,
}

fn default_agreement_threshold() -> f64 {
    0.85
}
fn default_confidence_boost() -> f64 {
    0.1
}
fn default_redecode_threshold() -> f64 {
    0.6
}
fn default_max_redecode_attempts() -> u32 {
    2
}
fn default_asr_timeout_s() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            agreement_threshold: default_agreement_threshold(),
            confidence_boost: default_confidence_boost(),
            redecode_threshold: default_redecode_threshold(),
            max_redecode_attempts: default_max_redecode_attempts(),
            asr_timeout_s: default_asr_timeout_s(),
            parallel_execution: true,
        }
    }
}

/// Script enforcement and domain correction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptSettings {
    #[serde(default)]
    pub domain_mode: DomainMode,

    /// Enforce Gurmukhi-only output.
    #[serde(default = "default_true")]
    pub strict_gurmukhi: bool,

    #[serde(default)]
    pub unicode_form: UnicodeForm,

    #[serde(default = "default_script_purity_threshold")]
    pub script_purity_threshold: f64,

    #[serde(default = "default_latin_ratio_threshold")]
    pub latin_ratio_threshold: f64,

    #[serde(default = "default_oov_ratio_threshold")]
    pub oov_ratio_threshold: f64,

    /// Maximum Levenshtein distance for domain correction.
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: usize,
}

fn default_script_purity_threshold() -> f64 {
    0.95
}
fn default_latin_ratio_threshold() -> f64 {
    0.02
}
fn default_oov_ratio_threshold() -> f64 {
    0.15
}
fn default_max_edit_distance() -> usize {
    2
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            domain_mode: DomainMode::Sggs,
            strict_gurmukhi: true,
            unicode_form: UnicodeForm::NFC,
            script_purity_threshold: default_script_purity_threshold(),
            latin_ratio_threshold: default_latin_ratio_threshold(),
            oov_ratio_threshold: default_oov_ratio_threshold(),
            max_edit_distance: default_max_edit_distance(),
        }
    }
}

/// Denoising configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenoiseSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Noise ratio at or above which denoising auto-activates.
    #[serde(default = "default_auto_threshold")]
    pub auto_threshold: f64,

    #[serde(default)]
    pub strength: DenoiseStrength,
}

fn default_auto_threshold() -> f64 {
    0.4
}

impl Default for DenoiseSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            auto_threshold: default_auto_threshold(),
            strength: DenoiseStrength::Medium,
        }
    }
}

/// Quote matching thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// Confidence at or above which the canonical text replaces the
    /// transcription.
    #[serde(default = "default_replacement_threshold")]
    pub replacement_threshold: f64,

    /// Below this, a found match is discarded entirely.
    #[serde(default = "default_review_threshold")]
    pub review_threshold: f64,

    /// Semantic similarity that short-circuits the fuzzy pipeline.
    #[serde(default = "default_alignment_threshold")]
    pub alignment_threshold: f64,
}

fn default_replacement_threshold() -> f64 {
    0.80
}
fn default_review_threshold() -> f64 {
    0.70
}
fn default_alignment_threshold() -> f64 {
    0.85
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            replacement_threshold: default_replacement_threshold(),
            review_threshold: default_review_threshold(),
            alignment_threshold: default_alignment_threshold(),
        }
    }
}

/// Empty-transcription retry policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_true")]
    pub segment_retry_on_empty: bool,

    #[serde(default = "default_max_segment_retries")]
    pub max_segment_retries: u32,
}

fn default_max_segment_retries() -> u32 {
    2
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            segment_retry_on_empty: true,
            max_segment_retries: default_max_segment_retries(),
        }
    }
}

/// Engine routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Primary engine id.
    #[serde(default = "default_primary_engine")]
    pub primary: String,

    /// Indic auxiliary engine id.
    #[serde(default = "default_indic_engine")]
    pub indic: String,

    /// English auxiliary engine id.
    #[serde(default = "default_english_engine")]
    pub english: String,

    /// Engine used for re-decode passes (larger beam).
    #[serde(default = "default_redecode_engine")]
    pub redecode_engine: String,

    /// Language hint per route. The Indic auxiliary is deliberately hinted
    /// `hi` by default: multilingual models capture Braj/Sant Bhasha better
    /// through the Hindi route. Override per deployment.
    #[serde(default = "default_route_languages")]
    pub route_languages: HashMap<String, String>,
}

fn default_primary_engine() -> String {
    "asr_whisper".to_string()
}
fn default_indic_engine() -> String {
    "asr_indic".to_string()
}
fn default_english_engine() -> String {
    "asr_english".to_string()
}
fn default_redecode_engine() -> String {
    "asr_indic".to_string()
}
fn default_route_languages() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("punjabi_speech".to_string(), "pa".to_string());
    map.insert("english_speech".to_string(), "en".to_string());
    map.insert("scripture_quote_likely".to_string(), "hi".to_string());
    map.insert("mixed".to_string(), "hi".to_string());
    map
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            primary: default_primary_engine(),
            indic: default_indic_engine(),
            english: default_english_engine(),
            redecode_engine: default_redecode_engine(),
            route_languages: default_route_languages(),
        }
    }
}

impl Settings {
    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vad.validate()?;
        for (name, value) in [
            ("fusion.agreement_threshold", self.fusion.agreement_threshold),
            ("quote.replacement_threshold", self.quote.replacement_threshold),
            ("quote.review_threshold", self.quote.review_threshold),
            ("script.script_purity_threshold", self.script.script_purity_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: name.into(),
                    message: format!("must be within [0, 1], got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Load settings with layered sources:
/// 1. Built-in defaults (serde defaults)
/// 2. Optional TOML file
/// 3. Environment variables (`KATHA_` prefix, `__` separator)
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(File::from(path));
    } else {
        builder = builder.add_source(File::with_name("config/katha").required(false));
    }

    builder = builder.add_source(Environment::with_prefix("KATHA").separator("__"));

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;

    tracing::debug!(
        domain_mode = ?settings.script.domain_mode,
        strict = settings.script.strict_gurmukhi,
        "settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.vad.aggressiveness, 2);
        assert_eq!(settings.vad.frame_ms, 30);
        assert!((settings.vad.overlap_s - 0.5).abs() < f64::EPSILON);
        assert!((settings.fusion.agreement_threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(settings.fusion.max_redecode_attempts, 2);
        assert_eq!(settings.fusion.asr_timeout_s, 60);
        assert_eq!(settings.script.domain_mode, DomainMode::Sggs);
        assert!(settings.script.strict_gurmukhi);
        assert_eq!(settings.script.max_edit_distance, 2);
        assert!((settings.quote.replacement_threshold - 0.80).abs() < f64::EPSILON);
        assert!(!settings.denoise.enabled);
        assert!(settings.retry.segment_retry_on_empty);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_route_language_defaults() {
        let settings = Settings::default();
        assert_eq!(
            settings.engines.route_languages.get("scripture_quote_likely"),
            Some(&"hi".to_string())
        );
        assert_eq!(
            settings.engines.route_languages.get("punjabi_speech"),
            Some(&"pa".to_string())
        );
    }

    #[test]
    fn test_invalid_aggressiveness_rejected() {
        let mut settings = Settings::default();
        settings.vad.aggressiveness = 7;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_frame_ms_rejected() {
        let mut settings = Settings::default();
        settings.vad.frame_ms = 25;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[vad]\naggressiveness = 3\n\n[script]\ndomain_mode = \"dasam\"\nstrict_gurmukhi = false\n"
        )
        .unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.vad.aggressiveness, 3);
        assert_eq!(settings.script.domain_mode, DomainMode::Dasam);
        assert!(!settings.script.strict_gurmukhi);
        // Untouched sections keep defaults
        assert!((settings.fusion.redecode_threshold - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = load_settings(Some(Path::new("/nonexistent/katha.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
