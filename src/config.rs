//! Pipeline configuration.
//!
//! Configuration is a plain value handed to each component at construction.
//! [`PipelineConfig::from_lookup`] reads it from any key/value source, which
//! keeps environment access out of the components themselves.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use ticket_lens::config::{AnalysisFallback, PipelineConfig};
//!
//! let vars = HashMap::from([("ANALYSIS_FALLBACK", "fail_fast")]);
//! let config = PipelineConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned()))
//!     .expect("valid configuration");
//! assert_eq!(config.fallback, AnalysisFallback::FailFast);
//! assert!(config.llm.is_none());
//! ```

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Default completion budget for LLM requests.
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 4000;
/// Default timeout for LLM requests.
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);
/// Default timeout for ticket store and peer transport calls.
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(30);
/// Default model name.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4";

/// Settings for the LLM-backed analysis strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    /// Model identifier passed to the client.
    pub model: String,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_LLM_MODEL.to_owned(),
            max_tokens: DEFAULT_LLM_MAX_TOKENS,
            timeout: DEFAULT_LLM_TIMEOUT,
        }
    }
}

/// What the orchestrator does when the analysis engine fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisFallback {
    /// Fail the run.
    FailFast,
    /// Log the failure and run the heuristic analyzer instead.
    #[default]
    Heuristic,
}

/// Whether a synthetic analysis is produced when the peer is unreachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyntheticAnalysis {
    /// The dispatch fails.
    #[default]
    Disabled,
    /// A heuristic analysis is rendered and logged but never posted.
    LogOnly,
    /// A heuristic analysis is rendered and posted, marked as synthetic.
    PostComment,
}

/// Configuration shared by the orchestrator and dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// LLM settings; `None` selects heuristic analysis only.
    pub llm: Option<LlmSettings>,
    /// Policy applied when the analysis engine fails.
    pub fallback: AnalysisFallback,
    /// Whether message-triggered runs fetch ticket details first.
    pub fetch_details: bool,
    /// Timeout for ticket store and peer transport calls.
    pub collaborator_timeout: Duration,
    /// Synthetic analysis mode for the dispatcher.
    pub synthetic: SyntheticAnalysis,
    /// Address the webhook endpoint binds to.
    pub webhook_bind: SocketAddr,
    /// Tracing filter directive.
    pub log_filter: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            llm: None,
            fallback: AnalysisFallback::default(),
            fetch_details: false,
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
            synthetic: SyntheticAnalysis::default(),
            webhook_bind: SocketAddr::from(([127, 0, 0, 1], 8083)),
            log_filter: "info".to_owned(),
        }
    }
}

/// Error raised when a configuration value cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid value {value:?} for {key}: expected {expected}")]
pub struct ConfigError {
    /// Offending key.
    pub key: &'static str,
    /// Raw value.
    pub value: String,
    /// Description of accepted values.
    pub expected: &'static str,
}

impl PipelineConfig {
    /// Creates a configuration with LLM analysis enabled.
    #[must_use]
    pub fn with_llm(settings: LlmSettings) -> Self {
        Self {
            llm: Some(settings),
            ..Self::default()
        }
    }

    /// Reads configuration through a key lookup.
    ///
    /// Recognized keys: `LLM_ENABLED`, `LLM_MODEL`, `LLM_MAX_TOKENS`,
    /// `LLM_TIMEOUT_SECS`, `ANALYSIS_FALLBACK`, `FETCH_TICKET_DETAILS`,
    /// `TICKET_STORE_TIMEOUT_SECS`, `SYNTHETIC_ANALYSIS`, `WEBHOOK_BIND`
    /// and `LOG_FILTER`. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first key whose value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let read = |key: &'static str| lookup(key).map(|raw| (key, raw.trim().to_owned()));

        let llm_enabled = read("LLM_ENABLED").map(parse_bool).transpose()?.unwrap_or(false);
        let llm = if llm_enabled {
            let base = LlmSettings::default();
            Some(LlmSettings {
                model: read("LLM_MODEL")
                    .map(|(_, model)| model)
                    .filter(|model| !model.is_empty())
                    .unwrap_or(base.model),
                max_tokens: read("LLM_MAX_TOKENS")
                    .map(parse_u32)
                    .transpose()?
                    .unwrap_or(base.max_tokens),
                timeout: read("LLM_TIMEOUT_SECS")
                    .map(parse_secs)
                    .transpose()?
                    .unwrap_or(base.timeout),
            })
        } else {
            None
        };

        Ok(Self {
            llm,
            fallback: read("ANALYSIS_FALLBACK")
                .map(parse_fallback)
                .transpose()?
                .unwrap_or(defaults.fallback),
            fetch_details: read("FETCH_TICKET_DETAILS")
                .map(parse_bool)
                .transpose()?
                .unwrap_or(defaults.fetch_details),
            collaborator_timeout: read("TICKET_STORE_TIMEOUT_SECS")
                .map(parse_secs)
                .transpose()?
                .unwrap_or(defaults.collaborator_timeout),
            synthetic: read("SYNTHETIC_ANALYSIS")
                .map(parse_synthetic)
                .transpose()?
                .unwrap_or(defaults.synthetic),
            webhook_bind: read("WEBHOOK_BIND")
                .map(parse_addr)
                .transpose()?
                .unwrap_or(defaults.webhook_bind),
            log_filter: read("LOG_FILTER")
                .map(|(_, filter)| filter)
                .filter(|filter| !filter.is_empty())
                .unwrap_or(defaults.log_filter),
        })
    }

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first key whose value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

fn invalid(key: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError {
        key,
        value,
        expected,
    }
}

fn parse_bool((key, raw): (&'static str, String)) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(key, raw, "a boolean")),
    }
}

fn parse_u32((key, raw): (&'static str, String)) -> Result<u32, ConfigError> {
    raw.parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| invalid(key, raw, "a positive integer"))
}

fn parse_secs(entry: (&'static str, String)) -> Result<Duration, ConfigError> {
    parse_u32(entry).map(|secs| Duration::from_secs(u64::from(secs)))
}

fn parse_fallback((key, raw): (&'static str, String)) -> Result<AnalysisFallback, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "fail_fast" | "fail-fast" => Ok(AnalysisFallback::FailFast),
        "heuristic" => Ok(AnalysisFallback::Heuristic),
        _ => Err(invalid(key, raw, "fail_fast or heuristic")),
    }
}

fn parse_synthetic((key, raw): (&'static str, String)) -> Result<SyntheticAnalysis, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "disabled" | "off" => Ok(SyntheticAnalysis::Disabled),
        "log_only" | "log-only" => Ok(SyntheticAnalysis::LogOnly),
        "post_comment" | "post-comment" => Ok(SyntheticAnalysis::PostComment),
        _ => Err(invalid(key, raw, "disabled, log_only or post_comment")),
    }
}

fn parse_addr((key, raw): (&'static str, String)) -> Result<SocketAddr, ConfigError> {
    raw.parse::<SocketAddr>()
        .map_err(|_| invalid(key, raw, "a socket address such as 127.0.0.1:8083"))
}
