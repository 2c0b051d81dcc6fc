use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub(crate) fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
pub(crate) fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub documents: DocumentConfig,
    /// TOML file consulted for the API key when the env var is absent.
    pub secrets_file: PathBuf,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `VIDHI_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("VIDHI_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            documents: DocumentConfig::from_env_profiled(p),
            secrets_file: PathBuf::from(profiled_env_or(
                p,
                "VIDHI_SECRETS_FILE",
                ".vidhi/secrets.toml",
            )),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:      {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  llm:         base_url={}, standard={}, advanced={}, timeout={}s",
            self.llm.base_url,
            self.llm.standard_model,
            self.llm.advanced_model,
            self.llm.request_timeout_secs
        );
        tracing::info!(
            "  documents:   max_chars={}, max_upload={} bytes",
            self.documents.max_document_chars,
            self.documents.max_upload_bytes
        );
        tracing::info!("  secrets:     {}", self.secrets_file.display());
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "127.0.0.1"),
            port: profiled_env_u16(p, "PORT", 8501),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
        }
    }
}

// ── LLM (OpenAI-compatible completion service) ────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    /// Widely available tier, used when the caller does not pick one.
    pub standard_model: String,
    /// Higher-capability tier; may need a paid entitlement.
    pub advanced_model: String,
    pub temperature: f32,
    pub summary_max_tokens: u32,
    pub answer_max_tokens: u32,
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            standard_model: "gpt-3.5-turbo".to_string(),
            advanced_model: "gpt-4".to_string(),
            temperature: 0.3,
            summary_max_tokens: 1500,
            answer_max_tokens: 1000,
            request_timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            base_url: profiled_env_or(p, "OPENAI_BASE_URL", &defaults.base_url),
            standard_model: profiled_env_or(p, "OPENAI_STANDARD_MODEL", &defaults.standard_model),
            advanced_model: profiled_env_or(p, "OPENAI_ADVANCED_MODEL", &defaults.advanced_model),
            temperature: profiled_env_opt(p, "LLM_TEMPERATURE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
            summary_max_tokens: profiled_env_u32(p, "LLM_SUMMARY_MAX_TOKENS", defaults.summary_max_tokens),
            answer_max_tokens: profiled_env_u32(p, "LLM_ANSWER_MAX_TOKENS", defaults.answer_max_tokens),
            request_timeout_secs: profiled_env_u64(p, "LLM_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }
}

// ── Documents ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Extracted text beyond this many characters is cut before prompting.
    pub max_document_chars: usize,
    pub max_upload_bytes: usize,
    /// Below this many characters the extraction is flagged as sparse.
    pub sparse_text_threshold: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_document_chars: 12_000,
            max_upload_bytes: 20 * 1024 * 1024,
            sparse_text_threshold: 50,
        }
    }
}

impl DocumentConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            max_document_chars: profiled_env_usize(p, "MAX_DOCUMENT_CHARS", defaults.max_document_chars),
            max_upload_bytes: profiled_env_usize(p, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            sparse_text_threshold: profiled_env_usize(
                p,
                "SPARSE_TEXT_THRESHOLD",
                defaults.sparse_text_threshold,
            ),
        }
    }
}
