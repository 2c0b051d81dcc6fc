//! API credential resolution.
//!
//! Precedence: the `OPENAI_API_KEY` env var (profiled, after `.env` loading),
//! then `[general] openai_api_key` in the secrets TOML file. The key is
//! resolved once at startup and is read-only afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::config::profiled_env_opt;
use crate::error::ConfigError;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// An API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Environment(String),
    SecretsFile(PathBuf),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment(var) => write!(f, "env:{var}"),
            Self::SecretsFile(path) => write!(f, "file:{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub key: ApiKey,
    pub source: CredentialSource,
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    general: GeneralSecrets,
}

#[derive(Debug, Default, Deserialize)]
struct GeneralSecrets {
    openai_api_key: Option<String>,
}

/// Resolve the API key from the environment, falling back to the secrets file.
pub fn resolve_api_key(profile: &str, secrets_path: &Path) -> Result<ResolvedCredential, ConfigError> {
    let env_value = profiled_env_opt(profile, API_KEY_ENV);
    resolve_from(env_value, secrets_path)
}

fn resolve_from(env_value: Option<String>, secrets_path: &Path) -> Result<ResolvedCredential, ConfigError> {
    if let Some(key) = env_value.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        debug!("API key resolved from environment");
        return Ok(ResolvedCredential {
            key: ApiKey(key),
            source: CredentialSource::Environment(API_KEY_ENV.to_string()),
        });
    }

    if let Some(key) = read_secrets_file(secrets_path)? {
        debug!(path = %secrets_path.display(), "API key resolved from secrets file");
        return Ok(ResolvedCredential {
            key: ApiKey(key),
            source: CredentialSource::SecretsFile(secrets_path.to_path_buf()),
        });
    }

    Err(ConfigError::CredentialNotFound {
        env_var: API_KEY_ENV.to_string(),
        secrets_path: secrets_path.to_path_buf(),
    })
}

/// A missing file is not an error; a malformed one is.
fn read_secrets_file(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SecretsRead {
        path: path.to_path_buf(),
        source,
    })?;
    let secrets: SecretsFile = toml::from_str(&content).map_err(|e| ConfigError::SecretsParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(secrets
        .general
        .openai_api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn secrets(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn env_value_wins_over_secrets_file() {
        let file = secrets("[general]\nopenai_api_key = \"sk-file\"\n");
        let resolved = resolve_from(Some("sk-env".into()), file.path()).unwrap();
        assert_eq!(resolved.key.expose(), "sk-env");
        assert_eq!(resolved.source, CredentialSource::Environment(API_KEY_ENV.into()));
    }

    #[test]
    fn falls_back_to_secrets_file() {
        let file = secrets("[general]\nopenai_api_key = \"sk-file\"\n");
        let resolved = resolve_from(None, file.path()).unwrap();
        assert_eq!(resolved.key.expose(), "sk-file");
        assert_eq!(
            resolved.source,
            CredentialSource::SecretsFile(file.path().to_path_buf())
        );
    }

    #[test]
    fn blank_env_value_falls_through() {
        let file = secrets("[general]\nopenai_api_key = \"sk-file\"\n");
        let resolved = resolve_from(Some("  ".into()), file.path()).unwrap();
        assert_eq!(resolved.key.expose(), "sk-file");
    }

    #[test]
    fn missing_everywhere_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        let err = resolve_from(None, &path).unwrap_err();
        assert!(matches!(err, ConfigError::CredentialNotFound { .. }));
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn secrets_file_without_key_is_not_found() {
        let file = secrets("[general]\nother = \"x\"\n");
        let err = resolve_from(None, file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::CredentialNotFound { .. }));
    }

    #[test]
    fn malformed_secrets_file_is_parse_error() {
        let file = secrets("[general\nopenai_api_key = ");
        let err = resolve_from(None, file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::SecretsParse { .. }));
    }

    #[test]
    fn debug_output_redacts_key() {
        let key = ApiKey::new("sk-very-secret");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }
}
