use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "OpenAI API key not found: set {env_var} or add `openai_api_key` under [general] in {}",
        secrets_path.display()
    )]
    CredentialNotFound {
        env_var: String,
        secrets_path: PathBuf,
    },

    #[error("failed to read secrets file {}: {source}", path.display())]
    SecretsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse secrets file {}: {message}", path.display())]
    SecretsParse { path: PathBuf, message: String },
}
