pub mod config;
pub mod credentials;
pub mod error;
pub mod model;

pub use config::Config;
pub use credentials::{ApiKey, CredentialSource, ResolvedCredential};
pub use error::*;
pub use model::{ModelChoice, ModelOption};
