//! # DTP Configuration
//!
//! Connection settings for the Digital Twin Platform client.
//!
//! This crate provides:
//! - Structures for the connection file and the URI mapping file
//! - Configuration file loading (YAML/TOML)
//! - Environment variable overrides
//! - Validation with fail-fast error reporting
//! - Developer token caching and renewal through pluggable credentials
//!
//! # Best Practices
//!
//! - Uses `validator` crate for input validation
//! - Validates everything before touching the network
//! - Secrets never appear in `Debug` output

pub mod config;
pub mod error;
pub mod file_loader;
pub mod loader;
pub mod settings;
pub mod token;
pub mod validation;

pub use config::{DtpConfigFile, LOG_DIR_PLACEHOLDER, UriMappings};
pub use error::{SettingsError, SettingsResult};
pub use file_loader::{load_from_file, load_from_toml, load_from_yaml};
pub use loader::{apply_env_overrides, load_from_env};
pub use settings::{DtpSettings, ID_PLACEHOLDER};
pub use token::{
    CredentialProvider, Credentials, DEFAULT_AUTH_URL, EnvCredentials, StaticCredentials,
    TOKEN_CACHE_FILE, TOKEN_MAX_AGE, TokenAuthenticator, TokenCache
};
pub use ::validator::Validate;
