//! # DTP Settings
//!
//! The validated, ready-to-use view of the DTP configuration: normalized
//! domains, an existing log directory, a live developer token and the
//! operation/ontology lookup tables.

use crate::config::{DtpConfigFile, UriMappings};
use crate::error::SettingsResult;
use crate::file_loader::load_from_file;
use crate::loader::apply_env_overrides;
use crate::token::{
    CredentialProvider, DEFAULT_AUTH_URL, TokenAuthenticator, TokenCache, resolve_token
};
use crate::validation::validate;
use errors::{ConfigError, MappingError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Placeholder replaced by a node identifier in API URL templates.
pub const ID_PLACEHOLDER: &str = "_ID_";

/// Validated DTP connection settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Single source of platform coordinates for the query builders. Built once
/// at startup; construction fails fast on any invalid or missing setting.
///
/// ## Usage
/// ```rust,no_run
/// use config::{DtpSettings, EnvCredentials};
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let settings = DtpSettings::load(
///         Path::new("DTP_config.yaml"),
///         Path::new("uri_mappings.yaml"),
///         &EnvCredentials
///     )
///     .await?;
///     println!("URI: {}", settings.ontology_uri("isAsDesigned")?);
///     Ok(())
/// }
/// ```
///
/// ## Invariants
/// - `domain` and `kpi_domain` end with `/`
/// - `log_dir` exists on disk
/// - `token` is non-empty
#[derive(Clone)]
pub struct DtpSettings {
    domain: String,
    kpi_domain: String,
    log_dir: PathBuf,
    token: String,
    api_urls: BTreeMap<String, String>,
    ontology_uris: BTreeMap<String, String>
}

impl DtpSettings {
    /// Load settings from the connection and mapping files.
    ///
    /// Files are parsed, overridden from the environment and validated
    /// before the log directory is created or any token request is made.
    pub async fn load(
        config_path: &Path,
        mappings_path: &Path,
        credentials: &dyn CredentialProvider
    ) -> SettingsResult<Self> {
        let mut config: DtpConfigFile = load_from_file(config_path)?;
        apply_env_overrides(&mut config);
        let mappings: UriMappings = load_from_file(mappings_path)?;

        let (config, mappings) = validate(config, mappings)?;

        let cache = match &config.dev_token {
            Some(path) => TokenCache::new(path),
            None => TokenCache::beside(config_path)
        };
        let auth_url = config.auth_url.as_deref().unwrap_or(DEFAULT_AUTH_URL);
        let log_dir = ensure_log_dir(&config.log_dir)?;

        let authenticator = TokenAuthenticator::new(auth_url)?;
        let token = resolve_token(&cache, &authenticator, credentials).await?;

        let settings = Self::assemble(config, mappings, log_dir, token);
        info!(
            domain = %settings.domain,
            operations = settings.api_urls.len(),
            terms = settings.ontology_uris.len(),
            "DTP settings loaded"
        );
        Ok(settings)
    }

    /// Build settings from already-parsed files and a known token.
    ///
    /// Performs the same validation as [`DtpSettings::load`] but no token
    /// resolution and no environment overrides.
    pub fn from_parts(
        config: DtpConfigFile,
        mappings: UriMappings,
        token: impl Into<String>
    ) -> SettingsResult<Self> {
        let token = token.into().trim().to_string();
        let (config, mappings) = validate(config, mappings)?;
        if token.is_empty() {
            return Err(ConfigError::MissingField {
                field: "token".to_string()
            }
            .into());
        }
        let log_dir = ensure_log_dir(&config.log_dir)?;
        Ok(Self::assemble(config, mappings, log_dir, token))
    }

    fn assemble(
        config: DtpConfigFile,
        mappings: UriMappings,
        log_dir: PathBuf,
        token: String
    ) -> Self {
        Self {
            domain: with_trailing_slash(config.dtp_domain),
            kpi_domain: with_trailing_slash(config.kpi_domain),
            log_dir,
            token,
            api_urls: mappings.api_urls,
            ontology_uris: mappings.ontology_uris
        }
    }

    /// URL for an API operation; a non-blank `id` replaces every `_ID_`.
    pub fn api_url(&self, operation: &str, id: Option<&str>) -> Result<String, MappingError> {
        let template =
            self.api_urls
                .get(operation)
                .ok_or_else(|| MappingError::UnknownOperation {
                    operation: operation.to_string()
                })?;

        match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Ok(template.replace(ID_PLACEHOLDER, id)),
            None => Ok(template.clone())
        }
    }

    pub fn ontology_uri(&self, term: &str) -> Result<&str, MappingError> {
        self.ontology_uris
            .get(term)
            .map(String::as_str)
            .ok_or_else(|| MappingError::UnknownTerm {
                term: term.to_string()
            })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn kpi_domain(&self) -> &str {
        &self.kpi_domain
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.api_urls.keys().map(String::as_str)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.ontology_uris.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for DtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DtpSettings")
            .field("domain", &self.domain)
            .field("kpi_domain", &self.kpi_domain)
            .field("log_dir", &self.log_dir)
            .field("token", &"<redacted>")
            .field("api_urls", &self.api_urls)
            .field("ontology_uris", &self.ontology_uris)
            .finish()
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

fn ensure_log_dir(dir: &str) -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(dir);
    std::fs::create_dir_all(&path).map_err(|e| ConfigError::LogDirectory {
        path: dir.to_string(),
        reason: e.to_string()
    })?;
    Ok(path)
}
