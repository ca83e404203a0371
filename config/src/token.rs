//! # Developer Token
//!
//! Resolves the developer token used to authenticate platform requests.
//!
//! A token is cached in a plain-text file. The cache is reused while it is
//! younger than [`TOKEN_MAX_AGE`]; otherwise credentials are obtained from a
//! [`CredentialProvider`] and exchanged for a fresh token at the auth
//! endpoint using HTTP Basic authentication.

use crate::error::SettingsResult;
use errors::{AuthError, ConfigError};
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

pub const DEFAULT_AUTH_URL: &str = "https://api.thinginthefuture.bim2twin.eu/auth";
pub const TOKEN_CACHE_FILE: &str = "thingin_token.txt";
pub const TOKEN_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// User name and password for the auth endpoint. The password is wiped
/// from memory on drop.
pub struct Credentials {
    pub user: String,
    password: Zeroizing<String>
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: Zeroizing::new(password.into())
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of credentials used when the cached token must be renewed.
pub trait CredentialProvider: Send + Sync {
    fn provide_credentials(&self) -> Result<Credentials, AuthError>;
}

/// Fixed credentials, typically from a secrets store.
pub struct StaticCredentials {
    user: String,
    password: Zeroizing<String>
}

impl StaticCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: Zeroizing::new(password.into())
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn provide_credentials(&self) -> Result<Credentials, AuthError> {
        Ok(Credentials::new(self.user.clone(), self.password.as_str()))
    }
}

/// Credentials read from `DTP_USER` and `DTP_PASSWORD`.
#[derive(Debug, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    pub const USER_VAR: &'static str = "DTP_USER";
    pub const PASSWORD_VAR: &'static str = "DTP_PASSWORD";

    /// True when both variables are set.
    pub fn available() -> bool {
        std::env::var(Self::USER_VAR).is_ok() && std::env::var(Self::PASSWORD_VAR).is_ok()
    }
}

impl CredentialProvider for EnvCredentials {
    fn provide_credentials(&self) -> Result<Credentials, AuthError> {
        let user = std::env::var(Self::USER_VAR).map_err(|_| AuthError::Credentials {
            reason: format!("{} is not set", Self::USER_VAR)
        })?;
        let password = std::env::var(Self::PASSWORD_VAR).map_err(|_| AuthError::Credentials {
            reason: format!("{} is not set", Self::PASSWORD_VAR)
        })?;
        Ok(Credentials::new(user, password))
    }
}

/// Plain-text token cache on disk.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default cache location: next to the connection file.
    pub fn beside(config_path: &Path) -> Self {
        let dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(dir.join(TOKEN_CACHE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(SystemTime::now())
    }

    /// A missing file, an unreadable timestamp, or an age beyond
    /// [`TOKEN_MAX_AGE`] all count as stale.
    pub fn is_stale_at(&self, now: SystemTime) -> bool {
        let Ok(modified) = std::fs::metadata(&self.path).and_then(|m| m.modified()) else {
            return true;
        };
        match now.duration_since(modified) {
            Ok(age) => age > TOKEN_MAX_AGE,
            Err(_) => false
        }
    }

    /// Reads the token, concatenating right-trimmed lines.
    pub fn read(&self) -> Result<String, ConfigError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| self.error(e))?;
        Ok(contents.lines().map(str::trim_end).collect())
    }

    pub fn write(&self, token: &str) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        std::fs::write(&self.path, token).map_err(|e| self.error(e))
    }

    fn error(&self, e: std::io::Error) -> ConfigError {
        ConfigError::TokenCache {
            path: self.path.display().to_string(),
            reason: e.to_string()
        }
    }
}

/// Exchanges credentials for a developer token.
pub struct TokenAuthenticator {
    client: Client,
    auth_url: String
}

impl TokenAuthenticator {
    pub fn new(auth_url: impl Into<String>) -> Result<Self, AuthError> {
        let auth_url = auth_url.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AuthError::Transport {
                url: auth_url.clone(),
                reason: e.to_string()
            })?;

        Ok(Self { client, auth_url })
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String, AuthError> {
        info!(url = %self.auth_url, user = %credentials.user, "Authenticating");

        let response = self
            .client
            .get(&self.auth_url)
            .basic_auth(&credentials.user, Some(credentials.password()))
            .send()
            .await
            .map_err(|e| AuthError::Transport {
                url: self.auth_url.clone(),
                reason: e.to_string()
            })?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await.map_err(|e| AuthError::Transport {
                    url: self.auth_url.clone(),
                    reason: e.to_string()
                })?;
                let token = body.trim();
                if token.is_empty() {
                    return Err(AuthError::EmptyToken);
                }
                Ok(token.to_string())
            }
            status => Err(AuthError::Rejected {
                status: status.as_u16()
            })
        }
    }
}

/// Return a usable developer token, renewing the cache when needed.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Reuses the cached token while it is fresh and non-empty. Otherwise asks
/// `credentials` for a user/password pair, authenticates, and writes the new
/// token back to the cache.
///
/// ## Error Handling
/// - `AuthError` when credentials are unavailable or the endpoint refuses
/// - `ConfigError` when the cache cannot be read or written
pub async fn resolve_token(
    cache: &TokenCache,
    authenticator: &TokenAuthenticator,
    credentials: &dyn CredentialProvider
) -> SettingsResult<String> {
    if !cache.is_stale() {
        let token = cache.read()?;
        if !token.is_empty() {
            debug!(path = %cache.path().display(), "Using cached developer token");
            return Ok(token);
        }
        warn!(path = %cache.path().display(), "Developer token file is empty");
    } else {
        debug!(path = %cache.path().display(), "Developer token missing or expired");
    }

    let creds = credentials.provide_credentials()?;
    let token = authenticator.authenticate(&creds).await?;
    cache.write(&token)?;
    Ok(token)
}
