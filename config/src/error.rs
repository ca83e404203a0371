use errors::{AuthError, ConfigError};
use thiserror::Error;

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Failure while building [`crate::DtpSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError)
}

