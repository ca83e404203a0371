//! # DTP Errors
//!
//! Error taxonomy shared by the Digital Twin Platform client crates.
//!
//! Follows the same conventions across every family:
//! - Uses `thiserror` for structured error definitions
//! - Named fields in every message so call sites stay self-describing
//! - No transport types leak in; HTTP failures are carried as text

use thiserror::Error;

/// Settings could not be loaded or failed validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse {format} config {path}: {reason}")]
    Parse {
        path: String,
        format: String,
        reason: String
    },

    #[error("Unsupported config file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Config file has no extension: {path}")]
    NoExtension { path: String },

    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: String, value: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Missing required setting: {field}")]
    MissingField { field: String },

    #[error("Cannot create log directory {path}: {reason}")]
    LogDirectory { path: String, reason: String },

    #[error("Cannot access token cache {path}: {reason}")]
    TokenCache { path: String, reason: String }
}

/// Developer token acquisition failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication failed with status {status}")]
    Rejected { status: u16 },

    #[error("Authentication request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Authentication endpoint returned an empty token")]
    EmptyToken,

    #[error("Credentials unavailable: {reason}")]
    Credentials { reason: String }
}

/// The platform rejected a request or answered with something unusable.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String
    },

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String }
}

/// A requested operation or ontology term is not configured.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("API URL {operation} not found")]
    UnknownOperation { operation: String },

    #[error("Ontology {term} not found")]
    UnknownTerm { term: String }
}

impl MappingError {
    /// The key that was looked up and missing.
    pub fn key(&self) -> &str {
        match self {
            Self::UnknownOperation { operation } => operation,
            Self::UnknownTerm { term } => term
        }
    }
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        if let Self::Status { status, .. } = self {
            Some(*status)
        } else {
            None
        }
    }
}
