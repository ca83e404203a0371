//! # Configuration Structures
//!
//! Raw configuration as it appears in the two DTP configuration files:
//! the connection file (`DTP_config.yaml`) and the mapping file
//! (`uri_mappings.yaml`).
//!
//! Both structures:
//! - Use `serde` for deserialization, keyed by the upper-case file keys
//! - Use `validator` for input validation
//! - Are normalized (whitespace trimmed, domains slash-terminated) before
//!   being turned into [`crate::DtpSettings`]

use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Placeholder shipped in the template config; never a usable directory.
pub const LOG_DIR_PLACEHOLDER: &str = "/path/to/log/dir";

/// Connection configuration for the Digital Twin Platform.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Holds the platform domains, the log directory and the optional token
/// cache location exactly as read from the connection file (after
/// environment overrides).
///
/// ## Usage
/// ```rust,no_run
/// use config::DtpConfigFile;
///
/// let config: DtpConfigFile = serde_yaml::from_str(
///     "DTP_DOMAIN: https://dtp.example.org\nKPI_DOMAIN: https://kpi.example.org\nLOG_DIR: /tmp/dtp"
/// ).unwrap();
/// assert_eq!(config.dtp_domain, "https://dtp.example.org");
/// ```
///
/// ## Fields
/// - `dtp_domain`: Base URL of the platform (`DTP_DOMAIN`)
/// - `kpi_domain`: Base URL of the KPI service (`KPI_DOMAIN`)
/// - `log_dir`: Directory receiving log files (`LOG_DIR`)
/// - `dev_token`: Path of the developer token cache (`DEV_TOKEN`, optional)
/// - `auth_url`: Token endpoint override (`AUTH_URL`, optional)
///
/// ## Validation
/// - `dtp_domain`, `kpi_domain`: `http`/`https` URLs with a host
/// - `log_dir`: non-empty and not the template placeholder
/// - `auth_url`: `http`/`https` URL when present
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct DtpConfigFile {
    /// Base URL of the platform
    #[serde(rename = "DTP_DOMAIN", default)]
    #[validate(custom(function = "validate_http_url"))]
    pub dtp_domain: String,

    /// Base URL of the KPI service
    #[serde(rename = "KPI_DOMAIN", default)]
    #[validate(custom(function = "validate_http_url"))]
    pub kpi_domain: String,

    /// Directory receiving log files
    #[serde(rename = "LOG_DIR", default)]
    #[validate(length(min = 1), custom(function = "validate_log_dir"))]
    pub log_dir: String,

    /// Path of the developer token cache
    #[serde(rename = "DEV_TOKEN", default)]
    pub dev_token: Option<String>,

    /// Token endpoint override
    #[serde(rename = "AUTH_URL", default)]
    #[validate(custom(function = "validate_http_url"))]
    pub auth_url: Option<String>
}

impl DtpConfigFile {
    /// Trims surrounding whitespace from every value and drops blank
    /// optional entries.
    pub fn normalized(self) -> Self {
        Self {
            dtp_domain: trim(&self.dtp_domain),
            kpi_domain: trim(&self.kpi_domain),
            log_dir: trim(&self.log_dir),
            dev_token: non_blank(self.dev_token),
            auth_url: non_blank(self.auth_url)
        }
    }
}

/// Operation and ontology mappings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Maps API operation names to URL templates and ontology term names to
/// URIs. URL templates may contain the `_ID_` placeholder.
///
/// ## Fields
/// - `api_urls`: `API_URLS`, may be empty or null
/// - `ontology_uris`: `ONTOLOGY_URIS`, must be non-empty
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct UriMappings {
    /// Operation name to URL template
    #[serde(rename = "API_URLS", default, deserialize_with = "null_as_empty")]
    pub api_urls: BTreeMap<String, String>,

    /// Ontology term to URI
    #[serde(rename = "ONTOLOGY_URIS", default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "validate_non_empty_map"))]
    pub ontology_uris: BTreeMap<String, String>
}

impl UriMappings {
    /// Trims surrounding whitespace from keys and values.
    pub fn normalized(self) -> Self {
        Self {
            api_urls: trim_map(self.api_urls),
            ontology_uris: trim_map(self.ontology_uris)
        }
    }
}

/// Absolute `http`/`https` URL with a host. Scheme-only strings such as
/// `localhost:8080` or `mailto:` addresses parse as URLs but are rejected.
fn validate_http_url(value: &str) -> Result<(), validator::ValidationError> {
    let valid = Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    });
    if valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("url"))
    }
}

fn validate_log_dir(value: &str) -> Result<(), validator::ValidationError> {
    if value == LOG_DIR_PLACEHOLDER {
        return Err(validator::ValidationError::new("placeholder_log_dir"));
    }
    Ok(())
}

fn validate_non_empty_map(
    value: &BTreeMap<String, String>
) -> Result<(), validator::ValidationError> {
    if value.is_empty() {
        return Err(validator::ValidationError::new("empty_mapping"));
    }
    Ok(())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>
{
    Option::<BTreeMap<String, String>>::deserialize(deserializer)
        .map(Option::unwrap_or_default)
}

fn trim(value: &str) -> String {
    value.trim().to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| trim(&v)).filter(|v| !v.is_empty())
}

fn trim_map(map: BTreeMap<String, String>) -> BTreeMap<String, String> {
    map.into_iter().map(|(k, v)| (trim(&k), trim(&v))).collect()
}
