//! # Configuration Validation
//!
//! Runs the `validator` rules on both DTP files and translates failures into
//! [`ConfigError`] values naming the offending file key.

use crate::config::{DtpConfigFile, UriMappings};
use errors::ConfigError;
use validator::{Validate, ValidationErrors};

const CONFIG_FIELDS: [(&str, &str); 4] = [
    ("dtp_domain", "DTP_DOMAIN"),
    ("kpi_domain", "KPI_DOMAIN"),
    ("log_dir", "LOG_DIR"),
    ("auth_url", "AUTH_URL")
];

/// Validate and normalize the connection and mapping files.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Trims every value, then checks the rules declared on the structures.
/// Nothing here touches the filesystem or the network, so an invalid file
/// always fails before any token request.
///
/// ## Validation Rules
/// - `DTP_DOMAIN`, `KPI_DOMAIN`: present, `http`/`https` with a host
/// - `LOG_DIR`: present, not the template placeholder
/// - `AUTH_URL`: valid URL when present
/// - `ONTOLOGY_URIS`: at least one entry
pub fn validate(
    config: DtpConfigFile,
    mappings: UriMappings
) -> Result<(DtpConfigFile, UriMappings), ConfigError> {
    let config = config.normalized();
    let mappings = mappings.normalized();

    for (value, key) in [
        (&config.dtp_domain, "DTP_DOMAIN"),
        (&config.kpi_domain, "KPI_DOMAIN"),
        (&config.log_dir, "LOG_DIR")
    ] {
        if value.is_empty() {
            return Err(ConfigError::MissingField {
                field: key.to_string()
            });
        }
    }

    config
        .validate()
        .map_err(|errors| config_error(&config, &errors))?;

    mappings.validate().map_err(|_| ConfigError::InvalidField {
        field: "ONTOLOGY_URIS".to_string(),
        reason: "Empty ontology URIs".to_string()
    })?;

    Ok((config, mappings))
}

fn config_error(config: &DtpConfigFile, errors: &ValidationErrors) -> ConfigError {
    let field_errors = errors.field_errors();

    for (field, key) in CONFIG_FIELDS {
        let Some(errs) = field_errors.get(field) else {
            continue;
        };
        let code = errs.first().map(|e| e.code.to_string()).unwrap_or_default();
        return match (field, code.as_str()) {
            (_, "url") => ConfigError::InvalidUrl {
                field: key.to_string(),
                value: field_value(config, field)
            },
            (_, "placeholder_log_dir") => ConfigError::InvalidField {
                field: key.to_string(),
                reason: "Please set LOG_DIR in the DTP config".to_string()
            },
            (_, code) => ConfigError::InvalidField {
                field: key.to_string(),
                reason: code.to_string()
            }
        };
    }

    ConfigError::InvalidField {
        field: "config".to_string(),
        reason: errors.to_string()
    }
}

fn field_value(config: &DtpConfigFile, field: &str) -> String {
    match field {
        "dtp_domain" => config.dtp_domain.clone(),
        "kpi_domain" => config.kpi_domain.clone(),
        "log_dir" => config.log_dir.clone(),
        "auth_url" => config.auth_url.clone().unwrap_or_default(),
        _ => String::new()
    }
}
