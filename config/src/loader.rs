//! # Environment Variable Loader
//!
//! Overrides file values with environment variables, following 12-factor
//! app principles.
//!
//! # Naming Convention
//! Variables use the same names as the connection file keys:
//! - `DTP_DOMAIN`, `KPI_DOMAIN`, `LOG_DIR`: replace the file value
//! - `DEV_TOKEN`: token cache path
//! - `DTP_AUTH_URL`: token endpoint

use crate::config::DtpConfigFile;
use std::env;

/// Apply environment overrides to a loaded connection file.
///
/// Blank variables are ignored so an exported-but-empty variable never
/// erases a value from the file.
pub fn apply_env_overrides(config: &mut DtpConfigFile) {
    if let Some(domain) = env_value("DTP_DOMAIN") {
        config.dtp_domain = domain;
    }
    if let Some(domain) = env_value("KPI_DOMAIN") {
        config.kpi_domain = domain;
    }
    if let Some(dir) = env_value("LOG_DIR") {
        config.log_dir = dir;
    }
    if let Some(path) = env_value("DEV_TOKEN") {
        config.dev_token = Some(path);
    }
    if let Some(url) = env_value("DTP_AUTH_URL") {
        config.auth_url = Some(url);
    }
}

/// Load a connection configuration purely from the environment.
pub fn load_from_env() -> DtpConfigFile {
    let mut config = DtpConfigFile::default();
    apply_env_overrides(&mut config);
    config
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        unsafe {
            env::remove_var("DTP_DOMAIN");
            env::remove_var("KPI_DOMAIN");
            env::remove_var("LOG_DIR");
            env::remove_var("DEV_TOKEN");
            env::remove_var("DTP_AUTH_URL");
        }
    }

    #[test]
    #[serial]
    fn test_overrides_replace_file_values() {
        clear();
        unsafe {
            env::set_var("DTP_DOMAIN", "https://override.example.org");
            env::set_var("DEV_TOKEN", "/tmp/token.txt");
        }

        let mut config = DtpConfigFile {
            dtp_domain: "https://file.example.org".to_string(),
            kpi_domain: "https://kpi.example.org".to_string(),
            log_dir: "/var/log/dtp".to_string(),
            dev_token: None,
            auth_url: None
        };
        apply_env_overrides(&mut config);
        clear();

        assert_eq!(config.dtp_domain, "https://override.example.org");
        assert_eq!(config.kpi_domain, "https://kpi.example.org");
        assert_eq!(config.dev_token.as_deref(), Some("/tmp/token.txt"));
    }

    #[test]
    #[serial]
    fn test_blank_variables_ignored() {
        clear();
        unsafe {
            env::set_var("LOG_DIR", "   ");
        }

        let mut config = DtpConfigFile {
            log_dir: "/var/log/dtp".to_string(),
            ..DtpConfigFile::default()
        };
        apply_env_overrides(&mut config);
        clear();

        assert_eq!(config.log_dir, "/var/log/dtp");
    }

    #[test]
    #[serial]
    fn test_load_from_env() {
        clear();
        unsafe {
            env::set_var("DTP_DOMAIN", "https://dtp.example.org");
            env::set_var("KPI_DOMAIN", "https://kpi.example.org");
            env::set_var("LOG_DIR", "/tmp/logs");
            env::set_var("DTP_AUTH_URL", "https://auth.example.org/auth");
        }

        let config = load_from_env();
        clear();

        assert_eq!(config.dtp_domain, "https://dtp.example.org");
        assert_eq!(config.kpi_domain, "https://kpi.example.org");
        assert_eq!(config.log_dir, "/tmp/logs");
        assert_eq!(config.auth_url.as_deref(), Some("https://auth.example.org/auth"));
        assert_eq!(config.dev_token, None);
    }
}
