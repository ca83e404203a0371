use colored::Colorize;
use config::SettingsError;
use errors::{AuthError, ConfigError, MappingError, RequestError};
use std::path::Path;

#[derive(Debug)]
pub struct UxError {
    pub what: String,
    pub why: Option<String>,
    pub how_to_fix: Vec<String>,
    pub suggested_command: Option<String>
}

impl UxError {
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            why: None,
            how_to_fix: Vec::new(),
            suggested_command: None
        }
    }

    pub fn why(mut self, reason: impl Into<String>) -> Self {
        self.why = Some(reason.into());
        self
    }

    pub fn fix(mut self, suggestion: impl Into<String>) -> Self {
        self.how_to_fix.push(suggestion.into());
        self
    }

    pub fn suggest(mut self, cmd: impl Into<String>) -> Self {
        self.suggested_command = Some(cmd.into());
        self
    }

    pub fn display(&self) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), self.what.white().bold());

        if let Some(why) = &self.why {
            eprintln!("       {}", why.dimmed());
        }

        if !self.how_to_fix.is_empty() {
            eprintln!();
            eprintln!("{}", "How to fix:".yellow().bold());
            for (i, fix) in self.how_to_fix.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, fix);
            }
        }

        if let Some(cmd) = &self.suggested_command {
            eprintln!();
            eprintln!("{}", "Try this:".green().bold());
            eprintln!("  $ {}", cmd.cyan());
        }
        eprintln!();
    }
}

impl std::fmt::Display for UxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.what)
    }
}

impl std::error::Error for UxError {}

/// Fatal: settings could not be loaded, nothing was queried.
pub fn settings_error(err: &SettingsError, config: &Path, mappings: &Path) -> UxError {
    let base = UxError::new(format!("Configuration error: {err}"));
    match err {
        SettingsError::Config(ConfigError::FileNotFound { path }) => base
            .why(format!("{path} does not exist"))
            .fix("Create the file or point to it explicitly")
            .suggest(format!(
                "dtp --config {} --mappings {} token",
                config.display(),
                mappings.display()
            )),
        SettingsError::Config(
            ConfigError::InvalidUrl { field, .. }
            | ConfigError::InvalidField { field, .. }
            | ConfigError::MissingField { field }
        ) => base
            .why(format!("{field} must be set to a valid value"))
            .fix(format!("Edit {field} in {}", config.display()))
            .fix(format!("Or override it with the {field} environment variable")),
        SettingsError::Config(ConfigError::LogDirectory { .. }) => base
            .why("LOG_DIR must be a writable directory")
            .fix(format!("Point LOG_DIR in {} at a writable path", config.display())),
        SettingsError::Config(_) => base
            .why("The connection or mapping file could not be read")
            .fix(format!("Check {}", config.display()))
            .fix(format!("Check {}", mappings.display())),
        SettingsError::Auth(AuthError::Rejected { .. } | AuthError::Credentials { .. }) => base
            .why("A new developer token was needed and the credentials were not accepted")
            .fix("Set DTP_USER and DTP_PASSWORD, or answer the prompt")
            .suggest("dtp token"),
        SettingsError::Auth(_) => base
            .why("The authentication endpoint could not issue a token")
            .fix("Check AUTH_URL and your network connection")
    }
}

/// A lookup key missing from the mapping file.
pub fn unknown_mapping<'a>(err: &MappingError, known: impl Iterator<Item = &'a str>) -> UxError {
    let (section, list) = match err {
        MappingError::UnknownOperation { .. } => ("API_URLS", "dtp api-url"),
        MappingError::UnknownTerm { .. } => ("ONTOLOGY_URIS", "dtp ontology")
    };
    let known: Vec<&str> = known.collect();
    let why = if known.is_empty() {
        format!("{section} is empty")
    } else {
        format!("Known keys: {}", known.join(", "))
    };

    let base = UxError::new(err.to_string())
        .why(why)
        .fix(format!("Add {} to {section} in the mapping file", err.key()));
    match known.first() {
        Some(first) => base.suggest(format!("{list} {first}")),
        None => base
    }
}

pub fn request_failed(err: &RequestError) -> UxError {
    let base = UxError::new(format!("Request failed: {err}"));
    match err.status() {
        Some(401 | 403) => base
            .why("The developer token was refused")
            .fix("Delete the cached token file to force renewal")
            .suggest("dtp token"),
        Some(_) => base
            .why("The platform answered with an error status")
            .fix("Check the node IRI and the count_nodes URL"),
        None => base
            .why("The platform could not be reached or answered with unexpected content")
            .fix("Check DTP_DOMAIN and your network connection")
    }
}
