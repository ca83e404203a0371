pub mod api_url;
pub mod count;
pub mod ontology;
pub mod token;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::DtpSettings;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "dtp",
    author,
    version,
    about = "DTP - Digital Twin Platform query client",
    long_about = "Resolves platform settings, ontology URIs and API URLs, and runs count \
                  queries against the Digital Twin Platform.\n\nCredentials are read from \
                  DTP_USER/DTP_PASSWORD when set, otherwise prompted for when the cached \
                  token must be renewed."
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "DTP_CONFIG",
        default_value = "DTP_config.yaml",
        help = "Connection settings file (YAML or TOML)"
    )]
    pub config: PathBuf,

    #[arg(
        long,
        global = true,
        env = "DTP_MAPPINGS",
        default_value = "uri_mappings.yaml",
        help = "API URL and ontology URI mapping file"
    )]
    pub mappings: PathBuf,

    #[arg(
        long,
        global = true,
        default_value = "dtp",
        help = "Name of the run log written to LOG_DIR"
    )]
    pub log_name: String,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print the developer token, renewing it if stale")]
    Token,

    #[command(about = "Print the URI of an ontology term")]
    Ontology(ontology::OntologyArgs),

    #[command(about = "Print a resolved API URL")]
    ApiUrl(api_url::ApiUrlArgs),

    #[command(subcommand, about = "Count nodes connected to a node")]
    Count(count::CountCommand)
}

pub async fn run(command: Commands, settings: Arc<DtpSettings>) -> Result<()> {
    match command {
        Commands::Token => token::run(&settings),
        Commands::Ontology(args) => ontology::run(args, &settings),
        Commands::ApiUrl(args) => api_url::run(args, &settings),
        Commands::Count(cmd) => count::run(cmd, settings).await
    }
}
