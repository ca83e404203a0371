use crate::ux_error;
use anyhow::Result;
use clap::Args;
use config::DtpSettings;

#[derive(Args)]
pub struct OntologyArgs {
    #[arg(help = "Ontology term, e.g. hasTask")]
    pub term: String
}

pub fn run(args: OntologyArgs, settings: &DtpSettings) -> Result<()> {
    let uri = settings
        .ontology_uri(&args.term)
        .map_err(|e| ux_error::unknown_mapping(&e, settings.terms()))?;
    println!("{uri}");
    Ok(())
}
