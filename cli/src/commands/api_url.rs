use crate::ux_error;
use anyhow::Result;
use clap::Args;
use config::DtpSettings;

#[derive(Args)]
pub struct ApiUrlArgs {
    #[arg(help = "Operation name from API_URLS, e.g. count_nodes")]
    pub operation: String,

    #[arg(long, help = "Node identifier substituted for _ID_")]
    pub id: Option<String>
}

pub fn run(args: ApiUrlArgs, settings: &DtpSettings) -> Result<()> {
    let url = settings
        .api_url(&args.operation, args.id.as_deref())
        .map_err(|e| ux_error::unknown_mapping(&e, settings.operations()))?;
    println!("{url}");
    Ok(())
}
