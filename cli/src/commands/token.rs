use anyhow::Result;
use config::DtpSettings;

pub fn run(settings: &DtpSettings) -> Result<()> {
    println!("{}", settings.token());
    Ok(())
}
