use config::{CredentialProvider, Credentials, EnvCredentials};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};
use errors::AuthError;

/// Asks for the user name and password on the terminal.
pub struct PromptCredentials {
    theme: ColorfulTheme
}

impl PromptCredentials {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default()
        }
    }
}

impl CredentialProvider for PromptCredentials {
    fn provide_credentials(&self) -> Result<Credentials, AuthError> {
        let prompt_failed = |e: dialoguer::Error| AuthError::Credentials {
            reason: e.to_string()
        };

        let user: String = Input::with_theme(&self.theme)
            .with_prompt("DTP user")
            .interact_text()
            .map_err(prompt_failed)?;
        let password = Password::with_theme(&self.theme)
            .with_prompt("DTP password")
            .interact()
            .map_err(prompt_failed)?;

        Ok(Credentials::new(user, password))
    }
}

/// Environment credentials when both variables are set, otherwise a prompt.
pub fn provider() -> Box<dyn CredentialProvider> {
    if EnvCredentials::available() {
        Box::new(EnvCredentials)
    } else {
        Box::new(PromptCredentials::new())
    }
}
