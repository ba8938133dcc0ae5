use anyhow::{Context, Result};
use std::path::Path;

use super::set_token;
use crate::browser::BrowserLauncher;
use crate::config::{load_config, save_config};
use crate::provider::Provider;

/// Prompts user to enter an access token for `provider`
pub fn prompt_for_token(provider: Provider) -> Result<String> {
    let token = rpassword::prompt_password(format!("Enter {} token: ", provider))
        .context("Failed to read token from stdin")?;

    validate_token(&token)
}

fn validate_token(token: &str) -> Result<String> {
    let token = token.trim();

    if token.is_empty() {
        anyhow::bail!("Token cannot be empty");
    }

    Ok(token.to_string())
}

/// Print where to create a token and try to open that page.
fn show_instructions(provider: Provider, launcher: &impl BrowserLauncher) {
    let url = provider.token_settings_url();
    println!("{} access token required.", provider);
    println!("Create one at: {}", url);
    match provider {
        Provider::GitHub => {
            println!("Required scopes: repo (for private repos) or public_repo (for public only)")
        }
        Provider::GitLab => println!("Required scopes: read_api"),
    }
    println!();

    if let Err(e) = launcher.open(url) {
        log::debug!("Could not open token settings page: {}", e);
    }
}

/// Authorize `provider`: ask for a token and store it in the config file.
pub fn run_auth(provider: Provider, config_path: &Path, launcher: &impl BrowserLauncher) -> Result<()> {
    let mut config = load_config(config_path)?;

    show_instructions(provider, launcher);
    let token = prompt_for_token(provider)?;

    set_token(&mut config, provider, token);
    save_config(config_path, &config)?;

    println!("{} token saved to {}", provider, config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token_trims() {
        assert_eq!(validate_token("  ghp_abc \n").unwrap(), "ghp_abc");
    }

    #[test]
    fn test_validate_token_rejects_empty() {
        let err = validate_token("   ").unwrap_err();
        assert_eq!(err.to_string(), "Token cannot be empty");
    }
}
