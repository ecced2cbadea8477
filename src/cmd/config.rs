use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_directory, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;
    let dir = config_directory()?;

    println!("Configuring ticket-desk.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Unset paths default to files in {}.", dir.display());
    println!();

    apply_prompt("Tickets file path", &mut cfg.tickets_path, false)?;
    apply_prompt("Users file path", &mut cfg.users_path, false)?;
    apply_prompt("Account manager username", &mut cfg.account_manager, false)?;
    apply_prompt(
        "Admin alert webhook URL (e.g., https://hooks.example.com/...)",
        &mut cfg.admin_webhook_url,
        true,
    )?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Tickets file: {}", display_value(&cfg.tickets_path));
    println!("Users file: {}", display_value(&cfg.users_path));
    println!("Account manager: {}", display_value(&cfg.account_manager));
    println!("Admin alert webhook: {}", mask_secret(&cfg.admin_webhook_url));

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();

    if trimmed.is_empty() {
        Ok(PromptAction::Keep)
    } else if trimmed == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(trimmed.to_string()))
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

/// Webhook URLs usually embed a token in the path, so only the origin is shown.
fn mask_secret(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(url) if !url.is_empty() => match url.find("://") {
            Some(scheme_end) => {
                let rest = &url[scheme_end + 3..];
                let host_end = rest.find('/').map(|i| scheme_end + 3 + i);
                match host_end {
                    Some(end) if end + 1 < url.len() => format!("{}/***", &url[..end]),
                    _ => url.to_string(),
                }
            }
            None => "***".to_string(),
        },
        _ => "<not set>".to_string(),
    }
}

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
