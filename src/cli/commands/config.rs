//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{ResolveError, ResolveResult};
use console::style;
use std::path::PathBuf;

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "cache.cas_dir",
    "cache.output_dir",
    "session.name",
    "session.workspace_root",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> ResolveResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut config = config.clone();
            set_value(&mut config, &key, &value)?;
            manager.save(&config).await?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> ResolveResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> ResolveResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("!").yellow(),
            path.display()
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    println!(
        "{} Configuration initialized at {}",
        style("✓").green(),
        path.display()
    );
    Ok(())
}

/// Apply a dot-separated key to `config`
fn set_value(config: &mut Config, key: &str, value: &str) -> ResolveResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(ResolveError::InvalidConfigValue {
                    key: key.to_string(),
                    reason: "expected text or json".to_string(),
                })
            }
        },
        ["cache", "cas_dir"] => config.cache.cas_dir = PathBuf::from(value),
        ["cache", "output_dir"] => config.cache.output_dir = PathBuf::from(value),
        ["session", "name"] => config.session.name = value.to_string(),
        ["session", "workspace_root"] => {
            config.session.workspace_root = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            }
        }
        _ => {
            return Err(ResolveError::InvalidConfigValue {
                key: key.to_string(),
                reason: format!("unknown key, valid keys: {}", VALID_KEYS.join(", ")),
            })
        }
    }

    Ok(())
}
