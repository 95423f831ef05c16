use crate::logger;
use crate::GlobalOpts;
use anyhow::{bail, Context};
use clap::Subcommand;
use colored::*;
use ngc_config::{Config, CONFIG_KEYS};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print every configured value
    Show,
    /// Print one value
    Get { key: String },
    /// Set a value (`kwargs.<name>` keys take a TOML literal)
    Set { key: String, value: String },
    /// Print the path of the config file
    Path,
}

pub fn handle_config(action: ConfigAction, opts: &GlobalOpts) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load().context("Failed to load config")?;
            println!("{}", "Configuration:".bold().green());
            if config.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in config.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
        }
        ConfigAction::Get { key } => {
            let config = Config::load().context("Failed to load config")?;
            match config.get(&key) {
                Some(value) => println!("{}", value),
                None => bail!("'{}' is not set", key),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load().context("Failed to load config")?;
            config.set(&key, value.clone()).with_context(|| {
                format!(
                    "Cannot set '{}'. Supported keys: {}, kwargs.<name>",
                    key,
                    CONFIG_KEYS.join(", ")
                )
            })?;
            config.save().context("Failed to save config")?;
            logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Path => {
            let config_path = Config::path();
            logger::debug(&format!("Reading config from: {}", config_path.display()));
            println!("{}", config_path.display());
        }
    }
    Ok(())
}
