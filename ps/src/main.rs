use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use planstore::PlanStore;
use planstore::cli::{Cli, Command};
use planstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("planstore starting");

    let store = PlanStore::open(&config.store_path)?;

    match cli.command {
        Command::List => {
            let keys = store.keys()?;
            if keys.is_empty() {
                println!("No keys found");
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
        Command::Show { key } => match store.raw(&key)? {
            Some(content) => println!("{}", content),
            None => println!("{} No document for key: {}", "?".yellow(), key),
        },
        Command::Stats { key } => match store.raw(&key)? {
            Some(content) => {
                let entries = match serde_json::from_str::<serde_json::Value>(&content) {
                    Ok(serde_json::Value::Array(items)) => Some(items.len()),
                    _ => None,
                };
                println!("Key: {}", key.cyan());
                println!("  Bytes: {}", content.len());
                match entries {
                    Some(n) => println!("  Entries: {}", n),
                    None => println!("  Entries: {} (not a JSON array)", "-".dimmed()),
                }
            }
            None => println!("{} No document for key: {}", "?".yellow(), key),
        },
        Command::Delete { key } => {
            store.delete(&key)?;
            println!("{} Deleted key: {}", "✓".green(), key);
        }
    }

    Ok(())
}
