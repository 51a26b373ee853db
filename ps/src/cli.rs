//! CLI argument parsing for planstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "TaskWise plan store maintenance", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all stored keys
    List,

    /// Display a key's document
    Show {
        /// Key to display
        #[arg(required = true)]
        key: String,
    },

    /// Show statistics for a key
    Stats {
        /// Key to inspect
        #[arg(required = true)]
        key: String,
    },

    /// Delete a key and its document
    Delete {
        /// Key to delete
        #[arg(required = true)]
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::parse_from(["ps", "list"]);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn test_cli_parse_show() {
        let cli = Cli::parse_from(["ps", "show", "taskwise_saved_goals"]);
        if let Command::Show { key } = cli.command {
            assert_eq!(key, "taskwise_saved_goals");
        } else {
            panic!("Expected Show command");
        }
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["ps", "-c", "/path/to/config.yml", "list"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }
}
