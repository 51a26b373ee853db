//! CLI command definitions and subcommands

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::GoalKind;

/// TaskWise - AI-powered daily planner
#[derive(Parser)]
#[command(
    name = "tw",
    about = "Turn goals into actionable subtasks, then schedule and track them",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive planning session
    Plan {
        /// Goal to decompose immediately on startup
        goal: Option<String>,
    },

    /// Talk to the TaskWise assistant
    Chat {
        /// Send a single message instead of starting a session
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Suggest five goals to get started
    Suggest,

    /// Break a task into actionable steps
    Steps {
        /// Title of the task to break down
        title: String,
    },

    /// Manage tracked goals
    Goals {
        #[command(subcommand)]
        command: GoalsCommand,
    },

    /// Manage saved plans
    Plans {
        #[command(subcommand)]
        command: PlansCommand,
    },

    /// Show upcoming deadlines grouped by date
    Calendar,
}

/// Tracked-goal subcommands
#[derive(Debug, Subcommand)]
pub enum GoalsCommand {
    /// List tracked goals
    List,

    /// Add a new tracked goal
    Add {
        /// Goal title
        title: String,

        /// Longer description
        #[arg(short = 'D', long, default_value = "")]
        description: String,

        /// Time horizon (short or long)
        #[arg(short = 't', long = "type", value_parser = parse_goal_kind, default_value = "short")]
        kind: GoalKind,

        /// Target date (YYYY-MM-DD or RFC 3339)
        #[arg(short, long, value_parser = parse_date)]
        date: DateTime<Utc>,
    },

    /// Toggle a goal's completion flag
    Done {
        /// Goal id (or unique prefix)
        id: String,
    },
}

/// Saved-plan subcommands
#[derive(Debug, Subcommand)]
pub enum PlansCommand {
    /// List saved plans
    List,

    /// Show one plan with its subtasks
    Show {
        /// Plan id (or unique prefix)
        id: String,
    },

    /// Toggle a subtask's done flag inside one plan
    Check {
        /// Plan id (or unique prefix)
        plan_id: String,

        /// Subtask id (or unique prefix)
        subtask_id: String,
    },

    /// Delete a saved plan
    Delete {
        /// Plan id (or unique prefix)
        id: String,
    },
}

/// Parse a goal kind argument
pub fn parse_goal_kind(s: &str) -> Result<GoalKind, String> {
    match s.to_lowercase().as_str() {
        "short" => Ok(GoalKind::Short),
        "long" => Ok(GoalKind::Long),
        _ => Err(format!("Unknown goal type: {}. Use: short or long", s)),
    }
}

/// Parse a date argument: YYYY-MM-DD (midnight UTC) or a full RFC 3339
/// timestamp
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = s.parse::<DateTime<Utc>>() {
        return Ok(date);
    }

    let naive = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        format!(
            "Invalid date: {}. Use YYYY-MM-DD or an RFC 3339 timestamp like 2026-09-15T08:30:00Z",
            s
        )
    })?;

    naive
        .and_hms_opt(0, 0, 0)
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(|| format!("Invalid date: {}", s))
}
