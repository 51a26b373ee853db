//! TaskWise - AI-powered daily planner
//!
//! CLI entry point: planning sessions, assistant chat, tracked goals,
//! saved plans, and the deadline calendar.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use planstore::PlanStore;
use taskwise::cli::{Cli, Command, GoalsCommand, PlansCommand};
use taskwise::config::Config;
use taskwise::flows::{ChatSession, GenerationClient};
use taskwise::llm::create_client;
use taskwise::planner::Planner;
use taskwise::prompts::PromptLoader;
use taskwise::repl::{ChatRepl, PlanSession};
use taskwise::views;

fn setup_logging(cli_log_level: Option<&str>, config: &Config) -> Result<()> {
    let log_dir = config.storage.log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("taskwise.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), &config).context("Failed to setup logging")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan { goal } => cmd_plan(&config, goal).await,
        Command::Chat { message } => cmd_chat(&config, message).await,
        Command::Suggest => cmd_suggest(&config).await,
        Command::Steps { title } => cmd_steps(&config, &title).await,
        Command::Goals { command } => cmd_goals(&config, command),
        Command::Plans { command } => cmd_plans(&config, command),
        Command::Calendar => cmd_calendar(&config),
    }
}

/// Open the persistent planner state
fn open_planner(config: &Config) -> Result<Planner> {
    let store = PlanStore::open(config.storage.store_dir())?;
    Ok(Planner::open(store)?)
}

/// Build the generation client (requires a configured API key)
fn generation_client(config: &Config) -> Result<Arc<GenerationClient>> {
    config.validate()?;
    let llm = create_client(&config.llm)?;
    Ok(Arc::new(GenerationClient::new(llm, PromptLoader::new())))
}

/// Resolve an id argument that may be a unique prefix
fn resolve_id<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str) -> Result<String> {
    let matches: Vec<&str> = ids.filter(|id| id.starts_with(prefix)).collect();
    match matches.len() {
        0 => Err(eyre::eyre!("No match for id: {}", prefix)),
        1 => Ok(matches[0].to_string()),
        n => Err(eyre::eyre!("Ambiguous id '{}' ({} matches)", prefix, n)),
    }
}

async fn cmd_plan(config: &Config, goal: Option<String>) -> Result<()> {
    let client = generation_client(config)?;
    let planner = open_planner(config)?;

    let mut session = PlanSession::new(planner, client);
    session.run(goal).await
}

async fn cmd_chat(config: &Config, message: Option<String>) -> Result<()> {
    let client = generation_client(config)?;
    let mut session = ChatSession::new(client)?;

    match message {
        Some(message) => {
            if message.trim().is_empty() {
                return Err(eyre::eyre!("Please enter a message."));
            }
            let response = session.send(&message).await?;
            println!("{}", response);
            Ok(())
        }
        None => {
            let mut repl = ChatRepl::new(session);
            repl.run().await
        }
    }
}

async fn cmd_suggest(config: &Config) -> Result<()> {
    let client = generation_client(config)?;

    println!("{}", "Generating suggestions, please wait...".dimmed());
    let suggestions = client.suggest_goals().await?;

    if suggestions.is_empty() {
        println!("{}", "No suggestions this time. Try again.".yellow());
        return Ok(());
    }

    println!("{}", "Some goals to get you started:".bold());
    print!("{}", views::render_suggestions(&suggestions));
    Ok(())
}

async fn cmd_steps(config: &Config, title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(eyre::eyre!("Please enter a task title."));
    }

    let client = generation_client(config)?;

    println!("{}", "Generating steps, please wait...".dimmed());
    let steps = client.generate_steps(title).await?;
    print!("{}", views::render_steps(title, &steps));
    Ok(())
}

fn cmd_goals(config: &Config, command: GoalsCommand) -> Result<()> {
    let mut planner = open_planner(config)?;

    match command {
        GoalsCommand::List => {
            print!("{}", views::render_focus(planner.daily_focus()));
            println!();
            print!("{}", views::render_goals(planner.tracked_goals()));
        }
        GoalsCommand::Add {
            title,
            description,
            kind,
            date,
        } => {
            let goal = planner.add_goal(&title, &description, kind, date)?;
            println!("{} New goal added: \"{}\"", "✓".green(), goal.title);
        }
        GoalsCommand::Done { id } => {
            let id = resolve_id(planner.tracked_goals().iter().map(|g| g.id.as_str()), &id)?;
            let completed = planner.toggle_goal(&id)?;
            if completed {
                println!("{} Goal marked as completed.", "✓".green());
            } else {
                println!("{} Goal marked as not completed.", "·".normal());
            }
        }
    }
    Ok(())
}

fn cmd_plans(config: &Config, command: PlansCommand) -> Result<()> {
    let mut planner = open_planner(config)?;

    match command {
        PlansCommand::List => {
            print!("{}", views::render_plans(planner.saved_plans()));
        }
        PlansCommand::Show { id } => {
            let id = resolve_id(planner.saved_plans().iter().map(|p| p.id.as_str()), &id)?;
            let plan = planner
                .saved_plans()
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| eyre::eyre!("Plan not found."))?;
            print!("{}", views::render_plan(plan));
        }
        PlansCommand::Check { plan_id, subtask_id } => {
            let plan_id = resolve_id(planner.saved_plans().iter().map(|p| p.id.as_str()), &plan_id)?;
            let subtask_id = {
                let plan = planner
                    .saved_plans()
                    .iter()
                    .find(|p| p.id == plan_id)
                    .ok_or_else(|| eyre::eyre!("Plan not found."))?;
                resolve_id(plan.subtasks.iter().map(|st| st.id.as_str()), &subtask_id)?
            };
            let done = planner.toggle_in_plan(&plan_id, &subtask_id)?;
            if done {
                println!("{} Subtask marked as done.", "✓".green());
            } else {
                println!("{} Subtask marked as not done.", "·".normal());
            }
        }
        PlansCommand::Delete { id } => {
            let id = resolve_id(planner.saved_plans().iter().map(|p| p.id.as_str()), &id)?;
            planner.delete_plan(&id)?;
            println!("{} The saved plan has been removed.", "✓".green());
        }
    }
    Ok(())
}

fn cmd_calendar(config: &Config) -> Result<()> {
    let planner = open_planner(config)?;
    print!("{}", views::render_calendar(&planner.calendar_entries()));
    Ok(())
}
