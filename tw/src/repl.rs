//! Interactive REPL sessions
//!
//! Two sessions built on rustyline: the planning session (goal in,
//! subtasks out, slash commands to edit and schedule them) and the
//! assistant chat.

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::cli::parse_date;
use crate::flows::{ChatSession, GenerationClient};
use crate::llm::MessageContent;
use crate::planner::Planner;
use crate::views;

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

/// Interactive planning session
///
/// Plain input decomposes a new goal; slash commands act on the live
/// subtask list by 1-based index. The live list exists only for the
/// session - saved plans and tracked goals persist.
pub struct PlanSession {
    planner: Planner,
    client: Arc<GenerationClient>,
}

impl PlanSession {
    pub fn new(planner: Planner, client: Arc<GenerationClient>) -> Self {
        Self { planner, client }
    }

    /// Run the session main loop
    pub async fn run(&mut self, initial_goal: Option<String>) -> Result<()> {
        self.print_welcome();

        if let Some(goal) = initial_goal {
            println!("{} {}", ">".bright_green(), goal);
            self.handle_goal(&goal).await;
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.handle_goal(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "TaskWise Planning Session".bright_cyan().bold());
        print!("{}", views::render_focus(self.planner.daily_focus()));
        println!(
            "Enter a goal to break it down, {} for commands, {} to quit",
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
    }

    /// Decompose a goal and show the result
    async fn handle_goal(&mut self, goal: &str) {
        println!("{}", "Generating subtasks, please wait...".dimmed());

        match self.planner.generate(&self.client, goal).await {
            Ok(_) => {
                if let Some(warning) = self.planner.last_error() {
                    println!("{} {}", "!".yellow(), warning);
                } else {
                    println!();
                    println!("{} {}", "Subtasks for:".bold(), self.planner.goal_text());
                    print!("{}", views::render_subtasks(self.planner.subtasks()));
                    println!(
                        "{}",
                        "Use /save to keep this plan, /steps N to break a subtask down further.".dimmed()
                    );
                }
            }
            Err(e) => {
                println!("{} {}", "Error:".red(), e);
            }
        }
        println!();
    }

    /// Resolve a 1-based index argument into a live subtask id
    fn subtask_id_at(&self, arg: Option<&&str>) -> Option<String> {
        let idx: usize = arg?.parse().ok()?;
        let subtask = self.planner.subtasks().get(idx.checked_sub(1)?)?;
        Some(subtask.id.clone())
    }

    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
            }
            "/quit" | "/q" | "/exit" => return SlashResult::Quit,
            "/list" | "/ls" => {
                print!("{}", views::render_subtasks(self.planner.subtasks()));
            }
            "/save" => match self.planner.save_plan() {
                Ok(plan) => println!(
                    "{} Plan for \"{}\" has been saved.",
                    "✓".green(),
                    plan.main_goal
                ),
                Err(e) => println!("{} {}", "Cannot save:".red(), e),
            },
            "/done" => match self.subtask_id_at(parts.get(1)) {
                Some(id) => match self.planner.toggle_done(&id) {
                    Ok(true) => println!("{} Marked as done.", "✓".green()),
                    Ok(false) => println!("{} Marked as not done.", "·".normal()),
                    Err(e) => println!("{} {}", "Error:".red(), e),
                },
                None => println!("Usage: /done N"),
            },
            "/rm" | "/delete" => match self.subtask_id_at(parts.get(1)) {
                Some(id) => match self.planner.delete_subtask(&id) {
                    Ok(removed) => println!(
                        "{} Subtask removed from the current plan and {} saved cop{}.",
                        "✓".green(),
                        removed - 1,
                        if removed - 1 == 1 { "y" } else { "ies" }
                    ),
                    Err(e) => println!("{} {}", "Error:".red(), e),
                },
                None => println!("Usage: /rm N"),
            },
            "/edit" => match (self.subtask_id_at(parts.get(1)), parts.len() > 2) {
                (Some(id), true) => {
                    let text = parts[2..].join(" ");
                    match self.planner.edit_subtask(&id, Some(&text), None) {
                        Ok(()) => println!("{} Subtask updated.", "✓".green()),
                        Err(e) => println!("{} {}", "Error:".red(), e),
                    }
                }
                _ => println!("Usage: /edit N NEW TASK TEXT"),
            },
            "/time" => match (self.subtask_id_at(parts.get(1)), parts.len() > 2) {
                (Some(id), true) => {
                    let text = parts[2..].join(" ");
                    match self.planner.edit_subtask(&id, None, Some(&text)) {
                        Ok(()) => println!("{} Estimate updated.", "✓".green()),
                        Err(e) => println!("{} {}", "Error:".red(), e),
                    }
                }
                _ => println!("Usage: /time N NEW ESTIMATE"),
            },
            "/deadline" => match (self.subtask_id_at(parts.get(1)), parts.get(2)) {
                (Some(id), Some(&"clear")) => match self.planner.set_deadline(&id, None) {
                    Ok(()) => println!("{} Deadline cleared.", "✓".green()),
                    Err(e) => println!("{} {}", "Error:".red(), e),
                },
                (Some(id), Some(&date_arg)) => match parse_date(date_arg) {
                    Ok(date) => match self.planner.set_deadline(&id, Some(date)) {
                        Ok(()) => println!("{} Deadline set.", "✓".green()),
                        Err(e) => println!("{} {}", "Error:".red(), e),
                    },
                    Err(e) => println!("{} {}", "Error:".red(), e),
                },
                _ => println!("Usage: /deadline N YYYY-MM-DD | /deadline N clear"),
            },
            "/steps" => match self.subtask_id_at(parts.get(1)) {
                Some(id) => self.handle_steps(&id).await,
                None => println!("Usage: /steps N"),
            },
            "/suggest" => match self.client.suggest_goals().await {
                Ok(suggestions) => {
                    println!("{}", "Some goals to get you started:".bold());
                    print!("{}", views::render_suggestions(&suggestions));
                }
                Err(e) => println!("{} {}", "Error:".red(), e),
            },
            "/plans" => {
                print!("{}", views::render_plans(self.planner.saved_plans()));
            }
            "/focus" => {
                print!("{}", views::render_focus(self.planner.daily_focus()));
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }

        SlashResult::Continue
    }

    /// Break one live subtask into steps
    ///
    /// Re-invokes the flow fresh each time; nothing is cached across
    /// subtasks.
    async fn handle_steps(&mut self, id: &str) {
        let Some(subtask) = self.planner.subtasks().iter().find(|st| st.id == id) else {
            println!("{} {}", "Error:".red(), "Subtask not found.");
            return;
        };
        let title = subtask.task.clone();

        println!("{}", "Generating steps, please wait...".dimmed());
        match self.client.generate_steps(&title).await {
            Ok(steps) => print!("{}", views::render_steps(&title, &steps)),
            Err(e) => println!("{} Failed to generate steps. {}", "Error:".red(), e),
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:24} Show this help", "/help".yellow());
        println!("  {:24} Exit the session", "/quit".yellow());
        println!("  {:24} Show the current subtasks", "/list".yellow());
        println!("  {:24} Save the current plan", "/save".yellow());
        println!("  {:24} Toggle subtask N done", "/done N".yellow());
        println!("  {:24} Delete subtask N everywhere", "/rm N".yellow());
        println!("  {:24} Rewrite subtask N", "/edit N TEXT".yellow());
        println!("  {:24} Change subtask N's estimate", "/time N TEXT".yellow());
        println!("  {:24} Set or clear a deadline", "/deadline N DATE|clear".yellow());
        println!("  {:24} Break subtask N into steps", "/steps N".yellow());
        println!("  {:24} Suggest five goals", "/suggest".yellow());
        println!("  {:24} List saved plans", "/plans".yellow());
        println!("  {:24} Show today's focus", "/focus".yellow());
        println!();
        println!("Anything else is treated as a new goal to break down.");
        println!();
    }
}

/// Interactive assistant chat
pub struct ChatRepl {
    session: ChatSession,
}

impl ChatRepl {
    pub fn new(session: ChatSession) -> Self {
        Self { session }
    }

    /// Run the chat main loop
    pub async fn run(&mut self) -> Result<()> {
        println!();
        println!("{}", "TaskWise Assistant".bright_cyan().bold());
        println!(
            "Ask anything, {} for commands, {} to quit",
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        match self.session.send(input).await {
                            Ok(response) => println!("{}\n", response),
                            Err(e) => println!("{} {}\n", "Error:".red(), e),
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                println!();
                println!("{}", "Available Commands:".bright_cyan());
                println!("  {:14} Show this help", "/help".yellow());
                println!("  {:14} Exit the chat", "/quit".yellow());
                println!("  {:14} Clear conversation history", "/clear".yellow());
                println!("  {:14} Show conversation history", "/history".yellow());
                println!();
            }
            "/quit" | "/q" | "/exit" => return SlashResult::Quit,
            "/clear" | "/c" => {
                self.session.clear();
                println!("{}", "Conversation cleared.".dimmed());
            }
            "/history" => {
                self.print_history();
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }

        SlashResult::Continue
    }

    fn print_history(&self) {
        if self.session.history().is_empty() {
            println!("{}", "No conversation history.".dimmed());
            return;
        }

        println!();
        println!("{}", "Conversation History:".bright_cyan());
        for (i, msg) in self.session.history().iter().enumerate() {
            let role = match msg.role {
                crate::llm::Role::User => "User".bright_green(),
                crate::llm::Role::Assistant => "Assistant".bright_blue(),
            };
            let content_preview = match &msg.content {
                MessageContent::Text(text) => {
                    let preview: String = text.chars().take(50).collect();
                    if text.chars().count() > 50 {
                        format!("{}...", preview)
                    } else {
                        preview
                    }
                }
                MessageContent::Blocks(blocks) => format!("[{} blocks]", blocks.len()),
            };
            println!("  {}. {}: {}", i + 1, role, content_preview);
        }
        println!();
    }
}
