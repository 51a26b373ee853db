//! Terminal rendering for planner collections
//!
//! Pure presentation: every function takes planner data and returns the
//! string to print. No state lives here.

use colored::*;

use crate::domain::{ExtendedSubtask, GoalKind, SavedGoal, TrackedGoal};
use crate::planner::CalendarEntry;

/// Short display form of an id (enough to disambiguate interactively)
pub fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

/// Render the live subtask list as a numbered checklist
pub fn render_subtasks(subtasks: &[ExtendedSubtask]) -> String {
    if subtasks.is_empty() {
        return format!("{}\n", "No subtasks yet. Enter a goal to generate some.".dimmed());
    }

    let mut out = String::new();
    for (idx, subtask) in subtasks.iter().enumerate() {
        let checkbox = if subtask.done { "[x]".green() } else { "[ ]".normal() };
        let task = if subtask.done {
            subtask.task.dimmed().strikethrough()
        } else {
            subtask.task.normal()
        };
        out.push_str(&format!(
            "  {:>2}. {} {} {}\n",
            idx + 1,
            checkbox,
            task,
            format!("({})", subtask.estimated_time).dimmed()
        ));
        if let Some(deadline) = subtask.deadline {
            out.push_str(&format!(
                "        {} {}\n",
                "due".yellow(),
                deadline.format("%Y-%m-%d %H:%M")
            ));
        }
    }
    out
}

/// Render the saved-plans overview
pub fn render_plans(plans: &[SavedGoal]) -> String {
    if plans.is_empty() {
        return format!(
            "{}\n",
            "No saved plans yet. Generate some subtasks and save the plan to see them here.".dimmed()
        );
    }

    let mut out = String::new();
    for plan in plans {
        let done = plan.subtasks.iter().filter(|st| st.done).count();
        out.push_str(&format!(
            "  {} {} {} {}\n",
            short_id(&plan.id).cyan(),
            plan.main_goal,
            format!("[{}/{}]", done, plan.subtasks.len()).normal(),
            format!("saved {}", plan.saved_at).dimmed()
        ));
    }
    out
}

/// Render one saved plan with its subtasks
pub fn render_plan(plan: &SavedGoal) -> String {
    let mut out = format!(
        "{} {}\n{}\n",
        plan.main_goal.bold(),
        format!("({})", short_id(&plan.id)).cyan(),
        format!("Saved on: {}", plan.saved_at).dimmed()
    );
    for subtask in &plan.subtasks {
        let checkbox = if subtask.done { "[x]".green() } else { "[ ]".normal() };
        out.push_str(&format!(
            "  {} {} {} {}\n",
            short_id(&subtask.id).cyan(),
            checkbox,
            subtask.task,
            format!("({})", subtask.estimated_time).dimmed()
        ));
    }
    out
}

/// Render the tracked-goal list
pub fn render_goals(goals: &[TrackedGoal]) -> String {
    if goals.is_empty() {
        return format!("{}\n", "No tracked goals yet. Add one with: tw goals add".dimmed());
    }

    let mut out = String::new();
    for goal in goals {
        let badge = match goal.kind {
            GoalKind::Short => "short".blue(),
            GoalKind::Long => "long ".magenta(),
        };
        let mark = if goal.completed { "✓".green() } else { "·".normal() };
        out.push_str(&format!(
            "  {} {} {} {} {}\n",
            short_id(&goal.id).cyan(),
            mark,
            badge,
            goal.title,
            format!("target {}", goal.target_date.format("%Y-%m-%d")).dimmed()
        ));
        if !goal.description.is_empty() {
            out.push_str(&format!("      {}\n", goal.description.dimmed()));
        }
    }
    out
}

/// Render calendar entries grouped by day, ascending
pub fn render_calendar(entries: &[CalendarEntry]) -> String {
    if entries.is_empty() {
        return format!("{}\n", "No deadlines set.".dimmed());
    }

    let mut out = String::new();
    let mut current_day = None;

    for entry in entries {
        let day = entry.date.date_naive();
        if current_day != Some(day) {
            out.push_str(&format!("{}\n", day.format("%A, %Y-%m-%d").to_string().bold()));
            current_day = Some(day);
        }
        let mark = if entry.done { "✓".green() } else { "·".normal() };
        out.push_str(&format!("  {} {} {}\n", mark, entry.date.format("%H:%M"), entry.task));
    }
    out
}

/// Render the daily focus banner
pub fn render_focus(goal: Option<&TrackedGoal>) -> String {
    match goal {
        Some(goal) => {
            let title: String = goal.title.chars().take(50).collect();
            let suffix = if goal.title.chars().count() > 50 { "..." } else { "" };
            format!("{} {}{}\n", "Today's Focus:".bold(), title, suffix)
        }
        None => format!("{}\n", "Ready to tackle your goals? Add some tasks!".bold()),
    }
}

/// Render goal suggestions as a numbered list
pub fn render_suggestions(suggestions: &[String]) -> String {
    let mut out = String::new();
    for (idx, suggestion) in suggestions.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", idx + 1, suggestion));
    }
    out
}

/// Render the steps breakdown for one task
pub fn render_steps(title: &str, steps: &[String]) -> String {
    if steps.is_empty() {
        return format!("No further steps found for \"{}\".\n", title);
    }

    let mut out = format!("{}\n", format!("Steps for: {}", title).bold());
    for (idx, step) in steps.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", idx + 1, step));
    }
    out
}
