//! Planner - the application state store
//!
//! Owns the single source of truth for a planning session: current goal
//! text, the live subtask list, saved plans, and tracked goals. All
//! mutations go through here. Saved plans and tracked goals are written
//! through to the store on every mutation; the live list exists only for
//! the session.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{info, warn};

use planstore::PlanStore;

use super::PlannerError;
use crate::domain::{ExtendedSubtask, GoalKind, SavedGoal, TrackedGoal, sample_tracked_goals};
use crate::flows::GenerationClient;

/// Storage key for saved plans
pub const SAVED_GOALS_KEY: &str = "taskwise_saved_goals";

/// Storage key for tracked goals
pub const TRACKED_GOALS_KEY: &str = "taskwise_tracked_goals";

/// A dated entry for the calendar view
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub date: DateTime<Utc>,
    pub task: String,
    pub done: bool,
}

/// The application state store
pub struct Planner {
    store: PlanStore,
    goal_text: String,
    subtasks: Vec<ExtendedSubtask>,
    saved: Vec<SavedGoal>,
    tracked: Vec<TrackedGoal>,
    last_error: Option<String>,
}

impl Planner {
    /// Load planner state from the store
    ///
    /// Runs once per session. Saved plans default to empty; tracked goals
    /// fall back to the bundled samples when the stored list is absent or
    /// empty. A corrupted document was already discarded by the store, so
    /// it lands on the same default path.
    pub fn open(store: PlanStore) -> Result<Self, PlannerError> {
        let saved: Vec<SavedGoal> = store.load(SAVED_GOALS_KEY)?.unwrap_or_default();

        let tracked = match store.load::<Vec<TrackedGoal>>(TRACKED_GOALS_KEY)? {
            Some(goals) if !goals.is_empty() => goals,
            _ => sample_tracked_goals(),
        };

        info!(
            saved_count = saved.len(),
            tracked_count = tracked.len(),
            "Planner state loaded"
        );

        Ok(Self {
            store,
            goal_text: String::new(),
            subtasks: Vec::new(),
            saved,
            tracked,
            last_error: None,
        })
    }

    // === Accessors ===

    pub fn goal_text(&self) -> &str {
        &self.goal_text
    }

    pub fn subtasks(&self) -> &[ExtendedSubtask] {
        &self.subtasks
    }

    pub fn saved_plans(&self) -> &[SavedGoal] {
        &self.saved
    }

    pub fn tracked_goals(&self) -> &[TrackedGoal] {
        &self.tracked
    }

    /// Most recent user-visible warning (empty generation, failed call)
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // === Generation ===

    /// Decompose a goal and replace the live subtask list
    ///
    /// A whitespace-only goal is rejected before any provider call. Each
    /// generated record gets a fresh id and `done = false`. An empty
    /// result is not an error: the list is replaced and a warning is
    /// recorded. A failed call clears the list, records the warning, and
    /// propagates.
    pub async fn generate(&mut self, client: &GenerationClient, goal: &str) -> Result<usize, PlannerError> {
        if goal.trim().is_empty() {
            return Err(PlannerError::EmptyGoal);
        }

        self.goal_text = goal.to_string();

        match client.generate_subtasks(goal).await {
            Ok(subtasks) => {
                self.subtasks = subtasks.into_iter().map(ExtendedSubtask::from_generated).collect();
                if self.subtasks.is_empty() {
                    self.last_error = Some(format!(
                        "No subtasks were generated for \"{}\". Try rephrasing your goal.",
                        truncate(goal, 50)
                    ));
                } else {
                    self.last_error = None;
                }
                Ok(self.subtasks.len())
            }
            Err(e) => {
                warn!(error = %e, "Subtask generation failed");
                self.subtasks.clear();
                self.last_error =
                    Some("Failed to generate subtasks. Please check your connection or try a different goal.".to_string());
                Err(e.into())
            }
        }
    }

    // === Saving ===

    /// Snapshot the current goal and subtasks as a new saved plan
    ///
    /// The new plan is prepended (index 0). Requires a non-empty goal and
    /// at least one subtask.
    pub fn save_plan(&mut self) -> Result<&SavedGoal, PlannerError> {
        if self.goal_text.is_empty() || self.subtasks.is_empty() {
            return Err(PlannerError::NothingToSave);
        }

        let plan = SavedGoal::new(self.goal_text.clone(), self.subtasks.clone());
        info!(plan_id = %plan.id, subtask_count = plan.subtasks.len(), "Saving plan");
        self.saved.insert(0, plan);
        self.persist_saved()?;
        Ok(&self.saved[0])
    }

    // === Subtask operations (live list + cascading into saved plans) ===

    fn live_contains(&self, id: &str) -> bool {
        self.subtasks.iter().any(|st| st.id == id)
    }

    /// Apply one transformation to every subtask matching the id, across
    /// the live list and all saved plans. Returns how many matched.
    fn apply_to_matches(&mut self, id: &str, f: impl Fn(&mut ExtendedSubtask)) -> usize {
        let mut matched = 0;
        for st in self.subtasks.iter_mut().filter(|st| st.id == id) {
            f(st);
            matched += 1;
        }
        for plan in &mut self.saved {
            for st in plan.subtasks.iter_mut().filter(|st| st.id == id) {
                f(st);
                matched += 1;
            }
        }
        matched
    }

    /// Flip a subtask's done flag everywhere it appears
    ///
    /// Returns the live subtask's new done value.
    pub fn toggle_done(&mut self, id: &str) -> Result<bool, PlannerError> {
        if !self.live_contains(id) {
            return Err(PlannerError::SubtaskNotFound);
        }
        self.apply_to_matches(id, |st| st.done = !st.done);
        self.persist_saved()?;
        let done = self
            .subtasks
            .iter()
            .find(|st| st.id == id)
            .map(|st| st.done)
            .unwrap_or(false);
        Ok(done)
    }

    /// Set or clear a subtask's deadline everywhere it appears
    pub fn set_deadline(&mut self, id: &str, deadline: Option<DateTime<Utc>>) -> Result<(), PlannerError> {
        if !self.live_contains(id) {
            return Err(PlannerError::SubtaskNotFound);
        }
        self.apply_to_matches(id, |st| st.deadline = deadline);
        self.persist_saved()
    }

    /// Update a subtask's text fields everywhere it appears
    ///
    /// `None` fields are left untouched.
    pub fn edit_subtask(
        &mut self,
        id: &str,
        task: Option<&str>,
        estimated_time: Option<&str>,
    ) -> Result<(), PlannerError> {
        if !self.live_contains(id) {
            return Err(PlannerError::SubtaskNotFound);
        }
        self.apply_to_matches(id, |st| {
            if let Some(task) = task {
                st.task = task.to_string();
            }
            if let Some(estimated_time) = estimated_time {
                st.estimated_time = estimated_time.to_string();
            }
        });
        self.persist_saved()
    }

    /// Delete a subtask everywhere it appears, in one state update
    ///
    /// Removes the id from the live list and from every saved plan
    /// containing it. Errors only when the id matches nowhere. Returns
    /// how many copies were removed.
    pub fn delete_subtask(&mut self, id: &str) -> Result<usize, PlannerError> {
        let before_live = self.subtasks.len();
        self.subtasks.retain(|st| st.id != id);
        let mut removed = before_live - self.subtasks.len();

        for plan in &mut self.saved {
            let before = plan.subtasks.len();
            plan.subtasks.retain(|st| st.id != id);
            removed += before - plan.subtasks.len();
        }

        if removed == 0 {
            return Err(PlannerError::SubtaskNotFound);
        }

        self.persist_saved()?;
        Ok(removed)
    }

    // === Saved plan operations ===

    /// Flip a subtask's done flag inside one saved plan only
    ///
    /// This is the scoped edit used from the saved-plans view; it does
    /// not touch the live list or other plans.
    pub fn toggle_in_plan(&mut self, plan_id: &str, subtask_id: &str) -> Result<bool, PlannerError> {
        let plan = self
            .saved
            .iter_mut()
            .find(|p| p.id == plan_id)
            .ok_or(PlannerError::PlanNotFound)?;
        let subtask = plan
            .subtasks
            .iter_mut()
            .find(|st| st.id == subtask_id)
            .ok_or(PlannerError::SubtaskNotFound)?;

        subtask.done = !subtask.done;
        let done = subtask.done;
        self.persist_saved()?;
        Ok(done)
    }

    /// Remove a saved plan
    pub fn delete_plan(&mut self, plan_id: &str) -> Result<(), PlannerError> {
        let before = self.saved.len();
        self.saved.retain(|p| p.id != plan_id);
        if self.saved.len() == before {
            return Err(PlannerError::PlanNotFound);
        }
        self.persist_saved()
    }

    // === Tracked goal operations ===

    /// Add a tracked goal, keeping the list sorted by target date
    pub fn add_goal(
        &mut self,
        title: &str,
        description: &str,
        kind: GoalKind,
        target_date: DateTime<Utc>,
    ) -> Result<&TrackedGoal, PlannerError> {
        if title.trim().is_empty() {
            return Err(PlannerError::EmptyTitle);
        }

        let goal = TrackedGoal::new(title, description, kind, target_date);
        let id = goal.id.clone();
        self.tracked.insert(0, goal);
        self.tracked.sort_by_key(|g| g.target_date);
        self.persist_tracked()?;

        self.tracked
            .iter()
            .find(|g| g.id == id)
            .ok_or(PlannerError::GoalNotFound)
    }

    /// Flip a tracked goal's completion flag
    pub fn toggle_goal(&mut self, id: &str) -> Result<bool, PlannerError> {
        let goal = self
            .tracked
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(PlannerError::GoalNotFound)?;
        goal.completed = !goal.completed;
        let completed = goal.completed;
        self.persist_tracked()?;
        Ok(completed)
    }

    /// Pick the goal to highlight for today
    ///
    /// Preference order: an incomplete short-term goal due today, then
    /// any incomplete short-term goal, then any incomplete goal.
    pub fn daily_focus(&self) -> Option<&TrackedGoal> {
        let today = Utc::now().date_naive();

        self.tracked
            .iter()
            .find(|g| !g.completed && g.kind == GoalKind::Short && g.target_date.date_naive() == today)
            .or_else(|| self.tracked.iter().find(|g| !g.completed && g.kind == GoalKind::Short))
            .or_else(|| self.tracked.iter().find(|g| !g.completed))
    }

    // === Calendar ===

    /// Deadline-carrying subtasks from the live list and saved plans,
    /// deduplicated by id, sorted by date
    pub fn calendar_entries(&self) -> Vec<CalendarEntry> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut entries = Vec::new();

        let all = self
            .subtasks
            .iter()
            .chain(self.saved.iter().flat_map(|p| p.subtasks.iter()));

        for subtask in all {
            if let Some(deadline) = subtask.deadline
                && seen.insert(subtask.id.as_str())
            {
                entries.push(CalendarEntry {
                    date: deadline,
                    task: subtask.task.clone(),
                    done: subtask.done,
                });
            }
        }

        entries.sort_by_key(|e| e.date);
        entries
    }

    // === Persistence boundary ===

    fn persist_saved(&mut self) -> Result<(), PlannerError> {
        self.store.save(SAVED_GOALS_KEY, &self.saved)?;
        Ok(())
    }

    fn persist_tracked(&mut self) -> Result<(), PlannerError> {
        self.store.save(TRACKED_GOALS_KEY, &self.tracked)?;
        Ok(())
    }
}

/// Clip a string for user-facing messages
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let clipped: String = s.chars().take(max_chars).collect();
        format!("{}...", clipped)
    }
}
