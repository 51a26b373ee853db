//! Tracked goals
//!
//! A coarser-grained goal list, independent of plans and subtasks: no
//! referential integrity connects the two.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time horizon of a tracked goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Short,
    Long,
}

/// A goal tracked on its own, with a target date and completion flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedGoal {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub target_date: DateTime<Utc>,
    pub completed: bool,
}

impl TrackedGoal {
    /// Create a new tracked goal with a fresh id
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        kind: GoalKind,
        target_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            title: title.into(),
            description: description.into(),
            kind,
            target_date,
            completed: false,
        }
    }
}

/// Bundled sample goals, shown when no tracked goals have been stored yet
pub fn sample_tracked_goals() -> Vec<TrackedGoal> {
    let now = Utc::now();
    let end_of_year = Utc
        .with_ymd_and_hms(now.year(), 12, 31, 0, 0, 0)
        .single()
        .unwrap_or(now);

    vec![
        TrackedGoal {
            id: "tg1".to_string(),
            title: "Learn a new framework".to_string(),
            description: "Complete a tutorial and build a small app with it, ensuring all core concepts are understood."
                .to_string(),
            kind: GoalKind::Short,
            target_date: now + Duration::days(7),
            completed: false,
        },
        TrackedGoal {
            id: "tg2".to_string(),
            title: "Finish Q2 Project Proposal".to_string(),
            description:
                "Draft the initial proposal, gather feedback from stakeholders, revise, and submit the final version."
                    .to_string(),
            kind: GoalKind::Short,
            target_date: now + Duration::days(14),
            completed: true,
        },
        TrackedGoal {
            id: "tg3".to_string(),
            title: "Run a Half Marathon".to_string(),
            description: "Follow a 12-week training plan consistently, focusing on endurance and pace.".to_string(),
            kind: GoalKind::Long,
            target_date: now + Duration::days(90),
            completed: false,
        },
        TrackedGoal {
            id: "tg4".to_string(),
            title: "Read 12 Books This Year".to_string(),
            description: "Aim to read at least one book per month, covering a diverse range of genres.".to_string(),
            kind: GoalKind::Long,
            target_date: end_of_year,
            completed: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_goal_defaults() {
        let goal = TrackedGoal::new("Ship v1", "Get the release out", GoalKind::Short, Utc::now());
        assert!(!goal.completed);
        assert!(!goal.id.is_empty());
        assert_eq!(goal.kind, GoalKind::Short);
    }

    #[test]
    fn test_kind_serializes_lowercase_type_field() {
        let goal = TrackedGoal::new("Ship v1", "desc", GoalKind::Long, Utc::now());
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["type"], "long");
        assert!(json.get("targetDate").is_some());
    }

    #[test]
    fn test_sample_goals_shape() {
        let samples = sample_tracked_goals();
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().any(|g| g.completed));
        assert!(samples.iter().any(|g| g.kind == GoalKind::Short && !g.completed));
    }
}
