//! Integration tests for TaskWise
//!
//! Drive the planner through its public API with a scripted LLM client
//! and a temporary store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tempfile::TempDir;

use planstore::PlanStore;
use taskwise::flows::{ChatSession, GenerationClient};
use taskwise::llm::{
    CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage, ToolCall,
};
use taskwise::planner::{Planner, PlannerError, SAVED_GOALS_KEY, TRACKED_GOALS_KEY};
use taskwise::prompts::PromptLoader;

/// Scripted LLM client: returns canned responses in order and counts calls
struct ScriptedLlm {
    responses: Vec<CompletionResponse>,
    call_count: AtomicUsize,
}

impl ScriptedLlm {
    fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(idx)
            .cloned()
            .ok_or_else(|| LlmError::InvalidResponse("No more scripted responses".to_string()))
    }
}

fn tool_response(tool_name: &str, input: serde_json::Value) -> CompletionResponse {
    CompletionResponse {
        content: None,
        tool_calls: vec![ToolCall {
            id: "toolu_test".to_string(),
            name: tool_name.to_string(),
            input,
        }],
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage::default(),
    }
}

fn text_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        content: Some(text.to_string()),
        tool_calls: vec![],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

fn subtasks_response(tasks: &[&str]) -> CompletionResponse {
    let subtasks: Vec<serde_json::Value> = tasks
        .iter()
        .map(|t| serde_json::json!({"task": t, "estimatedTime": "1 hour"}))
        .collect();
    tool_response("submit_subtasks", serde_json::json!({"subtasks": subtasks}))
}

fn client_with(responses: Vec<CompletionResponse>) -> (Arc<ScriptedLlm>, GenerationClient) {
    let llm = Arc::new(ScriptedLlm::new(responses));
    let client = GenerationClient::new(llm.clone(), PromptLoader::embedded_only());
    (llm, client)
}

fn open_planner(temp: &TempDir) -> Planner {
    let store = PlanStore::open(temp.path()).unwrap();
    Planner::open(store).unwrap()
}

#[tokio::test]
async fn test_generation_extends_subtasks_with_identity() {
    let temp = TempDir::new().unwrap();
    let mut planner = open_planner(&temp);
    let (_, client) = client_with(vec![subtasks_response(&["Choose destination", "Book flights"])]);

    let count = planner.generate(&client, "Plan a trip").await.unwrap();
    assert_eq!(count, 2);

    let mut ids = std::collections::HashSet::new();
    for subtask in planner.subtasks() {
        assert!(!subtask.task.is_empty());
        assert!(!subtask.estimated_time.is_empty());
        assert!(!subtask.done);
        assert!(ids.insert(subtask.id.clone()), "ids must be unique");
    }
}

#[tokio::test]
async fn test_whitespace_goal_never_reaches_the_provider() {
    let temp = TempDir::new().unwrap();
    let mut planner = open_planner(&temp);
    let (llm, client) = client_with(vec![subtasks_response(&["unused"])]);

    let result = planner.generate(&client, "   ").await;
    assert!(matches!(result, Err(PlannerError::EmptyGoal)));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_save_plan_snapshots_and_prepends() {
    let temp = TempDir::new().unwrap();
    let mut planner = open_planner(&temp);
    let (_, client) = client_with(vec![
        subtasks_response(&["Pick a destination", "Book flights"]),
        subtasks_response(&["Outline chapters"]),
    ]);

    planner.generate(&client, "Plan a trip").await.unwrap();
    let live = planner.subtasks().to_vec();
    planner.save_plan().unwrap();

    assert_eq!(planner.saved_plans()[0].main_goal, "Plan a trip");
    assert_eq!(planner.saved_plans()[0].subtasks, live);

    planner.generate(&client, "Write a book").await.unwrap();
    planner.save_plan().unwrap();

    // Newest plan sits at index 0
    assert_eq!(planner.saved_plans().len(), 2);
    assert_eq!(planner.saved_plans()[0].main_goal, "Write a book");
    assert_eq!(planner.saved_plans()[1].main_goal, "Plan a trip");
}

#[tokio::test]
async fn test_delete_removes_from_live_and_all_plans_in_one_update() {
    let temp = TempDir::new().unwrap();
    let mut planner = open_planner(&temp);
    let (_, client) = client_with(vec![subtasks_response(&["Shared subtask", "Another"])]);

    planner.generate(&client, "A goal").await.unwrap();
    planner.save_plan().unwrap();
    planner.save_plan().unwrap();

    let id = planner.subtasks()[0].id.clone();
    let removed = planner.delete_subtask(&id).unwrap();

    // live list + two saved plans
    assert_eq!(removed, 3);
    assert!(planner.subtasks().iter().all(|st| st.id != id));
    for plan in planner.saved_plans() {
        assert!(plan.subtasks.iter().all(|st| st.id != id));
    }

    // The cascade also lands in the persisted state
    let reloaded = open_planner(&temp);
    for plan in reloaded.saved_plans() {
        assert!(plan.subtasks.iter().all(|st| st.id != id));
    }
}

#[tokio::test]
async fn test_deadline_roundtrips_through_persistence() {
    let temp = TempDir::new().unwrap();
    let mut planner = open_planner(&temp);
    let (_, client) = client_with(vec![subtasks_response(&["Book flights"])]);

    planner.generate(&client, "Plan a trip").await.unwrap();
    planner.save_plan().unwrap();

    let id = planner.subtasks()[0].id.clone();
    let deadline: DateTime<Utc> = "2026-09-15T08:30:00Z".parse().unwrap();
    planner.set_deadline(&id, Some(deadline)).unwrap();

    // Reload from disk: the ISO-8601 value survives without truncation
    let reloaded = open_planner(&temp);
    assert_eq!(reloaded.saved_plans()[0].subtasks[0].deadline, Some(deadline));

    // Clearing the deadline clears both copies
    planner.set_deadline(&id, None).unwrap();
    assert!(planner.subtasks()[0].deadline.is_none());
    assert!(planner.saved_plans()[0].subtasks[0].deadline.is_none());

    let reloaded = open_planner(&temp);
    assert!(reloaded.saved_plans()[0].subtasks[0].deadline.is_none());
}

#[test]
fn test_corrupted_saved_plans_key_is_discarded() {
    let temp = TempDir::new().unwrap();
    let key_file = temp.path().join(format!("{}.json", SAVED_GOALS_KEY));
    std::fs::write(&key_file, "not json").unwrap();

    let planner = open_planner(&temp);
    assert!(planner.saved_plans().is_empty());
    assert!(!key_file.exists(), "corrupted key should be removed");
}

#[test]
fn test_tracked_goals_fall_back_to_samples_then_stored_wins() {
    let temp = TempDir::new().unwrap();

    // Absent key: bundled samples
    let planner = open_planner(&temp);
    assert!(!planner.tracked_goals().is_empty());

    // Empty stored list: still samples
    let store = PlanStore::open(temp.path()).unwrap();
    store.save(TRACKED_GOALS_KEY, &Vec::<taskwise::TrackedGoal>::new()).unwrap();
    let planner = open_planner(&temp);
    assert!(!planner.tracked_goals().is_empty());

    // A non-empty stored list wins
    let goals = vec![taskwise::TrackedGoal::new(
        "Stored goal",
        "desc",
        taskwise::GoalKind::Short,
        Utc::now(),
    )];
    store.save(TRACKED_GOALS_KEY, &goals).unwrap();
    let planner = open_planner(&temp);
    assert_eq!(planner.tracked_goals().len(), 1);
    assert_eq!(planner.tracked_goals()[0].title, "Stored goal");
}

#[tokio::test]
async fn test_chat_tool_loop_end_to_end() {
    let responses = vec![
        // The assistant decides to break the goal down
        tool_response("generate_subtasks", serde_json::json!({"goal": "Plan a trip"})),
        // The embedded subtask flow answers
        subtasks_response(&["Book flights", "Reserve hotel"]),
        // The assistant summarizes
        text_response("Here's your plan:\n- Book flights (1 hour)\n- Reserve hotel (1 hour)"),
    ];
    let (llm, client) = client_with(responses);

    let mut session = ChatSession::new(Arc::new(client)).unwrap();
    let reply = session.send("Please break down: plan a trip").await.unwrap();

    assert!(reply.contains("Book flights"));
    assert_eq!(llm.call_count(), 3);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Deleting any subtask id removes every copy of it, however the
        /// live list and saved plans are arranged.
        #[test]
        fn prop_delete_removes_every_copy(
            task_count in 1usize..6,
            saves in 0usize..4,
            delete_pick in 0usize..100,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let temp = TempDir::new().unwrap();
                let mut planner = open_planner(&temp);

                let tasks: Vec<String> = (0..task_count).map(|i| format!("Task {}", i)).collect();
                let task_refs: Vec<&str> = tasks.iter().map(|s| s.as_str()).collect();
                let (_, client) = client_with(vec![subtasks_response(&task_refs)]);

                planner.generate(&client, "A goal").await.unwrap();
                for _ in 0..saves {
                    planner.save_plan().unwrap();
                }

                let delete_idx = delete_pick % task_count;
                let id = planner.subtasks()[delete_idx].id.clone();
                let removed = planner.delete_subtask(&id).unwrap();

                assert_eq!(removed, 1 + saves);
                assert!(planner.subtasks().iter().all(|st| st.id != id));
                for plan in planner.saved_plans() {
                    assert!(plan.subtasks.iter().all(|st| st.id != id));
                }
            });
        }
    }
}
