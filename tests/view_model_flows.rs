//! Integration tests for the main view-model over the in-memory services.
//!
//! These tests drive intents end to end:
//! 1. Intent validation happens before any remote call
//! 2. Successful mutations refresh, select and announce
//! 3. Failures surface the right message and clear the busy flag
//! 4. Concurrent intents are serialized

use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;

use serde_json::json;

use fitness_tracker::adapters::{MockEndpoint, MockUsersApi, MockWorkoutsApi};
use fitness_tracker::application::{
    CreateWorkoutPlanCommand, FitnessRepository, MainViewModel, WorkoutSetEntry,
    WorkoutSetUpdateEntry,
};
use fitness_tracker::config::system_timezone;
use fitness_tracker::domain::{Exercise, IdResponse, User, Workout, WorkoutItem, WorkoutPlan, WorkoutSet};
use fitness_tracker::ports::ApiError;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    vm: Arc<MainViewModel>,
    workouts: MockWorkoutsApi,
    users: MockUsersApi,
}

fn harness(workouts: MockWorkoutsApi) -> Harness {
    harness_with(workouts, MockUsersApi::new().with_user(User::new("kun")), 20)
}

fn harness_with(workouts: MockWorkoutsApi, users: MockUsersApi, fetch_limit: u32) -> Harness {
    let repository = FitnessRepository::new(
        "kun",
        Arc::new(workouts.clone()),
        Arc::new(users.clone()),
    )
    .with_workout_fetch_limit(fetch_limit);

    Harness {
        vm: Arc::new(MainViewModel::new(Arc::new(repository))),
        workouts,
        users,
    }
}

fn workout_with_item() -> Workout {
    Workout::new("w-1").with_date("2025-01-01").with_item(
        WorkoutItem::new("item-1")
            .with_exercise("ex-1", "Back Squat")
            .with_order(0)
            .with_set(WorkoutSet::new("set-1", 5).with_weight(100.0)),
    )
}

fn ids(workouts: &[Workout]) -> Vec<&str> {
    workouts.iter().map(|w| w.id.as_str()).collect()
}

// =============================================================================
// Refresh and selection
// =============================================================================

#[tokio::test]
async fn refresh_selects_first_workout() {
    let h = harness(MockWorkoutsApi::new().with_workout(Workout::new("workout-1").with_date("2025-01-01")));

    h.vm.refresh_everything().await;

    let state = h.vm.state();
    assert_eq!(state.selected_workout_id.as_deref(), Some("workout-1"));
    assert_eq!(state.selected_workout.as_ref().map(|w| w.id.as_str()), Some("workout-1"));
    assert!(!state.is_loading);
    assert!(!state.is_action_running);
    assert_eq!(state.user.as_ref().map(|u| u.id.as_str()), Some("kun"));
    assert!(state.error_message.is_none());
}

#[tokio::test]
async fn refresh_keeps_existing_selection() {
    let h = harness(
        MockWorkoutsApi::new()
            .with_workout(Workout::new("w-new").with_date("2025-01-03"))
            .with_workout(Workout::new("w-old").with_date("2025-01-01")),
    );

    h.vm.select_workout("w-old", false).await;
    h.vm.refresh_everything().await;

    let state = h.vm.state();
    assert_eq!(state.selected_workout_id.as_deref(), Some("w-old"));
    assert_eq!(ids(&state.workouts), vec!["w-new", "w-old"]);
}

#[tokio::test]
async fn refresh_without_workouts_selects_nothing() {
    let h = harness(MockWorkoutsApi::new());

    h.vm.refresh_everything().await;

    let state = h.vm.state();
    assert!(state.selected_workout_id.is_none());
    assert_eq!(h.workouts.call_count(MockEndpoint::GetWorkoutDetail), 0);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn refresh_failure_keeps_prior_values_and_reports_first_error() {
    let h = harness(
        MockWorkoutsApi::new()
            .with_plan(WorkoutPlan::new("plan-a").with_name("Push Day"))
            .with_exercise(Exercise::new("ex-1", "Bench Press"))
            .with_failure_on_call(
                MockEndpoint::GetWorkoutPlans,
                2,
                ApiError::status(500, "Plans unavailable"),
            )
            .with_failure_on_call(
                MockEndpoint::GetExercises,
                2,
                ApiError::status(500, "Exercises unavailable"),
            ),
    );

    h.vm.refresh_everything().await;
    assert!(h.vm.state().error_message.is_none());

    h.vm.refresh_everything().await;

    let state = h.vm.state();
    assert_eq!(state.workout_plans.len(), 1);
    assert_eq!(state.exercises.len(), 1);
    assert_eq!(state.error_message.as_deref(), Some("Plans unavailable"));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn refresh_suppresses_forbidden() {
    let users = MockUsersApi::new().with_failure(MockEndpoint::GetUser, ApiError::status(403, "Forbidden"));
    let h = harness_with(MockWorkoutsApi::new(), users, 20);

    h.vm.refresh_everything().await;

    let state = h.vm.state();
    assert!(state.user.is_none());
    assert!(state.error_message.is_none());
}

#[tokio::test]
async fn select_absent_workout_inserts_in_date_order() {
    let workouts = MockWorkoutsApi::new()
        .with_workout(Workout::new("w-a").with_date("2025-01-03"))
        .with_workout(Workout::new("w-b").with_date("2025-01-01"))
        .with_workout(Workout::new("new-1").with_date("2024-12-31"));
    let h = harness_with(workouts, MockUsersApi::new().with_user(User::new("kun")), 2);

    h.vm.refresh_everything().await;
    let before = h.vm.state().workouts.len();
    assert!(h.vm.state().workout("new-1").is_none());

    h.vm.select_workout("new-1", false).await;

    let state = h.vm.state();
    assert_eq!(state.workouts.len(), before + 1);
    assert_eq!(ids(&state.workouts), vec!["w-a", "w-b", "new-1"]);
    assert_eq!(state.selected_workout.as_ref().map(|w| w.id.as_str()), Some("new-1"));
}

#[tokio::test]
async fn select_replaces_listed_entry_with_detail() {
    let h = harness(MockWorkoutsApi::new().with_workout(workout_with_item()));

    h.vm.refresh_everything().await;

    let state = h.vm.state();
    assert_eq!(state.workouts.len(), 1);
    assert_eq!(state.workouts[0].items.len(), 1);
    assert_eq!(state.selected_workout.as_ref(), Some(&state.workouts[0]));
}

// =============================================================================
// Creating workouts
// =============================================================================

#[tokio::test]
async fn create_workout_selects_new_workout() {
    let h = harness(MockWorkoutsApi::new());

    h.vm.create_workout("2025-01-05", Some("Leg day".to_string()), None)
        .await;

    let state = h.vm.state();
    let created = state.recently_created_workout_id.clone().unwrap();
    assert_eq!(state.selected_workout.as_ref().map(|w| w.id.clone()), Some(created.clone()));
    assert_eq!(state.active_workout_id.as_deref(), Some(created.as_str()));
    assert!(state.active_workout_plan_id.is_none());
    assert_eq!(state.info_message.as_deref(), Some("Workout created"));
    assert!(state.error_message.is_none());
    assert!(!state.is_action_running);
    assert!(state.workout(&created).is_some());
}

#[tokio::test]
async fn create_workout_sends_trimmed_fields() {
    let h = harness(MockWorkoutsApi::new());

    h.vm.create_workout(" 2025-01-05 ", Some("   ".to_string()), Some("Europe/Oslo".to_string()))
        .await;

    let call = &h.workouts.calls_to(MockEndpoint::CreateWorkout)[0];
    let body = call.body.as_ref().unwrap();
    assert_eq!(body["date"], "2025-01-05");
    assert_eq!(body["timezone"], "Europe/Oslo");
    assert!(body.get("notes").is_none());
}

#[tokio::test]
async fn create_workout_with_blank_date_makes_no_call() {
    let h = harness(MockWorkoutsApi::new());

    h.vm.create_workout("   ", None, None).await;

    let state = h.vm.state();
    assert_eq!(state.error_message.as_deref(), Some("Date is required (YYYY-MM-DD)."));
    assert!(h.workouts.calls().is_empty());
    assert!(h.users.calls().is_empty());
    assert!(!state.is_action_running);
}

#[tokio::test]
async fn create_workout_without_id_fails() {
    let h = harness(
        MockWorkoutsApi::new()
            .with_id_response(MockEndpoint::CreateWorkout, IdResponse::message("Workout created")),
    );

    h.vm.create_workout("2025-01-05", None, None).await;

    let state = h.vm.state();
    assert_eq!(
        state.error_message.as_deref(),
        Some("Missing id in createWorkout response")
    );
    assert!(state.recently_created_workout_id.is_none());
    assert!(state.selected_workout.is_none());
    assert!(!state.is_action_running);
}

#[tokio::test]
async fn create_workout_failure_uses_fallback() {
    let h = harness(
        MockWorkoutsApi::new().with_failure(MockEndpoint::CreateWorkout, ApiError::status(500, "")),
    );

    h.vm.create_workout("2025-01-05", None, None).await;

    let state = h.vm.state();
    assert_eq!(state.error_message.as_deref(), Some("Could not create workout"));
    assert!(state.info_message.is_none());
}

#[tokio::test]
async fn follow_up_refresh_failure_keeps_created_workout() {
    let h = harness(
        MockWorkoutsApi::new()
            .with_failure(MockEndpoint::GetExercises, ApiError::status(500, "Exercises unavailable")),
    );

    h.vm.create_workout("2025-01-05", None, None).await;

    let state = h.vm.state();
    assert!(state.recently_created_workout_id.is_some());
    assert!(state.selected_workout.is_some());
    assert_eq!(state.error_message.as_deref(), Some("Exercises unavailable"));
    assert_eq!(state.info_message.as_deref(), Some("Workout created"));
}

#[tokio::test]
async fn start_from_plan_records_plan_without_info() {
    let plan = WorkoutPlan::new("plan-a")
        .with_name("Push Day")
        .with_exercises(json!([
            {"exerciseId": "ex-1", "name": "Bench Press"},
            "Overhead Press"
        ]));
    let workouts = MockWorkoutsApi::new().with_plan(plan);
    let repository = FitnessRepository::new(
        "kun",
        Arc::new(workouts.clone()),
        Arc::new(MockUsersApi::new().with_user(User::new("kun"))),
    );
    let vm = MainViewModel::new(Arc::new(repository))
        .with_timezone(Some("America/Chicago".to_string()));

    vm.start_workout_from_plan("plan-a").await;

    let state = vm.state();
    assert_eq!(state.active_workout_plan_id.as_deref(), Some("plan-a"));
    assert!(state.info_message.is_none());
    assert!(state.error_message.is_none());

    let created = state.recently_created_workout_id.clone().unwrap();
    assert_eq!(state.active_workout_id.as_deref(), Some(created.as_str()));
    let selected = state.selected_workout.as_ref().unwrap();
    assert_eq!(selected.id, created);
    assert_eq!(selected.items.len(), 2);

    let body = workouts.calls_to(MockEndpoint::CreateWorkout)[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["workout_id"], "plan-a");
    assert_eq!(body["notes"], "Push Day");
    assert_eq!(body["timezone"], "America/Chicago");
    assert_eq!(body["date"].as_str().map(str::len), Some(10));
    assert_eq!(body["exercises"][0]["exerciseId"], "ex-1");
    assert_eq!(body["exercises"][1]["name"], "Overhead Press");
}

#[tokio::test]
async fn start_from_plan_defaults_to_host_timezone() {
    let h = harness(MockWorkoutsApi::new().with_plan(WorkoutPlan::new("plan-a").with_name("Legs")));

    h.vm.start_workout_from_plan("plan-a").await;
    h.vm.create_workout("2025-01-05", None, Some("  ".to_string())).await;

    let creates = h.workouts.calls_to(MockEndpoint::CreateWorkout);
    assert_eq!(creates.len(), 2);
    for call in &creates {
        let timezone = call.body.as_ref().unwrap()["timezone"].as_str().unwrap().to_string();
        assert!(!timezone.trim().is_empty());
        assert_eq!(timezone, system_timezone());
    }
}

#[tokio::test]
async fn start_from_missing_plan_reports_and_creates_nothing() {
    let h = harness(MockWorkoutsApi::new());

    h.vm.start_workout_from_plan("missing").await;

    let state = h.vm.state();
    assert_eq!(
        state.error_message.as_deref(),
        Some("Workout plan missing not found")
    );
    assert_eq!(h.workouts.call_count(MockEndpoint::CreateWorkout), 0);
    assert!(state.active_workout_plan_id.is_none());
    assert!(!state.is_action_running);
}

#[tokio::test]
async fn manual_create_clears_plan_of_previous_start() {
    let h = harness(MockWorkoutsApi::new().with_plan(WorkoutPlan::new("plan-a").with_name("Legs")));

    h.vm.start_workout_from_plan("plan-a").await;
    assert_eq!(h.vm.state().active_workout_plan_id.as_deref(), Some("plan-a"));

    h.vm.create_workout("2025-01-06", None, None).await;
    assert!(h.vm.state().active_workout_plan_id.is_none());
}

#[tokio::test]
async fn update_workout_details_reselects_with_info() {
    let h = harness(MockWorkoutsApi::new().with_workout(workout_with_item()));

    h.vm.update_workout_details("w-1", "2025-01-02", Some("Moved".to_string()), None)
        .await;

    let state = h.vm.state();
    let selected = state.selected_workout.as_ref().unwrap();
    assert_eq!(selected.date.as_deref(), Some("2025-01-02"));
    assert_eq!(selected.notes.as_deref(), Some("Moved"));
    assert_eq!(state.info_message.as_deref(), Some("Workout updated"));

    h.vm.update_workout_details("w-1", " ", None, None).await;
    assert_eq!(
        h.vm.state().error_message.as_deref(),
        Some("Date is required (YYYY-MM-DD).")
    );
    assert_eq!(h.workouts.call_count(MockEndpoint::UpdateWorkout), 1);
}

// =============================================================================
// Items and sets
// =============================================================================

#[tokio::test]
async fn add_item_uses_catalog_name_and_next_order() {
    let h = harness(
        MockWorkoutsApi::new()
            .with_workout(workout_with_item())
            .with_exercise(Exercise::new("ex-2", "Romanian Deadlift")),
    );
    h.vm.refresh_everything().await;

    h.vm.add_item_to_workout("w-1", "ex-2", None, None).await;

    let body = h.workouts.calls_to(MockEndpoint::AddWorkoutItem)[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["exerciseId"], "ex-2");
    assert_eq!(body["name"], "Romanian Deadlift");
    assert_eq!(body["order"], 1);

    let state = h.vm.state();
    assert_eq!(state.selected_workout.as_ref().unwrap().items.len(), 2);
    assert!(!state.is_action_running);
}

#[tokio::test]
async fn add_item_failure_uses_fallback() {
    let h = harness(
        MockWorkoutsApi::new()
            .with_workout(workout_with_item())
            .with_failure(MockEndpoint::AddWorkoutItem, ApiError::network("")),
    );

    h.vm.add_item_to_workout("w-1", "ex-2", None, Some(3)).await;

    assert_eq!(h.vm.state().error_message.as_deref(), Some("Could not add exercise"));
}

#[tokio::test]
async fn log_sets_with_no_entries_makes_no_call() {
    let h = harness(MockWorkoutsApi::new().with_workout(workout_with_item()));

    h.vm.log_workout_sets("w-1", Vec::new()).await;

    assert_eq!(
        h.vm.state().error_message.as_deref(),
        Some("Add at least one set before saving.")
    );
    assert_eq!(h.workouts.call_count(MockEndpoint::AddSet), 0);
}

#[tokio::test]
async fn log_sets_completes_workout() {
    let h = harness(MockWorkoutsApi::new());
    h.vm.create_workout("2025-01-05", None, None).await;
    let workout_id = h.vm.state().active_workout_id.unwrap();
    h.vm.add_item_to_workout(&workout_id, "ex-1", None, None).await;
    let item_id = h.vm.state().selected_workout.unwrap().items[0].id.clone();

    h.vm.log_workout_sets(
        &workout_id,
        vec![
            WorkoutSetEntry::new(&item_id, 5).with_weight(100.0),
            WorkoutSetEntry::new(&item_id, 5).with_weight(105.0),
        ],
    )
    .await;

    let state = h.vm.state();
    assert_eq!(state.recently_completed_workout_id.as_deref(), Some(workout_id.as_str()));
    assert!(state.active_workout_id.is_none());
    assert!(state.active_workout_plan_id.is_none());
    assert_eq!(state.info_message.as_deref(), Some("Workout saved"));
    assert_eq!(state.selected_workout.as_ref().unwrap().set_count(), 2);
    assert!(!state.is_action_running);
}

#[tokio::test]
async fn log_sets_stops_at_first_failure() {
    let h = harness(
        MockWorkoutsApi::new()
            .with_workout(workout_with_item())
            .with_failure_on_call(MockEndpoint::AddSet, 2, ApiError::status(500, "")),
    );

    let entries = vec![
        WorkoutSetEntry::new("item-1", 5),
        WorkoutSetEntry::new("item-1", 5),
        WorkoutSetEntry::new("item-1", 5),
    ];
    h.vm.log_workout_sets("w-1", entries).await;

    let state = h.vm.state();
    assert_eq!(h.workouts.call_count(MockEndpoint::AddSet), 2);
    assert_eq!(state.error_message.as_deref(), Some("Could not save sets"));
    assert!(state.recently_completed_workout_id.is_none());
    assert!(!state.is_action_running);
    // The set added before the failure stays.
    assert_eq!(h.workouts.workout("w-1").unwrap().set_count(), 2);
}

#[tokio::test]
async fn update_log_with_nothing_to_save_makes_no_call() {
    let h = harness(MockWorkoutsApi::new().with_workout(workout_with_item()));

    h.vm.update_workout_log("w-1", Vec::new(), Vec::new()).await;

    assert_eq!(h.vm.state().error_message.as_deref(), Some("No changes to save."));
    assert!(h.workouts.calls().is_empty());
}

#[tokio::test]
async fn update_log_applies_updates_then_new_sets() {
    let h = harness(MockWorkoutsApi::new().with_workout(workout_with_item()));

    h.vm.update_workout_log(
        "w-1",
        vec![WorkoutSetUpdateEntry::new("item-1", "set-1", 8).with_weight(90.0)],
        vec![WorkoutSetEntry::new("item-1", 6)],
    )
    .await;

    let endpoints: Vec<MockEndpoint> = h
        .workouts
        .calls()
        .iter()
        .map(|call| call.endpoint)
        .filter(|endpoint| matches!(endpoint, MockEndpoint::UpdateSet | MockEndpoint::AddSet))
        .collect();
    assert_eq!(endpoints, vec![MockEndpoint::UpdateSet, MockEndpoint::AddSet]);

    let state = h.vm.state();
    let item = &state.selected_workout.as_ref().unwrap().items[0];
    assert_eq!(item.sets.len(), 2);
    assert_eq!(item.sets[0].reps, Some(8));
    assert_eq!(item.sets[0].weight, Some(90.0));
    assert_eq!(state.info_message.as_deref(), Some("Workout updated"));
}

#[tokio::test]
async fn update_log_failure_skips_remaining_calls() {
    let h = harness(
        MockWorkoutsApi::new()
            .with_workout(workout_with_item())
            .with_failure(MockEndpoint::UpdateSet, ApiError::status(409, "Set was edited elsewhere")),
    );

    h.vm.update_workout_log(
        "w-1",
        vec![WorkoutSetUpdateEntry::new("item-1", "set-1", 8)],
        vec![WorkoutSetEntry::new("item-1", 6)],
    )
    .await;

    assert_eq!(h.workouts.call_count(MockEndpoint::AddSet), 0);
    assert_eq!(
        h.vm.state().error_message.as_deref(),
        Some("Set was edited elsewhere")
    );
}

// =============================================================================
// Catalog and profile
// =============================================================================

#[tokio::test]
async fn create_exercise_refreshes_catalog() {
    let h = harness(MockWorkoutsApi::new());

    h.vm.create_exercise("  Hip Thrust ", Some("Pause at top".to_string()))
        .await;

    let state = h.vm.state();
    assert_eq!(state.info_message.as_deref(), Some("Exercise saved"));
    assert_eq!(state.exercises.len(), 1);
    assert_eq!(state.exercises[0].name, "Hip Thrust");
    assert!(!state.is_action_running);
}

#[tokio::test]
async fn create_exercise_validation_and_failure() {
    let h = harness(
        MockWorkoutsApi::new().with_failure(MockEndpoint::CreateExercise, ApiError::status(500, "")),
    );

    h.vm.create_exercise("", None).await;
    assert_eq!(h.vm.state().error_message.as_deref(), Some("Exercise name is required."));
    assert_eq!(h.workouts.call_count(MockEndpoint::CreateExercise), 0);

    h.vm.create_exercise("Hip Thrust", None).await;
    assert_eq!(h.vm.state().error_message.as_deref(), Some("Could not save exercise"));
}

#[tokio::test]
async fn create_workout_plan_sends_cleaned_request() {
    let h = harness(MockWorkoutsApi::new());
    let mut command = CreateWorkoutPlanCommand::new(" Pull Day ")
        .with_muscle_groups(vec!["Back".to_string(), " ".to_string()])
        .with_exercises(vec!["Barbell Row".to_string()]);
    command.description = Some("   ".to_string());
    command.plan_type = Some("strength".to_string());

    h.vm.create_workout_plan(command).await;

    let body = h.workouts.calls_to(MockEndpoint::CreateWorkoutPlan)[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["name"], "Pull Day");
    assert_eq!(body["muscle_group"], json!(["Back"]));
    assert_eq!(body["type"], "strength");
    assert_eq!(body["default"], false);
    assert!(body.get("description").is_none());

    let state = h.vm.state();
    assert_eq!(state.workout_plans.len(), 1);
    assert_eq!(
        state.recently_created_workout_plan_id,
        Some(state.workout_plans[0].id.clone())
    );
    assert_eq!(state.info_message.as_deref(), Some("Workout plan saved"));
    assert!(!state.is_action_running);
}

#[tokio::test]
async fn update_user_refreshes_profile() {
    let h = harness(MockWorkoutsApi::new());

    h.vm.update_user(Some("Kun".to_string()), Some("Lee".to_string()), None)
        .await;

    let state = h.vm.state();
    assert_eq!(state.info_message.as_deref(), Some("Profile updated"));
    assert_eq!(
        state.user.as_ref().and_then(|u| u.display_name()).as_deref(),
        Some("Kun Lee")
    );
    assert!(!state.is_action_running);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn update_user_failure_uses_fallback() {
    let users = MockUsersApi::new()
        .with_user(User::new("kun"))
        .with_failure(MockEndpoint::UpdateUser, ApiError::status(500, " "));
    let h = harness_with(MockWorkoutsApi::new(), users, 20);

    h.vm.update_user(Some("Kun".to_string()), None, None).await;

    let state = h.vm.state();
    assert_eq!(state.error_message.as_deref(), Some("Could not update profile"));
    assert_eq!(h.users.call_count(MockEndpoint::GetUser), 0);
}

// =============================================================================
// Housekeeping
// =============================================================================

#[tokio::test]
async fn clear_message_clears_both_messages() {
    let h = harness(MockWorkoutsApi::new());

    h.vm.create_workout("2025-01-05", None, None).await;
    assert!(h.vm.state().info_message.is_some());
    h.vm.clear_message();
    h.vm.create_workout("", None, None).await;
    h.vm.clear_message();

    let state = h.vm.state();
    assert!(state.error_message.is_none());
    assert!(state.info_message.is_none());
}

#[tokio::test]
async fn markers_are_consumed_once() {
    let h = harness(MockWorkoutsApi::new().with_workout(workout_with_item()));

    h.vm.log_workout_sets("w-1", vec![WorkoutSetEntry::new("item-1", 3)])
        .await;
    assert_eq!(h.vm.consume_recently_completed_workout().as_deref(), Some("w-1"));
    assert!(h.vm.consume_recently_completed_workout().is_none());

    h.vm.create_workout_plan(CreateWorkoutPlanCommand::new("Legs")).await;
    assert!(h.vm.consume_recently_created_workout_plan().is_some());
    assert!(h.vm.consume_recently_created_workout_plan().is_none());

    h.vm.create_workout("2025-01-05", None, None).await;
    assert!(h.vm.state().active_workout_id.is_some());
    h.vm.clear_active_workout();
    assert!(h.vm.state().active_workout_id.is_none());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_intents_do_not_interleave() {
    let vm_slot: Arc<OnceLock<Weak<MainViewModel>>> = Arc::new(OnceLock::new());
    let busy_at_call: Arc<Mutex<Vec<(MockEndpoint, bool)>>> = Arc::new(Mutex::new(Vec::new()));

    let workouts = MockWorkoutsApi::new()
        .with_delay(Duration::from_millis(10))
        .on_call({
            let vm_slot = Arc::clone(&vm_slot);
            let busy_at_call = Arc::clone(&busy_at_call);
            move |endpoint| {
                if let Some(vm) = vm_slot.get().and_then(Weak::upgrade) {
                    let busy = vm.state().is_action_running;
                    busy_at_call.lock().unwrap().push((endpoint, busy));
                }
            }
        });
    let h = harness(workouts);
    vm_slot.set(Arc::downgrade(&h.vm)).unwrap();

    let first = h.vm.clone();
    let second = h.vm.clone();
    tokio::join!(
        async move { first.create_workout("2025-01-01", None, None).await },
        async move { second.create_workout("2025-01-02", None, None).await },
    );

    // Every remote call of either intent ran while the action was marked running.
    let observed = busy_at_call.lock().unwrap().clone();
    assert_eq!(observed.len(), 8);
    assert!(observed.iter().all(|(_, busy)| *busy), "{:?}", observed);

    // The second intent only started once the first had finished.
    let endpoints: Vec<MockEndpoint> = h.workouts.calls().iter().map(|c| c.endpoint).collect();
    let second_create = endpoints
        .iter()
        .rposition(|e| *e == MockEndpoint::CreateWorkout)
        .unwrap();
    let first_detail = endpoints
        .iter()
        .position(|e| *e == MockEndpoint::GetWorkoutDetail)
        .unwrap();
    assert!(first_detail < second_create, "{:?}", endpoints);

    let state = h.vm.state();
    assert!(!state.is_action_running);
    assert_eq!(state.workouts.len(), 2);
    assert_eq!(
        state.selected_workout.as_ref().map(|w| w.id.clone()),
        state.recently_created_workout_id
    );
}

#[tokio::test]
async fn validation_waits_for_running_intent() {
    let h = harness(MockWorkoutsApi::new().with_delay(Duration::from_millis(50)));
    let mut states = h.vm.subscribe();

    let vm = Arc::clone(&h.vm);
    let create = tokio::spawn(async move { vm.create_workout("2025-01-01", None, None).await });
    states.wait_for(|s| s.is_action_running).await.unwrap();

    h.vm.create_exercise("   ", None).await;

    // The rejection lands after the workout intent finished, replacing its info.
    let state = h.vm.state();
    assert!(state.recently_created_workout_id.is_some());
    assert_eq!(state.error_message.as_deref(), Some("Exercise name is required."));
    assert!(state.info_message.is_none());
    assert!(!state.is_action_running);
    assert_eq!(h.workouts.call_count(MockEndpoint::CreateExercise), 0);

    create.await.unwrap();
}

#[tokio::test]
async fn subscribers_observe_final_snapshot() {
    let h = harness(MockWorkoutsApi::new().with_workout(Workout::new("workout-1").with_date("2025-01-01")));
    let mut rx = h.vm.subscribe();

    h.vm.refresh_everything().await;

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.selected_workout_id.as_deref(), Some("workout-1"));
    assert!(!state.is_loading);
}
