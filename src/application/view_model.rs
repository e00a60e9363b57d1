//! MainViewModel - Intent handlers over the fitness UI state.
//!
//! Every intent is an `async fn` that calls the repository and merges the
//! result into the published `FitnessUiState`. Mutating intents queue on a
//! FIFO gate before validating their input, so two concurrently dispatched
//! intents never interleave their partial updates. Each begin and end transition is a
//! single store update.
//!
//! Nothing here returns an error: failures land in `error_message`, using
//! the failure's own message or a per-action fallback.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::repository::FitnessRepository;
use super::state::{
    CreateWorkoutPlanCommand, FitnessUiState, WorkoutSetEntry, WorkoutSetUpdateEntry,
};
use super::store::{StateStore, StateWatcher};
use crate::config::system_timezone;
use crate::domain::{upsert_sorted_by_date, CreateWorkoutPlanRequest, CreateWorkoutRequest};
use crate::ports::ApiError;

pub const DATE_REQUIRED: &str = "Date is required (YYYY-MM-DD).";
pub const EXERCISE_NAME_REQUIRED: &str = "Exercise name is required.";
pub const WORKOUT_NAME_REQUIRED: &str = "Workout name is required.";
pub const NO_SETS_TO_SAVE: &str = "Add at least one set before saving.";
pub const NO_CHANGES_TO_SAVE: &str = "No changes to save.";

const REFRESH_FAILED: &str = "Could not refresh data";

/// Where a new workout came from. Only manual creation announces itself.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WorkoutOrigin {
    Manual,
    Plan(String),
}

/// State owner for the main screen.
pub struct MainViewModel {
    repository: Arc<FitnessRepository>,
    store: StateStore<FitnessUiState>,
    action_gate: Mutex<()>,
    timezone: String,
}

impl MainViewModel {
    pub fn new(repository: Arc<FitnessRepository>) -> Self {
        Self {
            repository,
            store: StateStore::default(),
            action_gate: Mutex::new(()),
            timezone: system_timezone(),
        }
    }

    /// Timezone attached to workouts when the caller supplies none.
    /// `None` or blank keeps the host's zone.
    pub fn with_timezone(mut self, timezone: Option<String>) -> Self {
        if let Some(timezone) = non_blank(timezone) {
            self.timezone = timezone;
        }
        self
    }

    /// Current snapshot.
    pub fn state(&self) -> FitnessUiState {
        self.store.snapshot()
    }

    /// Stream of snapshots, starting at the current one.
    pub fn subscribe(&self) -> StateWatcher<FitnessUiState> {
        self.store.subscribe()
    }

    pub fn repository(&self) -> &FitnessRepository {
        &self.repository
    }

    // ════════════════════════════════════════════════════════════════════════
    // Loading
    // ════════════════════════════════════════════════════════════════════════

    /// Reloads user, workouts, plans and exercises, then re-selects.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_everything(&self) {
        let _gate = self.action_gate.lock().await;
        self.refresh_all(None).await;
    }

    /// Loads a workout's detail and makes it the selection.
    #[tracing::instrument(skip(self))]
    pub async fn select_workout(&self, workout_id: &str, force: bool) {
        let _gate = self.action_gate.lock().await;
        self.load_workout(workout_id, force, None, true).await;
    }

    // ════════════════════════════════════════════════════════════════════════
    // Workouts
    // ════════════════════════════════════════════════════════════════════════

    #[tracing::instrument(skip(self, notes))]
    pub async fn create_workout(
        &self,
        date: &str,
        notes: Option<String>,
        timezone: Option<String>,
    ) {
        let _gate = self.action_gate.lock().await;

        let date = date.trim();
        if date.is_empty() {
            self.fail_validation(DATE_REQUIRED);
            return;
        }

        self.begin_action();

        let request = CreateWorkoutRequest::new(date)
            .with_notes(non_blank(notes))
            .with_timezone(non_blank(timezone).or_else(|| Some(self.timezone.clone())));
        self.submit_workout(&request, WorkoutOrigin::Manual).await;
    }

    /// Creates a workout for today from a plan's exercise list.
    #[tracing::instrument(skip(self))]
    pub async fn start_workout_from_plan(&self, plan_id: &str) {
        let _gate = self.action_gate.lock().await;
        self.begin_action();

        let plan = match self.repository.fetch_workout_template(plan_id).await {
            Ok(plan) => plan,
            Err(e) => {
                self.fail_action(&e, "Could not load workout plan");
                return;
            }
        };

        let request = plan.to_workout_request(today(), Some(self.timezone.clone()));
        self.submit_workout(&request, WorkoutOrigin::Plan(plan_id.to_string()))
            .await;
    }

    /// Changes a workout's date and notes.
    #[tracing::instrument(skip(self, notes))]
    pub async fn update_workout_details(
        &self,
        workout_id: &str,
        date: &str,
        notes: Option<String>,
        timezone: Option<String>,
    ) {
        let _gate = self.action_gate.lock().await;

        let date = date.trim();
        if date.is_empty() {
            self.fail_validation(DATE_REQUIRED);
            return;
        }

        self.begin_action();

        let request = CreateWorkoutRequest::new(date)
            .with_notes(non_blank(notes))
            .with_timezone(non_blank(timezone).or_else(|| Some(self.timezone.clone())));

        match self.repository.update_workout(workout_id, &request).await {
            Ok(id) => {
                self.load_workout(&id, true, Some("Workout updated"), true)
                    .await
            }
            Err(e) => self.fail_action(&e, "Could not update workout"),
        }
    }

    #[tracing::instrument(skip(self, notes))]
    pub async fn add_item_to_workout(
        &self,
        workout_id: &str,
        exercise_id: &str,
        notes: Option<String>,
        order: Option<i32>,
    ) {
        let _gate = self.action_gate.lock().await;
        self.begin_action();

        let (exercise_name, default_order) = self.store.read(|s| {
            let default_order = s
                .selected_workout
                .as_ref()
                .filter(|workout| workout.id == workout_id)
                .and_then(|workout| i32::try_from(workout.items.len()).ok());
            (s.exercise_name(exercise_id), default_order)
        });

        let result = self
            .repository
            .add_workout_item(
                workout_id,
                exercise_id,
                non_blank(notes),
                order.or(default_order),
                exercise_name,
            )
            .await;

        match result {
            Ok(_) => self.load_workout(workout_id, true, None, true).await,
            Err(e) => self.fail_action(&e, "Could not add exercise"),
        }
    }

    /// Adds each set in order. The first failure stops the batch; sets
    /// already added stay on the server.
    #[tracing::instrument(skip(self, entries), fields(sets = entries.len()))]
    pub async fn log_workout_sets(&self, workout_id: &str, entries: Vec<WorkoutSetEntry>) {
        let _gate = self.action_gate.lock().await;

        if entries.is_empty() {
            self.fail_validation(NO_SETS_TO_SAVE);
            return;
        }

        self.begin_action();

        for entry in &entries {
            let result = self
                .repository
                .add_set(workout_id, &entry.item_id, &entry.to_request())
                .await;
            if let Err(e) = result {
                self.fail_action(&e, "Could not save sets");
                return;
            }
        }

        self.store.update(|s| {
            s.recently_completed_workout_id = Some(workout_id.to_string());
            s.active_workout_id = None;
            s.active_workout_plan_id = None;
        });
        self.refresh_after_action(Some(workout_id), Some("Workout saved"))
            .await;
    }

    /// Applies set edits, then adds new sets, stopping at the first failure.
    #[tracing::instrument(skip(self, updates, new_sets), fields(updates = updates.len(), new_sets = new_sets.len()))]
    pub async fn update_workout_log(
        &self,
        workout_id: &str,
        updates: Vec<WorkoutSetUpdateEntry>,
        new_sets: Vec<WorkoutSetEntry>,
    ) {
        let _gate = self.action_gate.lock().await;

        if updates.is_empty() && new_sets.is_empty() {
            self.fail_validation(NO_CHANGES_TO_SAVE);
            return;
        }

        self.begin_action();

        for update in &updates {
            let result = self
                .repository
                .update_set(workout_id, &update.item_id, &update.set_id, &update.to_request())
                .await;
            if let Err(e) = result {
                self.fail_action(&e, "Could not update workout");
                return;
            }
        }

        for entry in &new_sets {
            let result = self
                .repository
                .add_set(workout_id, &entry.item_id, &entry.to_request())
                .await;
            if let Err(e) = result {
                self.fail_action(&e, "Could not update workout");
                return;
            }
        }

        self.refresh_after_action(Some(workout_id), Some("Workout updated"))
            .await;
    }

    // ════════════════════════════════════════════════════════════════════════
    // Catalog and profile
    // ════════════════════════════════════════════════════════════════════════

    #[tracing::instrument(skip(self, notes))]
    pub async fn create_exercise(&self, name: &str, notes: Option<String>) {
        let _gate = self.action_gate.lock().await;

        let name = name.trim();
        if name.is_empty() {
            self.fail_validation(EXERCISE_NAME_REQUIRED);
            return;
        }

        self.begin_action();

        match self.repository.create_exercise(name, non_blank(notes)).await {
            Ok(_) => self.refresh_after_action(None, Some("Exercise saved")).await,
            Err(e) => self.fail_action(&e, "Could not save exercise"),
        }
    }

    #[tracing::instrument(skip(self, command), fields(name = %command.name))]
    pub async fn create_workout_plan(&self, command: CreateWorkoutPlanCommand) {
        let _gate = self.action_gate.lock().await;

        let name = command.name.trim();
        if name.is_empty() {
            self.fail_validation(WORKOUT_NAME_REQUIRED);
            return;
        }

        let request = CreateWorkoutPlanRequest {
            name: name.to_string(),
            description: non_blank(command.description),
            exercises: non_blank_all(command.exercises),
            equipment: non_blank_all(command.equipment),
            muscle_groups: non_blank_all(command.muscle_groups),
            number_of_exercises: command.number_of_exercises,
            sets: command.sets,
            plan_type: non_blank(command.plan_type),
            default: false,
        };

        self.begin_action();

        let plan_id = match self.repository.create_workout_plan(&request).await {
            Ok(id) => id,
            Err(e) => {
                self.fail_action(&e, "Could not create workout plan");
                return;
            }
        };

        let plans = self.repository.fetch_workout_plans().await;
        self.store.update(|s| {
            match plans {
                Ok(plans) => s.workout_plans = plans,
                Err(e) if !e.is_forbidden() => {
                    s.error_message = Some(e.user_message(REFRESH_FAILED))
                }
                Err(_) => {}
            }
            s.recently_created_workout_plan_id = Some(plan_id);
            s.info_message = Some("Workout plan saved".to_string());
            s.is_action_running = false;
        });
    }

    #[tracing::instrument(skip(self, first_name, last_name, bio))]
    pub async fn update_user(
        &self,
        first_name: Option<String>,
        last_name: Option<String>,
        bio: Option<String>,
    ) {
        let _gate = self.action_gate.lock().await;
        self.begin_action();

        match self.repository.update_user(first_name, last_name, bio).await {
            Ok(_) => self.refresh_all(Some("Profile updated")).await,
            Err(e) => self.fail_action(&e, "Could not update profile"),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Housekeeping
    // ════════════════════════════════════════════════════════════════════════

    /// Clears both the error and the info message.
    pub fn clear_message(&self) {
        self.store.update(|s| {
            s.error_message = None;
            s.info_message = None;
        });
    }

    /// Takes the id of the workout created since the last call.
    pub fn consume_recently_created_workout(&self) -> Option<String> {
        let mut taken = None;
        self.store
            .update(|s| taken = s.recently_created_workout_id.take());
        taken
    }

    pub fn consume_recently_created_workout_plan(&self) -> Option<String> {
        let mut taken = None;
        self.store
            .update(|s| taken = s.recently_created_workout_plan_id.take());
        taken
    }

    pub fn consume_recently_completed_workout(&self) -> Option<String> {
        let mut taken = None;
        self.store
            .update(|s| taken = s.recently_completed_workout_id.take());
        taken
    }

    /// Abandons the in-progress workout without touching the server.
    pub fn clear_active_workout(&self) {
        self.store.update(|s| {
            s.active_workout_id = None;
            s.active_workout_plan_id = None;
        });
    }

    // ════════════════════════════════════════════════════════════════════════
    // Shared steps. Callers hold the gate.
    // ════════════════════════════════════════════════════════════════════════

    /// Full reload. `info` is announced once the reload (and re-selection)
    /// finishes, and ends any running action.
    async fn refresh_all(&self, info: Option<&str>) {
        self.store.update(|s| {
            s.is_loading = true;
            s.error_message = None;
        });

        let repo = &self.repository;
        let (user, workouts, plans, exercises) = futures::join!(
            repo.fetch_user(),
            repo.fetch_workouts(),
            repo.fetch_workout_plans(),
            repo.fetch_exercises(false),
        );

        let error = first_reportable([
            user.as_ref().err(),
            workouts.as_ref().err(),
            plans.as_ref().err(),
            exercises.as_ref().err(),
        ]);

        let target = {
            let mut target = None;
            self.store.update(|s| {
                if let Ok(user) = user {
                    s.user = Some(user);
                }
                if let Ok(workouts) = workouts {
                    s.workouts = workouts;
                }
                if let Ok(plans) = plans {
                    s.workout_plans = plans;
                }
                if let Ok(exercises) = exercises {
                    s.exercises = exercises;
                }
                if error.is_some() {
                    s.error_message = error;
                }
                s.is_loading = false;

                target = s
                    .selected_workout_id
                    .clone()
                    .or_else(|| s.workouts.first().map(|workout| workout.id.clone()));

                if target.is_none() {
                    if let Some(info) = info {
                        s.info_message = Some(info.to_string());
                    }
                    s.is_action_running = false;
                }
            });
            target
        };

        tracing::debug!("Refresh finished, selecting {:?}", target);
        if let Some(workout_id) = target {
            self.load_workout(&workout_id, true, info, false).await;
        }
    }

    /// Fetches a workout's detail into the selection and the list.
    ///
    /// Skipped when the workout is already selected and `force` is false.
    /// The terminal update ends the running action and announces `info`.
    async fn load_workout(
        &self,
        workout_id: &str,
        force: bool,
        info: Option<&str>,
        clear_error: bool,
    ) {
        let already_selected = self.store.read(|s| {
            s.selected_workout
                .as_ref()
                .is_some_and(|workout| workout.id == workout_id)
        });
        if already_selected && !force {
            tracing::debug!("Workout {} already selected", workout_id);
            if info.is_some() {
                self.store.update(|s| {
                    s.info_message = info.map(str::to_string);
                    s.is_action_running = false;
                });
            }
            return;
        }

        self.store.update(|s| {
            s.is_action_running = true;
            s.selected_workout_id = Some(workout_id.to_string());
            if clear_error {
                s.error_message = None;
            }
        });

        let result = self.repository.fetch_workout_detail(workout_id).await;

        self.store.update(|s| {
            match result {
                Ok(workout) => {
                    upsert_sorted_by_date(&mut s.workouts, workout.clone());
                    s.selected_workout = Some(workout);
                }
                Err(e) if e.is_forbidden() => {
                    tracing::debug!("Suppressing forbidden workout detail for {}", workout_id);
                }
                Err(e) => s.error_message = Some(e.user_message("Could not load workout")),
            }
            if let Some(info) = info {
                s.info_message = Some(info.to_string());
            }
            s.is_action_running = false;
        });
    }

    /// Creates a workout and makes it the active, selected one.
    async fn submit_workout(&self, request: &CreateWorkoutRequest, origin: WorkoutOrigin) {
        let workout_id = match self.repository.create_workout(request).await {
            Ok(id) => id,
            Err(e) => {
                self.fail_action(&e, "Could not create workout");
                return;
            }
        };

        tracing::info!("Created workout {}", workout_id);
        self.store.update(|s| {
            s.recently_created_workout_id = Some(workout_id.clone());
            s.active_workout_id = Some(workout_id.clone());
            s.active_workout_plan_id = match &origin {
                WorkoutOrigin::Plan(plan_id) => Some(plan_id.clone()),
                WorkoutOrigin::Manual => None,
            };
        });

        let info = match origin {
            WorkoutOrigin::Manual => Some("Workout created"),
            WorkoutOrigin::Plan(_) => None,
        };
        self.refresh_after_action(Some(&workout_id), info).await;
    }

    /// Best-effort reload of workouts and exercises after a successful
    /// mutation, optionally followed by a forced selection. Reload failures
    /// are reported without undoing the mutation.
    async fn refresh_after_action(&self, select: Option<&str>, info: Option<&str>) {
        let repo = &self.repository;
        let (workouts, exercises) =
            futures::join!(repo.fetch_workouts(), repo.fetch_exercises(false));

        let error = first_reportable([workouts.as_ref().err(), exercises.as_ref().err()]);

        self.store.update(|s| {
            if let Ok(workouts) = workouts {
                s.workouts = workouts;
            }
            if let Ok(exercises) = exercises {
                s.exercises = exercises;
            }
            if error.is_some() {
                s.error_message = error;
            }
            if select.is_none() {
                if let Some(info) = info {
                    s.info_message = Some(info.to_string());
                }
                s.is_action_running = false;
            }
        });

        if let Some(workout_id) = select {
            self.load_workout(workout_id, true, info, false).await;
        }
    }

    fn begin_action(&self) {
        self.store.update(|s| {
            s.is_action_running = true;
            s.error_message = None;
            s.info_message = None;
        });
    }

    fn fail_action(&self, error: &ApiError, fallback: &str) {
        let message = error.user_message(fallback);
        tracing::warn!("Action failed: {}", message);
        self.store.update(|s| {
            s.is_action_running = false;
            s.error_message = Some(message);
        });
    }

    /// Rejects an intent before any remote call.
    fn fail_validation(&self, message: &str) {
        tracing::debug!("Rejected input: {}", message);
        self.store.update(|s| {
            s.error_message = Some(message.to_string());
            s.info_message = None;
        });
    }
}

/// First failure worth showing. A 403 is skipped rather than masking a
/// later failure in the same batch.
fn first_reportable<const N: usize>(errors: [Option<&ApiError>; N]) -> Option<String> {
    errors
        .into_iter()
        .flatten()
        .find(|error| !error.is_forbidden())
        .map(|error| error.user_message(REFRESH_FAILED))
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn non_blank_all(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| non_blank(Some(value)))
        .collect()
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
