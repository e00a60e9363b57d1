//! FitnessRepository - Uniform access to the users and workouts services.
//!
//! Each method performs exactly one remote call scoped to the configured user
//! and returns `Result<T, ApiError>`. Writes that are expected to produce an
//! id fail with `ApiError::MissingId` when the service answers without one.

use std::sync::Arc;

use crate::domain::{
    CreateExerciseRequest, CreateSetRequest, CreateWorkoutItemRequest, CreateWorkoutPlanRequest,
    CreateWorkoutRequest, Exercise, IdResponse, StartWorkoutRequest, UpdateSetRequest,
    UpdateUserRequest, User, Workout, WorkoutPlan,
};
use crate::ports::{ApiError, UsersApi, WorkoutQuery, WorkoutsApi};

/// Default number of workouts fetched on refresh.
pub const DEFAULT_WORKOUT_FETCH_LIMIT: u32 = 20;

/// Stateless gateway over both service ports.
pub struct FitnessRepository {
    user_id: String,
    workout_fetch_limit: u32,
    workouts_api: Arc<dyn WorkoutsApi>,
    users_api: Arc<dyn UsersApi>,
}

impl FitnessRepository {
    pub fn new(
        user_id: impl Into<String>,
        workouts_api: Arc<dyn WorkoutsApi>,
        users_api: Arc<dyn UsersApi>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            workout_fetch_limit: DEFAULT_WORKOUT_FETCH_LIMIT,
            workouts_api,
            users_api,
        }
    }

    /// Overrides how many workouts `fetch_workouts` asks for.
    pub fn with_workout_fetch_limit(mut self, limit: u32) -> Self {
        self.workout_fetch_limit = limit;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn workout_fetch_limit(&self) -> u32 {
        self.workout_fetch_limit
    }

    // ════════════════════════════════════════════════════════════════════════
    // Reads
    // ════════════════════════════════════════════════════════════════════════

    pub async fn fetch_user(&self) -> Result<User, ApiError> {
        tracing::debug!("Fetching user {}", self.user_id);
        self.users_api
            .get_user(&self.user_id)
            .await
            .map_err(|e| failed("fetch_user", e))
    }

    pub async fn fetch_exercises(&self, include_archived: bool) -> Result<Vec<Exercise>, ApiError> {
        tracing::debug!("Fetching exercises (include_archived={})", include_archived);
        self.workouts_api
            .get_exercises(&self.user_id, include_archived)
            .await
            .map_err(|e| failed("fetch_exercises", e))
    }

    /// Most recent workouts, up to the configured limit.
    pub async fn fetch_workouts(&self) -> Result<Vec<Workout>, ApiError> {
        self.fetch_workouts_matching(&WorkoutQuery::with_limit(self.workout_fetch_limit))
            .await
    }

    /// Workouts matching an explicit query (date range, custom limit).
    pub async fn fetch_workouts_matching(
        &self,
        query: &WorkoutQuery,
    ) -> Result<Vec<Workout>, ApiError> {
        tracing::debug!("Fetching workouts {:?}", query);
        self.workouts_api
            .get_workouts(&self.user_id, query)
            .await
            .map_err(|e| failed("fetch_workouts", e))
    }

    pub async fn fetch_workout_plans(&self) -> Result<Vec<WorkoutPlan>, ApiError> {
        tracing::debug!("Fetching workout plans");
        self.workouts_api
            .get_workout_plans()
            .await
            .map_err(|e| failed("fetch_workout_plans", e))
    }

    pub async fn fetch_workout_template(&self, plan_id: &str) -> Result<WorkoutPlan, ApiError> {
        tracing::debug!("Fetching workout plan {}", plan_id);
        self.workouts_api
            .get_workout_plan(plan_id)
            .await
            .map_err(|e| failed("fetch_workout_template", e))
    }

    /// Workout with its items and sets.
    pub async fn fetch_workout_detail(&self, workout_id: &str) -> Result<Workout, ApiError> {
        tracing::debug!("Fetching workout detail {}", workout_id);
        self.workouts_api
            .get_workout_detail(&self.user_id, workout_id, true, true)
            .await
            .map_err(|e| failed("fetch_workout_detail", e))
    }

    // ════════════════════════════════════════════════════════════════════════
    // Id-producing writes
    // ════════════════════════════════════════════════════════════════════════

    pub async fn create_workout(&self, request: &CreateWorkoutRequest) -> Result<String, ApiError> {
        tracing::debug!("Creating workout dated {:?}", request.date);
        let response = self
            .workouts_api
            .create_workout(&self.user_id, request)
            .await
            .map_err(|e| failed("create_workout", e))?;
        require_id(response, "createWorkout")
    }

    /// Starts a workout server-side from a plan.
    ///
    /// The view model derives plan workouts locally instead; this is for
    /// callers that let the service expand the plan.
    pub async fn start_workout(
        &self,
        plan_id: &str,
        date: Option<String>,
        timezone: Option<String>,
    ) -> Result<String, ApiError> {
        tracing::debug!("Starting workout from plan {}", plan_id);
        let body = StartWorkoutRequest {
            workout_id: plan_id.to_string(),
            date,
            timezone,
            notes: None,
        };
        let response = self
            .workouts_api
            .start_workout(&self.user_id, &body)
            .await
            .map_err(|e| failed("start_workout", e))?;
        require_id(response, "startWorkout")
    }

    pub async fn create_workout_plan(
        &self,
        request: &CreateWorkoutPlanRequest,
    ) -> Result<String, ApiError> {
        tracing::debug!("Creating workout plan '{}'", request.name);
        let response = self
            .workouts_api
            .create_workout_plan(request)
            .await
            .map_err(|e| failed("create_workout_plan", e))?;
        require_id(response, "createWorkoutPlan")
    }

    pub async fn create_exercise(
        &self,
        name: &str,
        notes: Option<String>,
    ) -> Result<String, ApiError> {
        tracing::debug!("Creating exercise '{}'", name);
        let body = CreateExerciseRequest::new(name).with_notes(notes);
        let response = self
            .workouts_api
            .create_exercise(&self.user_id, &body)
            .await
            .map_err(|e| failed("create_exercise", e))?;
        require_id(response, "createExercise")
    }

    /// Appends an exercise to a workout. `exercise_name` is denormalized onto
    /// the item so the workout renders without the catalog.
    pub async fn add_workout_item(
        &self,
        workout_id: &str,
        exercise_id: &str,
        notes: Option<String>,
        order: Option<i32>,
        exercise_name: Option<String>,
    ) -> Result<String, ApiError> {
        tracing::debug!("Adding exercise {} to workout {}", exercise_id, workout_id);
        let body = CreateWorkoutItemRequest {
            exercise_id: exercise_id.to_string(),
            name: exercise_name,
            notes,
            order,
        };
        let response = self
            .workouts_api
            .add_workout_item(&self.user_id, workout_id, &body)
            .await
            .map_err(|e| failed("add_workout_item", e))?;
        require_id(response, "addWorkoutItem")
    }

    pub async fn add_set(
        &self,
        workout_id: &str,
        item_id: &str,
        set: &CreateSetRequest,
    ) -> Result<String, ApiError> {
        tracing::debug!("Adding set to item {} of workout {}", item_id, workout_id);
        let response = self
            .workouts_api
            .add_set(&self.user_id, workout_id, item_id, set)
            .await
            .map_err(|e| failed("add_set", e))?;
        require_id(response, "addSet")
    }

    // ════════════════════════════════════════════════════════════════════════
    // Echo writes
    // ════════════════════════════════════════════════════════════════════════

    /// Returns `workout_id` on success.
    pub async fn update_workout(
        &self,
        workout_id: &str,
        request: &CreateWorkoutRequest,
    ) -> Result<String, ApiError> {
        tracing::debug!("Updating workout {}", workout_id);
        self.workouts_api
            .update_workout(&self.user_id, workout_id, request)
            .await
            .map_err(|e| failed("update_workout", e))?;
        Ok(workout_id.to_string())
    }

    /// Returns `set_id` on success.
    pub async fn update_set(
        &self,
        workout_id: &str,
        item_id: &str,
        set_id: &str,
        update: &UpdateSetRequest,
    ) -> Result<String, ApiError> {
        tracing::debug!("Updating set {} of item {} in workout {}", set_id, item_id, workout_id);
        self.workouts_api
            .update_set(&self.user_id, workout_id, item_id, set_id, update)
            .await
            .map_err(|e| failed("update_set", e))?;
        Ok(set_id.to_string())
    }

    /// Returns the configured user id on success.
    pub async fn update_user(
        &self,
        first_name: Option<String>,
        last_name: Option<String>,
        bio: Option<String>,
    ) -> Result<String, ApiError> {
        tracing::debug!("Updating user {}", self.user_id);
        let body = UpdateUserRequest {
            first_name,
            last_name,
            bio,
        };
        self.users_api
            .update_user(&self.user_id, &body)
            .await
            .map_err(|e| failed("update_user", e))?;
        Ok(self.user_id.clone())
    }
}

fn failed(operation: &str, error: ApiError) -> ApiError {
    tracing::warn!("{} failed: {}", operation, error);
    error
}

fn require_id(response: IdResponse, action: &'static str) -> Result<String, ApiError> {
    match response.usable_id() {
        Some(id) => Ok(id.to_string()),
        None => {
            tracing::warn!("{} succeeded without an id", action);
            Err(ApiError::missing_id(action))
        }
    }
}
