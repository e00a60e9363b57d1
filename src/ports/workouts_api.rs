//! Workouts API Port - Interface to the workouts service.
//!
//! Covers logged workouts (with their items and sets), the exercise catalog,
//! and workout plans. All per-user endpoints take the user id explicitly;
//! scoping to a single configured user happens in the repository.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{
    CreateExerciseRequest, CreateSetRequest, CreateWorkoutItemRequest, CreateWorkoutPlanRequest,
    CreateWorkoutRequest, Exercise, IdResponse, StartWorkoutRequest, UpdateSetRequest, Workout,
    WorkoutPlan,
};

/// Filters for listing workouts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutQuery {
    /// Maximum number of workouts, most recent first.
    pub limit: Option<u32>,
    /// Inclusive lower bound on the workout date.
    pub start_date: Option<String>,
    /// Inclusive upper bound on the workout date.
    pub end_date: Option<String>,
}

impl WorkoutQuery {
    /// Creates a query returning at most `limit` workouts.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Restricts the query to a date range.
    pub fn between(mut self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self.end_date = Some(end_date.into());
        self
    }

    /// Query-string pairs for the set filters.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(start) = &self.start_date {
            pairs.push(("startDate", start.clone()));
        }
        if let Some(end) = &self.end_date {
            pairs.push(("endDate", end.clone()));
        }
        pairs
    }
}

/// Port for the workouts service.
#[async_trait]
pub trait WorkoutsApi: Send + Sync {
    /// `GET /users/{userId}/workouts`
    async fn get_workouts(
        &self,
        user_id: &str,
        query: &WorkoutQuery,
    ) -> Result<Vec<Workout>, ApiError>;

    /// `GET /users/{userId}/workouts/{workoutId}?includeItems&includeSets`
    async fn get_workout_detail(
        &self,
        user_id: &str,
        workout_id: &str,
        include_items: bool,
        include_sets: bool,
    ) -> Result<Workout, ApiError>;

    /// `POST /users/{userId}/workouts`
    async fn create_workout(
        &self,
        user_id: &str,
        body: &CreateWorkoutRequest,
    ) -> Result<IdResponse, ApiError>;

    /// `PUT /users/{userId}/workouts/{workoutId}` - status message only.
    async fn update_workout(
        &self,
        user_id: &str,
        workout_id: &str,
        body: &CreateWorkoutRequest,
    ) -> Result<IdResponse, ApiError>;

    /// `POST /users/{userId}/workouts/start`
    async fn start_workout(
        &self,
        user_id: &str,
        body: &StartWorkoutRequest,
    ) -> Result<IdResponse, ApiError>;

    /// `GET /getAllWorkouts`
    async fn get_workout_plans(&self) -> Result<Vec<WorkoutPlan>, ApiError>;

    /// `GET /getWorkout/{planId}`
    async fn get_workout_plan(&self, plan_id: &str) -> Result<WorkoutPlan, ApiError>;

    /// `POST /createWorkout`
    async fn create_workout_plan(
        &self,
        body: &CreateWorkoutPlanRequest,
    ) -> Result<IdResponse, ApiError>;

    /// `GET /users/{userId}/exercises?includeArchived`
    async fn get_exercises(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> Result<Vec<Exercise>, ApiError>;

    /// `POST /users/{userId}/exercises`
    async fn create_exercise(
        &self,
        user_id: &str,
        body: &CreateExerciseRequest,
    ) -> Result<IdResponse, ApiError>;

    /// `POST /users/{userId}/workouts/{workoutId}/items`
    async fn add_workout_item(
        &self,
        user_id: &str,
        workout_id: &str,
        body: &CreateWorkoutItemRequest,
    ) -> Result<IdResponse, ApiError>;

    /// `POST /users/{userId}/workouts/{workoutId}/items/{itemId}/sets`
    async fn add_set(
        &self,
        user_id: &str,
        workout_id: &str,
        item_id: &str,
        body: &CreateSetRequest,
    ) -> Result<IdResponse, ApiError>;

    /// `PUT /users/{userId}/workouts/{workoutId}/items/{itemId}/sets/{setId}` -
    /// status message only.
    async fn update_set(
        &self,
        user_id: &str,
        workout_id: &str,
        item_id: &str,
        set_id: &str,
        body: &UpdateSetRequest,
    ) -> Result<IdResponse, ApiError>;
}
