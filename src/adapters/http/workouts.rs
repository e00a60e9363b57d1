//! HTTP adapter for the workouts service.

use async_trait::async_trait;

use super::client::ApiHttpClient;
use crate::config::ApiConfig;
use crate::domain::{
    CreateExerciseRequest, CreateSetRequest, CreateWorkoutItemRequest, CreateWorkoutPlanRequest,
    CreateWorkoutRequest, Exercise, IdResponse, StartWorkoutRequest, UpdateSetRequest, Workout,
    WorkoutPlan,
};
use crate::ports::{ApiError, WorkoutQuery, WorkoutsApi};

/// `WorkoutsApi` over the workouts REST service.
#[derive(Debug, Clone)]
pub struct HttpWorkoutsApi {
    http: ApiHttpClient,
}

impl HttpWorkoutsApi {
    pub fn new(http: ApiHttpClient) -> Self {
        Self { http }
    }

    /// Builds the adapter from the service configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(ApiHttpClient::new(
            &config.workouts_base_url,
            config.timeout(),
        )?))
    }
}

#[async_trait]
impl WorkoutsApi for HttpWorkoutsApi {
    async fn get_workouts(
        &self,
        user_id: &str,
        query: &WorkoutQuery,
    ) -> Result<Vec<Workout>, ApiError> {
        self.http
            .get(&["users", user_id, "workouts"], &query.to_pairs())
            .await
    }

    async fn get_workout_detail(
        &self,
        user_id: &str,
        workout_id: &str,
        include_items: bool,
        include_sets: bool,
    ) -> Result<Workout, ApiError> {
        let query = [
            ("includeItems", include_items.to_string()),
            ("includeSets", include_sets.to_string()),
        ];
        self.http
            .get(&["users", user_id, "workouts", workout_id], &query)
            .await
    }

    async fn create_workout(
        &self,
        user_id: &str,
        body: &CreateWorkoutRequest,
    ) -> Result<IdResponse, ApiError> {
        self.http.post(&["users", user_id, "workouts"], body).await
    }

    async fn update_workout(
        &self,
        user_id: &str,
        workout_id: &str,
        body: &CreateWorkoutRequest,
    ) -> Result<IdResponse, ApiError> {
        self.http
            .put(&["users", user_id, "workouts", workout_id], body)
            .await
    }

    async fn start_workout(
        &self,
        user_id: &str,
        body: &StartWorkoutRequest,
    ) -> Result<IdResponse, ApiError> {
        self.http
            .post(&["users", user_id, "workouts", "start"], body)
            .await
    }

    async fn get_workout_plans(&self) -> Result<Vec<WorkoutPlan>, ApiError> {
        self.http.get(&["getAllWorkouts"], &[]).await
    }

    async fn get_workout_plan(&self, plan_id: &str) -> Result<WorkoutPlan, ApiError> {
        self.http.get(&["getWorkout", plan_id], &[]).await
    }

    async fn create_workout_plan(
        &self,
        body: &CreateWorkoutPlanRequest,
    ) -> Result<IdResponse, ApiError> {
        self.http.post(&["createWorkout"], body).await
    }

    async fn get_exercises(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> Result<Vec<Exercise>, ApiError> {
        let query = [("includeArchived", include_archived.to_string())];
        self.http
            .get(&["users", user_id, "exercises"], &query)
            .await
    }

    async fn create_exercise(
        &self,
        user_id: &str,
        body: &CreateExerciseRequest,
    ) -> Result<IdResponse, ApiError> {
        self.http.post(&["users", user_id, "exercises"], body).await
    }

    async fn add_workout_item(
        &self,
        user_id: &str,
        workout_id: &str,
        body: &CreateWorkoutItemRequest,
    ) -> Result<IdResponse, ApiError> {
        self.http
            .post(&["users", user_id, "workouts", workout_id, "items"], body)
            .await
    }

    async fn add_set(
        &self,
        user_id: &str,
        workout_id: &str,
        item_id: &str,
        body: &CreateSetRequest,
    ) -> Result<IdResponse, ApiError> {
        self.http
            .post(
                &["users", user_id, "workouts", workout_id, "items", item_id, "sets"],
                body,
            )
            .await
    }

    async fn update_set(
        &self,
        user_id: &str,
        workout_id: &str,
        item_id: &str,
        set_id: &str,
        body: &UpdateSetRequest,
    ) -> Result<IdResponse, ApiError> {
        self.http
            .put(
                &[
                    "users", user_id, "workouts", workout_id, "items", item_id, "sets", set_id,
                ],
                body,
            )
            .await
    }
}
