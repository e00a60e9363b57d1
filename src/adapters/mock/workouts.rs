//! Mock workouts service.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{flag, not_found, Failure, MockBehavior, MockCall, MockEndpoint};
use crate::domain::{
    CreateExerciseRequest, CreateSetRequest, CreateWorkoutItemRequest, CreateWorkoutPlanRequest,
    CreateWorkoutRequest, Exercise, IdResponse, StartWorkoutRequest, UpdateSetRequest, Workout,
    WorkoutItem, WorkoutPlan, WorkoutSet,
};
use crate::ports::{ApiError, WorkoutQuery, WorkoutsApi};

#[derive(Debug, Default)]
struct Backend {
    workouts: Vec<Workout>,
    plans: Vec<WorkoutPlan>,
    exercises: Vec<Exercise>,
}

impl Backend {
    fn workout_mut(&mut self, workout_id: &str) -> Result<&mut Workout, ApiError> {
        self.workouts
            .iter_mut()
            .find(|workout| workout.id == workout_id)
            .ok_or_else(|| not_found("Workout", workout_id))
    }
}

/// In-memory workouts service.
///
/// The list endpoint returns workouts most recent first and without their
/// items, like the real service; the detail endpoint returns everything.
#[derive(Debug, Clone, Default)]
pub struct MockWorkoutsApi {
    backend: Arc<Mutex<Backend>>,
    next_id: Arc<AtomicU64>,
    behavior: MockBehavior,
}

impl MockWorkoutsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a workout, items and sets included.
    pub fn with_workout(self, workout: Workout) -> Self {
        self.backend.lock().unwrap().workouts.push(workout);
        self
    }

    pub fn with_plan(self, plan: WorkoutPlan) -> Self {
        self.backend.lock().unwrap().plans.push(plan);
        self
    }

    pub fn with_exercise(self, exercise: Exercise) -> Self {
        self.backend.lock().unwrap().exercises.push(exercise);
        self
    }

    /// Fails every call to `endpoint` with `error`.
    pub fn with_failure(self, endpoint: MockEndpoint, error: ApiError) -> Self {
        self.behavior.fail(endpoint, Failure::Always(error));
        self
    }

    /// Fails only the `nth` (1-based) call to `endpoint`.
    pub fn with_failure_on_call(self, endpoint: MockEndpoint, nth: usize, error: ApiError) -> Self {
        self.behavior.fail(endpoint, Failure::OnCall { nth, error });
        self
    }

    /// Queues an acknowledgement returned instead of the generated one.
    ///
    /// For create endpoints the returned id (if any) is also the id the new
    /// record is stored under.
    pub fn with_id_response(self, endpoint: MockEndpoint, response: IdResponse) -> Self {
        self.behavior.queue_id_response(endpoint, response);
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.behavior.delay = delay;
        self
    }

    /// Runs `hook` as each call arrives, before latency and failures apply.
    pub fn on_call<F>(mut self, hook: F) -> Self
    where
        F: Fn(MockEndpoint) + Send + Sync + 'static,
    {
        self.behavior.set_hook(hook);
        self
    }

    /// Stored workout, items and sets included.
    pub fn workout(&self, workout_id: &str) -> Option<Workout> {
        self.backend
            .lock()
            .unwrap()
            .workouts
            .iter()
            .find(|workout| workout.id == workout_id)
            .cloned()
    }

    pub fn workout_count(&self) -> usize {
        self.backend.lock().unwrap().workouts.len()
    }

    pub fn plans(&self) -> Vec<WorkoutPlan> {
        self.backend.lock().unwrap().plans.clone()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.behavior.calls()
    }

    pub fn calls_to(&self, endpoint: MockEndpoint) -> Vec<MockCall> {
        self.behavior.calls_to(endpoint)
    }

    pub fn call_count(&self, endpoint: MockEndpoint) -> usize {
        self.calls_to(endpoint).len()
    }

    pub fn clear_calls(&self) {
        self.behavior.clear_calls();
    }

    /// Queued override, or a fresh `{prefix}-{n}` id.
    fn acknowledge(&self, endpoint: MockEndpoint, prefix: &str) -> IdResponse {
        self.behavior.next_id_response(endpoint).unwrap_or_else(|| {
            let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            IdResponse::created(format!("{}-{}", prefix, n))
        })
    }

    fn generated_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", prefix, n)
    }

    fn workout_from_request(&self, id: &str, request: &CreateWorkoutRequest) -> Workout {
        let mut workout = Workout::new(id);
        workout.date = request.date.clone();
        workout.start_time = request.start_time.clone();
        workout.end_time = request.end_time.clone();
        workout.notes = request.notes.clone();
        workout.timezone = request.timezone.clone();
        workout.items = request
            .exercises
            .iter()
            .map(|exercise| {
                let mut item = WorkoutItem::new(self.generated_id("item"));
                item.exercise_id = exercise.exercise_id.clone();
                item.name = exercise.name.clone();
                item.notes = exercise.notes.clone();
                item.order = exercise.order;
                item.sets = exercise
                    .sets
                    .iter()
                    .map(|set| WorkoutSet {
                        id: set.id.clone().unwrap_or_else(|| self.generated_id("set")),
                        reps: set.reps,
                        weight: set.weight,
                        rir: set.rir,
                        rpe: set.rpe,
                        is_pr: set.is_pr,
                        notes: set.notes.clone(),
                        created_at: None,
                        updated_at: None,
                    })
                    .collect();
                item
            })
            .collect();
        workout
    }

    fn store_workout(&self, response: &IdResponse, request: &CreateWorkoutRequest) {
        if let Some(id) = response.usable_id() {
            let workout = self.workout_from_request(id, request);
            self.backend.lock().unwrap().workouts.push(workout);
        }
    }
}

#[async_trait]
impl WorkoutsApi for MockWorkoutsApi {
    async fn get_workouts(
        &self,
        user_id: &str,
        query: &WorkoutQuery,
    ) -> Result<Vec<Workout>, ApiError> {
        let mut args = vec![user_id.to_string()];
        args.extend(
            query
                .to_pairs()
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, value)),
        );
        self.behavior.enter_read(MockEndpoint::GetWorkouts, args).await?;

        let backend = self.backend.lock().unwrap();
        let mut workouts: Vec<Workout> = backend
            .workouts
            .iter()
            .filter(|workout| {
                let date = workout.date_key();
                query.start_date.as_deref().map_or(true, |start| date >= start)
                    && query.end_date.as_deref().map_or(true, |end| date <= end)
            })
            .map(|workout| Workout {
                items: Vec::new(),
                ..workout.clone()
            })
            .collect();
        workouts.sort_by(|a, b| b.date_key().cmp(a.date_key()));
        if let Some(limit) = query.limit {
            workouts.truncate(limit as usize);
        }
        Ok(workouts)
    }

    async fn get_workout_detail(
        &self,
        user_id: &str,
        workout_id: &str,
        include_items: bool,
        include_sets: bool,
    ) -> Result<Workout, ApiError> {
        let args = vec![
            user_id.to_string(),
            workout_id.to_string(),
            flag("includeItems", include_items),
            flag("includeSets", include_sets),
        ];
        self.behavior.enter_read(MockEndpoint::GetWorkoutDetail, args).await?;

        let mut backend = self.backend.lock().unwrap();
        let mut workout = backend.workout_mut(workout_id)?.clone();
        if !include_items {
            workout.items.clear();
        } else if !include_sets {
            workout.items.iter_mut().for_each(|item| item.sets.clear());
        }
        Ok(workout)
    }

    async fn create_workout(
        &self,
        user_id: &str,
        body: &CreateWorkoutRequest,
    ) -> Result<IdResponse, ApiError> {
        self.behavior
            .enter(MockEndpoint::CreateWorkout, vec![user_id.to_string()], Some(body))
            .await?;

        let response = self.acknowledge(MockEndpoint::CreateWorkout, "workout");
        self.store_workout(&response, body);
        Ok(response)
    }

    async fn update_workout(
        &self,
        user_id: &str,
        workout_id: &str,
        body: &CreateWorkoutRequest,
    ) -> Result<IdResponse, ApiError> {
        let args = vec![user_id.to_string(), workout_id.to_string()];
        self.behavior
            .enter(MockEndpoint::UpdateWorkout, args, Some(body))
            .await?;

        let mut backend = self.backend.lock().unwrap();
        let workout = backend.workout_mut(workout_id)?;
        if body.date.is_some() {
            workout.date = body.date.clone();
        }
        if body.start_time.is_some() {
            workout.start_time = body.start_time.clone();
        }
        if body.end_time.is_some() {
            workout.end_time = body.end_time.clone();
        }
        if body.notes.is_some() {
            workout.notes = body.notes.clone();
        }
        if body.timezone.is_some() {
            workout.timezone = body.timezone.clone();
        }
        drop(backend);

        Ok(self
            .behavior
            .next_id_response(MockEndpoint::UpdateWorkout)
            .unwrap_or_else(|| IdResponse::message(format!("Workout {} updated", workout_id))))
    }

    async fn start_workout(
        &self,
        user_id: &str,
        body: &StartWorkoutRequest,
    ) -> Result<IdResponse, ApiError> {
        self.behavior
            .enter(MockEndpoint::StartWorkout, vec![user_id.to_string()], Some(body))
            .await?;

        let plan = self
            .backend
            .lock()
            .unwrap()
            .plans
            .iter()
            .find(|plan| plan.id == body.workout_id)
            .cloned()
            .ok_or_else(|| not_found("Workout plan", &body.workout_id))?;

        let mut request =
            plan.to_workout_request(body.date.clone().unwrap_or_default(), body.timezone.clone());
        if body.notes.is_some() {
            request.notes = body.notes.clone();
        }

        let response = self.acknowledge(MockEndpoint::StartWorkout, "workout");
        self.store_workout(&response, &request);
        Ok(response)
    }

    async fn get_workout_plans(&self) -> Result<Vec<WorkoutPlan>, ApiError> {
        self.behavior
            .enter_read(MockEndpoint::GetWorkoutPlans, Vec::new())
            .await?;
        Ok(self.plans())
    }

    async fn get_workout_plan(&self, plan_id: &str) -> Result<WorkoutPlan, ApiError> {
        self.behavior
            .enter_read(MockEndpoint::GetWorkoutPlan, vec![plan_id.to_string()])
            .await?;

        self.plans()
            .into_iter()
            .find(|plan| plan.id == plan_id)
            .ok_or_else(|| not_found("Workout plan", plan_id))
    }

    async fn create_workout_plan(
        &self,
        body: &CreateWorkoutPlanRequest,
    ) -> Result<IdResponse, ApiError> {
        self.behavior
            .enter(MockEndpoint::CreateWorkoutPlan, Vec::new(), Some(body))
            .await?;

        let response = self.acknowledge(MockEndpoint::CreateWorkoutPlan, "plan");
        if let Some(id) = response.usable_id() {
            let mut plan = WorkoutPlan::new(id).with_name(body.name.clone());
            plan.description = body.description.clone();
            plan.sets = body.sets;
            plan.plan_type = body.plan_type.clone();
            plan.number_of_exercises = body.number_of_exercises;
            plan.muscle_group = Some(Value::from(body.muscle_groups.clone()));
            plan.exercises = Some(Value::from(body.exercises.clone()));
            plan.equipment = Some(Value::from(body.equipment.clone()));
            plan.is_default = Some(body.default);
            self.backend.lock().unwrap().plans.push(plan);
        }
        Ok(response)
    }

    async fn get_exercises(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> Result<Vec<Exercise>, ApiError> {
        let args = vec![user_id.to_string(), flag("includeArchived", include_archived)];
        self.behavior.enter_read(MockEndpoint::GetExercises, args).await?;

        Ok(self
            .backend
            .lock()
            .unwrap()
            .exercises
            .iter()
            .filter(|exercise| include_archived || !exercise.archived)
            .cloned()
            .collect())
    }

    async fn create_exercise(
        &self,
        user_id: &str,
        body: &CreateExerciseRequest,
    ) -> Result<IdResponse, ApiError> {
        self.behavior
            .enter(MockEndpoint::CreateExercise, vec![user_id.to_string()], Some(body))
            .await?;

        let response = self.acknowledge(MockEndpoint::CreateExercise, "exercise");
        if let Some(id) = response.usable_id() {
            let mut exercise = Exercise::new(id, body.name.clone());
            exercise.muscle_groups = body.muscle_groups.clone();
            exercise.equipment = body.equipment.clone();
            exercise.notes = body.notes.clone();
            exercise.archived = body.archived;
            self.backend.lock().unwrap().exercises.push(exercise);
        }
        Ok(response)
    }

    async fn add_workout_item(
        &self,
        user_id: &str,
        workout_id: &str,
        body: &CreateWorkoutItemRequest,
    ) -> Result<IdResponse, ApiError> {
        let args = vec![user_id.to_string(), workout_id.to_string()];
        self.behavior
            .enter(MockEndpoint::AddWorkoutItem, args, Some(body))
            .await?;

        if self.workout(workout_id).is_none() {
            return Err(not_found("Workout", workout_id));
        }

        let response = self.acknowledge(MockEndpoint::AddWorkoutItem, "item");
        if let Some(id) = response.usable_id() {
            let mut item = WorkoutItem::new(id);
            item.exercise_id = Some(body.exercise_id.clone());
            item.name = body.name.clone();
            item.notes = body.notes.clone();
            item.order = body.order;
            self.backend
                .lock()
                .unwrap()
                .workout_mut(workout_id)?
                .items
                .push(item);
        }
        Ok(response)
    }

    async fn add_set(
        &self,
        user_id: &str,
        workout_id: &str,
        item_id: &str,
        body: &CreateSetRequest,
    ) -> Result<IdResponse, ApiError> {
        let args = vec![user_id.to_string(), workout_id.to_string(), item_id.to_string()];
        self.behavior.enter(MockEndpoint::AddSet, args, Some(body)).await?;

        let workout = self
            .workout(workout_id)
            .ok_or_else(|| not_found("Workout", workout_id))?;
        if workout.item(item_id).is_none() {
            return Err(not_found("Workout item", item_id));
        }

        let response = self.acknowledge(MockEndpoint::AddSet, "set");
        if let Some(id) = response.usable_id() {
            let set = WorkoutSet {
                id: id.to_string(),
                reps: Some(body.reps),
                weight: body.weight,
                rir: body.rir,
                rpe: body.rpe,
                is_pr: body.is_pr,
                notes: body.notes.clone(),
                created_at: None,
                updated_at: None,
            };
            let mut backend = self.backend.lock().unwrap();
            if let Some(item) = backend
                .workout_mut(workout_id)?
                .items
                .iter_mut()
                .find(|item| item.id == item_id)
            {
                item.sets.push(set);
            }
        }
        Ok(response)
    }

    async fn update_set(
        &self,
        user_id: &str,
        workout_id: &str,
        item_id: &str,
        set_id: &str,
        body: &UpdateSetRequest,
    ) -> Result<IdResponse, ApiError> {
        let args = vec![
            user_id.to_string(),
            workout_id.to_string(),
            item_id.to_string(),
            set_id.to_string(),
        ];
        self.behavior.enter(MockEndpoint::UpdateSet, args, Some(body)).await?;

        let mut backend = self.backend.lock().unwrap();
        let set = backend
            .workout_mut(workout_id)?
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| not_found("Workout item", item_id))?
            .sets
            .iter_mut()
            .find(|set| set.id == set_id)
            .ok_or_else(|| not_found("Set", set_id))?;

        if body.reps.is_some() {
            set.reps = body.reps;
        }
        if body.weight.is_some() {
            set.weight = body.weight;
        }
        if body.rir.is_some() {
            set.rir = body.rir;
        }
        if body.rpe.is_some() {
            set.rpe = body.rpe;
        }
        if body.notes.is_some() {
            set.notes = body.notes.clone();
        }
        if body.is_pr.is_some() {
            set.is_pr = body.is_pr;
        }
        drop(backend);

        Ok(self
            .behavior
            .next_id_response(MockEndpoint::UpdateSet)
            .unwrap_or_else(|| IdResponse::message(format!("Set {} updated", set_id))))
    }
}
