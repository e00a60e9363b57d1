//! UI state snapshot and the form entries that feed mutating intents.

use crate::domain::{
    CreateSetRequest, Exercise, UpdateSetRequest, User, Workout, WorkoutPlan,
};

/// Everything the presentation layer renders, published as one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitnessUiState {
    pub user: Option<User>,
    /// Most recent first.
    pub workouts: Vec<Workout>,
    pub workout_plans: Vec<WorkoutPlan>,
    pub exercises: Vec<Exercise>,

    /// Workout the user asked for; set before its detail arrives.
    pub selected_workout_id: Option<String>,
    /// Last successfully fetched detail.
    pub selected_workout: Option<Workout>,

    /// One-shot markers, consumed by the presentation layer.
    pub recently_created_workout_id: Option<String>,
    pub recently_created_workout_plan_id: Option<String>,
    pub recently_completed_workout_id: Option<String>,

    /// Workout currently being performed and the plan it came from.
    pub active_workout_id: Option<String>,
    pub active_workout_plan_id: Option<String>,

    pub is_loading: bool,
    pub is_action_running: bool,
    pub error_message: Option<String>,
    pub info_message: Option<String>,
}

impl FitnessUiState {
    /// Display name of a catalog exercise.
    pub fn exercise_name(&self, exercise_id: &str) -> Option<String> {
        self.exercises
            .iter()
            .find(|exercise| exercise.id == exercise_id)
            .map(|exercise| exercise.name.clone())
    }

    /// Workout from the list by id.
    pub fn workout(&self, workout_id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|workout| workout.id == workout_id)
    }

    /// True while any network work is in flight.
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_action_running
    }
}

/// A new set typed into the workout log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutSetEntry {
    pub item_id: String,
    pub reps: i32,
    pub weight: Option<f64>,
    pub rir: Option<f64>,
    pub rpe: Option<f64>,
    pub notes: Option<String>,
    pub is_pr: Option<bool>,
}

impl WorkoutSetEntry {
    pub fn new(item_id: impl Into<String>, reps: i32) -> Self {
        Self {
            item_id: item_id.into(),
            reps,
            ..Default::default()
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn to_request(&self) -> CreateSetRequest {
        CreateSetRequest {
            reps: self.reps,
            weight: self.weight,
            rir: self.rir,
            rpe: self.rpe,
            notes: self.notes.clone(),
            is_pr: self.is_pr,
        }
    }
}

/// An edit to an existing set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutSetUpdateEntry {
    pub item_id: String,
    pub set_id: String,
    pub reps: i32,
    pub weight: Option<f64>,
    pub rir: Option<f64>,
    pub rpe: Option<f64>,
    pub notes: Option<String>,
    pub is_pr: Option<bool>,
}

impl WorkoutSetUpdateEntry {
    pub fn new(item_id: impl Into<String>, set_id: impl Into<String>, reps: i32) -> Self {
        Self {
            item_id: item_id.into(),
            set_id: set_id.into(),
            reps,
            ..Default::default()
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn to_request(&self) -> UpdateSetRequest {
        UpdateSetRequest {
            reps: Some(self.reps),
            weight: self.weight,
            rir: self.rir,
            rpe: self.rpe,
            notes: self.notes.clone(),
            is_pr: self.is_pr,
        }
    }
}

/// Form input for a new workout plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateWorkoutPlanCommand {
    pub name: String,
    pub description: Option<String>,
    pub exercises: Vec<String>,
    pub equipment: Vec<String>,
    pub muscle_groups: Vec<String>,
    pub number_of_exercises: Option<i32>,
    pub sets: Option<i32>,
    pub plan_type: Option<String>,
}

impl CreateWorkoutPlanCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_muscle_groups(mut self, muscle_groups: Vec<String>) -> Self {
        self.muscle_groups = muscle_groups;
        self
    }

    pub fn with_exercises(mut self, exercises: Vec<String>) -> Self {
        self.exercises = exercises;
        self
    }
}
