//! Logged workouts, their items and sets, and the payloads that create them.
//!
//! A workout is only ever mutated server-side: the client appends items and
//! sets through the write endpoints and then re-fetches the detail. The
//! helpers here keep the client's list of workouts normalized against a
//! freshly fetched detail.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A logged workout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    /// ISO date (`YYYY-MM-DD`); sorting compares it lexically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub items: Vec<WorkoutItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
}

impl Workout {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: None,
            start_time: None,
            end_time: None,
            notes: None,
            timezone: None,
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_item(mut self, item: WorkoutItem) -> Self {
        self.items.push(item);
        self
    }

    /// Sort key used for date ordering. Undated workouts sort last.
    pub fn date_key(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    /// Looks up an item by id.
    pub fn item(&self, item_id: &str) -> Option<&WorkoutItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Items ordered by their `order` field.
    ///
    /// The sort is stable, so items sharing an order (or lacking one) keep
    /// the order the server returned them in. Items without an order go last.
    pub fn ordered_items(&self) -> Vec<&WorkoutItem> {
        let mut items: Vec<&WorkoutItem> = self.items.iter().collect();
        items.sort_by_key(|item| (item.order.is_none(), item.order.unwrap_or_default()));
        items
    }

    /// Total number of sets across all items.
    pub fn set_count(&self) -> usize {
        self.items.iter().map(|item| item.sets.len()).sum()
    }
}

/// One exercise instance within a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<String>,
    /// Denormalized exercise name, captured when the item was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
}

impl WorkoutItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exercise_id: None,
            name: None,
            notes: None,
            order: None,
            sets: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_exercise(mut self, exercise_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.exercise_id = Some(exercise_id.into());
        self.name = Some(name.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_set(mut self, set: WorkoutSet) -> Self {
        self.sets.push(set);
        self
    }
}

/// One repetition block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Reps in reserve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rir: Option<f64>,
    /// Rate of perceived exertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    #[serde(rename = "isPR", default, skip_serializing_if = "Option::is_none")]
    pub is_pr: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
}

impl WorkoutSet {
    pub fn new(id: impl Into<String>, reps: i32) -> Self {
        Self {
            id: id.into(),
            reps: Some(reps),
            weight: None,
            rir: None,
            rpe: None,
            is_pr: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Whether this set was flagged as a personal record.
    pub fn is_personal_record(&self) -> bool {
        self.is_pr.unwrap_or(false)
    }
}

/// Inserts `workout` into `workouts`, replacing any entry with the same id,
/// then sorts the list by date, most recent first.
///
/// A replaced entry keeps its position before sorting, and the sort is stable,
/// so workouts sharing a date keep their relative order.
pub fn upsert_sorted_by_date(workouts: &mut Vec<Workout>, workout: Workout) {
    match workouts.iter_mut().find(|existing| existing.id == workout.id) {
        Some(existing) => *existing = workout,
        None => workouts.push(workout),
    }
    workouts.sort_by(|a, b| b.date_key().cmp(a.date_key()));
}

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /users/{userId}/workouts` and `PUT /users/{userId}/workouts/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Plan this workout was started from.
    #[serde(rename = "workout_id", default, skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<WorkoutExerciseRequest>,
}

impl CreateWorkoutRequest {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Default::default()
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_timezone(mut self, timezone: Option<String>) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_times(mut self, start_time: Option<String>, end_time: Option<String>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn with_plan(mut self, plan_id: impl Into<String>) -> Self {
        self.workout_id = Some(plan_id.into());
        self
    }

    pub fn with_exercises(mut self, exercises: Vec<WorkoutExerciseRequest>) -> Self {
        self.exercises = exercises;
        self
    }
}

/// An exercise nested in a workout creation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExerciseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<WorkoutSetRequest>,
}

/// A set nested in a workout creation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSetRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rir: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    #[serde(rename = "isPR", default, skip_serializing_if = "Option::is_none")]
    pub is_pr: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /users/{userId}/workouts/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartWorkoutRequest {
    #[serde(rename = "workout_id")]
    pub workout_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /users/{userId}/workouts/{workoutId}/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutItemRequest {
    pub exercise_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// Body of `POST .../items/{itemId}/sets`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetRequest {
    pub reps: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rir: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "isPR", default, skip_serializing_if = "Option::is_none")]
    pub is_pr: Option<bool>,
}

/// Body of `PUT .../items/{itemId}/sets/{setId}`. Absent fields are left as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSetRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rir: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "isPR", default, skip_serializing_if = "Option::is_none")]
    pub is_pr: Option<bool>,
}
