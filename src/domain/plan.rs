//! Workout plans - reusable templates, distinct from executed workouts.
//!
//! Plans are authored loosely server-side: `muscle_group`, `equipment` and
//! `exercises` may hold a single string, a list of strings, or (for
//! exercises) a list of objects. They are kept as raw JSON and normalized on
//! read through the accessors below.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::workout::{CreateWorkoutRequest, WorkoutExerciseRequest};

/// A workout plan (template).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Target number of sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<i32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
    #[serde(rename = "muscle_group", default, skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<Value>,
    #[serde(
        rename = "number_of_exercises",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub number_of_exercises: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Value>,
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
}

impl WorkoutPlan {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            sets: None,
            plan_type: None,
            muscle_group: None,
            number_of_exercises: None,
            description: None,
            exercises: None,
            equipment: None,
            is_default: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_exercises(mut self, exercises: Value) -> Self {
        self.exercises = Some(exercises);
        self
    }

    /// Muscle groups as a clean list.
    pub fn muscle_groups(&self) -> Vec<String> {
        string_list(self.muscle_group.as_ref())
    }

    /// Equipment names as a clean list.
    pub fn equipment_names(&self) -> Vec<String> {
        string_list(self.equipment.as_ref())
    }

    /// Exercise entries of the plan as workout exercise requests.
    ///
    /// Object entries are read from `exerciseId`/`exercise_id`/`id` and
    /// `name`/`exerciseName`/`title`; string entries become a named exercise.
    /// Entries carrying neither an id nor a name are skipped. `order` falls
    /// back to the entry's position in the list.
    pub fn exercise_requests(&self) -> Vec<WorkoutExerciseRequest> {
        let Some(Value::Array(entries)) = self.exercises.as_ref() else {
            return Vec::new();
        };

        entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| exercise_request(index, entry))
            .collect()
    }

    /// Derives the request that creates a workout from this plan.
    pub fn to_workout_request(
        &self,
        date: impl Into<String>,
        timezone: Option<String>,
    ) -> CreateWorkoutRequest {
        CreateWorkoutRequest::new(date)
            .with_timezone(timezone)
            .with_notes(non_blank(self.name.as_deref()))
            .with_plan(self.id.clone())
            .with_exercises(self.exercise_requests())
    }
}

fn exercise_request(index: usize, entry: &Value) -> Option<WorkoutExerciseRequest> {
    let position = i32::try_from(index).ok();

    match entry {
        Value::Object(fields) => {
            let exercise_id = first_text(fields, &["exerciseId", "exercise_id", "id"]);
            let name = first_text(fields, &["name", "exerciseName", "title"]);
            if exercise_id.is_none() && name.is_none() {
                return None;
            }

            let order = fields
                .get("order")
                .and_then(Value::as_i64)
                .and_then(|order| i32::try_from(order).ok())
                .or(position);

            Some(WorkoutExerciseRequest {
                exercise_id,
                name,
                notes: first_text(fields, &["notes"]),
                order,
                sets: Vec::new(),
            })
        }
        Value::String(name) if !name.trim().is_empty() => Some(WorkoutExerciseRequest {
            name: Some(name.trim().to_string()),
            order: position,
            ..Default::default()
        }),
        _ => None,
    }
}

/// First non-blank value among `keys`, numbers rendered as text.
fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(text) => non_blank(Some(text.as_str())),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(text)) => text
            .split(',')
            .filter_map(|part| non_blank(Some(part)))
            .collect(),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|value| non_blank(value.as_str()))
            .collect(),
        _ => Vec::new(),
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Body of `POST /createWorkout` (creates a plan).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkoutPlanRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(rename = "muscle_group", default)]
    pub muscle_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_exercises: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<i32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
    /// Only the backend seeds default plans; clients always send `false`.
    #[serde(default)]
    pub default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn muscle_group_accepts_string_or_list() {
        let mut plan = WorkoutPlan::new("p");
        plan.muscle_group = Some(json!("Chest, Triceps ,"));
        assert_eq!(plan.muscle_groups(), vec!["Chest", "Triceps"]);

        plan.muscle_group = Some(json!(["Legs", " ", "Glutes"]));
        assert_eq!(plan.muscle_groups(), vec!["Legs", "Glutes"]);
    }

    #[test]
    fn exercise_requests_read_objects_and_strings() {
        let plan = WorkoutPlan::new("p").with_exercises(json!([
            {"exerciseId": "ex-1", "name": "Squat", "notes": "deep"},
            {"exercise_id": 42, "title": "Row", "order": 7},
            "Plank",
            {"notes": "orphan"},
            17
        ]));

        let requests = plan.exercise_requests();
        assert_eq!(requests.len(), 3);

        assert_eq!(requests[0].exercise_id.as_deref(), Some("ex-1"));
        assert_eq!(requests[0].notes.as_deref(), Some("deep"));
        assert_eq!(requests[0].order, Some(0));

        assert_eq!(requests[1].exercise_id.as_deref(), Some("42"));
        assert_eq!(requests[1].name.as_deref(), Some("Row"));
        assert_eq!(requests[1].order, Some(7));

        assert_eq!(requests[2].name.as_deref(), Some("Plank"));
        assert!(requests[2].exercise_id.is_none());
        assert_eq!(requests[2].order, Some(2));
    }

    #[test]
    fn non_list_exercises_yield_nothing() {
        let plan = WorkoutPlan::new("p").with_exercises(json!({"a": 1}));
        assert!(plan.exercise_requests().is_empty());
    }

    #[test]
    fn workout_request_references_plan() {
        let plan = WorkoutPlan::new("plan-1")
            .with_name("Push Day")
            .with_exercises(json!(["Bench"]));

        let request = plan.to_workout_request("2025-03-01", Some("UTC".to_string()));
        assert_eq!(request.date.as_deref(), Some("2025-03-01"));
        assert_eq!(request.workout_id.as_deref(), Some("plan-1"));
        assert_eq!(request.notes.as_deref(), Some("Push Day"));
        assert_eq!(request.timezone.as_deref(), Some("UTC"));
        assert_eq!(request.exercises.len(), 1);
    }

    #[test]
    fn plan_decodes_snake_case_fields() {
        let plan: WorkoutPlan = serde_json::from_value(json!({
            "id": "p1",
            "name": "Full Body",
            "type": "strength",
            "number_of_exercises": 5,
            "default": true
        }))
        .unwrap();

        assert_eq!(plan.plan_type.as_deref(), Some("strength"));
        assert_eq!(plan.number_of_exercises, Some(5));
        assert_eq!(plan.is_default, Some(true));
    }

    #[test]
    fn create_request_encodes_backend_field_names() {
        let request = CreateWorkoutPlanRequest {
            name: "Pull".to_string(),
            muscle_groups: vec!["Back".to_string()],
            plan_type: Some("hypertrophy".to_string()),
            ..Default::default()
        };

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({
                "name": "Pull",
                "exercises": [],
                "equipment": [],
                "muscle_group": ["Back"],
                "type": "hypertrophy",
                "default": false
            })
        );
    }
}
