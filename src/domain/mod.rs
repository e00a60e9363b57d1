//! Domain layer - entities and request payloads of the fitness services.
//!
//! The users and workouts services own the data of record; these types are
//! the client-side view of it. Every entity decodes leniently:
//!
//! - Unknown fields are ignored
//! - Absent optional fields decode to `None` and are omitted again on encode
//! - Server timestamps are kept as opaque JSON values
//!
//! ## Modules
//!
//! - `user` - User profile and profile edits
//! - `exercise` - Exercise catalog entries
//! - `workout` - Logged workouts, their items and sets
//! - `plan` - Reusable workout plans (templates)
//! - `responses` - Acknowledgement payloads returned by write endpoints

pub mod exercise;
pub mod plan;
pub mod responses;
pub mod user;
pub mod workout;

pub use exercise::{CreateExerciseRequest, Exercise};
pub use plan::{CreateWorkoutPlanRequest, WorkoutPlan};
pub use responses::IdResponse;
pub use user::{UpdateUserRequest, User};
pub use workout::{
    upsert_sorted_by_date, CreateSetRequest, CreateWorkoutItemRequest, CreateWorkoutRequest,
    StartWorkoutRequest, UpdateSetRequest, Workout, WorkoutExerciseRequest, WorkoutItem,
    WorkoutSet, WorkoutSetRequest,
};
