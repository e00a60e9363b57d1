//! Application layer - Repository, state store and view-model.
//!
//! The repository wraps the service ports in uniform results; the view-model
//! turns intents into repository calls and publishes one `FitnessUiState`
//! snapshot through the store.

pub mod repository;
pub mod state;
pub mod store;
pub mod view_model;

pub use repository::{FitnessRepository, DEFAULT_WORKOUT_FETCH_LIMIT};
pub use state::{
    CreateWorkoutPlanCommand, FitnessUiState, WorkoutSetEntry, WorkoutSetUpdateEntry,
};
pub use store::{StateStore, StateWatcher};
pub use view_model::MainViewModel;
