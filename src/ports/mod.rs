//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application layer and the remote services. Adapters implement these
//! ports.
//!
//! ## Remote Service Ports
//!
//! - `UsersApi` - User profile reads and edits
//! - `WorkoutsApi` - Workouts, items, sets, exercises, and workout plans
//!
//! Both report failures as `ApiError`.

mod api_error;
mod users_api;
mod workouts_api;

pub use api_error::ApiError;
pub use users_api::UsersApi;
pub use workouts_api::{WorkoutQuery, WorkoutsApi};
