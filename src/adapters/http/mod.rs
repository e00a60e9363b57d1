//! HTTP adapters - `reqwest` clients for the users and workouts services.

mod client;
mod users;
mod workouts;

pub use client::{ApiHttpClient, ServerErrorBody};
pub use users::HttpUsersApi;
pub use workouts::HttpWorkoutsApi;
