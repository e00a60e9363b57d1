//! Adapters - Implementations of port interfaces.
//!
//! - `http` - `reqwest` clients for the users and workouts services
//! - `mock` - In-memory services for tests and offline runs

pub mod http;
pub mod mock;

pub use http::{ApiHttpClient, HttpUsersApi, HttpWorkoutsApi};
pub use mock::{MockCall, MockEndpoint, MockUsersApi, MockWorkoutsApi};
