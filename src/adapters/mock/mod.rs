//! In-memory implementations of the service ports for testing.
//!
//! Both mocks behave like a tiny backend: writes mutate stored users and
//! workouts, reads return them. On top of that they support
//!
//! - error injection per endpoint (every call, or only the nth call)
//! - queued acknowledgement overrides for write endpoints
//! - simulated latency
//! - call recording with arguments and JSON bodies
//!
//! # Example
//!
//! ```ignore
//! let workouts = MockWorkoutsApi::new()
//!     .with_workout(Workout::new("w-1").with_date("2025-01-01"))
//!     .with_failure(MockEndpoint::GetWorkoutPlans, ApiError::status(500, ""));
//!
//! let repo = FitnessRepository::new("kun", Arc::new(workouts.clone()), users);
//! assert_eq!(workouts.call_count(MockEndpoint::GetWorkouts), 0);
//! ```

mod users;
mod workouts;

pub use users::MockUsersApi;
pub use workouts::MockWorkoutsApi;

use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::IdResponse;
use crate::ports::ApiError;

/// Every remote endpoint the mocks can stand in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockEndpoint {
    GetUser,
    UpdateUser,
    GetWorkouts,
    GetWorkoutDetail,
    CreateWorkout,
    UpdateWorkout,
    StartWorkout,
    GetWorkoutPlans,
    GetWorkoutPlan,
    CreateWorkoutPlan,
    GetExercises,
    CreateExercise,
    AddWorkoutItem,
    AddSet,
    UpdateSet,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub endpoint: MockEndpoint,
    /// Path and query arguments, in URL order. Query values render as `key=value`.
    pub args: Vec<String>,
    /// Request body as JSON, for write endpoints.
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Failure {
    Always(ApiError),
    OnCall { nth: usize, error: ApiError },
}

/// Callback run as each call arrives, before any latency or failure.
#[derive(Clone)]
struct CallHook(Arc<dyn Fn(MockEndpoint) + Send + Sync>);

impl std::fmt::Debug for CallHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CallHook")
    }
}

/// Behaviour shared by both mocks: recording, failures, overrides, latency.
#[derive(Debug, Clone, Default)]
struct MockBehavior {
    calls: Arc<Mutex<Vec<MockCall>>>,
    failures: Arc<Mutex<HashMap<MockEndpoint, Vec<Failure>>>>,
    id_responses: Arc<Mutex<HashMap<MockEndpoint, VecDeque<IdResponse>>>>,
    delay: Duration,
    on_call: Option<CallHook>,
}

impl MockBehavior {
    fn set_hook<F>(&mut self, hook: F)
    where
        F: Fn(MockEndpoint) + Send + Sync + 'static,
    {
        self.on_call = Some(CallHook(Arc::new(hook)));
    }

    fn fail(&self, endpoint: MockEndpoint, failure: Failure) {
        self.failures
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push(failure);
    }

    fn queue_id_response(&self, endpoint: MockEndpoint, response: IdResponse) {
        self.id_responses
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(response);
    }

    /// Records the call, waits out the configured latency, then reports any
    /// injected failure for it.
    async fn enter<B: Serialize + Sync + ?Sized>(
        &self,
        endpoint: MockEndpoint,
        args: Vec<String>,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let nth = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(MockCall {
                endpoint,
                args,
                body: body.and_then(|body| serde_json::to_value(body).ok()),
            });
            calls.iter().filter(|call| call.endpoint == endpoint).count()
        };

        if let Some(hook) = &self.on_call {
            (hook.0)(endpoint);
        }

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let failures = self.failures.lock().unwrap();
        let injected = failures.get(&endpoint).and_then(|failures| {
            failures.iter().find_map(|failure| match failure {
                Failure::Always(error) => Some(error.clone()),
                Failure::OnCall { nth: target, error } if *target == nth => Some(error.clone()),
                Failure::OnCall { .. } => None,
            })
        });

        match injected {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn enter_read(&self, endpoint: MockEndpoint, args: Vec<String>) -> Result<(), ApiError> {
        self.enter::<()>(endpoint, args, None).await
    }

    fn next_id_response(&self, endpoint: MockEndpoint) -> Option<IdResponse> {
        self.id_responses
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
    }

    fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_to(&self, endpoint: MockEndpoint) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .cloned()
            .collect()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

fn flag(name: &str, value: bool) -> String {
    format!("{}={}", name, value)
}

fn not_found(what: &str, id: &str) -> ApiError {
    ApiError::status(404, format!("{} {} not found", what, id))
}
