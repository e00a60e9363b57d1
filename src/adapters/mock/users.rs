//! Mock users service.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{not_found, Failure, MockBehavior, MockCall, MockEndpoint};
use crate::domain::{IdResponse, UpdateUserRequest, User};
use crate::ports::{ApiError, UsersApi};

/// In-memory users service holding at most one user.
#[derive(Debug, Clone, Default)]
pub struct MockUsersApi {
    user: Arc<Mutex<Option<User>>>,
    behavior: MockBehavior,
}

impl MockUsersApi {
    /// Creates a mock with no stored user; `get_user` answers 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the user returned by `get_user`.
    pub fn with_user(self, user: User) -> Self {
        *self.user.lock().unwrap() = Some(user);
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

    /// Currently stored user.
    pub fn user(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
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
}

#[async_trait]
impl UsersApi for MockUsersApi {
    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.behavior
            .enter_read(MockEndpoint::GetUser, vec![user_id.to_string()])
            .await?;

        self.user
            .lock()
            .unwrap()
            .clone()
            .filter(|user| user.id == user_id)
            .ok_or_else(|| not_found("User", user_id))
    }

    async fn update_user(
        &self,
        user_id: &str,
        body: &UpdateUserRequest,
    ) -> Result<IdResponse, ApiError> {
        self.behavior
            .enter(MockEndpoint::UpdateUser, vec![user_id.to_string()], Some(body))
            .await?;

        if let Some(response) = self.behavior.next_id_response(MockEndpoint::UpdateUser) {
            return Ok(response);
        }

        let mut stored = self.user.lock().unwrap();
        let user = stored.get_or_insert_with(|| User::new(user_id));
        if body.first_name.is_some() {
            user.first_name = body.first_name.clone();
        }
        if body.last_name.is_some() {
            user.last_name = body.last_name.clone();
        }
        if body.bio.is_some() {
            user.bio = body.bio.clone();
        }

        Ok(IdResponse::message(format!("User {} updated", user_id)))
    }
}
