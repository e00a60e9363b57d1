//! Users API Port - Interface to the users service.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{IdResponse, UpdateUserRequest, User};

/// Port for the users service.
///
/// Implementations map each method onto one HTTP call and decode the body;
/// they do not interpret the payload beyond that.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// `GET /getUser/{id}`
    async fn get_user(&self, user_id: &str) -> Result<User, ApiError>;

    /// `PUT /updateUser/{id}` - returns a status message without an id.
    async fn update_user(
        &self,
        user_id: &str,
        body: &UpdateUserRequest,
    ) -> Result<IdResponse, ApiError>;
}
