//! HTTP adapter for the users service.

use async_trait::async_trait;

use super::client::ApiHttpClient;
use crate::config::ApiConfig;
use crate::domain::{IdResponse, UpdateUserRequest, User};
use crate::ports::{ApiError, UsersApi};

/// `UsersApi` over the users REST service.
#[derive(Debug, Clone)]
pub struct HttpUsersApi {
    http: ApiHttpClient,
}

impl HttpUsersApi {
    pub fn new(http: ApiHttpClient) -> Self {
        Self { http }
    }

    /// Builds the adapter from the service configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(ApiHttpClient::new(
            &config.users_base_url,
            config.timeout(),
        )?))
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.http.get(&["getUser", user_id], &[]).await
    }

    async fn update_user(
        &self,
        user_id: &str,
        body: &UpdateUserRequest,
    ) -> Result<IdResponse, ApiError> {
        self.http.put(&["updateUser", user_id], body).await
    }
}
