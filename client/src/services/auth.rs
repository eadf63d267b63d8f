//! Authentication service

use shared::{validate_payload, AuthToken, LoginCredentials, RegisterData, User};

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Clone, Debug)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn register(&self, data: &RegisterData) -> ClientResult<User> {
        validate_payload(data)?;
        let user: User = self.api.post("/auth/register", data).await?;
        tracing::info!(user_id = user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Log in and store the issued token in the session
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<AuthToken> {
        validate_payload(credentials)?;
        let token: AuthToken = self.api.post("/auth/login/json", credentials).await?;
        self.api.session().login(token.access_token.clone())?;
        tracing::info!(email = %credentials.email, "logged in");
        Ok(token)
    }

    pub async fn current_user(&self) -> ClientResult<User> {
        self.api.get("/auth/me", &[]).await
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.api.session().logout()
    }
}
