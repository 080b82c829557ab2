// Login, logout and profile endpoints

use crate::api::{LoginRequest, LoginResponse, UserProfile};
use crate::error::ClientError;
use crate::http::{ClientContext, HttpClient};
use crate::session::Credentials;
use serde::de::IgnoredAny;
use serde_json::json;

#[derive(Debug, Clone)]
pub struct AuthService {
    http: HttpClient,
    credentials: Credentials,
}

impl AuthService {
    pub fn new(api_root: &str, ctx: &ClientContext) -> Self {
        Self {
            http: HttpClient::new(format!("{}/auth", api_root), "AuthService", ctx),
            credentials: ctx.credentials().clone(),
        }
    }

    /// Exchange username and password for a token, replacing any stored session
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post("/login", &request).await?;

        self.credentials.set_token(&response.access_token)?;
        match &response.user {
            Some(user) => self.credentials.set_profile(user)?,
            None => self.credentials.clear_profile()?,
        }
        self.http
            .logger()
            .info(format!("Logged in as {}", username), Some(json!({ "username": username })));
        Ok(response)
    }

    /// Tell the backend, then drop local credentials whatever it answered
    pub async fn logout(&self) -> Result<(), ClientError> {
        if self.credentials.is_authenticated() {
            if let Err(e) = self.http.post::<IgnoredAny, _>("/logout", &json!({})).await {
                self.http
                    .logger()
                    .warn(format!("Backend logout failed: {}", e), None);
            }
        }
        self.credentials.clear()?;
        self.http.logger().info("Logged out", None);
        Ok(())
    }

    /// Fetch the current user and refresh the cached profile
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let profile: serde_json::Value = self.http.get("/me").await?;
        self.credentials.set_profile(&profile)?;
        serde_json::from_value(profile).map_err(ClientError::Decode)
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }
}
