//! Identity provider client
//!
//! Accounts live with an external identity provider; the backend only
//! knows users by the provider's UID. [`RestIdentity`] speaks the provider's
//! public REST surface (`accounts:*` endpoints) directly.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// A signed-in account
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Provider rejected the call; `code` is the raw provider code
    #[error("{message}")]
    Provider { code: String, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("identity API key is not configured")]
    MissingApiKey,
}

impl IdentityError {
    pub fn code(&self) -> Option<&str> {
        match self {
            IdentityError::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Human-readable message for a provider error code
pub fn friendly_message(code: &str) -> String {
    // Codes can carry a suffix, e.g. "WEAK_PASSWORD : Password should be ..."
    let key = code.split(':').next().unwrap_or(code).trim();
    match key {
        "EMAIL_NOT_FOUND" => "No user found with this email.".to_string(),
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Incorrect password. Please try again.".to_string()
        }
        "INVALID_EMAIL" => "Invalid email format.".to_string(),
        "USER_DISABLED" => "This user account has been disabled.".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            "Too many login attempts. Please try again later.".to_string()
        }
        "EMAIL_EXISTS" => "This email is already in use.".to_string(),
        "WEAK_PASSWORD" => "Password is too weak.".to_string(),
        "MISSING_PASSWORD" => "Please enter your password.".to_string(),
        _ => format!("Something went wrong: {}", code),
    }
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError>;
    async fn send_email_verification(&self, id_token: &str) -> Result<(), IdentityError>;
    async fn is_email_verified(&self, id_token: &str) -> Result<bool, IdentityError>;
    async fn delete_account(&self, id_token: &str) -> Result<(), IdentityError>;
    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError>;

    /// Re-authenticate with `current`, then set `new_password`.
    /// Returns the refreshed session.
    async fn change_password(
        &self,
        session: &Session,
        current: &str,
        new_password: &str,
    ) -> Result<Session, IdentityError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
}

impl AuthResponse {
    fn into_session(self, fallback_email: &str) -> Session {
        Session {
            uid: self.local_id,
            email: if self.email.is_empty() {
                fallback_email.to_string()
            } else {
                self.email
            },
            id_token: self.id_token,
            refresh_token: self.refresh_token,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    #[serde(default)]
    email_verified: bool,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Identity provider over its REST API
pub struct RestIdentity {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestIdentity {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        RestIdentity {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, method: &str) -> Result<String, IdentityError> {
        if self.api_key.is_empty() {
            return Err(IdentityError::MissingApiKey);
        }
        Ok(format!("{}/accounts:{}?key={}", self.base_url, method, self.api_key))
    }

    async fn call<R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<R, IdentityError> {
        let url = self.url(method)?;
        tracing::debug!(method, "Identity request");
        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ProviderErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("HTTP_{}", status.as_u16()));
            tracing::warn!(method, %code, "Identity request rejected");
            return Err(IdentityError::Provider {
                message: friendly_message(&code),
                code,
            });
        }
        resp.json::<R>()
            .await
            .map_err(|e| IdentityError::Decode(format!("{} response: {}", method, e)))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for RestIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let resp: AuthResponse = self
            .call(
                "signInWithPassword",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        Ok(resp.into_session(email))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let resp: AuthResponse = self
            .call(
                "signUp",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        Ok(resp.into_session(email))
    }

    async fn send_email_verification(&self, id_token: &str) -> Result<(), IdentityError> {
        let _: serde_json::Value = self
            .call("sendOobCode", json!({ "requestType": "VERIFY_EMAIL", "idToken": id_token }))
            .await?;
        Ok(())
    }

    async fn is_email_verified(&self, id_token: &str) -> Result<bool, IdentityError> {
        let resp: LookupResponse = self.call("lookup", json!({ "idToken": id_token })).await?;
        Ok(resp.users.first().map(|u| u.email_verified).unwrap_or(false))
    }

    async fn delete_account(&self, id_token: &str) -> Result<(), IdentityError> {
        let _: serde_json::Value = self.call("delete", json!({ "idToken": id_token })).await?;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let _: serde_json::Value = self
            .call("sendOobCode", json!({ "requestType": "PASSWORD_RESET", "email": email }))
            .await?;
        Ok(())
    }

    async fn change_password(
        &self,
        session: &Session,
        current: &str,
        new_password: &str,
    ) -> Result<Session, IdentityError> {
        let fresh = self.sign_in(&session.email, current).await.map_err(|e| match e {
            IdentityError::Provider { code, .. }
                if code.starts_with("INVALID_PASSWORD") || code.starts_with("INVALID_LOGIN_CREDENTIALS") =>
            {
                IdentityError::Provider {
                    code,
                    message: "Current password is incorrect".to_string(),
                }
            }
            other => other,
        })?;
        let resp: AuthResponse = self
            .call(
                "update",
                json!({ "idToken": fresh.id_token, "password": new_password, "returnSecureToken": true }),
            )
            .await?;
        Ok(resp.into_session(&session.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn sign_in(Json(body): Json<serde_json::Value>) -> axum::response::Response {
        if body["password"] == "secret1" {
            (StatusCode::OK, Json(json!({
                "localId": "uid-1",
                "email": body["email"],
                "idToken": "id-token",
                "refreshToken": "refresh-token",
            })))
                .into_response()
        } else {
            (StatusCode::BAD_REQUEST, Json(json!({
                "error": { "code": 400, "message": "INVALID_PASSWORD" }
            })))
                .into_response()
        }
    }

    async fn lookup() -> Json<serde_json::Value> {
        Json(json!({ "users": [{ "localId": "uid-1", "emailVerified": true }] }))
    }

    async fn update(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
        assert_eq!(body["password"], "newsecret");
        Json(json!({ "localId": "uid-1", "idToken": "id-token-2", "refreshToken": "r2" }))
    }

    async fn start_server() -> String {
        let app = Router::new()
            .route("/v1/accounts:signInWithPassword", post(sign_in))
            .route("/v1/accounts:lookup", post(lookup))
            .route("/v1/accounts:update", post(update));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    #[test]
    fn friendly_messages_strip_suffix() {
        assert_eq!(friendly_message("EMAIL_NOT_FOUND"), "No user found with this email.");
        assert_eq!(
            friendly_message("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password is too weak."
        );
        assert!(friendly_message("SOMETHING_ELSE").starts_with("Something went wrong"));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_network() {
        let identity = RestIdentity::new("http://127.0.0.1:1", "", Duration::from_secs(1));
        let err = identity.sign_in("a@b.c", "x").await.unwrap_err();
        assert!(matches!(err, IdentityError::MissingApiKey));
    }

    #[tokio::test]
    async fn sign_in_returns_session() {
        let base = start_server().await;
        let identity = RestIdentity::new(base, "key", Duration::from_secs(5));
        let session = identity.sign_in("cashier@example.com", "secret1").await.unwrap();
        assert_eq!(session.uid, "uid-1");
        assert_eq!(session.email, "cashier@example.com");
        assert!(identity.is_email_verified(&session.id_token).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_maps_to_friendly_message() {
        let base = start_server().await;
        let identity = RestIdentity::new(base, "key", Duration::from_secs(5));
        let err = identity.sign_in("cashier@example.com", "nope").await.unwrap_err();
        assert_eq!(err.code(), Some("INVALID_PASSWORD"));
        assert_eq!(err.to_string(), "Incorrect password. Please try again.");
    }

    #[tokio::test]
    async fn change_password_reauthenticates_first() {
        let base = start_server().await;
        let identity = RestIdentity::new(base, "key", Duration::from_secs(5));
        let session = Session {
            uid: "uid-1".into(),
            email: "cashier@example.com".into(),
            id_token: "old".into(),
            refresh_token: "old".into(),
        };

        let err = identity.change_password(&session, "wrong", "newsecret").await.unwrap_err();
        assert_eq!(err.to_string(), "Current password is incorrect");

        let updated = identity.change_password(&session, "secret1", "newsecret").await.unwrap();
        assert_eq!(updated.id_token, "id-token-2");
        assert_eq!(updated.email, "cashier@example.com");
    }
}
