//! REST client for the persistence service.
//!
//! Used by an editing session for its initial load and explicit save, and
//! by tooling for the rest of the tour CRUD surface. All authenticated
//! calls attach the opaque bearer credential issued at signup/login.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::{
    auth::AuthResponse,
    tours::model::{Step, Tour},
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct TourApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl TourApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Register a new account; the returned credential is retained for
    /// subsequent calls.
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/auth/signup", self.base_url))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;

        let auth: AuthResponse = Self::check(response).await?.json().await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let auth: AuthResponse = Self::check(response).await?.json().await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn fetch_tour(&self, id: Uuid) -> Result<Tour, ClientError> {
        let mut request = self.http.get(format!("{}/api/tours/{id}", self.base_url));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn list_tours(&self) -> Result<Vec<Tour>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/tours", self.base_url))
            .bearer_auth(self.token.as_deref().unwrap_or_default())
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_tour(
        &self,
        title: &str,
        steps: &[Step],
        is_public: bool,
    ) -> Result<Tour, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/tours", self.base_url))
            .bearer_auth(self.token.as_deref().unwrap_or_default())
            .json(&json!({ "title": title, "steps": steps, "isPublic": is_public }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Full-value update of the provided fields; absent fields keep their
    /// persisted values.
    pub async fn update_tour(
        &self,
        id: Uuid,
        title: Option<String>,
        steps: Option<Vec<Step>>,
        is_public: Option<bool>,
    ) -> Result<Tour, ClientError> {
        let mut body = Map::new();
        if let Some(title) = title {
            body.insert("title".to_owned(), json!(title));
        }
        if let Some(steps) = steps {
            body.insert("steps".to_owned(), json!(steps));
        }
        if let Some(is_public) = is_public {
            body.insert("isPublic".to_owned(), json!(is_public));
        }

        let response = self
            .http
            .put(format!("{}/api/tours/{id}", self.base_url))
            .bearer_auth(self.token.as_deref().unwrap_or_default())
            .json(&Value::Object(body))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete_tour(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(format!("{}/api/tours/{id}", self.base_url))
            .bearer_auth(self.token.as_deref().unwrap_or_default())
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.to_string());
        Err(ClientError::Api { status, message })
    }
}
