//! # API Client
//!
//! Minimal HTTP client for the auth endpoints, used by the CLI.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::auth::{AuthResponse, RegisterInput};
use crate::models::PublicUser;
use crate::session::{Session, SessionError, SessionStore};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} ({status}, {code})")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },
    #[error("not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProblemBody {
    code: String,
    message: String,
}

#[derive(Debug, serde::Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rentease/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(self.base_url.join("auth/login")?)
            .json(&Credentials { email, password })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn register(&self, input: &RegisterInput) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(self.base_url.join("auth/register")?)
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn me(&self, access_token: &str) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .get(self.base_url.join("auth/me")?)
            .bearer_auth(access_token)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ProblemBody>(&body) {
        Ok(problem) => (problem.code, problem.message),
        Err(_) => (
            status.as_str().to_string(),
            status.canonical_reason().unwrap_or("Request failed").to_string(),
        ),
    };

    Err(ClientError::Api {
        status,
        code,
        message,
    })
}

/// Log in and persist the resulting session.
pub async fn sign_in(
    client: &ApiClient,
    store: &dyn SessionStore,
    email: &str,
    password: &str,
) -> Result<Session, ClientError> {
    let session = Session::from(client.login(email, password).await?);
    store.set_session(&session).await?;
    Ok(session)
}

/// Register and persist the resulting session.
pub async fn sign_up(
    client: &ApiClient,
    store: &dyn SessionStore,
    input: &RegisterInput,
) -> Result<Session, ClientError> {
    let session = Session::from(client.register(input).await?);
    store.set_session(&session).await?;
    Ok(session)
}

/// Re-validate the stored session against the server.
///
/// A token the server rejects clears the stored session. Returns the session
/// with the user refreshed from the server.
pub async fn restore_session(
    client: &ApiClient,
    store: &dyn SessionStore,
) -> Result<Session, ClientError> {
    let mut session = store.get_session().await?.ok_or(ClientError::NotLoggedIn)?;

    match client.me(&session.access_token).await {
        Ok(user) => {
            session.user = user;
            store.set_session(&session).await?;
            Ok(session)
        }
        Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED) => {
            tracing::info!("Stored session rejected by server; clearing it");
            store.clear_session().await?;
            Err(ClientError::NotLoggedIn)
        }
        Err(err) => Err(err),
    }
}

/// Forget the stored session.
pub async fn sign_out(store: &dyn SessionStore) -> Result<(), ClientError> {
    store.clear_session().await?;
    Ok(())
}
