use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use tracing::debug;

use super::{
    ChatReply, UploadAck, CHAT_ENDPOINT, CHAT_FORM_FIELD, LOGIN_ENDPOINT, LOGOUT_ENDPOINT,
    PASSWORD_FIELD, SIGNUP_ENDPOINT, UPLOAD_ENDPOINT, UPLOAD_FILE_FIELD, USERNAME_FIELD,
};
use crate::core::camera::CAPTURE_FILE_NAME;
use crate::utils::url::construct_api_url;

const MAX_ERROR_SUMMARY_CHARS: usize = 200;

#[derive(Debug)]
pub enum BackendError {
    /// The request never produced a response.
    Transport(reqwest::Error),
    /// The server answered with a non-success status.
    Status { status: u16, summary: String },
    /// The response body was not what the endpoint promises.
    Decode(String),
    /// The upload endpoint answered with `"status": "error"`.
    Rejected(String),
    /// The login form came back instead of a redirect.
    CredentialsRefused,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(err) => write!(f, "Could not reach the server: {err}"),
            BackendError::Status { status, summary } if summary.is_empty() => {
                write!(f, "Server returned HTTP {status}")
            }
            BackendError::Status { status, summary } => {
                write!(f, "Server returned HTTP {status}: {summary}")
            }
            BackendError::Decode(detail) => write!(f, "Unexpected server response: {detail}"),
            BackendError::Rejected(detail) => write!(f, "Upload rejected: {detail}"),
            BackendError::CredentialsRefused => write!(f, "Invalid credentials"),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackendError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err)
    }
}

/// The server endpoints the client talks to.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `POST /chat` with `message=<text>`; returns the `reply` field.
    async fn send_message(&self, message: &str) -> Result<String, BackendError>;

    /// `POST /upload` with the bytes as multipart field `file`.
    async fn upload_file(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadAck, BackendError>;

    /// Upload a camera capture as `camera.png`.
    async fn upload_image(&self, png: Vec<u8>) -> Result<UploadAck, BackendError> {
        self.upload_file(CAPTURE_FILE_NAME, "image/png", png).await
    }

    /// `POST /login` with the credentials form. A redirect means accepted.
    async fn login(&self, username: &str, password: &str) -> Result<(), BackendError>;

    /// `POST /signup`, same form and outcome as `login`.
    async fn signup(&self, username: &str, password: &str) -> Result<(), BackendError>;

    /// `GET /logout`, following redirects.
    async fn logout(&self) -> Result<(), BackendError>;
}

/// reqwest-backed client. Every request shares one cookie jar, so the
/// session cookie set by `/login` rides along on later calls.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    /// Same jar, but stops at the first redirect so the login outcome is
    /// visible.
    form_client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;
        let form_client = reqwest::Client::builder()
            .cookie_provider(jar)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            form_client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        construct_api_url(&self.base_url, endpoint)
    }

    async fn submit_credentials(
        &self,
        endpoint: &str,
        username: &str,
        password: &str,
    ) -> Result<(), BackendError> {
        let url = self.url(endpoint);
        debug!(%url, username, "submitting credentials");
        let response = self
            .form_client
            .post(url)
            .form(&[(USERNAME_FIELD, username), (PASSWORD_FIELD, password)])
            .send()
            .await?;
        if response.status().is_redirection() {
            return Ok(());
        }
        // A success status here is the form rendered again with an error.
        Self::success_body(response).await?;
        Err(BackendError::CredentialsRefused)
    }

    async fn success_body(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                summary: summarize_error_body(&body),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_message(&self, message: &str) -> Result<String, BackendError> {
        let url = self.url(CHAT_ENDPOINT);
        debug!(%url, chars = message.chars().count(), "sending chat message");
        let response = self
            .client
            .post(url)
            .form(&[(CHAT_FORM_FIELD, message)])
            .send()
            .await?;
        let body = Self::success_body(response).await?;
        let reply: ChatReply =
            serde_json::from_str(&body).map_err(|err| BackendError::Decode(err.to_string()))?;
        Ok(reply.reply)
    }

    async fn upload_file(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadAck, BackendError> {
        let url = self.url(UPLOAD_ENDPOINT);
        debug!(%url, file_name, bytes = bytes.len(), "uploading file");
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part(UPLOAD_FILE_FIELD, part);
        let response = self.client.post(url).multipart(form).send().await?;
        let body = Self::success_body(response).await?;

        // Only the status field matters; non-JSON success bodies are accepted.
        let ack: UploadAck = serde_json::from_str(&body).unwrap_or_default();
        if ack.is_rejected() {
            let detail = ack
                .message
                .clone()
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(BackendError::Rejected(detail));
        }
        Ok(ack)
    }

    async fn login(&self, username: &str, password: &str) -> Result<(), BackendError> {
        self.submit_credentials(LOGIN_ENDPOINT, username, password)
            .await
    }

    async fn signup(&self, username: &str, password: &str) -> Result<(), BackendError> {
        self.submit_credentials(SIGNUP_ENDPOINT, username, password)
            .await
    }

    async fn logout(&self) -> Result<(), BackendError> {
        let url = self.url(LOGOUT_ENDPOINT);
        debug!(%url, "logging out");
        let response = self.client.get(url).send().await?;
        Self::success_body(response).await.map(|_| ())
    }
}

/// Reduce an error body to one readable line, preferring the usual JSON
/// error shapes.
pub fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .or_else(|| value.get("error").and_then(|v| v.as_str()))
                .or_else(|| value.get("message").and_then(|v| v.as_str()))
                .or_else(|| value.get("reply").and_then(|v| v.as_str()))
                .map(str::to_owned)
        })
        .unwrap_or_else(|| trimmed.lines().next().unwrap_or_default().to_string());

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_ERROR_SUMMARY_CHARS {
        let cut: String = collapsed.chars().take(MAX_ERROR_SUMMARY_CHARS).collect();
        format!("{cut}…")
    } else {
        collapsed
    }
}
