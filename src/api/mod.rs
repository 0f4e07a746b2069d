//! Wire types for the chat server and the HTTP backend that speaks them.

pub mod client;

use serde::Deserialize;

pub use client::{BackendError, ChatBackend, HttpBackend};

/// Form field carrying the user's text on `POST /chat`.
pub const CHAT_FORM_FIELD: &str = "message";
/// Multipart field carrying the file on `POST /upload`.
pub const UPLOAD_FILE_FIELD: &str = "file";
/// Form fields of the login and signup forms.
pub const USERNAME_FIELD: &str = "username";
pub const PASSWORD_FIELD: &str = "password";

pub const CHAT_ENDPOINT: &str = "chat";
pub const UPLOAD_ENDPOINT: &str = "upload";
pub const LOGIN_ENDPOINT: &str = "login";
pub const SIGNUP_ENDPOINT: &str = "signup";
pub const LOGOUT_ENDPOINT: &str = "logout";

const FALLBACK_MIME: &str = "application/octet-stream";

/// Content type sent with an uploaded file, picked from its extension.
pub fn mime_for_file_name(file_name: &str) -> &'static str {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return FALLBACK_MIME;
    };
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "txt" | "py" => "text/plain",
        "html" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "csv" => "text/csv",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => FALLBACK_MIME,
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
}

/// Body of an upload response. Servers may answer with anything; only an
/// explicit `"status": "error"` counts as a rejection.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UploadAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadAck {
    pub fn is_rejected(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("error"))
    }
}
