use std::{fmt, io};
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Custom error types for the wiki application
#[derive(Debug)]
pub enum WikiError {
    /// The request path is not `/<action>/<title>` with an alphanumeric title
    RouteInvalid,
    /// No stored page exists for this title (or it could not be read)
    PageNotFound(String),
    /// A submitted form payload could not be parsed
    BadForm(String),
    Io(io::Error),
    TemplateError(String),
}

impl From<io::Error> for WikiError {
    fn from(err: io::Error) -> Self {
        WikiError::Io(err)
    }
}

impl fmt::Display for WikiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WikiError::RouteInvalid => write!(f, "404 page not found"),
            WikiError::PageNotFound(title) => write!(f, "page {} not found", title),
            WikiError::BadForm(e) => write!(f, "Bad form: {}", e),
            WikiError::Io(e) => write!(f, "I/O error: {}", e),
            WikiError::TemplateError(e) => write!(f, "Template error: {}", e),
        }
    }
}

impl std::error::Error for WikiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WikiError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl WikiError {
    pub fn status(&self) -> StatusCode {
        match self {
            WikiError::RouteInvalid | WikiError::PageNotFound(_) => StatusCode::NOT_FOUND,
            WikiError::BadForm(_) => StatusCode::BAD_REQUEST,
            WikiError::Io(_) | WikiError::TemplateError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Request rejected: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
