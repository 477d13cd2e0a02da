use std::fmt;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use regex::Regex;

use crate::errors::WikiError;
use crate::types::AppState;
use crate::utils::percent_decode;

const PAGE_PATH_PATTERN: &str = r"^/(edit|save|view)/([a-zA-Z0-9]+)$";

/// What a page request wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Edit => "edit",
            Action::Save => "save",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Action::View),
            "edit" => Some(Action::Edit),
            "save" => Some(Action::Save),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request path split into its action and a validated page title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    pub action: Action,
    pub title: String,
}

/// Validates `/<action>/<title>` paths. The extractor matches the
/// percent-decoded path.
///
/// The alphanumeric title class is the only thing keeping request paths out of
/// the storage key, so nothing else reaches the page store.
pub struct RouteMatcher {
    pattern: Regex,
}

impl RouteMatcher {
    pub fn new() -> Self {
        Self { pattern: Regex::new(PAGE_PATH_PATTERN).expect("valid route regex") }
    }

    pub fn match_path(&self, path: &str) -> Result<PageRoute, WikiError> {
        let caps = self.pattern.captures(path).ok_or(WikiError::RouteInvalid)?;
        let action = caps
            .get(1)
            .and_then(|m| Action::parse(m.as_str()))
            .ok_or(WikiError::RouteInvalid)?;
        let title = caps.get(2).ok_or(WikiError::RouteInvalid)?.as_str().to_string();
        Ok(PageRoute { action, title })
    }
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for PageRoute {
    type Rejection = WikiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts.uri.path();
        let Some(path) = percent_decode(raw) else {
            log::warn!("Rejected undecodable page path: '{}'", raw);
            return Err(WikiError::RouteInvalid);
        };
        let route = state.routes.match_path(&path).inspect_err(|_| {
            log::warn!("Rejected page path: '{}'", raw);
        })?;
        log::debug!("Matched {} for page '{}'", route.action, route.title);
        Ok(route)
    }
}
