use std::sync::Arc;

use crate::components::TemplateSet;
use crate::config::Config;
use crate::errors::WikiError;
use crate::routing::RouteMatcher;
use crate::services::{LinkRewriter, PageStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PageStore>,
    pub links: Arc<LinkRewriter>,
    pub routes: Arc<RouteMatcher>,
    pub templates: Arc<TemplateSet>,
}

impl AppState {
    /// Build every shared component from the startup configuration
    pub fn from_config(config: &Config) -> Result<Self, WikiError> {
        let templates = TemplateSet::load(&config.template_dir)?;
        Ok(Self::new(PageStore::new(config.data_dir.clone()), templates))
    }

    pub fn new(store: PageStore, templates: TemplateSet) -> Self {
        Self {
            store: Arc::new(store),
            links: Arc::new(LinkRewriter::new()),
            routes: Arc::new(RouteMatcher::new()),
            templates: Arc::new(templates),
        }
    }
}

/// A titled unit of stored text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    /// An empty page, used when editing a title that has never been saved
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), body: Vec::new() }
    }

    pub fn with_body(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self { title: title.into(), body: body.into() }
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// HTML for display: the body with link tokens turned into anchors and
    /// everything else passed through. Never stored.
    pub fn render_body(&self, links: &LinkRewriter) -> String {
        links.rewrite(&self.text()).into_owned()
    }
}
