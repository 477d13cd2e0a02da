//! tinywiki - a small wiki server that keeps each page as a text file
//!
//! Pages live in a flat directory as `<title>.txt`. Viewing a page turns
//! `[PageName]` tokens into links; viewing a page that does not exist yet
//! opens its edit form.

pub mod components;
pub mod config;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod logger;
pub mod routing;
pub mod server;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::WikiError;
pub use types::{AppState, Page};
pub use routing::{Action, PageRoute, RouteMatcher};
pub use services::{LinkRewriter, PageStore};
pub use components::{TemplateContext, TemplateSet};
pub use server::build_router;
