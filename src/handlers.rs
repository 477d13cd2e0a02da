use axum::{
    extract::State,
    http::Uri,
    response::{Html, IntoResponse, Response},
};

use crate::components::TemplateContext;
use crate::errors::WikiError;
use crate::forms::SaveBody;
use crate::routing::PageRoute;
use crate::types::{AppState, Page};
use crate::utils::found;

/// Page every wiki starts from
pub const FRONT_PAGE: &str = "FrontPage";

/// Handle root path requests
pub async fn handle_root() -> Response {
    log::debug!("Root request, redirecting to {}", FRONT_PAGE);
    found(&format!("/view/{}", FRONT_PAGE))
}

/// Render a stored page, or send the client to create it
pub async fn handle_view(
    State(state): State<AppState>,
    route: PageRoute,
) -> Result<Response, WikiError> {
    let page = match state.store.load(&route.title).await {
        Ok(page) => page,
        Err(WikiError::PageNotFound(title)) => {
            log::info!("Page '{}' does not exist yet, redirecting to edit", title);
            return Ok(found(&format!("/edit/{}", title)));
        }
        Err(e) => return Err(e),
    };

    let text = page.text();
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("Page '{}' links to {:?}", page.title, state.links.targets(&text));
    }
    let html_body = page.render_body(&state.links);
    let html = state.templates.render(
        "view",
        &TemplateContext { title: &page.title, body: &text, html_body: &html_body },
    )?;
    log::info!("Serving page '{}'", page.title);
    Ok(Html(html).into_response())
}

/// Render the edit form, blank when the page has never been saved
pub async fn handle_edit(
    State(state): State<AppState>,
    route: PageRoute,
) -> Result<Response, WikiError> {
    let page = match state.store.load(&route.title).await {
        Ok(page) => page,
        Err(WikiError::PageNotFound(_)) => {
            log::debug!("Editing new page '{}'", route.title);
            Page::new(route.title)
        }
        Err(e) => return Err(e),
    };

    let text = page.text();
    let html = state.templates.render(
        "edit",
        &TemplateContext { title: &page.title, body: &text, html_body: "" },
    )?;
    Ok(Html(html).into_response())
}

/// Persist the submitted body and show the saved page
pub async fn handle_save(
    State(state): State<AppState>,
    route: PageRoute,
    SaveBody(body): SaveBody,
) -> Result<Response, WikiError> {
    let page = Page::with_body(route.title, body);
    state.store.save(&page).await?;
    Ok(found(&format!("/view/{}", page.title)))
}

/// Anything outside the page routes
pub async fn handle_not_found(uri: Uri) -> WikiError {
    log::warn!("Path not found: '{}'", uri.path());
    WikiError::RouteInvalid
}
