use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::errors::WikiError;
use crate::utils::escape_html;

/// Names of the page templates, each loaded from `<dir>/<name>.html`
pub const TEMPLATE_NAMES: [&str; 2] = ["edit", "view"];

/// Values a page template can reference
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    /// `{{.Title}}`, escaped
    pub title: &'a str,
    /// `{{.Body}}`, the raw page text, escaped
    pub body: &'a str,
    /// `{{.HTMLBody}}`, inserted as-is
    pub html_body: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Body,
    HtmlBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// The page templates, parsed once at startup
#[derive(Debug, Default)]
pub struct TemplateSet {
    templates: HashMap<String, Vec<Segment>>,
}

impl TemplateSet {
    /// Load `edit.html` and `view.html` from `dir`.
    ///
    /// A missing file is only logged; rendering that template later fails.
    /// A file that does not parse is an error.
    pub fn load(dir: &Path) -> Result<Self, WikiError> {
        let mut set = Self::default();
        for name in TEMPLATE_NAMES {
            let path = dir.join(format!("{}.html", name));
            match fs::read_to_string(&path) {
                Ok(source) => {
                    set.insert(name, &source)?;
                    log::info!("Loaded template '{}' from {:?}", name, path);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::warn!("Template '{}' not found at {:?}", name, path);
                }
                Err(e) => {
                    log::error!("Failed to read template {:?}: {}", path, e);
                    return Err(WikiError::Io(e));
                }
            }
        }
        Ok(set)
    }

    /// Build a set from in-memory sources
    pub fn from_sources<'a, I>(sources: I) -> Result<Self, WikiError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = Self::default();
        for (name, source) in sources {
            set.insert(name, source)?;
        }
        Ok(set)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn insert(&mut self, name: &str, source: &str) -> Result<(), WikiError> {
        let segments = parse(name, source)?;
        self.templates.insert(name.to_string(), segments);
        Ok(())
    }

    /// Execute the named template
    pub fn render(&self, name: &str, ctx: &TemplateContext<'_>) -> Result<String, WikiError> {
        let segments = self.templates.get(name).ok_or_else(|| {
            WikiError::TemplateError(format!("template {}.html is not loaded", name))
        })?;

        let mut out = String::new();
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(Field::Title) => out.push_str(&escape_html(ctx.title)),
                Segment::Field(Field::Body) => out.push_str(&escape_html(ctx.body)),
                Segment::Field(Field::HtmlBody) => out.push_str(ctx.html_body),
            }
        }
        Ok(out)
    }
}

fn parse(name: &str, source: &str) -> Result<Vec<Segment>, WikiError> {
    let mut segments = Vec::new();
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        if start > 0 {
            segments.push(Segment::Text(rest[..start].to_string()));
        }
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| {
            WikiError::TemplateError(format!("{}.html: unclosed action", name))
        })?;
        let field = match after[..end].trim() {
            ".Title" => Field::Title,
            ".Body" => Field::Body,
            ".HTMLBody" => Field::HtmlBody,
            other => {
                return Err(WikiError::TemplateError(format!(
                    "{}.html: unknown field {:?}",
                    name, other
                )));
            }
        };
        segments.push(Segment::Field(field));
        rest = &after[end + 2..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    Ok(segments)
}
