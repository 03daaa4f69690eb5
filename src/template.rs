//! Template dressing for rendered output.
//!
//! A template wraps a rendered body in a larger file (a book skeleton, a
//! page with front matter). Templates are Jinja2-compatible and receive a
//! single `data` variable:
//!
//! - `data.contents`: the rendered body
//! - `data.root_element`: the DocBook root element, when rendering DocBook
//! - `data.<name>`: every metadata field

use std::path::Path;

#[cfg(feature = "template")]
use serde::Serialize;

use crate::Rendered;
use crate::error::{Error, Result};
#[cfg(feature = "template")]
use crate::metadata::Metadata;

#[cfg(feature = "template")]
#[derive(Debug, Serialize)]
struct TemplateData<'a> {
    contents: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    root_element: Option<&'a str>,
    #[serde(flatten)]
    metadata: &'a Metadata,
}

/// Render `rendered` through the template at `path`.
///
/// Returns [`Error::TemplateNotFound`] if the file does not exist.
#[cfg(feature = "template")]
pub fn render_template(
    path: &Path,
    rendered: &Rendered,
    root_element: Option<&str>,
) -> Result<String> {
    use minijinja::{Environment, context};
    use tracing::debug;

    if !path.is_file() {
        return Err(Error::TemplateNotFound(path.to_path_buf()));
    }
    let source = std::fs::read_to_string(path)?;
    debug!(template = %path.display(), "rendering template");

    let mut env = Environment::new();
    env.set_trim_blocks(true);
    let template = env.template_from_str(&source)?;

    let data = TemplateData {
        contents: &rendered.body,
        root_element,
        metadata: &rendered.metadata,
    };
    Ok(template.render(context! { data => data })?)
}

/// Templates are not compiled into this build.
#[cfg(not(feature = "template"))]
pub fn render_template(
    path: &Path,
    _rendered: &Rendered,
    _root_element: Option<&str>,
) -> Result<String> {
    if !path.is_file() {
        return Err(Error::TemplateNotFound(path.to_path_buf()));
    }
    Err(Error::TemplateUnavailable)
}
