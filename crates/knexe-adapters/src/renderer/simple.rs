//! Simple placeholder substitution renderer.

use std::collections::HashSet;

use knexe_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{RenderContext, RenderedFile, TemplateFile},
    error::KnexeResult,
};
use tracing::{instrument, trace};

/// Renderer replacing `<%= key %>` placeholders in file contents.
///
/// File names are not templated; the `__tmpl__` suffix is stripped.
pub struct SimpleRenderer;

impl SimpleRenderer {
    /// Create a new simple renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimpleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(files = templates.len()))]
    fn render(
        &self,
        templates: &[TemplateFile],
        context: &RenderContext,
    ) -> KnexeResult<Vec<RenderedFile>> {
        let mut seen = HashSet::new();
        let mut rendered = Vec::with_capacity(templates.len());

        for template in templates {
            let path = template.output_path()?;
            if !seen.insert(path.clone()) {
                return Err(ApplicationError::RenderingFailed {
                    reason: format!("two templates render to '{path}'"),
                }
                .into());
            }

            trace!(template = %template.path, output = %path, "Rendering");
            rendered.push(RenderedFile {
                path,
                content: context.render(&template.content),
            });
        }

        Ok(rendered)
    }
}
