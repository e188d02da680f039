//! Server-side HTML rendering backed by a shared Handlebars registry.

use std::sync::Arc;

use anyhow::Context;
use axum::response::Html;
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::AppError;

/// Builder collecting templates and partials before the registry is frozen
pub struct ViewsBuilder {
    registry: Handlebars<'static>,
}

impl ViewsBuilder {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        // Missing fields render empty; forms are shared between create and update
        registry.set_strict_mode(false);
        Self { registry }
    }

    /// Register a page template
    pub fn template(mut self, name: &str, source: &str) -> anyhow::Result<Self> {
        self.registry
            .register_template_string(name, source)
            .with_context(|| format!("failed to compile template '{}'", name))?;
        Ok(self)
    }

    /// Register a partial usable as `{{> name}}` or `{{#> name}}..{{/name}}`
    pub fn partial(mut self, name: &str, source: &str) -> anyhow::Result<Self> {
        self.registry
            .register_partial(name, source)
            .with_context(|| format!("failed to compile partial '{}'", name))?;
        Ok(self)
    }

    pub fn build(self) -> Views {
        Views {
            registry: Arc::new(self.registry),
        }
    }
}

impl Default for ViewsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable, cheaply clonable template registry
#[derive(Clone)]
pub struct Views {
    registry: Arc<Handlebars<'static>>,
}

impl Views {
    pub fn builder() -> ViewsBuilder {
        ViewsBuilder::new()
    }

    /// Render a registered template into an HTML response body
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<Html<String>, AppError> {
        self.registry
            .render(name, data)
            .map(Html)
            .map_err(|err| anyhow::anyhow!("failed to render template '{}': {}", name, err).into())
    }
}

impl std::fmt::Debug for Views {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Views")
            .field("templates", &self.registry.get_templates().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_template_inside_layout() {
        let views = Views::builder()
            .partial("layout", "<main>{{> @partial-block}}</main>")
            .unwrap()
            .template("page", "{{#> layout}}<h1>{{title}}</h1>{{/layout}}")
            .unwrap()
            .build();

        let Html(body) = views.render("page", &json!({"title": "Books"})).unwrap();
        assert_eq!(body, "<main><h1>Books</h1></main>");
    }

    #[test]
    fn escapes_values_by_default() {
        let views = Views::builder()
            .template("page", "{{title}}")
            .unwrap()
            .build();

        let Html(body) = views.render("page", &json!({"title": "<b>"})).unwrap();
        assert_eq!(body, "&lt;b&gt;");
    }

    #[test]
    fn unknown_template_is_internal_error() {
        let views = Views::builder().build();

        let err = views.render("missing", &json!({})).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn broken_template_fails_at_registration() {
        let result = Views::builder().template("broken", "{{#if}}");
        assert!(result.is_err());
    }
}
