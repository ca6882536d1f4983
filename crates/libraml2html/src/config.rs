//! Rendering configuration.

use std::{
    fmt::{self, Debug},
    path::PathBuf,
    str::FromStr,
    sync::Arc,
};

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::{
    Raml2HtmlError,
    helpers::{RenderHelper, SharedHelper, default_helpers},
};

/// The bundled page template.
const DEFAULT_TEMPLATE: &str = include_str!("../templates/template.handlebars");
/// The bundled partial rendering one resource and its children.
const RESOURCE_PARTIAL: &str = include_str!("../templates/resource.handlebars");
/// The bundled partial rendering one parameter.
const ITEM_PARTIAL: &str = include_str!("../templates/item.handlebars");

/// Where a template or partial comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A template file on disk, read when rendering.
    File(PathBuf),
    /// Template text held in memory.
    Inline(String),
}

impl TemplateSource {
    /// A short description used in the rendering context and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }
}

/// Template engines able to render the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplateEngine {
    /// Handlebars templates.
    #[default]
    Handlebars,
}

impl TemplateEngine {
    /// The engine's configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Handlebars => "handlebars",
        }
    }
}

impl fmt::Display for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateEngine {
    type Err = Raml2HtmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "handlebars" | "hbs" => Ok(Self::Handlebars),
            _ => Err(Raml2HtmlError::UnsupportedEngine(s.to_string())),
        }
    }
}

/// Configuration for one rendering call.
///
/// Helpers and partials live in the configuration rather than in a global
/// registry, so each call renders with exactly the set it was given.
/// Registering a name twice replaces the earlier entry.
#[derive(Clone)]
pub struct Config {
    /// Page template.
    template: TemplateSource,

    /// Engine used to render the template.
    template_engine: TemplateEngine,

    /// Values merged onto the top level of the rendering context.
    template_options: Map<String, Value>,

    /// Helpers by name.
    helpers: IndexMap<String, SharedHelper>,

    /// Partials by name.
    partials: IndexMap<String, TemplateSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates the default configuration: the bundled template and partials
    /// with the `md`, `highlight` and `lock` helpers.
    pub fn new() -> Self {
        let helpers = default_helpers()
            .into_iter()
            .map(|(name, helper)| (name.to_string(), helper))
            .collect();

        let mut partials = IndexMap::new();
        partials.insert(
            "resource".to_string(),
            TemplateSource::Inline(RESOURCE_PARTIAL.to_string()),
        );
        partials.insert(
            "item".to_string(),
            TemplateSource::Inline(ITEM_PARTIAL.to_string()),
        );

        Self {
            template: TemplateSource::Inline(DEFAULT_TEMPLATE.to_string()),
            template_engine: TemplateEngine::default(),
            template_options: Map::new(),
            helpers,
            partials,
        }
    }

    /// Creates a configuration with the given template and no helpers or
    /// partials.
    pub fn bare(template: TemplateSource) -> Self {
        Self {
            template,
            template_engine: TemplateEngine::default(),
            template_options: Map::new(),
            helpers: IndexMap::new(),
            partials: IndexMap::new(),
        }
    }

    /// Sets the page template.
    pub fn with_template(mut self, template: TemplateSource) -> Self {
        self.template = template;
        self
    }

    /// Sets the template engine.
    pub fn with_template_engine(mut self, engine: TemplateEngine) -> Self {
        self.template_engine = engine;
        self
    }

    /// Adds a value merged onto the top level of the rendering context.
    pub fn with_template_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.template_options.insert(key.into(), value);
        self
    }

    /// Registers a helper, replacing any helper of the same name.
    pub fn with_helper(
        mut self,
        name: impl Into<String>,
        helper: impl RenderHelper + 'static,
    ) -> Self {
        self.helpers.insert(name.into(), Arc::new(helper));
        self
    }

    /// Registers a partial, replacing any partial of the same name.
    pub fn with_partial(mut self, name: impl Into<String>, partial: TemplateSource) -> Self {
        self.partials.insert(name.into(), partial);
        self
    }

    /// The page template.
    pub fn template(&self) -> &TemplateSource {
        &self.template
    }

    /// The template engine.
    pub fn template_engine(&self) -> TemplateEngine {
        self.template_engine
    }

    /// Values merged onto the rendering context.
    pub fn template_options(&self) -> &Map<String, Value> {
        &self.template_options
    }

    /// Registered helpers by name.
    pub fn helpers(&self) -> &IndexMap<String, SharedHelper> {
        &self.helpers
    }

    /// Registered partials by name.
    pub fn partials(&self) -> &IndexMap<String, TemplateSource> {
        &self.partials
    }

    /// The `config` object exposed to templates.
    pub fn context_value(&self) -> Value {
        json!({
            "template": self.template.describe(),
            "templateEngine": self.template_engine.name(),
            "templateOptions": self.template_options,
            "helpers": self.helpers.keys().collect::<Vec<_>>(),
            "partials": self.partials.keys().collect::<Vec<_>>(),
        })
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("template", &self.template.describe())
            .field("template_engine", &self.template_engine)
            .field("template_options", &self.template_options)
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .field("partials", &self.partials.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_engine_from_str() {
        assert_eq!(
            "handlebars".parse::<TemplateEngine>().unwrap(),
            TemplateEngine::Handlebars
        );
        assert_eq!(
            "Handlebars".parse::<TemplateEngine>().unwrap(),
            TemplateEngine::Handlebars
        );
        assert!(matches!(
            "jade".parse::<TemplateEngine>(),
            Err(Raml2HtmlError::UnsupportedEngine(name)) if name == "jade"
        ));
    }

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(
            config.helpers().keys().collect::<Vec<_>>(),
            vec!["md", "highlight", "lock"]
        );
        assert_eq!(
            config.partials().keys().collect::<Vec<_>>(),
            vec!["resource", "item"]
        );
        assert!(matches!(config.template(), TemplateSource::Inline(_)));
    }

    #[test]
    fn test_later_registration_wins() {
        let config = Config::new()
            .with_helper("md", |_: &[Value]| -> crate::Result<String> {
                Ok("custom".to_string())
            })
            .with_partial("item", TemplateSource::Inline("{{name}}".to_string()));

        assert_eq!(config.helpers().len(), 3);
        assert_eq!(config.helpers()["md"].render(&[]).unwrap(), "custom");
        assert_eq!(
            config.partials()["item"],
            TemplateSource::Inline("{{name}}".to_string())
        );
    }

    #[test]
    fn test_context_value() {
        let config = Config::bare(TemplateSource::File(PathBuf::from("page.hbs")))
            .with_template_option("theme", json!("dark"));
        assert_eq!(
            config.context_value(),
            json!({
                "template": "page.hbs",
                "templateEngine": "handlebars",
                "templateOptions": {"theme": "dark"},
                "helpers": [],
                "partials": [],
            })
        );
    }
}
