//! Turns an annotated document into HTML.

use handlebars::Handlebars;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    annotate::{annotate, resolve_base_uri},
    config::{Config, TemplateEngine, TemplateSource},
    error::{Raml2HtmlError, Result},
    helpers::HandlebarsHelper,
    model::RamlDocument,
};

/// Registry name of the page template.
const PAGE_TEMPLATE: &str = "raml2html";

/// Renders a document to HTML.
///
/// The base URI is resolved and the resource tree annotated in place before
/// rendering, so `doc` reflects both once this returns, whether or not
/// rendering succeeds.
pub fn compile(doc: &mut RamlDocument, config: &Config) -> Result<String> {
    resolve_base_uri(doc);
    annotate(doc);

    let context = build_context(doc, config)?;
    debug!(
        engine = %config.template_engine(),
        template = %config.template().describe(),
        "rendering"
    );

    match config.template_engine() {
        TemplateEngine::Handlebars => render_handlebars(config, &context),
    }
}

/// Builds the rendering context: the serialized document with a `config`
/// entry, then each template option copied onto the top level, replacing any
/// existing key.
pub fn build_context(doc: &RamlDocument, config: &Config) -> Result<Value> {
    let mut context = match serde_json::to_value(doc)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    context.insert("config".to_string(), config.context_value());
    for (key, value) in config.template_options() {
        context.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(context))
}

/// Renders with a Handlebars registry owned by this call.
fn render_handlebars(config: &Config, context: &Value) -> Result<String> {
    let mut registry = Handlebars::new();

    for (name, helper) in config.helpers() {
        registry.register_helper(name, Box::new(HandlebarsHelper(helper.clone())));
    }

    for (name, partial) in config.partials() {
        match partial {
            TemplateSource::File(path) => registry.register_template_file(name, path)?,
            TemplateSource::Inline(text) => registry.register_partial(name, text)?,
        }
    }

    match config.template() {
        TemplateSource::File(path) => registry.register_template_file(PAGE_TEMPLATE, path)?,
        TemplateSource::Inline(text) => registry.register_template_string(PAGE_TEMPLATE, text)?,
    }

    registry
        .render(PAGE_TEMPLATE, context)
        .map_err(Raml2HtmlError::from)
}
