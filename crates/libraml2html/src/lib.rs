//! Generates single-page HTML documentation from RAML API descriptions.
//!
//! A document is loaded from a file, text, bytes or a prebuilt
//! [`RamlDocument`], its base URI resolved, its resource tree annotated with
//! unique ids and cumulative URI parameters, and finally rendered through a
//! Handlebars template with the `md`, `highlight` and `lock` helpers.

mod annotate;
mod compile;
mod config;
mod error;
pub mod helpers;
mod highlight;
mod loader;
pub mod model;
mod raml;
mod raml2html;

pub use crate::{
    annotate::{annotate, annotate_resources, resolve_base_uri, unique_id},
    compile::{build_context, compile},
    config::{Config, TemplateEngine, TemplateSource},
    error::{Raml2HtmlError, Result},
    highlight::{detect_syntax, highlight_html},
    loader::{Source, load, resolve_includes},
    model::{Parameter, RamlDocument, Resource},
    raml::build_document,
    raml2html::{parse, parse_with_config},
};
