//! End-to-end rendering through the bundled and custom templates.
#![allow(clippy::tests_outside_test_module)]

mod utils;

use libraml2html::{
    Config, Raml2HtmlError, Source, TemplateSource, helpers::LOCK_ICON, parse, parse_with_config,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::path::PathBuf;
use utils::{LIBRARY_RAML, write_file, write_raml};

#[test]
fn minimal_document_renders_its_resource() {
    let html = parse(Source::RawText(
        "#%RAML 0.8\ntitle: Minimal\n/status:\n  get:\n".to_string(),
    ))
    .unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Minimal API documentation"));
    assert!(html.contains("/status"));
    assert!(html.contains("_status_get"));
    assert!(!html.contains(LOCK_ICON));
}

#[test]
fn default_template_uses_every_helper() {
    let (_temp_dir, path) = write_raml(LIBRARY_RAML);
    let html = parse(Source::FilePath(path)).unwrap();

    // md
    assert!(html.contains("<strong>books</strong>"));
    // highlight
    assert!(html.contains("<pre><code><span style="));
    // lock: only the secured methods carry the icon
    assert_eq!(html.matches(LOCK_ICON).count(), 4);

    assert!(html.contains("https://library.example.com/v2"));
    assert!(html.contains("id=\"_books__bookId__loans__loanId__delete\""));
    assert!(html.contains("Book identifier."));
    assert!(html.contains("Filter by author name."));
    assert!(html.contains("OAuth 2.0"));
}

#[test]
fn source_shapes_render_identically() {
    let (_temp_dir, path) = write_raml(LIBRARY_RAML);

    let from_file = parse(Source::FilePath(path)).unwrap();
    let from_text = parse(Source::RawText(LIBRARY_RAML.to_string())).unwrap();
    let from_bytes = parse(Source::Bytes(LIBRARY_RAML.as_bytes().to_vec())).unwrap();
    let prebuilt = libraml2html::load(Source::RawText(LIBRARY_RAML.to_string())).unwrap();
    let from_doc = parse(Source::Parsed(prebuilt)).unwrap();

    assert_eq!(from_file, from_text);
    assert_eq!(from_text, from_bytes);
    assert_eq!(from_bytes, from_doc);
}

#[test]
fn custom_template_partials_and_options() {
    let (temp_dir, path) = write_raml(LIBRARY_RAML);
    let template = write_file(
        temp_dir.path(),
        "page.hbs",
        "<h1>{{title}}</h1>{{#each resources}}{{> entry}}{{/each}}<footer>{{footer}} {{config.templateEngine}}</footer>",
    );
    let entry = write_file(
        temp_dir.path(),
        "entry.hbs",
        "<section id=\"{{uniqueId}}\">{{relativeUri}}</section>{{#each resources}}{{> entry}}{{/each}}",
    );

    let config = Config::new()
        .with_template(TemplateSource::File(template))
        .with_partial("entry", TemplateSource::File(entry))
        .with_template_option("footer", json!("Generated"))
        .with_template_option("title", json!("Renamed"));

    let html = parse_with_config(Source::FilePath(path), &config).unwrap();
    assert_eq!(
        html,
        "<h1>Renamed</h1>\
         <section id=\"_books\">/books</section>\
         <section id=\"_books__bookId_\">/{bookId}</section>\
         <section id=\"_books__bookId__loans__loanId_\">/loans/{loanId}</section>\
         <footer>Generated handlebars</footer>"
    );
}

#[test]
fn zero_and_false_parameter_values_are_shown() {
    let html = parse(Source::RawText(
        "title: Paging\n/pages:\n  get:\n    queryParameters:\n      offset:\n        type: integer\n        minimum: 0\n        default: 0\n        example: 0\n      verbose:\n        type: boolean\n        default: false\n".to_string(),
    ))
    .unwrap();

    assert!(html.contains(" - default: 0"));
    assert!(html.contains(" - minimum: 0"));
    assert!(html.contains("Example: <code>0</code>"));
    assert!(html.contains(" - default: false"));
    assert!(!html.contains(" - maximum:"));
}

#[test]
fn custom_helpers_replace_builtins() {
    let config = Config::new()
        .with_template(TemplateSource::Inline("{{md title}}".to_string()))
        .with_helper("md", |params: &[Value]| -> libraml2html::Result<String> {
            Ok(format!("<em>{}</em>", params[0].as_str().unwrap_or_default()))
        });

    let html = parse_with_config(Source::RawText("title: Plain".to_string()), &config).unwrap();
    assert_eq!(html, "<em>Plain</em>");
}

#[test]
fn missing_template_is_reported() {
    let config = Config::new().with_template(TemplateSource::File(PathBuf::from(
        "/non/existent/template.hbs",
    )));

    let result = parse_with_config(Source::RawText("title: Any".to_string()), &config);
    assert!(matches!(result, Err(Raml2HtmlError::Template(_))));
}

#[test]
fn parse_errors_are_reported() {
    let result = parse(Source::RawText("title: [broken".to_string()));
    assert!(matches!(result, Err(Raml2HtmlError::Parse(_))));
}
