use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, annotating or rendering a RAML document.
#[derive(Error, Debug)]
pub enum Raml2HtmlError {
    /// The source could not be used as RAML input.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// The underlying YAML parser rejected the document.
    #[error("Failed to parse RAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// An `!include` target could not be read.
    #[error("Failed to include {path}: {source}")]
    Include {
        /// Resolved path of the included file.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },

    /// Indicates a failure in reading or writing a file.
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// A template or partial could not be loaded or compiled.
    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// The template engine failed while rendering.
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// The configured template engine is not supported.
    #[error("Unsupported template engine: {0}")]
    UnsupportedEngine(String),

    /// Syntax highlighting failed.
    #[error("Highlight error: {0}")]
    Highlight(String),

    /// The rendering context could not be built.
    #[error("Failed to build template context: {0}")]
    Context(#[from] serde_json::Error),
}

impl From<handlebars::TemplateError> for Raml2HtmlError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(Box::new(err))
    }
}

impl From<syntect::Error> for Raml2HtmlError {
    fn from(err: syntect::Error) -> Self {
        Self::Highlight(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Raml2HtmlError>;
