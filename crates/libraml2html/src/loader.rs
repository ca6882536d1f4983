//! Source loading: turns a file, text, bytes or an already-built document into
//! a [`RamlDocument`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_yaml::Value;
use tracing::debug;

use crate::{
    error::{Raml2HtmlError, Result},
    model::RamlDocument,
    raml::build_document,
};

/// Tag marking a value to be replaced by the contents of another file.
const INCLUDE_TAG: &str = "!include";

/// Maximum nesting of `!include` directives, guarding against include cycles.
const MAX_INCLUDE_DEPTH: usize = 32;

/// Input accepted by [`load`].
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Path of a RAML file. Includes resolve against the file's directory.
    FilePath(PathBuf),
    /// RAML text. Includes resolve against the current directory.
    RawText(String),
    /// RAML text as bytes, which must be UTF-8.
    Bytes(Vec<u8>),
    /// A document that has already been built.
    Parsed(RamlDocument),
}

impl Source {
    /// Treats `input` as a file path if such a file exists, and as RAML text
    /// otherwise.
    pub fn detect(input: &str) -> Self {
        let path = Path::new(input);
        if path.is_file() {
            Self::FilePath(path.to_path_buf())
        } else {
            Self::RawText(input.to_string())
        }
    }
}

impl From<RamlDocument> for Source {
    fn from(doc: RamlDocument) -> Self {
        Self::Parsed(doc)
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::FilePath(path)
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Loads a document from any supported source.
pub fn load(source: Source) -> Result<RamlDocument> {
    match source {
        Source::FilePath(path) => {
            debug!(path = %path.display(), "loading RAML file");
            let text = fs::read_to_string(&path)?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            parse_text(&text, &base)
        }
        Source::RawText(text) => parse_text(&text, Path::new("")),
        Source::Bytes(bytes) => {
            let text = String::from_utf8(bytes).map_err(|e| {
                Raml2HtmlError::InvalidSource(format!("input is not valid UTF-8: {e}"))
            })?;
            parse_text(&text, Path::new(""))
        }
        Source::Parsed(doc) => Ok(doc),
    }
}

/// Parses RAML text whose includes resolve against `base`.
fn parse_text(text: &str, base: &Path) -> Result<RamlDocument> {
    let mut value: Value = serde_yaml::from_str(text)?;
    resolve_includes(&mut value, base, 0)?;
    build_document(&value)
}

/// Replaces every `!include` value with the included content, in place.
///
/// YAML and RAML files are parsed and their own includes resolved against
/// their directory. Any other file is inlined as a string. Other tags are
/// dropped, keeping the tagged value.
pub fn resolve_includes(value: &mut Value, base: &Path, depth: usize) -> Result<()> {
    match value {
        Value::Tagged(tagged) => {
            if tagged.tag == INCLUDE_TAG {
                let Some(target) = tagged.value.as_str() else {
                    return Err(Raml2HtmlError::InvalidSource(
                        "!include expects a file path".to_string(),
                    ));
                };
                *value = include(&base.join(target.trim()), depth)?;
            } else {
                let mut inner = std::mem::take(&mut tagged.value);
                resolve_includes(&mut inner, base, depth)?;
                *value = inner;
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                resolve_includes(item, base, depth)?;
            }
        }
        Value::Sequence(items) => {
            for item in items {
                resolve_includes(item, base, depth)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Reads one included file.
fn include(path: &Path, depth: usize) -> Result<Value> {
    if depth >= MAX_INCLUDE_DEPTH {
        return Err(Raml2HtmlError::InvalidSource(format!(
            "includes nested deeper than {MAX_INCLUDE_DEPTH} levels at {}",
            path.display()
        )));
    }

    debug!(path = %path.display(), "including file");
    let text = fs::read_to_string(path).map_err(|source| Raml2HtmlError::Include {
        path: path.to_path_buf(),
        source,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "raml" | "yaml" | "yml"));
    if !is_yaml {
        return Ok(Value::String(text));
    }

    let mut value: Value = serde_yaml::from_str(&text)?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    resolve_includes(&mut value, &base, depth + 1)?;
    Ok(value)
}
