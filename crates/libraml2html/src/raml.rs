//! Builds the typed document tree from a YAML value.
//!
//! Only the structure the page needs is extracted. Resource types and traits
//! are carried verbatim and not expanded.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::{
    error::{Raml2HtmlError, Result},
    model::{
        Body, DocumentationItem, Method, Parameter, Parameters, RamlDocument, Resource, Resources,
        Response, SecurityScheme,
    },
};

/// HTTP methods recognized as resource keys.
const METHODS: &[&str] = &[
    "get", "post", "put", "patch", "delete", "head", "options", "trace", "connect",
];

/// Media type used for bodies that name neither a media type nor inherit one.
const FALLBACK_MEDIA_TYPE: &str = "application/json";

/// Matches `{name}` placeholders in a URI template.
static URI_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid placeholder regex"));

/// Document-wide values inherited while walking the tree.
struct Defaults<'a> {
    /// Media type for bodies declared without one.
    media_type: &'a str,
}

/// Builds a [`RamlDocument`] from a parsed YAML value.
pub fn build_document(value: &Value) -> Result<RamlDocument> {
    let root = match value {
        Value::Mapping(map) => map,
        Value::Null => {
            return Err(Raml2HtmlError::InvalidSource(
                "document is empty".to_string(),
            ));
        }
        _ => {
            return Err(Raml2HtmlError::InvalidSource(
                "document root must be a mapping".to_string(),
            ));
        }
    };

    let media_type = get_string(root, "mediaType");
    let secured_by = get_list(root, "securedBy");
    let defaults = Defaults {
        media_type: media_type.as_deref().unwrap_or(FALLBACK_MEDIA_TYPE),
    };

    let doc = RamlDocument {
        title: get_string(root, "title"),
        version: get_string(root, "version"),
        base_uri: get_string(root, "baseUri"),
        base_uri_parameters: parameters(root.get("baseUriParameters"), Some(true)),
        protocols: get_list(root, "protocols")
            .iter()
            .filter_map(scalar_to_string)
            .collect(),
        documentation: documentation(root.get("documentation")),
        security_schemes: security_schemes(root.get("securitySchemes")),
        resources: resources(root, &secured_by, &defaults)?,
        media_type,
        secured_by: secured_by.iter().map(to_json).collect(),
    };

    debug!(
        title = doc.title.as_deref().unwrap_or_default(),
        resources = doc.resources.len(),
        "built RAML document"
    );
    Ok(doc)
}

/// Collects the child resources (keys beginning with `/`) of a mapping.
fn resources(map: &Mapping, secured_by: &[Value], defaults: &Defaults<'_>) -> Result<Resources> {
    let mut out = Resources::new();
    for (key, value) in map {
        let Some(relative_uri) = key.as_str().filter(|k| k.starts_with('/')) else {
            continue;
        };
        let resource = resource(relative_uri, value, secured_by, defaults)?;
        out.insert(relative_uri.to_string(), resource);
    }
    Ok(out)
}

/// Builds one resource and, recursively, its children.
fn resource(
    relative_uri: &str,
    value: &Value,
    inherited_security: &[Value],
    defaults: &Defaults<'_>,
) -> Result<Resource> {
    let empty = Mapping::new();
    let map = match value {
        Value::Mapping(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(Raml2HtmlError::InvalidSource(format!(
                "resource {relative_uri} must be a mapping"
            )));
        }
    };

    let own_security = get_list(map, "securedBy");
    let security = if own_security.is_empty() {
        inherited_security
    } else {
        &own_security[..]
    };

    let mut uri_parameters = parameters(map.get("uriParameters"), Some(true));
    add_implicit_parameters(relative_uri, &mut uri_parameters);

    let mut methods = Vec::new();
    for (key, value) in map {
        if let Some(verb) = key.as_str().filter(|k| METHODS.contains(k)) {
            methods.push(method(verb, value, security, defaults));
        }
    }

    Ok(Resource {
        relative_uri: relative_uri.to_string(),
        display_name: get_string(map, "displayName").or_else(|| Some(relative_uri.to_string())),
        description: get_string(map, "description"),
        resource_type: map.get("type").map(to_json),
        is: get_list(map, "is").iter().map(to_json).collect(),
        secured_by: own_security.iter().map(to_json).collect(),
        uri_parameters,
        methods,
        resources: resources(map, security, defaults)?,
        ..Resource::default()
    })
}

/// Declares an implicit required string parameter for every `{name}` in the
/// URI that has no explicit declaration.
fn add_implicit_parameters(relative_uri: &str, parameters: &mut Parameters) {
    for capture in URI_PLACEHOLDER.captures_iter(relative_uri) {
        let name = &capture[1];
        if parameters.contains_key(name) {
            continue;
        }
        let mut parameter = Parameter::new(name);
        parameter.display_name = Some(name.to_string());
        parameter.param_type = Some("string".to_string());
        parameter.required = Some(true);
        parameters.insert(name.to_string(), parameter);
    }
}

/// Builds one method. The method's security falls back to `inherited_security`.
fn method(verb: &str, value: &Value, inherited_security: &[Value], defaults: &Defaults<'_>) -> Method {
    let Value::Mapping(map) = value else {
        return Method {
            method: verb.to_string(),
            secured_by: inherited_security.iter().map(to_json).collect(),
            ..Method::default()
        };
    };

    let own_security = get_list(map, "securedBy");
    let security = if own_security.is_empty() {
        inherited_security
    } else {
        &own_security[..]
    };

    Method {
        method: verb.to_string(),
        description: get_string(map, "description"),
        secured_by: security.iter().map(to_json).collect(),
        query_parameters: parameters(map.get("queryParameters"), None),
        headers: parameters(map.get("headers"), None),
        body: bodies(map.get("body"), defaults),
        responses: responses(map.get("responses"), defaults),
    }
}

/// Builds the responses of a method, keyed by status code.
fn responses(value: Option<&Value>, defaults: &Defaults<'_>) -> IndexMap<String, Response> {
    let Some(Value::Mapping(map)) = value else {
        return IndexMap::new();
    };
    map.iter()
        .filter_map(|(code, value)| {
            let code = scalar_to_string(code)?;
            let response = match value {
                Value::Mapping(map) => Response {
                    description: get_string(map, "description"),
                    headers: parameters(map.get("headers"), None),
                    body: bodies(map.get("body"), defaults),
                },
                _ => Response::default(),
            };
            Some((code, response))
        })
        .collect()
}

/// Builds the bodies of a request or response, keyed by media type.
///
/// A body declaring `schema`, `example` or `formParameters` directly belongs
/// to the document's default media type.
fn bodies(value: Option<&Value>, defaults: &Defaults<'_>) -> IndexMap<String, Body> {
    let Some(Value::Mapping(map)) = value else {
        return IndexMap::new();
    };

    let direct = ["schema", "example", "formParameters"]
        .iter()
        .any(|key| map.contains_key(*key));
    if direct {
        let mut out = IndexMap::new();
        out.insert(defaults.media_type.to_string(), body(map));
        return out;
    }

    map.iter()
        .filter_map(|(media_type, value)| {
            let media_type = scalar_to_string(media_type)?;
            let body = match value {
                Value::Mapping(map) => body(map),
                _ => Body::default(),
            };
            Some((media_type, body))
        })
        .collect()
}

/// Builds a single body definition.
fn body(map: &Mapping) -> Body {
    Body {
        schema: map.get("schema").and_then(text),
        example: map.get("example").and_then(text),
        form_parameters: parameters(map.get("formParameters"), None),
    }
}

/// Builds a parameter mapping. `required` is the default applied when a
/// parameter does not say whether it is required.
fn parameters(value: Option<&Value>, required: Option<bool>) -> Parameters {
    let Some(Value::Mapping(map)) = value else {
        return Parameters::new();
    };
    map.iter()
        .filter_map(|(name, value)| {
            let name = scalar_to_string(name)?;
            Some((name.clone(), parameter(name, value, required)))
        })
        .collect()
}

/// Builds one parameter. A sequence of alternatives uses its first entry.
///
/// Attributes are read one at a time, so a malformed attribute is dropped on
/// its own and the rest of the definition is kept.
fn parameter(name: String, value: &Value, required: Option<bool>) -> Parameter {
    let definition = match value {
        Value::Sequence(alternatives) => alternatives.first(),
        other => Some(other),
    };
    let Some(Value::Mapping(map)) = definition else {
        return Parameter {
            display_name: Some(name.clone()),
            param_type: Some("string".to_string()),
            required,
            ..Parameter::new(name)
        };
    };

    Parameter {
        display_name: Some(get_string(map, "displayName").unwrap_or_else(|| name.clone())),
        description: map.get("description").and_then(text),
        param_type: Some(get_string(map, "type").unwrap_or_else(|| "string".to_string())),
        required: get_bool(map, "required").or(required),
        default: map.get("default").filter(|v| !v.is_null()).map(to_json),
        example: map.get("example").filter(|v| !v.is_null()).map(to_json),
        enum_values: get_list(map, "enum").iter().map(to_json).collect(),
        pattern: get_string(map, "pattern"),
        min_length: get_u64(map, "minLength"),
        max_length: get_u64(map, "maxLength"),
        minimum: get_number(map, "minimum"),
        maximum: get_number(map, "maximum"),
        repeat: get_bool(map, "repeat"),
        ..Parameter::new(name)
    }
}

/// Builds the documentation sections.
fn documentation(value: Option<&Value>) -> Vec<DocumentationItem> {
    let Some(Value::Sequence(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let Value::Mapping(map) = item else {
                return None;
            };
            Some(DocumentationItem {
                title: get_string(map, "title").unwrap_or_default(),
                content: get_string(map, "content").unwrap_or_default(),
            })
        })
        .collect()
}

/// Builds the declared security schemes. Both a mapping and a sequence of
/// single-entry mappings are accepted.
fn security_schemes(value: Option<&Value>) -> IndexMap<String, SecurityScheme> {
    let entries: Vec<(&Value, &Value)> = match value {
        Some(Value::Mapping(map)) => map.iter().collect(),
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| item.as_mapping())
            .flat_map(|map| map.iter())
            .collect(),
        _ => Vec::new(),
    };
    entries
        .into_iter()
        .filter_map(|(name, value)| {
            let name = scalar_to_string(name)?;
            let scheme = match value {
                Value::Mapping(map) => SecurityScheme {
                    scheme_type: get_string(map, "type"),
                    description: get_string(map, "description"),
                    settings: map.get("settings").map(to_json),
                },
                _ => SecurityScheme::default(),
            };
            Some((name, scheme))
        })
        .collect()
}

/// A scalar rendered as a string. Numbers and booleans are formatted.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A text field. Structured values (an inline example written as YAML) are
/// rendered as pretty JSON.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::Mapping(_) | Value::Sequence(_) => serde_json::to_string_pretty(&to_json(value)).ok(),
        other => scalar_to_string(other),
    }
}

/// Looks up a scalar field by key.
fn get_string(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(scalar_to_string)
}

/// Looks up a boolean field by key. The strings `true` and `false` count.
fn get_bool(map: &Mapping, key: &str) -> Option<bool> {
    let value = map.get(key)?;
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        debug!(key, ?value, "ignoring non-boolean attribute");
    }
    parsed
}

/// Looks up a non-negative integer field by key. Quoted numbers count.
fn get_u64(map: &Mapping, key: &str) -> Option<u64> {
    let value = map.get(key)?;
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        debug!(key, ?value, "ignoring non-integer attribute");
    }
    parsed
}

/// Looks up a numeric field by key. Quoted numbers count.
fn get_number(map: &Mapping, key: &str) -> Option<serde_json::Number> {
    let value = map.get(key)?;
    let parsed = match value {
        Value::Number(_) => match to_json(value) {
            serde_json::Value::Number(n) => Some(n),
            _ => None,
        },
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        debug!(key, ?value, "ignoring non-numeric attribute");
    }
    parsed
}

/// Looks up a list field by key. A single scalar counts as a one-item list.
fn get_list(map: &Mapping, key: &str) -> Vec<Value> {
    match map.get(key) {
        Some(Value::Sequence(items)) => items.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other.clone()],
    }
}

/// Converts a YAML value into JSON for the rendering context.
fn to_json(value: &Value) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}
