//! Typed representation of a RAML document.
//!
//! Field names serialize in camelCase so that templates see the same keys a
//! RAML author writes (`relativeUri`, `uriParameters`, `securedBy`, ...). The
//! annotation fields on [`Resource`] are empty until
//! [`annotate`](crate::annotate) has run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Ordered mapping from parameter name to its definition.
pub type Parameters = IndexMap<String, Parameter>;

/// Ordered mapping from relative URI to child resource.
pub type Resources = IndexMap<String, Resource>;

/// The root of a RAML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RamlDocument {
    /// API title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// API version, substituted into `{version}` in the base URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Base URI of the API, possibly containing a `{version}` placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,

    /// Parameters appearing in the base URI.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub base_uri_parameters: Parameters,

    /// Supported protocols (`HTTP`, `HTTPS`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,

    /// Default media type for bodies that do not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Free-form documentation sections.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documentation: Vec<DocumentationItem>,

    /// Security schemes declared by the document, by name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub security_schemes: IndexMap<String, SecurityScheme>,

    /// Security schemes applied to every method, `null` meaning anonymous access.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secured_by: Vec<Value>,

    /// Top-level resources in document order.
    #[serde(default)]
    pub resources: Resources,
}

/// A documentation section with a title and Markdown content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationItem {
    /// Section title.
    pub title: String,
    /// Section body as Markdown.
    pub content: String,
}

/// A declared security scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    /// Scheme type, e.g. `OAuth 2.0` or `Basic Authentication`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scheme_type: Option<String>,

    /// Markdown description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Scheme-specific settings, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

/// One node of the resource tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Path segment relative to the parent resource, e.g. `/users`.
    pub relative_uri: String,

    /// Human readable name, defaulting to the relative URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Markdown description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Resource type reference, kept verbatim.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<Value>,

    /// Applied traits, kept verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub is: Vec<Value>,

    /// Security schemes declared on the resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secured_by: Vec<Value>,

    /// URI parameters declared directly on this resource.
    #[serde(default)]
    pub uri_parameters: Parameters,

    /// HTTP methods in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<Method>,

    /// Child resources in document order.
    #[serde(default)]
    pub resources: Resources,

    /// Concatenated relative URIs of all ancestors.
    #[serde(default)]
    pub parent_url: String,

    /// Full path with every non-word character replaced by `_`.
    #[serde(default)]
    pub unique_id: String,

    /// Ancestors' URI parameters followed by this resource's own.
    #[serde(default)]
    pub all_uri_parameters: Vec<Parameter>,
}

impl Resource {
    /// Creates a resource with the given relative URI and nothing else.
    pub fn new(relative_uri: impl Into<String>) -> Self {
        Self {
            relative_uri: relative_uri.into(),
            ..Self::default()
        }
    }

    /// Adds a URI parameter, returning the resource.
    pub fn with_uri_parameter(mut self, parameter: Parameter) -> Self {
        self.uri_parameters.insert(parameter.name.clone(), parameter);
        self
    }

    /// Adds a child resource keyed by its relative URI, returning the resource.
    pub fn with_resource(mut self, resource: Self) -> Self {
        self.resources.insert(resource.relative_uri.clone(), resource);
        self
    }

    /// Full path of this resource. Only meaningful after annotation.
    pub fn full_uri(&self) -> String {
        format!("{}{}", self.parent_url, self.relative_uri)
    }
}

/// An HTTP method on a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Lowercase verb, e.g. `get`.
    pub method: String,

    /// Markdown description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Effective security schemes, inherited from the resource or document when
    /// the method declares none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secured_by: Vec<Value>,

    /// Query string parameters.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query_parameters: Parameters,

    /// Request headers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: Parameters,

    /// Request bodies keyed by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub body: IndexMap<String, Body>,

    /// Responses keyed by status code.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
}

/// A request or response body for one media type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    /// Schema text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Example payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,

    /// Form parameters for form-encoded media types.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub form_parameters: Parameters,
}

/// A response for one status code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Markdown description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Response headers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: Parameters,

    /// Response bodies keyed by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub body: IndexMap<String, Body>,
}

/// A named parameter definition (URI, query, header or form parameter).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name, taken from its key in the declaring mapping.
    #[serde(default)]
    pub name: String,

    /// Human readable name, defaulting to the parameter name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Markdown description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Primitive type name, e.g. `string`, `integer`, `date`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,

    /// Whether the parameter must be supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Value assumed when the parameter is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Allowed values.
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    /// Regular expression a string value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Minimum string length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Maximum string length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Minimum numeric value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    /// Maximum numeric value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    /// Whether the parameter may be repeated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<bool>,
}

impl Parameter {
    /// Creates a parameter with the given name and no other attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
