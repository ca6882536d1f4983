//! Template helpers available to every rendering call.
//!
//! A helper receives the evaluated parameters of its invocation and returns
//! markup that is written to the output without further escaping. The
//! built-in helpers are:
//!
//! - `md`: Markdown to HTML.
//! - `highlight`: syntax-highlighted code with automatic language detection.
//! - `lock`: a lock icon when a method requires authentication.

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderErrorReason,
};
use pulldown_cmark::{Options, Parser, html};
use serde_json::Value;

use crate::{Result, highlight::highlight_html};

/// Markup emitted by the `lock` helper.
pub const LOCK_ICON: &str =
    r#" <span class="glyphicon glyphicon-lock" title="Authentication required"></span>"#;

/// A named function callable from templates.
///
/// The returned string is trusted markup and is not escaped by the template
/// engine.
pub trait RenderHelper: Send + Sync {
    /// Renders the helper for the given positional parameters.
    fn render(&self, params: &[Value]) -> Result<String>;
}

impl<F> RenderHelper for F
where
    F: Fn(&[Value]) -> Result<String> + Send + Sync,
{
    fn render(&self, params: &[Value]) -> Result<String> {
        self(params)
    }
}

/// Shared handle to a helper, as stored in a [`Config`](crate::Config).
pub type SharedHelper = Arc<dyn RenderHelper>;

/// First parameter as a non-empty string.
fn text_param(params: &[Value]) -> Option<&str> {
    params.first().and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Converts Markdown to HTML. Missing or empty input yields an empty string.
pub fn markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut output = String::new();
    html::push_html(&mut output, Parser::new_ext(text, options));
    output
}

/// Returns the lock marker if any security scheme other than a single `null`
/// ("no authentication") entry applies.
pub fn lock(secured_by: &[Value]) -> &'static str {
    let mut schemes = secured_by.to_vec();
    if let Some(anonymous) = schemes.iter().position(Value::is_null) {
        schemes.remove(anonymous);
    }
    if schemes.iter().any(|scheme| !scheme.is_null()) {
        LOCK_ICON
    } else {
        ""
    }
}

/// The `md` helper.
pub fn md_helper(params: &[Value]) -> Result<String> {
    Ok(text_param(params).map(markdown).unwrap_or_default())
}

/// The `highlight` helper.
pub fn highlight_helper(params: &[Value]) -> Result<String> {
    match text_param(params) {
        Some(code) => highlight_html(code),
        None => Ok(String::new()),
    }
}

/// The `lock` helper.
pub fn lock_helper(params: &[Value]) -> Result<String> {
    let marker = match params.first() {
        Some(Value::Array(schemes)) => lock(schemes),
        _ => "",
    };
    Ok(marker.to_string())
}

/// The helpers registered by default, in registration order.
pub fn default_helpers() -> Vec<(&'static str, SharedHelper)> {
    vec![
        ("md", Arc::new(md_helper) as SharedHelper),
        ("highlight", Arc::new(highlight_helper) as SharedHelper),
        ("lock", Arc::new(lock_helper) as SharedHelper),
    ]
}

/// Exposes a [`RenderHelper`] to Handlebars.
pub(crate) struct HandlebarsHelper(pub(crate) SharedHelper);

impl HelperDef for HandlebarsHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let params: Vec<Value> = h.params().iter().map(|p| p.value().clone()).collect();
        let markup = self
            .0
            .render(&params)
            .map_err(|e| RenderErrorReason::Other(format!("helper {}: {e}", h.name())))?;
        out.write(&markup)
            .map_err(|e| RenderErrorReason::Other(e.to_string()))?;
        Ok(())
    }
}
