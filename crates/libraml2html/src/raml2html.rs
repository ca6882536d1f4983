use tracing::debug;

use super::{
    compile::compile,
    config::Config,
    error::Result,
    loader::{Source, load},
};

/// Converts a RAML source to HTML with the bundled template and the `md`,
/// `highlight` and `lock` helpers.
///
/// # Examples
///
/// ```no_run
/// use libraml2html::{Source, parse};
///
/// let html = parse(Source::detect("api.raml"))?;
/// println!("{html}");
/// # Ok::<(), libraml2html::Raml2HtmlError>(())
/// ```
pub fn parse(source: Source) -> Result<String> {
    parse_with_config(source, &Config::default())
}

/// Converts a RAML source to HTML with a caller-supplied configuration.
///
/// Loading, annotation and rendering run in sequence; the first failure is
/// returned and no partial output is produced.
pub fn parse_with_config(source: Source, config: &Config) -> Result<String> {
    let mut doc = load(source)?;
    debug!(resources = doc.resources.len(), "loaded document");
    compile(&mut doc, config)
}
