use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, error::ErrorKind};
use libraml2html::{Config, Source, TemplateSource, parse_with_config};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `RAML2HTML_LOG=debug`.
const LOG_ENV: &str = "RAML2HTML_LOG";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// RAML file to convert
    #[arg(value_name = "INPUT")]
    file: Option<PathBuf>,

    /// RAML file to convert, as an alternative to the positional argument
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Write HTML to a file instead of standard output
    #[arg(short, long, value_name = "PATH", env = "RAML2HTML_OUTPUT")]
    output: Option<PathBuf>,

    /// Custom Handlebars page template
    #[arg(short, long, value_name = "PATH")]
    template: Option<PathBuf>,

    /// Register a partial from a file, as name=path
    #[arg(short, long = "partial", value_name = "NAME=PATH", value_parser = parse_key_value)]
    partials: Vec<(String, String)>,

    /// Merge a value onto the template context, as key=value. JSON values are
    /// parsed, anything else is taken as a string
    #[arg(long = "template-option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    template_options: Vec<(String, String)>,
}

/// Splits a `key=value` argument.
fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{arg}'")),
    }
}

impl Cli {
    /// The single input file, if exactly one was given.
    fn input(&self) -> Option<&Path> {
        match (&self.file, &self.input) {
            (Some(path), None) | (None, Some(path)) => Some(path.as_path()),
            _ => None,
        }
    }

    /// Builds the rendering configuration from the template flags.
    fn config(&self) -> Config {
        let mut config = Config::new();
        if let Some(template) = &self.template {
            config = config.with_template(TemplateSource::File(template.clone()));
        }
        for (name, path) in &self.partials {
            config = config.with_partial(name, TemplateSource::File(PathBuf::from(path)));
        }
        for (key, raw) in &self.template_options {
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            config = config.with_template_option(key, value);
        }
        config
    }
}

/// Converts the input and writes the page to the chosen destination.
fn run(cli: &Cli, input: &Path) -> Result<()> {
    let html = parse_with_config(Source::FilePath(input.to_path_buf()), &cli.config())
        .with_context(|| format!("failed to convert {}", input.display()))?;
    debug!(bytes = html.len(), "rendered page");

    match &cli.output {
        Some(path) => fs::write(path, html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env(LOG_ENV))
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            if e.print().is_err() {
                eprintln!("{e}");
            }
            std::process::exit(code);
        }
    };

    let Some(input) = cli.input() else {
        eprintln!("error: exactly one input file is required, either positional or with --input\n");
        eprintln!("{}", Cli::command().render_help());
        std::process::exit(1);
    };

    if let Err(e) = run(&cli, input) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
