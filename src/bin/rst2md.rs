//! rst2md - render a docutils doctree as Markdown

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rst2db::template::render_template;
use rst2db::{Backend, MarkdownConfig, MarkdownWriter, read_docutils_xml};

#[derive(Parser)]
#[command(name = "rst2md")]
#[command(version, about = "Render a docutils doctree as Markdown", long_about = None)]
struct Cli {
    /// Docutils XML input (as written by rst2xml)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file [default: stdout]
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Jinja2 template wrapping the output
    #[arg(short, long, value_name = "TEMPLATE")]
    template: Option<PathBuf>,

    /// Wrap paragraphs at this column
    #[arg(short = 'w', long, default_value_t = 78)]
    width: usize,

    /// Write the field-list metadata as JSON to this file
    #[arg(long, value_name = "FILE")]
    metadata: Option<PathBuf>,

    /// Log debug messages to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match convert(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn convert(cli: &Cli) -> Result<(), String> {
    let bytes = fs::read(&cli.input)
        .map_err(|e| format!("cannot read {}: {e}", cli.input.display()))?;
    let doc = read_docutils_xml(&bytes).map_err(|e| e.to_string())?;

    let config = MarkdownConfig {
        line_width: cli.width,
    };
    let rendered = MarkdownWriter::with_config(config)
        .render(&doc)
        .map_err(|e| e.to_string())?;

    let body = match &cli.template {
        Some(path) => render_template(path, &rendered, None).map_err(|e| e.to_string())?,
        None => rendered.body.clone(),
    };
    let metadata = match &cli.metadata {
        Some(path) => {
            let json =
                serde_json::to_string_pretty(&rendered.metadata).map_err(|e| e.to_string())?;
            Some((path, json))
        }
        None => None,
    };

    match &cli.output {
        Some(path) => fs::write(path, body)
            .map_err(|e| format!("cannot write {}: {e}", path.display()))?,
        None => print!("{body}"),
    }
    if let Some((path, json)) = metadata
        && let Err(e) = fs::write(path, json + "\n")
    {
        if let Some(output) = &cli.output {
            let _ = fs::remove_file(output);
        }
        return Err(format!("cannot write {}: {e}", path.display()));
    }
    Ok(())
}
