//! rst2db - render a docutils doctree as DocBook 5

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rst2db::template::render_template;
use rst2db::{Backend, DocBookConfig, DocBookWriter, read_docutils_xml};

#[derive(Parser)]
#[command(name = "rst2db")]
#[command(version, about = "Render a docutils doctree as DocBook 5", long_about = None)]
#[command(after_help = "EXAMPLES:
    rst2xml intro.rst intro.xml && rst2db intro.xml -o intro.dbk
    rst2db intro.xml -e chapter -t book.j2 -o intro.dbk")]
struct Cli {
    /// Docutils XML input (as written by rst2xml)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file [default: stdout]
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Root element of the DocBook document
    #[arg(short = 'e', long, default_value = "section")]
    element: String,

    /// Jinja2 template wrapping the output
    #[arg(short, long, value_name = "TEMPLATE")]
    template: Option<PathBuf>,

    /// Id of the root element [default: the output file's stem]
    #[arg(long)]
    id: Option<String>,

    /// Write the field-list metadata as JSON to this file
    #[arg(long, value_name = "FILE")]
    metadata: Option<PathBuf>,

    /// Log debug messages to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // --verbose enables DEBUG, otherwise use RUST_LOG or default to WARN
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

/// Run the whole conversion before writing anything, so a failure leaves no
/// partial output behind.
///
/// The body is written first. If the metadata file then cannot be written,
/// the body file is removed again.
fn convert(cli: &Cli) -> Result<(), String> {
    let bytes = fs::read(&cli.input)
        .map_err(|e| format!("cannot read {}: {e}", cli.input.display()))?;
    let doc = read_docutils_xml(&bytes).map_err(|e| e.to_string())?;

    let document_id = cli.id.clone().or_else(|| {
        cli.output
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned())
    });
    let config = DocBookConfig {
        root_element: cli.element.clone(),
        document_id,
        xml_declaration: cli.template.is_none(),
        ..DocBookConfig::default()
    };
    let rendered = DocBookWriter::with_config(config)
        .render(&doc)
        .map_err(|e| e.to_string())?;

    let body = match &cli.template {
        Some(path) => render_template(path, &rendered, Some(&cli.element))
            .map_err(|e| e.to_string())?,
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
