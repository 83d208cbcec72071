use anyhow::{bail, Context};
use clap::Parser;
use quaestio_analyzer::{Analyzer, AnalyzerOptions, StaticAnnotation};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Flags question-like sentences in annotated German text")]
struct Cli {
    /// Text that was sent to the annotator
    #[arg(conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the text from a file instead
    #[arg(long, value_name = "FILE")]
    text_file: Option<PathBuf>,

    /// CoNLL-U annotation of the text; `-` reads stdin
    #[arg(short, long, value_name = "FILE")]
    annotation: PathBuf,

    /// Embed each sentence's dependency graph in the output
    #[arg(long)]
    include_graph: bool,

    /// Ignore secondary edges when looking for verb-subject inversion
    #[arg(long)]
    primary_edges_only: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "QUAESTIO_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries only the JSON
    let log_level = cli.log_level.parse::<Level>().unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(io::stderr)
        .init();

    let text = match (&cli.text, &cli.text_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?,
        (None, None) => bail!("no input text given; pass it as an argument or with --text-file"),
    };
    let annotation = read_annotation(&cli.annotation)?;
    debug!(text_len = text.len(), annotation_len = annotation.len(), "inputs read");

    let options = AnalyzerOptions { secondary_edges: !cli.primary_edges_only };
    let analyzer = Analyzer::with_options(StaticAnnotation(annotation), options);
    let results = analyzer.analyze(&text);

    let reports: Vec<_> = results.iter().map(|r| r.report(cli.include_graph)).collect();
    let json = if cli.pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    println!("{}", json);
    Ok(())
}

fn read_annotation(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut annotation = String::new();
        io::stdin().read_to_string(&mut annotation).context("reading annotation from stdin")?;
        return Ok(annotation);
    }
    fs::read_to_string(path).with_context(|| format!("reading annotation {:?}", path))
}
