mod display;
mod export;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use esg_align_core::{AnalysisResult, Document, FrameworkSelection, RequirementCorpus};
use esg_align_engine::Analyzer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "esg-align",
    version,
    about = "Score how well an ESG report addresses disclosure framework requirements"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse a PDF or text report against selected frameworks
    Analyze(AnalyzeArgs),
    /// List frameworks and topics in the requirement corpus
    Frameworks {
        /// Requirement corpus JSON (defaults to the bundled reference corpus)
        #[arg(long, env = "ESG_ALIGN_CORPUS")]
        corpus: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Report to analyse (`.pdf`, text file, or `-` for pasted text on stdin)
    document: String,

    /// Frameworks to score against, in report order
    #[arg(
        short = 'f',
        long = "framework",
        value_delimiter = ',',
        default_value = "TCFD,TNFD"
    )]
    frameworks: Vec<String>,

    /// Select every framework in the corpus
    #[arg(long)]
    all: bool,

    /// Requirement corpus JSON (defaults to the bundled reference corpus)
    #[arg(long, env = "ESG_ALIGN_CORPUS")]
    corpus: Option<PathBuf>,

    /// Worker threads for topic scoring
    #[arg(long, env = "ESG_ALIGN_WORKERS", default_value_t = 1)]
    workers: usize,

    /// Output format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also write results here (`.parquet` for Parquet, otherwise JSON)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not print progress to stderr
    #[arg(long)]
    no_progress: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => run_analyze(args).await,
        Command::Frameworks { corpus } => {
            let corpus = load_corpus(corpus.as_deref())?;
            display::print_frameworks(&corpus);
            Ok(())
        }
    }
}

fn load_corpus(path: Option<&Path>) -> anyhow::Result<RequirementCorpus> {
    match path {
        Some(p) => RequirementCorpus::load(p)
            .with_context(|| format!("loading requirement corpus {}", p.display())),
        None => RequirementCorpus::reference().context("loading bundled reference corpus"),
    }
}

async fn load_input(source: &str) -> anyhow::Result<Document> {
    if source == "-" {
        return read_pasted(std::io::stdin());
    }
    esg_align_ingest::load_document(Path::new(source))
        .await
        .with_context(|| format!("extracting text from {source}"))
}

fn read_pasted<R: Read>(mut reader: R) -> anyhow::Result<Document> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("reading pasted text from stdin")?;
    esg_align_ingest::document_from_text(&text).context("parsing pasted text")
}

fn select_frameworks(
    args: &AnalyzeArgs,
    corpus: &RequirementCorpus,
) -> anyhow::Result<FrameworkSelection> {
    let selection = if args.all {
        corpus.framework_names().collect()
    } else {
        FrameworkSelection::new(args.frameworks.clone())
    };
    anyhow::ensure!(!selection.is_empty(), "select at least one framework");
    for name in selection.names() {
        if !corpus.contains(name) {
            tracing::warn!(framework = %name, "framework not in corpus, it will be skipped");
        }
    }
    Ok(selection)
}

async fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let corpus = load_corpus(args.corpus.as_deref())?;
    let selection = select_frameworks(&args, &corpus)?;

    let document = load_input(&args.document).await?;
    eprintln!("  Loaded {} passages from {}", document.len(), args.document);

    tokio::task::spawn_blocking(move || analyze_document(&args, &corpus, &selection, &document))
        .await
        .context("analysis task failed")??;
    Ok(())
}

/// Score `document`, print the results, and write `--output` if set.
fn analyze_document(
    args: &AnalyzeArgs,
    corpus: &RequirementCorpus,
    selection: &FrameworkSelection,
    document: &Document,
) -> anyhow::Result<AnalysisResult> {
    let analyzer = Analyzer::new().with_workers(args.workers);
    let show_progress = !args.no_progress;
    let mut report_progress = |fraction: f64| {
        eprint!("\r  Analyzing... {:.1}%", fraction * 100.0);
        let _ = std::io::stderr().flush();
    };
    let progress = if show_progress {
        Some(&mut report_progress as &mut (dyn FnMut(f64) + Send))
    } else {
        None
    };
    let result = analyzer
        .analyze(document, selection, corpus, progress)
        .context("invalid analysis input")?;
    if show_progress {
        eprintln!();
    }

    match args.format {
        OutputFormat::Table => display::print_results(&result, document.len())?,
        OutputFormat::Json => {
            let report =
                export::Report::new(&args.document, document.len(), selection.names(), &result);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(path) = &args.output {
        let report =
            export::Report::new(&args.document, document.len(), selection.names(), &result);
        export::write_report(path, &report)?;
        eprintln!("  Wrote results to {}", path.display());
    }

    Ok(result)
}
