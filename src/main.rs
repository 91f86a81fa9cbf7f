use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use k8s_image_lister::config::{Config, OutputFormat};
use k8s_image_lister::extract::{self, ImageReference, ParseResult};
use k8s_image_lister::file_types::ManifestFormat;
use k8s_image_lister::reports;
use k8s_image_lister::sources::{self, LocalFile};

#[derive(Parser)]
#[command(name = "k8s-image-lister")]
#[command(about = "List container images referenced by Kubernetes manifests", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputArg {
    Table,
    Json,
    Csv,
    Markdown,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Table => OutputFormat::Table,
            OutputArg::Json => OutputFormat::Json,
            OutputArg::Csv => OutputFormat::Csv,
            OutputArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TextFormat {
    Yaml,
    Json,
}

impl From<TextFormat> for ManifestFormat {
    fn from(format: TextFormat) -> Self {
        match format {
            TextFormat::Yaml => ManifestFormat::Yaml,
            TextFormat::Json => ManifestFormat::Json,
        }
    }
}

#[derive(Args)]
struct ReportArgs {
    /// Output format (defaults to the configured one, then table)
    #[arg(short, long)]
    output: Option<OutputArg>,

    /// Only show references matching this text (image, kind, name, namespace, source)
    #[arg(short, long)]
    search: Option<String>,

    /// Print summary statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Exit with code 1 if any source fails to parse
    #[arg(long)]
    fail_on_errors: bool,

    /// Path to a configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract images from manifest files and directories
    Scan {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Only scan the top level of directories
        #[arg(long)]
        no_recursive: bool,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Extract images from pasted text (stdin or --file)
    Parse {
        /// Format of the text
        #[arg(long, value_enum, default_value = "yaml")]
        format: TextFormat,

        /// Read the text from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Profile manifest extraction (for use with cargo-flamegraph)
    ProfileParse {
        /// Path to the manifest file to parse
        #[arg(short, long)]
        file: PathBuf,

        /// Number of iterations (for meaningful profiling)
        #[arg(short, long, default_value = "1000")]
        iterations: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr, reports to stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let outcome = match cli.command {
        Commands::Scan {
            paths,
            no_recursive,
            report,
        } => run_scan(paths, no_recursive, report).await,
        Commands::Parse {
            format,
            file,
            report,
        } => run_parse(format, file, report).await,
        Commands::ProfileParse { file, iterations } => run_profile_parse(file, iterations).await,
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_scan(
    paths: Vec<PathBuf>,
    no_recursive: bool,
    report: ReportArgs,
) -> anyhow::Result<ExitCode> {
    let config = Config::load(report.config.as_deref())?;
    let recursive = config.scan.recursive && !no_recursive;

    let mut files = Vec::new();
    for path in &paths {
        if path.is_dir() {
            files.extend(sources::collect_manifest_files(
                path,
                recursive,
                config.scan.follow_links,
            ));
        } else {
            // Explicit files are taken as given; a missing one is reported
            // as a parse error for that file.
            files.push(LocalFile::new(path));
        }
    }

    if files.is_empty() {
        tracing::warn!("No manifest files found");
    }

    let result = extract::extract_from_files(&files).await;
    emit(&result, &report, &config)
}

async fn run_parse(
    format: TextFormat,
    file: Option<PathBuf>,
    report: ReportArgs,
) -> anyhow::Result<ExitCode> {
    let config = Config::load(report.config.as_deref())?;

    let content = match &file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read stdin")?;
            buf
        }
    };

    let result = if content.trim().is_empty() {
        tracing::info!("No input text");
        ParseResult::default()
    } else {
        extract::extract_from_text(&content, format.into())
    };

    emit(&result, &report, &config)
}

fn emit(result: &ParseResult, report: &ReportArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let query = report.search.as_deref().unwrap_or("");
    let references: Vec<&ImageReference> = reports::filter_references(&result.references, query);
    let format = report.output.map(OutputFormat::from).unwrap_or(config.output.format);

    let rendered = match format {
        OutputFormat::Table => {
            reports::generate_table(&references, config.output.max_column_width)
        }
        OutputFormat::Json => reports::generate_json(&references)?,
        OutputFormat::Csv => reports::generate_csv(&references)?,
        OutputFormat::Markdown => reports::generate_markdown_report(result, &references),
    };
    println!("{rendered}");

    if report.stats {
        let stats = reports::compute_statistics(&result.references);
        eprintln!();
        eprintln!("  Files:         {}", result.file_count);
        eprintln!("  Text entries:  {}", result.text_entry_count);
        eprintln!("  References:    {}", stats.total_references);
        eprintln!("  Unique images: {}", stats.unique_images);
        eprintln!("  Missing tag:   {}", stats.missing_tag_count);
        if !query.trim().is_empty() {
            eprintln!("  Matching:      {}", references.len());
        }
    }

    for error in &result.errors {
        eprintln!("✗ {}: {}", error.file, error.message);
    }

    let fail_on_errors = report.fail_on_errors || config.fail_on_errors;
    if fail_on_errors && !result.errors.is_empty() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn run_profile_parse(file: PathBuf, iterations: usize) -> anyhow::Result<ExitCode> {
    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let format = ManifestFormat::detect(&file).unwrap_or(ManifestFormat::Yaml);

    eprintln!("Profiling extraction for: {}", file.display());
    eprintln!("Iterations: {iterations}");
    eprintln!("File size: {} bytes", content.len());

    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(extract::extract_from_text(&content, format));
    }
    let elapsed = start.elapsed();

    eprintln!("\nProfiling complete!");
    eprintln!("Total time: {elapsed:?}");
    if iterations > 0 {
        eprintln!("Average per iteration: {:?}", elapsed / iterations as u32);
    }

    Ok(ExitCode::SUCCESS)
}
