use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use otrace::{render, server, DirectorySource, LogAnalyzer, SearchFilters};
use otrace_core::config::Config;

#[derive(Parser)]
#[command(name = "otrace", about = "Reconstruct request traces from OTCS integration logs")]
struct Cli {
    /// Extra config file layered over ~/.config/otrace/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Artifact root; overrides `analyzer.root`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Write debug logs to /tmp/otrace-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON API.
    Serve {
        /// Listen address; overrides `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },
    /// List traces matching the given filters.
    Traces(TraceArgs),
    /// Show one trace by correlation id.
    Trace {
        trace_id: String,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Print the distinct business-object types and operations.
    Options,
}

#[derive(Args)]
struct TraceArgs {
    /// Case-insensitive text matched against ids, business objects,
    /// operations and messages.
    #[arg(long)]
    search: Option<String>,
    /// Lower time bound, e.g. `2025-01-01 12:00:00`.
    #[arg(long, value_parser = parse_time)]
    from: Option<NaiveDateTime>,
    /// Upper time bound.
    #[arg(long, value_parser = parse_time)]
    to: Option<NaiveDateTime>,
    #[arg(long)]
    bo_type: Option<String>,
    #[arg(long)]
    bo_id: Option<String>,
    #[arg(long)]
    operation: Option<String>,
    /// Only traces with (true) or without (false) error entries.
    #[arg(long)]
    has_errors: Option<bool>,
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

impl TraceArgs {
    fn filters(&self) -> SearchFilters {
        SearchFilters {
            search: self.search.clone(),
            from: self.from,
            to: self.to,
            bo_type: self.bo_type.clone(),
            bo_id: self.bo_id.clone(),
            operation: self.operation.clone(),
            has_errors: self.has_errors,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn parse_time(value: &str) -> Result<NaiveDateTime, String> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| format!("not a timestamp: {value} (expected yyyy-MM-dd HH:mm:ss)"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "config: falling back to built-in defaults");
            Config::defaults()
        }),
    };
    if let Some(root) = cli.root {
        config.analyzer.root = root;
    }

    let analyzer = LogAnalyzer::new(DirectorySource::from_config(&config.analyzer));

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(config.server.bind);
            tracing::info!(root = %config.analyzer.root.display(), "serving artifact root");
            server::serve(Arc::new(analyzer), &bind).await?;
        }
        Command::Traces(args) => {
            let traces = analyzer.query_traces(&args.filters()).await;
            match args.format {
                Format::Table => print!("{}", render::trace_table(&traces)),
                Format::Json => println!("{}", serde_json::to_string_pretty(&traces)?),
            }
        }
        Command::Trace { trace_id, format } => {
            let Some(trace) = analyzer.get_trace(&trace_id).await else {
                anyhow::bail!("trace not found: {trace_id}");
            };
            match format {
                Format::Table => print!("{}", render::trace_timeline(&trace)),
                Format::Json => println!("{}", serde_json::to_string_pretty(&trace)?),
            }
        }
        Command::Options => {
            let options = analyzer.filter_options().await;
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
    }
    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/otrace-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("otrace debug log started — tail -f /tmp/otrace-debug.log");
    } else {
        let default = match cli.command {
            Command::Serve { .. } => "info",
            _ => "warn",
        };
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
            )
            .init();
    }
    Ok(())
}
