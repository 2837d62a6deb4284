use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{ArgGroup, Args, Parser, Subcommand};

mod api;
mod config;
mod error;
mod export;
mod filter;
mod models;
mod normalize;
mod report;
mod stats;
mod window;

use config::SourceConfig;
use export::{ArtifactSink, DirectorySink, StdoutSink};
use models::{FilterCriteria, Snapshot, TimeWindow, TypeFilter};

#[derive(Parser)]
#[command(name = "outpass-report")]
#[command(about = "Outpass oversight reports for the hostel admin console", long_about = None)]
struct Cli {
    /// Read outpasses from a saved JSON file instead of the backend
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// List endpoint path appended to OUTPASS_API_URL
    #[arg(long, global = true)]
    endpoint: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long = "type", value_enum, default_value_t = TypeFilter::All)]
    outpass_type: TypeFilter,
    #[arg(long, value_enum, default_value_t = TimeWindow::All)]
    window: TimeWindow,
    #[arg(long, default_value = "")]
    search: String,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            outpass_type: args.outpass_type,
            time_window: args.window,
            search_text: args.search,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show dashboard counts and the type distribution
    Stats,
    /// List outpasses matching the filters
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Export matching outpasses as CSV
    #[command(group(
        ArgGroup::new("target")
            .args(["out_dir", "stdout"])
            .multiple(false)
    ))]
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(long)]
        stdout: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "outpass_report.md")]
        out: PathBuf,
    },
}

async fn load(cli: &Cli) -> Snapshot {
    let result = match &cli.input {
        Some(path) => api::load_snapshot(path),
        None => match SourceConfig::from_env(cli.endpoint.as_deref()) {
            Ok(config) => {
                let client = reqwest::Client::new();
                api::fetch_all_outpasses(&client, &config).await
            }
            Err(err) => Err(err),
        },
    };

    api::snapshot_or_empty(result)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let snapshot = load(&cli).await;
    let now = Local::now();

    match cli.command {
        Commands::Stats => {
            if snapshot.is_empty() {
                println!("No outpasses loaded.");
            }
            let stats = snapshot.stats();
            println!("Total outpasses: {}", stats.total);
            println!("Pending approvals: {}", stats.pending_approvals);
            println!("Action required: {}", stats.emergency_requests);
            println!("Distribution:");
            for slice in snapshot.distribution() {
                println!("- {} {}: {}", slice.color, slice.label, slice.value);
            }
        }
        Commands::List { filters, limit } => {
            let criteria = FilterCriteria::from(filters);
            let matches = snapshot.apply_filter(&criteria, &now);

            if matches.is_empty() {
                println!("No outpasses match these filters.");
                return Ok(());
            }

            println!("Showing {} of {} outpasses:", matches.len().min(limit), matches.len());
            for (index, record) in matches.iter().take(limit).enumerate() {
                let view = record.view();
                let from = window::locale_date(&view.from_date, &now.timezone())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}. {} [{}] {} | {} | from {} ({})",
                    index + 1,
                    view.student_name,
                    view.register_number,
                    view.outpass_type,
                    view.status,
                    from,
                    record.id()
                );
            }
        }
        Commands::Export {
            filters,
            out_dir,
            stdout,
        } => {
            let criteria = FilterCriteria::from(filters);
            let matches = snapshot.apply_filter(&criteria, &now);
            let artifact = export::export_csv(matches.iter().copied(), &now)?;

            let directory;
            let sink: &dyn ArtifactSink = if stdout {
                &StdoutSink
            } else {
                directory = DirectorySink::new(&out_dir);
                &directory
            };

            if let Err(err) = artifact.deliver(sink) {
                eprintln!("error: export failed: {err}");
                return Err(err).context("failed to deliver outpass report");
            }
            if !stdout {
                eprintln!(
                    "Exported {} outpasses to {}.",
                    matches.len(),
                    out_dir.join(&artifact.file_name).display()
                );
            }
        }
        Commands::Report { out } => {
            let report = report::build_report(&snapshot, &now);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
