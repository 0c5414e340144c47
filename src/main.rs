use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{info, Level};

use appaudit::{audit_applications, AuditSnapshot, AuditorConfig, Report, Severity};

#[derive(Parser, Debug)]
#[command(name = "appaudit")]
#[command(about = "Audit application health from a metrics snapshot")]
struct Args {
    /// Path to the snapshot JSON file
    #[arg(short, long, default_value = "snapshot.json")]
    file: PathBuf,

    /// Path to a TOML file with check thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export the reports to a JSON file instead of printing a summary
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = AuditorConfig::load(args.config.as_deref())
        .context("Failed to load auditor configuration")?;
    let snapshot = AuditSnapshot::load(&args.file)
        .with_context(|| format!("Failed to load snapshot {}", args.file.display()))?;

    info!(
        applications = snapshot.applications.len(),
        points = snapshot.context.points,
        "auditing snapshot"
    );
    let reports =
        audit_applications(snapshot.context, snapshot.applications, Arc::new(config)).await?;

    match args.export {
        Some(path) => export_to_file(&reports, &path),
        None => {
            print_summary(&reports);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Print one line per check, grouped by application.
fn print_summary(reports: &[Report]) {
    for report in reports {
        println!("{} [{}]", report.name, report.severity());
        for check in &report.checks {
            if check.severity == Severity::Ok {
                println!("  {:<4} {}", check.severity.symbol(), check.title);
            } else {
                println!(
                    "  {:<4} {}: {}",
                    check.severity.symbol(),
                    check.title,
                    check.message
                );
            }
        }
    }
}

/// Export reports to a JSON file
fn export_to_file(reports: &[Report], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Exported {} reports to: {}", reports.len(), path.display());
    Ok(())
}
