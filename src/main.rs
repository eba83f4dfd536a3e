use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod aggregate;
mod charts;
mod dataset;
mod error;
#[cfg(test)]
mod fixtures;
mod models;
mod report;

#[derive(Parser)]
#[command(name = "startup-insights")]
#[command(about = "Descriptive statistics and charts for accelerator submissions", long_about = None)]
#[command(group(
    ArgGroup::new("verbosity")
        .args(["verbose", "quiet"])
        .multiple(false)
))]
struct Cli {
    /// Submissions export to analyse
    #[arg(long, global = true, default_value = "ideas.csv")]
    csv: PathBuf,
    /// Log debug details
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the markdown report, charts and optional JSON summary (default)
    Report {
        #[arg(long, default_value = "startup_insights.md")]
        report: PathBuf,
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
        /// Also write the summary tables as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,
    },
    /// Print the summary tables without writing any files
    Summary,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Report {
            report: PathBuf::from("startup_insights.md"),
            assets: PathBuf::from("assets"),
            json: None,
            no_charts: false,
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install logger: {err}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(cli) {
        error!("Analysis failed: {err:#}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let dataset = dataset::load(&cli.csv)?;
    if dataset.is_empty() {
        warn!("{} contains no submissions", cli.csv.display());
    }
    let insights = aggregate::aggregate(&dataset);
    debug!(
        "Status rows: {}, years: {}, quarters: {}, status percentages sum to {:.1}%",
        insights.status.rows.len(),
        insights.yearly.rows.len(),
        insights.quarterly.rows.len(),
        insights.status.percentage_sum()
    );

    match cli.command.unwrap_or_default() {
        Commands::Summary => {
            print!("{}", report::build_summary(&insights));
        }
        Commands::Report {
            report: report_path,
            assets,
            json,
            no_charts,
        } => {
            let source = cli.csv.display().to_string();
            let text = report::build_report(&source, &insights);
            write_file(&report_path, &text)?;
            println!("Report written to {}.", report_path.display());

            if !no_charts {
                let written = charts::write_charts(&insights, &assets)?;
                println!("{} charts written to {}.", written.len(), assets.display());
            }

            if let Some(json_path) = json {
                let body = serde_json::to_string_pretty(&insights)
                    .context("failed to serialise summary tables")?;
                write_file(&json_path, &body)?;
                println!("Summary tables written to {}.", json_path.display());
            }
        }
    }

    info!("Done");
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn cli_defaults_need_no_flags() {
        let cli = Cli::try_parse_from(["startup-insights"]).expect("no flags required");
        assert_eq!(cli.csv, PathBuf::from("ideas.csv"));
        assert!(cli.command.is_none());
        assert!(matches!(
            Commands::default(),
            Commands::Report { no_charts: false, json: None, .. }
        ));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["startup-insights", "-v", "-q"]).is_err());
    }

    #[test]
    fn report_run_writes_outputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv_path = dir.path().join("ideas.csv");
        let mut file = std::fs::File::create(&csv_path).expect("create csv");
        file.write_all(fixtures::reference_csv().as_bytes())
            .expect("write csv");

        let report_path = dir.path().join("out/startup_insights.md");
        let assets = dir.path().join("assets");
        let json_path = dir.path().join("summary.json");
        let cli = Cli::try_parse_from([
            "startup-insights".to_string(),
            "--csv".to_string(),
            csv_path.display().to_string(),
            "report".to_string(),
            "--report".to_string(),
            report_path.display().to_string(),
            "--assets".to_string(),
            assets.display().to_string(),
            "--json".to_string(),
            json_path.display().to_string(),
        ])
        .expect("valid arguments");

        run(cli).expect("run succeeds");

        let report = std::fs::read_to_string(&report_path).expect("report written");
        assert!(report.contains("Peak Submission Year**: 2024"));
        assert!(assets.join("monthly_heatmap.svg").exists());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).expect("json written"))
                .expect("valid json");
        assert_eq!(json["total"], 590);
        assert_eq!(json["status"]["rows"][0]["key"], "REJECTED");
        assert_eq!(json["readiness"]["rows"][0]["key"], "Business Model");
        assert_eq!(json["readiness"]["rows"][0]["count"], 231);
    }

    #[test]
    fn json_summary_is_byte_identical_across_runs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv_path = dir.path().join("ideas.csv");
        std::fs::write(&csv_path, fixtures::reference_csv()).expect("write csv");

        let render = || {
            let dataset = dataset::load(&csv_path).expect("load");
            serde_json::to_string_pretty(&aggregate::aggregate(&dataset)).expect("serialize")
        };
        assert_eq!(render(), render());
    }

    fn reference_csv_in(dir: &Path) -> PathBuf {
        let csv_path = dir.join("ideas.csv");
        std::fs::write(&csv_path, fixtures::reference_csv()).expect("write csv");
        csv_path
    }

    #[test]
    fn no_charts_skips_the_assets_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv_path = reference_csv_in(dir.path());
        let report_path = dir.path().join("startup_insights.md");
        let assets = dir.path().join("assets");
        let cli = Cli::try_parse_from([
            "startup-insights".to_string(),
            "--csv".to_string(),
            csv_path.display().to_string(),
            "report".to_string(),
            "--report".to_string(),
            report_path.display().to_string(),
            "--assets".to_string(),
            assets.display().to_string(),
            "--no-charts".to_string(),
        ])
        .expect("valid arguments");

        run(cli).expect("run succeeds");

        assert!(report_path.exists());
        assert!(!assets.exists());
    }

    #[test]
    fn summary_writes_no_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv_path = reference_csv_in(dir.path());
        let cli = Cli::try_parse_from([
            "startup-insights".to_string(),
            "--csv".to_string(),
            csv_path.display().to_string(),
            "summary".to_string(),
        ])
        .expect("valid arguments");
        assert!(matches!(cli.command, Some(Commands::Summary)));

        run(cli).expect("summary succeeds");

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read tempdir")
            .map(|entry| entry.expect("dir entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("ideas.csv")]);
    }

    #[test]
    fn missing_input_fails_the_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.csv");
        let cli = Cli::try_parse_from([
            "startup-insights".to_string(),
            "--csv".to_string(),
            missing.display().to_string(),
            "summary".to_string(),
        ])
        .expect("valid arguments");

        let err = run(cli).expect_err("missing file must fail");
        assert!(err.to_string().contains("nope.csv"));
    }
}
