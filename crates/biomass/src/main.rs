use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use biomass_core::config::AnalysisConfig;
use biomass_core::frame::{derived_frame, write_frame};
use biomass_core::report::summary_table;
use biomass_core::Analysis;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Land vertebrate biomass analysis", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print relative changes and the scenario estimate
    Report(ReportArgs),
    /// Write every chart as SVG
    Render(RenderArgs),
    /// Write the derived table as CSV or Parquet
    Export(ExportArgs),
    /// Report, render and export in one go
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
struct ReportArgs {
    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Also print the per-year table
    #[arg(long)]
    table: bool,
}

#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// Output directory (overrides config and BIOMASS_OUTPUT_DIR)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Scan of the source chart to draw behind the calibration figure
    #[arg(long)]
    underlay: Option<PathBuf>,
    /// Only render figures with these ids
    #[arg(long = "only", value_name = "ID")]
    only: Vec<String>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Destination file, .csv or .parquet
    #[arg(long)]
    out: PathBuf,
    /// Export the imagined scenario instead of the base data
    #[arg(long)]
    imagined: bool,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Output directory (overrides config and BIOMASS_OUTPUT_DIR)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = AnalysisConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("failed to load configuration from {}", path.display()),
        None => "invalid configuration".to_string(),
    })?;

    match cli.command {
        Command::Report(args) => handle_report(config, args),
        Command::Render(args) => handle_render(config, args),
        Command::Export(args) => handle_export(config, args),
        Command::Run(args) => handle_run(config, args),
    }
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn prepare(config: AnalysisConfig) -> Result<Analysis> {
    Analysis::run(config).context("failed to derive the analysis")
}

fn handle_report(config: AnalysisConfig, args: ReportArgs) -> Result<()> {
    let analysis = prepare(config)?;
    let report = analysis.report()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for sentence in report.sentences() {
        println!("{sentence}");
    }
    if args.table {
        println!();
        println!("{}", summary_table(&analysis.base_table));
        println!();
        println!("{}", summary_table(&analysis.imagined_table));
    }
    Ok(())
}

fn handle_render(mut config: AnalysisConfig, args: RenderArgs) -> Result<()> {
    if let Some(out) = args.out {
        config.output_dir = out;
    }
    if let Some(underlay) = args.underlay {
        config.underlay = Some(underlay);
    }
    let analysis = prepare(config)?;
    render_figures(&analysis, &args.only)?;
    Ok(())
}

fn render_figures(analysis: &Analysis, only: &[String]) -> Result<Vec<PathBuf>> {
    let mut figures = analysis.figures();
    if !only.is_empty() {
        let unknown: Vec<&str> = only
            .iter()
            .map(String::as_str)
            .filter(|id| !figures.iter().any(|f| f.id == *id))
            .collect();
        if !unknown.is_empty() {
            let known: Vec<&str> = figures.iter().map(|f| f.id).collect();
            bail!(
                "unknown figure id(s) {}; expected one of {}",
                unknown.join(", "),
                known.join(", ")
            );
        }
        figures.retain(|figure| only.iter().any(|id| id == figure.id));
    }

    let dir = &analysis.config.output_dir;
    let written = biomass_plot::write_all(&figures, dir)
        .with_context(|| format!("failed to render figures into {}", dir.display()))?;
    for path in &written {
        println!("wrote {}", path.display());
    }
    Ok(written)
}

fn handle_export(config: AnalysisConfig, args: ExportArgs) -> Result<()> {
    let analysis = prepare(config)?;
    export_table(&analysis, args.imagined, &args.out)?;
    Ok(())
}

fn export_table(analysis: &Analysis, imagined: bool, out: &Path) -> Result<()> {
    let df = derived_frame(analysis.table(imagined))?;
    let format = write_frame(&df, out)
        .with_context(|| format!("failed to write table to {}", out.display()))?;
    info!(?format, imagined, "table exported");
    println!("wrote {}", out.display());
    Ok(())
}

fn handle_run(mut config: AnalysisConfig, args: RunArgs) -> Result<()> {
    if let Some(out) = args.out {
        config.output_dir = out;
    }
    if config.underlay.is_none() {
        warn!("no underlay configured; calibration chart is drawn without the source scan");
    }

    let analysis = prepare(config)?;
    for sentence in analysis.report()?.sentences() {
        println!("{sentence}");
    }

    render_figures(&analysis, &[])?;

    let dir = analysis.config.output_dir.clone();
    export_table(&analysis, false, &dir.join("biomass.csv"))?;
    export_table(&analysis, true, &dir.join("biomass_imagined.csv"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "biomass",
            "render",
            "--out",
            "charts",
            "--only",
            "calibration",
            "--only",
            "stacked_mass",
            "--config",
            "biomass.toml",
        ])
        .expect("valid arguments");

        assert_eq!(cli.config, Some(PathBuf::from("biomass.toml")));
        match cli.command {
            Command::Render(args) => {
                assert_eq!(args.out, Some(PathBuf::from("charts")));
                assert_eq!(args.only, vec!["calibration", "stacked_mass"]);
                assert!(args.underlay.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn export_requires_destination() {
        assert!(Cli::try_parse_from(["biomass", "export"]).is_err());

        let cli = Cli::try_parse_from(["biomass", "export", "--out", "t.parquet", "--imagined"])
            .expect("valid arguments");
        assert!(matches!(
            cli.command,
            Command::Export(ExportArgs { imagined: true, .. })
        ));
    }

    #[test]
    fn report_flags() {
        let cli = Cli::try_parse_from(["biomass", "--log-json", "report", "--json"])
            .expect("valid arguments");
        assert!(cli.log_json);
        assert!(matches!(
            cli.command,
            Command::Report(ReportArgs {
                json: true,
                table: false
            })
        ));
    }

    #[test]
    fn unknown_figure_ids_are_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = AnalysisConfig {
            output_dir: dir.path().to_path_buf(),
            ..AnalysisConfig::default()
        };
        let analysis = Analysis::run(config)?;

        let err = render_figures(&analysis, &["pie_chart".to_string()]).unwrap_err();
        assert!(err.to_string().contains("pie_chart"));

        let written = render_figures(&analysis, &["share_two_band".to_string()])?;
        assert_eq!(written, vec![dir.path().join("share_two_band.svg")]);
        Ok(())
    }
}
