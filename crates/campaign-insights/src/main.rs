mod bootstrap;

use anyhow::{Context, Result};
use chrono::Local;
use insights_core::error::InsightsError;
use insights_core::settings::{Settings, Task};
use insights_data::analysis::{analyze_campaigns, AnalysisResult};
use insights_data::analyzer::DataProfiler;
use insights_data::reader::{load_table, Table};
use insights_report::charts::{render_charts, ChartPaths};
use insights_report::console::render_profile;
use insights_report::facts::ReportFacts;
use insights_report::html::render_report;
use insights_report::themes::ChartTheme;
use std::path::Path;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Campaign Insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, Output: {}, Task: {}",
        settings.input.display(),
        settings.output_dir.display(),
        settings.task
    );

    run(&settings)
}

/// Execute every selected task against `settings.input`.
fn run(settings: &Settings) -> Result<()> {
    bootstrap::ensure_output_dir(&settings.output_dir).with_context(|| {
        format!("creating output directory {}", settings.output_dir.display())
    })?;

    let table = load_table(&settings.input, &settings.date_column)?;
    let tasks = settings.tasks();

    // The console profile needs no campaign schema; everything else does.
    let needs_analysis = settings.summary_json.is_some()
        || tasks.iter().any(|t| matches!(t, Task::Report | Task::Charts));
    let analysis = if needs_analysis {
        Some(analyze_campaigns(&table)?)
    } else {
        None
    };

    for task in tasks {
        if task == Task::Profile {
            print_profile(&table, analysis.as_ref());
            continue;
        }
        let analysis = analysis.as_ref().context("campaign analysis was not computed")?;
        match task {
            Task::Report => write_report(settings, analysis)?,
            Task::Charts => {
                let paths = ChartPaths {
                    dashboard: settings.dashboard_path(),
                    heatmap: settings.heatmap_path(),
                    timeline: settings.timeline_path(),
                };
                render_charts(analysis, &paths, &ChartTheme::default())?;
            }
            Task::Profile => {}
        }
    }

    if let (Some(path), Some(analysis)) = (settings.summary_json.as_deref(), analysis.as_ref()) {
        write_summary(path, analysis)?;
    }

    tracing::info!("Done");
    Ok(())
}

fn print_profile(table: &Table, analysis: Option<&AnalysisResult>) {
    let text = match analysis {
        Some(analysis) => render_profile(table, &analysis.profile),
        None => render_profile(table, &DataProfiler::profile(table)),
    };
    println!("{text}");
}

fn write_report(settings: &Settings, analysis: &AnalysisResult) -> Result<()> {
    let facts = ReportFacts::build(analysis, Local::now().naive_local());
    let path = settings.report_path();
    write_file(&path, &render_report(&facts))?;
    tracing::info!("Report saved to {}", path.display());
    Ok(())
}

fn write_summary(path: &Path, analysis: &AnalysisResult) -> Result<()> {
    let json = serde_json::to_string_pretty(analysis).map_err(InsightsError::from)?;
    write_file(path, &json)?;
    tracing::info!("JSON summary saved to {}", path.display());
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| InsightsError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
