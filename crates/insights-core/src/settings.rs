use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Marketing campaign KPI analysis: console profile, HTML report and charts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "campaign-insights",
    about = "Marketing campaign KPI analysis: console profile, HTML report and charts",
    version
)]
pub struct Settings {
    /// Campaign dataset (CSV with a header row)
    #[arg(long, default_value = "datos_sinteticos.csv")]
    pub input: PathBuf,

    /// Directory that receives the HTML report and the chart images
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Which outputs to produce
    #[arg(long, default_value = "all", value_parser = ["all", "profile", "report", "charts"])]
    pub task: String,

    /// Column parsed as the campaign date
    #[arg(long, default_value = "fecha_campana")]
    pub date_column: String,

    /// File name of the HTML report
    #[arg(long, default_value = "campaign_report.html")]
    pub report_file: String,

    /// File name of the 3x3 analysis dashboard image
    #[arg(long, default_value = "campaign_dashboard.png")]
    pub dashboard_file: String,

    /// File name of the correlation heatmap image
    #[arg(long, default_value = "correlation_matrix.png")]
    pub heatmap_file: String,

    /// File name of the revenue/cost timeline image
    #[arg(long, default_value = "campaign_timeline.png")]
    pub timeline_file: String,

    /// Also write the KPI summary as JSON to this path
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Task ───────────────────────────────────────────────────────────────────────

/// One unit of work the binary can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Profile,
    Report,
    Charts,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// Apply the `--debug` flag.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Tasks selected by `--task`, in execution order.
    pub fn tasks(&self) -> Vec<Task> {
        match self.task.as_str() {
            "profile" => vec![Task::Profile],
            "report" => vec![Task::Report],
            "charts" => vec![Task::Charts],
            _ => vec![Task::Profile, Task::Report, Task::Charts],
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.output_dir.join(&self.dashboard_file)
    }

    pub fn heatmap_path(&self) -> PathBuf {
        self.output_dir.join(&self.heatmap_file)
    }

    pub fn timeline_path(&self) -> PathBuf {
        self.output_dir.join(&self.timeline_file)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── test_settings_default_values ─────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::load_from_args(["campaign-insights"]);

        assert_eq!(settings.input, PathBuf::from("datos_sinteticos.csv"));
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert_eq!(settings.task, "all");
        assert_eq!(settings.date_column, "fecha_campana");
        assert_eq!(settings.report_file, "campaign_report.html");
        assert_eq!(settings.dashboard_file, "campaign_dashboard.png");
        assert_eq!(settings.heatmap_file, "correlation_matrix.png");
        assert_eq!(settings.timeline_file, "campaign_timeline.png");
        assert!(settings.summary_json.is_none());
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
    }

    // ── test_debug_overrides_log_level ───────────────────────────────────────

    #[test]
    fn test_debug_overrides_log_level() {
        let settings =
            Settings::load_from_args(["campaign-insights", "--log-level", "ERROR", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    // ── test_tasks ───────────────────────────────────────────────────────────

    #[test]
    fn test_tasks_all_runs_every_task_in_order() {
        let settings = Settings::load_from_args(["campaign-insights"]);
        assert_eq!(
            settings.tasks(),
            vec![Task::Profile, Task::Report, Task::Charts]
        );
    }

    #[test]
    fn test_tasks_single() {
        let settings = Settings::load_from_args(["campaign-insights", "--task", "charts"]);
        assert_eq!(settings.tasks(), vec![Task::Charts]);
    }

    #[test]
    fn test_invalid_task_rejected() {
        let result = Settings::try_parse_from(["campaign-insights", "--task", "export"]);
        assert!(result.is_err());
    }

    // ── test_output_paths ────────────────────────────────────────────────────

    #[test]
    fn test_output_paths_join_output_dir() {
        let settings = Settings::load_from_args([
            "campaign-insights",
            "--output-dir",
            "/tmp/out",
            "--report-file",
            "r.html",
        ]);
        assert_eq!(settings.report_path(), PathBuf::from("/tmp/out/r.html"));
        assert_eq!(
            settings.dashboard_path(),
            PathBuf::from("/tmp/out/campaign_dashboard.png")
        );
        assert_eq!(
            settings.heatmap_path(),
            PathBuf::from("/tmp/out/correlation_matrix.png")
        );
        assert_eq!(
            settings.timeline_path(),
            PathBuf::from("/tmp/out/campaign_timeline.png")
        );
    }
}
