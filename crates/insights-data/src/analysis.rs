//! Main analysis pipeline.
//!
//! Converts a loaded [`Table`] into campaign records, computes the portfolio
//! KPIs, the per-dimension groups and the data-quality profile, and returns
//! them as one [`AnalysisResult`] for the renderers.

use chrono::Local;
use insights_core::error::Result;
use insights_core::models::{CampaignRecord, Dimension};
use serde::Serialize;
use tracing::info;

use crate::aggregator::{CampaignAggregator, GroupSummary, KpiSummary};
use crate::analyzer::{DataProfile, DataProfiler};
use crate::reader::{load_campaigns, Table};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Input file the table was read from.
    pub source: String,
    /// Number of campaign records analysed.
    pub records_processed: usize,
    /// Number of columns in the input table.
    pub columns: usize,
    /// Wall-clock seconds spent converting and aggregating.
    pub analysis_time_seconds: f64,
}

/// The complete output of [`analyze_campaigns`].
///
/// Serialises to the JSON summary: KPIs, grouped tables and metadata. The
/// raw records and the quality profile stay out of the JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    #[serde(skip)]
    pub records: Vec<CampaignRecord>,
    #[serde(skip)]
    pub profile: DataProfile,
    pub kpis: KpiSummary,
    pub platforms: Vec<GroupSummary>,
    pub campaign_types: Vec<GroupSummary>,
    pub audiences: Vec<GroupSummary>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Grouped table for `dimension`.
    pub fn groups(&self, dimension: Dimension) -> &[GroupSummary] {
        match dimension {
            Dimension::Platform => &self.platforms,
            Dimension::CampaignType => &self.campaign_types,
            Dimension::Audience => &self.audiences,
        }
    }

    /// Records ordered by ROAS descending.
    pub fn ranked_by_roas(&self) -> Vec<&CampaignRecord> {
        CampaignAggregator::rank_by_roas(&self.records)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline over `table`.
///
/// 1. Parse every row into a [`CampaignRecord`].
/// 2. Compute the portfolio [`KpiSummary`].
/// 3. Group by platform, campaign type and audience.
/// 4. Profile data quality with [`DataProfiler`].
pub fn analyze_campaigns(table: &Table) -> Result<AnalysisResult> {
    let start = std::time::Instant::now();

    // ── Step 1: Records ───────────────────────────────────────────────────────
    let records = load_campaigns(table)?;

    // ── Step 2: KPIs ──────────────────────────────────────────────────────────
    let kpis = CampaignAggregator::summarize(&records)?;

    // ── Step 3: Groups ────────────────────────────────────────────────────────
    let platforms = CampaignAggregator::group_by(&records, Dimension::Platform);
    let campaign_types = CampaignAggregator::group_by(&records, Dimension::CampaignType);
    let audiences = CampaignAggregator::group_by(&records, Dimension::Audience);

    // ── Step 4: Profile ───────────────────────────────────────────────────────
    let profile = DataProfiler::profile(table);

    let metadata = AnalysisMetadata {
        generated_at: Local::now().to_rfc3339(),
        source: table.source.display().to_string(),
        records_processed: records.len(),
        columns: table.n_cols(),
        analysis_time_seconds: start.elapsed().as_secs_f64(),
    };

    info!(
        "Analysed {} campaigns across {} platforms",
        kpis.campaigns, kpis.platforms
    );

    Ok(AnalysisResult {
        records,
        profile,
        kpis,
        platforms,
        campaign_types,
        audiences,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
