//! The computed facts a report is rendered from.
//!
//! [`ReportFacts`] gathers every number the narrative needs so that the
//! template functions in [`crate::html`] only format and never compute.

use chrono::NaiveDateTime;
use insights_core::models::{CampaignField, CampaignRecord};
use insights_core::stats::coefficient_of_variation;
use insights_core::thresholds::ANOMALOUS_CTR_PCT;
use insights_data::aggregator::{GroupSummary, KpiSummary};
use insights_data::analysis::AnalysisResult;
use insights_data::analyzer::CorrelationMatrix;

/// Data model behind the HTML report.
#[derive(Debug, Clone)]
pub struct ReportFacts<'a> {
    pub generated_at: NaiveDateTime,
    pub kpis: &'a KpiSummary,
    pub platforms: &'a [GroupSummary],
    pub campaign_types: &'a [GroupSummary],
    /// Audience with the highest mean engagement rate.
    pub best_engagement_audience: Option<&'a GroupSummary>,
    pub ctr_cv_pct: Option<f64>,
    pub cpa_cv_pct: Option<f64>,
    /// Campaigns whose CTR exceeds the anomaly threshold.
    pub anomalous_ctr: usize,
    /// Column most correlated with ROAS and its coefficient.
    pub strongest_roas_correlation: Option<(String, f64)>,
    pub revenue_roas_correlation: Option<f64>,
    /// Every campaign, ROAS descending.
    pub ranked: Vec<&'a CampaignRecord>,
}

impl<'a> ReportFacts<'a> {
    pub fn build(analysis: &'a AnalysisResult, generated_at: NaiveDateTime) -> Self {
        let records = &analysis.records;
        let ctr: Vec<f64> = records.iter().map(|r| r.ctr).collect();
        let cpa: Vec<f64> = records.iter().map(|r| r.cpa).collect();

        let best_engagement_audience = analysis.audiences.iter().fold(
            None,
            |best: Option<&GroupSummary>, g| match best {
                Some(b) if b.mean_engagement_rate >= g.mean_engagement_rate => best,
                _ => Some(g),
            },
        );

        let matrix = &analysis.profile.correlation;
        let roas_column = field_column(matrix, CampaignField::Roas);
        let revenue_column = field_column(matrix, CampaignField::Revenue);

        Self {
            generated_at,
            kpis: &analysis.kpis,
            platforms: &analysis.platforms,
            campaign_types: &analysis.campaign_types,
            best_engagement_audience,
            ctr_cv_pct: coefficient_of_variation(&ctr),
            cpa_cv_pct: coefficient_of_variation(&cpa),
            anomalous_ctr: ctr.iter().filter(|&&c| c > ANOMALOUS_CTR_PCT).count(),
            strongest_roas_correlation: roas_column.and_then(|roas| {
                matrix
                    .strongest_with(roas)
                    .map(|(name, r)| (name.to_string(), r))
            }),
            revenue_roas_correlation: roas_column
                .zip(revenue_column)
                .and_then(|(roas, revenue)| matrix.get(revenue, roas)),
            ranked: analysis.ranked_by_roas(),
        }
    }
}

/// Header name in `matrix` holding `field`, canonical or alias.
fn field_column(matrix: &CorrelationMatrix, field: CampaignField) -> Option<&str> {
    matrix
        .columns
        .iter()
        .find(|c| field.matches(c))
        .map(String::as_str)
}
