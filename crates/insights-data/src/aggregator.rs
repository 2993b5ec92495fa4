//! Campaign KPI aggregation: portfolio totals and per-dimension groups.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use insights_core::error::{InsightsError, Result};
use insights_core::formatting::round_to;
use insights_core::models::{CampaignRecord, Dimension};
use insights_core::stats::{argmax, argmin, mean};
use insights_core::thresholds::BREAK_EVEN_ROAS;
use serde::Serialize;
use tracing::{debug, warn};

// ── MetricRange ───────────────────────────────────────────────────────────────

/// Smallest and largest value of a per-campaign metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    /// `max / min`, undefined when `min` is zero.
    pub fn ratio(&self) -> Option<f64> {
        (self.min != 0.0).then(|| self.max / self.min)
    }
}

// ── ReportingPeriod ───────────────────────────────────────────────────────────

/// First and last campaign date in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingPeriod {
    /// Whole days between `start` and `end`.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

// ── KpiSummary ────────────────────────────────────────────────────────────────

/// Portfolio-wide KPIs.
///
/// `mean_*` fields average the per-campaign column (mean of ratios) while
/// `pooled_roas` divides total revenue by total cost. The two are kept apart
/// on purpose; the report shows both.
#[derive(Debug, Clone, Serialize)]
pub struct KpiSummary {
    pub campaigns: usize,
    pub platforms: usize,
    pub audiences: usize,
    pub campaign_types: usize,

    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_budget: f64,
    pub total_conversions: u64,
    pub total_impressions: u64,
    pub total_clicks: u64,

    pub mean_roas: f64,
    pub mean_ctr: f64,
    pub mean_cpa: f64,
    /// `total_revenue / total_cost`; `None` when nothing was spent.
    pub pooled_roas: Option<f64>,

    pub best_roas: CampaignRecord,
    pub worst_roas: CampaignRecord,
    pub best_conversions: CampaignRecord,

    pub ctr_range: MetricRange,
    pub cpa_range: MetricRange,
    pub roas_range: MetricRange,
    pub period: ReportingPeriod,

    /// Ids of campaigns with ROAS below break-even, in input order.
    pub loss_making: Vec<String>,
    /// Spend of the loss-making campaigns.
    pub loss_making_cost: f64,
}

impl KpiSummary {
    /// Net gain per unit spent, `mean_roas - 1`.
    pub fn mean_gain(&self) -> f64 {
        self.mean_roas - BREAK_EVEN_ROAS
    }
}

// ── GroupSummary ──────────────────────────────────────────────────────────────

/// Sums for one value of a [`Dimension`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub campaigns: usize,
    pub revenue: f64,
    pub cost: f64,
    pub budget: f64,
    pub conversions: u64,
    pub impressions: u64,
    pub clicks: u64,
    pub mean_engagement_rate: f64,
    /// `revenue / cost` rounded to 2 decimals; `None` for zero cost.
    pub pooled_roas: Option<f64>,
}

impl GroupSummary {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            campaigns: 0,
            revenue: 0.0,
            cost: 0.0,
            budget: 0.0,
            conversions: 0,
            impressions: 0,
            clicks: 0,
            mean_engagement_rate: 0.0,
            pooled_roas: None,
        }
    }

    /// Accumulate `record`; `mean_engagement_rate` holds the running sum
    /// until [`GroupSummary::finish`].
    fn add_record(&mut self, record: &CampaignRecord) {
        self.campaigns += 1;
        self.revenue += record.revenue;
        self.cost += record.total_cost;
        self.budget += record.daily_budget;
        self.conversions += record.conversions;
        self.impressions += record.impressions;
        self.clicks += record.clicks;
        self.mean_engagement_rate += record.engagement_rate;
    }

    fn finish(&mut self) {
        if self.campaigns > 0 {
            self.mean_engagement_rate /= self.campaigns as f64;
        }
        self.pooled_roas = (self.cost > 0.0).then(|| round_to(self.revenue / self.cost, 2));
    }
}

// ── CampaignAggregator ────────────────────────────────────────────────────────

/// Stateless helper computing KPIs over a campaign record set.
pub struct CampaignAggregator;

impl CampaignAggregator {
    /// Compute the portfolio [`KpiSummary`].
    ///
    /// Returns [`InsightsError::NoRecords`] for an empty slice. Best and worst
    /// campaigns resolve ties to the first occurrence in input order.
    pub fn summarize(records: &[CampaignRecord]) -> Result<KpiSummary> {
        let first = records.first().ok_or(InsightsError::NoRecords)?;

        let column = |f: fn(&CampaignRecord) -> f64| records.iter().map(f).collect::<Vec<f64>>();
        let roas = column(|r| r.roas);
        let ctr = column(|r| r.ctr);
        let cpa = column(|r| r.cpa);
        let conversions = column(|r| r.conversions as f64);

        let pick = |idx: Option<usize>| records[idx.unwrap_or(0)].clone();

        let total_revenue: f64 = records.iter().map(|r| r.revenue).sum();
        let total_cost: f64 = records.iter().map(|r| r.total_cost).sum();

        let loss: Vec<&CampaignRecord> = records
            .iter()
            .filter(|r| r.roas < BREAK_EVEN_ROAS)
            .collect();

        let period = records.iter().fold(
            ReportingPeriod {
                start: first.date,
                end: first.date,
            },
            |p, r| ReportingPeriod {
                start: p.start.min(r.date),
                end: p.end.max(r.date),
            },
        );

        let distinct = |dimension: Dimension| {
            let mut seen: Vec<&str> = records.iter().map(|r| r.dimension_value(dimension)).collect();
            seen.sort_unstable();
            seen.dedup();
            seen.len()
        };

        let fallback = MetricRange { min: 0.0, max: 0.0 };
        let summary = KpiSummary {
            campaigns: records.len(),
            platforms: distinct(Dimension::Platform),
            audiences: distinct(Dimension::Audience),
            campaign_types: distinct(Dimension::CampaignType),

            total_revenue,
            total_cost,
            total_budget: records.iter().map(|r| r.daily_budget).sum(),
            total_conversions: records.iter().map(|r| r.conversions).sum(),
            total_impressions: records.iter().map(|r| r.impressions).sum(),
            total_clicks: records.iter().map(|r| r.clicks).sum(),

            mean_roas: mean(&roas).unwrap_or_default(),
            mean_ctr: mean(&ctr).unwrap_or_default(),
            mean_cpa: mean(&cpa).unwrap_or_default(),
            pooled_roas: (total_cost > 0.0).then(|| total_revenue / total_cost),

            best_roas: pick(argmax(roas.iter().copied())),
            worst_roas: pick(argmin(roas.iter().copied())),
            best_conversions: pick(argmax(conversions)),

            ctr_range: MetricRange::of(ctr).unwrap_or(fallback),
            cpa_range: MetricRange::of(cpa).unwrap_or(fallback),
            roas_range: MetricRange::of(roas).unwrap_or(fallback),
            period,

            loss_making: loss.iter().map(|r| r.id.clone()).collect(),
            loss_making_cost: loss.iter().map(|r| r.total_cost).sum(),
        };

        debug!(
            "KPIs: {} campaigns, revenue {:.2}, cost {:.2}, mean ROAS {:.4}",
            summary.campaigns, summary.total_revenue, summary.total_cost, summary.mean_roas
        );
        Ok(summary)
    }

    /// Group `records` by `dimension`.
    ///
    /// Groups are sorted by pooled ROAS descending; groups with undefined ROAS
    /// go last and ties keep first-seen order.
    pub fn group_by(records: &[CampaignRecord], dimension: Dimension) -> Vec<GroupSummary> {
        let mut groups: Vec<GroupSummary> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for record in records {
            let key = record.dimension_value(dimension);
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(GroupSummary::new(key));
                groups.len() - 1
            });
            groups[slot].add_record(record);
        }

        for group in &mut groups {
            group.finish();
            if group.pooled_roas.is_none() {
                warn!(
                    "{} group {:?} has zero cost; ROAS undefined",
                    dimension.label(),
                    group.key
                );
            }
        }

        groups.sort_by(|a, b| roas_desc(a.pooled_roas, b.pooled_roas));
        debug!("Grouped by {dimension}: {} groups", groups.len());
        groups
    }

    /// Records ordered by ROAS descending, ties in input order.
    pub fn rank_by_roas(records: &[CampaignRecord]) -> Vec<&CampaignRecord> {
        let mut ranked: Vec<&CampaignRecord> = records.iter().collect();
        ranked.sort_by(|a, b| b.roas.total_cmp(&a.roas));
        ranked
    }
}

/// Descending order with `None` last.
fn roas_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
