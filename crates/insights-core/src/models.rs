use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single campaign row read from the input CSV.
///
/// Ratio fields are taken verbatim from the input; they are never
/// recomputed from the raw counts at row level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// Campaign identifier, e.g. `"CAMP-001"`.
    pub id: String,
    /// Advertising platform, e.g. `"Facebook Ads"`.
    pub platform: String,
    /// Campaign type, e.g. `"Conversion"`.
    pub campaign_type: String,
    /// Target audience segment, e.g. `"25-34"`.
    pub audience: String,
    /// Date the campaign ran.
    pub date: NaiveDate,
    /// Daily budget in currency units.
    pub daily_budget: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    /// Total spend in currency units (non-negative).
    pub total_cost: f64,
    /// Revenue attributed to the campaign (non-negative).
    pub revenue: f64,
    /// Click-through rate in percent.
    pub ctr: f64,
    /// Conversion rate in percent.
    pub conversion_rate: f64,
    /// Cost per acquisition.
    pub cpa: f64,
    /// Return on ad spend (revenue / cost).
    pub roas: f64,
    /// Engagement rate in percent.
    pub engagement_rate: f64,
}

impl CampaignRecord {
    /// Net result of the campaign: revenue minus cost. Negative means a loss.
    pub fn net_return(&self) -> f64 {
        self.revenue - self.total_cost
    }

    /// Value of the categorical field selected by `dimension`.
    pub fn dimension_value(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Platform => &self.platform,
            Dimension::CampaignType => &self.campaign_type,
            Dimension::Audience => &self.audience,
        }
    }
}

// ── Dimension ─────────────────────────────────────────────────────────────────

/// Categorical field that campaign records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Platform,
    CampaignType,
    Audience,
}

impl Dimension {
    /// The canonical snake_case identifier for this dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Platform => "platform",
            Dimension::CampaignType => "campaign_type",
            Dimension::Audience => "audience",
        }
    }

    /// Human-readable label used in report headings.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Platform => "Platform",
            Dimension::CampaignType => "Campaign Type",
            Dimension::Audience => "Audience",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CampaignField ─────────────────────────────────────────────────────────────

/// Every column of the campaign schema.
///
/// The canonical header names are those of the source dataset; each field
/// also accepts an English alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampaignField {
    Id,
    Platform,
    CampaignType,
    Audience,
    Date,
    DailyBudget,
    Impressions,
    Clicks,
    Conversions,
    TotalCost,
    Revenue,
    Ctr,
    ConversionRate,
    Cpa,
    Roas,
    EngagementRate,
}

impl CampaignField {
    pub const ALL: [CampaignField; 16] = [
        CampaignField::Id,
        CampaignField::Platform,
        CampaignField::CampaignType,
        CampaignField::Audience,
        CampaignField::Date,
        CampaignField::DailyBudget,
        CampaignField::Impressions,
        CampaignField::Clicks,
        CampaignField::Conversions,
        CampaignField::TotalCost,
        CampaignField::Revenue,
        CampaignField::Ctr,
        CampaignField::ConversionRate,
        CampaignField::Cpa,
        CampaignField::Roas,
        CampaignField::EngagementRate,
    ];

    /// Header name used by the source dataset.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            CampaignField::Id => "campana_id",
            CampaignField::Platform => "plataforma",
            CampaignField::CampaignType => "tipo_campana",
            CampaignField::Audience => "audiencia_objetivo",
            CampaignField::Date => "fecha_campana",
            CampaignField::DailyBudget => "presupuesto_diario",
            CampaignField::Impressions => "impresiones",
            CampaignField::Clicks => "clicks",
            CampaignField::Conversions => "conversiones",
            CampaignField::TotalCost => "costo_total",
            CampaignField::Revenue => "revenue_generado",
            CampaignField::Ctr => "ctr",
            CampaignField::ConversionRate => "conversion_rate",
            CampaignField::Cpa => "cpa",
            CampaignField::Roas => "roas",
            CampaignField::EngagementRate => "engagement_rate",
        }
    }

    /// English alias accepted in place of the canonical header, if any.
    pub fn alias(&self) -> Option<&'static str> {
        match self {
            CampaignField::Id => Some("campaign_id"),
            CampaignField::Platform => Some("platform"),
            CampaignField::CampaignType => Some("campaign_type"),
            CampaignField::Audience => Some("audience"),
            CampaignField::Date => Some("campaign_date"),
            CampaignField::DailyBudget => Some("daily_budget"),
            CampaignField::Impressions => Some("impressions"),
            CampaignField::Conversions => Some("conversions"),
            CampaignField::TotalCost => Some("total_cost"),
            CampaignField::Revenue => Some("revenue"),
            CampaignField::Clicks
            | CampaignField::Ctr
            | CampaignField::ConversionRate
            | CampaignField::Cpa
            | CampaignField::Roas
            | CampaignField::EngagementRate => None,
        }
    }

    /// Whether `header` names this field (case-insensitive, trimmed).
    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header.eq_ignore_ascii_case(self.canonical_name())
            || self
                .alias()
                .map(|alias| header.eq_ignore_ascii_case(alias))
                .unwrap_or(false)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
