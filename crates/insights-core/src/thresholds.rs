use serde::{Deserialize, Serialize};

/// ROAS below this value loses money (revenue does not cover spend).
pub const BREAK_EVEN_ROAS: f64 = 1.0;

/// Minimum ROAS considered profitable enough; used for alerting.
pub const TARGET_ROAS: f64 = 2.0;

/// Campaigns at or above this ROAS are candidates for more budget.
pub const SCALE_UP_ROAS: f64 = 5.0;

/// Portfolio-level ROAS the recommendations aim for.
pub const ASPIRATIONAL_ROAS: f64 = 3.5;

/// CTR (percent) above which a campaign is treated as anomalous.
pub const ANOMALOUS_CTR_PCT: f64 = 30.0;

/// Number of lowest-CPA campaigns highlighted in the CPA chart.
pub const CPA_HIGHLIGHT_COUNT: usize = 5;

/// Profitability tier of a ROAS value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoasTier {
    /// ROAS < 1.0.
    Loss,
    /// 1.0 ≤ ROAS < 2.0.
    BelowTarget,
    /// ROAS ≥ 2.0.
    OnTarget,
    /// ROAS could not be computed (zero cost).
    Undefined,
}

impl RoasTier {
    /// Classify an optional ROAS value.
    pub fn classify(roas: Option<f64>) -> Self {
        match roas {
            Some(r) if r.is_finite() => {
                if r < BREAK_EVEN_ROAS {
                    RoasTier::Loss
                } else if r < TARGET_ROAS {
                    RoasTier::BelowTarget
                } else {
                    RoasTier::OnTarget
                }
            }
            _ => RoasTier::Undefined,
        }
    }

    /// Whether this tier loses money.
    pub fn is_loss(&self) -> bool {
        matches!(self, RoasTier::Loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(RoasTier::classify(Some(0.99)), RoasTier::Loss);
        assert_eq!(RoasTier::classify(Some(1.0)), RoasTier::BelowTarget);
        assert_eq!(RoasTier::classify(Some(1.99)), RoasTier::BelowTarget);
        assert_eq!(RoasTier::classify(Some(2.0)), RoasTier::OnTarget);
        assert_eq!(RoasTier::classify(Some(12.0)), RoasTier::OnTarget);
    }

    #[test]
    fn test_classify_undefined() {
        assert_eq!(RoasTier::classify(None), RoasTier::Undefined);
        assert_eq!(RoasTier::classify(Some(f64::NAN)), RoasTier::Undefined);
    }

    #[test]
    fn test_is_loss() {
        assert!(RoasTier::Loss.is_loss());
        assert!(!RoasTier::BelowTarget.is_loss());
        assert!(!RoasTier::Undefined.is_loss());
    }

    #[test]
    fn test_threshold_ordering() {
        assert!(BREAK_EVEN_ROAS < TARGET_ROAS);
        assert!(TARGET_ROAS < ASPIRATIONAL_ROAS);
        assert!(ASPIRATIONAL_ROAS < SCALE_UP_ROAS);
    }
}
