use insights_core::thresholds::RoasTier;
use plotters::style::RGBColor;

/// Colour slots used by every chart.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    // ── Profitability ────────────────────────────────────────────────────────
    pub profit: RGBColor,
    pub loss: RGBColor,
    pub below_target: RGBColor,
    /// Cells and bars whose value is undefined.
    pub undefined: RGBColor,

    // ── Panel accents ────────────────────────────────────────────────────────
    pub platform_bar: RGBColor,
    pub type_bar: RGBColor,
    pub audience_bar: RGBColor,
    pub reference_line: RGBColor,
    pub label: RGBColor,

    // ── Timeline ─────────────────────────────────────────────────────────────
    pub revenue: RGBColor,
    pub cost: RGBColor,

    /// Slice colours for the budget pie, cycled.
    pub pie: Vec<RGBColor>,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            profit: RGBColor(39, 174, 96),
            loss: RGBColor(217, 83, 79),
            below_target: RGBColor(243, 156, 18),
            undefined: RGBColor(200, 200, 200),

            platform_bar: RGBColor(70, 130, 180),
            type_bar: RGBColor(255, 127, 80),
            audience_bar: RGBColor(147, 112, 219),
            reference_line: RGBColor(0, 0, 0),
            label: RGBColor(60, 60, 60),

            revenue: RGBColor(0, 128, 0),
            cost: RGBColor(220, 20, 60),

            pie: vec![
                RGBColor(255, 153, 153),
                RGBColor(102, 179, 255),
                RGBColor(153, 255, 153),
                RGBColor(255, 204, 153),
                RGBColor(204, 153, 255),
                RGBColor(255, 230, 128),
            ],
        }
    }
}

impl ChartTheme {
    /// Colour for a ROAS tier.
    pub fn tier_color(&self, tier: RoasTier) -> RGBColor {
        match tier {
            RoasTier::Loss => self.loss,
            RoasTier::BelowTarget => self.below_target,
            RoasTier::OnTarget => self.profit,
            RoasTier::Undefined => self.undefined,
        }
    }

    /// Slice colour for the `index`-th pie segment.
    pub fn pie_color(&self, index: usize) -> RGBColor {
        self.pie[index % self.pie.len()]
    }
}

// ── Colour maps ──────────────────────────────────────────────────────────────

/// Position of `value` within `[min, max]`, clamped to `[0, 1]`. A degenerate
/// range maps to the midpoint.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if !(max > min) || !value.is_finite() {
        return 0.5;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Piecewise-linear map over evenly spaced colour stops.
fn gradient(stops: &[RGBColor], t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let segments = stops.len() - 1;
    let scaled = t * segments as f64;
    let idx = (scaled.floor() as usize).min(segments - 1);
    lerp(stops[idx], stops[idx + 1], scaled - idx as f64)
}

/// Red (low) through yellow to green (high).
pub fn red_yellow_green(t: f64) -> RGBColor {
    gradient(
        &[
            RGBColor(165, 0, 38),
            RGBColor(254, 224, 139),
            RGBColor(0, 104, 55),
        ],
        t,
    )
}

/// Purple (low) through teal to yellow (high).
pub fn viridis(t: f64) -> RGBColor {
    gradient(
        &[
            RGBColor(68, 1, 84),
            RGBColor(33, 145, 140),
            RGBColor(253, 231, 37),
        ],
        t,
    )
}

/// Diverging blue/red map for correlation coefficients in `[-1, 1]`.
pub fn coolwarm(r: f64) -> RGBColor {
    gradient(
        &[
            RGBColor(59, 76, 192),
            RGBColor(221, 221, 221),
            RGBColor(180, 4, 38),
        ],
        (r + 1.0) / 2.0,
    )
}
