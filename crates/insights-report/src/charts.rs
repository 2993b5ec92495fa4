//! PNG charts: the 3x3 analysis dashboard, the correlation heatmap and the
//! revenue/cost timeline.
//!
//! Series preparation (ordering, colouring, labels) is done by the pure
//! `*_bars` / `*_points` / `*_series` functions; the `draw_*` functions only
//! hand the prepared series to plotters.

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use insights_core::error::{InsightsError, Result};
use insights_core::formatting::UNDEFINED;
use insights_core::models::{CampaignRecord, Dimension};
use insights_core::stats::mean;
use insights_core::thresholds::{RoasTier, BREAK_EVEN_ROAS, CPA_HIGHLIGHT_COUNT};
use insights_data::aggregator::GroupSummary;
use insights_data::analysis::AnalysisResult;
use insights_data::analyzer::CorrelationMatrix;
use plotters::chart::SeriesLabelPosition;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use tracing::{debug, info};

use crate::themes::{coolwarm, normalize, red_yellow_green, viridis, ChartTheme};

type DrawResult<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const DASHBOARD_SIZE: (u32, u32) = (2400, 2100);
const HEATMAP_SIZE: (u32, u32) = (1400, 1200);
const TIMELINE_SIZE: (u32, u32) = (1600, 900);

// ── Series types ──────────────────────────────────────────────────────────────

/// One horizontal bar. Bars are drawn bottom-up in slice order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub color: RGBColor,
}

/// One annotated, coloured scatter point.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub color: RGBColor,
}

/// One pie segment.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Share of the whole pie in percent.
    pub share_pct: f64,
}

/// One heatmap cell; `row` 0 is drawn at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    pub row: usize,
    pub col: usize,
    pub value: Option<f64>,
}

impl HeatCell {
    /// Text printed inside the cell.
    pub fn annotation(&self) -> String {
        match self.value {
            Some(r) => format!("{r:.2}"),
            None => UNDEFINED.to_string(),
        }
    }

    pub fn color(&self, theme: &ChartTheme) -> RGBColor {
        self.value.map(coolwarm).unwrap_or(theme.undefined)
    }
}

/// Revenue and cost of one campaign on its date.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub cost: f64,
}

/// Output locations of the three images.
#[derive(Debug, Clone)]
pub struct ChartPaths {
    pub dashboard: PathBuf,
    pub heatmap: PathBuf,
    pub timeline: PathBuf,
}

// ── Series preparation ────────────────────────────────────────────────────────

/// Per-campaign ROAS, ascending; loss-making campaigns in the loss colour.
pub fn roas_bars(records: &[CampaignRecord], theme: &ChartTheme) -> Vec<BarDatum> {
    let mut ordered: Vec<&CampaignRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.roas.total_cmp(&b.roas));
    ordered
        .into_iter()
        .map(|r| BarDatum {
            label: r.id.clone(),
            value: r.roas,
            color: if r.roas < BREAK_EVEN_ROAS {
                theme.loss
            } else {
                theme.profit
            },
        })
        .collect()
}

/// Pooled ROAS per group, ascending. Undefined ROAS is drawn as an empty,
/// grey bar at the bottom.
pub fn group_roas_bars(groups: &[GroupSummary], theme: &ChartTheme) -> Vec<BarDatum> {
    let mut bars: Vec<BarDatum> = groups
        .iter()
        .map(|g| match g.pooled_roas {
            Some(roas) => BarDatum {
                label: g.key.clone(),
                value: roas,
                color: theme.platform_bar,
            },
            None => BarDatum {
                label: format!("{} ({UNDEFINED})", g.key),
                value: 0.0,
                color: theme.tier_color(RoasTier::Undefined),
            },
        })
        .collect();
    bars.sort_by(|a, b| a.value.total_cmp(&b.value));
    bars
}

/// Any group metric as ascending bars in a single colour.
pub fn group_metric_bars(
    groups: &[GroupSummary],
    metric: impl Fn(&GroupSummary) -> f64,
    color: RGBColor,
) -> Vec<BarDatum> {
    let mut bars: Vec<BarDatum> = groups
        .iter()
        .map(|g| BarDatum {
            label: g.key.clone(),
            value: metric(g),
            color,
        })
        .collect();
    bars.sort_by(|a, b| a.value.total_cmp(&b.value));
    bars
}

/// Per-campaign CPA, ascending; the cheapest [`CPA_HIGHLIGHT_COUNT`] in the
/// profit colour, the rest in the loss colour.
pub fn cpa_bars(records: &[CampaignRecord], theme: &ChartTheme) -> Vec<BarDatum> {
    let mut ordered: Vec<&CampaignRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.cpa.total_cmp(&b.cpa));
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, r)| BarDatum {
            label: r.id.clone(),
            value: r.cpa,
            color: if i < CPA_HIGHLIGHT_COUNT {
                theme.profit
            } else {
                theme.loss
            },
        })
        .collect()
}

/// Scatter of two per-campaign metrics, coloured by ROAS on a
/// red-yellow-green scale.
pub fn roas_colored_points(
    records: &[CampaignRecord],
    x: impl Fn(&CampaignRecord) -> f64,
    y: impl Fn(&CampaignRecord) -> f64,
) -> Vec<ScatterPoint> {
    colored_points(records, x, y, |r| r.roas, red_yellow_green)
}

/// Impressions against clicks, coloured by CTR.
pub fn impression_click_points(records: &[CampaignRecord]) -> Vec<ScatterPoint> {
    colored_points(
        records,
        |r| r.impressions as f64,
        |r| r.clicks as f64,
        |r| r.ctr,
        viridis,
    )
}

fn colored_points(
    records: &[CampaignRecord],
    x: impl Fn(&CampaignRecord) -> f64,
    y: impl Fn(&CampaignRecord) -> f64,
    shade: impl Fn(&CampaignRecord) -> f64,
    colormap: fn(f64) -> RGBColor,
) -> Vec<ScatterPoint> {
    let (lo, hi) = bounds(records.iter().map(&shade)).unwrap_or((0.0, 0.0));
    records
        .iter()
        .map(|r| ScatterPoint {
            label: r.id.clone(),
            x: x(r),
            y: y(r),
            color: colormap(normalize(shade(r), lo, hi)),
        })
        .collect()
}

/// Budget share per group, in group order.
pub fn budget_share(groups: &[GroupSummary]) -> Vec<PieSlice> {
    let total: f64 = groups.iter().map(|g| g.budget).sum();
    groups
        .iter()
        .map(|g| PieSlice {
            label: g.key.clone(),
            value: g.budget,
            share_pct: if total > 0.0 {
                g.budget / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Every cell of the correlation matrix in row-major order.
pub fn heatmap_cells(matrix: &CorrelationMatrix) -> Vec<HeatCell> {
    matrix
        .values
        .iter()
        .enumerate()
        .flat_map(|(row, values)| {
            values.iter().enumerate().map(move |(col, value)| HeatCell {
                row,
                col,
                value: *value,
            })
        })
        .collect()
}

/// Campaign revenue and cost ordered by date; same-day campaigns keep input
/// order.
pub fn timeline_series(records: &[CampaignRecord]) -> Vec<TimelinePoint> {
    let mut points: Vec<TimelinePoint> = records
        .iter()
        .map(|r| TimelinePoint {
            date: r.date,
            revenue: r.revenue,
            cost: r.total_cost,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Render all three images.
pub fn render_charts(analysis: &AnalysisResult, paths: &ChartPaths, theme: &ChartTheme) -> Result<()> {
    render_dashboard(&paths.dashboard, analysis, theme)?;
    render_heatmap(&paths.heatmap, &analysis.profile.correlation, theme)?;
    render_timeline(&paths.timeline, &analysis.records, theme)
}

pub fn render_dashboard(path: &Path, analysis: &AnalysisResult, theme: &ChartTheme) -> Result<()> {
    draw_dashboard(path, analysis, theme).map_err(|e| chart_error(path, e))?;
    info!("Dashboard saved to {}", path.display());
    Ok(())
}

pub fn render_heatmap(path: &Path, matrix: &CorrelationMatrix, theme: &ChartTheme) -> Result<()> {
    draw_heatmap(path, matrix, theme).map_err(|e| chart_error(path, e))?;
    info!("Correlation matrix saved to {}", path.display());
    Ok(())
}

pub fn render_timeline(path: &Path, records: &[CampaignRecord], theme: &ChartTheme) -> Result<()> {
    draw_timeline(path, &timeline_series(records), theme).map_err(|e| chart_error(path, e))?;
    info!("Timeline saved to {}", path.display());
    Ok(())
}

fn chart_error(path: &Path, err: Box<dyn Error + Send + Sync>) -> InsightsError {
    InsightsError::Chart {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

fn draw_dashboard(path: &Path, analysis: &AnalysisResult, theme: &ChartTheme) -> DrawResult<()> {
    let records = &analysis.records;
    let root = BitMapBackend::new(path, DASHBOARD_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((3, 3));

    draw_bar_panel(
        &root,
        &panels[0],
        "ROAS per Campaign (red: loss, green: gain)",
        "ROAS",
        &roas_bars(records, theme),
        Some((BREAK_EVEN_ROAS, theme.reference_line)),
    )?;
    draw_scatter_panel(
        &panels[1],
        "Revenue vs Total Cost (colour: ROAS)",
        ("Total cost", "Revenue"),
        &roas_colored_points(records, |r| r.total_cost, |r| r.revenue),
        Some(theme.reference_line),
    )?;
    draw_bar_panel(
        &root,
        &panels[2],
        "ROAS per Platform",
        "ROAS",
        &group_roas_bars(analysis.groups(Dimension::Platform), theme),
        Some((BREAK_EVEN_ROAS, theme.loss)),
    )?;
    draw_bar_panel(
        &root,
        &panels[3],
        "Conversions per Campaign Type",
        "Total conversions",
        &group_metric_bars(
            analysis.groups(Dimension::CampaignType),
            |g| g.conversions as f64,
            theme.type_bar,
        ),
        None,
    )?;
    draw_scatter_panel(
        &panels[4],
        "CTR vs Conversion Rate (colour: ROAS)",
        ("CTR (%)", "Conversion rate (%)"),
        &roas_colored_points(records, |r| r.ctr, |r| r.conversion_rate),
        None,
    )?;
    draw_pie_panel(
        &panels[5],
        "Budget Distribution per Platform",
        &budget_share(analysis.groups(Dimension::Platform)),
        theme,
    )?;
    draw_scatter_panel(
        &panels[6],
        "Impressions vs Clicks (colour: CTR)",
        ("Impressions", "Clicks"),
        &impression_click_points(records),
        None,
    )?;
    draw_bar_panel(
        &root,
        &panels[7],
        "Engagement Rate per Audience",
        "Mean engagement rate (%)",
        &group_metric_bars(
            analysis.groups(Dimension::Audience),
            |g| g.mean_engagement_rate,
            theme.audience_bar,
        ),
        None,
    )?;
    let cpa: Vec<f64> = records.iter().map(|r| r.cpa).collect();
    draw_bar_panel(
        &root,
        &panels[8],
        "CPA per Campaign (green: best, red: worst)",
        "CPA",
        &cpa_bars(records, theme),
        mean(&cpa).map(|m| (m, theme.reference_line)),
    )?;

    root.present()?;
    debug!("Dashboard drawn with {} campaigns", records.len());
    Ok(())
}

/// Horizontal bar chart with category labels left of the axis and an
/// optional vertical reference line.
fn draw_bar_panel(
    root: &Area,
    area: &Area,
    title: &str,
    x_desc: &str,
    bars: &[BarDatum],
    reference: Option<(f64, RGBColor)>,
) -> DrawResult<()> {
    let n = bars.len().max(1) as f64;
    let (_, hi) = padded_range(
        bars.iter()
            .map(|b| b.value)
            .chain(reference.map(|(x, _)| x))
            .chain(std::iter::once(0.0)),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(120)
        .build_cartesian_2d(0f64..hi, 0f64..n)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_label_formatter(&|_| String::new())
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
        let y = i as f64;
        Rectangle::new([(0.0, y + 0.15), (b.value, y + 0.85)], b.color.mix(0.75).filled())
    }))?;

    if let Some((x, color)) = reference {
        chart.draw_series(LineSeries::new(vec![(x, 0.0), (x, n)], color.stroke_width(2)))?;
    }

    let style = TextStyle::from((FONT, 12).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    for (i, b) in bars.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(0.0, i as f64 + 0.5));
        root.draw(&Text::new(b.label.clone(), (px - 6, py), style.clone()))?;
    }
    Ok(())
}

/// Annotated scatter; `diagonal` draws the `y = x` break-even line.
fn draw_scatter_panel(
    area: &Area,
    title: &str,
    (x_desc, y_desc): (&str, &str),
    points: &[ScatterPoint],
    diagonal: Option<RGBColor>,
) -> DrawResult<()> {
    let (x_lo, x_hi) = padded_range(points.iter().map(|p| p.x).chain(std::iter::once(0.0)));
    let (y_lo, y_hi) = padded_range(points.iter().map(|p| p.y).chain(std::iter::once(0.0)));

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    if let Some(color) = diagonal {
        let end = x_hi.min(y_hi);
        chart
            .draw_series(LineSeries::new(vec![(0.0, 0.0), (end, end)], color.stroke_width(2)))?
            .label("Break-even")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p.x, p.y), 8, p.color.mix(0.7).filled())),
    )?;
    chart.draw_series(
        points
            .iter()
            .map(|p| Text::new(p.label.clone(), (p.x, p.y), (FONT, 10).into_font())),
    )?;
    Ok(())
}

fn draw_pie_panel(area: &Area, title: &str, slices: &[PieSlice], theme: &ChartTheme) -> DrawResult<()> {
    let area = area.titled(title, (FONT, 22))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);

    if slices.iter().all(|s| s.value <= 0.0) {
        let style = TextStyle::from((FONT, 16).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new("No budget data", center, style))?;
        return Ok(());
    }

    let radius = w.min(h) as f64 * 0.35;
    let sizes: Vec<f64> = slices.iter().map(|s| s.value).collect();
    let colors: Vec<RGBColor> = (0..slices.len()).map(|i| theme.pie_color(i)).collect();
    let labels: Vec<String> = slices.iter().map(|s| s.label.clone()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes[..], &colors[..], &labels[..]);
    pie.start_angle(-90.0);
    pie.label_style((FONT, 14).into_font().color(&theme.label));
    pie.percentages((FONT, 13).into_font().color(&BLACK));
    area.draw(&pie)?;
    Ok(())
}

// ── Heatmap ───────────────────────────────────────────────────────────────────

fn draw_heatmap(path: &Path, matrix: &CorrelationMatrix, theme: &ChartTheme) -> DrawResult<()> {
    let n = matrix.columns.len().max(1) as f64;
    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Matrix", (FONT, 30))
        .margin(20)
        .x_label_area_size(160)
        .y_label_area_size(180)
        .build_cartesian_2d(0f64..n, 0f64..n)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|_| String::new())
        .draw()?;

    let cells = heatmap_cells(matrix);
    // Row 0 at the top.
    let top = |row: usize| n - row as f64;

    chart.draw_series(cells.iter().map(|c| {
        let x = c.col as f64;
        Rectangle::new([(x, top(c.row) - 1.0), (x + 1.0, top(c.row))], c.color(theme).filled())
    }))?;
    chart.draw_series(cells.iter().map(|c| {
        Rectangle::new(
            [(c.col as f64, top(c.row) - 1.0), (c.col as f64 + 1.0, top(c.row))],
            WHITE.stroke_width(1),
        )
    }))?;

    let centered = Pos::new(HPos::Center, VPos::Center);
    chart.draw_series(cells.iter().map(|c| {
        let dark_cell = c.value.map(|r| r.abs() > 0.6).unwrap_or(false);
        let style = TextStyle::from((FONT, 14).into_font())
            .pos(centered)
            .color(if dark_cell { &WHITE } else { &BLACK });
        Text::new(
            c.annotation(),
            (c.col as f64 + 0.5, top(c.row) - 0.5),
            style,
        )
    }))?;

    let row_style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    let col_style = TextStyle::from((FONT, 14).into_font().transform(FontTransform::Rotate90))
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (i, name) in matrix.columns.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(0.0, top(i) - 0.5));
        root.draw(&Text::new(name.clone(), (px - 8, py), row_style.clone()))?;
        let (px, py) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
        root.draw(&Text::new(name.clone(), (px, py + 8), col_style.clone()))?;
    }

    root.present()?;
    Ok(())
}

// ── Timeline ──────────────────────────────────────────────────────────────────

fn draw_timeline(path: &Path, points: &[TimelinePoint], theme: &ChartTheme) -> DrawResult<()> {
    let root = BitMapBackend::new(path, TIMELINE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (start, end) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => {
            root.present()?;
            return Ok(());
        }
    };
    let day = |d: NaiveDate| (d - start).num_days() as f64;
    let x_range = -0.5..day(end).max(1.0) + 0.5;
    let (_, revenue_hi) = padded_range(points.iter().map(|p| p.revenue).chain(std::iter::once(0.0)));
    let (_, cost_hi) = padded_range(points.iter().map(|p| p.cost).chain(std::iter::once(0.0)));

    let mut chart = ChartBuilder::on(&root)
        .caption("Timeline: Revenue vs Cost by Campaign Date", (FONT, 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .right_y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), 0f64..revenue_hi)?
        .set_secondary_coord(x_range, 0f64..cost_hi);

    let date_label = |x: &f64| (start + Duration::days(x.round() as i64)).format("%Y-%m-%d").to_string();
    chart
        .configure_mesh()
        .x_desc("Campaign date")
        .y_desc("Revenue ($)")
        .x_label_formatter(&date_label)
        .draw()?;
    chart.configure_secondary_axes().y_desc("Total cost ($)").draw()?;

    let revenue = theme.revenue;
    let cost = theme.cost;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (day(p.date), p.revenue)),
            revenue.stroke_width(2),
        ))?
        .label("Revenue")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], revenue.stroke_width(2)));
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((day(p.date), p.revenue), 5, revenue.filled())),
    )?;

    chart
        .draw_secondary_series(LineSeries::new(
            points.iter().map(|p| (day(p.date), p.cost)),
            cost.stroke_width(2),
        ))?
        .label("Cost")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], cost.stroke_width(2)));
    chart.draw_secondary_series(
        points
            .iter()
            .map(|p| TriangleMarker::new((day(p.date), p.cost), 6, cost.filled())),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Axis range covering `values` with 5 % headroom; never degenerate.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    match bounds(values) {
        None => (0.0, 1.0),
        Some((lo, hi)) if hi - lo <= f64::EPSILON => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (if lo < 0.0 { lo - pad } else { lo }, hi + pad)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
