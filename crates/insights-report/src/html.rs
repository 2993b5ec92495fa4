//! HTML report generation.
//!
//! Produces one self-contained page (inline CSS, no scripts) from
//! [`ReportFacts`]. Every function here formats; none computes.

use insights_core::formatting::{
    format_currency, format_number, format_optional, format_percent, format_ratio, UNDEFINED,
};
use insights_core::models::CampaignRecord;
use insights_core::thresholds::{
    RoasTier, ANOMALOUS_CTR_PCT, ASPIRATIONAL_ROAS, BREAK_EVEN_ROAS, SCALE_UP_ROAS, TARGET_ROAS,
};
use insights_data::aggregator::GroupSummary;

use crate::facts::ReportFacts;

const DATE_FORMAT: &str = "%d %B %Y";

/// Render the complete report page.
pub fn render_report(facts: &ReportFacts) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Executive Report - Advertising Campaigns</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {header}
        {kpi_cards}
        {summary}
        {findings}
        {platforms}
        {campaign_types}
        {recommendations}
        {chart_refs}
        {campaign_table}
        {conclusions}
        {footer}
    </div>
</body>
</html>"#,
        css = inline_css(),
        header = render_header(facts),
        kpi_cards = render_kpi_cards(facts),
        summary = render_summary(facts),
        findings = render_findings(facts),
        platforms = render_group_table("3. Platform Analysis", "Platform", 3, facts.platforms),
        campaign_types = render_group_table(
            "4. Campaign Type Analysis",
            "Campaign Type",
            4,
            facts.campaign_types
        ),
        recommendations = render_recommendations(facts),
        chart_refs = render_chart_refs(facts),
        campaign_table = render_campaign_table(&facts.ranked),
        conclusions = render_conclusions(facts),
        footer = render_footer(facts),
    )
}

fn inline_css() -> &'static str {
    r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; background-color: #f5f5f5; }
.container { max-width: 960px; margin: 0 auto; background: white; padding: 40px; box-shadow: 0 0 20px rgba(0,0,0,0.1); }
.header { text-align: center; border-bottom: 3px solid #1f4788; padding-bottom: 30px; margin-bottom: 30px; }
.header h1 { color: #1f4788; font-size: 32px; margin-bottom: 10px; }
.header p { color: #666; font-size: 14px; margin-top: 8px; }
.kpi-section { display: grid; grid-template-columns: repeat(4, 1fr); gap: 20px; margin-bottom: 40px; padding: 20px; background: #f9f9f9; border-radius: 8px; }
.kpi-card { background: white; padding: 20px; border-left: 4px solid #2e5c8a; border-radius: 4px; text-align: center; box-shadow: 0 2px 8px rgba(0,0,0,0.05); }
.kpi-card .number { font-size: 26px; font-weight: bold; color: #1f4788; margin: 10px 0; }
.kpi-card .label { font-size: 12px; color: #999; text-transform: uppercase; letter-spacing: 1px; }
section { margin-bottom: 40px; }
h2 { color: #2e5c8a; font-size: 20px; border-bottom: 2px solid #2e5c8a; padding-bottom: 10px; margin-bottom: 20px; }
h3 { color: #1f4788; font-size: 16px; margin-top: 20px; margin-bottom: 10px; }
p { margin-bottom: 15px; line-height: 1.8; }
ul { margin-left: 30px; margin-bottom: 15px; }
li { margin-bottom: 10px; }
.critical { color: #d9534f; font-weight: bold; }
.warning { color: #f39c12; font-weight: bold; }
.positive { color: #27ae60; font-weight: bold; }
.undefined { color: #999; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; font-size: 13px; }
thead { background: #2e5c8a; color: white; }
th { padding: 12px; text-align: left; font-weight: 600; }
td { padding: 10px 12px; border-bottom: 1px solid #ddd; }
tbody tr:nth-child(even) { background: #f9f9f9; }
tbody tr.row-loss { background: #ffe8e8; }
.graphic-ref { background: #e8f4f8; padding: 15px; margin: 15px 0; border-left: 4px solid #27ae60; border-radius: 4px; font-size: 14px; }
.recommendation { background: #fff8e1; padding: 15px; margin: 15px 0; border-left: 4px solid #f39c12; border-radius: 4px; }
.recommendation strong { color: #d68910; }
.alert-box { background: #ffebee; border-left: 4px solid #e74c3c; padding: 15px; margin: 20px 0; border-radius: 4px; }
.note-box { background: #fff8e1; border-left: 4px solid #f39c12; padding: 15px; margin: 20px 0; border-radius: 4px; }
.footer { text-align: center; border-top: 1px solid #ddd; padding-top: 20px; margin-top: 40px; font-size: 12px; color: #999; }
@media print { body { background: white; } .container { box-shadow: none; padding: 0; } }
"#
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn render_header(facts: &ReportFacts) -> String {
    let period = facts.kpis.period;
    format!(
        r#"<div class="header">
    <h1>Executive Report</h1>
    <p><strong>Advertising Campaign Performance Analysis</strong></p>
    <p>Period: {start} - {end}</p>
    <p>Report date: {generated}</p>
</div>"#,
        start = period.start.format(DATE_FORMAT),
        end = period.end.format(DATE_FORMAT),
        generated = facts.generated_at.format("%d %B %Y at %H:%M"),
    )
}

fn render_kpi_cards(facts: &ReportFacts) -> String {
    let k = facts.kpis;
    format!(
        r#"<div class="kpi-section">
    <div class="kpi-card">
        <div class="label">Total Revenue</div>
        <div class="number positive">{revenue}</div>
    </div>
    <div class="kpi-card">
        <div class="label">Total Investment</div>
        <div class="number">{cost}</div>
    </div>
    <div class="kpi-card">
        <div class="label">Average ROAS</div>
        <div class="number {roas_class}">{roas}</div>
    </div>
    <div class="kpi-card">
        <div class="label">Conversions</div>
        <div class="number">{conversions}</div>
    </div>
</div>"#,
        revenue = format_currency(k.total_revenue, 0),
        cost = format_currency(k.total_cost, 0),
        roas_class = tier_text_class(RoasTier::classify(Some(k.mean_roas))),
        roas = format_ratio(Some(k.mean_roas)),
        conversions = format_number(k.total_conversions as f64, 0),
    )
}

fn render_summary(facts: &ReportFacts) -> String {
    let k = facts.kpis;
    format!(
        r#"<section>
    <h2>1. Executive Summary</h2>
    <p>
        During the analysed period <strong>{campaigns} advertising campaigns</strong> were evaluated,
        spread across <strong>{platforms} platforms</strong> and targeting
        <strong>{audiences} audience segments</strong>.
    </p>
    <p>
        <strong>Overall performance:</strong><br>
        &bull; Total revenue: <strong>{revenue}</strong><br>
        &bull; Total investment: <strong>{cost}</strong><br>
        &bull; Average ROAS: <strong>{mean_roas}</strong> (gain of {gain} over investment)<br>
        &bull; Pooled ROAS (total revenue / total cost): <strong>{pooled_roas}</strong><br>
        &bull; Conversions: <strong>{conversions}</strong><br>
        &bull; Average CPA: <strong>{cpa}</strong><br>
        &bull; Impressions: <strong>{impressions}</strong><br>
        &bull; Average CTR: <strong>{ctr}</strong>
    </p>
</section>"#,
        campaigns = k.campaigns,
        platforms = k.platforms,
        audiences = k.audiences,
        revenue = format_currency(k.total_revenue, 2),
        cost = format_currency(k.total_cost, 2),
        mean_roas = format_ratio(Some(k.mean_roas)),
        gain = format_ratio(Some(k.mean_gain())),
        pooled_roas = format_ratio(k.pooled_roas),
        conversions = format_number(k.total_conversions as f64, 0),
        cpa = format_currency(k.mean_cpa, 2),
        impressions = format_number(k.total_impressions as f64, 0),
        ctr = format_percent(k.mean_ctr, 2),
    )
}

fn render_findings(facts: &ReportFacts) -> String {
    let k = facts.kpis;
    let best = &k.best_roas;
    let top = &k.best_conversions;

    let correlation = match &facts.strongest_roas_correlation {
        Some((column, r)) => format!(
            "<li>The variable most correlated with ROAS is <strong>{}</strong> (r = {}).</li>",
            html_escape(column),
            format_number(*r, 3)
        ),
        None => "<li>No variable shows a measurable correlation with ROAS.</li>".to_string(),
    };

    format!(
        r#"<section>
    <h2>2. Key Findings</h2>

    <h3>2.1 Standout Campaigns</h3>
    <ul>
        <li>
            Campaign <strong>{best_id}</strong> on <strong>{best_platform}</strong> achieved a
            <span class="positive">ROAS of {best_roas}</span>, generating <strong>{best_revenue}</strong>
            from an investment of {best_cost}.
        </li>
        <li>
            Campaign <strong>{top_id}</strong> obtained the highest number of conversions
            (<strong>{top_conversions}</strong>) with a CPA of only <strong>{top_cpa}</strong>.
        </li>
    </ul>

    <h3>2.2 Areas of Concern</h3>
    {concern}

    <h3>2.3 Performance Variability</h3>
    <ul>
        <li>CTR ranges from {ctr_min} to {ctr_max}, suggesting inconsistent targeting.</li>
        <li>CPA ranges from {cpa_min} to {cpa_max}, a {cpa_gap} gap between the cheapest and the most expensive acquisition.</li>
        {correlation}
    </ul>
</section>"#,
        best_id = html_escape(&best.id),
        best_platform = html_escape(&best.platform),
        best_roas = format_ratio(Some(best.roas)),
        best_revenue = format_currency(best.revenue, 2),
        best_cost = format_currency(best.total_cost, 2),
        top_id = html_escape(&top.id),
        top_conversions = format_number(top.conversions as f64, 0),
        top_cpa = format_currency(top.cpa, 2),
        concern = render_worst_campaign(&k.worst_roas),
        ctr_min = format_percent(k.ctr_range.min, 2),
        ctr_max = format_percent(k.ctr_range.max, 2),
        cpa_min = format_currency(k.cpa_range.min, 2),
        cpa_max = format_currency(k.cpa_range.max, 2),
        cpa_gap = format_multiple(k.cpa_range.ratio()),
        correlation = correlation,
    )
}

fn render_worst_campaign(worst: &CampaignRecord) -> String {
    let tier = RoasTier::classify(Some(worst.roas));
    if tier.is_loss() {
        format!(
            r#"<div class="alert-box">
        <p>
            Campaign <span class="critical">{id}</span> on {platform} returns a
            <span class="critical">ROAS of {roas}</span>, resulting in a
            <span class="critical">loss of {loss}</span>.
            <br><strong>Immediate action: pause this campaign.</strong>
        </p>
    </div>"#,
            id = html_escape(&worst.id),
            platform = html_escape(&worst.platform),
            roas = format_ratio(Some(worst.roas)),
            loss = format_currency(-worst.net_return(), 2),
        )
    } else {
        let note = if tier == RoasTier::BelowTarget {
            format!("which is below the {} target", format_ratio(Some(TARGET_ROAS)))
        } else {
            format!("still above the {} target", format_ratio(Some(TARGET_ROAS)))
        };
        format!(
            r#"<div class="note-box">
        <p>
            No campaign is loss-making. The weakest, <strong>{id}</strong> on {platform},
            returns a <span class="{class}">ROAS of {roas}</span>, {note}.
        </p>
    </div>"#,
            id = html_escape(&worst.id),
            platform = html_escape(&worst.platform),
            class = tier_text_class(tier),
            roas = format_ratio(Some(worst.roas)),
            note = note,
        )
    }
}

fn render_group_table(title: &str, key_label: &str, chart: usize, groups: &[GroupSummary]) -> String {
    let rows: String = groups
        .iter()
        .map(|g| {
            format!(
                r#"
            <tr>
                <td><strong>{key}</strong></td>
                <td>{campaigns}</td>
                <td>{revenue}</td>
                <td>{cost}</td>
                <td>{conversions}</td>
                <td><span class="{class}">{roas}</span></td>
            </tr>"#,
                key = html_escape(&g.key),
                campaigns = g.campaigns,
                revenue = format_currency(g.revenue, 0),
                cost = format_currency(g.cost, 0),
                conversions = format_number(g.conversions as f64, 0),
                class = tier_text_class(RoasTier::classify(g.pooled_roas)),
                roas = format_ratio(g.pooled_roas),
            )
        })
        .collect();

    format!(
        r#"<section>
    <h2>{title}</h2>
    <p>See <strong>Chart {chart}</strong> of the dashboard for a visual comparison.</p>
    <table>
        <thead>
            <tr>
                <th>{key_label}</th>
                <th>Campaigns</th>
                <th>Revenue</th>
                <th>Investment</th>
                <th>Conversions</th>
                <th>ROAS</th>
            </tr>
        </thead>
        <tbody>{rows}
        </tbody>
    </table>
</section>"#,
    )
}

fn render_recommendations(facts: &ReportFacts) -> String {
    let k = facts.kpis;
    let audience = match facts.best_engagement_audience {
        Some(g) => format!(
            "<li><strong>Focus on the {} audience:</strong> best mean engagement ({}), see Chart 8.</li>",
            html_escape(&g.key),
            format_percent(g.mean_engagement_rate, 2)
        ),
        None => String::new(),
    };

    format!(
        r#"<section>
    <h2>5. Strategic Recommendations</h2>

    <div class="recommendation">
        <strong>Immediate actions (next 7 days)</strong>
        <ul>
            <li><strong>Pause underperformers:</strong> {loss_count} campaign(s) have a ROAS below {break_even} (see Chart 1).</li>
            <li><strong>Audit creatives and targeting:</strong> {anomalous} campaign(s) show a CTR above {ctr_limit}. See Chart 5.</li>
            <li><strong>Investigate discrepancies:</strong> a high CTR with a low conversion rate points at the landing page.</li>
        </ul>
    </div>

    <div class="recommendation">
        <strong>Budget optimisation (30 days)</strong>
        <ul>
            <li><strong>Reallocate budget:</strong> increase investment in campaigns with ROAS above {scale_up}. See Chart 2.</li>
            <li><strong>Replicate the winning model:</strong> study what drives {best_id} (ROAS {best_roas}) and {top_id} ({top_conversions} conversions).</li>
            {audience}
        </ul>
    </div>

    <div class="recommendation">
        <strong>Continuous improvement (60-90 days)</strong>
        <ul>
            <li><strong>A/B testing:</strong> test creative variations on the platform with the best ROAS.</li>
            <li><strong>Reduce dispersion:</strong> CTR varies with a coefficient of variation of {ctr_cv} and CPA of {cpa_cv}; standardise processes to narrow it.</li>
            <li><strong>Automatic alerts:</strong> flag campaigns whose ROAS falls below {target}.</li>
            <li><strong>Trend monitoring:</strong> review the campaign timeline monthly.</li>
        </ul>
    </div>
</section>"#,
        loss_count = k.loss_making.len(),
        break_even = format_ratio(Some(BREAK_EVEN_ROAS)),
        anomalous = facts.anomalous_ctr,
        ctr_limit = format_percent(ANOMALOUS_CTR_PCT, 0),
        scale_up = format_ratio(Some(SCALE_UP_ROAS)),
        best_id = html_escape(&k.best_roas.id),
        best_roas = format_ratio(Some(k.best_roas.roas)),
        top_id = html_escape(&k.best_conversions.id),
        top_conversions = format_number(k.best_conversions.conversions as f64, 0),
        audience = audience,
        ctr_cv = format_cv(facts.ctr_cv_pct),
        cpa_cv = format_cv(facts.cpa_cv_pct),
        target = format_ratio(Some(TARGET_ROAS)),
    )
}

fn render_chart_refs(facts: &ReportFacts) -> String {
    let worst_note = if facts.kpis.worst_roas.roas < BREAK_EVEN_ROAS {
        format!(
            " {} shows a critical loss.",
            html_escape(&facts.kpis.worst_roas.id)
        )
    } else {
        String::new()
    };

    let panels = [
        (
            "Chart 1: ROAS per Campaign (Dashboard)".to_string(),
            format!("Profitable campaigns (green bars) against loss-making ones (red).{worst_note}"),
        ),
        (
            "Chart 2: Revenue vs Total Cost".to_string(),
            "Campaigns above the dashed line are profitable. Basis for investment decisions.".to_string(),
        ),
        (
            "Chart 3: ROAS per Platform".to_string(),
            "Direct comparison of channel efficiency for budget reallocation.".to_string(),
        ),
        (
            "Chart 4: Conversions per Campaign Type".to_string(),
            "Shows which campaign types drive the most conversions.".to_string(),
        ),
        (
            "Chart 5: CTR vs Conversion Rate".to_string(),
            "Highlights anomalies. The upper-right segment is the ideal one.".to_string(),
        ),
        (
            "Chart 6: Budget Distribution per Platform".to_string(),
            "Basis for rebalancing the budget according to ROAS.".to_string(),
        ),
        (
            "Chart 7: Impressions vs Clicks".to_string(),
            "Evaluates targeting quality (the slope is the CTR).".to_string(),
        ),
        (
            "Chart 8: Engagement Rate per Audience".to_string(),
            "Identifies the most receptive audiences.".to_string(),
        ),
        (
            "Chart 9: CPA per Campaign".to_string(),
            "Green bars (cheapest acquisitions) against red ones for optimisation.".to_string(),
        ),
        (
            "Correlation Matrix".to_string(),
            format!(
                "Revenue and ROAS correlation: {}.",
                facts
                    .revenue_roas_correlation
                    .map(|r| format_number(r, 3))
                    .unwrap_or_else(|| UNDEFINED.to_string())
            ),
        ),
        (
            "Campaign Timeline".to_string(),
            "Revenue and cost over time to spot seasonal patterns.".to_string(),
        ),
    ];

    let refs: String = panels
        .iter()
        .map(|(title, body)| {
            format!(
                r#"
    <div class="graphic-ref">
        <strong>{title}</strong><br>
        {body}
    </div>"#
            )
        })
        .collect();

    format!(
        r#"<section>
    <h2>6. Generated Charts</h2>
    <p>The following PNG images support the conclusions:</p>{refs}
</section>"#
    )
}

fn render_campaign_table(ranked: &[&CampaignRecord]) -> String {
    let rows: String = ranked
        .iter()
        .map(|r| {
            let tier = RoasTier::classify(Some(r.roas));
            format!(
                r#"
            <tr class="{row_class}">
                <td><strong>{id}</strong></td>
                <td>{platform}</td>
                <td>{kind}</td>
                <td>{impressions}</td>
                <td>{conversions}</td>
                <td>{cost}</td>
                <td>{revenue}</td>
                <td class="{roas_class}">{roas}</td>
                <td>{cpa}</td>
            </tr>"#,
                row_class = if tier.is_loss() { "row-loss" } else { "" },
                id = html_escape(&r.id),
                platform = html_escape(&r.platform),
                kind = html_escape(&r.campaign_type),
                impressions = format_number(r.impressions as f64, 0),
                conversions = format_number(r.conversions as f64, 0),
                cost = format_currency(r.total_cost, 2),
                revenue = format_currency(r.revenue, 2),
                roas_class = tier_text_class(tier),
                roas = format_ratio(Some(r.roas)),
                cpa = format_currency(r.cpa, 2),
            )
        })
        .collect();

    format!(
        r#"<section>
    <h2>7. Campaign Summary (by ROAS)</h2>
    <table style="font-size: 12px;">
        <thead>
            <tr>
                <th>ID</th>
                <th>Platform</th>
                <th>Type</th>
                <th>Impressions</th>
                <th>Conv</th>
                <th>Cost</th>
                <th>Revenue</th>
                <th>ROAS</th>
                <th>CPA</th>
            </tr>
        </thead>
        <tbody>{rows}
        </tbody>
    </table>
</section>"#
    )
}

fn render_conclusions(facts: &ReportFacts) -> String {
    let k = facts.kpis;
    format!(
        r#"<section>
    <h2>8. Conclusions</h2>
    <p>
        Campaigns show <strong>uneven performance</strong>, with ROAS ranging from
        <span class="{min_class}">{roas_min}</span> to <span class="{max_class}">{roas_max}</span>.
    </p>
    <p>
        <strong>Potential impact:</strong> adopting the recommendations could
        <strong>raise ROAS from {mean_roas} towards a target of {aspirational}+</strong> through:
        <br>1. Stopping loss-making campaigns (recovering about {recoverable} of spend)
        <br>2. Reallocating budget towards the winners
        <br>3. Replicating the most efficient models
    </p>
</section>"#,
        min_class = tier_text_class(RoasTier::classify(Some(k.roas_range.min))),
        roas_min = format_ratio(Some(k.roas_range.min)),
        max_class = tier_text_class(RoasTier::classify(Some(k.roas_range.max))),
        roas_max = format_ratio(Some(k.roas_range.max)),
        mean_roas = format_ratio(Some(k.mean_roas)),
        aspirational = format_ratio(Some(ASPIRATIONAL_ROAS)),
        recoverable = format_currency(k.loss_making_cost, 0),
    )
}

fn render_footer(facts: &ReportFacts) -> String {
    format!(
        r#"<div class="footer">
    <p><strong>Confidential</strong></p>
    <p>Prepared on {generated}</p>
    <p>Analysis of {campaigns} campaigns over a period of {days} days</p>
    <p>The charts are saved as PNG files next to this report</p>
</div>"#,
        generated = facts.generated_at.format("%d/%m/%Y at %H:%M:%S"),
        campaigns = facts.kpis.campaigns,
        days = facts.kpis.period.days(),
    )
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// CSS class colouring a ROAS value by tier.
fn tier_text_class(tier: RoasTier) -> &'static str {
    match tier {
        RoasTier::Loss => "critical",
        RoasTier::BelowTarget => "warning",
        RoasTier::OnTarget => "positive",
        RoasTier::Undefined => "undefined",
    }
}

/// Whole-number multiple such as `"10x"`.
fn format_multiple(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}x", format_number(v, 0)),
        _ => UNDEFINED.to_string(),
    }
}

fn format_cv(value: Option<f64>) -> String {
    match value {
        Some(_) => format!("{}%", format_optional(value, 2)),
        None => UNDEFINED.to_string(),
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{analysis, now};

    fn report() -> String {
        let analysis = analysis();
        let facts = ReportFacts::build(&analysis, now());
        render_report(&facts)
    }

    // ── render_report ─────────────────────────────────────────────────────────

    #[test]
    fn test_report_header_and_period() {
        let html = report();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Period: 01 March 2024 - 09 March 2024"));
        assert!(html.contains("Report date: 01 April 2024 at 09:30"));
    }

    #[test]
    fn test_report_kpi_cards() {
        let html = report();
        assert!(html.contains("$1,150"));
        assert!(html.contains("$400"));
        assert!(html.contains("2.83x"));
        // pooled ROAS shown separately from the mean
        assert!(html.contains("2.88x"));
    }

    #[test]
    fn test_report_loss_alert() {
        let html = report();
        assert!(html.contains("alert-box"));
        assert!(html.contains("loss of $50.00"));
        assert!(html.contains("pause this campaign"));
    }

    #[test]
    fn test_report_group_tables_sorted() {
        let html = report();
        let fb = html.find("<td><strong>Facebook Ads</strong></td>").unwrap();
        let tt = html.find("<td><strong>TikTok Ads</strong></td>").unwrap();
        assert!(fb < tt);
        assert!(html.contains("3.67x"));
    }

    #[test]
    fn test_report_campaign_table_tiers() {
        let html = report();
        assert!(html.contains(r#"<tr class="row-loss">"#));
        assert!(html.contains(r#"<td class="critical">0.50x</td>"#));
        assert!(html.contains(r#"<td class="positive">5.00x</td>"#));
    }

    #[test]
    fn test_report_footer_and_conclusions() {
        let html = report();
        assert!(html.contains("Analysis of 3 campaigns over a period of 8 days"));
        assert!(html.contains("3.50x+"));
        assert!(html.contains("recovering about $100"));
    }

    #[test]
    fn test_report_recommendations() {
        let html = report();
        assert!(html.contains("Focus on the 18-24 audience"));
        assert!(html.contains("1 campaign(s) have a ROAS below 1.00x"));
        assert!(html.contains("1 campaign(s) show a CTR above 30%"));
    }

    #[test]
    fn test_report_escapes_data() {
        let mut analysis = analysis();
        analysis.kpis.best_roas.platform = "<script>alert('x')</script>".to_string();
        let facts = ReportFacts::build(&analysis, now());
        let html = render_report(&facts);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_report_undefined_group_roas() {
        let mut analysis = analysis();
        analysis.platforms[0].pooled_roas = None;
        let facts = ReportFacts::build(&analysis, now());
        let html = render_report(&facts);
        assert!(html.contains(r#"<span class="undefined">N/A</span>"#));
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_worst_campaign_not_loss_uses_note() {
        let analysis = analysis();
        let mut worst = analysis.kpis.worst_roas.clone();
        worst.roas = 1.5;
        let html = render_worst_campaign(&worst);
        assert!(html.contains("note-box"));
        assert!(html.contains("below the 2.00x target"));
    }

    #[test]
    fn test_format_multiple() {
        assert_eq!(format_multiple(Some(4.0)), "4x");
        assert_eq!(format_multiple(None), "N/A");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"q\""), "&quot;q&quot;");
    }
}
