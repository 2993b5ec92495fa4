//! Plain-text data profile printed to stdout.

use insights_core::formatting::{format_optional, UNDEFINED};
use insights_data::analyzer::DataProfile;
use insights_data::reader::Table;

/// Rows shown in the preview table.
const HEAD_ROWS: usize = 5;

/// Render the full console profile of `table`.
pub fn render_profile(table: &Table, profile: &DataProfile) -> String {
    build_profile_lines(table, profile).join("\n")
}

/// Build the profile line by line (extracted for testability).
pub fn build_profile_lines(table: &Table, profile: &DataProfile) -> Vec<String> {
    let mut lines: Vec<String> = Vec::with_capacity(128);

    // ── Dataset information ───────────────────────────────────────────────────
    push_banner(&mut lines, "DATASET INFORMATION");
    lines.push(format!("\nShape: ({}, {})", profile.rows, profile.columns));

    lines.push("\nFirst rows:".to_string());
    let head: Vec<Vec<String>> = table
        .head(HEAD_ROWS)
        .iter()
        .enumerate()
        .map(|(i, row)| {
            std::iter::once(i.to_string())
                .chain(row.iter().map(|c| c.clone().unwrap_or_else(|| "NaN".to_string())))
                .collect()
        })
        .collect();
    let mut header = vec![String::new()];
    header.extend(table.headers.iter().cloned());
    lines.extend(aligned_table(&header, &head));

    lines.push("\nColumn types:".to_string());
    let name_width = width_of(table.headers.iter().map(String::as_str));
    for column in &profile.overview {
        lines.push(format!("{:<name_width$}  {}", column.name, column.kind.dtype()));
    }

    lines.push("\nNull values:".to_string());
    for column in &profile.overview {
        lines.push(format!("{:<name_width$}  {}", column.name, column.nulls));
    }

    lines.push("\nDescriptive statistics:".to_string());
    let stat_header: Vec<String> = ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let stat_rows: Vec<Vec<String>> = profile
        .numeric
        .iter()
        .map(|p| {
            let s = &p.stats;
            vec![
                p.name.clone(),
                s.count.to_string(),
                format_optional(s.mean, 3),
                format_optional(s.std, 3),
                format_optional(s.min, 3),
                format_optional(s.q1, 3),
                format_optional(s.median, 3),
                format_optional(s.q3, 3),
                format_optional(s.max, 3),
            ]
        })
        .collect();
    lines.extend(aligned_table(&stat_header, &stat_rows));

    lines.push(format!("\nColumn names: [{}]", table.headers.join(", ")));
    lines.push(format!("\nTotal records: {}", profile.rows));

    // ── Key performance indicators ────────────────────────────────────────────
    lines.push(String::new());
    push_banner(&mut lines, "KEY PERFORMANCE INDICATORS (KPIs)");

    lines.push("\n1. DISPERSION MEASURES:".to_string());
    let numeric_width = width_of(profile.numeric.iter().map(|p| p.name.as_str()));
    lines.push("Standard deviation:".to_string());
    for p in &profile.numeric {
        lines.push(format!("{:<numeric_width$}  {}", p.name, format_optional(p.stats.std, 3)));
    }
    lines.push("\nCoefficient of variation (%):".to_string());
    for p in &profile.numeric {
        lines.push(format!("{:<numeric_width$}  {}", p.name, format_optional(p.cv_pct, 2)));
    }

    lines.push("\n2. OUTLIER ANALYSIS (IQR):".to_string());
    for p in &profile.numeric {
        let count = p.outliers.as_ref().map_or(0, |o| o.count);
        lines.push(format!("{}: {} outliers ({:.2}%)", p.name, count, p.outlier_pct));
    }

    lines.push("\n3. CORRELATION BETWEEN VARIABLES:".to_string());
    let matrix = &profile.correlation;
    if matrix.columns.len() > 1 {
        let mut corr_header = vec![String::new()];
        corr_header.extend(matrix.columns.iter().cloned());
        let corr_rows: Vec<Vec<String>> = matrix
            .columns
            .iter()
            .zip(&matrix.values)
            .map(|(name, values)| {
                std::iter::once(name.clone())
                    .chain(values.iter().map(|v| format_optional(*v, 3)))
                    .collect()
            })
            .collect();
        lines.extend(aligned_table(&corr_header, &corr_rows));
    } else {
        lines.push("Not enough numeric columns.".to_string());
    }

    lines.push("\n4. CATEGORICAL VARIABLE DISTRIBUTION:".to_string());
    for freq in &profile.categorical {
        lines.push(format!("\n{} ({} distinct):", freq.column, freq.distinct()));
        let width = width_of(freq.counts.iter().map(|(v, _)| v.as_str()));
        for (value, count) in &freq.counts {
            lines.push(format!("{value:<width$}  {count}"));
        }
    }

    lines.push("\n5. DATA QUALITY:".to_string());
    lines.push("Completeness per column (%):".to_string());
    for column in &profile.overview {
        lines.push(format!("{:<name_width$}  {:.2}", column.name, column.completeness_pct));
    }
    lines.push(format!(
        "\nDuplicate rate: {} ({:.2}%)",
        profile.duplicate_rows, profile.duplicate_rate_pct
    ));

    // ── Executive summary ─────────────────────────────────────────────────────
    lines.push(String::new());
    push_banner(&mut lines, "EXECUTIVE SUMMARY");
    lines.push(format!("Valid records: {}", profile.rows));
    lines.push(format!("Null cells: {}", profile.total_nulls()));
    lines.push(format!(
        "Mean completeness: {:.2}%",
        profile.mean_completeness_pct
    ));
    lines.push(format!("Dimensionality: {} variables", profile.columns));

    lines
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn push_banner(lines: &mut Vec<String>, title: &str) {
    lines.push("=".repeat(50));
    lines.push(title.to_string());
    lines.push("=".repeat(50));
}

fn width_of<'a>(items: impl Iterator<Item = &'a str>) -> usize {
    items.map(|s| s.chars().count()).max().unwrap_or(0)
}

/// Right-aligned columns, first column left-aligned, two spaces apart.
fn aligned_table(header: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let columns = header.len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            std::iter::once(&header[c])
                .chain(rows.iter().filter_map(|r| r.get(c)))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                let w = widths.get(c).copied().unwrap_or(0);
                if c == 0 {
                    format!("{cell:<w$}")
                } else {
                    format!("{cell:>w$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 1);
    out.push(render(header));
    out.extend(rows.iter().map(|r| render(r)));
    if rows.is_empty() {
        out.push(format!("({UNDEFINED})"));
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::table;
    use insights_data::analyzer::DataProfiler;

    fn profile_text() -> String {
        let table = table();
        let profile = DataProfiler::profile(&table);
        render_profile(&table, &profile)
    }

    fn position(text: &str, needle: &str) -> usize {
        text.find(needle)
            .unwrap_or_else(|| panic!("missing {needle:?} in profile"))
    }

    #[test]
    fn test_profile_sections_in_order() {
        let text = profile_text();
        let order = [
            "DATASET INFORMATION",
            "Shape: (3, 16)",
            "First rows:",
            "Column types:",
            "Null values:",
            "Descriptive statistics:",
            "Column names: [campana_id, plataforma",
            "Total records: 3",
            "1. DISPERSION MEASURES:",
            "2. OUTLIER ANALYSIS (IQR):",
            "3. CORRELATION BETWEEN VARIABLES:",
            "4. CATEGORICAL VARIABLE DISTRIBUTION:",
            "5. DATA QUALITY:",
            "EXECUTIVE SUMMARY",
            "Valid records: 3",
        ];
        let positions: Vec<usize> = order.iter().map(|n| position(&text, n)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_profile_kinds_and_summary() {
        let text = profile_text();
        assert!(text.contains("fecha_campana"));
        assert!(text.contains("datetime"));
        assert!(text.contains("int64"));
        assert!(text.contains("float64"));
        assert!(text.contains("Null cells: 0"));
        assert!(text.contains("Mean completeness: 100.00%"));
        assert!(text.contains("Dimensionality: 16 variables"));
        assert!(text.contains("Duplicate rate: 0 (0.00%)"));
    }

    #[test]
    fn test_profile_outlier_lines() {
        let text = profile_text();
        assert!(text.contains("roas: 0 outliers (0.00%)"));
    }

    #[test]
    fn test_profile_frequencies() {
        let lines = {
            let table = table();
            let profile = DataProfiler::profile(&table);
            build_profile_lines(&table, &profile)
        };
        let idx = lines
            .iter()
            .position(|l| l == "\nplataforma (2 distinct):")
            .unwrap();
        assert!(lines[idx + 1].starts_with("Facebook Ads"));
        assert!(lines[idx + 1].ends_with('2'));
    }

    #[test]
    fn test_undefined_statistics_print_na() {
        let table = Table::from_reader(
            std::path::Path::new("t.csv"),
            "x,y\n1,5\n".as_bytes(),
            "fecha_campana",
        )
        .unwrap();
        let profile = DataProfiler::profile(&table);
        let text = render_profile(&table, &profile);
        // a single row has no sample std and no correlation
        assert!(text.contains("N/A"));
    }

    #[test]
    fn test_profile_counts_null_cells() {
        let table = Table::from_reader(
            std::path::Path::new("t.csv"),
            "segment,x\na,1\n,2\nb,NA\n".as_bytes(),
            "fecha_campana",
        )
        .unwrap();
        let profile = DataProfiler::profile(&table);
        let text = render_profile(&table, &profile);
        assert!(text.contains("Null cells: 2"));
        assert!(text.contains("segment (3 distinct):"));
    }

    #[test]
    fn test_aligned_table() {
        let header = vec!["".to_string(), "count".to_string()];
        let rows = vec![vec!["roas".to_string(), "3".to_string()]];
        let out = aligned_table(&header, &rows);
        assert_eq!(out[0], "      count");
        assert_eq!(out[1], "roas      3");
    }
}
