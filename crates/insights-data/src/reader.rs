//! CSV loading for campaign datasets.
//!
//! Reads the input file into a generic [`Table`] (optional cells plus an
//! inferred kind per column) and converts table rows into typed
//! [`CampaignRecord`]s for the aggregators.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use insights_core::dates::DateParser;
use insights_core::error::{InsightsError, Result};
use insights_core::models::{CampaignField, CampaignRecord};
use serde::Serialize;
use tracing::{debug, info};

/// Cell contents treated as missing (compared case-insensitively).
pub const NULL_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

// ── ColumnKind ────────────────────────────────────────────────────────────────

/// Inferred type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Date,
    Text,
}

impl ColumnKind {
    /// Whether the column takes part in numeric statistics.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Whether the column is reported as a categorical variable.
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnKind::Text)
    }

    /// Short dtype label shown in the console profile.
    pub fn dtype(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Date => "datetime",
            ColumnKind::Text => "text",
        }
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// The raw dataset: header names, one inferred kind per column and rows of
/// optional cells. `None` marks a null cell.
#[derive(Debug, Clone)]
pub struct Table {
    /// Path the table was read from.
    pub source: PathBuf,
    pub headers: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    pub rows: Vec<Vec<Option<String>>>,
    /// Index of the column parsed as the campaign date, if present.
    pub date_column: Option<usize>,
}

impl Table {
    /// Parse CSV text from `reader`. `source` is only used in error messages.
    ///
    /// Fails on malformed CSV (including rows whose length differs from the
    /// header) and on a dataset without data rows.
    pub fn from_reader<R: Read>(source: &Path, reader: R, date_column: &str) -> Result<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| csv_error(source, e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| csv_error(source, e))?;
            rows.push(record.iter().map(normalize_cell).collect());
        }

        if headers.is_empty() || rows.is_empty() {
            return Err(InsightsError::EmptyDataset(source.to_path_buf()));
        }

        let date_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(date_column))
            .or_else(|| headers.iter().position(|h| CampaignField::Date.matches(h)));

        let kinds = (0..headers.len())
            .map(|idx| infer_kind(rows.iter().map(|r| r[idx].as_deref()), Some(idx) == date_idx))
            .collect();

        Ok(Table {
            source: source.to_path_buf(),
            headers,
            kinds,
            rows,
            date_column: date_idx,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    /// Cells of column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |row| row[idx].as_deref())
    }

    /// Cells of column `idx` parsed as numbers; nulls and unparseable cells
    /// become `None`.
    pub fn numeric_column(&self, idx: usize) -> Vec<Option<f64>> {
        self.column(idx)
            .map(|cell| cell.and_then(|c| c.parse::<f64>().ok()))
            .collect()
    }

    /// Indices of numeric columns in header order.
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.column_indices(ColumnKind::is_numeric)
    }

    /// Indices of categorical (text) columns in header order.
    pub fn categorical_columns(&self) -> Vec<usize> {
        self.column_indices(ColumnKind::is_categorical)
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> &[Vec<Option<String>>] {
        &self.rows[..n.min(self.rows.len())]
    }

    fn column_indices(&self, pred: impl Fn(&ColumnKind) -> bool) -> Vec<usize> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| pred(kind))
            .map(|(idx, _)| idx)
            .collect()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Open `path` and parse it into a [`Table`].
pub fn load_table(path: &Path, date_column: &str) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|source| InsightsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = Table::from_reader(path, std::io::BufReader::new(file), date_column)?;
    info!(
        "Loaded {} rows x {} columns from {}",
        table.n_rows(),
        table.n_cols(),
        path.display()
    );
    Ok(table)
}

/// Convert every table row into a [`CampaignRecord`].
///
/// Fails with [`InsightsError::MissingColumn`] when a schema column is absent
/// and with [`InsightsError::InvalidValue`] on the first null, unparseable,
/// non-finite or negative value in a required field.
pub fn load_campaigns(table: &Table) -> Result<Vec<CampaignRecord>> {
    let columns = SchemaColumns::resolve(table)?;
    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| columns.parse_row(table, i + 1, row))
        .collect::<Result<Vec<_>>>()?;
    debug!("Parsed {} campaign records", records.len());
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn csv_error(source: &Path, err: csv::Error) -> InsightsError {
    InsightsError::Csv {
        path: source.to_path_buf(),
        source: err,
    }
}

/// Map null markers to `None`. Cells arrive already trimmed by the reader.
fn normalize_cell(cell: &str) -> Option<String> {
    if NULL_MARKERS
        .iter()
        .any(|marker| cell.eq_ignore_ascii_case(marker))
    {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Infer a column kind from its non-null cells. All-null columns are text.
fn infer_kind<'a>(cells: impl Iterator<Item = Option<&'a str>>, is_date_column: bool) -> ColumnKind {
    let values: Vec<&str> = cells.flatten().collect();
    if values.is_empty() {
        return ColumnKind::Text;
    }
    if is_date_column && values.iter().all(|v| DateParser::parse(v).is_some()) {
        return ColumnKind::Date;
    }
    if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        return ColumnKind::Integer;
    }
    if values
        .iter()
        .all(|v| v.parse::<f64>().map(f64::is_finite).unwrap_or(false))
    {
        return ColumnKind::Float;
    }
    ColumnKind::Text
}

/// Column index of every schema field in a particular table.
struct SchemaColumns {
    indices: Vec<(CampaignField, usize)>,
}

impl SchemaColumns {
    fn resolve(table: &Table) -> Result<Self> {
        let indices = CampaignField::ALL
            .iter()
            .map(|&field| {
                let idx = if field == CampaignField::Date {
                    table.date_column
                } else {
                    table.headers.iter().position(|h| field.matches(h))
                };
                idx.map(|i| (field, i))
                    .ok_or_else(|| InsightsError::MissingColumn {
                        column: field.canonical_name().to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { indices })
    }

    fn index(&self, field: CampaignField) -> usize {
        self.indices
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
            .unwrap_or_default()
    }

    fn parse_row(
        &self,
        table: &Table,
        row_number: usize,
        row: &[Option<String>],
    ) -> Result<CampaignRecord> {
        let cell = |field: CampaignField| FieldCell {
            row: row_number,
            column: &table.headers[self.index(field)],
            value: row[self.index(field)].as_deref(),
        };

        Ok(CampaignRecord {
            id: cell(CampaignField::Id).text()?,
            platform: cell(CampaignField::Platform).text()?,
            campaign_type: cell(CampaignField::CampaignType).text()?,
            audience: cell(CampaignField::Audience).text()?,
            date: cell(CampaignField::Date).date()?,
            daily_budget: cell(CampaignField::DailyBudget).number()?,
            impressions: cell(CampaignField::Impressions).count()?,
            clicks: cell(CampaignField::Clicks).count()?,
            conversions: cell(CampaignField::Conversions).count()?,
            total_cost: cell(CampaignField::TotalCost).non_negative()?,
            revenue: cell(CampaignField::Revenue).non_negative()?,
            ctr: cell(CampaignField::Ctr).number()?,
            conversion_rate: cell(CampaignField::ConversionRate).number()?,
            cpa: cell(CampaignField::Cpa).number()?,
            roas: cell(CampaignField::Roas).number()?,
            engagement_rate: cell(CampaignField::EngagementRate).number()?,
        })
    }
}

/// One required cell being converted, with enough context for an error.
struct FieldCell<'a> {
    row: usize,
    column: &'a str,
    value: Option<&'a str>,
}

impl FieldCell<'_> {
    fn invalid(&self, reason: &str) -> InsightsError {
        InsightsError::InvalidValue {
            row: self.row,
            column: self.column.to_string(),
            value: self.value.unwrap_or_default().to_string(),
            reason: reason.to_string(),
        }
    }

    fn required(&self) -> Result<&str> {
        self.value.ok_or_else(|| self.invalid("missing value"))
    }

    fn text(&self) -> Result<String> {
        self.required().map(str::to_string)
    }

    fn date(&self) -> Result<NaiveDate> {
        DateParser::parse(self.required()?).ok_or_else(|| self.invalid("not a recognised date"))
    }

    fn number(&self) -> Result<f64> {
        let value = self
            .required()?
            .parse::<f64>()
            .map_err(|_| self.invalid("not a number"))?;
        if !value.is_finite() {
            return Err(self.invalid("must be finite"));
        }
        Ok(value)
    }

    fn non_negative(&self) -> Result<f64> {
        let value = self.number()?;
        if value < 0.0 {
            return Err(self.invalid("must be non-negative"));
        }
        Ok(value)
    }

    /// Whole non-negative count; `"1500.0"` is accepted.
    fn count(&self) -> Result<u64> {
        let raw = self.required()?;
        if let Ok(n) = raw.parse::<u64>() {
            return Ok(n);
        }
        let value = self.non_negative()?;
        if value.fract() != 0.0 {
            return Err(self.invalid("must be a whole number"));
        }
        Ok(value as u64)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "campana_id,plataforma,tipo_campana,audiencia_objetivo,fecha_campana,presupuesto_diario,impresiones,clicks,conversiones,costo_total,revenue_generado,ctr,conversion_rate,cpa,roas,engagement_rate";

    fn csv_text(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    fn parse(text: &str) -> Result<Table> {
        Table::from_reader(Path::new("test.csv"), text.as_bytes(), "fecha_campana")
    }

    const ROW_A: &str =
        "CAMP-001,Facebook Ads,Conversion,25-34,2024-03-01,50,10000,250,20,100,500,2.5,8.0,5.0,5.0,3.1";
    const ROW_B: &str =
        "CAMP-002,TikTok Ads,Awareness,18-24,2024-03-05,40,8000,400,5,100,50,5.0,1.25,20.0,0.5,6.2";

    // ── Table::from_reader ────────────────────────────────────────────────────

    #[test]
    fn test_table_shape_and_kinds() {
        let table = parse(&csv_text(&[ROW_A, ROW_B])).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 16);
        assert_eq!(table.kinds[0], ColumnKind::Text);
        assert_eq!(table.kinds[4], ColumnKind::Date);
        assert_eq!(table.kinds[6], ColumnKind::Integer);
        assert_eq!(table.kinds[11], ColumnKind::Float);
        assert_eq!(table.date_column, Some(4));
    }

    #[test]
    fn test_null_markers_become_none() {
        let text = "a,b\n1,NA\n2, \n3,null\n4,x\n";
        let table = parse(text).unwrap();
        let b: Vec<Option<&str>> = table.column(1).collect();
        assert_eq!(b, vec![None, None, None, Some("x")]);
        assert_eq!(table.kinds[1], ColumnKind::Text);
    }

    #[test]
    fn test_padded_cells_are_trimmed_before_null_check() {
        let table = parse("a , b\n 1 , NA \n 2 ,  x  \n").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        let b: Vec<Option<&str>> = table.column(1).collect();
        assert_eq!(b, vec![None, Some("x")]);
        assert_eq!(table.kinds[0], ColumnKind::Integer);
    }

    #[test]
    fn test_numeric_kind_ignores_nulls() {
        let table = parse("a,b\n1,1.5\n,2.5\n3,\n").unwrap();
        assert_eq!(table.kinds[0], ColumnKind::Integer);
        assert_eq!(table.kinds[1], ColumnKind::Float);
        assert_eq!(table.numeric_column(0), vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_all_null_column_is_text() {
        let table = parse("a,b\n1,\n2,\n").unwrap();
        assert_eq!(table.kinds[1], ColumnKind::Text);
        assert!(table.numeric_columns().contains(&0));
        assert!(table.categorical_columns().contains(&1));
    }

    #[test]
    fn test_custom_date_column() {
        let text = "id,day\nx,2024-01-02\ny,2024-01-03\n";
        let table = Table::from_reader(Path::new("t.csv"), text.as_bytes(), "day").unwrap();
        assert_eq!(table.kinds[1], ColumnKind::Date);
        assert_eq!(table.date_column, Some(1));
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let err = parse(&csv_text(&[])).unwrap_err();
        assert!(matches!(err, InsightsError::EmptyDataset(_)));
    }

    #[test]
    fn test_empty_input_is_empty_dataset() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, InsightsError::EmptyDataset(_)));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let err = parse("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, InsightsError::Csv { .. }));
    }

    #[test]
    fn test_head_is_bounded() {
        let table = parse("a\n1\n2\n3\n").unwrap();
        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(10).len(), 3);
    }

    // ── load_table ────────────────────────────────────────────────────────────

    #[test]
    fn test_load_table_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_table(&tmp.path().join("nope.csv"), "fecha_campana").unwrap_err();
        assert!(matches!(err, InsightsError::FileRead { .. }));
    }

    #[test]
    fn test_load_table_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("campaigns.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", csv_text(&[ROW_A, ROW_B])).unwrap();

        let table = load_table(&path, "fecha_campana").unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.source, path);
    }

    // ── load_campaigns ────────────────────────────────────────────────────────

    #[test]
    fn test_load_campaigns_parses_fields() {
        let table = parse(&csv_text(&[ROW_A, ROW_B])).unwrap();
        let records = load_campaigns(&table).unwrap();

        assert_eq!(records.len(), 2);
        let a = &records[0];
        assert_eq!(a.id, "CAMP-001");
        assert_eq!(a.platform, "Facebook Ads");
        assert_eq!(a.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(a.impressions, 10_000);
        assert_eq!(a.conversions, 20);
        assert!((a.revenue - 500.0).abs() < 1e-9);
        assert!((a.roas - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_campaigns_accepts_english_aliases() {
        let text = "campaign_id,platform,campaign_type,audience,campaign_date,daily_budget,impressions,clicks,conversions,total_cost,revenue,ctr,conversion_rate,cpa,roas,engagement_rate\n\
                    C1,Google,Search,35-44,2024-02-01,10,100,10,1,20,60,10.0,10.0,20.0,3.0,4.0\n";
        let table = parse(text).unwrap();
        let records = load_campaigns(&table).unwrap();
        assert_eq!(records[0].id, "C1");
        assert_eq!(records[0].audience, "35-44");
    }

    #[test]
    fn test_load_campaigns_missing_column() {
        let text = "campana_id,plataforma\nC1,Facebook Ads\n";
        let table = parse(text).unwrap();
        let err = load_campaigns(&table).unwrap_err();
        match err {
            InsightsError::MissingColumn { column } => assert_eq!(column, "tipo_campana"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_campaigns_rejects_negative_cost() {
        let row = "CAMP-009,Facebook Ads,Conversion,25-34,2024-03-01,50,10000,250,20,-100,500,2.5,8.0,5.0,5.0,3.1";
        let table = parse(&csv_text(&[ROW_A, row])).unwrap();
        let err = load_campaigns(&table).unwrap_err();
        match err {
            InsightsError::InvalidValue { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "costo_total");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_campaigns_rejects_null_required_field() {
        let row = "CAMP-009,,Conversion,25-34,2024-03-01,50,10000,250,20,100,500,2.5,8.0,5.0,5.0,3.1";
        let table = parse(&csv_text(&[row])).unwrap();
        let err = load_campaigns(&table).unwrap_err();
        assert!(err.to_string().contains("missing value"));
    }

    #[test]
    fn test_load_campaigns_accepts_whole_float_counts() {
        let row = "CAMP-010,Facebook Ads,Conversion,25-34,2024-03-01,50,10000.0,250,20.0,100,500,2.5,8.0,5.0,5.0,3.1";
        let table = parse(&csv_text(&[row])).unwrap();
        let records = load_campaigns(&table).unwrap();
        assert_eq!(records[0].impressions, 10_000);
        assert_eq!(records[0].conversions, 20);
    }

    #[test]
    fn test_load_campaigns_rejects_fractional_counts() {
        let row = "CAMP-011,Facebook Ads,Conversion,25-34,2024-03-01,50,10000,250,2.5,100,500,2.5,8.0,5.0,5.0,3.1";
        let table = parse(&csv_text(&[row])).unwrap();
        let err = load_campaigns(&table).unwrap_err();
        assert!(err.to_string().contains("whole number"));
    }

    #[test]
    fn test_load_campaigns_rejects_bad_date() {
        let row = "CAMP-012,Facebook Ads,Conversion,25-34,someday,50,10000,250,20,100,500,2.5,8.0,5.0,5.0,3.1";
        let table = parse(&csv_text(&[ROW_A, row])).unwrap();
        // One unparseable date demotes the column to text; parsing the row
        // still reports the offending cell.
        assert_eq!(table.kinds[4], ColumnKind::Text);
        let err = load_campaigns(&table).unwrap_err();
        assert!(err.to_string().contains("not a recognised date"));
    }
}
