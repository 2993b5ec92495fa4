//! Data-quality and descriptive-statistics profiling of a loaded [`Table`].

use std::collections::{HashMap, HashSet};

use insights_core::formatting::percentage;
use insights_core::stats::{
    coefficient_of_variation, iqr_outliers, mean, pearson, percentile, sample_std, sorted,
    OutlierSummary,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::reader::{ColumnKind, Table};

/// Bucket name for null cells in frequency tables.
pub const NULL_BUCKET: &str = "<null>";

// ── Profile types ─────────────────────────────────────────────────────────────

/// Kind and null count of one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnOverview {
    pub name: String,
    pub kind: ColumnKind,
    pub nulls: usize,
    /// `(1 - nulls / rows) * 100`.
    pub completeness_pct: f64,
}

/// `describe()`-style summary of a numeric column, nulls skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl DescriptiveStats {
    pub fn of(values: &[f64]) -> Self {
        let data = sorted(values);
        Self {
            count: data.len(),
            mean: mean(&data),
            std: sample_std(&data),
            min: data.first().copied(),
            q1: percentile(&data, 25.0),
            median: percentile(&data, 50.0),
            q3: percentile(&data, 75.0),
            max: data.last().copied(),
        }
    }
}

/// Statistics, dispersion and outliers for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct NumericProfile {
    pub name: String,
    pub stats: DescriptiveStats,
    /// Coefficient of variation in percent.
    pub cv_pct: Option<f64>,
    pub outliers: Option<OutlierSummary>,
    /// Outlier count as a percentage of the table's row count.
    pub outlier_pct: f64,
}

/// Pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `values[i][j]` correlates `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Build the matrix from named columns of equal length.
    pub fn compute(columns: &[(String, Vec<Option<f64>>)]) -> Self {
        let n = columns.len();
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            for j in i..n {
                let r = pearson(&columns[i].1, &columns[j].1);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Self {
            columns: columns.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }

    fn index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Correlation between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.values[self.index(a)?][self.index(b)?]
    }

    /// The other column with the largest absolute correlation to `column`.
    pub fn strongest_with(&self, column: &str) -> Option<(&str, f64)> {
        let i = self.index(column)?;
        self.values[i]
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .filter_map(|(j, r)| r.map(|r| (self.columns[j].as_str(), r)))
            .fold(None, |best: Option<(&str, f64)>, (name, r)| match best {
                Some((_, b)) if b.abs() >= r.abs() => best,
                _ => Some((name, r)),
            })
    }
}

/// Value counts of one categorical column.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyTable {
    pub column: String,
    /// Sorted by count descending, ties in first-seen order. Nulls are
    /// counted under [`NULL_BUCKET`].
    pub counts: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn compute<'a>(column: &str, cells: impl Iterator<Item = Option<&'a str>>) -> Self {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for cell in cells {
            let key = cell.unwrap_or(NULL_BUCKET);
            match index.get(key) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    index.insert(key, counts.len());
                    counts.push((key.to_string(), 1));
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Self {
            column: column.to_string(),
            counts,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
}

/// Everything the quality analysis reports about a table.
#[derive(Debug, Clone, Serialize)]
pub struct DataProfile {
    pub rows: usize,
    pub columns: usize,
    pub overview: Vec<ColumnOverview>,
    pub numeric: Vec<NumericProfile>,
    pub correlation: CorrelationMatrix,
    pub categorical: Vec<FrequencyTable>,
    pub duplicate_rows: usize,
    pub duplicate_rate_pct: f64,
    pub mean_completeness_pct: f64,
}

impl DataProfile {
    pub fn numeric_profile(&self, column: &str) -> Option<&NumericProfile> {
        self.numeric.iter().find(|p| p.name == column)
    }

    /// Total null cells across the table.
    pub fn total_nulls(&self) -> usize {
        self.overview.iter().map(|c| c.nulls).sum()
    }
}

// ── DataProfiler ──────────────────────────────────────────────────────────────

/// Stateless profiler over a [`Table`].
pub struct DataProfiler;

impl DataProfiler {
    pub fn profile(table: &Table) -> DataProfile {
        let rows = table.n_rows();

        let overview: Vec<ColumnOverview> = (0..table.n_cols())
            .map(|idx| {
                let nulls = table.column(idx).filter(Option::is_none).count();
                ColumnOverview {
                    name: table.headers[idx].clone(),
                    kind: table.kinds[idx],
                    nulls,
                    completeness_pct: 100.0 - percentage(nulls as f64, rows as f64, 6),
                }
            })
            .collect();

        let numeric_columns: Vec<(String, Vec<Option<f64>>)> = table
            .numeric_columns()
            .into_iter()
            .map(|idx| (table.headers[idx].clone(), table.numeric_column(idx)))
            .collect();

        let numeric: Vec<NumericProfile> = numeric_columns
            .iter()
            .map(|(name, cells)| Self::profile_numeric(name, cells, rows))
            .collect();

        let correlation = CorrelationMatrix::compute(&numeric_columns);

        let categorical = table
            .categorical_columns()
            .into_iter()
            .map(|idx| FrequencyTable::compute(&table.headers[idx], table.column(idx)))
            .collect();

        let duplicate_rows = Self::count_duplicates(&table.rows);
        let completeness: Vec<f64> = overview.iter().map(|c| c.completeness_pct).collect();

        debug!(
            "Profiled {} numeric and {} categorical columns",
            numeric.len(),
            table.categorical_columns().len()
        );

        DataProfile {
            rows,
            columns: table.n_cols(),
            overview,
            numeric,
            correlation,
            categorical,
            duplicate_rows,
            duplicate_rate_pct: percentage(duplicate_rows as f64, rows as f64, 6),
            mean_completeness_pct: mean(&completeness).unwrap_or_default(),
        }
    }

    fn profile_numeric(name: &str, cells: &[Option<f64>], rows: usize) -> NumericProfile {
        let values: Vec<f64> = cells.iter().flatten().copied().collect();
        let stats = DescriptiveStats::of(&values);
        if stats.std == Some(0.0) {
            warn!("Column {name:?} has zero variance; CV and correlation undefined");
        }
        let outliers = iqr_outliers(&values);
        let outlier_count = outliers.as_ref().map_or(0, |o| o.count);
        NumericProfile {
            name: name.to_string(),
            stats,
            cv_pct: coefficient_of_variation(&values),
            outliers,
            outlier_pct: percentage(outlier_count as f64, rows as f64, 6),
        }
    }

    /// Rows identical to an earlier row.
    fn count_duplicates(rows: &[Vec<Option<String>>]) -> usize {
        let mut seen: HashSet<&[Option<String>]> = HashSet::new();
        rows.iter().filter(|row| !seen.insert(row.as_slice())).count()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
