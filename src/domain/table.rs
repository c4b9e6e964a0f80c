//! Date-indexed table of series observations.
//!
//! Rows are keyed by an ascending, duplicate-free date index. Each column holds
//! one logical series; a cell is `None` when the series has no value on that date
//! (either the provider reported it missing, or the series has no observation
//! for a date another series covers).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::Observation;

/// One named column of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl TimeTable {
    /// Outer-join named observation lists on date.
    ///
    /// The row index is the union of all dates, sorted ascending. Columns keep
    /// the order of `series`. If a series repeats a date, the last value wins.
    pub fn from_series(series: Vec<(String, Vec<Observation>)>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        let width = series.len();

        for (col, (_, observations)) in series.iter().enumerate() {
            for obs in observations {
                let row = by_date.entry(obs.date).or_insert_with(|| vec![None; width]);
                row[col] = obs.value;
            }
        }

        let dates: Vec<NaiveDate> = by_date.keys().copied().collect();
        let mut columns: Vec<Column> = series
            .into_iter()
            .map(|(name, _)| Column {
                name,
                values: Vec::with_capacity(dates.len()),
            })
            .collect();

        for row in by_date.into_values() {
            for (col, value) in row.into_iter().enumerate() {
                columns[col].values.push(value);
            }
        }

        Self { dates, columns }
    }

    /// Build a table from already-aligned columns.
    ///
    /// Returns `None` if a column length does not match the date index, or the
    /// dates are not strictly ascending.
    pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Option<Self> {
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return None;
        }
        if columns.iter().any(|c| c.values.len() != dates.len()) {
            return None;
        }
        Some(Self { dates, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Listwise deletion: keep only rows where every column has a value.
    pub fn drop_missing(&self) -> TimeTable {
        let keep: Vec<usize> = (0..self.dates.len())
            .filter(|&row| self.columns.iter().all(|c| c.values[row].is_some()))
            .collect();

        let dates = keep.iter().map(|&row| self.dates[row]).collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: keep.iter().map(|&row| c.values[row]).collect(),
            })
            .collect();

        TimeTable { dates, columns }
    }

    /// Present values of a column, in row order.
    pub fn present_values(&self, name: &str) -> Vec<f64> {
        self.column(name)
            .map(|c| c.values.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}
