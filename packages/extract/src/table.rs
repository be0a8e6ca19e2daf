//! Row-per-match tables.
//!
//! Reorients a [`ResultIndex`] (match → group → value) into a dense table
//! with one row per match and one column per group. Cells for groups a
//! match has no entry for are filled with `None`.

use std::fmt;
use std::io;

use regex_extract_models::{GroupKey, GroupMap, GroupValue, MatchFlags, ResultIndex};

use crate::ExtractError;
use crate::groups::extract_groups;

/// Placeholder printed for absent cells by the [`fmt::Display`] rendering.
const ABSENT: &str = "-";

/// Runs [`extract_groups`] and reshapes the result into a [`Table`].
///
/// Columns follow `group_names` when given, otherwise the ascending
/// positions of the pattern's capture groups. Rows follow match order.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] if the pattern fails to compile.
pub fn to_table(
    pattern: &str,
    text: &str,
    group_names: Option<&[&str]>,
    flags: &MatchFlags,
) -> Result<Table, ExtractError> {
    let index = extract_groups(pattern, text, group_names, flags)?;
    let columns = group_names.map(|names| names.iter().map(|&name| GroupKey::from(name)).collect());

    Ok(Table::from_result_index(&index, columns))
}

/// One row of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Key of the match this row came from.
    pub index: usize,
    /// One cell per table column, in column order.
    pub cells: Vec<GroupValue>,
}

/// A dense table with one [`Row`] per match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<GroupKey>,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table from a [`ResultIndex`].
    ///
    /// With `columns`, those keys become the columns in the given order
    /// (repeated keys collapse into their first position). Without, the
    /// columns are every key seen in any match, sorted.
    #[must_use]
    pub fn from_result_index(index: &ResultIndex, columns: Option<Vec<GroupKey>>) -> Self {
        let columns = columns.map_or_else(|| sorted_keys(index), dedup_keys);

        let rows = index
            .iter()
            .map(|(key, groups)| Row {
                index: key,
                cells: columns.iter().map(|col| cell_value(groups, col)).collect(),
            })
            .collect();

        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[GroupKey] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at row `row` (the row's position, which equals its
    /// match key) and column `column`.
    #[must_use]
    pub fn cell(&self, row: usize, column: &GroupKey) -> Option<&GroupValue> {
        let col = self.column_position(column)?;
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Returns every value of `column`, top to bottom.
    #[must_use]
    pub fn column(&self, column: &GroupKey) -> Option<Vec<Option<&str>>> {
        let col = self.column_position(column)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.cells.get(col).and_then(Option::as_deref))
                .collect(),
        )
    }

    /// Converts each row to a JSON object keyed by column name, with
    /// absent cells as `null`.
    #[must_use]
    pub fn to_records(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut map = serde_json::Map::new();
                for (column, cell) in self.columns.iter().zip(&row.cells) {
                    let value = cell
                        .as_ref()
                        .map_or(serde_json::Value::Null, |s| serde_json::Value::String(s.clone()));
                    map.insert(column.to_string(), value);
                }
                serde_json::Value::Object(map)
            })
            .collect()
    }

    /// Writes the table as CSV with a leading `match` column holding each
    /// row's match key. Absent cells are written as empty fields.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Csv`] if a record cannot be written, or
    /// [`ExtractError::Io`] if flushing `writer` fails.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), ExtractError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec!["match".to_owned()];
        header.extend(self.columns.iter().map(ToString::to_string));
        csv_writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.index.to_string()];
            record.extend(row.cells.iter().map(|c| c.clone().unwrap_or_default()));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;

        Ok(())
    }

    fn column_position(&self, column: &GroupKey) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = self.columns.iter().map(ToString::to_string).collect();
        let labels: Vec<String> = self.rows.iter().map(|r| r.index.to_string()).collect();

        let label_width = labels.iter().map(String::len).max().unwrap_or(0);
        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(col, name)| {
                self.rows
                    .iter()
                    .map(|r| r.cells[col].as_deref().unwrap_or(ABSENT).chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:label_width$}", "")?;
        for (name, &width) in header.iter().zip(&widths) {
            write!(f, "  {name:<width$}")?;
        }
        writeln!(f)?;

        for (row, label) in self.rows.iter().zip(&labels) {
            write!(f, "{label:<label_width$}")?;
            for (cell, &width) in row.cells.iter().zip(&widths) {
                write!(f, "  {:<width$}", cell.as_deref().unwrap_or(ABSENT))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

fn cell_value(groups: &GroupMap, column: &GroupKey) -> GroupValue {
    groups.get(column).cloned().flatten()
}

fn sorted_keys(index: &ResultIndex) -> Vec<GroupKey> {
    let mut keys: Vec<GroupKey> = index
        .iter()
        .flat_map(|(_, groups)| groups.keys().cloned())
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

fn dedup_keys(keys: Vec<GroupKey>) -> Vec<GroupKey> {
    let mut unique = Vec::with_capacity(keys.len());
    for key in keys {
        if !unique.contains(&key) {
            unique.push(key);
        }
    }
    unique
}
