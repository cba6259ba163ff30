use std::collections::HashMap;

use crate::error::DatasetError;

/// Header plus rows of CSV cells. Every row has exactly one cell per header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Rows shorter than the header are padded with empty cells and longer
    /// ones truncated.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, DatasetError> {
        self.column_index(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<Vec<&str>, DatasetError> {
        let index = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Removes the named columns; names the dataset does not have are
    /// ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self
            .headers
            .iter()
            .map(|header| !names.contains(&header.as_str()))
            .collect();

        self.headers = retain_by_mask(std::mem::take(&mut self.headers), &keep);
        for row in &mut self.rows {
            *row = retain_by_mask(std::mem::take(row), &keep);
        }
    }

    /// Keeps rows for which `predicate` holds, in their original order.
    pub fn retain_rows<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|row| predicate(row));
    }

    /// Appends `other`'s rows, matching columns by name. Columns only one
    /// side has are filled with empty cells on the other.
    pub fn append(&mut self, other: Dataset) {
        if self.headers.is_empty() && self.rows.is_empty() {
            *self = other;
            return;
        }

        for header in &other.headers {
            if self.column_index(header).is_none() {
                self.headers.push(header.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }

        let positions: Vec<usize> = other
            .headers
            .iter()
            .filter_map(|header| self.column_index(header))
            .collect();
        let width = self.headers.len();
        for other_row in other.rows {
            let mut row = vec![String::new(); width];
            for (cell, &position) in other_row.into_iter().zip(&positions) {
                row[position] = cell;
            }
            self.rows.push(row);
        }
    }

    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> Result<(), DatasetError>
    where
        F: FnMut(&str) -> String,
    {
        let index = self.require_column(name)?;
        for row in &mut self.rows {
            row[index] = f(&row[index]);
        }
        Ok(())
    }

    /// Appends columns whose cells come from `values`, called once per row.
    /// `values` must return one cell per name.
    pub fn add_columns<F>(&mut self, names: &[&str], mut values: F)
    where
        F: FnMut(&[String]) -> Vec<String>,
    {
        self.headers.extend(names.iter().map(|name| name.to_string()));
        for row in &mut self.rows {
            let mut cells = values(row);
            cells.resize(names.len(), String::new());
            row.extend(cells);
        }
    }

    /// Distinct values of a column with their counts, most frequent first;
    /// ties keep first-seen order.
    pub fn value_counts(&self, name: &str) -> Result<Vec<(String, usize)>, DatasetError> {
        let index = self.require_column(name)?;
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in &self.rows {
            let cell = row[index].as_str();
            let count = counts.entry(cell).or_insert(0);
            if *count == 0 {
                order.push(cell.to_string());
            }
            *count += 1;
        }

        let mut result: Vec<(String, usize)> = order
            .into_iter()
            .map(|value| {
                let count = counts[value.as_str()];
                (value, count)
            })
            .collect();
        result.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(result)
    }
}

fn retain_by_mask(values: Vec<String>, keep: &[bool]) -> Vec<String> {
    values
        .into_iter()
        .zip(keep)
        .filter_map(|(value, &keep)| keep.then_some(value))
        .collect()
}

/// Numeric value of a cell. Empty, non-numeric and non-finite cells are
/// `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
