//! In-memory CSV table.
//!
//! Cells are kept as text so that columns the pipeline does not know
//! about are written back exactly as read. Numeric columns are parsed on
//! demand through the cleaner.

use crate::{
    cleaner::{self, clean_european_number},
    error::{PipelineError, PipelineResult},
};
use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Short name used in error messages ("sku", "daily").
    pub label:   &'static str,
    headers:     Vec<String>,
    rows:        Vec<Vec<String>>,
}

impl Table {
    /// Parse a headed CSV stream.
    pub fn read<R: Read>(label: &'static str, reader: R) -> PipelineResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        log::debug!("{label}: read {} rows x {} columns", rows.len(), headers.len());
        Ok(Self { label, headers, rows })
    }

    pub fn read_file(label: &'static str, path: &Path) -> PipelineResult<Self> {
        let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
        Self::read(label, file)
    }

    pub fn write<W: Write>(&self, writer: W) -> PipelineResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush().map_err(|e| PipelineError::Csv(e.into()))?;
        Ok(())
    }

    pub fn write_file(&self, path: &Path) -> PipelineResult<()> {
        let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
        self.write(file)
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

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn require_column(&self, name: &str) -> PipelineResult<usize> {
        self.column_index(name).ok_or_else(|| PipelineError::MissingColumn {
            table:  self.label,
            column: name.to_string(),
        })
    }

    /// Raw text of one column. Short rows yield "".
    pub fn text_column(&self, name: &str) -> PipelineResult<Vec<&str>> {
        let idx = self.require_column(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
            .collect())
    }

    /// One column parsed through the locale-aware cleaner.
    pub fn numeric_column(&self, name: &str) -> PipelineResult<Vec<f64>> {
        Ok(self
            .text_column(name)?
            .into_iter()
            .map(|cell| clean_european_number(Some(cell)))
            .collect())
    }

    /// A column this pipeline wrote itself. Canonical float text, including
    /// `NaN` and `inf`, parses as-is; anything else goes through the cleaner.
    pub fn derived_column(&self, name: &str) -> PipelineResult<Vec<f64>> {
        Ok(self
            .text_column(name)?
            .into_iter()
            .map(|cell| {
                cell.parse::<f64>()
                    .unwrap_or_else(|_| clean_european_number(Some(cell)))
            })
            .collect())
    }

    /// Clean a column in place and return how many non-missing cells
    /// failed to parse and were coerced to 0.
    pub fn clean_numeric_column(&mut self, name: &str) -> PipelineResult<usize> {
        let idx = self.require_column(name)?;
        let mut coerced = 0;
        for row in &mut self.rows {
            let Some(cell) = row.get_mut(idx) else { continue };
            let value = match cleaner::parse_european(cell) {
                Some(v) => v,
                None => {
                    if !cleaner::is_missing(cell.trim()) {
                        coerced += 1;
                    }
                    0.0
                }
            };
            *cell = cleaner::format_number(value);
        }
        Ok(coerced)
    }

    /// Replace a column's values, or append it if absent.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> PipelineResult<()> {
        if values.len() != self.rows.len() {
            return Err(anyhow::anyhow!(
                "{}: column '{name}' has {} values for {} rows",
                self.label,
                values.len(),
                self.rows.len()
            )
            .into());
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    if row.len() <= idx {
                        row.resize(idx + 1, String::new());
                    }
                    row[idx] = value;
                }
            }
            None => {
                let width = self.headers.len();
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.resize(width, String::new());
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    pub fn set_numeric_column(&mut self, name: &str, values: &[f64]) -> PipelineResult<()> {
        self.set_column(name, values.iter().map(|v| cleaner::format_number(*v)).collect())
    }

    /// Reorder rows: row `i` of the result is row `order[i]` of the input.
    pub fn reorder_rows(&mut self, order: &[usize]) {
        let mut taken: Vec<Option<Vec<String>>> = self.rows.drain(..).map(Some).collect();
        self.rows = order.iter().filter_map(|&i| taken.get_mut(i).and_then(Option::take)).collect();
    }

    /// Deserialize every row into `T` by header name. Columns `T` does
    /// not declare are ignored.
    pub fn records<T: DeserializeOwned>(&self) -> PipelineResult<Vec<T>> {
        let headers = csv::StringRecord::from(self.headers.clone());
        self.rows
            .iter()
            .map(|row| {
                csv::StringRecord::from(row.clone())
                    .deserialize(Some(&headers))
                    .map_err(PipelineError::from)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Name,Revenue,Note
Widget,\"1 200,50\",keep me
Gadget,300,\"a, b\"
";

    #[test]
    fn read_and_write_preserves_unknown_columns() {
        let table = Table::read("sku", SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), &["Name", "Revenue", "Note"]);

        let mut out = Vec::new();
        table.write(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"a, b\""));
        assert!(text.contains("keep me"));
    }

    #[test]
    fn numeric_column_cleans_locale_format() {
        let table = Table::read("sku", SAMPLE.as_bytes()).unwrap();
        let revenue = table.numeric_column("Revenue").unwrap();
        assert!((revenue[0] - 1200.5).abs() < 1e-9);
        assert_eq!(revenue[1], 300.0);
    }

    #[test]
    fn missing_column_is_named() {
        let table = Table::read("sku", SAMPLE.as_bytes()).unwrap();
        let err = table.numeric_column("COGS").unwrap_err();
        assert!(err.to_string().contains("COGS"));
        assert!(err.to_string().contains("sku"));
    }

    #[test]
    fn set_column_replaces_or_appends() {
        let mut table = Table::read("sku", SAMPLE.as_bytes()).unwrap();
        table.set_column("Name", vec!["A".into(), "B".into()]).unwrap();
        table.set_column("Extra", vec!["1".into(), "2".into()]).unwrap();
        assert_eq!(table.headers().len(), 4);
        assert_eq!(table.rows()[0], vec!["A", "1 200,50", "keep me", "1"]);
        assert!(table.set_column("Bad", vec![]).is_err());
    }

    #[test]
    fn clean_counts_coercions() {
        let csv = "Revenue\n\"12,5\"\nabc\nNA\n";
        let mut table = Table::read("sku", csv.as_bytes()).unwrap();
        let coerced = table.clean_numeric_column("Revenue").unwrap();
        assert_eq!(coerced, 1);
        assert_eq!(table.text_column("Revenue").unwrap(), vec!["12.5", "0", "0"]);
    }

    #[test]
    fn derived_column_keeps_nan() {
        let table = Table::read("sku", "Margin_Pct\nNaN\n\"2,5\"\n7\n".as_bytes()).unwrap();
        let margin = table.derived_column("Margin_Pct").unwrap();
        assert!(margin[0].is_nan());
        assert_eq!(&margin[1..], &[2.5, 7.0]);
        assert_eq!(table.numeric_column("Margin_Pct").unwrap()[0], 0.0);
    }

    #[test]
    fn reorder_rows_permutes() {
        let mut table = Table::read("sku", SAMPLE.as_bytes()).unwrap();
        table.reorder_rows(&[1, 0]);
        assert_eq!(table.rows()[0][0], "Gadget");
    }
}
