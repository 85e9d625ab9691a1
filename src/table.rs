//! Tabular output for curve tables: one CSV record per land count, no header.

use crate::simulation::curve::CurveTable;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name written inside the output directory
pub const TABLE_FILE_NAME: &str = "mana_sim.csv";

/// Decimal places written per cell unless configured otherwise
pub const DEFAULT_PRECISION: usize = 6;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Cell at row {row}, column {column} is not a probability: {value}")]
    NotAProbability { row: usize, column: usize, value: f64 },
}

/// Destination that accepts rows of probabilities in order
pub trait TableSink {
    fn write_row(&mut self, row: &[f64]) -> Result<(), TableError>;

    fn finish(&mut self) -> Result<(), TableError> {
        Ok(())
    }
}

/// Writes rows as CSV records with a fixed number of decimals
pub struct CsvTableSink<W: Write> {
    writer: csv::Writer<W>,
    precision: usize,
}

impl<W: Write> CsvTableSink<W> {
    pub fn new(inner: W, precision: usize) -> Self {
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(inner);
        CsvTableSink { writer, precision }
    }

    pub fn into_inner(self) -> Result<W, TableError> {
        self.writer
            .into_inner()
            .map_err(|e| TableError::IoError(e.into_error()))
    }
}

impl<W: Write> TableSink for CsvTableSink<W> {
    fn write_row(&mut self, row: &[f64]) -> Result<(), TableError> {
        let precision = self.precision;
        self.writer
            .write_record(row.iter().map(|p| format!("{:.*}", precision, p)))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), TableError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl CurveTable {
    /// Write every row in land-count order; rejects NaN or out-of-range cells
    pub fn write_to<S: TableSink>(&self, sink: &mut S) -> Result<(), TableError> {
        for (row_idx, row) in self.rows.iter().enumerate() {
            if let Some((column, &value)) = row
                .iter()
                .enumerate()
                .find(|(_, p)| !(0.0..=1.0).contains(*p))
            {
                return Err(TableError::NotAProbability {
                    row: row_idx,
                    column,
                    value,
                });
            }
            sink.write_row(row)?;
        }
        sink.finish()
    }
}

/// Write `table` to `dir/mana_sim.csv`, creating `dir` if needed
pub fn write_table_file(dir: &Path, table: &CurveTable, precision: usize) -> Result<PathBuf, TableError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(TABLE_FILE_NAME);
    let file = fs::File::create(&path)?;
    let mut sink = CsvTableSink::new(file, precision);
    table.write_to(&mut sink)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::curve::LandRange;

    fn table(rows: Vec<Vec<f64>>) -> CurveTable {
        CurveTable {
            lands: LandRange::new(16, 15 + rows.len() as u32).expect("valid range"),
            turns: 1 + rows[0].len() as u32,
            rows,
        }
    }

    #[test]
    fn test_csv_has_fixed_precision_and_no_header() {
        let table = table(vec![vec![0.5, 0.25, 1.0], vec![0.123456789, 0.0, 0.9]]);
        let mut sink = CsvTableSink::new(Vec::new(), 4);
        table.write_to(&mut sink).expect("table writes");

        let text = String::from_utf8(sink.into_inner().expect("flush")).expect("utf8");
        assert_eq!(text, "0.5000,0.2500,1.0000\n0.1235,0.0000,0.9000\n");
    }

    #[test]
    fn test_rejects_non_probabilities() {
        let mut sink = CsvTableSink::new(Vec::new(), DEFAULT_PRECISION);

        let nan = table(vec![vec![0.5, f64::NAN]]);
        assert!(matches!(
            nan.write_to(&mut sink),
            Err(TableError::NotAProbability { row: 0, column: 1, .. })
        ));

        let too_big = table(vec![vec![0.5], vec![1.5]]);
        assert!(matches!(
            too_big.write_to(&mut sink),
            Err(TableError::NotAProbability { row: 1, column: 0, .. })
        ));
    }

    /// Collects rows in memory, for checking row order
    struct RecordingSink(Vec<Vec<f64>>);

    impl TableSink for RecordingSink {
        fn write_row(&mut self, row: &[f64]) -> Result<(), TableError> {
            self.0.push(row.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_rows_written_in_order() {
        let rows = vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]];
        let mut sink = RecordingSink(Vec::new());
        table(rows.clone()).write_to(&mut sink).expect("table writes");
        assert_eq!(sink.0, rows);
    }

    #[test]
    fn test_write_table_file_creates_directory() {
        let dir = std::env::temp_dir()
            .join(format!("mana-curve-test-{}", std::process::id()))
            .join("simulations");
        let path = write_table_file(&dir, &table(vec![vec![0.75]]), 2).expect("file writes");

        assert_eq!(path, dir.join(TABLE_FILE_NAME));
        assert_eq!(fs::read_to_string(&path).expect("file readable"), "0.75\n");
        let _ = fs::remove_dir_all(dir.parent().expect("has parent"));
    }
}
