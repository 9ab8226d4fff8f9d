//! Run-length aggregating CSV writer
//!
//! Groups consecutive records that share the identity key into one output
//! row, unioning the values of aggregating columns into a set. Correct only
//! because the enumeration pipeline keeps records with equal group keys
//! contiguous; no sort is performed and at most one row is buffered.

use std::collections::BTreeSet;
use std::io::Write;
use tracing::debug;

use crate::output::{Column, FormatError, FormatResult, SlotWriter};
use crate::{Centre, DaySlot};

enum Cell {
    Plain(String),
    Set(BTreeSet<String>),
}

impl Cell {
    fn render(&self) -> String {
        match self {
            Cell::Plain(value) => value.clone(),
            // BTreeSet iterates in lexicographic order.
            Cell::Set(values) => values.iter().cloned().collect::<Vec<_>>().join(";"),
        }
    }
}

struct BufferedRow {
    identity: Vec<String>,
    cells: Vec<Cell>,
}

/// Streaming CSV writer with run-length grouping.
pub struct CsvWriter<W: Write> {
    writer: csv::Writer<W>,
    columns: Vec<Column>,
    buffered: Option<BufferedRow>,
    rows_written: u64,
}

impl<W: Write> CsvWriter<W> {
    /// Create a writer over a sink with the given column layout.
    pub fn new(sink: W, columns: Vec<Column>) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
            columns,
            buffered: None,
            rows_written: 0,
        }
    }

    /// Rows emitted so far, excluding the header.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    fn flush_buffered(&mut self) -> FormatResult<()> {
        let Some(row) = self.buffered.take() else {
            return Ok(());
        };
        let rendered: Vec<String> = row.cells.iter().map(Cell::render).collect();
        self.writer
            .write_record(&rendered)
            .map_err(|e| FormatError::Csv(format!("failed to write row: {e}")))?;
        self.writer
            .flush()
            .map_err(|e| FormatError::Io(format!("failed to flush: {e}")))?;
        self.rows_written += 1;
        Ok(())
    }
}

impl<W: Write> SlotWriter for CsvWriter<W> {
    fn start(&mut self) -> FormatResult<()> {
        let labels: Vec<&str> = self.columns.iter().map(|c| c.label.as_str()).collect();
        self.writer
            .write_record(&labels)
            .map_err(|e| FormatError::Csv(format!("failed to write header: {e}")))?;
        self.writer
            .flush()
            .map_err(|e| FormatError::Io(format!("failed to flush: {e}")))
    }

    fn write(&mut self, centre: &Centre, slot: &DaySlot) -> FormatResult<()> {
        let mut cells = Vec::with_capacity(self.columns.len());
        let mut identity = Vec::new();
        for column in &self.columns {
            let value = column.field.extract(centre, slot);
            if column.aggregate {
                cells.push(Cell::Set(BTreeSet::from([value])));
            } else {
                identity.push(value.clone());
                cells.push(Cell::Plain(value));
            }
        }

        match &mut self.buffered {
            Some(row) if row.identity == identity => {
                for (cell, new) in row.cells.iter_mut().zip(cells) {
                    if let (Cell::Set(existing), Cell::Set(incoming)) = (cell, new) {
                        existing.extend(incoming);
                    }
                }
            }
            Some(_) => {
                self.flush_buffered()?;
                self.buffered = Some(BufferedRow { identity, cells });
            }
            None => {
                self.buffered = Some(BufferedRow { identity, cells });
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> FormatResult<()> {
        self.flush_buffered()?;
        self.writer
            .flush()
            .map_err(|e| FormatError::Io(format!("failed to flush: {e}")))?;
        debug!(rows = self.rows_written, "CSV output complete");
        Ok(())
    }
}
