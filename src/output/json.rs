//! Incremental JSON array writer
//!
//! No grouping and no buffering: each record serializes independently as one
//! element of a top-level array, written bracket, comma-separated elements,
//! bracket.

use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::output::{FormatError, FormatResult, SlotWriter};
use crate::{Centre, DaySlot};

#[derive(Serialize)]
struct PairRecord<'a> {
    centre: &'a Centre,
    slot: &'a DaySlot,
}

/// Streaming JSON writer.
pub struct JsonWriter<W: Write> {
    sink: W,
    had_first_record: bool,
    records_written: u64,
}

impl<W: Write> JsonWriter<W> {
    /// Create a writer over a sink.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            had_first_record: false,
            records_written: 0,
        }
    }

    /// Records emitted so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}

impl<W: Write> SlotWriter for JsonWriter<W> {
    fn start(&mut self) -> FormatResult<()> {
        self.sink
            .write_all(b"[")
            .map_err(|e| FormatError::Io(e.to_string()))
    }

    fn write(&mut self, centre: &Centre, slot: &DaySlot) -> FormatResult<()> {
        if self.had_first_record {
            self.sink
                .write_all(b",")
                .map_err(|e| FormatError::Io(e.to_string()))?;
        } else {
            self.had_first_record = true;
        }
        serde_json::to_writer(&mut self.sink, &PairRecord { centre, slot })
            .map_err(|e| FormatError::Serialization(e.to_string()))?;
        self.records_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> FormatResult<()> {
        self.sink
            .write_all(b"]")
            .map_err(|e| FormatError::Io(e.to_string()))?;
        self.sink
            .flush()
            .map_err(|e| FormatError::Io(e.to_string()))?;
        debug!(records = self.records_written, "JSON output complete");
        Ok(())
    }
}
