//! Typed output columns
//!
//! A column is a field selector, a display label and an aggregation flag.
//! Aggregating columns union their values across consecutive records that
//! share the identity key; the identity key is the value list of the
//! non-aggregating columns only.

use crate::output::OutputFormat;
use crate::{wire_time, Centre, DaySlot};

/// Field selector resolved against a `(centre, slot)` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Centre identity
    CentreId,
    /// County display name
    CentreCountyName,
    /// Locality display name
    CentreLocalityName,
    /// Centre display name
    CentreName,
    /// Street address, empty when the listing omits it
    CentreAddress,
    /// Slot start as `YYYY-MM-DD HH:MM:SS`
    SlotStartTime,
    /// Slot start date as `YYYY-MM-DD`
    SlotStartDate,
    /// Slot end as `YYYY-MM-DD HH:MM:SS`
    SlotEndTime,
    /// Remaining places in the slot
    SlotAvailablePlaces,
}

impl Field {
    /// Extract this field's rendered value from a record.
    pub fn extract(self, centre: &Centre, slot: &DaySlot) -> String {
        match self {
            Field::CentreId => centre.id.to_string(),
            Field::CentreCountyName => centre.county_name.clone(),
            Field::CentreLocalityName => centre.locality_name.clone(),
            Field::CentreName => centre.name.clone(),
            Field::CentreAddress => centre.address.clone().unwrap_or_default(),
            Field::SlotStartTime => slot
                .start_time
                .format(wire_time::DISPLAY_FORMAT)
                .to_string(),
            Field::SlotStartDate => slot.start_time.format(wire_time::DATE_FORMAT).to_string(),
            Field::SlotEndTime => slot.end_time.format(wire_time::DISPLAY_FORMAT).to_string(),
            Field::SlotAvailablePlaces => slot.available_places.to_string(),
        }
    }
}

/// One output column.
#[derive(Debug, Clone)]
pub struct Column {
    /// Field this column renders
    pub field: Field,
    /// Header label
    pub label: String,
    /// Whether values merge into a set across a group instead of keying it
    pub aggregate: bool,
}

impl Column {
    /// Plain column; its value is part of the identity key.
    pub fn new(field: Field, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            aggregate: false,
        }
    }

    /// Aggregating column; values union across the group.
    pub fn aggregated(field: Field, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            aggregate: true,
        }
    }
}

fn centre_columns() -> Vec<Column> {
    vec![
        Column::new(Field::CentreCountyName, "Județ"),
        Column::new(Field::CentreLocalityName, "Localitate"),
        Column::new(Field::CentreName, "Centru"),
        Column::new(Field::CentreAddress, "Adresă centru"),
    ]
}

/// Column preset for a CSV output format. Empty for JSON, which serializes
/// whole records instead of columns.
pub fn preset(format: OutputFormat) -> Vec<Column> {
    match format {
        OutputFormat::Csv => {
            let mut columns = centre_columns();
            columns.push(Column::new(Field::SlotStartTime, "Dată și oră"));
            columns
        }
        OutputFormat::CsvByCentre => {
            let mut columns = centre_columns();
            columns.push(Column::aggregated(Field::SlotStartDate, "Date disponibile"));
            columns
        }
        OutputFormat::CsvByDate => {
            let mut columns = centre_columns();
            columns.push(Column::new(Field::SlotStartDate, "Dată"));
            columns
        }
        OutputFormat::Json => Vec::new(),
    }
}
