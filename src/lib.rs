//! # Vaccinare Slots
//!
//! Library for polling the Romanian COVID-19 vaccination scheduling API for
//! appointment availability across service centres and emitting the results as
//! structured CSV/JSON reports.
//!
//! The interesting part is not the domain but the acquisition pipeline:
//!
//! - **Resilient access layer**: a session-cookie-authenticated HTTP client
//!   composing a content-addressed response cache, request pacing and a retry
//!   policy with a stale-cache fallback tier ([`session`])
//! - **Lazy enumeration**: paged centre listing expanded month-by-month into
//!   day slots, yielded as one ordered stream of `(Centre, DaySlot)` pairs
//!   without materializing the result set ([`pipeline`])
//! - **Streaming aggregation**: run-length grouping of contiguous records into
//!   output rows, written incrementally ([`output`])
//!
//! ## Quick start
//!
//! ```no_run
//! use vaccinare_slots::api::{self, SchedulingApi};
//! use vaccinare_slots::session::{HttpSession, SessionConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = HttpSession::new(api::vaccinare_config(), SessionConfig::default());
//! let api = SchedulingApi::new(Arc::new(session));
//!
//! let mut slots = api.available_slots_for_all_centres(2);
//! while let Some((centre, slot)) = slots.next().await? {
//!     println!("{} {} {}", centre.county_name, centre.name, slot.start_time);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Typed client for the upstream scheduling API
pub mod api;

/// CLI command implementations
pub mod cli;

/// Output writers (aggregating CSV, incremental JSON)
pub mod output;

/// Lazy centre/slot enumeration pipeline
pub mod pipeline;

/// Resilient HTTP access layer (cache, pacing, retries)
pub mod session;

/// Upload collaborator boundary
pub mod upload;

/// Serde adapter for the upstream timestamp encoding.
///
/// The API emits local timestamps as `%d-%m-%Y %H:%M:%S%.f`
/// (e.g. `09-02-2021 19:00:00.000000`). Values serialize back out in the
/// report-facing `%Y-%m-%d %H:%M:%S` form, which is what both the CSV and the
/// JSON output formats render.
pub mod wire_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Timestamp format used by the upstream API.
    pub const WIRE_FORMAT: &str = "%d-%m-%Y %H:%M:%S%.f";

    /// Timestamp format used in generated reports.
    pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Date-only format used in generated reports.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Render a timestamp in the upstream wire format.
    ///
    /// The fractional part is kept at a fixed six digits so the same instant
    /// always renders identically, which keeps request cache keys stable.
    pub fn format_wire(value: &NaiveDateTime) -> String {
        value.format("%d-%m-%Y %H:%M:%S%.6f").to_string()
    }

    /// Parse an upstream timestamp, tolerating a missing fractional part.
    pub fn parse(raw: &str) -> chrono::ParseResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, WIRE_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%d-%m-%Y %H:%M:%S"))
    }

    /// Serialize in the report-facing format.
    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(DISPLAY_FORMAT))
    }

    /// Deserialize from the upstream wire format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A vaccination centre as returned by the paginated listing endpoint.
///
/// Immutable once fetched. The server returns centres sorted by county,
/// locality and name; that ordering must be preserved end to end because the
/// aggregating CSV writer groups by run-length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Centre {
    /// Centre identity
    pub id: i64,
    /// Centre display name
    pub name: String,
    /// Internal centre code
    #[serde(default)]
    pub code: Option<String>,
    /// County identity
    #[serde(rename = "countyID", default)]
    pub county_id: Option<i64>,
    /// County display name
    pub county_name: String,
    /// Locality identity
    #[serde(rename = "localityID", default)]
    pub locality_id: Option<i64>,
    /// Locality display name
    pub locality_name: String,
    /// Street address
    #[serde(default)]
    pub address: Option<String>,
    /// Remaining capacity as reported by the listing
    #[serde(default)]
    pub available_slots: i64,
}

/// One page of the centre listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CentrePage {
    /// Centres on this page, in server order
    pub content: Vec<Centre>,
    /// Whether this is the final page
    pub last: bool,
}

/// Month-level availability for one day at one centre.
///
/// `start_time` stays the raw wire string because it is passed back verbatim
/// as the `currentDate` of the follow-up day-slots request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    /// Day reference in the upstream wire format
    pub start_time: String,
    /// Remaining places on that day
    #[serde(default)]
    pub available_places: i64,
}

/// A bookable time interval at a centre with remaining capacity.
///
/// Transient: slots exist only inside the enumeration stream and are never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    /// Owning centre identity
    #[serde(rename = "centerID", default)]
    pub center_id: Option<i64>,
    /// Interval start (local time)
    #[serde(with = "wire_time")]
    pub start_time: NaiveDateTime,
    /// Interval end (local time)
    #[serde(with = "wire_time")]
    pub end_time: NaiveDateTime,
    /// Remaining places in this interval
    #[serde(default)]
    pub available_places: i64,
}
