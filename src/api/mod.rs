//! Typed client for the upstream scheduling API
//!
//! Thin wrappers mapping the four upstream endpoints onto the resilient
//! session, plus constructors for the lazy enumeration pipeline.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::pipeline::{AvailabilityExpansion, CentrePager, SlotEnumerator};
use crate::session::{HttpSession, SessionResult};
use crate::{CentrePage, DayAvailability, DaySlot};

mod config;

pub use config::{vaccinare_config, ApiConfig};

/// Listing page size. The centre listing is small enough that one page
/// normally covers it; the pager still follows `last` markers.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Typed access to the scheduling endpoints over one [`HttpSession`].
#[derive(Clone)]
pub struct SchedulingApi {
    session: Arc<HttpSession>,
}

impl SchedulingApi {
    /// Wrap a session.
    pub fn new(session: Arc<HttpSession>) -> Self {
        Self { session }
    }

    /// The underlying session.
    pub fn session(&self) -> &Arc<HttpSession> {
        &self.session
    }

    /// County listing, passed through as raw JSON.
    pub async fn counties(&self) -> SessionResult<Value> {
        let path = self.session.api().counties_endpoint.clone();
        self.session.get(&path).await
    }

    /// One page of the centre listing, sorted by county, locality and name.
    pub async fn centres_page(
        &self,
        county_id: Option<i64>,
        page: u32,
        size: u32,
    ) -> SessionResult<CentrePage> {
        let api = self.session.api();
        let path = format!(
            "{}?page={}&size={}&sort={}",
            api.centres_endpoint, page, size, api.centres_sort
        );
        let body = json!({
            "countyID": county_id,
            "localityID": null,
            "name": null,
        });
        let value = self.session.post(&path, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Day-level availability counts for the month containing `current_date`
    /// (a timestamp in the upstream wire format).
    pub async fn month_availability(
        &self,
        centre_id: i64,
        current_date: &str,
    ) -> SessionResult<Vec<DayAvailability>> {
        let path = self
            .session
            .api()
            .monthly_availability_endpoint
            .clone();
        let body = booking_query(centre_id, current_date);
        let value = self.session.post(&path, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Slot listing for one day at one centre.
    pub async fn day_slots(
        &self,
        centre_id: i64,
        current_date: &str,
    ) -> SessionResult<Vec<DaySlot>> {
        let path = self.session.api().day_slots_endpoint.clone();
        let body = booking_query(centre_id, current_date);
        let value = self.session.post(&path, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Lazily enumerate the centre listing in server order.
    pub fn centres(&self, county_id: Option<i64>, page_size: u32) -> CentrePager {
        CentrePager::new(self.clone(), county_id, page_size)
    }

    /// Lazily enumerate open slots at one centre over the next
    /// `months_to_check` months.
    pub fn available_slots(&self, centre_id: i64, months_to_check: u32) -> AvailabilityExpansion {
        AvailabilityExpansion::new(self.clone(), centre_id, months_to_check)
    }

    /// Lazily enumerate `(centre, slot)` pairs for every centre, all slots of
    /// one centre contiguous in the output.
    pub fn available_slots_for_all_centres(&self, months_to_check: u32) -> SlotEnumerator {
        SlotEnumerator::new(
            self.centres(None, DEFAULT_PAGE_SIZE),
            self.clone(),
            months_to_check,
        )
    }
}

fn booking_query(centre_id: i64, current_date: &str) -> Value {
    json!({
        "centerID": centre_id,
        "currentDate": current_date,
        "forBooster": false,
    })
}
