//! Month-to-day-to-slot expansion for one centre
//!
//! For each month offset from today, requests the month's day-level
//! availability, then the slot list of every day with open places, yielding
//! only slots that still have capacity. Cursor state is one month offset, the
//! pending days of the current month and the pending slots of the current day.

use chrono::{Local, Months, NaiveDateTime, NaiveTime};
use std::collections::VecDeque;
use tracing::debug;

use crate::api::SchedulingApi;
use crate::session::{SessionError, SessionResult};
use crate::{wire_time, DayAvailability, DaySlot};

/// Lazy producer of open slots at one centre.
pub struct AvailabilityExpansion {
    api: SchedulingApi,
    centre_id: i64,
    months_to_check: u32,
    month_offset: u32,
    /// Today at midnight. Normalized so repeated runs within the same day
    /// produce identical request payloads and therefore hit the cache.
    base: NaiveDateTime,
    days: VecDeque<DayAvailability>,
    slots: VecDeque<DaySlot>,
}

impl AvailabilityExpansion {
    pub(crate) fn new(api: SchedulingApi, centre_id: i64, months_to_check: u32) -> Self {
        Self::with_base(
            api,
            centre_id,
            months_to_check,
            Local::now().date_naive().and_time(NaiveTime::MIN),
        )
    }

    /// Expansion anchored at an explicit base day, for deterministic tests.
    pub fn with_base(
        api: SchedulingApi,
        centre_id: i64,
        months_to_check: u32,
        base: NaiveDateTime,
    ) -> Self {
        Self {
            api,
            centre_id,
            months_to_check,
            month_offset: 0,
            base,
            days: VecDeque::new(),
            slots: VecDeque::new(),
        }
    }

    /// Next open slot, advancing through days and months as needed.
    pub async fn next(&mut self) -> SessionResult<Option<DaySlot>> {
        loop {
            if let Some(slot) = self.slots.pop_front() {
                return Ok(Some(slot));
            }

            if let Some(day) = self.days.pop_front() {
                let slots = self.api.day_slots(self.centre_id, &day.start_time).await?;
                self.slots
                    .extend(slots.into_iter().filter(|s| s.available_places > 0));
                continue;
            }

            if self.month_offset >= self.months_to_check {
                return Ok(None);
            }
            let current = self
                .base
                .checked_add_months(Months::new(self.month_offset))
                .ok_or_else(|| {
                    SessionError::Http(format!(
                        "month offset {} overflows the calendar",
                        self.month_offset
                    ))
                })?;
            self.month_offset += 1;

            let current_date = wire_time::format_wire(&current);
            let days = self
                .api
                .month_availability(self.centre_id, &current_date)
                .await?;
            let open = days
                .into_iter()
                .filter(|d| d.available_places > 0)
                .collect::<Vec<_>>();
            debug!(
                centre_id = self.centre_id,
                month = %current_date,
                open_days = open.len(),
                "expanded month availability"
            );
            self.days.extend(open);
        }
    }
}
