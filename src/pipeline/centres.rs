//! Paged centre listing
//!
//! Explicit cursor state machine over the paginated listing endpoint. Pages
//! are fetched on demand: the next page is not requested before the current
//! one is drained, and the first centre is yielded before any further page
//! exists in memory.

use std::collections::VecDeque;
use tracing::debug;

use crate::api::SchedulingApi;
use crate::session::{SessionError, SessionResult};
use crate::Centre;

/// Guard against a server that never marks a page as last.
const MAX_PAGES: u32 = 10_000;

/// Lazy producer of centres in server order (county, locality, name).
pub struct CentrePager {
    api: SchedulingApi,
    county_id: Option<i64>,
    page_size: u32,
    page: u32,
    buffer: VecDeque<Centre>,
    done: bool,
}

impl CentrePager {
    pub(crate) fn new(api: SchedulingApi, county_id: Option<i64>, page_size: u32) -> Self {
        Self {
            api,
            county_id,
            page_size,
            page: 0,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Next centre, fetching the next page only when the buffer runs dry.
    pub async fn next(&mut self) -> SessionResult<Option<Centre>> {
        loop {
            if let Some(centre) = self.buffer.pop_front() {
                return Ok(Some(centre));
            }
            if self.done {
                return Ok(None);
            }
            if self.page >= MAX_PAGES {
                return Err(SessionError::Http(format!(
                    "centre listing exceeded {MAX_PAGES} pages without a last marker"
                )));
            }

            let page = self
                .api
                .centres_page(self.county_id, self.page, self.page_size)
                .await?;
            debug!(
                page = self.page,
                count = page.content.len(),
                last = page.last,
                "fetched centre listing page"
            );
            self.page += 1;
            self.done = page.last;
            self.buffer.extend(page.content);
        }
    }
}
