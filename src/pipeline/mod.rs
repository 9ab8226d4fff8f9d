//! Lazy centre/slot enumeration
//!
//! Three composed pull-based producers: the paged centre listing, the
//! month-to-slot expansion of one centre, and the top-level composition that
//! fully drains one centre before advancing to the next. Never holds more
//! than one centre's pending slots in memory.
//!
//! Any [`SessionError`](crate::session::SessionError) from the underlying
//! session propagates uncaught through all three stages: one permanent
//! failure aborts the entire enumeration.

use futures_util::stream::{self, Stream};
use std::pin::Pin;

use crate::api::SchedulingApi;
use crate::session::SessionResult;
use crate::{Centre, DaySlot};

mod availability;
mod centres;

pub use availability::AvailabilityExpansion;
pub use centres::CentrePager;

/// Boxed stream of `(centre, slot)` pairs.
pub type SlotStream = Pin<Box<dyn Stream<Item = SessionResult<(Centre, DaySlot)>> + Send>>;

/// Composition of the centre listing with per-centre slot expansion.
///
/// Ordering invariant the formatter depends on: all slots for one centre are
/// contiguous, and centres appear in server order.
pub struct SlotEnumerator {
    pager: CentrePager,
    api: SchedulingApi,
    months_to_check: u32,
    current: Option<(Centre, AvailabilityExpansion)>,
}

impl SlotEnumerator {
    pub(crate) fn new(pager: CentrePager, api: SchedulingApi, months_to_check: u32) -> Self {
        Self {
            pager,
            api,
            months_to_check,
            current: None,
        }
    }

    /// Next `(centre, slot)` pair, or `None` once every centre is drained.
    pub async fn next(&mut self) -> SessionResult<Option<(Centre, DaySlot)>> {
        loop {
            if let Some((centre, expansion)) = &mut self.current {
                if let Some(slot) = expansion.next().await? {
                    return Ok(Some((centre.clone(), slot)));
                }
                self.current = None;
            }

            match self.pager.next().await? {
                Some(centre) => {
                    let expansion = self.api.available_slots(centre.id, self.months_to_check);
                    self.current = Some((centre, expansion));
                }
                None => return Ok(None),
            }
        }
    }

    /// Adapt the enumerator into a boxed [`Stream`].
    pub fn into_stream(self) -> SlotStream {
        Box::pin(stream::try_unfold(self, |mut this| async move {
            let item = this.next().await?;
            Ok(item.map(|pair| (pair, this)))
        }))
    }
}
