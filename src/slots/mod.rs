//! Slot records and the date-window filter

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::DateWindow;

/// One bookable appointment as returned by the availability endpoint.
///
/// Timestamps stay verbatim text; they are parsed only to decide whether the
/// slot falls inside the window, and reported exactly as received. Fields the
/// API sends beyond these two are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRecord {
    #[serde(default)]
    pub from: String,

    #[serde(default)]
    pub till: String,
}

/// Parse an ISO 8601 local datetime like `2025-02-21T10:00:00`.
/// The API sometimes omits seconds, so `2025-02-21T10:00` is accepted too.
fn parse_slot_datetime(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Keep the slots whose start time lies inside the window, both ends
/// inclusive. Slots with an unparseable start time are dropped silently;
/// input order is preserved and nothing is deduplicated.
pub fn filter_slots(slots: Vec<SlotRecord>, window: &DateWindow) -> Vec<SlotRecord> {
    slots
        .into_iter()
        .filter(|slot| match parse_slot_datetime(&slot.from) {
            Some(start) => window.contains(start),
            None => {
                log::debug!("Dropping slot with unparseable start time: {:?}", slot.from);
                false
            }
        })
        .collect()
}
