/// Key under which the whole event collection is persisted.
pub const COLLECTION_KEY: &str = "calendarEvents";

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Default timeline granularity (96 slots per day).
pub const DEFAULT_SLOT_MINUTES: u32 = 15;

pub const DEFAULT_DURATION_MINS: u32 = 60;

pub const DEFAULT_EVENT_TITLE: &str = "My New Event";

/// New events start at "now" rounded up to this many minutes.
pub const DEFAULT_START_ROUNDING_MINS: u32 = 5;
