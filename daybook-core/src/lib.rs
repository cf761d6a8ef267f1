//! Core of the daybook calendar.
//!
//! - `store`: the start-date-sorted event collection and its key-value backends
//! - `layout`: placement of a day's events on the slot timeline
//! - `date_range`: whole-day spans and per-day grouping for week views

pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod layout;
pub mod start_date;
pub mod store;

pub use crate::config::DaybookConfig;
pub use crate::date_range::DaySpan;
pub use crate::error::{DaybookError, DaybookResult};
pub use crate::event::{Event, EventUpdate, PendingEvent, VideoType};
pub use crate::layout::{DayLayout, Placement, Timeline, layout_day};
pub use crate::start_date::StartDate;
pub use crate::store::{EventStore, FileBackend, KeyValueStore, MemoryBackend};
