//! Calendar event types.
//!
//! `Event` is the persisted record. Callers never build one directly: they
//! describe the event as a `PendingEvent` and the store assigns the id.
//! Partial edits travel as an `EventUpdate`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::DaybookConfig;
use crate::error::{DaybookError, DaybookResult};
use crate::start_date::StartDate;

/// A calendar event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    /// Attendee names, in the order they were added. Duplicates are allowed.
    pub attendees: Vec<String>,
    pub start_date: StartDate,
    pub duration_mins: u32,
    pub video_type: VideoType,
}

/// An event that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEvent {
    pub title: String,
    pub attendees: Vec<String>,
    pub start_date: StartDate,
    pub duration_mins: u32,
    pub video_type: VideoType,
}

/// A shallow partial update. Present fields replace the stored value
/// wholesale; `attendees` replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<StartDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_mins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_type: Option<VideoType>,
}

/// Video conferencing attached to an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[default]
    None,
    Zoom,
    Meet,
}

impl Event {
    pub(crate) fn from_pending(id: String, pending: PendingEvent) -> Self {
        Event {
            id,
            title: pending.title,
            attendees: pending.attendees,
            start_date: pending.start_date,
            duration_mins: pending.duration_mins,
            video_type: pending.video_type,
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start_date.end_after(self.duration_mins)
    }

    /// The event without its id.
    pub fn to_pending(&self) -> PendingEvent {
        PendingEvent {
            title: self.title.clone(),
            attendees: self.attendees.clone(),
            start_date: self.start_date,
            duration_mins: self.duration_mins,
            video_type: self.video_type,
        }
    }

    /// Apply a partial update on top of this event. The id never changes.
    pub(crate) fn merged(&self, update: EventUpdate) -> Event {
        Event {
            id: self.id.clone(),
            title: update.title.unwrap_or_else(|| self.title.clone()),
            attendees: update.attendees.unwrap_or_else(|| self.attendees.clone()),
            start_date: update.start_date.unwrap_or(self.start_date),
            duration_mins: update.duration_mins.unwrap_or(self.duration_mins),
            video_type: update.video_type.unwrap_or(self.video_type),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl PendingEvent {
    pub fn new(title: impl Into<String>, start_date: StartDate, duration_mins: u32) -> Self {
        PendingEvent {
            title: title.into(),
            attendees: Vec::new(),
            start_date,
            duration_mins,
            video_type: VideoType::None,
        }
    }

    /// The blank event offered by "add event": default title and duration,
    /// starting at `now` rounded up to the configured boundary.
    pub fn starting_at(now: NaiveDateTime, config: &DaybookConfig) -> Self {
        PendingEvent::new(
            config.default_title.clone(),
            StartDate::rounded_up(now, config.start_rounding_mins),
            config.default_duration_mins,
        )
    }
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self == &EventUpdate::default()
    }
}

/// Reject durations that would give an event no extent on the timeline.
pub(crate) fn validate_duration(duration_mins: u32) -> DaybookResult<u32> {
    if duration_mins == 0 {
        return Err(DaybookError::InvalidDuration(duration_mins));
    }
    Ok(duration_mins)
}

impl VideoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoType::None => "none",
            VideoType::Zoom => "zoom",
            VideoType::Meet => "meet",
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(VideoType::None),
            "zoom" => Ok(VideoType::Zoom),
            "meet" => Ok(VideoType::Meet),
            other => Err(format!(
                "Unknown video type '{}'. Expected none, zoom or meet",
                other
            )),
        }
    }
}
