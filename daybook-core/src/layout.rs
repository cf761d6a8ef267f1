//! Timeline layout for a single day.
//!
//! The day is divided into fixed-size slots (15 minutes by default). Each
//! event gets a vertical position and height in slot units, and a horizontal
//! width and offset chosen so events whose times overlap sit side by side.
//!
//! Horizontal placement is greedy: an event is sized by the busiest slot it
//! occupies, and its offset is compressed toward the left, then nudged right
//! by half a column for each already-placed sibling sitting at the same
//! offset. Two overlapping events never coincide; three or more can.

use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::config::DaybookConfig;
use crate::constants::{DEFAULT_SLOT_MINUTES, MINUTES_PER_DAY};
use crate::error::{DaybookError, DaybookResult};
use crate::event::Event;
use crate::start_date::StartDate;

const FULL_WIDTH: f64 = 100.0;

/// Offsets closer than this are the same column.
const OFFSET_TOLERANCE: f64 = 1e-9;

/// Where an event is drawn on the day timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Start, in slots since midnight (may be fractional)
    pub slot_position: f64,
    /// Duration, in slots
    pub slot_height: f64,
    pub width_percent: f64,
    pub left_offset_percent: f64,
}

impl Placement {
    /// Slot indices the event occupies: from the slot containing its start,
    /// at least one slot long.
    pub fn occupied_slots(&self) -> Range<usize> {
        occupied_slots(self.slot_position, self.slot_height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPlacement {
    pub id: String,
    #[serde(flatten)]
    pub placement: Placement,
}

/// Placements for one day, in the order the events were given.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DayLayout {
    entries: Vec<EventPlacement>,
}

impl DayLayout {
    pub fn get(&self, id: &str) -> Option<&Placement> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.placement)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventPlacement> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Slot geometry for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    slot_minutes: u32,
}

impl Default for Timeline {
    fn default() -> Self {
        Timeline {
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

impl Timeline {
    /// A timeline of `slot_minutes`-long slots. The slot length must divide a
    /// day evenly.
    pub fn new(slot_minutes: u32) -> DaybookResult<Self> {
        if slot_minutes == 0 || MINUTES_PER_DAY % slot_minutes != 0 {
            return Err(DaybookError::InvalidGranularity(slot_minutes));
        }
        Ok(Timeline { slot_minutes })
    }

    pub fn from_config(config: &DaybookConfig) -> DaybookResult<Self> {
        Self::new(config.slot_minutes)
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    pub fn slots_per_day(&self) -> usize {
        (MINUTES_PER_DAY / self.slot_minutes) as usize
    }

    pub fn slot_position(&self, start: &StartDate) -> f64 {
        f64::from(start.minutes_since_midnight()) / f64::from(self.slot_minutes)
    }

    pub fn slot_height(&self, duration_mins: u32) -> f64 {
        f64::from(duration_mins) / f64::from(self.slot_minutes)
    }

    /// Place every event of a single day. Only the time of day of each start
    /// is used; callers pass events already filtered to one date.
    pub fn layout(&self, events: &[Event]) -> DayLayout {
        let slots = self.slots_per_day();
        let mut occupancy: Vec<Vec<usize>> = vec![Vec::new(); slots];

        let geometry: Vec<(f64, f64)> = events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let position = self.slot_position(&event.start_date);
                let height = self.slot_height(event.duration_mins);

                // Events running past midnight are cut at the last slot
                let range = occupied_slots(position, height);
                for slot in range.start..range.end.min(slots) {
                    occupancy[slot].push(index);
                }

                (position, height)
            })
            .collect();

        let mut offsets: Vec<Option<f64>> = vec![None; events.len()];
        let mut entries = Vec::with_capacity(events.len());

        for (index, event) in events.iter().enumerate() {
            let (siblings, position_index) = sibling_context(index, &occupancy);
            let (width, left) = horizontal_placement(siblings, position_index, &offsets);
            offsets[index] = Some(left);

            let (slot_position, slot_height) = geometry[index];
            entries.push(EventPlacement {
                id: event.id.clone(),
                placement: Placement {
                    slot_position,
                    slot_height,
                    width_percent: width,
                    left_offset_percent: left,
                },
            });
        }

        debug!(events = entries.len(), slot_minutes = self.slot_minutes, "Computed day layout");
        DayLayout { entries }
    }
}

/// Lay out a day on the default 15-minute timeline.
pub fn layout_day(events: &[Event]) -> DayLayout {
    Timeline::default().layout(events)
}

fn occupied_slots(position: f64, height: f64) -> Range<usize> {
    let first = position.floor() as usize;
    let count = (height.ceil() as usize).max(1);
    first..first + count
}

/// The busiest slot `index` occupies (earliest wins ties): its occupants and
/// the event's position among them.
fn sibling_context(index: usize, occupancy: &[Vec<usize>]) -> (&[usize], usize) {
    let mut siblings: &[usize] = &[];
    let mut position_index = 0;

    for occupants in occupancy {
        if occupants.len() <= siblings.len() {
            continue;
        }
        if let Some(position) = occupants.iter().position(|&o| o == index) {
            siblings = occupants;
            position_index = position;
        }
    }

    (siblings, position_index)
}

/// Width and left offset, in percent of the day column.
fn horizontal_placement(
    siblings: &[usize],
    position_index: usize,
    offsets: &[Option<f64>],
) -> (f64, f64) {
    let count = siblings.len();
    if count <= 1 {
        return (FULL_WIDTH, 0.0);
    }

    let width = FULL_WIDTH / count as f64;
    if position_index == 0 {
        return (width, 0.0);
    }

    let p = position_index as f64;
    let mut left = width * p - (width / 2.0) * p;

    for &sibling in siblings {
        if let Some(taken) = offsets[sibling] {
            if (taken - left).abs() < OFFSET_TOLERANCE {
                left += width / 2.0;
            }
        }
    }

    (width, left)
}
