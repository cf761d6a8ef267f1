//! Terminal rendering for daybook types.

use chrono::{Local, NaiveDate};
use daybook_core::date_range::count_badge;
use daybook_core::{Event, Placement, VideoType};
use owo_colors::OwoColorize;

/// Characters used to draw the full width of a day column.
const LANE_WIDTH: usize = 20;

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!(
            "{:>7} {} {}",
            self.start_date.time_label(),
            self.title,
            format!("({})", format_duration(self.duration_mins)).dimmed()
        );

        if !self.attendees.is_empty() {
            line.push_str(&format!(" {}", format!("with {}", self.attendees.join(", ")).cyan()));
        }
        if self.video_type != VideoType::None {
            line.push_str(&format!(" {}", format!("[{}]", self.video_type).magenta()));
        }

        line
    }
}

impl Render for Placement {
    /// The event's lane within the day column, e.g. `|     ##########     |`.
    fn render(&self) -> String {
        let to_cells = |percent: f64| ((percent / 100.0) * LANE_WIDTH as f64).round() as usize;

        let left = to_cells(self.left_offset_percent).min(LANE_WIDTH);
        let width = to_cells(self.width_percent).clamp(1, LANE_WIDTH - left.min(LANE_WIDTH - 1));
        let right = LANE_WIDTH.saturating_sub(left + width);

        format!("|{}{}{}|", " ".repeat(left), "#".repeat(width), " ".repeat(right))
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(date: NaiveDate) -> String {
    let today = Local::now().date_naive();

    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Day header with its event-count badge.
pub fn day_header(date: NaiveDate, count: usize) -> String {
    let label = format_date_label(date);
    if count == 0 {
        format!("{}", label.bold())
    } else {
        format!("{} {}", label.bold(), format!("({})", count_badge(count)).green())
    }
}

fn format_duration(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}
