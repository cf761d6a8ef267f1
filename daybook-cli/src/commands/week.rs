use anyhow::Result;
use chrono::NaiveDate;
use daybook_core::date_range::group_by_day;
use daybook_core::{DaySpan, EventStore, KeyValueStore};
use owo_colors::OwoColorize;

use crate::render::{Render, day_header};

pub fn run<B: KeyValueStore>(store: &EventStore<B>, date: NaiveDate) -> Result<()> {
    let week = DaySpan::week_of(date);
    let events = store.query_span(week);
    let dates = week.dates();

    for (i, (day, day_events)) in dates.iter().zip(group_by_day(&dates, &events)).enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", day_header(*day, day_events.len()));

        if day_events.is_empty() {
            println!("  {}", "-".dimmed());
        }
        for event in &day_events {
            println!("  {}", event.render());
        }
    }

    Ok(())
}
