use anyhow::Result;
use chrono::NaiveDate;
use daybook_core::{DaybookConfig, EventStore, KeyValueStore, Timeline};
use owo_colors::OwoColorize;

use crate::render::{Render, day_header};

pub fn run<B: KeyValueStore>(
    store: &EventStore<B>,
    config: &DaybookConfig,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    let events = store.query(date, date);
    let layout = Timeline::from_config(config)?.layout(&events);

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    println!("{}", day_header(date, events.len()));

    if events.is_empty() {
        println!("  {}", "No events".dimmed());
        return Ok(());
    }

    for event in &events {
        let lane = layout
            .get(&event.id)
            .map(|placement| placement.render())
            .unwrap_or_default();
        println!("  {} {} {}", lane.dimmed(), event.render(), event.id.dimmed());
    }

    Ok(())
}
