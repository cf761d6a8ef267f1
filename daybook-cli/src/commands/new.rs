use anyhow::Result;
use chrono::Local;
use daybook_core::{DaybookConfig, EventStore, KeyValueStore, PendingEvent, VideoType};
use owo_colors::OwoColorize;

use crate::parse::{parse_duration, parse_start};
use crate::render::Render;

pub struct NewArgs {
    pub title: Option<String>,
    pub start: Option<String>,
    pub duration: Option<String>,
    pub attendees: Vec<String>,
    pub video: Option<VideoType>,
}

pub fn run<B: KeyValueStore>(
    store: &mut EventStore<B>,
    config: &DaybookConfig,
    args: NewArgs,
) -> Result<()> {
    let mut pending = PendingEvent::starting_at(Local::now().naive_local(), config);

    if let Some(title) = args.title {
        pending.title = title;
    }
    if let Some(start) = args.start {
        pending.start_date = parse_start(&start)?;
    }
    if let Some(duration) = args.duration {
        pending.duration_mins = parse_duration(&duration)?;
    }
    if let Some(video) = args.video {
        pending.video_type = video;
    }
    pending.attendees = args.attendees;

    let event = store.create(pending)?;

    println!("{}", format!("  Created: {}", event.title).green());
    println!("  {} {}", event.start_date.date().format("%a %b %-d"), event.render());
    println!("  {}", format!("id: {}", event.id).dimmed());

    Ok(())
}
