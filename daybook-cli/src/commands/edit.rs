use anyhow::Result;
use daybook_core::{EventStore, EventUpdate, KeyValueStore, VideoType};
use owo_colors::OwoColorize;

use crate::parse::{parse_duration, parse_start};
use crate::render::Render;

pub struct EditArgs {
    pub title: Option<String>,
    pub start: Option<String>,
    pub duration: Option<String>,
    pub attendees: Vec<String>,
    pub clear_attendees: bool,
    pub video: Option<VideoType>,
}

pub fn run<B: KeyValueStore>(store: &mut EventStore<B>, id: &str, args: EditArgs) -> Result<()> {
    let update = EventUpdate {
        title: args.title,
        attendees: if args.clear_attendees {
            Some(Vec::new())
        } else if args.attendees.is_empty() {
            None
        } else {
            Some(args.attendees)
        },
        start_date: args.start.as_deref().map(parse_start).transpose()?,
        duration_mins: args.duration.as_deref().map(parse_duration).transpose()?,
        video_type: args.video,
    };

    if update.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one of --title, --start, --duration, --attendee, --clear-attendees or --video");
    }

    if !store.update(id, update)? {
        println!("{}", format!("  No event with id {}", id).yellow());
        return Ok(());
    }

    if let Some(event) = store.get(id) {
        println!("{}", format!("  Updated: {}", event.title).green());
        println!("  {} {}", event.start_date.date().format("%a %b %-d"), event.render());
    }

    Ok(())
}
