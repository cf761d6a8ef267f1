use anyhow::Result;
use daybook_core::{EventStore, KeyValueStore};
use owo_colors::OwoColorize;

pub fn run<B: KeyValueStore>(store: &mut EventStore<B>, id: &str) -> Result<()> {
    let title = store.get(id).map(|e| e.title.clone());

    match (store.delete(id)?, title) {
        (true, Some(title)) => println!("{}", format!("  Deleted: {}", title).red()),
        _ => println!("{}", format!("  No event with id {}", id).yellow()),
    }

    Ok(())
}
