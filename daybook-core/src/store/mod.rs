//! The event store: a start-date-sorted event collection persisted to a
//! key-value backend.
//!
//! Every mutation builds the new collection, writes it to the backend, and
//! only then replaces the in-memory copy. A failed write leaves the store
//! exactly as it was.

mod backend;

pub use backend::{FileBackend, KeyValueStore, MemoryBackend};

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constants::COLLECTION_KEY;
use crate::date_range::DaySpan;
use crate::error::DaybookResult;
use crate::event::{Event, EventUpdate, PendingEvent, validate_duration};

pub struct EventStore<B: KeyValueStore> {
    backend: B,
    events: Vec<Event>,
}

impl<B: KeyValueStore> EventStore<B> {
    /// Load the collection from `backend`. A missing key is an empty calendar.
    pub fn open(backend: B) -> DaybookResult<Self> {
        let mut events: Vec<Event> = match backend.get(COLLECTION_KEY)? {
            Some(blob) => serde_json::from_str(&blob)?,
            None => Vec::new(),
        };

        if !events.is_sorted_by(|a, b| a.start_date <= b.start_date) {
            warn!("Stored events were out of order; re-sorting by start date");
            events.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        }

        info!(count = events.len(), "Loaded events");
        Ok(EventStore { backend, events })
    }

    /// All events, ascending by start date.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Store a new event under a fresh id.
    ///
    /// Events with equal start dates keep creation order.
    pub fn create(&mut self, pending: PendingEvent) -> DaybookResult<Event> {
        validate_duration(pending.duration_mins)?;

        let event = Event::from_pending(Uuid::new_v4().to_string(), pending);

        let mut updated = self.events.clone();
        insert_sorted(&mut updated, event.clone());
        self.commit(updated)?;

        debug!(id = %event.id, start = %event.start_date, "Created event");
        Ok(event)
    }

    /// Merge `update` into the event with `id` and move it to its sorted
    /// position. Returns `false` (and writes nothing) if no such event exists.
    pub fn update(&mut self, id: &str, update: EventUpdate) -> DaybookResult<bool> {
        let Some(index) = self.position(id) else {
            debug!(id, "Update for unknown event ignored");
            return Ok(false);
        };

        if let Some(duration_mins) = update.duration_mins {
            validate_duration(duration_mins)?;
        }

        let mut updated = self.events.clone();
        let merged = updated.remove(index).merged(update);
        insert_sorted(&mut updated, merged);
        self.commit(updated)?;

        debug!(id, "Updated event");
        Ok(true)
    }

    /// Remove the event with `id`. Returns `false` if there was none.
    pub fn delete(&mut self, id: &str) -> DaybookResult<bool> {
        let Some(index) = self.position(id) else {
            debug!(id, "Delete for unknown event ignored");
            return Ok(false);
        };

        let mut updated = self.events.clone();
        updated.remove(index);
        self.commit(updated)?;

        debug!(id, "Deleted event");
        Ok(true)
    }

    /// Events starting between 00:00:00 on `from` and 23:59:59 on `to`, in
    /// start-date order.
    pub fn query(&self, from: NaiveDate, to: NaiveDate) -> Vec<Event> {
        self.query_span(DaySpan::new(from, to))
    }

    pub fn query_span(&self, span: DaySpan) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| span.contains(&e.start_date))
            .cloned()
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.events.iter().position(|e| e.id == id)
    }

    /// Persist `events`, then adopt them as the current collection.
    fn commit(&mut self, events: Vec<Event>) -> DaybookResult<()> {
        let blob = serde_json::to_string(&events)?;
        self.backend.set(COLLECTION_KEY, &blob)?;
        self.events = events;
        Ok(())
    }
}

/// Insert before the first event starting strictly later, or append.
fn insert_sorted(events: &mut Vec<Event>, event: Event) {
    let index = events.partition_point(|e| e.start_date <= event.start_date);
    events.insert(index, event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DaybookError;
    use crate::event::VideoType;
    use crate::start_date::StartDate;

    /// Backend that counts writes and can be told to fail them.
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryBackend,
        writes: usize,
        fail_writes: bool,
    }

    impl KeyValueStore for FlakyBackend {
        fn get(&self, key: &str) -> DaybookResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> DaybookResult<()> {
            if self.fail_writes {
                return Err(DaybookError::Persistence("disk full".into()));
            }
            self.writes += 1;
            self.inner.set(key, value)
        }
    }

    fn pending(title: &str, start: &str) -> PendingEvent {
        PendingEvent::new(title, StartDate::parse(start).unwrap(), 60)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn titles<B: KeyValueStore>(store: &EventStore<B>) -> Vec<&str> {
        store.events().iter().map(|e| e.title.as_str()).collect()
    }

    fn assert_sorted<B: KeyValueStore>(store: &EventStore<B>) {
        assert!(
            store
                .events()
                .windows(2)
                .all(|w| w[0].start_date <= w[1].start_date),
            "collection out of order: {:?}",
            store.events()
        );
    }

    #[test]
    fn create_inserts_in_start_order() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        store.create(pending("noon", "2025-03-20T12:00")).unwrap();
        store.create(pending("morning", "2025-03-20T08:00")).unwrap();
        store.create(pending("evening", "2025-03-20T19:00")).unwrap();
        store.create(pending("late morning", "2025-03-20T10:30")).unwrap();

        assert_eq!(titles(&store), vec!["morning", "late morning", "noon", "evening"]);
    }

    #[test]
    fn equal_starts_keep_creation_order() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        store.create(pending("first", "2025-03-20T09:00")).unwrap();
        store.create(pending("second", "2025-03-20T09:00")).unwrap();

        assert_eq!(titles(&store), vec!["first", "second"]);
    }

    #[test]
    fn create_assigns_unique_ids() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        let a = store.create(pending("a", "2025-03-20T09:00")).unwrap();
        let b = store.create(pending("b", "2025-03-20T09:00")).unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn create_rejects_zero_duration() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        let mut p = pending("a", "2025-03-20T09:00");
        p.duration_mins = 0;

        assert!(matches!(store.create(p), Err(DaybookError::InvalidDuration(0))));
        assert!(store.is_empty());
    }

    #[test]
    fn update_moves_event_when_start_changes() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        let early = store.create(pending("early", "2025-03-20T08:00")).unwrap();
        store.create(pending("mid", "2025-03-20T12:00")).unwrap();
        store.create(pending("late", "2025-03-20T18:00")).unwrap();

        let moved = store
            .update(
                &early.id,
                EventUpdate {
                    start_date: Some(StartDate::parse("2025-03-20T20:00").unwrap()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(moved);
        assert_eq!(titles(&store), vec!["mid", "late", "early"]);
        assert_eq!(store.get(&early.id).unwrap().id, early.id);
    }

    #[test]
    fn update_changes_only_named_fields() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        let mut p = pending("Planning", "2025-03-20T09:00");
        p.attendees = vec!["Ada".into(), "Ada".into()];
        p.video_type = VideoType::Zoom;
        let created = store.create(p).unwrap();

        store
            .update(
                &created.id,
                EventUpdate {
                    title: Some("X".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let after = store.get(&created.id).unwrap();
        assert_eq!(after.title, "X");
        assert_eq!(
            Event {
                title: created.title.clone(),
                ..after.clone()
            },
            created
        );
    }

    #[test]
    fn update_unknown_id_is_a_silent_no_op() {
        let mut store = EventStore::open(FlakyBackend::default()).unwrap();
        store.create(pending("a", "2025-03-20T09:00")).unwrap();
        let before = store.events().to_vec();

        let changed = store
            .update(
                "missing",
                EventUpdate {
                    title: Some("X".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(!changed);
        assert_eq!(store.events(), before.as_slice());
        assert_eq!(store.backend().writes, 1);
    }

    #[test]
    fn update_unknown_id_ignores_invalid_fields() {
        let mut store = EventStore::open(FlakyBackend::default()).unwrap();
        store.create(pending("a", "2025-03-20T09:00")).unwrap();

        let changed = store
            .update(
                "missing",
                EventUpdate {
                    duration_mins: Some(0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(!changed);
        assert_eq!(store.backend().writes, 1);
    }

    #[test]
    fn update_rejects_zero_duration() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        let created = store.create(pending("a", "2025-03-20T09:00")).unwrap();

        let result = store.update(
            &created.id,
            EventUpdate {
                duration_mins: Some(0),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(DaybookError::InvalidDuration(0))));
        assert_eq!(store.get(&created.id).unwrap().duration_mins, 60);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        let a = store.create(pending("a", "2025-03-20T09:00")).unwrap();
        store.create(pending("b", "2025-03-20T10:00")).unwrap();

        assert!(store.delete(&a.id).unwrap());
        assert_eq!(store.len(), 1);
        assert!(!store.delete(&a.id).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(titles(&store), vec!["b"]);
    }

    #[test]
    fn query_normalizes_bounds_to_whole_days() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        store.create(pending("before", "2025-03-19T23:59:59")).unwrap();
        store.create(pending("midnight", "2025-03-20T00:00")).unwrap();
        store.create(pending("last second", "2025-03-20T23:59:59")).unwrap();
        store.create(pending("too late", "2025-03-20T23:59:59.500")).unwrap();
        store.create(pending("next day", "2025-03-21T00:00:01")).unwrap();

        let day = store.query(date(2025, 3, 20), date(2025, 3, 20));
        let titles: Vec<_> = day.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["midnight", "last second"]);

        let span = store.query(date(2025, 3, 19), date(2025, 3, 21));
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn mutations_are_persisted() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        let a = store.create(pending("a", "2025-03-20T09:00")).unwrap();
        store.create(pending("b", "2025-03-20T08:00")).unwrap();
        store.delete(&a.id).unwrap();

        let reopened = EventStore::open(store.backend().clone()).unwrap();
        assert_eq!(reopened.events(), store.events());
    }

    #[test]
    fn reopened_store_answers_queries_identically() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        store.create(pending("precise", "2025-03-20T23:59:59.0004")).unwrap();
        store.create(pending("rounded", "2025-03-20T23:59:59.9996")).unwrap();
        store.create(pending("morning", "2025-03-20T08:00:00.123456")).unwrap();
        let day = store.query(date(2025, 3, 20), date(2025, 3, 20));

        let reopened = EventStore::open(store.backend().clone()).unwrap();
        assert_eq!(reopened.events(), store.events());
        assert_eq!(reopened.query(date(2025, 3, 20), date(2025, 3, 20)), day);

        let titles: Vec<_> = day.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["morning", "precise"]);
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let mut store = EventStore::open(FlakyBackend::default()).unwrap();
        let a = store.create(pending("a", "2025-03-20T09:00")).unwrap();
        store.backend.fail_writes = true;

        let created = store.create(pending("b", "2025-03-20T10:00"));
        assert!(matches!(created, Err(DaybookError::Persistence(_))));

        let deleted = store.delete(&a.id);
        assert!(matches!(deleted, Err(DaybookError::Persistence(_))));

        assert_eq!(titles(&store), vec!["a"]);
    }

    #[test]
    fn open_re_sorts_out_of_order_data() {
        let mut backend = MemoryBackend::new();
        let late = Event::from_pending("late".into(), pending("late", "2025-03-20T18:00"));
        let early = Event::from_pending("early".into(), pending("early", "2025-03-20T08:00"));
        backend
            .set(COLLECTION_KEY, &serde_json::to_string(&vec![late, early]).unwrap())
            .unwrap();

        let store = EventStore::open(backend).unwrap();
        assert_eq!(titles(&store), vec!["early", "late"]);
    }

    #[test]
    fn open_rejects_corrupt_data() {
        let mut backend = MemoryBackend::new();
        backend.set(COLLECTION_KEY, "{not json").unwrap();

        assert!(matches!(
            EventStore::open(backend),
            Err(DaybookError::Serialization(_))
        ));
    }

    #[test]
    fn sort_invariant_holds_across_mixed_operations() {
        let mut store = EventStore::open(MemoryBackend::new()).unwrap();
        let starts = [
            "2025-03-20T13:00",
            "2025-03-18T09:15",
            "2025-03-20T13:00",
            "2025-03-22T07:45",
            "2025-03-19T23:59",
            "2025-03-18T00:00",
        ];

        let mut ids = Vec::new();
        for (i, start) in starts.iter().enumerate() {
            ids.push(store.create(pending(&format!("e{}", i), start)).unwrap().id);
            assert_sorted(&store);
        }

        let moves = [
            (0, "2025-03-17T06:00"),
            (3, "2025-03-20T13:00"),
            (5, "2025-03-25T12:00"),
            (1, "2025-03-20T12:59"),
        ];
        for (index, start) in moves {
            store
                .update(
                    &ids[index],
                    EventUpdate {
                        start_date: Some(StartDate::parse(start).unwrap()),
                        ..Default::default()
                    },
                )
                .unwrap();
            assert_sorted(&store);
        }

        store.delete(&ids[2]).unwrap();
        assert_sorted(&store);
        assert_eq!(store.len(), starts.len() - 1);
    }
}
