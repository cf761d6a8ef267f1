//! Day spans for querying events.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::event::Event;
use crate::start_date::StartDate;

/// An inclusive span of whole days, from 00:00:00 on `from` to 23:59:59 on `to`.
///
/// The upper bound has whole-second precision: an event starting at
/// 23:59:59.5 on the last day falls outside the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpan {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DaySpan {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        DaySpan { from, to }
    }

    pub fn day(date: NaiveDate) -> Self {
        DaySpan::new(date, date)
    }

    /// The Sunday-to-Saturday week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let days = week_of(date);
        DaySpan::new(days[0], days[6])
    }

    pub fn start(&self) -> NaiveDateTime {
        start_of_day(self.from)
    }

    pub fn end(&self) -> NaiveDateTime {
        end_of_day(self.to)
    }

    pub fn contains(&self, start: &StartDate) -> bool {
        let at = start.naive();
        at >= self.start() && at <= self.end()
    }

    /// Every date in the span, in order. Empty if `from` is after `to`.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.from
            .iter_days()
            .take_while(|d| *d <= self.to)
            .collect()
    }
}

/// Midnight at the start of `date`
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59 on `date`
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::seconds(24 * 60 * 60 - 1)
}

/// The seven dates, Sunday first, of the week containing `date`.
pub fn week_of(date: NaiveDate) -> [NaiveDate; 7] {
    let sunday = date - Duration::days(i64::from(date.weekday().num_days_from_sunday()));
    std::array::from_fn(|i| sunday + Duration::days(i as i64))
}

/// Events starting on `date`, keeping their input order.
pub fn events_on(date: NaiveDate, events: &[Event]) -> Vec<Event> {
    let span = DaySpan::day(date);
    events
        .iter()
        .filter(|e| span.contains(&e.start_date))
        .cloned()
        .collect()
}

/// One `events_on` bucket per date.
pub fn group_by_day(dates: &[NaiveDate], events: &[Event]) -> Vec<Vec<Event>> {
    dates.iter().map(|d| events_on(*d, events)).collect()
}

/// Number of events starting on each date.
pub fn event_counts(dates: &[NaiveDate], events: &[Event]) -> Vec<usize> {
    dates
        .iter()
        .map(|d| {
            let span = DaySpan::day(*d);
            events.iter().filter(|e| span.contains(&e.start_date)).count()
        })
        .collect()
}

/// Badge text for a day's event count: `10+` above nine.
pub fn count_badge(count: usize) -> String {
    if count > 9 {
        format!("{}+", count)
    } else {
        count.to_string()
    }
}
