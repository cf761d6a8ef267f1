//! Parsing of user-typed dates, times and durations.

use anyhow::{Context, Result};
use chrono::{Duration, Local, Month, NaiveDate, Weekday};
use daybook_core::StartDate;

/// Parse a start time: ISO-8601 first, then natural language
/// ("tomorrow 3pm", "fri 9:30").
pub fn parse_start(input: &str) -> Result<StartDate> {
    if let Ok(start) = StartDate::parse(input) {
        return Ok(start);
    }

    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    Ok(StartDate::from_naive(dt))
}

/// Parse a duration as whole minutes: a bare number ("45") or a humantime
/// string ("1h 30m").
pub fn parse_duration(input: &str) -> Result<u32> {
    let trimmed = input.trim();

    let minutes = match trimmed.parse::<u32>() {
        Ok(minutes) => minutes,
        Err(_) => {
            let std_dur = humantime::parse_duration(trimmed)
                .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
            let secs = std_dur.as_secs();
            if secs % 60 != 0 || std_dur.subsec_nanos() != 0 {
                anyhow::bail!("Duration must be a whole number of minutes: \"{}\"", input);
            }
            u32::try_from(secs / 60).context("Duration too large")?
        }
    };

    if minutes == 0 {
        anyhow::bail!("Duration must be positive: \"{}\"", input);
    }

    Ok(minutes)
}

/// Parse a day argument. `None` is today.
pub fn parse_date(input: Option<&str>) -> Result<NaiveDate> {
    let today = Local::now().date_naive();

    let Some(input) = input else {
        return Ok(today);
    };

    if let Some(date) = relative_day(input, today) {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return Ok(date);
    }

    let expanded = expand_abbreviations(input);
    fuzzydate::parse(&expanded)
        .map(|dt| dt.date())
        .map_err(|_| anyhow::anyhow!("Could not parse date: \"{}\"", input))
}

/// `today`, `tomorrow` and `yesterday`, relative to `today`.
fn relative_day(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    match input.trim().to_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => Some(today + Duration::days(1)),
        "yesterday" => Some(today - Duration::days(1)),
        _ => None,
    }
}

const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Spellings chrono's weekday and month parsers reject, mapped to ones they accept.
const LOOSE_SPELLINGS: &[(&str, &str)] = &[
    ("tues", "tue"),
    ("thur", "thu"),
    ("thurs", "thu"),
    ("sept", "sep"),
];

/// Spell out weekday and month names so fuzzydate recognizes them
/// ("fri" becomes "friday", "sept" becomes "september").
fn expand_abbreviations(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .map(full_calendar_name)
        .collect::<Vec<_>>()
        .join(" ")
}

fn full_calendar_name(word: &str) -> String {
    let word = LOOSE_SPELLINGS
        .iter()
        .find(|(loose, _)| *loose == word)
        .map_or(word, |(_, short)| *short);

    if let Ok(day) = word.parse::<Weekday>() {
        return WEEKDAY_NAMES[day.num_days_from_monday() as usize].to_string();
    }
    if let Ok(month) = word.parse::<Month>() {
        return month.name().to_lowercase();
    }

    word.to_string()
}
