//! Time-of-day intervals for the `access_times` attribute.

use serde::Serialize;

/// An interval `HH:MM-HH:MM`, stored as minutes since midnight. Both ends
/// are inclusive.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize)]
pub struct TimeInterval {
    pub start: u16,
    pub end: u16,
}

impl TimeInterval {
    pub fn parse(text: &str) -> Result<Self, String> {
        let (from, to) = text
            .split_once('-')
            .ok_or_else(|| format!("invalid time interval: {text}"))?;
        let start = parse_time_of_day(from).ok_or_else(|| format!("invalid time interval: {text}"))?;
        let end = parse_time_of_day(to).ok_or_else(|| format!("invalid time interval: {text}"))?;
        if start > end {
            return Err(format!("invalid time interval: {text}"));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn contains(&self, minute_of_day: u16) -> bool {
        self.start <= minute_of_day && minute_of_day <= self.end
    }
}

fn parse_time_of_day(text: &str) -> Option<u16> {
    let (hours, minutes) = text.split_once(':')?;
    if hours.is_empty()
        || minutes.is_empty()
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}
