use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A schedulable time column, stored as a zero-padded 24-hour `HH:MM` token.
///
/// Ordering is lexicographic on the token, which matches chronological order
/// because both components are always two digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlotError {
    input: String,
}

impl TimeSlotError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for TimeSlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time slot '{}' (expected HH:MM)", self.input)
    }
}

impl std::error::Error for TimeSlotError {}

impl TimeSlot {
    pub fn parse(input: &str) -> Result<Self, TimeSlotError> {
        let bytes = input.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
        if !well_formed {
            return Err(TimeSlotError {
                input: input.to_string(),
            });
        }
        Ok(Self(input.to_string()))
    }

    /// Latest minute value a two-digit hour can express, `99:59`.
    pub const MAX_MINUTES: u32 = 99 * 60 + 59;

    /// Builds a slot from minutes since midnight. `None` past `99:59`, where
    /// the hour would need a third digit.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes > Self::MAX_MINUTES {
            return None;
        }
        Some(Self(format!("{:02}:{:02}", minutes / 60, minutes % 60)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn hour(&self) -> u32 {
        digits(&self.0[..2])
    }

    pub fn minute(&self) -> u32 {
        digits(&self.0[3..])
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }
}

// Both halves are validated as two ASCII digits on construction.
fn digits(pair: &str) -> u32 {
    pair.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

impl FromStr for TimeSlot {
    type Err = TimeSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = TimeSlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeSlot> for String {
    fn from(value: TimeSlot) -> Self {
        value.0
    }
}

impl AsRef<str> for TimeSlot {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_tokens_outside_the_pattern() {
        for bad in ["9:30", "09:3", "0930", "ab:cd", "09:30 ", " 09:30", "09-30", ""] {
            assert!(TimeSlot::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn splits_hour_and_minute() {
        let slot = TimeSlot::parse("14:05").unwrap();
        assert_eq!(slot.hour(), 14);
        assert_eq!(slot.minute(), 5);
        assert_eq!(slot.minutes_since_midnight(), 845);
    }

    #[test]
    fn from_minutes_zero_pads() {
        assert_eq!(TimeSlot::from_minutes(0).unwrap().as_str(), "00:00");
        assert_eq!(TimeSlot::from_minutes(605).unwrap().as_str(), "10:05");
    }

    #[test]
    fn from_minutes_stops_at_two_digit_hours() {
        let last = TimeSlot::from_minutes(TimeSlot::MAX_MINUTES).unwrap();
        assert_eq!(last.as_str(), "99:59");
        assert!(TimeSlot::parse(last.as_str()).is_ok());
        assert!(TimeSlot::from_minutes(TimeSlot::MAX_MINUTES + 1).is_none());
        assert!(TimeSlot::from_minutes(6000).is_none());
    }
}
