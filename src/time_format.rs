use crate::time_slot::{TimeSlot, TimeSlotError};
use std::fmt;

pub const AM_LABEL: &str = "صباحًا";
pub const PM_LABEL: &str = "مساءً";
pub const NOON_LABEL: &str = "ظهرًا";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFormatError {
    InvalidStep(u32),
    InvalidSlot(TimeSlotError),
}

impl fmt::Display for TimeFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormatError::InvalidStep(step) => {
                write!(f, "step must be a positive number of minutes (got {step})")
            }
            TimeFormatError::InvalidSlot(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TimeFormatError {}

impl From<TimeSlotError> for TimeFormatError {
    fn from(value: TimeSlotError) -> Self {
        Self::InvalidSlot(value)
    }
}

/// Emits one slot every `step_minutes` from `start` through `end` inclusive.
///
/// An `end` earlier than `start` yields no slots. A zero step is rejected
/// because the sequence would never terminate. Generation never passes
/// `99:59`, so every emitted slot is a well-formed two-digit token.
pub fn generate_time_slots(
    start: &TimeSlot,
    end: &TimeSlot,
    step_minutes: u32,
) -> Result<Vec<TimeSlot>, TimeFormatError> {
    if step_minutes == 0 {
        return Err(TimeFormatError::InvalidStep(step_minutes));
    }
    let end_minutes = end.minutes_since_midnight().min(TimeSlot::MAX_MINUTES);
    let slots = (start.minutes_since_midnight()..=end_minutes)
        .step_by(step_minutes as usize)
        .map_while(TimeSlot::from_minutes)
        .collect();
    Ok(slots)
}

/// 12-hour label such as `09:30 مساءً`; exactly `12:00` reads as noon.
pub fn format_display_label(time: &TimeSlot) -> String {
    let hour = time.hour();
    let period = if hour == 12 && time.minute() == 0 {
        NOON_LABEL
    } else if hour >= 12 {
        PM_LABEL
    } else {
        AM_LABEL
    };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{:02}:{:02} {}", hour12, time.minute(), period)
}

pub fn format_time_label(time: &TimeSlot, use_12h: bool) -> String {
    if use_12h {
        format_display_label(time)
    } else {
        time.to_string()
    }
}
