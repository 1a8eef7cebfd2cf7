//! Wall-clock start times for time blocks (`HH:MM`, 24h).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Hour and minute of a 24-hour day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build a time, rejecting hour > 23 or minute > 59.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 {
            return Err(ValidationError::invalid(
                "startTime",
                format!("hour {hour} is out of range 0-23"),
            ));
        }
        if minute > 59 {
            return Err(ValidationError::invalid(
                "startTime",
                format!("minute {minute} is out of range 0-59"),
            ));
        }
        Ok(Self { hour, minute })
    }

    /// Top of the given hour lane.
    pub fn on_the_hour(hour: u8) -> Result<Self, ValidationError> {
        Self::new(hour, 0)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::invalid("startTime", format!("expected HH:MM, got '{s}'"));
        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        if h.is_empty() || m.len() != 2 {
            return Err(malformed());
        }
        let hour = h.parse::<u8>().map_err(|_| malformed())?;
        let minute = m.parse::<u8>().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_zero_padded() {
        let t: ClockTime = "9:05".parse().unwrap();
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "09:05");
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("noon".parse::<ClockTime>().is_err());
        assert!("12:5".parse::<ClockTime>().is_err());
        assert!(":30".parse::<ClockTime>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let t = ClockTime::new(13, 30).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"13:30\"");
        let back: ClockTime = serde_json::from_str("\"13:30\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<ClockTime>("\"25:00\"").is_err());
    }

    #[test]
    fn minutes_from_midnight() {
        assert_eq!(ClockTime::new(0, 0).unwrap().minutes_from_midnight(), 0);
        assert_eq!(ClockTime::new(23, 59).unwrap().minutes_from_midnight(), 1439);
    }
}
