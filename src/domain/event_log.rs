// Diagnostic event log shown beside the dashboard
use chrono::{DateTime, TimeZone};
use serde::Serialize;

pub const DEFAULT_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogKind {
    Init,
    Sys,
    Gps,
    Motor,
    Net,
    Err,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// 24h wall-clock time, `HH:MM:SS`.
    pub time: String,
    pub kind: LogKind,
    pub message: String,
}

impl LogEntry {
    pub fn new<Tz>(now: &DateTime<Tz>, kind: LogKind, message: impl Into<String>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            time: clock_text(now),
            kind,
            message: message.into(),
        }
    }
}

pub fn clock_text<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_entry_uses_24h_clock() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 21, 5, 9).unwrap();
        let entry = LogEntry::new(&now, LogKind::Gps, "Fix acquired (9 satellites)");
        assert_eq!(entry.time, "21:05:09");
        assert_eq!(entry.kind, LogKind::Gps);
    }

    #[test]
    fn test_kind_serializes_uppercase() {
        let json = serde_json::to_string(&LogKind::Motor).unwrap();
        assert_eq!(json, "\"MOTOR\"");
    }
}
