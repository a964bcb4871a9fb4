// Change detector - annotates new snapshots with log events
use crate::domain::event_log::{LogEntry, LogKind};
use crate::domain::telemetry::TelemetrySnapshot;
use chrono::{DateTime, TimeZone};

/// Satellites needed before a position counts as a fix.
pub const FIX_MIN_SATELLITES: u32 = 4;
/// Motor counts as active above this.
pub const MOTOR_ACTIVE_RPM: f64 = 100.0;

#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_timestamp: Option<String>,
    had_fix: bool,
    motor_active: bool,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_timestamp(&self) -> Option<&str> {
        self.last_timestamp.as_deref()
    }

    /// Returns the log entries for transitions seen in `snapshot`. Repeats of
    /// the last timestamp produce nothing; a missing timestamp always counts
    /// as new. Out-of-order delivery is not detected here.
    pub fn observe<Tz>(&mut self, snapshot: &TelemetrySnapshot, now: &DateTime<Tz>) -> Vec<LogEntry>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let timestamp = snapshot.system.timestamp.as_deref();
        if timestamp.is_some() && timestamp == self.last_timestamp.as_deref() {
            return Vec::new();
        }
        self.last_timestamp = timestamp.map(str::to_string);

        let mut entries = Vec::new();

        let gps = &snapshot.gps;
        let satellites = gps.satellites.unwrap_or(0);
        let has_fix = gps.fix().is_some() && satellites >= FIX_MIN_SATELLITES;
        if has_fix && !self.had_fix {
            tracing::info!(satellites, "GPS fix acquired");
            entries.push(LogEntry::new(
                now,
                LogKind::Gps,
                format!("Fix acquired ({} satellites)", satellites),
            ));
        }
        self.had_fix = has_fix;

        let rpm = snapshot.motor.rpm.unwrap_or(0.0);
        let motor_active = rpm > MOTOR_ACTIVE_RPM;
        if motor_active && !self.motor_active {
            tracing::info!(rpm, "Motor became active");
            entries.push(LogEntry::new(
                now,
                LogKind::Motor,
                format!("Motor active ({} RPM)", rpm.round() as i64),
            ));
        }
        self.motor_active = motor_active;

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn snapshot(timestamp: &str, satellites: u32, rpm: f64) -> TelemetrySnapshot {
        serde_json::from_value(json!({
            "gps": { "latitude": 9.93, "longitude": 76.26, "satellites": satellites },
            "motor": { "rpm": rpm },
            "system": { "timestamp": timestamp }
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_fix_and_motor_logged_once() {
        let mut detector = ChangeDetector::new();

        let entries = detector.observe(&snapshot("t1", 9, 1500.0), &now());
        let kinds: Vec<LogKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![LogKind::Gps, LogKind::Motor]);
        assert_eq!(entries[0].message, "Fix acquired (9 satellites)");
        assert_eq!(entries[1].message, "Motor active (1500 RPM)");

        assert!(detector.observe(&snapshot("t2", 10, 1600.0), &now()).is_empty());
        assert_eq!(detector.last_timestamp(), Some("t2"));
    }

    #[test]
    fn test_duplicate_timestamp_suppressed() {
        let mut detector = ChangeDetector::new();
        detector.observe(&snapshot("t1", 2, 0.0), &now());

        // Same timestamp, even though the readings now qualify.
        assert!(detector.observe(&snapshot("t1", 9, 1500.0), &now()).is_empty());
    }

    #[test]
    fn test_thresholds_are_literal() {
        let mut detector = ChangeDetector::new();
        assert!(detector.observe(&snapshot("t1", 3, 100.0), &now()).is_empty());

        let entries = detector.observe(&snapshot("t2", 4, 101.0), &now());
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_fix_lost_then_regained_logs_again() {
        let mut detector = ChangeDetector::new();
        detector.observe(&snapshot("t1", 8, 0.0), &now());
        detector.observe(&snapshot("t2", 1, 0.0), &now());

        let entries = detector.observe(&snapshot("t3", 7, 0.0), &now());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, LogKind::Gps);
    }

    #[test]
    fn test_fix_logged_for_whole_float_satellite_count() {
        let snapshot: TelemetrySnapshot = serde_json::from_value(json!({
            "gps": { "latitude": 9.93, "longitude": 76.26, "satellites": 12.0 },
            "system": { "timestamp": "t1" }
        }))
        .unwrap();

        let entries = ChangeDetector::new().observe(&snapshot, &now());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, LogKind::Gps);
        assert_eq!(entries[0].message, "Fix acquired (12 satellites)");
    }
}
