// Telemetry snapshot as published by the backend's status endpoint
//
// The backend owns this shape and older builds omit or null out fields
// freely. Every field is optional, and a field carrying the wrong JSON type
// decodes as absent instead of failing the whole snapshot.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Raw HDOP values above this are taken to be the integer (x100) encoding.
pub const HDOP_SCALED_CUTOFF: f64 = 50.0;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(default, deserialize_with = "lenient_record")]
    pub environment: Environment,
    #[serde(default, deserialize_with = "lenient_record")]
    pub mpu: Mpu,
    #[serde(default, deserialize_with = "lenient_record")]
    pub motor: Motor,
    #[serde(default, deserialize_with = "lenient_record")]
    pub gps: Gps,
    #[serde(default, deserialize_with = "lenient_record")]
    pub weather: Weather,
    #[serde(default, deserialize_with = "lenient_record")]
    pub system: SystemStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Environment {
    #[serde(default, deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub light_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mpu {
    #[serde(default, deserialize_with = "lenient")]
    pub vibration_rms: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub tilt_angle: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub ax: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub ay: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub az: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Motor {
    #[serde(default, deserialize_with = "lenient")]
    pub rpm: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub hall_detected: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gps {
    #[serde(default, deserialize_with = "lenient")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "satellite_count")]
    pub satellites: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub hdop: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub hdop_encoding: Option<HdopEncoding>,
    #[serde(default, deserialize_with = "lenient")]
    pub geo_zone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub gps_quality: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Weather {
    #[serde(default, deserialize_with = "lenient")]
    pub wind_speed: Option<f64>,
    /// Metres.
    #[serde(default, deserialize_with = "lenient")]
    pub visibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemStatus {
    #[serde(default, deserialize_with = "timestamp_id")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub risk_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blocked_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub scan_triggered: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HdopEncoding {
    /// Integer HDOP x100.
    Scaled,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoZone {
    Green,
    Yellow,
    Red,
    NoGps,
    Unknown,
}

impl GeoZone {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("GREEN") => GeoZone::Green,
            Some("YELLOW") => GeoZone::Yellow,
            Some("RED") => GeoZone::Red,
            Some("NO_GPS") => GeoZone::NoGps,
            _ => GeoZone::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeoZone::Green => "GREEN",
            GeoZone::Yellow => "YELLOW",
            GeoZone::Red => "RED",
            GeoZone::NoGps => "NO_GPS",
            GeoZone::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Hardware,
    Simulated,
    Unknown,
}

impl DataSource {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("hardware" | "wifi" | "serial" | "esp32") => DataSource::Hardware,
            Some("simulated" | "simulator" | "sim") => DataSource::Simulated,
            _ => DataSource::Unknown,
        }
    }
}

impl Gps {
    /// Both coordinates, or nothing.
    pub fn fix(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn zone(&self) -> GeoZone {
        GeoZone::parse(self.geo_zone.as_deref())
    }

    pub fn normalized_hdop(&self) -> Option<f64> {
        self.hdop.map(|raw| normalize_hdop(raw, self.hdop_encoding))
    }
}

impl SystemStatus {
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(self.source.as_deref())
    }
}

/// Resolve the two HDOP wire encodings. An explicit encoding wins; without
/// one, anything above the cutoff is assumed to be the x100 integer form.
pub fn normalize_hdop(raw: f64, encoding: Option<HdopEncoding>) -> f64 {
    match encoding {
        Some(HdopEncoding::Scaled) => raw / 100.0,
        Some(HdopEncoding::Direct) => raw,
        None if raw > HDOP_SCALED_CUTOFF => raw / 100.0,
        None => raw,
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Counts sent as floats (`12.0`) are accepted as long as they are whole.
fn satellite_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = Value::deserialize(deserializer)?
        .as_f64()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32);
    Ok(count)
}

/// Timestamps arrive as ISO strings from some backends and epoch numbers from
/// others; both are only compared for change, so keep them as text.
fn timestamp_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> TelemetrySnapshot {
        serde_json::from_value(value).expect("snapshot should decode")
    }

    #[test]
    fn test_empty_object_decodes() {
        let snapshot = parse(json!({}));
        assert!(snapshot.environment.temperature.is_none());
        assert!(snapshot.gps.fix().is_none());
        assert!(snapshot.system.timestamp.is_none());
    }

    #[test]
    fn test_nulls_and_wrong_types_become_absent() {
        let snapshot = parse(json!({
            "environment": { "temperature": null, "humidity": "damp" },
            "mpu": "broken",
            "motor": { "rpm": 1500, "hall_detected": "yes" },
            "gps": { "satellites": -3, "latitude": 9.93 }
        }));

        assert!(snapshot.environment.temperature.is_none());
        assert!(snapshot.environment.humidity.is_none());
        assert!(snapshot.mpu.ax.is_none());
        assert_eq!(snapshot.motor.rpm, Some(1500.0));
        assert!(snapshot.motor.hall_detected.is_none());
        assert!(snapshot.gps.satellites.is_none());
        assert!(snapshot.gps.fix().is_none());
    }

    #[test]
    fn test_timestamp_accepts_strings_and_numbers() {
        let iso = parse(json!({ "system": { "timestamp": "2025-01-01T10:00:00" } }));
        assert_eq!(iso.system.timestamp.as_deref(), Some("2025-01-01T10:00:00"));

        let epoch = parse(json!({ "system": { "timestamp": 1735725600 } }));
        assert_eq!(epoch.system.timestamp.as_deref(), Some("1735725600"));
    }

    #[test]
    fn test_hdop_heuristic() {
        assert_eq!(normalize_hdop(110.0, None), 1.10);
        assert_eq!(normalize_hdop(1.10, None), 1.10);
        assert_eq!(normalize_hdop(45.0, None), 45.0);
        assert_eq!(normalize_hdop(50.0, None), 50.0);
    }

    #[test]
    fn test_hdop_explicit_encoding_wins() {
        assert_eq!(normalize_hdop(45.0, Some(HdopEncoding::Scaled)), 0.45);
        assert_eq!(normalize_hdop(120.0, Some(HdopEncoding::Direct)), 120.0);

        let snapshot = parse(json!({ "gps": { "hdop": 75, "hdop_encoding": "direct" } }));
        assert_eq!(snapshot.gps.normalized_hdop(), Some(75.0));
    }

    #[test]
    fn test_zone_and_source_parsing() {
        assert_eq!(GeoZone::parse(Some("yellow")), GeoZone::Yellow);
        assert_eq!(GeoZone::parse(Some("NO_GPS")), GeoZone::NoGps);
        assert_eq!(GeoZone::parse(Some("PURPLE")), GeoZone::Unknown);
        assert_eq!(GeoZone::parse(None), GeoZone::Unknown);

        assert_eq!(DataSource::parse(Some("WiFi")), DataSource::Hardware);
        assert_eq!(DataSource::parse(Some("simulated")), DataSource::Simulated);
        assert_eq!(DataSource::parse(Some("IDLE")), DataSource::Unknown);
    }

    #[test]
    fn test_satellites_accept_whole_floats() {
        let count = |raw: Value| parse(json!({ "gps": { "satellites": raw } })).gps.satellites;
        assert_eq!(count(json!(12)), Some(12));
        assert_eq!(count(json!(12.0)), Some(12));
        assert_eq!(count(json!(12.5)), None);
        assert_eq!(count(json!(-3)), None);
        assert_eq!(count(json!("12")), None);
    }
}
