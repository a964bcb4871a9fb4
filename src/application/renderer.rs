// Snapshot renderer - maps a telemetry snapshot onto view patches
//
// Rendering is pure: it reads the previous view and the snapshot and returns
// the patches needed to bring the view up to date. Elements whose content
// would not change are left out, except the clock and the chart, which move
// on every successful poll.
use crate::domain::risk::RiskLevel;
use crate::domain::series::AccelSample;
use crate::domain::telemetry::{DataSource, GeoZone, TelemetrySnapshot};
use crate::domain::view::{Connection, ElementId, Patch, ViewState};
use crate::domain::event_log::clock_text;
use chrono::{DateTime, TimeZone};

/// Above this the fan icon spins.
pub const MOTOR_SPIN_RPM: f64 = 500.0;

pub const NO_FIX: &str = "NO FIX";
pub const AWAITING_TELEMETRY: &str = "Awaiting Telemetry";

const SPIN_CLASS: &str = "spin-slow";
const SCAN_CLASS: &str = "scan-active";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdopTier {
    Excellent,
    Good,
    Caution,
    Poor,
}

impl HdopTier {
    pub fn classify(hdop: f64) -> Self {
        if hdop < 2.0 {
            HdopTier::Excellent
        } else if hdop < 5.0 {
            HdopTier::Good
        } else if hdop < 10.0 {
            HdopTier::Caution
        } else {
            HdopTier::Poor
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            HdopTier::Excellent => "hdop hdop-excellent",
            HdopTier::Good => "hdop hdop-good",
            HdopTier::Caution => "hdop hdop-caution",
            HdopTier::Poor => "hdop hdop-poor",
        }
    }
}

pub fn zone_class(zone: GeoZone) -> &'static str {
    match zone {
        GeoZone::Green => "zone zone-safe",
        GeoZone::Yellow => "zone zone-caution",
        GeoZone::Red => "zone zone-danger",
        GeoZone::NoGps | GeoZone::Unknown => "zone zone-neutral",
    }
}

/// Collects patches, dropping the ones that would not change `prev`.
struct PatchSet<'a> {
    prev: &'a ViewState,
    patches: Vec<Patch>,
}

impl<'a> PatchSet<'a> {
    fn new(prev: &'a ViewState) -> Self {
        Self {
            prev,
            patches: Vec::new(),
        }
    }

    fn text(&mut self, target: ElementId, text: impl Into<String>) {
        let text = text.into();
        if self.prev.text(target) != Some(text.as_str()) {
            self.patches.push(Patch::SetText { target, text });
        }
    }

    fn class(&mut self, target: ElementId, class: &str) {
        if self.prev.class(target) != Some(class) {
            self.patches.push(Patch::SetClass {
                target,
                class: class.to_string(),
            });
        }
    }

    fn style(&mut self, target: ElementId, property: &'static str, value: String) {
        if self.prev.style(target, property) != Some(value.as_str()) {
            self.patches.push(Patch::SetStyle {
                target,
                property,
                value,
            });
        }
    }

    fn toggle(&mut self, target: ElementId, class: &'static str, on: bool) {
        if self.prev.has_class(target, class) != on {
            self.patches.push(Patch::ToggleClass { target, class, on });
        }
    }

    fn connection(&mut self, connection: Connection) {
        if self.prev.connection != connection {
            self.patches.push(Patch::SetConnection(connection));
        }
        let (text, class) = match connection {
            Connection::Online => ("LINK_ACTIVE", "conn-tag conn-online"),
            Connection::Offline => ("OFFLINE", "conn-tag conn-offline"),
            Connection::Connecting => ("CONNECTING", "conn-tag conn-pending"),
        };
        self.text(ElementId::ConnTag, text);
        self.class(ElementId::ConnTag, class);
    }

    fn finish(self) -> Vec<Patch> {
        self.patches
    }
}

fn fixed(value: Option<f64>, digits: usize, suffix: &str, placeholder: &str) -> String {
    match value {
        Some(v) => format!("{:.*}{}", digits, v, suffix),
        None => placeholder.to_string(),
    }
}

fn rounded(value: f64) -> i64 {
    value.round() as i64
}

pub fn render<Tz>(prev: &ViewState, snapshot: &TelemetrySnapshot, now: &DateTime<Tz>) -> Vec<Patch>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut set = PatchSet::new(prev);

    set.connection(Connection::Online);
    render_environment(&mut set, snapshot);
    render_inertial(&mut set, snapshot);
    render_motor(&mut set, snapshot);
    render_gps(&mut set, snapshot);
    render_risk(&mut set, snapshot);
    render_system(&mut set, snapshot);
    render_weather(&mut set, snapshot);

    let mut patches = set.finish();
    patches.push(Patch::SetText {
        target: ElementId::Clock,
        text: clock_text(now),
    });

    let mpu = &snapshot.mpu;
    patches.push(Patch::PushSample(AccelSample::from_axes(mpu.ax, mpu.ay, mpu.az)));
    patches
}

/// A failed poll only touches the connectivity indicator; every reading
/// keeps its last rendered value.
pub fn render_offline(prev: &ViewState) -> Vec<Patch> {
    let mut set = PatchSet::new(prev);
    set.connection(Connection::Offline);
    set.finish()
}

fn render_environment(set: &mut PatchSet<'_>, snapshot: &TelemetrySnapshot) {
    let env = &snapshot.environment;
    set.text(ElementId::Temperature, fixed(env.temperature, 1, "°C", "--°C"));
    set.text(ElementId::Humidity, fixed(env.humidity, 0, "%", "--%"));
    set.text(ElementId::Light, fixed(env.light_percent, 0, "%", "--%"));
}

fn render_inertial(set: &mut PatchSet<'_>, snapshot: &TelemetrySnapshot) {
    let mpu = &snapshot.mpu;
    set.text(ElementId::Vibration, fixed(mpu.vibration_rms, 3, "", "--"));
    set.text(ElementId::Tilt, fixed(mpu.tilt_angle, 1, "°", "--°"));
}

fn render_motor(set: &mut PatchSet<'_>, snapshot: &TelemetrySnapshot) {
    let motor = &snapshot.motor;
    let rpm_text = motor
        .rpm
        .map(|rpm| rounded(rpm).to_string())
        .unwrap_or_else(|| "--".to_string());
    set.text(ElementId::Rpm, rpm_text);

    let spinning = motor.rpm.is_some_and(|rpm| rpm > MOTOR_SPIN_RPM);
    set.toggle(ElementId::FanIcon, SPIN_CLASS, spinning);

    let (text, class) = match motor.hall_detected {
        Some(true) => ("HALL OK", "badge badge-ok"),
        Some(false) => ("HALL FAULT", "badge badge-fault"),
        None => ("HALL --", "badge badge-neutral"),
    };
    set.text(ElementId::HallTag, text);
    set.class(ElementId::HallTag, class);
}

fn render_gps(set: &mut PatchSet<'_>, snapshot: &TelemetrySnapshot) {
    let gps = &snapshot.gps;
    match gps.fix() {
        Some((lat, lon)) => {
            set.text(ElementId::Latitude, format!("{:.6}", lat));
            set.text(ElementId::Longitude, format!("{:.6}", lon));
        }
        None => {
            set.text(ElementId::Latitude, NO_FIX);
            set.text(ElementId::Longitude, NO_FIX);
        }
    }

    set.text(ElementId::Satellites, gps.satellites.unwrap_or(0).to_string());

    match gps.normalized_hdop() {
        Some(hdop) => {
            set.text(ElementId::Hdop, format!("{:.2}", hdop));
            set.class(ElementId::Hdop, HdopTier::classify(hdop).class());
        }
        None => {
            set.text(ElementId::Hdop, "--");
            set.class(ElementId::Hdop, "hdop hdop-unknown");
        }
    }

    set.text(
        ElementId::GpsQuality,
        gps.gps_quality.as_deref().unwrap_or("--"),
    );

    let zone = gps.zone();
    set.text(ElementId::Zone, zone.as_str());
    set.class(ElementId::Zone, zone_class(zone));
}

/// All five risk-driven elements come from the same table entry.
fn render_risk(set: &mut PatchSet<'_>, snapshot: &TelemetrySnapshot) {
    let system = &snapshot.system;
    let style = RiskLevel::parse(system.risk_level.as_deref()).style();

    match system.risk_score {
        Some(score) => {
            set.text(ElementId::RiskScore, rounded(score).to_string());
            let width = rounded(score).clamp(0, 100);
            set.style(ElementId::RiskProgress, "width", format!("{}%", width));
        }
        None => {
            set.text(ElementId::RiskScore, "--");
            set.style(ElementId::RiskProgress, "width", "0%".to_string());
        }
    }

    set.class(ElementId::RiskProgress, style.bar_class);
    set.class(ElementId::RiskCard, style.card_border_class);
    set.class(ElementId::RiskScore, style.numeral_class);
    set.text(ElementId::RiskStatus, style.alert_label);
    set.class(ElementId::RiskStatus, style.alert_class);
    set.text(ElementId::Readiness, style.banner_text);
    set.class(ElementId::Readiness, style.banner_class);
}

fn render_system(set: &mut PatchSet<'_>, snapshot: &TelemetrySnapshot) {
    let system = &snapshot.system;
    set.text(
        ElementId::BlockedReason,
        system.blocked_reason.as_deref().unwrap_or(AWAITING_TELEMETRY),
    );

    set.toggle(
        ElementId::ScanBanner,
        SCAN_CLASS,
        system.scan_triggered.unwrap_or(false),
    );

    let (text, class) = match system.data_source() {
        DataSource::Hardware => ("HARDWARE", "source source-hardware"),
        DataSource::Simulated => ("SIMULATED", "source source-simulated"),
        DataSource::Unknown => ("NO SOURCE", "source source-none"),
    };
    set.text(ElementId::SourceTag, text);
    set.class(ElementId::SourceTag, class);
}

fn render_weather(set: &mut PatchSet<'_>, snapshot: &TelemetrySnapshot) {
    let weather = &snapshot.weather;
    set.text(ElementId::Wind, fixed(weather.wind_speed, 1, " m/s", "--"));
    set.text(ElementId::WindDisplay, fixed(weather.wind_speed, 1, "", "--"));

    let visibility_km = weather.visibility.map(|m| m / 1000.0);
    set.text(ElementId::Visibility, fixed(visibility_km, 1, "km", "--"));
    let visibility_pct = weather
        .visibility
        .map(|m| (m / 10000.0 * 100.0).min(100.0));
    set.text(
        ElementId::VisibilityDisplay,
        fixed(visibility_pct, 0, "%", "--%"),
    );

    let condition = weather
        .condition
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_else(|| "--".to_string());
    set.text(ElementId::WeatherCondition, condition);
}
