// Risk level and the single style table every risk-driven element reads from
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Safe,
    Caution,
    Abort,
    Standby,
}

impl RiskLevel {
    #[cfg(test)]
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Safe,
        RiskLevel::Caution,
        RiskLevel::Abort,
        RiskLevel::Standby,
    ];

    /// Absent means the backend has not assessed anything yet. Any value we do
    /// not recognise is shown as ABORT.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return RiskLevel::Standby;
        };
        match raw.trim().to_ascii_uppercase().as_str() {
            "SAFE" => RiskLevel::Safe,
            "CAUTION" => RiskLevel::Caution,
            "STANDBY" => RiskLevel::Standby,
            _ => RiskLevel::Abort,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Caution => "CAUTION",
            RiskLevel::Abort => "ABORT",
            RiskLevel::Standby => "STANDBY",
        }
    }

    pub fn style(&self) -> &'static RiskStyle {
        match self {
            RiskLevel::Safe => &SAFE_STYLE,
            RiskLevel::Caution => &CAUTION_STYLE,
            RiskLevel::Abort => &ABORT_STYLE,
            RiskLevel::Standby => &STANDBY_STYLE,
        }
    }
}

/// Everything the dashboard paints from a risk level.
#[derive(Debug, PartialEq, Eq)]
pub struct RiskStyle {
    pub level: RiskLevel,
    /// Colour family shared by every class below.
    pub tone: &'static str,
    pub bar_class: &'static str,
    pub card_border_class: &'static str,
    pub numeral_class: &'static str,
    pub alert_label: &'static str,
    pub alert_class: &'static str,
    pub banner_text: &'static str,
    pub banner_class: &'static str,
}

static SAFE_STYLE: RiskStyle = RiskStyle {
    level: RiskLevel::Safe,
    tone: "emerald",
    bar_class: "risk-bar bg-emerald-500",
    card_border_class: "risk-card border-l-emerald-500",
    numeral_class: "risk-numeral text-emerald-400",
    alert_label: "SAFE_TO_FLY",
    alert_class: "risk-status text-emerald-400",
    banner_text: "READY",
    banner_class: "readiness border-l-emerald-500 text-emerald-400",
};

static CAUTION_STYLE: RiskStyle = RiskStyle {
    level: RiskLevel::Caution,
    tone: "amber",
    bar_class: "risk-bar bg-amber-500",
    card_border_class: "risk-card border-l-amber-500",
    numeral_class: "risk-numeral text-amber-500",
    alert_label: "CAUTION",
    alert_class: "risk-status text-amber-500",
    banner_text: "PROCEED WITH CAUTION",
    banner_class: "readiness border-l-amber-500 text-amber-500",
};

static ABORT_STYLE: RiskStyle = RiskStyle {
    level: RiskLevel::Abort,
    tone: "rose",
    bar_class: "risk-bar bg-rose-500",
    card_border_class: "risk-card border-l-rose-500",
    numeral_class: "risk-numeral text-rose-500",
    alert_label: "ABORT",
    alert_class: "risk-status text-rose-500",
    banner_text: "FLIGHT BLOCKED",
    banner_class: "readiness border-l-rose-500 text-rose-500",
};

static STANDBY_STYLE: RiskStyle = RiskStyle {
    level: RiskLevel::Standby,
    tone: "slate",
    bar_class: "risk-bar bg-slate-500",
    card_border_class: "risk-card border-l-slate-500",
    numeral_class: "risk-numeral text-slate-400",
    alert_label: "STANDBY",
    alert_class: "risk-status text-slate-400",
    banner_text: "Awaiting Telemetry",
    banner_class: "readiness border-l-slate-500 text-slate-400",
};
