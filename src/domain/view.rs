// Dashboard view model and the patch operations that mutate it
use super::bounded::BoundedQueue;
use super::event_log::LogEntry;
use super::series::{AccelHistory, AccelSample, ChartFrame};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    Temperature,
    Humidity,
    Light,
    Vibration,
    Tilt,
    Rpm,
    FanIcon,
    HallTag,
    Latitude,
    Longitude,
    Satellites,
    Hdop,
    GpsQuality,
    Zone,
    RiskScore,
    RiskProgress,
    RiskCard,
    RiskStatus,
    Readiness,
    BlockedReason,
    ScanBanner,
    SourceTag,
    ConnTag,
    Clock,
    Wind,
    WindDisplay,
    Visibility,
    VisibilityDisplay,
    WeatherCondition,
}

impl ElementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::Temperature => "val-temp",
            ElementId::Humidity => "val-humid",
            ElementId::Light => "val-light",
            ElementId::Vibration => "val-vib",
            ElementId::Tilt => "val-tilt",
            ElementId::Rpm => "val-rpm",
            ElementId::FanIcon => "fan-icon",
            ElementId::HallTag => "hall-tag",
            ElementId::Latitude => "val-lat",
            ElementId::Longitude => "val-long",
            ElementId::Satellites => "val-sats",
            ElementId::Hdop => "val-hdop",
            ElementId::GpsQuality => "val-gps-quality",
            ElementId::Zone => "val-zone",
            ElementId::RiskScore => "val-risk",
            ElementId::RiskProgress => "risk-progress",
            ElementId::RiskCard => "risk-card",
            ElementId::RiskStatus => "risk-status",
            ElementId::Readiness => "sys-readiness",
            ElementId::BlockedReason => "val-blocked-reason",
            ElementId::ScanBanner => "scan-banner",
            ElementId::SourceTag => "source-tag",
            ElementId::ConnTag => "conn-tag",
            ElementId::Clock => "clock",
            ElementId::Wind => "val-wind",
            ElementId::WindDisplay => "val-wind-display",
            ElementId::Visibility => "val-visibility",
            ElementId::VisibilityDisplay => "val-vis-display",
            ElementId::WeatherCondition => "val-weather-cond",
        }
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    /// No poll has completed yet.
    Connecting,
    Online,
    Offline,
}

/// One UI mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    SetText {
        target: ElementId,
        text: String,
    },
    SetClass {
        target: ElementId,
        class: String,
    },
    SetStyle {
        target: ElementId,
        property: &'static str,
        value: String,
    },
    ToggleClass {
        target: ElementId,
        class: &'static str,
        on: bool,
    },
    /// Append to the accelerometer history and redraw the chart.
    PushSample(AccelSample),
    SetConnection(Connection),
    AppendLog(LogEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub toggled: BTreeSet<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub connection: Connection,
    pub elements: BTreeMap<ElementId, ElementView>,
    pub chart: ChartFrame,
    #[serde(serialize_with = "newest_first")]
    pub log: BoundedQueue<LogEntry>,
    #[serde(skip)]
    history: AccelHistory,
}

impl ViewState {
    pub fn new(chart_capacity: usize, log_capacity: usize) -> Self {
        Self {
            connection: Connection::Connecting,
            elements: BTreeMap::new(),
            chart: ChartFrame::default(),
            log: BoundedQueue::new(log_capacity),
            history: AccelHistory::new(chart_capacity),
        }
    }

    pub fn apply(&mut self, patch: Patch) {
        match patch {
            Patch::SetText { target, text } => {
                self.elements.entry(target).or_default().text = Some(text);
            }
            Patch::SetClass { target, class } => {
                self.elements.entry(target).or_default().class = Some(class);
            }
            Patch::SetStyle { target, property, value } => {
                self.elements.entry(target).or_default().style.insert(property, value);
            }
            Patch::ToggleClass { target, class, on } => {
                let toggled = &mut self.elements.entry(target).or_default().toggled;
                if on {
                    toggled.insert(class);
                } else {
                    toggled.remove(class);
                }
            }
            Patch::PushSample(sample) => {
                self.history.push(sample);
                self.chart = self.history.render();
            }
            Patch::SetConnection(connection) => {
                self.connection = connection;
            }
            Patch::AppendLog(entry) => {
                self.log.push(entry);
            }
        }
    }

    pub fn apply_all(&mut self, patches: impl IntoIterator<Item = Patch>) {
        for patch in patches {
            self.apply(patch);
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).and_then(|e| e.text.as_deref())
    }

    pub fn class(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).and_then(|e| e.class.as_deref())
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.elements
            .get(&id)
            .and_then(|e| e.style.get(property))
            .map(String::as_str)
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(&id)
            .is_some_and(|e| e.toggled.contains(class))
    }

    pub fn sample_count(&self) -> usize {
        self.history.len()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(
            super::series::DEFAULT_CAPACITY,
            super::event_log::DEFAULT_LOG_CAPACITY,
        )
    }
}

fn newest_first<S: Serializer>(
    log: &BoundedQueue<LogEntry>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(log.newest_first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event_log::LogKind;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            time: "12:00:00".to_string(),
            kind: LogKind::Sys,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_apply_text_and_class() {
        let mut view = ViewState::default();
        view.apply(Patch::SetText {
            target: ElementId::Temperature,
            text: "24.5°C".to_string(),
        });
        view.apply(Patch::SetClass {
            target: ElementId::HallTag,
            class: "badge-ok".to_string(),
        });

        assert_eq!(view.text(ElementId::Temperature), Some("24.5°C"));
        assert_eq!(view.class(ElementId::HallTag), Some("badge-ok"));
        assert_eq!(view.text(ElementId::Humidity), None);
    }

    #[test]
    fn test_toggle_class_on_and_off() {
        let mut view = ViewState::default();
        view.apply(Patch::ToggleClass {
            target: ElementId::FanIcon,
            class: "spin-slow",
            on: true,
        });
        assert!(view.has_class(ElementId::FanIcon, "spin-slow"));

        view.apply(Patch::ToggleClass {
            target: ElementId::FanIcon,
            class: "spin-slow",
            on: false,
        });
        assert!(!view.has_class(ElementId::FanIcon, "spin-slow"));
    }

    #[test]
    fn test_push_sample_replaces_chart() {
        let mut view = ViewState::new(2, 10);
        for x in [0.1, 0.2, 0.3] {
            view.apply(Patch::PushSample(AccelSample { x, y: 0.0, z: 1.0 }));
        }

        assert_eq!(view.sample_count(), 2);
        assert_eq!(view.chart.series[0].data, vec![0.2, 0.3]);
        assert_eq!(view.chart.series[2].data, vec![1.0, 1.0]);
    }

    #[test]
    fn test_log_serializes_newest_first_and_is_bounded() {
        let mut view = ViewState::new(40, 2);
        view.apply(Patch::AppendLog(entry("one")));
        view.apply(Patch::AppendLog(entry("two")));
        view.apply(Patch::AppendLog(entry("three")));

        let json = serde_json::to_value(&view).unwrap();
        let messages: Vec<&str> = json["log"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["message"].as_str().unwrap())
            .collect();
        assert_eq!(messages, vec!["three", "two"]);
    }

    #[test]
    fn test_elements_serialize_by_dom_id() {
        let mut view = ViewState::default();
        view.apply(Patch::SetStyle {
            target: ElementId::RiskProgress,
            property: "width",
            value: "40%".to_string(),
        });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["elements"]["risk-progress"]["style"]["width"], "40%");
        assert_eq!(json["connection"], "connecting");
    }
}
