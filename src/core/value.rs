//! Decoded point values and the update record published to the registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decoded point value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointValue {
    /// Scaled number (temperatures, percentages, counters).
    Number(f64),

    /// Binary flag.
    Bool(bool),

    /// Enum label, including the `Unknown (<code>)` fallback.
    Text(String),

    /// Time of day; also used for duration registers rendered as HH:MM.
    Time { hour: u8, minute: u8 },
}

impl PointValue {
    pub fn time(hour: u8, minute: u8) -> Self {
        Self::Time { hour, minute }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Number(v) => Some(*v != 0.0),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<(u8, u8)> {
        match self {
            Self::Time { hour, minute } => Some((*hour, *minute)),
            _ => None,
        }
    }
}

impl From<f64> for PointValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for PointValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for PointValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for PointValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Why a point currently has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The bus transaction failed (connect, timeout, exception response).
    Transport,
    /// The response could not be interpreted for the point's value kind.
    Decode,
}

/// One state transition of a point, published to the registry after every
/// poll attempt and every successful write. A `None` value with no fault
/// means the controller reported the value as unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointUpdate {
    pub point_id: String,
    pub value: Option<PointValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultKind>,
    pub timestamp: DateTime<Utc>,
}

impl PointUpdate {
    /// Update carrying a decoded value.
    pub fn value(point_id: &str, value: PointValue) -> Self {
        Self {
            point_id: point_id.to_string(),
            value: Some(value),
            fault: None,
            timestamp: Utc::now(),
        }
    }

    /// Update for a value the controller reports as unknown.
    pub fn unknown(point_id: &str) -> Self {
        Self {
            point_id: point_id.to_string(),
            value: None,
            fault: None,
            timestamp: Utc::now(),
        }
    }

    /// Update for a failed poll attempt.
    pub fn faulted(point_id: &str, fault: FaultKind) -> Self {
        Self {
            point_id: point_id.to_string(),
            value: None,
            fault: Some(fault),
            timestamp: Utc::now(),
        }
    }

    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(PointValue::Number(42.5).as_f64(), Some(42.5));
        assert_eq!(PointValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(PointValue::Number(0.0).as_bool(), Some(false));
        assert_eq!(PointValue::time(14, 30).as_time(), Some((14, 30)));
        assert_eq!(PointValue::from("auto").as_text(), Some("auto"));
        assert_eq!(PointValue::Bool(true).as_text(), None);
    }

    #[test]
    fn test_update_constructors() {
        let up = PointUpdate::value("boiler_temperature", PointValue::Number(71.5));
        assert_eq!(up.value.as_ref().and_then(|v| v.as_f64()), Some(71.5));
        assert!(!up.is_fault());

        let up = PointUpdate::unknown("boiler_setpoint");
        assert!(up.value.is_none());
        assert!(!up.is_fault());

        let up = PointUpdate::faulted("boiler_setpoint", FaultKind::Transport);
        assert!(up.value.is_none());
        assert_eq!(up.fault, Some(FaultKind::Transport));
    }

    #[test]
    fn test_update_serialization() {
        let up = PointUpdate::value("outside_temperature", PointValue::Number(-3.5));
        let json = serde_json::to_value(&up).unwrap();
        assert_eq!(json["point_id"], "outside_temperature");
        assert_eq!(json["value"], -3.5);
        assert!(json.get("fault").is_none());
    }
}
