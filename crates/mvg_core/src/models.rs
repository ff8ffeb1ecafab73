use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{BoardConfig, NotificationError};

/// One scheduled departure at a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub label: String,
    pub destination: String,
    /// Vehicle type, e.g. `UBAHN` or `bus`
    pub product: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub departure_time: DateTime<Utc>,
    /// Delay in minutes as delivered by the backend; may be text
    #[serde(default, deserialize_with = "lenient_text")]
    pub delay: Option<String>,
    #[serde(default)]
    pub line_background_color: Option<String>,
}

impl Departure {
    /// Delay in whole minutes; missing, non-numeric or out-of-range delays
    /// count as zero.
    pub fn delay_minutes(&self) -> i64 {
        self.delay
            .as_deref()
            .and_then(leading_integer)
            .filter(|minutes| TimeDelta::try_minutes(*minutes).is_some())
            .unwrap_or(0)
    }

    /// Departure time with the delay folded in.
    ///
    /// A delay that would move the time out of range is ignored.
    pub fn adjusted_time(&self) -> DateTime<Utc> {
        TimeDelta::try_minutes(self.delay_minutes())
            .and_then(|delay| self.departure_time.checked_add_signed(delay))
            .unwrap_or(self.departure_time)
    }
}

/// Parse the integer at the start of `text`, ignoring leading whitespace.
///
/// `"3"`, `"+3"` and `" 3 min"` give 3; `"abc"` and `""` give `None`.
pub(crate) fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

/// Accept a JSON string or number and keep it as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

/// A service-interruption advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disruption {
    pub lines: Vec<String>,
    pub title: String,
    pub duration: String,
}

/// The configured station and what the backend resolved it to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: String,
    pub resolved_id: Option<String>,
    pub resolved_name: Option<String>,
}

impl Station {
    pub fn new(name: impl Into<String>) -> Self {
        Station {
            name: name.into(),
            resolved_id: None,
            resolved_name: None,
        }
    }

    /// Name shown in the header: the resolved one once known.
    pub fn display_name(&self) -> &str {
        match self.resolved_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.name,
        }
    }
}

/// Messages pushed by the data-fetching collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    #[serde(rename_all = "camelCase")]
    StationResolved {
        station_name_queried: String,
        resolved_id: String,
        resolved_name: String,
    },
    #[serde(rename_all = "camelCase")]
    DeparturesUpdated {
        station_name: String,
        departures: Vec<Departure>,
    },
    DisruptionsUpdated { disruptions: Vec<Disruption> },
}

impl Notification {
    const KINDS: [&'static str; 3] =
        ["STATION_RESOLVED", "DEPARTURES_UPDATED", "DISRUPTIONS_UPDATED"];

    /// Decode a raw message, telling an unknown kind apart from a bad payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self, NotificationError> {
        let kind = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if !Self::KINDS.contains(&kind) {
            return Err(NotificationError::UnknownKind {
                kind: kind.to_string(),
            });
        }
        serde_json::from_value(value).map_err(|source| NotificationError::Malformed { source })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::StationResolved { .. } => Self::KINDS[0],
            Notification::DeparturesUpdated { .. } => Self::KINDS[1],
            Notification::DisruptionsUpdated { .. } => Self::KINDS[2],
        }
    }
}

/// Requests sent to the data-fetching collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundRequest {
    RequestStationInfo { configuration: BoardConfig },
    RequestDepartures { configuration: BoardConfig },
}
