use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Longest walking time accepted, one day in minutes.
pub const MAX_TIME_TO_WALK: i64 = 24 * 60;

/// Per-instance settings of a departure board.
///
/// Every field has a default, so a configuration file only needs to list
/// what differs from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    /// Maximum number of rows shown on the board
    pub max_entries: usize,
    /// Departure poll interval in milliseconds
    pub update_interval: u64,
    /// Name of the departure station, empty when not configured
    #[serde(alias = "haltestelle")]
    pub station: String,
    /// Optional label put in front of the station name in the header
    pub header: Option<String>,
    /// Destinations that are never shown
    pub ignore_stations: Vec<String>,
    pub line_filtering: LineFiltering,
    /// Walking time to the station in minutes
    pub time_to_walk: i64,
    pub show_walking_time: bool,
    pub show_train_departure_time: bool,
    pub train_departure_time_format: TimeFormat,
    pub walking_time_format: TimeFormat,
    pub show_delay: bool,
    /// Fold the delay into the departure time before sorting
    pub add_delay: bool,
    pub show_icons: bool,
    pub icon_opacity: f64,
    pub show_line_colors: bool,
    pub fade: bool,
    /// Fraction of the list after which rows start fading out
    pub fade_point: f64,
    /// Vehicle types keyed by lower-cased product name
    pub transport_types_to_show: HashMap<String, bool>,
    pub show_interruptions: bool,
    pub show_interruptions_details: bool,
    pub count_interruptions_as_item_shown: bool,
    pub language: Language,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            max_entries: 8,
            update_interval: 60_000,
            station: "Hauptbahnhof".to_string(),
            header: None,
            ignore_stations: Vec::new(),
            line_filtering: LineFiltering::default(),
            time_to_walk: 0,
            show_walking_time: false,
            show_train_departure_time: true,
            train_departure_time_format: TimeFormat::Relative,
            walking_time_format: TimeFormat::Relative,
            show_delay: false,
            add_delay: true,
            show_icons: true,
            icon_opacity: 1.0,
            show_line_colors: true,
            fade: true,
            fade_point: 0.25,
            transport_types_to_show: ["ubahn", "sbahn", "regional_bus", "bus", "tram"]
                .into_iter()
                .map(|product| (product.to_string(), true))
                .collect(),
            show_interruptions: false,
            show_interruptions_details: false,
            count_interruptions_as_item_shown: false,
            language: Language::En,
        }
    }
}

impl BoardConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the numeric ranges the renderer and the poller rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "maxEntries",
                reason: "must be at least 1".into(),
            });
        }
        if self.update_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "updateInterval",
                reason: "must be at least 1 ms".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.fade_point) {
            return Err(ConfigError::Invalid {
                field: "fadePoint",
                reason: format!("{} is outside [0, 1]", self.fade_point),
            });
        }
        if !(0.0..=1.0).contains(&self.icon_opacity) {
            return Err(ConfigError::Invalid {
                field: "iconOpacity",
                reason: format!("{} is outside [0, 1]", self.icon_opacity),
            });
        }
        if !(0..=MAX_TIME_TO_WALK).contains(&self.time_to_walk) {
            return Err(ConfigError::Invalid {
                field: "timeToWalk",
                reason: format!("{} is outside [0, {}]", self.time_to_walk, MAX_TIME_TO_WALK),
            });
        }
        Ok(())
    }

    /// Whether a station name is set at all.
    pub fn has_station(&self) -> bool {
        !self.station.is_empty()
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval)
    }

    /// Whether departures of this product should be listed.
    ///
    /// Products missing from the map are hidden.
    pub fn shows_transport_type(&self, product: &str) -> bool {
        self.transport_types_to_show
            .get(&product.to_lowercase())
            .copied()
            .unwrap_or(false)
    }
}

/// White- or blacklist restriction on line labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineFiltering {
    pub active: bool,
    pub filter_type: FilterType,
    pub line_numbers: Vec<String>,
}

impl LineFiltering {
    /// Whether a line passes the filter.
    pub fn admits(&self, line: &str) -> bool {
        if !self.active {
            return true;
        }
        let listed = self.line_numbers.iter().any(|l| l == line);
        match self.filter_type {
            FilterType::Whitelist => listed,
            FilterType::Blacklist => !listed,
        }
    }
}

/// Anything other than `"whitelist"` acts as a blacklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterType {
    #[default]
    Whitelist,
    Blacklist,
}

impl From<String> for FilterType {
    fn from(value: String) -> Self {
        if value == "whitelist" {
            FilterType::Whitelist
        } else {
            FilterType::Blacklist
        }
    }
}

impl From<FilterType> for String {
    fn from(value: FilterType) -> Self {
        match value {
            FilterType::Whitelist => "whitelist".into(),
            FilterType::Blacklist => "blacklist".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    Absolute,
    #[default]
    Relative,
}

/// Language of the relative time labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    En,
    De,
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "de" => Language::De,
            _ => Language::En,
        }
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        match value {
            Language::En => "en".into(),
            Language::De => "de".into(),
        }
    }
}
