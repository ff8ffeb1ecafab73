mod config;
pub mod disruption;
pub mod fade;
mod models;
mod render;
pub mod selection;
pub mod timefmt;

pub use crate::config::*;
pub use crate::models::*;
pub use crate::render::*;
pub use crate::timefmt::RenderContext;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration is not valid JSON: {source}")]
    Parse { source: serde_json::Error },
    #[error("Configuration field '{field}' is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Unknown notification kind '{kind}'")]
    UnknownKind { kind: String },
    #[error("Malformed notification payload: {source}")]
    Malformed { source: serde_json::Error },
}

/// Where a board is in its station/departure lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoardPhase {
    Uninitialized,
    /// No station configured, nothing will be requested
    Unconfigured,
    AwaitingStation,
    AwaitingDepartures,
    Ready,
}

/// Side effects the owner of a [`BoardState`] has to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Request(OutboundRequest),
    /// (Re)start the periodic departure poll, first request immediately
    StartPolling,
    /// The render output changed and should be redrawn
    Refresh,
}

/// State of one departure board instance.
#[derive(Debug, Clone)]
pub struct BoardState {
    instance: uuid::Uuid,
    config: BoardConfig,
    station: Station,
    phase: BoardPhase,
    disruptions: Vec<Disruption>,
    /// Rendered rows keyed by station name
    views: HashMap<String, Vec<BoardRow>>,
}

impl BoardState {
    pub fn new(config: BoardConfig) -> Self {
        BoardState {
            instance: uuid::Uuid::new_v4(),
            station: Station::new(config.station.clone()),
            config,
            phase: BoardPhase::Uninitialized,
            disruptions: Vec::new(),
            views: HashMap::new(),
        }
    }

    pub fn instance(&self) -> uuid::Uuid {
        self.instance
    }

    pub fn get_config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn disruptions(&self) -> &[Disruption] {
        &self.disruptions
    }

    /// Kick off station resolution, if there is a station to resolve.
    pub fn start(&mut self) -> Vec<Effect> {
        tracing::info!(
            "Starting departure board {} for station '{}'",
            self.instance,
            self.config.station
        );
        if !self.config.has_station() {
            self.phase = BoardPhase::Unconfigured;
            return vec![Effect::Refresh];
        }
        self.phase = BoardPhase::AwaitingStation;
        vec![
            Effect::Request(OutboundRequest::RequestStationInfo {
                configuration: self.config.clone(),
            }),
            Effect::Refresh,
        ]
    }

    pub fn handle(&mut self, notification: Notification, ctx: &RenderContext) -> Vec<Effect> {
        tracing::debug!("Board {} received {}", self.instance, notification.kind());
        match notification {
            Notification::StationResolved {
                station_name_queried,
                resolved_id,
                resolved_name,
            } => self.station_resolved(station_name_queried, resolved_id, resolved_name),
            Notification::DeparturesUpdated {
                station_name,
                departures,
            } => self.departures_updated(station_name, &departures, ctx),
            Notification::DisruptionsUpdated { disruptions } => {
                self.disruptions = disruptions;
                Vec::new()
            }
        }
    }

    fn station_resolved(
        &mut self,
        station_name_queried: String,
        resolved_id: String,
        resolved_name: String,
    ) -> Vec<Effect> {
        if station_name_queried != self.config.station {
            tracing::debug!(
                "Discarding resolution for '{}', configured station is '{}'",
                station_name_queried,
                self.config.station
            );
            return Vec::new();
        }
        tracing::info!(
            "Station '{}' resolved to {} ({})",
            station_name_queried,
            resolved_name,
            resolved_id
        );
        self.station.resolved_id = Some(resolved_id);
        self.station.resolved_name = Some(resolved_name);
        if self.phase != BoardPhase::Ready {
            self.phase = BoardPhase::AwaitingDepartures;
        }
        vec![Effect::StartPolling, Effect::Refresh]
    }

    fn departures_updated(
        &mut self,
        station_name: String,
        departures: &[Departure],
        ctx: &RenderContext,
    ) -> Vec<Effect> {
        let rows = render_rows(departures, &self.disruptions, &self.config, ctx);
        tracing::debug!(
            "Rendered {} rows from {} departures for '{}'",
            rows.len(),
            departures.len(),
            station_name
        );
        if station_name == self.config.station {
            self.phase = BoardPhase::Ready;
        }
        self.views.insert(station_name, rows);
        vec![Effect::Refresh]
    }

    /// The departures poll request for this board.
    pub fn departures_request(&self) -> OutboundRequest {
        OutboundRequest::RequestDepartures {
            configuration: self.config.clone(),
        }
    }

    /// Station name, prefixed by the configured header label.
    pub fn header(&self) -> String {
        if self.station.name.is_empty()
            && self.station.resolved_name.as_deref().unwrap_or_default().is_empty()
        {
            return String::new();
        }
        match self.config.header.as_deref() {
            Some(label) if !label.is_empty() => {
                format!("{}: {}", label, self.station.display_name())
            }
            _ => self.station.display_name().to_string(),
        }
    }

    pub fn render_output(&self) -> RenderOutput {
        let body = if !self.config.has_station() {
            BoardBody::Placeholder(Placeholder::Unconfigured)
        } else {
            match self.views.get(&self.config.station) {
                Some(rows) => BoardBody::Rows(rows.clone()),
                None => BoardBody::Placeholder(Placeholder::Loading),
            }
        };
        RenderOutput {
            instance: self.instance,
            header: self.header(),
            body,
        }
    }
}
