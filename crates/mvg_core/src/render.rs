use std::collections::HashSet;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::disruption::{detail_text, is_affected};
use crate::fade::fade_opacity;
use crate::selection::select_visible;
use crate::timefmt::{RenderContext, format_time};
use crate::{BoardConfig, Departure, Disruption};

/// A departure line on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRow {
    pub product: String,
    /// Icon name (lower-cased product), present when icons are shown
    pub icon: Option<String>,
    pub icon_opacity: f64,
    pub line: String,
    pub line_color: Option<String>,
    pub destination: String,
    pub departure_time: Option<String>,
    pub walking_time: Option<String>,
    /// `"+N"` for a positive delay, empty when on time; absent when hidden
    pub delay: Option<String>,
    pub opacity: f64,
    pub affected: bool,
}

/// Disruption details inserted right after an affected departure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptionRow {
    pub text: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardRow {
    Departure(DepartureRow),
    Disruption(DisruptionRow),
}

impl BoardRow {
    pub fn opacity(&self) -> f64 {
        match self {
            BoardRow::Departure(row) => row.opacity,
            BoardRow::Disruption(row) => row.opacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placeholder {
    /// No station configured
    Unconfigured,
    /// Station configured, no departures received yet
    Loading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoardBody {
    Placeholder(Placeholder),
    Rows(Vec<BoardRow>),
}

/// Everything a view layer needs to draw the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub instance: uuid::Uuid,
    pub header: String,
    pub body: BoardBody,
}

impl RenderOutput {
    pub fn rows(&self) -> &[BoardRow] {
        match &self.body {
            BoardBody::Rows(rows) => rows,
            BoardBody::Placeholder(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        match self.body {
            BoardBody::Placeholder(placeholder) => Some(placeholder),
            BoardBody::Rows(_) => None,
        }
    }
}

/// Build the board rows for one departure snapshot.
pub fn render_rows(
    departures: &[Departure],
    disruptions: &[Disruption],
    config: &BoardConfig,
    ctx: &RenderContext,
) -> Vec<BoardRow> {
    let mut rows = Vec::new();
    let mut slots = 0;
    let mut seen_details: HashSet<String> = HashSet::new();

    // counted detail rows can only shorten the visible prefix
    for departure in select_visible(departures, config) {
        if slots >= config.max_entries {
            break;
        }

        let opacity = fade_opacity(slots, config);
        let affected = is_affected(&departure.label, disruptions);
        rows.push(BoardRow::Departure(departure_row(
            &departure,
            config,
            ctx,
            opacity,
            config.show_interruptions && affected,
        )));
        slots += 1;

        if !(config.show_interruptions_details && affected) {
            continue;
        }
        let text = detail_text(&departure.label, disruptions);
        if seen_details.contains(&text) {
            continue;
        }
        let detail_opacity = if config.count_interruptions_as_item_shown {
            if slots >= config.max_entries {
                continue;
            }
            let slot_opacity = fade_opacity(slots, config);
            slots += 1;
            slot_opacity
        } else {
            opacity
        };
        seen_details.insert(text.clone());
        rows.push(BoardRow::Disruption(DisruptionRow {
            text,
            opacity: detail_opacity,
        }));
    }
    rows
}

fn departure_row(
    departure: &Departure,
    config: &BoardConfig,
    ctx: &RenderContext,
    opacity: f64,
    affected: bool,
) -> DepartureRow {
    let departure_time = config.show_train_departure_time.then(|| {
        format_time(
            departure.departure_time,
            config.train_departure_time_format,
            ctx,
            config.language,
        )
    });
    let walking_time = config.show_walking_time.then(|| {
        let start_walking = TimeDelta::try_minutes(config.time_to_walk)
            .and_then(|walk| departure.departure_time.checked_sub_signed(walk))
            .unwrap_or(departure.departure_time);
        format_time(
            start_walking,
            config.walking_time_format,
            ctx,
            config.language,
        )
    });
    let delay = config.show_delay.then(|| match &departure.delay {
        Some(delay) if departure.delay_minutes() > 0 => format!("+{delay}"),
        _ => String::new(),
    });

    DepartureRow {
        product: departure.product.clone(),
        icon: config
            .show_icons
            .then(|| departure.product.to_lowercase()),
        icon_opacity: config.icon_opacity,
        line: departure.label.clone(),
        line_color: if config.show_line_colors {
            departure.line_background_color.clone()
        } else {
            None
        },
        destination: departure.destination.clone(),
        departure_time,
        walking_time,
        delay,
        opacity,
        affected,
    }
}
