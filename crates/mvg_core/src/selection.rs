use crate::{BoardConfig, Departure};

/// Departures in display order.
///
/// With `add_delay` the delay is folded into each departure time and the
/// list is sorted by that adjusted time; otherwise the backend order is kept.
pub fn ordered(departures: &[Departure], config: &BoardConfig) -> Vec<Departure> {
    let mut out: Vec<Departure> = departures.to_vec();
    if config.add_delay {
        for departure in out.iter_mut() {
            departure.departure_time = departure.adjusted_time();
        }
        out.sort_by_key(|departure| departure.departure_time);
    }
    out
}

/// Whether the vehicle type, destination and line filters let a departure through.
pub fn admits(departure: &Departure, config: &BoardConfig) -> bool {
    config.shows_transport_type(&departure.product)
        && !config.ignore_stations.contains(&departure.destination)
        && config.line_filtering.admits(&departure.label)
}

/// The departures that make it onto the board, at most `max_entries` of them.
pub fn select_visible(departures: &[Departure], config: &BoardConfig) -> Vec<Departure> {
    ordered(departures, config)
        .into_iter()
        .filter(|departure| admits(departure, config))
        .take(config.max_entries)
        .collect()
}
