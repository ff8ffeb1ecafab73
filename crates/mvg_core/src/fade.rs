use crate::BoardConfig;

/// Opacity of the row in slot `index` (0-based) of the board.
///
/// Rows before `max_entries * fade_point` are fully opaque; after that the
/// opacity decays linearly towards 0 at `max_entries`. A zero-length fade
/// window (`fade_point == 1`) keeps every row opaque.
pub fn fade_opacity(index: usize, config: &BoardConfig) -> f64 {
    let max_entries = config.max_entries as f64;
    let fade_start = max_entries * config.fade_point;
    let fade_steps = max_entries - fade_start;
    let index = index as f64;

    if !config.fade || index < fade_start || fade_steps <= 0.0 {
        return 1.0;
    }
    (1.0 - (index - fade_start) / fade_steps).clamp(0.0, 1.0)
}
