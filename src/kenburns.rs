//! Ken Burns interpolation: per-frame zoom/position as `zoompan`
//! expression strings. The expressions are evaluated by ffmpeg once per
//! output frame during encoding; the host never resamples pixels itself.

use crate::model::{KenBurnsConfig, RenderSpec};

/// Extra scale headroom over `zoom_end` so the widest zoom state never
/// exposes empty canvas edges.
const SAFETY_MARGIN: f64 = 0.02;

/// Numeric zoom factor at `frame`, clamped at `zoom_end` to absorb
/// floating-point overshoot on the final frame. Non-decreasing in `frame`
/// whenever `zoom_end >= zoom_start`.
pub fn zoom_at(cfg: &KenBurnsConfig, frame: u32, total_frames: u32) -> f64 {
    let t = f64::from(frame) / f64::from(total_frames);
    (cfg.zoom_start + (cfg.zoom_end - cfg.zoom_start) * t).min(cfg.zoom_end)
}

/// The `z=` expression: a linear ramp from `zoom_start` to `zoom_end`
/// over `total_frames`, clamped with `min`. `on` is ffmpeg's output frame
/// counter.
pub fn zoom_expr(cfg: &KenBurnsConfig, total_frames: u32) -> String {
    format!(
        "'min({zs}+({ze}-{zs})*on/{total_frames},{ze})'",
        zs = cfg.zoom_start,
        ze = cfg.zoom_end,
    )
}

/// The `x=` expression: horizontal center plus an optional linear drift.
pub fn x_expr(cfg: &KenBurnsConfig, total_frames: u32) -> String {
    if cfg.x_drift_px != 0 {
        format!("'(iw-ow)/2+{}*on/{total_frames}'", cfg.x_drift_px)
    } else {
        "'(iw-ow)/2'".to_string()
    }
}

/// The `y=` expression: vertical center plus an optional linear drift.
pub fn y_expr(cfg: &KenBurnsConfig, total_frames: u32) -> String {
    if cfg.y_drift_px != 0 {
        format!("'(ih-oh)/2+{}*on/{total_frames}'", cfg.y_drift_px)
    } else {
        "'(ih-oh)/2'".to_string()
    }
}

/// Working size the source still is pre-scaled to before animation:
/// canvas times `max(zoom_end, 1.0)` plus the safety margin, truncated to
/// the nearest even integer (encoder pixel formats require even
/// dimensions).
pub fn working_size(spec: &RenderSpec, cfg: &KenBurnsConfig) -> (u32, u32) {
    let factor = cfg.zoom_end.max(1.0) + SAFETY_MARGIN;
    (
        even(f64::from(spec.width) * factor),
        even(f64::from(spec.height) * factor),
    )
}

fn even(v: f64) -> u32 {
    (v / 2.0) as u32 * 2
}
