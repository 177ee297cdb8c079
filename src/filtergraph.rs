//! Filter-chain synthesis for the `-vf` / `-af` arguments. Two video
//! strategies exist; the active one is picked once per renderer from the
//! probed capability tier and never re-evaluated per call.

use crate::kenburns;
use crate::model::{KenBurnsConfig, RenderSpec, TextConfig};
use crate::probe::KEN_BURNS_MIN_TIER;
use crate::textlayout;

const SHADOW_COLOR: &str = "black@0.65";

/// Which video filter-graph the renderer emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Strategy {
    /// Modern builds: pre-scale, animated `zoompan`, drawtext, fades.
    KenBurns,
    /// Old or unversioned builds without usable `zoompan`: scale-to-cover
    /// plus center-crop, the same drawtext chain, the same fades.
    StillFrame,
}

impl Strategy {
    pub fn for_tier(tier: u32) -> Self {
        if tier >= KEN_BURNS_MIN_TIER {
            Self::KenBurns
        } else {
            Self::StillFrame
        }
    }
}

/// The complete `-vf` chain for one render.
pub fn video_filter(
    spec: &RenderSpec,
    strategy: Strategy,
    text: &TextConfig,
    ken_burns: &KenBurnsConfig,
) -> String {
    let head = match strategy {
        Strategy::KenBurns => ken_burns_head(spec, ken_burns),
        Strategy::StillFrame => cover_crop(spec.width, spec.height),
    };
    format!(
        "{head},{drawtext},{fades}",
        drawtext = drawtext_chain(text, spec.height),
        fades = video_fades(spec),
    )
}

/// The `-af` chain, shared by both strategies: trim to the target
/// duration, reset timestamps, fade in and out.
pub fn audio_filter(spec: &RenderSpec) -> String {
    format!(
        "atrim=0:{dur},asetpts=PTS-STARTPTS,afade=t=in:st=0:d={fade},afade=t=out:st={out}:d={fade}",
        dur = spec.duration_sec,
        fade = spec.fade_sec,
        out = spec.fade_out_start(),
    )
}

fn ken_burns_head(spec: &RenderSpec, cfg: &KenBurnsConfig) -> String {
    let total_frames = spec.total_frames();
    let (work_w, work_h) = kenburns::working_size(spec, cfg);
    format!(
        "{cover},zoompan=z={z}:x={x}:y={y}:d={total_frames}:s={w}x{h}:fps={fps}",
        cover = cover_crop(work_w, work_h),
        z = kenburns::zoom_expr(cfg, total_frames),
        x = kenburns::x_expr(cfg, total_frames),
        y = kenburns::y_expr(cfg, total_frames),
        w = spec.width,
        h = spec.height,
        fps = spec.fps,
    )
}

/// Scale to fill `w`x`h` and center-crop the overflow.
fn cover_crop(w: u32, h: u32) -> String {
    format!("scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}")
}

fn video_fades(spec: &RenderSpec) -> String {
    format!(
        "fade=t=in:st=0:d={fade},fade=t=out:st={out}:d={fade}",
        fade = spec.fade_sec,
        out = spec.fade_out_start(),
    )
}

/// One `drawtext` directive per wrapped line, vertically stacked around
/// the block anchor, horizontally centered by the tool itself. Empty text
/// collapses to a `null` pass-through.
fn drawtext_chain(cfg: &TextConfig, canvas_height: u32) -> String {
    let block = textlayout::layout_block(cfg, canvas_height);
    if block.lines.iter().all(|line| line.is_empty()) {
        return "null".to_string();
    }

    let font_arg = match &cfg.font_path {
        Some(path) if path.exists() => {
            format!(":fontfile='{}'", textlayout::font_file_arg(path))
        }
        _ => String::new(),
    };

    let box_arg = if cfg.box_enabled {
        format!(
            ":box=1:boxcolor={}:boxborderw={}",
            cfg.box_color, cfg.box_border
        )
    } else {
        String::new()
    };

    let directives: Vec<String> = block
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            format!(
                "drawtext=text='{text}'{font_arg}:fontsize={size}:fontcolor={color}\
                 :x=(w-text_w)/2:y={y}{box_arg}:shadowx=2:shadowy=2:shadowcolor={shadow}",
                text = textlayout::escape_drawtext(line),
                size = cfg.font_size,
                color = cfg.font_color,
                y = block.line_y(i),
                shadow = SHADOW_COLOR,
            )
        })
        .collect();

    directives.join(",")
}
