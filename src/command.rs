//! Assembly of the flat ffmpeg argument vector for one render. The
//! vector is deterministic for identical inputs so a regression suite
//! can compare it byte for byte against a known-good invocation.

use std::path::Path;

use crate::filtergraph::{self, Strategy};
use crate::model::{KenBurnsConfig, RenderSpec, TextConfig};

pub const VIDEO_CODEC: &str = "libx264";
pub const VIDEO_PRESET: &str = "medium";
/// Quality-based rate control; 18 is conventionally "visually lossless".
pub const VIDEO_CRF: u32 = 18;
pub const AUDIO_CODEC: &str = "aac";
pub const AUDIO_BITRATE: &str = "192k";
/// 8-bit 4:2:0 for the broadest player compatibility.
pub const PIXEL_FORMAT: &str = "yuv420p";
pub const CONTAINER_EXT: &str = "mp4";

/// Everything the argument vector is built from. Paths are passed
/// through verbatim; filter strings are synthesized from the configs.
pub struct RenderJob<'a> {
    pub spec: &'a RenderSpec,
    pub strategy: Strategy,
    pub background: &'a Path,
    pub music: &'a Path,
    pub output: &'a Path,
    pub text: &'a TextConfig,
    pub ken_burns: &'a KenBurnsConfig,
}

/// The ordered argument list (everything after the binary path):
/// overwrite the destination, loop the still as a synthetic video
/// source, cap the processed duration, apply both filter chains, fixed
/// encoding parameters, stop at the shorter input stream (a safety net
/// over the explicit cap for over-length audio), faststart layout.
pub fn build_args(job: &RenderJob<'_>) -> Vec<String> {
    let vf = filtergraph::video_filter(job.spec, job.strategy, job.text, job.ken_burns);
    let af = filtergraph::audio_filter(job.spec);

    let mut args: Vec<String> = Vec::with_capacity(32);
    let mut push = |s: &str| args.push(s.to_string());

    push("-y");
    push("-loop");
    push("1");
    push("-i");
    push(&job.background.to_string_lossy());
    push("-i");
    push(&job.music.to_string_lossy());
    push("-t");
    push(&job.spec.duration_sec.to_string());
    push("-vf");
    push(&vf);
    push("-af");
    push(&af);
    push("-c:v");
    push(VIDEO_CODEC);
    push("-preset");
    push(VIDEO_PRESET);
    push("-crf");
    push(&VIDEO_CRF.to_string());
    push("-c:a");
    push(AUDIO_CODEC);
    push("-b:a");
    push(AUDIO_BITRATE);
    push("-pix_fmt");
    push(PIXEL_FORMAT);
    push("-r");
    push(&job.spec.fps.to_string());
    push("-shortest");
    push("-movflags");
    push("+faststart");
    push(&job.output.to_string_lossy());

    args
}
