use std::path::PathBuf;

use rand::Rng;

use crate::error::{ReelError, ReelResult};

/// Canvas, timing and fade parameters shared by every render a
/// [`crate::Renderer`] instance produces. Defaults describe the standard
/// 9:16 vertical short: 1080x1920 at 30 fps, 30 seconds, 1 second fades.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderSpec {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_sec: u32,
    pub fade_sec: f64,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
            duration_sec: 30,
            fade_sec: 1.0,
        }
    }
}

impl RenderSpec {
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("canvas width/height must be > 0"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p output requires even dimensions.
            return Err(ReelError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        if self.fps == 0 {
            return Err(ReelError::validation("fps must be > 0"));
        }
        if self.duration_sec == 0 {
            return Err(ReelError::validation("duration_sec must be > 0"));
        }
        if !self.fade_sec.is_finite() || self.fade_sec < 0.0 {
            return Err(ReelError::validation("fade_sec must be finite and >= 0"));
        }
        if self.fade_sec * 2.0 > f64::from(self.duration_sec) {
            return Err(ReelError::validation(
                "fade_sec too long: fade-in plus fade-out must fit in duration_sec",
            ));
        }
        Ok(())
    }

    pub fn total_frames(&self) -> u32 {
        self.duration_sec * self.fps
    }

    /// Start time of the fade-out, shared by the video and audio chains.
    pub fn fade_out_start(&self) -> f64 {
        f64::from(self.duration_sec) - self.fade_sec
    }
}

/// Parameters for the Ken Burns slow-zoom / pan effect.
///
/// `zoom_start` and `zoom_end` are fill-scale multipliers (1.0 = exactly
/// fill the canvas). Zoom never decreases over time in this design;
/// constant zoom is the `zoom_start == zoom_end` case. Drifts are signed
/// pixel pan distances over the full clip duration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct KenBurnsConfig {
    pub zoom_start: f64,
    pub zoom_end: f64,
    pub x_drift_px: i32,
    pub y_drift_px: i32,
    /// Reserved: smoothstep easing toward the endpoints.
    pub ease: bool,
}

impl Default for KenBurnsConfig {
    fn default() -> Self {
        Self {
            zoom_start: 1.0,
            zoom_end: 1.08,
            x_drift_px: 0,
            y_drift_px: 0,
            ease: true,
        }
    }
}

impl KenBurnsConfig {
    pub fn validate(&self) -> ReelResult<()> {
        if !self.zoom_start.is_finite() || !self.zoom_end.is_finite() {
            return Err(ReelError::validation("zoom factors must be finite"));
        }
        if self.zoom_start < 1.0 {
            return Err(ReelError::validation("zoom_start must be >= 1.0"));
        }
        if self.zoom_end < self.zoom_start {
            return Err(ReelError::validation("zoom_end must be >= zoom_start"));
        }
        Ok(())
    }

    /// A randomized configuration for visual variety: a slow zoom in the
    /// 1.0..1.12 range plus a small pan drift. The RNG is injected so
    /// callers (and tests) control reproducibility.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            zoom_start: round3(rng.gen_range(1.0..1.04)),
            zoom_end: round3(rng.gen_range(1.06..1.12)),
            x_drift_px: rng.gen_range(-30..=30),
            y_drift_px: rng.gen_range(-20..=20),
            ease: true,
        }
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Visual parameters for the centred quote overlay drawn with ffmpeg's
/// `drawtext` filter. Colors are ffmpeg color expressions ("white",
/// "black@0.45", ...). When `font_path` is absent or does not exist on
/// disk the tool's built-in default font is used silently.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TextConfig {
    pub text: String,
    pub font_path: Option<PathBuf>,
    pub font_size: u32,
    pub font_color: String,
    /// Draw a semi-transparent backdrop box behind each line.
    pub box_enabled: bool,
    pub box_color: String,
    /// Padding in pixels around the text within the box.
    pub box_border: u32,
    /// Extra vertical pixels between wrapped lines.
    pub line_spacing: u32,
    /// Characters per line before the wrapper inserts a break.
    pub max_chars: usize,
}

impl TextConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_path: None,
            font_size: 68,
            font_color: "white".to_string(),
            box_enabled: true,
            box_color: "black@0.45".to_string(),
            box_border: 28,
            line_spacing: 12,
            max_chars: 28,
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.font_size == 0 {
            return Err(ReelError::validation("font_size must be > 0"));
        }
        if self.max_chars == 0 {
            return Err(ReelError::validation("max_chars must be > 0"));
        }
        Ok(())
    }
}

/// Outcome of a single render call. Constructed once, never mutated; the
/// orchestrator decides whether to log, retry or skip.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderResult {
    pub output_path: PathBuf,
    pub success: bool,
    pub duration_sec: u32,
    pub width: u32,
    pub height: u32,
    /// Size of the output file in megabytes (0.0 on failure).
    pub file_size_mb: f64,
    /// Diagnostic for a failed render; `None` on success.
    pub error_message: Option<String>,
}

impl RenderResult {
    pub(crate) fn succeeded(output_path: PathBuf, spec: &RenderSpec, file_size_mb: f64) -> Self {
        Self {
            output_path,
            success: true,
            duration_sec: spec.duration_sec,
            width: spec.width,
            height: spec.height,
            file_size_mb,
            error_message: None,
        }
    }

    pub(crate) fn failed(output_path: PathBuf, spec: &RenderSpec, message: String) -> Self {
        Self {
            output_path,
            success: false,
            duration_sec: spec.duration_sec,
            width: spec.width,
            height: spec.height,
            file_size_mb: 0.0,
            error_message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_spec_is_valid() {
        assert!(RenderSpec::default().validate().is_ok());
    }

    #[test]
    fn spec_validation_catches_bad_values() {
        let mut spec = RenderSpec {
            width: 1081,
            ..RenderSpec::default()
        };
        assert!(spec.validate().is_err());

        spec = RenderSpec {
            fps: 0,
            ..RenderSpec::default()
        };
        assert!(spec.validate().is_err());

        spec = RenderSpec {
            fade_sec: 20.0,
            ..RenderSpec::default()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn total_frames_for_standard_spec() {
        let spec = RenderSpec::default();
        assert_eq!(spec.total_frames(), 900);
    }

    #[test]
    fn ken_burns_validation() {
        assert!(KenBurnsConfig::default().validate().is_ok());

        let shrink = KenBurnsConfig {
            zoom_start: 1.2,
            zoom_end: 1.0,
            ..KenBurnsConfig::default()
        };
        assert!(shrink.validate().is_err());

        let sub_fill = KenBurnsConfig {
            zoom_start: 0.8,
            ..KenBurnsConfig::default()
        };
        assert!(sub_fill.validate().is_err());
    }

    #[test]
    fn random_ken_burns_is_seeded_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = KenBurnsConfig::random(&mut rng);
        let mut rng = StdRng::seed_from_u64(7);
        let b = KenBurnsConfig::random(&mut rng);

        assert_eq!(a.zoom_start, b.zoom_start);
        assert_eq!(a.zoom_end, b.zoom_end);
        assert_eq!(a.x_drift_px, b.x_drift_px);
        assert_eq!(a.y_drift_px, b.y_drift_px);

        assert!(a.validate().is_ok());
        assert!((1.0..=1.04).contains(&a.zoom_start));
        assert!((1.06..=1.12).contains(&a.zoom_end));
        assert!((-30..=30).contains(&a.x_drift_px));
        assert!((-20..=20).contains(&a.y_drift_px));
    }

    #[test]
    fn result_constructors_fill_spec_fields() {
        let spec = RenderSpec::default();
        let ok = RenderResult::succeeded(PathBuf::from("out/a.mp4"), &spec, 4.2);
        assert!(ok.success);
        assert_eq!(ok.width, 1080);
        assert_eq!(ok.height, 1920);
        assert!(ok.error_message.is_none());

        let bad = RenderResult::failed(PathBuf::from("out/a.mp4"), &spec, "nope".into());
        assert!(!bad.success);
        assert_eq!(bad.file_size_mb, 0.0);
        assert_eq!(bad.error_message.as_deref(), Some("nope"));
    }
}
