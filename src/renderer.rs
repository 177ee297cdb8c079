//! The renderer: owns the probed capability tier and the chosen
//! strategy, assembles one command per render call, executes it with a
//! bounded wait and classifies the outcome into a [`RenderResult`].
//! Render calls are independent and share no mutable state, so one
//! renderer may serve concurrent callers; it imposes no limit on how
//! many encoder processes run at once.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::Context as _;
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::command::{self, RenderJob};
use crate::error::{ReelError, ReelResult};
use crate::exec::{self, Outcome};
use crate::filtergraph::Strategy;
use crate::model::{KenBurnsConfig, RenderResult, RenderSpec, TextConfig};
use crate::probe;

/// Wall-clock budget as a multiple of the target clip duration; generous
/// headroom for slow hardware.
const TIMEOUT_FACTOR: u32 = 15;
/// How much of the tool's stderr a failed result carries.
const STDERR_TAIL_CHARS: usize = 600;

/// Optional input-preparation hook, e.g. a collaborator that composites
/// a quote card over the background before encoding. It receives a
/// scratch directory scoped to the render call (removed on every exit
/// path) and returns the image the encoder should consume. Any error is
/// reported as a failed result, never thrown.
pub trait FramePrep: Send + Sync {
    fn prepare(&self, background: &Path, scratch: &Path) -> anyhow::Result<PathBuf>;
}

pub struct Renderer {
    output_dir: PathBuf,
    ffmpeg_path: String,
    spec: RenderSpec,
    tier: u32,
    strategy: Strategy,
    timeout: Duration,
    frame_prep: Option<Box<dyn FramePrep>>,
}

impl Renderer {
    /// Renderer with the standard vertical-short spec and `ffmpeg` from
    /// PATH.
    pub fn new(output_dir: impl Into<PathBuf>) -> ReelResult<Self> {
        Self::with_spec(output_dir, "ffmpeg", RenderSpec::default())
    }

    /// Probes the tool once and fails fast with
    /// [`ReelError::EnvironmentMissing`] when the binary cannot be
    /// spawned; every later failure is a failed [`RenderResult`] instead.
    pub fn with_spec(
        output_dir: impl Into<PathBuf>,
        ffmpeg_path: impl Into<String>,
        spec: RenderSpec,
    ) -> ReelResult<Self> {
        spec.validate()?;

        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("failed to create output directory '{}'", output_dir.display())
        })?;

        let ffmpeg_path = ffmpeg_path.into();
        let banner = probe::version_banner(&ffmpeg_path).map_err(|e| {
            ReelError::environment_missing(format!(
                "ffmpeg not found at '{ffmpeg_path}': {e}. Install ffmpeg and ensure it is on \
                 PATH, or pass a full binary path."
            ))
        })?;
        let tier = probe::parse_tier(&banner);

        let strategy = Strategy::for_tier(tier);
        match strategy {
            Strategy::KenBurns => {
                info!(tier, "ffmpeg detected, Ken Burns (zoompan) enabled");
            }
            Strategy::StillFrame => {
                warn!(
                    tier,
                    "ffmpeg too old or unversioned, falling back to still-frame strategy; \
                     upgrade ffmpeg for the zoom effect"
                );
            }
        }

        let timeout = Duration::from_secs(u64::from(spec.duration_sec) * u64::from(TIMEOUT_FACTOR));
        debug!(out = %output_dir.display(), fps = spec.fps, duration = spec.duration_sec, "renderer ready");

        Ok(Self {
            output_dir,
            ffmpeg_path,
            spec,
            tier,
            strategy,
            timeout,
            frame_prep: None,
        })
    }

    /// Install an input-preparation hook.
    pub fn with_frame_prep(mut self, prep: impl FramePrep + 'static) -> Self {
        self.frame_prep = Some(Box::new(prep));
        self
    }

    /// Override the wall-clock window for the encoder process. The
    /// default is 15x the target clip duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn spec(&self) -> &RenderSpec {
        &self.spec
    }

    pub fn tier(&self) -> u32 {
        self.tier
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Destination for a given run identifier. A previous partial file
    /// at this path is overwritten by the next attempt, never appended.
    pub fn output_path(&self, run_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{run_id}.{}", command::CONTAINER_EXT))
    }

    /// Render one clip. Blocks until the encoder exits or the timeout
    /// elapses. Never returns an error: every failure mode is a
    /// `RenderResult` with `success == false`.
    pub fn render(
        &self,
        run_id: &str,
        background: &Path,
        music: &Path,
        text: &TextConfig,
        ken_burns: Option<KenBurnsConfig>,
    ) -> RenderResult {
        let ken_burns = ken_burns.unwrap_or_default();
        let output_path = self.output_path(run_id);
        info!(run_id, out = %output_path.display(), "rendering");

        if let Err(e) = text.validate().and_then(|()| ken_burns.validate()) {
            return self.fail(output_path, format!("invalid render configuration: {e}"));
        }

        // Scratch space scoped to this call; dropped (and removed) on
        // every exit path below.
        let scratch = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                return self.fail(output_path, format!("failed to create scratch dir: {e}"));
            }
        };

        let background = match self.preflight(background, music, scratch.path()) {
            Ok(path) => path,
            Err(e) => {
                error!(run_id, "pre-flight failed: {e:#}");
                return self.fail(output_path, format!("pre-flight failed: {e:#}"));
            }
        };

        let args = command::build_args(&RenderJob {
            spec: &self.spec,
            strategy: self.strategy,
            background: &background,
            music,
            output: &output_path,
            text,
            ken_burns: &ken_burns,
        });
        debug!(run_id, cmd = %args.join(" "), "ffmpeg invocation");

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(&args);

        match exec::run(cmd, self.timeout) {
            Err(e) => self.fail(output_path, format!("ffmpeg subprocess error: {e}")),
            Ok(Outcome::TimedOut { limit }) => {
                let msg = format!("ffmpeg timed out after {}s", limit.as_secs());
                error!(run_id, "{msg}");
                self.fail(output_path, msg)
            }
            Ok(Outcome::Exited { status, stderr, .. }) => {
                if !status.success() {
                    let tail = exec::tail(&stderr, STDERR_TAIL_CHARS);
                    error!(run_id, code = status.code(), "ffmpeg failed: {tail}");
                    return self.fail(output_path, tail);
                }
                let Ok(meta) = fs::metadata(&output_path) else {
                    return self.fail(
                        output_path,
                        "ffmpeg exited successfully but produced no output file".to_string(),
                    );
                };
                let size_mb = round2(meta.len() as f64 / 1_048_576.0);
                info!(run_id, size_mb, "rendered");
                RenderResult::succeeded(output_path, &self.spec, size_mb)
            }
        }
    }

    /// Render with a randomized Ken Burns configuration for variety; the
    /// RNG is injected so callers control reproducibility.
    pub fn render_with_random_ken_burns(
        &self,
        run_id: &str,
        background: &Path,
        music: &Path,
        text: &TextConfig,
        rng: &mut impl Rng,
    ) -> RenderResult {
        let kb = KenBurnsConfig::random(rng);
        debug!(
            run_id,
            zoom_start = kb.zoom_start,
            zoom_end = kb.zoom_end,
            x_drift = kb.x_drift_px,
            y_drift = kb.y_drift_px,
            "randomized ken burns"
        );
        self.render(run_id, background, music, text, Some(kb))
    }

    /// Validate the inputs before the tool is invoked, and let the
    /// optional preparer substitute the background.
    fn preflight(
        &self,
        background: &Path,
        music: &Path,
        scratch: &Path,
    ) -> anyhow::Result<PathBuf> {
        anyhow::ensure!(
            background.is_file(),
            "background image '{}' does not exist",
            background.display()
        );
        anyhow::ensure!(
            music.is_file(),
            "music file '{}' does not exist",
            music.display()
        );
        image::image_dimensions(background).with_context(|| {
            format!(
                "background '{}' is not a decodable image",
                background.display()
            )
        })?;

        match &self.frame_prep {
            Some(prep) => prep.prepare(background, scratch),
            None => Ok(background.to_path_buf()),
        }
    }

    fn fail(&self, output_path: PathBuf, message: String) -> RenderResult {
        RenderResult::failed(output_path, &self.spec, message)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
