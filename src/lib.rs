#![forbid(unsafe_code)]

pub mod command;
pub mod error;
pub mod exec;
pub mod filtergraph;
pub mod kenburns;
pub mod model;
pub mod probe;
pub mod renderer;
pub mod textlayout;

pub use error::{ReelError, ReelResult};
pub use filtergraph::Strategy;
pub use model::{KenBurnsConfig, RenderResult, RenderSpec, TextConfig};
pub use renderer::{FramePrep, Renderer};
