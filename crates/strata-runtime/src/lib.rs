//! Chunk streaming, generation workers, render hand-off and the world context.
#![forbid(unsafe_code)]

mod agents;
mod context;
mod event;
mod handoff;
mod pool;
mod render;
mod streamer;

pub use agents::{AgentApi, AgentId, AgentInfo, Agents, DEFAULT_SPEED, MoveDir};
pub use context::WorldContext;
pub use event::{WorldEvent, channel};
pub use handoff::{Handoff, HandoffQueue};
pub use pool::GenPool;
pub use render::{MirrorRenderer, Renderer};
pub use streamer::{Batch, Streamer, window};

use serde::Deserialize;

/// `[stream]` table of the driver config.
#[derive(Clone, Debug, Deserialize)]
pub struct StreamConfig {
    /// Chebyshev radius, in chunks, kept resident around the focus chunk.
    #[serde(default = "default_range")]
    pub range: i32,
    #[serde(default = "default_true")]
    pub revalidate: bool,
    #[serde(default)]
    pub refresh_seams: bool,
    /// Generation threads; 0 picks one per core.
    #[serde(default)]
    pub workers: usize,
}

fn default_range() -> i32 {
    2
}
fn default_true() -> bool {
    true
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            range: default_range(),
            revalidate: true,
            refresh_seams: false,
            workers: 0,
        }
    }
}
