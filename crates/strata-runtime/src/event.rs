use crossbeam_channel::{Receiver, Sender, unbounded};
use strata_geom::{ChunkPos, TilePos};

/// Notifications raised by the world context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    /// Every chunk of the first streaming window is attached. Raised once.
    WorldReady,
    ChunkLoaded(ChunkPos),
    /// Raised for every unload hand-off, even when the chunk was already gone.
    ChunkUnloaded(ChunkPos),
    /// A cell changed on some layer; carries the global tile.
    TileChanged(TilePos),
}

pub fn channel() -> (Sender<WorldEvent>, Receiver<WorldEvent>) {
    unbounded()
}

pub(crate) fn log_event(tick: u64, ev: &WorldEvent) {
    match ev {
        WorldEvent::WorldReady => {
            log::info!(target: "events", "[tick {}] WorldReady", tick);
        }
        WorldEvent::ChunkLoaded(c) => {
            log::debug!(target: "events", "[tick {}] ChunkLoaded {},{}", tick, c.x, c.y);
        }
        WorldEvent::ChunkUnloaded(c) => {
            log::debug!(target: "events", "[tick {}] ChunkUnloaded {},{}", tick, c.x, c.y);
        }
        WorldEvent::TileChanged(t) => {
            log::trace!(target: "events", "[tick {}] TileChanged {},{}", tick, t.x, t.y);
        }
    }
}
