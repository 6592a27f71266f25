use std::collections::VecDeque;

use strata_chunk::ChunkData;
use strata_geom::ChunkPos;

use crate::context::WorldContext;
use crate::event::WorldEvent;
use crate::render::Renderer;
use crate::streamer::Streamer;

/// Deferred attach/detach work produced by the streamer.
pub enum Handoff {
    Attach(ChunkData),
    Detach(ChunkPos),
    /// The first window settled without a final attach (its last loads went stale).
    Ready,
}

/// FIFO of hand-offs, applied at one point per tick.
#[derive(Default)]
pub struct HandoffQueue {
    pending: VecDeque<Handoff>,
}

impl HandoffQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, h: Handoff) {
        self.pending.push_back(h);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Applies everything queued, in order. Returns how many hand-offs ran.
    pub fn apply(
        &mut self,
        ctx: &mut WorldContext,
        renderer: &mut dyn Renderer,
        streamer: &mut Streamer,
    ) -> usize {
        let mut n = 0;
        while let Some(h) = self.pending.pop_front() {
            n += 1;
            match h {
                Handoff::Attach(chunk) => {
                    let coord = chunk.coord;
                    if !ctx.attach(chunk) {
                        log::debug!(target: "stream", "chunk {},{} already attached", coord.x, coord.y);
                        continue;
                    }
                    if let Some(chunk) = ctx.store().get(coord) {
                        renderer.attach(chunk);
                    }
                    if ctx.refreshes_seams() {
                        ctx.refresh_seams(coord);
                    }
                    ctx.emit(WorldEvent::ChunkLoaded(coord));
                    if streamer.settle(coord) {
                        log::info!(target: "stream", "initial window attached");
                        ctx.emit(WorldEvent::WorldReady);
                    }
                }
                Handoff::Detach(coord) => {
                    if ctx.detach(coord) {
                        renderer.detach(coord);
                    }
                    ctx.emit(WorldEvent::ChunkUnloaded(coord));
                }
                Handoff::Ready => {
                    log::info!(target: "stream", "initial window settled");
                    ctx.emit(WorldEvent::WorldReady);
                }
            }
        }
        n
    }
}
