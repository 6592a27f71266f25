use std::collections::VecDeque;

use hashbrown::HashSet;
use strata_geom::{ChunkPos, Grid, Vec2};
use strata_world::Generator;

use crate::context::WorldContext;
use crate::handoff::{Handoff, HandoffQueue};
use crate::pool::GenPool;

/// One evaluation's worth of streaming work.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch {
    pub load: Vec<ChunkPos>,
    pub unload: Vec<ChunkPos>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.load.is_empty() && self.unload.is_empty()
    }
}

/// Chebyshev square of `range` around `center`, nearest rings first.
pub fn window(center: ChunkPos, range: i32) -> Vec<ChunkPos> {
    let r = range.max(0);
    let mut out = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    for dy in -r..=r {
        for dx in -r..=r {
            out.push(center.offset(dx, dy));
        }
    }
    out.sort_by_key(|c| (c.chebyshev(center), c.y, c.x));
    out
}

/// Tracks the wanted window around a focus point and turns focus moves
/// into load/unload batches, drained one per tick.
pub struct Streamer {
    range: i32,
    revalidate: bool,
    focus: Option<ChunkPos>,
    // Coordinates the latest evaluation wants resident.
    wanted: HashSet<ChunkPos>,
    batches: VecDeque<Batch>,
    // First window's coordinates not yet attached (or dropped).
    initial: HashSet<ChunkPos>,
    world_ready: bool,
}

impl Streamer {
    pub fn new(range: i32) -> Self {
        Self {
            range: range.max(0),
            revalidate: true,
            focus: None,
            wanted: HashSet::new(),
            batches: VecDeque::new(),
            initial: HashSet::new(),
            world_ready: false,
        }
    }

    /// When on, `drain` drops loads no longer wanted or already resident,
    /// and unloads wanted again.
    pub fn with_revalidation(mut self, on: bool) -> Self {
        self.revalidate = on;
        self
    }

    #[inline]
    pub fn focus(&self) -> Option<ChunkPos> {
        self.focus
    }

    #[inline]
    pub fn queued(&self) -> usize {
        self.batches.len()
    }

    #[inline]
    pub fn is_world_ready(&self) -> bool {
        self.world_ready
    }

    /// Recomputes the window when the focus enters a new chunk and queues
    /// the difference against the previous window.
    pub fn evaluate(&mut self, focus_px: Vec2, grid: &Grid) -> Option<&Batch> {
        let center = grid.pixel_to_chunk(focus_px);
        if self.focus == Some(center) {
            return None;
        }
        let first = self.focus.is_none();
        self.focus = Some(center);

        let coords = window(center, self.range);
        let wanted: HashSet<ChunkPos> = coords.iter().copied().collect();
        let load: Vec<ChunkPos> = coords
            .into_iter()
            .filter(|c| !self.wanted.contains(c))
            .collect();
        let mut unload: Vec<ChunkPos> = self
            .wanted
            .iter()
            .filter(|c| !wanted.contains(*c))
            .copied()
            .collect();
        unload.sort_by_key(|c| (c.y, c.x));
        self.wanted = wanted;

        if first {
            self.initial = load.iter().copied().collect();
        }
        log::info!(
            target: "stream",
            "focus chunk {},{}: {} to load, {} to unload",
            center.x,
            center.y,
            load.len(),
            unload.len()
        );
        self.batches.push_back(Batch { load, unload });
        self.batches.back()
    }

    /// Pops one batch, generates its loads on the pool and queues the
    /// hand-offs. Returns false when nothing was queued.
    pub fn drain(
        &mut self,
        ctx: &WorldContext,
        pool: &GenPool,
        generator: &dyn Generator,
        queue: &mut HandoffQueue,
    ) -> bool {
        let Some(mut batch) = self.batches.pop_front() else {
            return false;
        };
        if self.revalidate {
            let mut stale = Vec::new();
            batch.load.retain(|c| {
                let keep = self.wanted.contains(c);
                if !keep {
                    stale.push(*c);
                }
                keep
            });
            let loads = batch.load.len();
            batch.load.retain(|c| !ctx.store().contains(*c));
            let resident = loads - batch.load.len();
            let before = batch.unload.len();
            batch.unload.retain(|c| !self.wanted.contains(c));
            if !stale.is_empty() || resident > 0 || before != batch.unload.len() {
                log::debug!(
                    target: "stream",
                    "dropped {} stale loads, {} already resident, {} stale unloads",
                    stale.len(),
                    resident,
                    before - batch.unload.len()
                );
            }
            for c in stale {
                if self.settle(c) {
                    queue.push(Handoff::Ready);
                }
            }
        }

        let chunks = pool.generate(&batch.load, ctx.store(), generator, ctx.lookup());
        for chunk in chunks {
            queue.push(Handoff::Attach(chunk));
        }
        for c in batch.unload {
            queue.push(Handoff::Detach(c));
        }
        true
    }

    /// Marks a first-window coordinate as done. True exactly once: when the
    /// last of them settles.
    pub(crate) fn settle(&mut self, coord: ChunkPos) -> bool {
        if self.world_ready || !self.initial.remove(&coord) || !self.initial.is_empty() {
            return false;
        }
        self.world_ready = true;
        true
    }
}
