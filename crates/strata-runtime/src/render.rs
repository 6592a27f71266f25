use hashbrown::HashMap;
use strata_chunk::{ChunkData, TileChange};
use strata_geom::{ChunkPos, LocalPos, Size2};
use strata_tiles::TileRef;

/// Consumer of chunk buffers and per-frame changes.
pub trait Renderer {
    /// Called once per attached chunk, after it is fully generated.
    fn attach(&mut self, chunk: &ChunkData);
    /// Detaching an unknown coordinate is a no-op.
    fn detach(&mut self, coord: ChunkPos);
    fn apply(&mut self, coord: ChunkPos, change: &TileChange);
}

struct MirrorChunk {
    size: Size2,
    layers: Vec<Vec<Option<TileRef>>>,
}

impl MirrorChunk {
    fn index(&self, local: LocalPos) -> Option<usize> {
        self.size
            .contains(local)
            .then(|| (local.y * self.size.w + local.x) as usize)
    }
}

/// Headless renderer keeping a decoded copy of every attached layer.
#[derive(Default)]
pub struct MirrorRenderer {
    chunks: HashMap<ChunkPos, MirrorChunk>,
    applied: usize,
}

impl MirrorRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_attached(&self, coord: ChunkPos) -> bool {
        self.chunks.contains_key(&coord)
    }

    #[inline]
    pub fn attached(&self) -> usize {
        self.chunks.len()
    }

    /// Changes applied since creation.
    #[inline]
    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn tile(&self, coord: ChunkPos, local: LocalPos, layer: usize) -> Option<TileRef> {
        let chunk = self.chunks.get(&coord)?;
        let i = chunk.index(local)?;
        chunk.layers.get(layer)?[i]
    }
}

impl Renderer for MirrorRenderer {
    fn attach(&mut self, chunk: &ChunkData) {
        let cells = chunk.size.area();
        let layers = chunk
            .layers()
            .iter()
            .map(|buf| {
                let mut cells = vec![None; cells];
                for rec in buf.occupied() {
                    cells[(rec.local.y * chunk.size.w + rec.local.x) as usize] = rec.tile;
                }
                cells
            })
            .collect();
        self.chunks.insert(
            chunk.coord,
            MirrorChunk {
                size: chunk.size,
                layers,
            },
        );
    }

    fn detach(&mut self, coord: ChunkPos) {
        self.chunks.remove(&coord);
    }

    fn apply(&mut self, coord: ChunkPos, change: &TileChange) {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            log::debug!(target: "render", "change for detached chunk {coord:?} ignored");
            return;
        };
        let Some(i) = chunk.index(change.local) else {
            return;
        };
        if let Some(layer) = chunk.layers.get_mut(change.layer) {
            layer[i] = change.tile;
            self.applied += 1;
        }
    }
}
