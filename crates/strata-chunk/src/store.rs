use hashbrown::HashMap;
use strata_geom::{ChunkPos, Grid, LocalPos, TilePos};
use strata_tiles::{TerrainKey, TileMeta, TileRef};

use crate::{ChunkData, ChunkError, TileRecord};

/// Resident chunks keyed by coordinate. At most one `ChunkData` per coordinate.
pub struct ChunkStore {
    grid: Grid,
    layer_count: usize,
    chunks: HashMap<ChunkPos, ChunkData>,
}

impl ChunkStore {
    pub fn new(grid: Grid, layer_count: usize) -> Self {
        Self {
            grid,
            layer_count,
            chunks: HashMap::new(),
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// A fresh, empty chunk shaped for this store. Not inserted.
    pub fn allocate(&self, coord: ChunkPos) -> ChunkData {
        ChunkData::new(coord, self.grid.chunk_size, self.layer_count)
    }

    /// Inserts `chunk`, returning the one it replaced, if any.
    pub fn insert(&mut self, chunk: ChunkData) -> Option<ChunkData> {
        self.chunks.insert(chunk.coord, chunk)
    }

    pub fn remove(&mut self, coord: ChunkPos) -> Option<ChunkData> {
        self.chunks.remove(&coord)
    }

    #[inline]
    pub fn contains(&self, coord: ChunkPos) -> bool {
        self.chunks.contains_key(&coord)
    }

    #[inline]
    pub fn get(&self, coord: ChunkPos) -> Option<&ChunkData> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn get_mut(&mut self, coord: ChunkPos) -> Option<&mut ChunkData> {
        self.chunks.get_mut(&coord)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChunkData> {
        self.chunks.values_mut()
    }

    #[inline]
    pub fn locate(&self, tile: TilePos) -> (ChunkPos, LocalPos) {
        self.grid.split(tile)
    }

    /// Record at a global tile, `None` when its chunk is not resident.
    pub fn tile_at(&self, tile: TilePos, layer: usize) -> Option<TileRecord> {
        let (c, l) = self.locate(tile);
        self.chunks.get(&c).map(|chunk| chunk.get_tile(l, layer))
    }

    /// Terrain at a global tile; non-resident cells read as no terrain.
    pub fn terrain_at<M: TileMeta + ?Sized>(
        &self,
        tile: TilePos,
        layer: usize,
        meta: &M,
    ) -> Option<TerrainKey> {
        let (c, l) = self.locate(tile);
        self.chunks.get(&c)?.get_terrain(l, layer, meta)
    }

    /// Write at a global tile; a non-resident chunk is reported.
    pub fn set_tile_at(
        &mut self,
        tile: TilePos,
        layer: usize,
        value: Option<TileRef>,
        mark_modified: bool,
    ) -> Result<(), ChunkError> {
        let (c, l) = self.locate(tile);
        match self.chunks.get_mut(&c) {
            Some(chunk) => chunk.set_tile(l, layer, value, mark_modified),
            None => {
                let e = ChunkError::MissingChunk(c);
                log::warn!(target: "chunk", "set_tile_at {tile:?}: {e}");
                Err(e)
            }
        }
    }
}
