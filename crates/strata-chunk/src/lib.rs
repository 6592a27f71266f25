//! Per-chunk layered tile buffers and the resident chunk store.
#![forbid(unsafe_code)]

mod buffer;
mod store;

pub use buffer::{HEADER_LEN, RECORD_LEN, TileBuffer, TileRecord};
pub use store::ChunkStore;

use strata_geom::{ChunkPos, LocalPos, Size2};
use strata_tiles::{AtlasCoord, TerrainKey, TerrainType, TileMeta, TileRef};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    #[error("local {local:?} is outside chunk {coord:?} of size {size:?}")]
    OutOfRange {
        coord: ChunkPos,
        local: LocalPos,
        size: Size2,
    },
    #[error("layer {layer} is outside chunk {coord:?} with {count} layers")]
    LayerOutOfRange {
        coord: ChunkPos,
        layer: usize,
        count: usize,
    },
    #[error("chunk {0:?} is not resident")]
    MissingChunk(ChunkPos),
    #[error("no default tile registered for type {0:?}")]
    UnknownType(TerrainType),
    #[error("tile buffer holds {got} bytes, expected {expected}")]
    BadLength { expected: usize, got: usize },
}

/// A cell write recorded for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileChange {
    pub local: LocalPos,
    pub layer: usize,
    pub tile: Option<TileRef>,
}

/// Tile layers of one chunk plus its change-tracking state.
#[derive(Clone, Debug)]
pub struct ChunkData {
    pub coord: ChunkPos,
    pub size: Size2,
    layers: Vec<TileBuffer>,
    // Once set, never cleared; marks the chunk as diverged from generation.
    modified: bool,
    // False while the generator fills the chunk; writes are only queued afterwards.
    updatable: bool,
    pending: Vec<TileChange>,
}

impl ChunkData {
    pub fn new(coord: ChunkPos, size: Size2, layer_count: usize) -> Self {
        Self {
            coord,
            size,
            layers: (0..layer_count).map(|_| TileBuffer::new(size)).collect(),
            modified: false,
            updatable: false,
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layer(&self, layer: usize) -> Option<&TileBuffer> {
        self.layers.get(layer)
    }

    #[inline]
    pub fn layers(&self) -> &[TileBuffer] {
        &self.layers
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn is_updatable(&self) -> bool {
        self.updatable
    }

    /// Called once the chunk has been generated and handed to the renderer.
    #[inline]
    pub fn mark_updatable(&mut self) {
        self.updatable = true;
    }

    #[inline]
    pub fn contains(&self, local: LocalPos) -> bool {
        self.size.contains(local)
    }

    fn check(&self, local: LocalPos, layer: usize) -> Result<(), ChunkError> {
        if layer >= self.layers.len() {
            return Err(ChunkError::LayerOutOfRange {
                coord: self.coord,
                layer,
                count: self.layers.len(),
            });
        }
        if !self.contains(local) {
            return Err(ChunkError::OutOfRange {
                coord: self.coord,
                local,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Bounds-checked write. Out-of-range input is reported and leaves the chunk untouched.
    pub fn set_tile(
        &mut self,
        local: LocalPos,
        layer: usize,
        tile: Option<TileRef>,
        mark_modified: bool,
    ) -> Result<(), ChunkError> {
        if let Err(e) = self.check(local, layer) {
            log::warn!(target: "chunk", "set_tile: {e}");
            return Err(e);
        }
        self.layers[layer].write(local, tile);
        if mark_modified {
            self.modified = true;
        }
        if self.updatable {
            self.pending.push(TileChange { local, layer, tile });
        }
        Ok(())
    }

    pub fn try_get_tile(&self, local: LocalPos, layer: usize) -> Result<TileRecord, ChunkError> {
        self.check(local, layer)?;
        Ok(self.layers[layer]
            .read(local)
            .unwrap_or(TileRecord::empty(local)))
    }

    /// Bounds-checked read; out-of-range input is reported and yields an empty record.
    pub fn get_tile(&self, local: LocalPos, layer: usize) -> TileRecord {
        match self.try_get_tile(local, layer) {
            Ok(r) => r,
            Err(e) => {
                log::warn!(target: "chunk", "get_tile: {e}");
                TileRecord::empty(local)
            }
        }
    }

    /// Paints the type's default tile with no regard for neighbors (generation-time fill).
    pub fn set_terrain_by_type<M: TileMeta + ?Sized>(
        &mut self,
        local: LocalPos,
        layer: usize,
        ty: TerrainType,
        meta: &M,
        mark_modified: bool,
    ) -> Result<(), ChunkError> {
        let Some(tile) = meta.default_for(ty) else {
            let e = ChunkError::UnknownType(ty);
            log::warn!(target: "chunk", "set_terrain_by_type: {e}");
            return Err(e);
        };
        self.set_tile(local, layer, Some(tile), mark_modified)
    }

    /// Places a scene-collection entry: the source is the collection, the variant the scene.
    pub fn set_scene(
        &mut self,
        local: LocalPos,
        layer: usize,
        scene_set: u16,
        scene: u16,
        mark_modified: bool,
    ) -> Result<(), ChunkError> {
        let tile = TileRef::new(scene_set, AtlasCoord::new(0, 0), scene);
        self.set_tile(local, layer, Some(tile), mark_modified)
    }

    /// Terrain of the tile stored at `local`, or `None` for empty or terrain-less cells.
    pub fn get_terrain<M: TileMeta + ?Sized>(
        &self,
        local: LocalPos,
        layer: usize,
        meta: &M,
    ) -> Option<TerrainKey> {
        self.get_tile(local, layer)
            .tile
            .and_then(|t| meta.terrain_of(t))
    }

    pub fn get_tile_type<M: TileMeta + ?Sized>(
        &self,
        local: LocalPos,
        layer: usize,
        meta: &M,
    ) -> Option<TerrainType> {
        self.get_tile(local, layer).tile.and_then(|t| meta.type_of(t))
    }

    #[inline]
    pub fn pending(&self) -> &[TileChange] {
        &self.pending
    }

    /// Takes every queued change, leaving the queue empty.
    #[inline]
    pub fn drain_pending(&mut self) -> Vec<TileChange> {
        std::mem::take(&mut self.pending)
    }
}
