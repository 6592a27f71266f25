use std::sync::Arc;

use strata_chunk::ChunkStore;
use strata_geom::{ChunkPos, TilePos};
use strata_tiles::{Direction, TerrainKey};

use crate::AutotileError;
use crate::lookup::TerrainLookup;
use crate::shape::{Peering, ShapeId};

/// Terrain painter over the resident chunks. Neighbor reads cross chunk
/// borders; non-resident neighbors count as "no terrain".
#[derive(Clone)]
pub struct Autotiler {
    lookup: Arc<TerrainLookup>,
}

impl Autotiler {
    pub fn new(lookup: Arc<TerrainLookup>) -> Self {
        Self { lookup }
    }

    #[inline]
    pub fn lookup(&self) -> &TerrainLookup {
        &self.lookup
    }

    /// Paints `terrain` at `tile` (or erases it with `None`) and re-evaluates
    /// the neighbors whose shape may have changed.
    pub fn draw_terrain(
        &self,
        store: &mut ChunkStore,
        tile: TilePos,
        layer: usize,
        terrain: Option<TerrainKey>,
        mark_modified: bool,
    ) -> Result<(), AutotileError> {
        self.require_resident(store, tile)?;
        let Some(key) = terrain else {
            store.set_tile_at(tile, layer, None, mark_modified)?;
            // The cell no longer has a terrain mode to filter by: visit all 8.
            for dir in Direction::ALL {
                let (dx, dy) = dir.offset();
                let n = tile.offset(dx, dy);
                if store.terrain_at(n, layer, self.lookup()).is_some() {
                    self.refresh_neighbor(store, n, layer, mark_modified);
                }
            }
            return Ok(());
        };

        let (peering, matched) = self.scan(store, tile, layer, key)?;
        let id = ShapeId::new(key, peering.normalize());
        let resolved = self.resolve(tile, id)?;
        store.set_tile_at(tile, layer, Some(resolved), mark_modified)?;
        log::debug!(target: "autotile", "draw {tile:?} layer {layer} -> {id:?}");
        for n in matched {
            self.refresh_neighbor(store, n, layer, mark_modified);
        }
        Ok(())
    }

    /// Recomputes the shape of an existing terrain tile from its current
    /// neighbors. Cells without terrain are left alone.
    pub fn update_tile(
        &self,
        store: &mut ChunkStore,
        tile: TilePos,
        layer: usize,
        mark_modified: bool,
    ) -> Result<(), AutotileError> {
        self.require_resident(store, tile)?;
        let Some(key) = store.terrain_at(tile, layer, self.lookup()) else {
            return Ok(());
        };
        let (peering, _) = self.scan(store, tile, layer, key)?;
        let id = ShapeId::new(key, peering.normalize());
        let resolved = self.resolve(tile, id)?;
        store.set_tile_at(tile, layer, Some(resolved), mark_modified)?;
        Ok(())
    }

    /// Re-evaluates every terrain cell of `coord` and of the ring just
    /// outside it, on every layer, so a freshly attached chunk and the
    /// resident cells touching it agree with their neighbors. Returns how
    /// many cells were visited. Does not mark the touched chunks as modified.
    pub fn refresh_seams(&self, store: &mut ChunkStore, coord: ChunkPos) -> usize {
        if !store.contains(coord) {
            return 0;
        }
        let grid = *store.grid();
        let origin = grid.chunk_origin(coord);
        let (w, h) = (grid.chunk_size.w, grid.chunk_size.h);
        let cells: Vec<TilePos> = (origin.y - 1..=origin.y + h)
            .flat_map(|y| (origin.x - 1..=origin.x + w).map(move |x| TilePos::new(x, y)))
            .collect();
        let mut visited = 0;
        for layer in 0..store.layer_count() {
            for &cell in &cells {
                if store.terrain_at(cell, layer, self.lookup()).is_some() {
                    self.refresh_neighbor(store, cell, layer, false);
                    visited += 1;
                }
            }
        }
        log::debug!(target: "autotile", "seam refresh {coord:?}: {visited} cells");
        visited
    }

    // Neighbor updates never abort the paint that triggered them.
    fn refresh_neighbor(&self, store: &mut ChunkStore, tile: TilePos, layer: usize, mark: bool) {
        if let Err(e) = self.update_tile(store, tile, layer, mark) {
            log::debug!(target: "autotile", "neighbor {tile:?} left as is: {e}");
        }
    }

    fn scan(
        &self,
        store: &ChunkStore,
        tile: TilePos,
        layer: usize,
        key: TerrainKey,
    ) -> Result<(Peering, Vec<TilePos>), AutotileError> {
        let mode = self
            .lookup
            .mode(key.set)
            .ok_or(AutotileError::UnknownTerrainSet(key.set))?;
        let mut peering = Peering::EMPTY;
        let mut matched = Vec::with_capacity(8);
        for dir in Direction::ALL.into_iter().filter(|d| mode.uses(*d)) {
            let (dx, dy) = dir.offset();
            let n = tile.offset(dx, dy);
            if store.terrain_at(n, layer, self.lookup()) == Some(key) {
                peering = peering.with(dir);
                matched.push(n);
            }
        }
        Ok((peering, matched))
    }

    fn resolve(&self, tile: TilePos, id: ShapeId) -> Result<strata_tiles::TileRef, AutotileError> {
        self.lookup.resolve(id).ok_or_else(|| {
            log::warn!(target: "autotile", "no tile for {id:?} at {tile:?}");
            AutotileError::UnresolvedShape { tile, id }
        })
    }

    fn require_resident(&self, store: &ChunkStore, tile: TilePos) -> Result<(), AutotileError> {
        let (coord, _) = store.locate(tile);
        if store.contains(coord) {
            Ok(())
        } else {
            log::warn!(target: "autotile", "paint at {tile:?}: chunk {coord:?} not resident");
            Err(AutotileError::MissingChunk(coord))
        }
    }
}
