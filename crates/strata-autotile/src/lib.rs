//! Terrain auto-tiling: neighbor masks, shape ids and the painter.
#![forbid(unsafe_code)]

mod lookup;
mod paint;
mod shape;

pub use lookup::TerrainLookup;
pub use paint::Autotiler;
pub use shape::{Peering, ShapeId, compute_shape_id};

use strata_chunk::ChunkError;
use strata_geom::{ChunkPos, TilePos};
use strata_tiles::{TerrainType, TileRef};

#[derive(Debug, thiserror::Error)]
pub enum AutotileError {
    #[error("no tile registered for {id:?} (painting {tile:?})")]
    UnresolvedShape { tile: TilePos, id: ShapeId },
    #[error("chunk {0:?} is not resident")]
    MissingChunk(ChunkPos),
    #[error("terrain set {0} is not registered")]
    UnknownTerrainSet(u16),
    #[error("{id:?} is declared by both {first:?} and {second:?}")]
    ShapeCollision {
        id: ShapeId,
        first: TileRef,
        second: TileRef,
    },
    #[error("type {ty:?} has two default tiles: {first:?} and {second:?}")]
    DuplicateDefault {
        ty: TerrainType,
        first: TileRef,
        second: TileRef,
    },
    #[error(transparent)]
    Chunk(#[from] ChunkError),
}
