use serde::{Deserialize, Serialize};

use crate::Vec2;

/// Position on the unbounded global tile grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for TilePos {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// Chunk index; chunk `(cx, cy)` covers tiles `[cx*w, cx*w + w) x [cy*h, cy*h + h)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
}

impl ChunkPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chessboard distance, the metric the streaming window is square in.
    #[inline]
    pub fn chebyshev(self, other: ChunkPos) -> i64 {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        dx.max(dy)
    }
}

impl From<(i32, i32)> for ChunkPos {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkPos> for (i32, i32) {
    fn from(value: ChunkPos) -> Self {
        (value.x, value.y)
    }
}

/// Tile position relative to its chunk's origin.
///
/// Kept signed so callers can hand in arbitrary values and get an
/// out-of-range report instead of a wrapped index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPos {
    pub x: i32,
    pub y: i32,
}

impl LocalPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Positive 2D extent: chunk size in tiles or tile size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size2 {
    pub w: i32,
    pub h: i32,
}

impl Size2 {
    #[inline]
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    #[inline]
    pub const fn square(s: i32) -> Self {
        Self { w: s, h: s }
    }

    #[inline]
    pub fn area(self) -> usize {
        (self.w.max(0) as usize) * (self.h.max(0) as usize)
    }

    #[inline]
    pub fn contains(self, local: LocalPos) -> bool {
        local.x >= 0 && local.x < self.w && local.y >= 0 && local.y < self.h
    }
}

/// Conversions between the global tile, chunk, local and pixel spaces.
///
/// All tile-space divisions floor toward negative infinity, so tile `-1`
/// lives in chunk `-1` at local `size - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub chunk_size: Size2,
    pub tile_size: Size2,
}

impl Grid {
    #[inline]
    pub fn new(chunk_size: Size2, tile_size: Size2) -> Self {
        debug_assert!(chunk_size.w > 0 && chunk_size.h > 0);
        debug_assert!(tile_size.w > 0 && tile_size.h > 0);
        Self {
            chunk_size,
            tile_size,
        }
    }

    #[inline]
    pub fn tile_to_chunk(&self, tile: TilePos) -> ChunkPos {
        ChunkPos::new(
            tile.x.div_euclid(self.chunk_size.w),
            tile.y.div_euclid(self.chunk_size.h),
        )
    }

    #[inline]
    pub fn tile_to_local(&self, tile: TilePos) -> LocalPos {
        LocalPos::new(
            tile.x.rem_euclid(self.chunk_size.w),
            tile.y.rem_euclid(self.chunk_size.h),
        )
    }

    #[inline]
    pub fn split(&self, tile: TilePos) -> (ChunkPos, LocalPos) {
        (self.tile_to_chunk(tile), self.tile_to_local(tile))
    }

    /// Global tile at local `(0, 0)` of `chunk`.
    #[inline]
    pub fn chunk_origin(&self, chunk: ChunkPos) -> TilePos {
        TilePos::new(chunk.x * self.chunk_size.w, chunk.y * self.chunk_size.h)
    }

    #[inline]
    pub fn local_to_tile(&self, chunk: ChunkPos, local: LocalPos) -> TilePos {
        let o = self.chunk_origin(chunk);
        TilePos::new(o.x + local.x, o.y + local.y)
    }

    /// Top-left pixel of `tile`.
    #[inline]
    pub fn tile_to_pixel(&self, tile: TilePos) -> Vec2 {
        Vec2::new(
            (tile.x as f32) * self.tile_size.w as f32,
            (tile.y as f32) * self.tile_size.h as f32,
        )
    }

    #[inline]
    pub fn chunk_to_pixel(&self, chunk: ChunkPos) -> Vec2 {
        self.tile_to_pixel(self.chunk_origin(chunk))
    }

    #[inline]
    pub fn pixel_to_tile(&self, px: Vec2) -> TilePos {
        TilePos::new(
            (px.x / self.tile_size.w as f32).floor() as i32,
            (px.y / self.tile_size.h as f32).floor() as i32,
        )
    }

    #[inline]
    pub fn pixel_to_chunk(&self, px: Vec2) -> ChunkPos {
        self.tile_to_chunk(self.pixel_to_tile(px))
    }
}
