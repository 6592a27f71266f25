use serde::Deserialize;

/// Field value marking an empty cell in a packed tile record.
pub const EMPTY_FIELD: u16 = 0xFFFF;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtlasCoord {
    pub x: u16,
    pub y: u16,
}

impl AtlasCoord {
    #[inline]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A concrete visual tile: atlas source, cell within the atlas, and alternative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileRef {
    pub source: u16,
    pub atlas: AtlasCoord,
    pub variant: u16,
}

impl TileRef {
    #[inline]
    pub const fn new(source: u16, atlas: AtlasCoord, variant: u16) -> Self {
        Self {
            source,
            atlas,
            variant,
        }
    }
}

/// Terrain identity inside a terrain set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerrainKey {
    pub set: u16,
    pub terrain: u32,
}

impl TerrainKey {
    #[inline]
    pub const fn new(set: u16, terrain: u32) -> Self {
        Self { set, terrain }
    }
}

/// Opaque authoring tag (water, sand, ...) used for adjacency-free painting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerrainType(pub u16);

/// Which neighbors a terrain set matches against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainSetMode {
    /// Four cardinal neighbors; diagonal bits are always zero.
    Sides,
    /// All eight neighbors.
    CornersAndSides,
}

impl TerrainSetMode {
    #[inline]
    pub fn uses(self, dir: Direction) -> bool {
        match self {
            TerrainSetMode::Sides => !dir.is_diagonal(),
            TerrainSetMode::CornersAndSides => true,
        }
    }
}

/// Neighbor direction in tile space; north is `-y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::N => (0, -1),
            Direction::NE => (1, -1),
            Direction::E => (1, 0),
            Direction::SE => (1, 1),
            Direction::S => (0, 1),
            Direction::SW => (-1, 1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, -1),
        }
    }

    /// Bit in the shape mask: N is the most significant, NW the least.
    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (7 - self as u8)
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NE | Direction::SE | Direction::SW | Direction::NW
        )
    }
}

/// Per-direction terrain a tile was authored to connect to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DeclaredPeering(pub [Option<u32>; 8]);

impl DeclaredPeering {
    #[inline]
    pub fn get(&self, dir: Direction) -> Option<u32> {
        self.0[dir as usize]
    }

    #[inline]
    pub fn set(&mut self, dir: Direction, terrain: Option<u32>) {
        self.0[dir as usize] = terrain;
    }

    /// True when the tile was authored to join `terrain` towards `dir`.
    #[inline]
    pub fn connects(&self, dir: Direction, terrain: u32) -> bool {
        self.get(dir) == Some(terrain)
    }
}

/// Metadata resolution for tiles already written into a buffer.
pub trait TileMeta {
    /// Terrain the tile was authored for, if any.
    fn terrain_of(&self, tile: TileRef) -> Option<TerrainKey>;
    /// Authoring type tag of the tile, if any.
    fn type_of(&self, tile: TileRef) -> Option<TerrainType>;
    /// Tile used when painting `ty` without neighbor context.
    fn default_for(&self, ty: TerrainType) -> Option<TileRef>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_bits_are_n_msb_nw_lsb() {
        let bits: Vec<u8> = Direction::ALL.iter().map(|d| d.bit()).collect();
        assert_eq!(bits, vec![0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01]);
    }

    #[test]
    fn sides_mode_skips_diagonals() {
        let used: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| TerrainSetMode::Sides.uses(*d))
            .collect();
        assert_eq!(used, vec![Direction::N, Direction::E, Direction::S, Direction::W]);
    }
}
