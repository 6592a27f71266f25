use core::fmt;

use strata_tiles::{Direction, TerrainKey, TerrainSetMode};

/// 8-neighbor connectivity mask; bit layout follows [`Direction::bit`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Peering(u8);

impl Peering {
    pub const EMPTY: Peering = Peering(0);

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Flags in `Direction::ALL` order (N, NE, E, SE, S, SW, W, NW).
    pub fn from_flags(flags: [bool; 8]) -> Self {
        Direction::ALL
            .into_iter()
            .zip(flags)
            .filter(|(_, on)| *on)
            .fold(Peering::EMPTY, |p, (d, _)| p.with(d))
    }

    #[inline]
    pub const fn has(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    #[inline]
    pub const fn with(self, dir: Direction) -> Self {
        Self(self.0 | dir.bit())
    }

    #[inline]
    pub const fn without(self, dir: Direction) -> Self {
        Self(self.0 & !dir.bit())
    }

    /// Drops the bits a terrain set mode does not match on.
    pub fn restricted_to(self, mode: TerrainSetMode) -> Self {
        Direction::ALL
            .into_iter()
            .filter(|d| !mode.uses(*d))
            .fold(self, |p, d| p.without(d))
    }

    /// A corner only connects when both edges beside it connect.
    pub fn normalize(self) -> Self {
        use Direction::*;
        let mut p = self;
        for (corner, a, b) in [(NE, N, E), (SE, S, E), (SW, S, W), (NW, N, W)] {
            if p.has(corner) && !(p.has(a) && p.has(b)) {
                p = p.without(corner);
            }
        }
        p
    }
}

impl fmt::Debug for Peering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Peering({:#010b})", self.0)
    }
}

/// Lookup key: `set << 40 | terrain << 8 | mask`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

impl ShapeId {
    #[inline]
    pub const fn new(key: TerrainKey, peering: Peering) -> Self {
        Self(((key.set as u64) << 40) | ((key.terrain as u64) << 8) | peering.bits() as u64)
    }

    #[inline]
    pub const fn set(self) -> u16 {
        (self.0 >> 40) as u16
    }

    #[inline]
    pub const fn terrain(self) -> u32 {
        (self.0 >> 8) as u32
    }

    #[inline]
    pub const fn peering(self) -> Peering {
        Peering(self.0 as u8)
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShapeId(set={}, terrain={}, mask={:#010b})",
            self.set(),
            self.terrain(),
            self.peering().bits()
        )
    }
}

/// Packs a terrain and its neighbor flags, honoring the set's mode.
pub fn compute_shape_id(key: TerrainKey, mode: TerrainSetMode, flags: [bool; 8]) -> ShapeId {
    ShapeId::new(key, Peering::from_flags(flags).restricted_to(mode))
}
