use hashbrown::HashMap;
use strata_tiles::{
    Direction, TerrainKey, TerrainSetMode, TerrainType, TileMeta, TileRef, TileRegistry,
};

use crate::AutotileError;
use crate::shape::{ShapeId, compute_shape_id};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TileInfo {
    terrain: Option<TerrainKey>,
    tile_type: Option<TerrainType>,
}

/// Read-only tables derived from a [`TileRegistry`]: shape -> tile,
/// type -> default tile, tile -> terrain/type.
#[derive(Clone, Debug, Default)]
pub struct TerrainLookup {
    shapes: HashMap<ShapeId, TileRef>,
    defaults: HashMap<TerrainType, TileRef>,
    info: HashMap<TileRef, TileInfo>,
    modes: Vec<TerrainSetMode>,
}

impl TerrainLookup {
    /// Fails when two tiles resolve to the same shape or a type has two
    /// tiles flagged as its default. Types without a flagged default fall
    /// back to their first declared tile.
    pub fn build(reg: &TileRegistry) -> Result<Self, AutotileError> {
        let mut out = TerrainLookup {
            modes: reg.terrain_sets.iter().map(|s| s.mode).collect(),
            ..Default::default()
        };
        for desc in &reg.tiles {
            out.info.insert(
                desc.tile,
                TileInfo {
                    terrain: desc.terrain,
                    tile_type: desc.tile_type,
                },
            );
            if let Some(key) = desc.terrain {
                let mode = out
                    .mode(key.set)
                    .ok_or(AutotileError::UnknownTerrainSet(key.set))?;
                let flags = Direction::ALL.map(|d| desc.peering.connects(d, key.terrain));
                let id = compute_shape_id(key, mode, flags);
                if let Some(first) = out.shapes.insert(id, desc.tile) {
                    return Err(AutotileError::ShapeCollision {
                        id,
                        first,
                        second: desc.tile,
                    });
                }
            }
            if let (Some(ty), true) = (desc.tile_type, desc.is_default) {
                if let Some(first) = out.defaults.insert(ty, desc.tile) {
                    return Err(AutotileError::DuplicateDefault {
                        ty,
                        first,
                        second: desc.tile,
                    });
                }
            }
        }
        for desc in &reg.tiles {
            if let Some(ty) = desc.tile_type {
                out.defaults.entry(ty).or_insert(desc.tile);
            }
        }
        log::info!(
            target: "autotile",
            "terrain lookup: {} shapes, {} typed defaults, {} tiles",
            out.shapes.len(),
            out.defaults.len(),
            out.info.len()
        );
        Ok(out)
    }

    #[inline]
    pub fn resolve(&self, id: ShapeId) -> Option<TileRef> {
        self.shapes.get(&id).copied()
    }

    #[inline]
    pub fn mode(&self, set: u16) -> Option<TerrainSetMode> {
        self.modes.get(set as usize).copied()
    }

    #[inline]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}

impl TileMeta for TerrainLookup {
    fn terrain_of(&self, tile: TileRef) -> Option<TerrainKey> {
        self.info.get(&tile).and_then(|i| i.terrain)
    }

    fn type_of(&self, tile: TileRef) -> Option<TerrainType> {
        self.info.get(&tile).and_then(|i| i.tile_type)
    }

    fn default_for(&self, ty: TerrainType) -> Option<TileRef> {
        self.defaults.get(&ty).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Peering;
    use strata_tiles::{AtlasCoord, DeclaredPeering, TileDescriptor};

    fn tile(x: u16) -> TileRef {
        TileRef::new(0, AtlasCoord::new(x, 0), 0)
    }

    fn registry() -> (TileRegistry, TerrainType) {
        let mut reg = TileRegistry::new();
        let water = reg.add_type("water");
        reg.add_terrain_set(TerrainSetMode::Sides, vec!["water".into()]);
        (reg, water)
    }

    fn desc(x: u16, peering: DeclaredPeering, ty: TerrainType, default: bool) -> TileDescriptor {
        TileDescriptor {
            tile: tile(x),
            terrain: Some(TerrainKey::new(0, 0)),
            tile_type: Some(ty),
            is_default: default,
            peering,
        }
    }

    #[test]
    fn shapes_and_defaults_resolve() {
        let (mut reg, water) = registry();
        let mut east = DeclaredPeering::default();
        east.set(Direction::E, Some(0));
        // NE is ignored in sides mode
        east.set(Direction::NE, Some(0));
        reg.push(desc(0, DeclaredPeering::default(), water, false)).unwrap();
        reg.push(desc(1, east, water, true)).unwrap();
        let lookup = TerrainLookup::build(&reg).unwrap();
        let key = TerrainKey::new(0, 0);
        assert_eq!(lookup.resolve(ShapeId::new(key, Peering::EMPTY)), Some(tile(0)));
        assert_eq!(
            lookup.resolve(ShapeId::new(key, Peering::EMPTY.with(Direction::E))),
            Some(tile(1))
        );
        assert_eq!(lookup.default_for(water), Some(tile(1)));
        assert_eq!(lookup.terrain_of(tile(1)), Some(key));
        assert_eq!(lookup.type_of(tile(7)), None);
    }

    #[test]
    fn first_typed_tile_is_fallback_default() {
        let (mut reg, water) = registry();
        let mut n = DeclaredPeering::default();
        n.set(Direction::N, Some(0));
        reg.push(desc(4, n, water, false)).unwrap();
        reg.push(desc(5, DeclaredPeering::default(), water, false)).unwrap();
        let lookup = TerrainLookup::build(&reg).unwrap();
        assert_eq!(lookup.default_for(water), Some(tile(4)));
    }

    #[test]
    fn colliding_shapes_are_rejected() {
        let (mut reg, water) = registry();
        let mut a = DeclaredPeering::default();
        a.set(Direction::S, Some(0));
        let mut b = a;
        b.set(Direction::SE, Some(0));
        reg.push(desc(0, a, water, false)).unwrap();
        reg.push(desc(1, b, water, false)).unwrap();
        match TerrainLookup::build(&reg) {
            Err(AutotileError::ShapeCollision { first, second, .. }) => {
                assert_eq!((first, second), (tile(0), tile(1)));
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn two_flagged_defaults_are_rejected() {
        let (mut reg, water) = registry();
        let mut e = DeclaredPeering::default();
        e.set(Direction::E, Some(0));
        reg.push(desc(0, DeclaredPeering::default(), water, true)).unwrap();
        reg.push(desc(1, e, water, true)).unwrap();
        assert!(matches!(
            TerrainLookup::build(&reg),
            Err(AutotileError::DuplicateDefault { .. })
        ));
    }
}
