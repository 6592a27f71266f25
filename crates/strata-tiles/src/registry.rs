use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{TileDef, TilesetConfig};
use super::types::{
    AtlasCoord, DeclaredPeering, Direction, EMPTY_FIELD, TerrainKey, TerrainSetMode, TerrainType,
    TileRef,
};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("tile type `{0}` is not declared in `types`")]
    UnknownType(String),
    #[error("terrain set {0} is not declared")]
    UnknownTerrainSet(u16),
    #[error("terrain `{name}` is not part of terrain set {set}")]
    UnknownTerrain { set: u16, name: String },
    #[error("tile {0:?} has a terrain set but no terrain (or the reverse)")]
    PartialTerrain(TileRef),
    #[error("tile {0:?} is declared twice")]
    DuplicateTile(TileRef),
    #[error("source id 0xffff is reserved for empty cells")]
    ReservedSource,
}

#[derive(Clone, Debug)]
pub struct TerrainSet {
    pub mode: TerrainSetMode,
    pub terrains: Vec<String>,
}

/// Authoring data for one visual tile.
#[derive(Clone, Debug)]
pub struct TileDescriptor {
    pub tile: TileRef,
    pub terrain: Option<TerrainKey>,
    pub tile_type: Option<TerrainType>,
    pub is_default: bool,
    pub peering: DeclaredPeering,
}

#[derive(Default, Clone, Debug)]
pub struct TileRegistry {
    pub types: Vec<String>,
    pub terrain_sets: Vec<TerrainSet>,
    pub tiles: Vec<TileDescriptor>,
    by_type_name: HashMap<String, TerrainType>,
    by_ref: HashMap<TileRef, usize>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: TilesetConfig = toml::from_str(toml_str)?;
        Ok(Self::from_config(cfg)?)
    }

    pub fn from_config(cfg: TilesetConfig) -> Result<Self, RegistryError> {
        let mut reg = TileRegistry::new();
        for name in cfg.types {
            reg.add_type(&name);
        }
        for set in cfg.terrain_sets {
            reg.add_terrain_set(set.mode, set.terrains);
        }
        for source in cfg.sources {
            if source.id == EMPTY_FIELD {
                return Err(RegistryError::ReservedSource);
            }
            for def in source.tiles {
                let desc = reg.compile_tile(source.id, def)?;
                reg.push(desc)?;
            }
        }
        Ok(reg)
    }

    /// Declares a type tag, returning the existing one if already known.
    pub fn add_type(&mut self, name: &str) -> TerrainType {
        if let Some(ty) = self.by_type_name.get(name) {
            return *ty;
        }
        let ty = TerrainType(self.types.len() as u16);
        self.types.push(name.to_string());
        self.by_type_name.insert(name.to_string(), ty);
        ty
    }

    pub fn add_terrain_set(&mut self, mode: TerrainSetMode, terrains: Vec<String>) -> u16 {
        self.terrain_sets.push(TerrainSet { mode, terrains });
        (self.terrain_sets.len() - 1) as u16
    }

    /// Registers an already compiled descriptor.
    pub fn push(&mut self, desc: TileDescriptor) -> Result<(), RegistryError> {
        if desc.tile.source == EMPTY_FIELD {
            return Err(RegistryError::ReservedSource);
        }
        if let Some(key) = desc.terrain {
            let set = self
                .terrain_sets
                .get(key.set as usize)
                .ok_or(RegistryError::UnknownTerrainSet(key.set))?;
            if key.terrain as usize >= set.terrains.len() {
                return Err(RegistryError::UnknownTerrain {
                    set: key.set,
                    name: key.terrain.to_string(),
                });
            }
        }
        if self.by_ref.contains_key(&desc.tile) {
            return Err(RegistryError::DuplicateTile(desc.tile));
        }
        self.by_ref.insert(desc.tile, self.tiles.len());
        self.tiles.push(desc);
        Ok(())
    }

    #[inline]
    pub fn get(&self, tile: TileRef) -> Option<&TileDescriptor> {
        self.by_ref.get(&tile).map(|&i| &self.tiles[i])
    }

    pub fn type_by_name(&self, name: &str) -> Option<TerrainType> {
        self.by_type_name.get(name).copied()
    }

    pub fn type_name(&self, ty: TerrainType) -> Option<&str> {
        self.types.get(ty.0 as usize).map(String::as_str)
    }

    pub fn set_mode(&self, set: u16) -> Option<TerrainSetMode> {
        self.terrain_sets.get(set as usize).map(|s| s.mode)
    }

    pub fn terrain_key(&self, set: u16, name: &str) -> Option<TerrainKey> {
        let ts = self.terrain_sets.get(set as usize)?;
        let idx = ts.terrains.iter().position(|t| t == name)?;
        Some(TerrainKey::new(set, idx as u32))
    }

    /// First terrain named `name` across all sets.
    pub fn find_terrain(&self, name: &str) -> Option<TerrainKey> {
        (0..self.terrain_sets.len() as u16).find_map(|set| self.terrain_key(set, name))
    }

    pub fn terrain_name(&self, key: TerrainKey) -> Option<&str> {
        self.terrain_sets
            .get(key.set as usize)?
            .terrains
            .get(key.terrain as usize)
            .map(String::as_str)
    }

    fn compile_tile(&self, source: u16, def: TileDef) -> Result<TileDescriptor, RegistryError> {
        let tile = TileRef::new(source, AtlasCoord::new(def.atlas[0], def.atlas[1]), def.variant);
        let terrain = match (def.terrain_set, def.terrain.as_deref()) {
            (Some(set), Some(name)) => {
                if self.terrain_sets.get(set as usize).is_none() {
                    return Err(RegistryError::UnknownTerrainSet(set));
                }
                Some(
                    self.terrain_key(set, name)
                        .ok_or_else(|| RegistryError::UnknownTerrain {
                            set,
                            name: name.to_string(),
                        })?,
                )
            }
            (None, None) => None,
            _ => return Err(RegistryError::PartialTerrain(tile)),
        };
        let tile_type = match def.tile_type {
            Some(name) => Some(
                self.type_by_name(&name)
                    .ok_or(RegistryError::UnknownType(name))?,
            ),
            None => None,
        };
        let mut peering = DeclaredPeering::default();
        if let Some(key) = terrain {
            for (dir, name) in Direction::ALL.into_iter().zip(def.peering.entries()) {
                let Some(name) = name else { continue };
                let id = self.terrain_key(key.set, name).ok_or_else(|| {
                    RegistryError::UnknownTerrain {
                        set: key.set,
                        name: name.to_string(),
                    }
                })?;
                peering.set(dir, Some(id.terrain));
            }
        }
        Ok(TileDescriptor {
            tile,
            terrain,
            tile_type,
            is_default: def.default,
            peering,
        })
    }
}
