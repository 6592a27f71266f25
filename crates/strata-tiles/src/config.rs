use serde::Deserialize;

use crate::types::TerrainSetMode;

/// Top-level tileset file.
///
/// ```toml
/// types = ["water", "sand"]
///
/// [[terrain_sets]]
/// mode = "sides"
/// terrains = ["water", "sand"]
///
/// [[sources]]
/// id = 0
/// tiles = [
///   { atlas = [0, 0], terrain_set = 0, terrain = "water", type = "water", peering = { s = "water" } },
/// ]
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TilesetConfig {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub terrain_sets: Vec<TerrainSetDef>,
    #[serde(default)]
    pub sources: Vec<SourceDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TerrainSetDef {
    pub mode: TerrainSetMode,
    pub terrains: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SourceDef {
    pub id: u16,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TileDef {
    pub atlas: [u16; 2],
    #[serde(default)]
    pub variant: u16,
    pub terrain_set: Option<u16>,
    pub terrain: Option<String>,
    #[serde(rename = "type")]
    pub tile_type: Option<String>,
    /// Marks this tile as the adjacency-free tile for its type.
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub peering: PeeringDef,
}

/// Terrain name each edge/corner was authored to join; unset means none.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PeeringDef {
    pub n: Option<String>,
    pub ne: Option<String>,
    pub e: Option<String>,
    pub se: Option<String>,
    pub s: Option<String>,
    pub sw: Option<String>,
    pub w: Option<String>,
    pub nw: Option<String>,
}

impl PeeringDef {
    /// Entries in `Direction::ALL` order.
    pub fn entries(&self) -> [Option<&str>; 8] {
        [
            self.n.as_deref(),
            self.ne.as_deref(),
            self.e.as_deref(),
            self.se.as_deref(),
            self.s.as_deref(),
            self.sw.as_deref(),
            self.w.as_deref(),
            self.nw.as_deref(),
        ]
    }
}
