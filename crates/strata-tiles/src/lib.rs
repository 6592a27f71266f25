//! Tile references, terrain identities and the authoring tile registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{RegistryError, TerrainSet, TileDescriptor, TileRegistry};
pub use types::{
    AtlasCoord, DeclaredPeering, Direction, TerrainKey, TerrainSetMode, TerrainType, TileMeta,
    TileRef,
};
