use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use strata_geom::{Grid, Size2};
use strata_runtime::StreamConfig;

/// `strata.toml`.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub assets: Assets,
}

fn default_seed() -> i32 {
    1337
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: [i32; 2],
    #[serde(default = "default_tile_size")]
    pub tile_size: [i32; 2],
    #[serde(default = "default_layers")]
    pub layers: usize,
}
fn default_chunk_size() -> [i32; 2] {
    [16, 16]
}
fn default_tile_size() -> [i32; 2] {
    [16, 16]
}
fn default_layers() -> usize {
    2
}
impl Default for WorldSection {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            tile_size: default_tile_size(),
            layers: default_layers(),
        }
    }
}

impl WorldSection {
    pub fn grid(&self) -> Result<Grid, Box<dyn Error>> {
        let [cw, ch] = self.chunk_size;
        let [tw, th] = self.tile_size;
        if cw <= 0 || ch <= 0 || tw <= 0 || th <= 0 {
            return Err(format!(
                "chunk_size {:?} and tile_size {:?} must be positive",
                self.chunk_size, self.tile_size
            )
            .into());
        }
        if self.layers == 0 {
            return Err("world needs at least one layer".into());
        }
        Ok(Grid::new(Size2::new(cw, ch), Size2::new(tw, th)))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Assets {
    #[serde(default = "default_tileset")]
    pub tileset: PathBuf,
    #[serde(default = "default_worldgen")]
    pub worldgen: PathBuf,
}
fn default_tileset() -> PathBuf {
    PathBuf::from("assets/tileset.toml")
}
fn default_worldgen() -> PathBuf {
    PathBuf::from("assets/worldgen.toml")
}
impl Default for Assets {
    fn default() -> Self {
        Self {
            tileset: default_tileset(),
            worldgen: default_worldgen(),
        }
    }
}

impl AppConfig {
    /// Parses the file and returns it with the directory asset paths are relative to.
    pub fn load(path: &Path) -> Result<(Self, PathBuf), Box<dyn Error>> {
        let s = fs::read_to_string(path)
            .map_err(|e| format!("reading {}: {e}", path.display()))?;
        let cfg: AppConfig = toml::from_str(&s)?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok((cfg, base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_default_independently() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [stream]
            range = 4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 1337);
        assert_eq!(cfg.stream.range, 4);
        assert!(cfg.stream.revalidate);
        assert!(!cfg.stream.refresh_seams);
        assert_eq!(cfg.world.layers, 2);
        assert_eq!(cfg.assets.tileset, PathBuf::from("assets/tileset.toml"));
        assert!(cfg.world.grid().is_ok());
    }

    #[test]
    fn rejects_degenerate_grids() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [world]
            chunk_size = [0, 16]
            "#,
        )
        .unwrap();
        assert!(cfg.world.grid().is_err());
    }

    #[test]
    fn shipped_config_parses() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let (cfg, base) = AppConfig::load(&root.join("strata.toml")).unwrap();
        assert_eq!(base, root);
        assert!(base.join(&cfg.assets.tileset).exists());
        assert!(base.join(&cfg.assets.worldgen).exists());
    }
}
