use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// `worldgen.toml`.
///
/// Cells whose humidity falls below `dry.below` get `dry.type`; the rest
/// walk `bands` in order and take the first band whose `below` exceeds the
/// cell's temperature, else `fallback`.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default)]
    pub layer: usize,
    #[serde(default)]
    pub flat: Flat,
    #[serde(default = "default_temperature")]
    pub temperature: NoiseField,
    #[serde(default = "default_humidity")]
    pub humidity: NoiseField,
    #[serde(default)]
    pub dry: Dry,
    #[serde(default = "default_bands")]
    pub bands: Vec<Band>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Noise,
            layer: 0,
            flat: Flat::default(),
            temperature: default_temperature(),
            humidity: default_humidity(),
            dry: Dry::default(),
            bands: default_bands(),
            fallback: default_fallback(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Noise,
    Flat,
}

fn default_mode() -> Mode {
    Mode::Noise
}

#[derive(Clone, Debug, Deserialize)]
pub struct Flat {
    #[serde(rename = "type", default = "default_flat_type")]
    pub tile_type: String,
}
fn default_flat_type() -> String {
    "ground".into()
}
impl Default for Flat {
    fn default() -> Self {
        Self {
            tile_type: default_flat_type(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NoiseField {
    /// Mixed with the run seed so two fields never share a pattern.
    #[serde(default)]
    pub salt: i32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
}
fn default_frequency() -> f32 {
    0.01
}
fn default_octaves() -> u32 {
    3
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_temperature() -> NoiseField {
    NoiseField {
        salt: 0x1203_5F31,
        frequency: default_frequency(),
        octaves: default_octaves(),
        persistence: default_persistence(),
        lacunarity: default_lacunarity(),
    }
}
fn default_humidity() -> NoiseField {
    NoiseField {
        salt: 0x12E3_A1B2,
        frequency: 0.02,
        octaves: default_octaves(),
        persistence: default_persistence(),
        lacunarity: default_lacunarity(),
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Dry {
    #[serde(default)]
    pub below: f32,
    #[serde(rename = "type", default = "default_dry_type")]
    pub tile_type: String,
}
fn default_dry_type() -> String {
    "sand".into()
}
impl Default for Dry {
    fn default() -> Self {
        Self {
            below: 0.0,
            tile_type: default_dry_type(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Band {
    pub below: f32,
    #[serde(rename = "type")]
    pub tile_type: String,
}

fn default_bands() -> Vec<Band> {
    [(0.5, "ground"), (0.55, "swamp"), (0.6, "ground"), (0.7, "wall")]
        .into_iter()
        .map(|(below, t)| Band {
            below,
            tile_type: t.to_string(),
        })
        .collect()
}
fn default_fallback() -> String {
    "water".into()
}

pub fn load_config_from_path(path: &Path) -> Result<WorldGenConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_builtin_bands() {
        let cfg: WorldGenConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.mode, Mode::Noise);
        let names: Vec<&str> = cfg.bands.iter().map(|b| b.tile_type.as_str()).collect();
        assert_eq!(names, ["ground", "swamp", "ground", "wall"]);
        assert_eq!(cfg.fallback, "water");
        assert_eq!(cfg.dry.tile_type, "sand");
    }

    #[test]
    fn partial_override() {
        let cfg: WorldGenConfig = toml::from_str(
            r#"
            mode = "flat"
            layer = 1
            [flat]
            type = "sand"
            [humidity]
            frequency = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mode, Mode::Flat);
        assert_eq!(cfg.layer, 1);
        assert_eq!(cfg.flat.tile_type, "sand");
        assert_eq!(cfg.humidity.frequency, 0.5);
        assert_eq!(cfg.humidity.octaves, 3);
    }
}
