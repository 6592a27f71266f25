//! Chunk generation: the generator contract and the noise-driven terrain fill.
#![forbid(unsafe_code)]

pub mod worldgen;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_chunk::ChunkData;
use strata_geom::LocalPos;
use strata_tiles::{TerrainType, TileMeta, TileRegistry};

pub use worldgen::{WorldGenConfig, load_config_from_path};

/// Fills a freshly allocated chunk. Runs on generation worker threads, so
/// it must not depend on other chunks and must leave `updatable` unset.
pub trait Generator: Send + Sync {
    fn generate(&self, chunk: &mut ChunkData, meta: &dyn TileMeta);
}

#[derive(Debug, thiserror::Error)]
pub enum WorldGenError {
    #[error("worldgen names type `{0}`, which the tileset does not declare")]
    UnknownType(String),
}

fn resolve(reg: &TileRegistry, name: &str) -> Result<TerrainType, WorldGenError> {
    reg.type_by_name(name)
        .ok_or_else(|| WorldGenError::UnknownType(name.to_string()))
}

/// Builds the generator selected by `cfg.mode`.
pub fn build_generator(
    cfg: &WorldGenConfig,
    reg: &TileRegistry,
    seed: i32,
) -> Result<Box<dyn Generator>, WorldGenError> {
    Ok(match cfg.mode {
        worldgen::Mode::Noise => Box::new(NoiseGenerator::new(cfg, reg, seed)?),
        worldgen::Mode::Flat => {
            let ty = resolve(reg, &cfg.flat.tile_type)?;
            Box::new(FlatGenerator::new(ty, cfg.layer))
        }
    })
}

/// Paints every cell of one layer with a single type.
pub struct FlatGenerator {
    ty: TerrainType,
    layer: usize,
}

impl FlatGenerator {
    pub fn new(ty: TerrainType, layer: usize) -> Self {
        Self { ty, layer }
    }
}

impl Generator for FlatGenerator {
    fn generate(&self, chunk: &mut ChunkData, meta: &dyn TileMeta) {
        fill(chunk, self.layer, meta, |_, _| self.ty);
    }
}

struct Field {
    noise: FastNoiseLite,
    octaves: u32,
    persistence: f32,
    lacunarity: f32,
}

impl Field {
    fn new(cfg: &worldgen::NoiseField, seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed ^ cfg.salt);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(cfg.frequency));
        Self {
            noise,
            octaves: cfg.octaves.max(1),
            persistence: cfg.persistence,
            lacunarity: cfg.lacunarity,
        }
    }

    /// Normalized fBm in roughly `[-1, 1]`.
    fn sample(&self, x: f32, y: f32) -> f32 {
        let mut amp = 1.0_f32;
        let mut freq = 1.0_f32;
        let mut sum = 0.0_f32;
        let mut max_amp = 0.0_f32;
        for _ in 0..self.octaves {
            sum += self.noise.get_noise_2d(x * freq, y * freq) * amp;
            max_amp += amp;
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        if max_amp > 0.0 { sum / max_amp } else { sum }
    }
}

/// Temperature/humidity classifier over global tile coordinates.
pub struct NoiseGenerator {
    temperature: Field,
    humidity: Field,
    dry_below: f32,
    dry: TerrainType,
    bands: Vec<(f32, TerrainType)>,
    fallback: TerrainType,
    layer: usize,
}

impl NoiseGenerator {
    pub fn new(cfg: &WorldGenConfig, reg: &TileRegistry, seed: i32) -> Result<Self, WorldGenError> {
        let bands = cfg
            .bands
            .iter()
            .map(|b| resolve(reg, &b.tile_type).map(|ty| (b.below, ty)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            temperature: Field::new(&cfg.temperature, seed),
            humidity: Field::new(&cfg.humidity, seed),
            dry_below: cfg.dry.below,
            dry: resolve(reg, &cfg.dry.tile_type)?,
            bands,
            fallback: resolve(reg, &cfg.fallback)?,
            layer: cfg.layer,
        })
    }

    /// Type chosen for one global tile; pure in `(seed, x, y)`.
    pub fn classify(&self, x: i32, y: i32) -> TerrainType {
        let (fx, fy) = (x as f32, y as f32);
        if self.humidity.sample(fx, fy) < self.dry_below {
            return self.dry;
        }
        let t = self.temperature.sample(fx, fy);
        self.bands
            .iter()
            .find(|(below, _)| t < *below)
            .map_or(self.fallback, |(_, ty)| *ty)
    }
}

impl Generator for NoiseGenerator {
    fn generate(&self, chunk: &mut ChunkData, meta: &dyn TileMeta) {
        fill(chunk, self.layer, meta, |x, y| self.classify(x, y));
    }
}

fn fill(
    chunk: &mut ChunkData,
    layer: usize,
    meta: &dyn TileMeta,
    pick: impl Fn(i32, i32) -> TerrainType,
) {
    let (ox, oy) = (chunk.coord.x * chunk.size.w, chunk.coord.y * chunk.size.h);
    let mut failed = 0usize;
    for y in 0..chunk.size.h {
        for x in 0..chunk.size.w {
            let ty = pick(ox + x, oy + y);
            if chunk
                .set_terrain_by_type(LocalPos::new(x, y), layer, ty, meta, false)
                .is_err()
            {
                failed += 1;
            }
        }
    }
    if failed > 0 {
        log::warn!(target: "worldgen", "generate {:?}: {failed} cells left empty", chunk.coord);
    }
}
