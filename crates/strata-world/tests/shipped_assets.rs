use std::path::PathBuf;

use strata_autotile::TerrainLookup;
use strata_chunk::ChunkData;
use strata_geom::{ChunkPos, LocalPos, Size2};
use strata_tiles::TileRegistry;
use strata_world::{NoiseGenerator, build_generator, load_config_from_path, worldgen::Mode};

fn assets() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets")
}

fn load() -> (TileRegistry, TerrainLookup, strata_world::WorldGenConfig) {
    let reg = TileRegistry::load_from_path(assets().join("tileset.toml")).unwrap();
    let lookup = TerrainLookup::build(&reg).unwrap();
    let cfg = load_config_from_path(&assets().join("worldgen.toml")).unwrap();
    (reg, lookup, cfg)
}

#[test]
fn shipped_worldgen_names_declared_types() {
    let (reg, _, cfg) = load();
    assert_eq!(cfg.mode, Mode::Noise);
    assert_eq!(cfg.bands.len(), 4);
    assert!(build_generator(&cfg, &reg, 1337).is_ok());
}

#[test]
fn generated_chunk_matches_classification() {
    let (reg, lookup, cfg) = load();
    let generator = NoiseGenerator::new(&cfg, &reg, 7).unwrap();
    let size = Size2::square(16);
    for coord in [ChunkPos::new(0, 0), ChunkPos::new(-3, 5)] {
        let mut chunk = ChunkData::new(coord, size, 2);
        strata_world::Generator::generate(&generator, &mut chunk, &lookup);
        for y in 0..16 {
            for x in 0..16 {
                let local = LocalPos::new(x, y);
                let expect = generator.classify(coord.x * 16 + x, coord.y * 16 + y);
                assert_eq!(chunk.get_tile_type(local, cfg.layer, &lookup), Some(expect));
                assert!(chunk.get_tile(local, 1).tile.is_none());
            }
        }
        assert!(chunk.pending().is_empty());
        assert!(!chunk.is_modified());
    }
}
