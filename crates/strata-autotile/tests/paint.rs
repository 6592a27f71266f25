use std::sync::Arc;

use strata_autotile::{AutotileError, Autotiler, TerrainLookup};
use strata_chunk::ChunkStore;
use strata_geom::{ChunkPos, Grid, LocalPos, Size2, TilePos};
use strata_tiles::{
    AtlasCoord, DeclaredPeering, Direction, TerrainKey, TerrainSetMode, TileDescriptor, TileMeta,
    TileRef, TileRegistry,
};

const WATER: TerrainKey = TerrainKey::new(0, 0);
const SAND: TerrainKey = TerrainKey::new(0, 1);
const SIDES: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

// One tile per 4-bit side mask; atlas x is the mask, atlas y the terrain.
fn registry() -> TileRegistry {
    registry_with(|_| true)
}

// Same layout, keeping only the masks `keep` accepts.
fn registry_with(keep: impl Fn(u16) -> bool) -> TileRegistry {
    let mut reg = TileRegistry::new();
    let types = [reg.add_type("water"), reg.add_type("sand")];
    reg.add_terrain_set(TerrainSetMode::Sides, vec!["water".into(), "sand".into()]);
    for (t, ty) in types.into_iter().enumerate() {
        for mask in (0u16..16).filter(|m| keep(*m)) {
            let mut peering = DeclaredPeering::default();
            for (i, dir) in SIDES.into_iter().enumerate() {
                if mask & (1 << i) != 0 {
                    peering.set(dir, Some(t as u32));
                }
            }
            reg.push(TileDescriptor {
                tile: TileRef::new(1, AtlasCoord::new(mask, t as u16), 0),
                terrain: Some(TerrainKey::new(0, t as u32)),
                tile_type: Some(ty),
                is_default: mask == 0,
                peering,
            })
            .unwrap();
        }
    }
    reg
}

fn shape(key: TerrainKey, sides: [bool; 4]) -> TileRef {
    let mask = sides
        .into_iter()
        .enumerate()
        .fold(0u16, |m, (i, on)| if on { m | (1 << i) } else { m });
    TileRef::new(1, AtlasCoord::new(mask, key.terrain as u16), 0)
}

fn setup(chunks: &[(i32, i32)]) -> (ChunkStore, Autotiler) {
    setup_with(registry(), chunks)
}

fn setup_with(reg: TileRegistry, chunks: &[(i32, i32)]) -> (ChunkStore, Autotiler) {
    let lookup = Arc::new(TerrainLookup::build(&reg).unwrap());
    let mut store = ChunkStore::new(Grid::new(Size2::square(16), Size2::square(16)), 2);
    for &(x, y) in chunks {
        let mut chunk = store.allocate(ChunkPos::new(x, y));
        chunk.mark_updatable();
        store.insert(chunk);
    }
    (store, Autotiler::new(lookup))
}

fn at(store: &ChunkStore, x: i32, y: i32) -> Option<TileRef> {
    store.tile_at(TilePos::new(x, y), 0).and_then(|r| r.tile)
}

#[test]
fn painting_next_to_water_connects_both_ways() {
    let (mut store, tiler) = setup(&[(0, 0)]);
    tiler
        .draw_terrain(&mut store, TilePos::new(10, 9), 0, Some(WATER), true)
        .unwrap();
    assert_eq!(at(&store, 10, 9), Some(shape(WATER, [false; 4])));

    tiler
        .draw_terrain(&mut store, TilePos::new(10, 10), 0, Some(WATER), true)
        .unwrap();
    // (10,10) joins north, (10,9) was refreshed to join south
    assert_eq!(at(&store, 10, 10), Some(shape(WATER, [true, false, false, false])));
    assert_eq!(at(&store, 10, 9), Some(shape(WATER, [false, false, true, false])));
    assert!(store.get(ChunkPos::new(0, 0)).unwrap().is_modified());
}

#[test]
fn different_terrains_do_not_connect() {
    let (mut store, tiler) = setup(&[(0, 0)]);
    tiler
        .draw_terrain(&mut store, TilePos::new(4, 4), 0, Some(SAND), false)
        .unwrap();
    tiler
        .draw_terrain(&mut store, TilePos::new(5, 4), 0, Some(WATER), false)
        .unwrap();
    assert_eq!(at(&store, 4, 4), Some(shape(SAND, [false; 4])));
    assert_eq!(at(&store, 5, 4), Some(shape(WATER, [false; 4])));
}

#[test]
fn erase_refreshes_every_terrain_neighbor() {
    let (mut store, tiler) = setup(&[(0, 0)]);
    for (x, key) in [(10, WATER), (11, WATER)] {
        tiler
            .draw_terrain(&mut store, TilePos::new(x, 10), 0, Some(key), false)
            .unwrap();
    }
    tiler
        .draw_terrain(&mut store, TilePos::new(9, 9), 0, Some(SAND), false)
        .unwrap();
    store.get_mut(ChunkPos::new(0, 0)).unwrap().drain_pending();

    tiler
        .draw_terrain(&mut store, TilePos::new(10, 10), 0, None, true)
        .unwrap();
    assert_eq!(at(&store, 10, 10), None);
    assert_eq!(at(&store, 11, 10), Some(shape(WATER, [false; 4])));

    // the diagonal sand neighbor was revisited too, even though it never
    // connected to the erased water
    let changes = store.get_mut(ChunkPos::new(0, 0)).unwrap().drain_pending();
    let touched: Vec<LocalPos> = changes.iter().map(|c| c.local).collect();
    assert!(touched.contains(&LocalPos::new(10, 10)));
    assert!(touched.contains(&LocalPos::new(11, 10)));
    assert!(touched.contains(&LocalPos::new(9, 9)));
    assert_eq!(at(&store, 9, 9), Some(shape(SAND, [false; 4])));
}

#[test]
fn connectivity_crosses_chunk_borders() {
    let (mut store, tiler) = setup(&[(-1, 0), (0, 0)]);
    tiler
        .draw_terrain(&mut store, TilePos::new(-1, 3), 0, Some(WATER), false)
        .unwrap();
    tiler
        .draw_terrain(&mut store, TilePos::new(0, 3), 0, Some(WATER), false)
        .unwrap();
    assert_eq!(at(&store, -1, 3), Some(shape(WATER, [false, true, false, false])));
    assert_eq!(at(&store, 0, 3), Some(shape(WATER, [false, false, false, true])));
}

#[test]
fn update_tile_is_idempotent() {
    let (mut store, tiler) = setup(&[(0, 0)]);
    for (x, y) in [(3, 3), (4, 3), (4, 4), (5, 4)] {
        tiler
            .draw_terrain(&mut store, TilePos::new(x, y), 0, Some(WATER), false)
            .unwrap();
    }
    let before: Vec<_> = (2..7).map(|x| at(&store, x, 3)).collect();
    for _ in 0..2 {
        for x in 2..7 {
            tiler.update_tile(&mut store, TilePos::new(x, 3), 0, false).unwrap();
        }
    }
    let after: Vec<_> = (2..7).map(|x| at(&store, x, 3)).collect();
    assert_eq!(before, after);
}

#[test]
fn painting_outside_resident_chunks_fails() {
    let (mut store, tiler) = setup(&[(0, 0)]);
    let err = tiler
        .draw_terrain(&mut store, TilePos::new(40, 3), 0, Some(WATER), false)
        .unwrap_err();
    assert!(matches!(err, AutotileError::MissingChunk(c) if c == ChunkPos::new(2, 0)));
    let err = tiler
        .draw_terrain(&mut store, TilePos::new(1, 1), 5, Some(WATER), false)
        .unwrap_err();
    assert!(matches!(err, AutotileError::Chunk(_)));
}

#[test]
fn seam_refresh_repairs_generation_time_fill() {
    let (mut store, tiler) = setup(&[(0, 0)]);
    tiler
        .draw_terrain(&mut store, TilePos::new(0, 5), 0, Some(WATER), false)
        .unwrap();
    assert_eq!(at(&store, 0, 5), Some(shape(WATER, [false; 4])));

    // neighbor chunk filled by type without neighbor context
    let mut west = store.allocate(ChunkPos::new(-1, 0));
    let water_ty = tiler.lookup().type_of(shape(WATER, [false; 4])).unwrap();
    west.set_terrain_by_type(LocalPos::new(15, 5), 0, water_ty, tiler.lookup(), false)
        .unwrap();
    store.insert(west);

    assert!(tiler.refresh_seams(&mut store, ChunkPos::new(-1, 0)) >= 2);
    assert_eq!(at(&store, -1, 5), Some(shape(WATER, [false, true, false, false])));
    assert_eq!(at(&store, 0, 5), Some(shape(WATER, [false, false, false, true])));
    assert!(!store.get(ChunkPos::new(-1, 0)).unwrap().is_modified());
    assert_eq!(tiler.refresh_seams(&mut store, ChunkPos::new(9, 9)), 0);
}

#[test]
fn unresolved_shape_keeps_previous_tiles() {
    // no tile joins only to the north
    let (mut store, tiler) = setup_with(registry_with(|m| m != 1), &[(0, 0)]);
    tiler
        .draw_terrain(&mut store, TilePos::new(10, 9), 0, Some(WATER), false)
        .unwrap();
    let chunk = store.get_mut(ChunkPos::new(0, 0)).unwrap();
    chunk.drain_pending();
    let before = chunk.layers()[0].as_bytes().to_vec();

    let err = tiler
        .draw_terrain(&mut store, TilePos::new(10, 10), 0, Some(WATER), true)
        .unwrap_err();
    assert!(matches!(err, AutotileError::UnresolvedShape { tile, .. } if tile == TilePos::new(10, 10)));

    let chunk = store.get(ChunkPos::new(0, 0)).unwrap();
    assert_eq!(chunk.layers()[0].as_bytes(), &before[..]);
    assert!(chunk.pending().is_empty());
    assert!(!chunk.is_modified());
    assert_eq!(at(&store, 10, 9), Some(shape(WATER, [false; 4])));
    assert_eq!(at(&store, 10, 10), None);
}
