use proptest::prelude::*;
use strata_geom::{ChunkPos, Grid, LocalPos, Size2, TilePos, Vec2};

fn dim() -> impl Strategy<Value = i32> {
    1i32..=64
}

fn coord() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

proptest! {
    // chunk = floor(tile / size) and 0 <= local < size, negatives included
    #[test]
    fn split_matches_floor_division(x in coord(), y in coord(), w in dim(), h in dim()) {
        let g = Grid::new(Size2::new(w, h), Size2::square(16));
        let (c, l) = g.split(TilePos::new(x, y));
        let fx = ((x as f64) / (w as f64)).floor() as i32;
        let fy = ((y as f64) / (h as f64)).floor() as i32;
        prop_assert_eq!(c, ChunkPos::new(fx, fy));
        prop_assert!(l.x >= 0 && l.x < w);
        prop_assert!(l.y >= 0 && l.y < h);
        prop_assert_eq!(l, LocalPos::new(x - c.x * w, y - c.y * h));
    }

    // local_to_tile inverts split
    #[test]
    fn split_roundtrip(x in coord(), y in coord(), w in dim(), h in dim()) {
        let g = Grid::new(Size2::new(w, h), Size2::square(16));
        let t = TilePos::new(x, y);
        let (c, l) = g.split(t);
        prop_assert_eq!(g.local_to_tile(c, l), t);
    }

    // The pixel at a tile's top-left corner, and anywhere inside it, maps back to that tile
    #[test]
    fn pixel_inside_tile_maps_back(x in -100_000i32..=100_000, y in -100_000i32..=100_000,
                                   fx in 0.0f32..0.99, fy in 0.0f32..0.99) {
        let g = Grid::new(Size2::square(16), Size2::new(8, 12));
        let t = TilePos::new(x, y);
        let p = g.tile_to_pixel(t);
        let inside = p + Vec2::new(fx * 8.0, fy * 12.0);
        prop_assert_eq!(g.pixel_to_tile(p), t);
        prop_assert_eq!(g.pixel_to_tile(inside), t);
        prop_assert_eq!(g.pixel_to_chunk(inside), g.tile_to_chunk(t));
    }
}
