use std::thread;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use strata_chunk::{ChunkData, ChunkStore};
use strata_geom::ChunkPos;
use strata_tiles::TileMeta;
use strata_world::Generator;

/// Named worker threads for chunk generation. Each coordinate is generated
/// independently; callers block until the whole set is done.
pub struct GenPool {
    pool: ThreadPool,
    workers: usize,
}

impl GenPool {
    /// `workers == 0` sizes the pool to the machine.
    pub fn new(workers: usize) -> Result<Self, ThreadPoolBuildError> {
        let workers = if workers == 0 {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            workers
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("strata-gen-{i}"))
            .build()?;
        log::info!(target: "stream", "generation pool: {workers} workers");
        Ok(Self { pool, workers })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Allocates and fills one chunk per coordinate, in input order.
    pub fn generate(
        &self,
        coords: &[ChunkPos],
        store: &ChunkStore,
        generator: &dyn Generator,
        meta: &(dyn TileMeta + Sync),
    ) -> Vec<ChunkData> {
        if coords.is_empty() {
            return Vec::new();
        }
        let (size, layers) = (store.grid().chunk_size, store.layer_count());
        self.pool.install(|| {
            coords
                .par_iter()
                .map(|&coord| {
                    let mut chunk = ChunkData::new(coord, size, layers);
                    generator.generate(&mut chunk, meta);
                    chunk
                })
                .collect()
        })
    }
}
