//! Headless driver: streams and autotiles a world around a wandering agent.
#![forbid(unsafe_code)]

mod config;
mod logging;

use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use strata_autotile::TerrainLookup;
use strata_runtime::{
    AgentApi, DEFAULT_SPEED, GenPool, HandoffQueue, MirrorRenderer, MoveDir, Streamer,
    WorldContext, WorldEvent, channel,
};
use strata_tiles::TileRegistry;

#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(about = "Stream and autotile a chunked 2D tile world without a window", long_about = None)]
struct Cli {
    /// Driver config file; asset paths resolve relative to it
    #[arg(long, default_value = "strata.toml")]
    config: PathBuf,

    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// World seed (overrides the config)
    #[arg(long)]
    seed: Option<i32>,

    /// Agent speed in pixels per second
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    speed: f32,

    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Paint water on the top layer along the agent's path
    #[arg(long)]
    paint: bool,
}

const DT: f32 = 1.0 / 60.0;
// The agent walks a square: right, down, left, up.
const LEG_TICKS: u64 = 240;
const LEGS: [MoveDir; 4] = [MoveDir::Right, MoveDir::Down, MoveDir::Left, MoveDir::Up];

#[derive(Default, Debug)]
struct Stats {
    loaded: usize,
    unloaded: usize,
    tiles_changed: usize,
    ready_at: Option<u64>,
}

impl Stats {
    fn record(&mut self, tick: u64, ev: WorldEvent) {
        match ev {
            WorldEvent::WorldReady => self.ready_at = Some(tick),
            WorldEvent::ChunkLoaded(_) => self.loaded += 1,
            WorldEvent::ChunkUnloaded(_) => self.unloaded += 1,
            WorldEvent::TileChanged(_) => self.tiles_changed += 1,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.log_file.as_deref()) {
        eprintln!("logging disabled: {e}");
    }
    if let Err(e) = run(&cli) {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let (cfg, base) = config::AppConfig::load(&cli.config)?;
    let seed = cli.seed.unwrap_or(cfg.seed);
    let grid = cfg.world.grid()?;

    let reg = TileRegistry::load_from_path(base.join(&cfg.assets.tileset))?;
    let lookup = Arc::new(TerrainLookup::build(&reg)?);
    let wg = strata_world::load_config_from_path(&base.join(&cfg.assets.worldgen))?;
    let generator = strata_world::build_generator(&wg, &reg, seed)?;
    log::info!(
        "seed {seed}, {} tile types, {} shapes, chunk {}x{}",
        reg.types.len(),
        lookup.shape_count(),
        grid.chunk_size.w,
        grid.chunk_size.h
    );

    let paint = if cli.paint {
        let key = reg
            .find_terrain("water")
            .ok_or("--paint needs a `water` terrain in the tileset")?;
        Some((key, cfg.world.layers - 1))
    } else {
        None
    };

    let (tx, rx) = channel();
    let mut ctx = WorldContext::new(grid, cfg.world.layers, lookup, tx)
        .with_seam_refresh(cfg.stream.refresh_seams);
    let mut streamer = Streamer::new(cfg.stream.range).with_revalidation(cfg.stream.revalidate);
    let pool = GenPool::new(cfg.stream.workers)?;
    let mut queue = HandoffQueue::new();
    let mut renderer = MirrorRenderer::new();
    let mut stats = Stats::default();

    let agent = ctx.create_agent("scout");
    for _ in 0..cli.ticks {
        let tick = ctx.tick();
        let dir = LEGS[((tick / LEG_TICKS) % LEGS.len() as u64) as usize];
        let Some(pos) = ctx.move_agent(agent, Some(dir), cli.speed, DT) else {
            break;
        };

        streamer.evaluate(pos, &grid);
        streamer.drain(&ctx, &pool, generator.as_ref(), &mut queue);
        queue.apply(&mut ctx, &mut renderer, &mut streamer);

        if let Some((key, layer)) = paint {
            let tile = grid.pixel_to_tile(pos);
            if ctx.terrain_at(tile, layer) != Some(key) {
                if let Err(e) = ctx.draw_terrain(tile, layer, Some(key)) {
                    log::debug!(target: "autotile", "paint at {tile:?} skipped: {e}");
                }
            }
        }

        ctx.frame(&mut renderer);
        for ev in rx.try_iter() {
            stats.record(tick, ev);
        }
        ctx.advance_tick();
    }

    log::info!(
        "{} ticks: {} loads, {} unloads, {} tile changes, {} chunks resident, world ready at {:?}",
        ctx.tick(),
        stats.loaded,
        stats.unloaded,
        stats.tiles_changed,
        ctx.store().len(),
        stats.ready_at
    );
    log::info!(
        "renderer mirrors {} chunks, applied {} changes; {} generation workers",
        renderer.attached(),
        renderer.applied(),
        pool.workers()
    );
    Ok(())
}
