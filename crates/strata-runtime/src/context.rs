use std::sync::Arc;

use crossbeam_channel::Sender;
use strata_autotile::{AutotileError, Autotiler, TerrainLookup};
use strata_chunk::{ChunkData, ChunkError, ChunkStore, TileRecord};
use strata_geom::{ChunkPos, Grid, TilePos, Vec2};
use strata_tiles::{TerrainKey, TerrainType};

use crate::agents::{AgentApi, AgentId, AgentInfo, Agents, MoveDir};
use crate::event::{WorldEvent, log_event};
use crate::render::Renderer;

/// Owns the resident chunks, the terrain lookup and the event sender.
/// Edits go through here and must happen on the thread that owns it.
pub struct WorldContext {
    store: ChunkStore,
    autotiler: Autotiler,
    events: Sender<WorldEvent>,
    refresh_seams: bool,
    tick: u64,
    agents: Agents,
}

impl WorldContext {
    pub fn new(
        grid: Grid,
        layer_count: usize,
        lookup: Arc<TerrainLookup>,
        events: Sender<WorldEvent>,
    ) -> Self {
        Self {
            store: ChunkStore::new(grid, layer_count),
            autotiler: Autotiler::new(lookup),
            events,
            refresh_seams: false,
            tick: 0,
            agents: Agents::new(),
        }
    }

    /// Re-autotile chunk borders on attach.
    pub fn with_seam_refresh(mut self, on: bool) -> Self {
        self.refresh_seams = on;
        self
    }

    #[inline]
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        self.store.grid()
    }

    #[inline]
    pub fn lookup(&self) -> &TerrainLookup {
        self.autotiler.lookup()
    }

    #[inline]
    pub fn refreshes_seams(&self) -> bool {
        self.refresh_seams
    }

    #[inline]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn emit(&self, ev: WorldEvent) {
        send(&self.events, self.tick, ev);
    }

    /// Inserts a generated chunk and opens it for change tracking.
    /// False when the coordinate is already attached.
    pub(crate) fn attach(&mut self, mut chunk: ChunkData) -> bool {
        if self.store.contains(chunk.coord) {
            return false;
        }
        chunk.mark_updatable();
        self.store.insert(chunk);
        true
    }

    pub(crate) fn detach(&mut self, coord: ChunkPos) -> bool {
        self.store.remove(coord).is_some()
    }

    pub(crate) fn refresh_seams(&mut self, coord: ChunkPos) -> usize {
        self.autotiler.refresh_seams(&mut self.store, coord)
    }

    /// Paints (or with `None`, erases) terrain at a global tile.
    pub fn draw_terrain(
        &mut self,
        tile: TilePos,
        layer: usize,
        terrain: Option<TerrainKey>,
    ) -> Result<(), AutotileError> {
        self.autotiler
            .draw_terrain(&mut self.store, tile, layer, terrain, true)
    }

    pub fn update_tile(&mut self, tile: TilePos, layer: usize) -> Result<(), AutotileError> {
        self.autotiler.update_tile(&mut self.store, tile, layer, true)
    }

    /// Writes the type's default tile with no neighbor handling.
    pub fn set_terrain_by_type(
        &mut self,
        tile: TilePos,
        layer: usize,
        ty: TerrainType,
    ) -> Result<(), ChunkError> {
        let (coord, local) = self.store.locate(tile);
        let lookup = self.autotiler.lookup();
        match self.store.get_mut(coord) {
            Some(chunk) => chunk.set_terrain_by_type(local, layer, ty, lookup, true),
            None => {
                let e = ChunkError::MissingChunk(coord);
                log::warn!(target: "chunk", "set_terrain_by_type {tile:?}: {e}");
                Err(e)
            }
        }
    }

    pub fn tile_at(&self, tile: TilePos, layer: usize) -> Option<TileRecord> {
        self.store.tile_at(tile, layer)
    }

    pub fn terrain_at(&self, tile: TilePos, layer: usize) -> Option<TerrainKey> {
        self.store.terrain_at(tile, layer, self.lookup())
    }

    /// Hands every queued cell change to the renderer and raises
    /// `TileChanged` for it. Returns the number of changes.
    pub fn frame(&mut self, renderer: &mut dyn Renderer) -> usize {
        let grid = *self.store.grid();
        let mut changed = 0;
        for chunk in self.store.iter_mut() {
            let coord = chunk.coord;
            for change in chunk.drain_pending() {
                renderer.apply(coord, &change);
                send(
                    &self.events,
                    self.tick,
                    WorldEvent::TileChanged(grid.local_to_tile(coord, change.local)),
                );
                changed += 1;
            }
        }
        changed
    }

    pub fn agent_position(&self, id: AgentId) -> Option<Vec2> {
        self.agents.get(id).map(|a| a.position)
    }
}

fn send(tx: &Sender<WorldEvent>, tick: u64, ev: WorldEvent) {
    log_event(tick, &ev);
    if tx.send(ev).is_err() {
        log::trace!(target: "events", "no receiver for {ev:?}");
    }
}

impl AgentApi for WorldContext {
    fn tick(&self) -> u64 {
        self.tick
    }

    fn agents(&self) -> Vec<AgentInfo> {
        self.agents.list()
    }

    fn create_agent(&mut self, name: &str) -> AgentId {
        self.agents.create(name)
    }

    fn destroy_agent(&mut self, id: AgentId) -> bool {
        self.agents.destroy(id)
    }

    fn move_agent(
        &mut self,
        id: AgentId,
        dir: Option<MoveDir>,
        speed: f32,
        dt: f32,
    ) -> Option<Vec2> {
        self.agents.step(id, dir, speed, dt)
    }
}
