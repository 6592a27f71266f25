use std::collections::BTreeMap;

use strata_geom::Vec2;

pub type AgentId = u32;

/// Default agent speed in pixels per second.
pub const DEFAULT_SPEED: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    /// Script-side codes: 0 left, 1 right, 2 up, 3 down. Anything else
    /// means "stand still".
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(MoveDir::Left),
            1 => Some(MoveDir::Right),
            2 => Some(MoveDir::Up),
            3 => Some(MoveDir::Down),
            _ => None,
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            MoveDir::Left => Vec2::new(-1.0, 0.0),
            MoveDir::Right => Vec2::new(1.0, 0.0),
            MoveDir::Up => Vec2::new(0.0, -1.0),
            MoveDir::Down => Vec2::new(0.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AgentInfo {
    pub id: AgentId,
    pub name: String,
    pub position: Vec2,
}

/// The capability surface scripted agents get. Nothing else of the world
/// is reachable through it.
pub trait AgentApi {
    fn tick(&self) -> u64;
    /// Sorted by id.
    fn agents(&self) -> Vec<AgentInfo>;
    fn create_agent(&mut self, name: &str) -> AgentId;
    /// False when no such agent exists.
    fn destroy_agent(&mut self, id: AgentId) -> bool;
    /// Moves for `dt` seconds; `None` direction keeps the agent in place.
    /// Returns the new position, or `None` for an unknown id.
    fn move_agent(&mut self, id: AgentId, dir: Option<MoveDir>, speed: f32, dt: f32)
    -> Option<Vec2>;
}

/// Agent bookkeeping owned by the world context.
#[derive(Default)]
pub struct Agents {
    next_id: AgentId,
    by_id: BTreeMap<AgentId, AgentInfo>,
}

impl Agents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentInfo> {
        self.by_id.get(&id)
    }

    pub fn list(&self) -> Vec<AgentInfo> {
        self.by_id.values().cloned().collect()
    }

    /// Ids are never reused within one context.
    pub fn create(&mut self, name: &str) -> AgentId {
        let id = self.next_id;
        self.next_id += 1;
        self.by_id.insert(
            id,
            AgentInfo {
                id,
                name: name.to_string(),
                position: Vec2::ZERO,
            },
        );
        log::info!(target: "agents", "agent {id} `{name}` created");
        id
    }

    pub fn destroy(&mut self, id: AgentId) -> bool {
        let gone = self.by_id.remove(&id).is_some();
        if gone {
            log::info!(target: "agents", "agent {id} destroyed");
        }
        gone
    }

    pub fn step(&mut self, id: AgentId, dir: Option<MoveDir>, speed: f32, dt: f32) -> Option<Vec2> {
        let agent = self.by_id.get_mut(&id)?;
        if let Some(dir) = dir {
            agent.position += dir.unit() * (speed * dt);
        }
        Some(agent.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_never_reused() {
        let mut a = Agents::new();
        let x = a.create("x");
        let y = a.create("y");
        assert_ne!(x, y);
        assert!(a.destroy(x));
        assert!(!a.destroy(x));
        let z = a.create("z");
        assert!(z != x && z != y);
        let names: Vec<String> = a.list().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["y", "z"]);
    }

    #[test]
    fn moves_scale_with_speed_and_time() {
        let mut a = Agents::new();
        let id = a.create("walker");
        assert_eq!(
            a.step(id, Some(MoveDir::Right), DEFAULT_SPEED, 0.5),
            Some(Vec2::new(50.0, 0.0))
        );
        assert_eq!(
            a.step(id, MoveDir::from_code(2), 10.0, 1.0),
            Some(Vec2::new(50.0, -10.0))
        );
        assert_eq!(a.step(id, MoveDir::from_code(7), 10.0, 1.0), Some(Vec2::new(50.0, -10.0)));
        assert_eq!(a.step(99, Some(MoveDir::Left), 1.0, 1.0), None);
    }
}
