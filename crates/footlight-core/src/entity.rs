//! Entities (sprites, the stage, clones) and the population they form

use crate::{
    event::EventKind,
    input::Point,
    trigger::Trigger,
    value::ValueMap,
    Error, Result,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Create a new entity ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// Whether an entity is a sprite or the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Sprite,
    Stage,
}

/// Mutable per-entity state scripts may read and write
///
/// Kept separate from the trigger list so a running trigger can borrow the
/// state of the entity that owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    /// Center position in stage coordinates
    pub x: f64,
    pub y: f64,
    /// Visual bounds used for click hit-testing
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    /// Current costume (or backdrop, for the stage)
    pub costume: usize,
    /// Transient graphic effects, cleared on global reset
    pub effects: IndexMap<String, f64>,
    /// Free-form script-owned values
    pub properties: ValueMap,
}

impl Default for EntityState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            visible: true,
            costume: 0,
            effects: IndexMap::new(),
            properties: ValueMap::new(),
        }
    }
}

impl EntityState {
    /// Whether a point falls inside the entity's rectangular bounds
    pub fn bounds_contain(&self, point: Point) -> bool {
        (point.x - self.x).abs() <= self.width / 2.0
            && (point.y - self.y).abs() <= self.height / 2.0
    }
}

/// A sprite, the stage, or a runtime-created clone
#[derive(Debug)]
pub struct Entity {
    /// Unique identifier for this entity
    pub id: EntityId,
    /// Name; clones share their origin's name
    pub name: String,
    pub role: Role,
    /// The entity this one was cloned from, if any
    pub origin: Option<EntityId>,
    /// Ordered triggers; order governs dispatch within this entity
    pub triggers: Vec<Trigger>,
    /// Mutable state scripts operate on
    pub state: EntityState,
}

impl Entity {
    fn new(id: EntityId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            origin: None,
            triggers: Vec::new(),
            state: EntityState::default(),
        }
    }

    /// Whether this entity is a runtime-created clone
    pub fn is_clone(&self) -> bool {
        self.origin.is_some()
    }

    /// Add a trigger; declaration order is dispatch order
    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    /// Whether any trigger listens for the given event kind
    pub fn listens_for(&self, kind: EventKind) -> bool {
        self.triggers.iter().any(|t| t.kind() == kind)
    }
}

/// The entity population: sprites and clones in insertion order, plus the
/// stage
///
/// Dispatch order is sprites/clones first (insertion order), then the
/// stage. Clones are inserted directly after their origin.
#[derive(Debug)]
pub struct Cast {
    stage: Entity,
    sprites: IndexMap<EntityId, Entity>,
    by_name: IndexMap<String, EntityId>,
    next_id: u64,
}

impl Cast {
    /// Create a population containing only a stage
    pub fn new() -> Self {
        Self {
            stage: Entity::new(EntityId::new(0), "Stage", Role::Stage),
            sprites: IndexMap::new(),
            by_name: IndexMap::new(),
            next_id: 1,
        }
    }

    /// The stage entity
    pub fn stage(&self) -> &Entity {
        &self.stage
    }

    /// The stage entity, mutably
    pub fn stage_mut(&mut self) -> &mut Entity {
        &mut self.stage
    }

    /// Define a new sprite; names must be unique among origin sprites
    pub fn add_sprite(&mut self, name: impl Into<String>) -> Result<&mut Entity> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateName(name));
        }
        let id = self.allocate_id();
        self.by_name.insert(name.clone(), id);
        Ok(self
            .sprites
            .entry(id)
            .or_insert_with(|| Entity::new(id, name, Role::Sprite)))
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Look up an origin sprite by name
    pub fn sprite(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).and_then(|id| self.sprites.get(id))
    }

    /// Get any entity by ID
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if id == self.stage.id {
            Some(&self.stage)
        } else {
            self.sprites.get(&id)
        }
    }

    /// Get any entity by ID, mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if id == self.stage.id {
            Some(&mut self.stage)
        } else {
            self.sprites.get_mut(&id)
        }
    }

    /// Whether an entity is present
    pub fn contains(&self, id: EntityId) -> bool {
        id == self.stage.id || self.sprites.contains_key(&id)
    }

    /// Entities in dispatch order: sprites and clones, then the stage
    pub fn iter_dispatch(&self) -> impl Iterator<Item = &Entity> {
        self.sprites.values().chain(std::iter::once(&self.stage))
    }

    /// Entities in dispatch order, mutably
    pub fn iter_dispatch_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.sprites
            .values_mut()
            .chain(std::iter::once(&mut self.stage))
    }

    /// Number of sprites and clones (excluding the stage)
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Create a clone of an existing sprite
    ///
    /// The clone copies every trigger template with fresh run state and is
    /// inserted into dispatch order directly after its origin.
    pub fn create_clone(&mut self, origin: EntityId) -> Result<EntityId> {
        let origin_index = self
            .sprites
            .get_index_of(&origin)
            .ok_or(Error::EntityNotFound(origin))?;
        let id = self.allocate_id();

        let source = &self.sprites[origin_index];
        let mut clone = Entity::new(id, source.name.clone(), Role::Sprite);
        clone.origin = Some(origin);
        clone.triggers = source.triggers.iter().map(|t| t.fresh_copy()).collect();
        clone.state = source.state.clone();

        self.sprites.shift_insert(origin_index + 1, id, clone);
        Ok(id)
    }

    /// Remove an entity; the stage cannot be removed
    pub fn remove(&mut self, id: EntityId) -> Result<Entity> {
        let entity = self
            .sprites
            .shift_remove(&id)
            .ok_or(Error::EntityNotFound(id))?;
        if !entity.is_clone() {
            self.by_name.shift_remove(&entity.name);
        }
        Ok(entity)
    }

    /// Remove every clone, returning their IDs
    pub fn remove_clones(&mut self) -> Vec<EntityId> {
        let removed: Vec<EntityId> = self
            .sprites
            .values()
            .filter(|e| e.is_clone())
            .map(|e| e.id)
            .collect();
        self.sprites.retain(|_, e| !e.is_clone());
        removed
    }
}

impl Default for Cast {
    fn default() -> Self {
        Self::new()
    }
}
