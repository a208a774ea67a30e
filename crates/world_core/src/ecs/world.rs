//! World: owner of every entity in a scene
//!
//! Entities live in a [`SlotMap`] keyed by [`EntityId`], so handles held by
//! components (e.g. a constraint's other body) go stale instead of dangling
//! when the target is destroyed. Creation order is tracked separately and
//! used for ticking and persistence.

use std::collections::HashMap;
use std::path::Path;

use slotmap::{Key, KeyData, SlotMap};

use crate::config::WorldConfig;
use crate::ecs::entity::Entity;
use crate::persistence::{EntityRecord, PersistenceError, PersistenceSink, PersistenceSource, SceneDocument};

slotmap::new_key_type! {
    /// Handle of an entity in a [`World`]
    pub struct EntityId;
}

impl EntityId {
    /// Persisted form of the handle; zero for the null handle
    pub fn to_bits(self) -> u64 {
        if self.is_null() {
            0
        } else {
            self.data().as_ffi()
        }
    }

    /// Inverse of [`EntityId::to_bits`]
    pub fn from_bits(bits: u64) -> Self {
        // Live keys always carry an odd version, so zero never collides with one
        if bits == 0 {
            Self::null()
        } else {
            Self::from(KeyData::from_ffi(bits))
        }
    }
}

/// World errors
#[derive(thiserror::Error, Debug)]
pub enum WorldError {
    /// The configured entity limit is reached
    #[error("entity limit of {0} reached")]
    EntityLimit(usize),

    /// The handle does not name a live entity
    #[error("no entity with handle {0:?}")]
    UnknownEntity(EntityId),

    /// Saving or loading failed
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Scene owner
pub struct World {
    config: WorldConfig,
    entities: SlotMap<EntityId, Entity>,
    order: Vec<EntityId>,
    pending_destroy: Vec<EntityId>,
    simulating: bool,
}

impl World {
    /// Empty world
    pub fn new(config: WorldConfig) -> Self {
        log::info!("Creating world (max {} entities)", config.max_entities);
        let simulating = config.start_simulating;
        Self {
            config,
            entities: SlotMap::with_key(),
            order: Vec::new(),
            pending_destroy: Vec::new(),
            simulating,
        }
    }

    /// Settings the world was built with
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Create an entity with a Transform; started when the world simulates
    pub fn create_entity(&mut self, name: impl Into<String>) -> Result<EntityId, WorldError> {
        if self.entities.len() >= self.config.max_entities {
            return Err(WorldError::EntityLimit(self.config.max_entities));
        }

        let name = name.into();
        let id = self.entities.insert_with_key(|id| Entity::new(id, name));
        self.order.push(id);

        if self.simulating {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.start();
            }
        }
        log::debug!("Created entity {:?}", id);
        Ok(id)
    }

    /// Destroy an entity now; every component receives `on_remove`
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<(), WorldError> {
        let entity = self.entities.remove(id).ok_or(WorldError::UnknownEntity(id))?;
        self.order.retain(|other| *other != id);
        log::debug!("Destroying entity '{}'", entity.name());
        drop(entity);
        Ok(())
    }

    /// Destroy an entity at the end of the next tick
    pub fn defer_destroy(&mut self, id: EntityId) {
        if !self.pending_destroy.contains(&id) {
            self.pending_destroy.push(id);
        }
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        for id in std::mem::take(&mut self.order).into_iter().rev() {
            self.entities.remove(id);
        }
        self.pending_destroy.clear();
    }

    /// Entity behind `id`
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Entity behind `id`, mutable
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Whether `id` names a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(|id| self.entities.get(*id))
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// First entity named `name`, in creation order
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities().find(|entity| entity.name() == name).map(Entity::id)
    }

    /// Whether the simulation is running
    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    /// Start the simulation on every entity
    pub fn start(&mut self) {
        if self.simulating {
            return;
        }
        self.simulating = true;
        for id in &self.order {
            if let Some(entity) = self.entities.get_mut(*id) {
                entity.start();
            }
        }
        log::info!("Simulation started ({} entities)", self.entities.len());
    }

    /// Stop the simulation on every entity
    pub fn stop(&mut self) {
        if !self.simulating {
            return;
        }
        self.simulating = false;
        for id in &self.order {
            if let Some(entity) = self.entities.get_mut(*id) {
                entity.stop();
            }
        }
        log::info!("Simulation stopped");
    }

    /// Tick every active entity, then apply deferred destructions
    pub fn tick(&mut self, delta_time: f32) {
        for id in &self.order {
            if let Some(entity) = self.entities.get_mut(*id) {
                entity.tick(delta_time);
            }
        }

        for id in std::mem::take(&mut self.pending_destroy) {
            if self.destroy_entity(id).is_err() {
                log::debug!("Deferred destruction of {:?} found no entity", id);
            }
        }
    }

    /// Tick with the configured fixed step
    pub fn tick_fixed(&mut self) {
        self.tick(self.config.fixed_delta);
    }

    /// Write every entity to `sink`, each preceded by its handle
    pub fn save(&self, sink: &mut dyn PersistenceSink) -> Result<(), WorldError> {
        sink.write_u32(self.entities.len() as u32)?;
        for entity in self.entities() {
            sink.write_u64(entity.id().to_bits())?;
            entity.serialize(sink)?;
        }
        Ok(())
    }

    /// Replace every entity with those read from `source`
    ///
    /// On error the world is left as it was.
    pub fn load(&mut self, source: &mut dyn PersistenceSource) -> Result<(), WorldError> {
        let mut staged = self.staging();
        let count = source.read_u32()?;
        let mut handles = HashMap::with_capacity(count as usize);
        for _ in 0..count {
            let saved = EntityId::from_bits(source.read_u64()?);
            let id = staged.create_entity(String::new())?;
            if let Some(entity) = staged.entities.get_mut(id) {
                entity.deserialize(source)?;
            }
            handles.insert(saved, id);
        }
        staged.remap_entities(&handles);

        std::mem::swap(self, &mut staged);
        log::info!("Loaded {} entities", count);
        Ok(())
    }

    /// Snapshot the world as a scene document
    pub fn to_scene(&self) -> Result<SceneDocument, WorldError> {
        let entities = self.entities().map(EntityRecord::capture).collect::<Result<Vec<_>, _>>()?;
        Ok(SceneDocument { entities })
    }

    /// Replace every entity with those in `scene`
    ///
    /// On error the world is left as it was.
    pub fn load_scene(&mut self, scene: &SceneDocument) -> Result<(), WorldError> {
        let mut staged = self.staging();
        let mut handles = HashMap::with_capacity(scene.entities.len());
        for record in &scene.entities {
            let id = staged.create_entity(record.name.clone())?;
            if let Some(entity) = staged.entities.get_mut(id) {
                record.restore(entity)?;
            }
            handles.insert(EntityId::from_bits(record.id), id);
        }
        staged.remap_entities(&handles);

        std::mem::swap(self, &mut staged);
        Ok(())
    }

    // Empty world with the same settings and simulation state
    fn staging(&self) -> World {
        let mut staged = World::new(self.config.clone());
        staged.simulating = self.simulating;
        staged
    }

    // Translate references saved in another world into this one's handles
    fn remap_entities(&mut self, handles: &HashMap<EntityId, EntityId>) {
        let lookup = |saved: EntityId| handles.get(&saved).copied();
        for entity in self.entities.values_mut() {
            entity.remap_entities(&lookup);
        }
    }

    /// Encode the world as RON
    pub fn save_scene_ron(&self) -> Result<String, WorldError> {
        Ok(self.to_scene()?.to_ron_string()?)
    }

    /// Replace every entity with those in a RON scene
    pub fn load_scene_ron(&mut self, text: &str) -> Result<(), WorldError> {
        let scene = SceneDocument::from_ron_str(text)?;
        self.load_scene(&scene)
    }

    /// Write the world to a RON scene file
    pub fn save_scene_file(&self, path: impl AsRef<Path>) -> Result<(), WorldError> {
        let path = path.as_ref();
        self.to_scene()?.save(path)?;
        log::info!("Saved scene to {}", path.display());
        Ok(())
    }

    /// Replace every entity with those in a RON scene file
    pub fn load_scene_file(&mut self, path: impl AsRef<Path>) -> Result<(), WorldError> {
        let path = path.as_ref();
        let scene = SceneDocument::load(path)?;
        self.load_scene(&scene)?;
        log::info!("Loaded scene from {}", path.display());
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.clear();
    }
}
