//! Inspector demo application
//!
//! Builds a small scene, runs a few simulation steps, copies a light onto
//! another entity, round-trips the scene through the RON and binary
//! adapters and prints what the inspector sees.
//!
//! Usage: `inspector_demo [config.toml|config.ron]`

use std::path::PathBuf;

use world_core::foundation::logging;
use world_core::ecs::inspector;
use world_core::prelude::*;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error("entity '{0}' vanished from the scene")]
    MissingEntity(&'static str),
}

struct InspectorDemo {
    world: World,
    clipboard: ComponentClipboard,
    steps: u32,
}

impl InspectorDemo {
    fn new(config: WorldConfig) -> Self {
        Self {
            world: World::new(config),
            clipboard: ComponentClipboard::new(),
            steps: 120,
        }
    }

    fn build_scene(&mut self) -> Result<(), DemoError> {
        log::info!("Building scene...");

        let sun = self.world.create_entity("sun")?;
        let entity = self.world.entity_mut(sun).ok_or(DemoError::MissingEntity("sun"))?;
        let light = entity.add_component::<Light>().ok_or(DemoError::MissingEntity("sun"))?;
        light.set_light_type(LightType::Directional);
        light.set_color(Vec4::new(1.0, 0.95, 0.8, 1.0));
        light.set_intensity(3.0);
        if let Some(transform) = entity.transform_mut() {
            transform.set_rotation(Quat::from_euler_angles(-0.8, 0.3, 0.0));
        }

        let viewer = self.world.create_entity("viewer")?;
        let entity = self.world.entity_mut(viewer).ok_or(DemoError::MissingEntity("viewer"))?;
        entity.add_component::<Camera>();
        entity.add_component::<AudioListener>();
        if let Some(transform) = entity.transform_mut() {
            transform.set_position(Vec3::new(0.0, 2.0, 10.0));
        }

        let teapot = self.world.create_entity("teapot")?;
        let entity = self.world.entity_mut(teapot).ok_or(DemoError::MissingEntity("teapot"))?;
        if let Some(renderable) = entity.add_component::<Renderable>() {
            renderable.set_geometry(GeometryType::Cube);
            renderable.set_mesh_path("resources/models/teapot.obj");
        }
        if let Some(body) = entity.add_component::<PhysicsBody>() {
            body.set_body_type(BodyType::Dynamic);
            body.set_mass(2.5);
        }
        if let Some(source) = entity.add_component::<AudioSource>() {
            source.set_clip("resources/audio/hum.wav");
            source.set_looping(true);
        }

        log::info!("Scene built with {} entities", self.world.entity_count());
        Ok(())
    }

    fn simulate(&mut self) {
        log::info!("Simulating {} steps...", self.steps);
        self.world.start();
        for _ in 0..self.steps {
            if let Some(id) = self.world.find_by_name("teapot") {
                if let Some(transform) = self.world.entity_mut(id).and_then(Entity::transform_mut) {
                    transform.rotate(Quat::from_euler_angles(0.0, 0.02, 0.0));
                }
            }
            self.world.tick_fixed();
        }
        self.world.stop();
    }

    fn copy_light(&mut self) -> Result<(), DemoError> {
        let sun = self.world.find_by_name("sun").ok_or(DemoError::MissingEntity("sun"))?;
        let entity = self.world.entity(sun).ok_or(DemoError::MissingEntity("sun"))?;
        self.clipboard.copy(entity, ComponentType::Light)?;

        let lamp = self.world.create_entity("lamp")?;
        let entity = self.world.entity_mut(lamp).ok_or(DemoError::MissingEntity("lamp"))?;
        self.clipboard.paste(entity)?;
        inspector::edit_by_name(entity, ComponentType::Light, "light_type", AttributeValue::U32(LightType::Point as u32))?;
        inspector::edit_by_name(entity, ComponentType::Light, "intensity", AttributeValue::F32(0.5))?;

        log::info!("Pasted sun light onto lamp");
        Ok(())
    }

    fn roundtrip(&mut self) -> Result<(), DemoError> {
        let scene_path = std::env::temp_dir().join("inspector_demo_scene.ron");
        self.world.save_scene_file(&scene_path)?;

        let mut writer = BinaryWriter::new(Vec::new());
        self.world.save(&mut writer)?;
        log::info!("Binary snapshot: {} bytes", writer.bytes_written());
        let bytes = writer.into_inner()?;

        let mut from_ron = World::new(self.world.config().clone());
        from_ron.load_scene_file(&scene_path)?;

        let mut from_binary = World::new(self.world.config().clone());
        from_binary.load(&mut BinaryReader::new(bytes.as_slice()))?;

        for (left, right) in from_ron.entities().zip(from_binary.entities()) {
            let left = inspector::inspect_entity(left);
            let right = inspector::inspect_entity(right);
            if left.components != right.components {
                log::warn!("Entity '{}' differs between RON and binary snapshots", left.name);
            }
        }

        if let Err(e) = std::fs::remove_file(&scene_path) {
            log::debug!("Could not remove {}: {}", scene_path.display(), e);
        }
        self.world = from_binary;
        Ok(())
    }

    fn print(&self) {
        for entity in self.world.entities() {
            print!("{}", inspector::inspect_entity(entity));
        }
    }

    fn run(&mut self) -> Result<(), DemoError> {
        self.build_scene()?;
        self.simulate();
        self.copy_light()?;
        self.roundtrip()?;
        self.print();
        Ok(())
    }
}

fn load_config() -> Result<WorldConfig, ConfigError> {
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => WorldConfig::load_from_file(path),
        None => Ok(WorldConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);

    log::info!("Starting inspector demo");
    let mut demo = InspectorDemo::new(config);
    match demo.run() {
        Ok(()) => {
            log::info!("Inspector demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Inspector demo failed: {}", e);
            Err(e.into())
        }
    }
}
