//! Saving and loading entities through every persistence adapter

use approx::assert_relative_eq;

use crate::ecs::attribute::AttributeValue;
use crate::ecs::components::{Camera, Constraint, Light, Renderable, Transform};
use crate::ecs::{Component, ComponentType, Entity, EntityId, World};
use crate::foundation::math::{Quat, Vec3};
use crate::persistence::{BinaryReader, BinaryWriter, MemoryStream, PersistenceError};
use crate::render::{BufferState, GeometryType};

fn sample_entity() -> Entity {
    let mut entity = Entity::new(EntityId::default(), "crate");
    let transform = entity.transform_mut().unwrap();
    transform.set_position(Vec3::new(1.0, -2.0, 3.5));
    transform.set_rotation(Quat::from_euler_angles(0.1, 0.2, 0.3));
    transform.set_scale(Vec3::new(2.0, 2.0, 2.0));

    let renderable = entity.add_component::<Renderable>().unwrap();
    renderable.set_geometry(GeometryType::Cube);
    renderable.set_mesh_path("assets/models/crate.obj");
    renderable.set_cast_shadows(false);
    entity
}

// Binary reads renormalize rotations, so those compare within a tolerance
fn assert_same_components(left: &Entity, right: &Entity) {
    assert_eq!(left.name(), right.name());
    assert_eq!(left.mask(), right.mask());
    for (a, b) in left.components().zip(right.components()) {
        assert_eq!(a.component_type(), b.component_type());
        assert_eq!(a.is_enabled(), b.is_enabled());
        for (x, y) in a.attributes().iter().zip(b.attributes().iter()) {
            match (x, y) {
                (AttributeValue::Quat(x), AttributeValue::Quat(y)) => assert_relative_eq!(*x, *y, epsilon = 1e-6),
                _ => assert_eq!(x, y, "{} differs", a.component_type()),
            }
        }
    }
}

// A hinge referencing an anchor whose slot was reused, so its handle
// cannot match a fresh world's handles
fn world_with_joint() -> World {
    let mut world = World::default();
    let doomed = world.create_entity("doomed").unwrap();
    world.destroy_entity(doomed).unwrap();

    let anchor = world.create_entity("anchor").unwrap();
    let hinge = world.create_entity("hinge").unwrap();
    world.create_entity("loose").unwrap();

    let joint = world.entity_mut(hinge).unwrap().add_component::<Constraint>().unwrap();
    joint.set_body_other(Some(anchor));
    world
}

fn assert_joint_resolves(world: &World) {
    let anchor = world.find_by_name("anchor").unwrap();
    let hinge = world.find_by_name("hinge").unwrap();
    let other = world.entity(hinge).unwrap().get_component::<Constraint>().unwrap().body_other();
    assert_eq!(other, Some(anchor));
    assert!(world.contains(anchor));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_and_renderable_through_memory() {
        let original = sample_entity();
        let mut stream = MemoryStream::new();
        original.serialize(&mut stream).unwrap();

        let mut loaded = Entity::new(EntityId::default(), "");
        loaded.deserialize(&mut stream).unwrap();
        assert_eq!(stream.remaining(), 0);

        assert_same_components(&original, &loaded);
        let renderable = loaded.get_component::<Renderable>().unwrap();
        assert_eq!(renderable.vertex_buffer().state(), BufferState::Live);
        assert_eq!(renderable.vertex_buffer().vertex_count(), 36);
    }

    #[test]
    fn test_transform_and_renderable_through_binary() {
        let original = sample_entity();
        let mut writer = BinaryWriter::new(Vec::new());
        original.serialize(&mut writer).unwrap();
        let bytes = writer.into_inner().unwrap();

        let mut reader = BinaryReader::new(bytes.as_slice());
        let mut loaded = Entity::new(EntityId::default(), "");
        loaded.deserialize(&mut reader).unwrap();

        assert_same_components(&original, &loaded);
    }

    #[test]
    fn test_enabled_flag_persists() {
        let mut original = Entity::new(EntityId::default(), "dark");
        original.add_component::<Light>().unwrap().set_enabled(false);

        let mut stream = MemoryStream::new();
        original.serialize(&mut stream).unwrap();
        let mut loaded = Entity::new(EntityId::default(), "");
        loaded.deserialize(&mut stream).unwrap();

        assert!(!loaded.get_component::<Light>().unwrap().is_enabled());
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let mut stream = MemoryStream::from_values(vec![
            AttributeValue::String("broken".into()),
            AttributeValue::Bool(true),
            AttributeValue::U32(1),
            AttributeValue::U32(42),
        ]);
        let mut entity = Entity::new(EntityId::default(), "");
        let result = entity.deserialize(&mut stream);
        assert!(matches!(result, Err(PersistenceError::UnknownComponentType(42))));
    }

    #[test]
    fn test_truncated_stream_is_an_error() {
        let original = sample_entity();
        let mut stream = MemoryStream::new();
        original.serialize(&mut stream).unwrap();

        let mut values = stream.into_values();
        values.truncate(values.len() - 1);
        let mut truncated = MemoryStream::from_values(values);

        let mut entity = Entity::new(EntityId::default(), "");
        let result = entity.deserialize(&mut truncated);
        assert!(matches!(result, Err(PersistenceError::UnexpectedEnd)));
    }

    #[test]
    fn test_world_scene_ron_roundtrip() {
        let mut world = World::default();
        let lamp = world.create_entity("lamp").unwrap();
        world.entity_mut(lamp).unwrap().add_component::<Light>().unwrap().set_range(25.0);
        let viewer = world.create_entity("viewer").unwrap();
        world.entity_mut(viewer).unwrap().add_component::<Camera>().unwrap();

        let text = world.save_scene_ron().unwrap();
        assert!(text.contains("lamp"));

        let mut loaded = World::default();
        loaded.load_scene_ron(&text).unwrap();
        assert_eq!(loaded.entity_count(), 2);

        for (a, b) in world.entities().zip(loaded.entities()) {
            assert_same_components(a, b);
        }
        let lamp = loaded.find_by_name("lamp").unwrap();
        assert_eq!(loaded.entity(lamp).unwrap().get_component::<Light>().unwrap().range(), 25.0);
        assert!(loaded.entity(lamp).unwrap().has_component(ComponentType::Transform));
    }

    #[test]
    fn test_deserialize_reuses_existing_components() {
        let original = sample_entity();
        let mut stream = MemoryStream::new();
        original.serialize(&mut stream).unwrap();

        let mut target = Entity::new(EntityId::default(), "");
        target.add_component::<Renderable>().unwrap();
        target.deserialize(&mut stream).unwrap();

        assert_eq!(target.component_count(), 2);
        assert_eq!(target.get_component::<Transform>().unwrap().position(), Vec3::new(1.0, -2.0, 3.5));
    }

    #[test]
    fn test_entity_references_survive_world_memory_roundtrip() {
        let world = world_with_joint();
        let mut stream = MemoryStream::new();
        world.save(&mut stream).unwrap();

        let mut loaded = World::default();
        loaded.load(&mut stream).unwrap();
        assert_joint_resolves(&loaded);
    }

    #[test]
    fn test_entity_references_survive_world_binary_roundtrip() {
        let world = world_with_joint();
        let mut writer = BinaryWriter::new(Vec::new());
        world.save(&mut writer).unwrap();
        let bytes = writer.into_inner().unwrap();

        let mut loaded = World::default();
        loaded.load(&mut BinaryReader::new(bytes.as_slice())).unwrap();
        assert_joint_resolves(&loaded);
    }

    #[test]
    fn test_entity_references_survive_scene_ron_roundtrip() {
        let world = world_with_joint();
        let text = world.save_scene_ron().unwrap();

        let mut loaded = World::default();
        loaded.load_scene_ron(&text).unwrap();
        assert_joint_resolves(&loaded);
    }

    #[test]
    fn test_reference_outside_scene_is_cleared() {
        let mut world = world_with_joint();
        let anchor = world.find_by_name("anchor").unwrap();
        let mut scene = world.to_scene().unwrap();
        scene.entities.retain(|record| record.name != "anchor");
        world.destroy_entity(anchor).unwrap();

        let mut loaded = World::default();
        loaded.load_scene(&scene).unwrap();
        let hinge = loaded.find_by_name("hinge").unwrap();
        assert_eq!(loaded.entity(hinge).unwrap().get_component::<Constraint>().unwrap().body_other(), None);
    }
}
