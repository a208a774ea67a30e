//! Camera component
//!
//! Projection parameters are attributes. The view matrix follows the
//! entity's Transform and is refreshed on every tick.

use crate::ecs::{Component, ComponentBase, ComponentType, Entity, EntityId, TickContext, TypedComponent};
use crate::foundation::math::{utils, Mat4, Point3, Vec4};
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Projection model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Projection {
    /// Perspective projection
    #[default]
    Perspective = 0,
    /// Orthographic projection
    Orthographic = 1,
}

impl Projection {
    /// Decode a persisted discriminant, defaulting to `Perspective`
    pub fn from_u32(value: u32) -> Self {
        if value == 1 {
            Self::Orthographic
        } else {
            Self::Perspective
        }
    }
}

/// Viewpoint
#[derive(Debug)]
pub struct Camera {
    base: ComponentBase,
    projection: Projection,
    fov_y: f32,
    near: f32,
    far: f32,
    aspect_ratio: f32,
    ortho_height: f32,
    clear_color: Vec4,
    view: Mat4,
}

impl TypedComponent for Camera {
    const TYPE: ComponentType = ComponentType::Camera;

    fn new(entity: EntityId) -> Self {
        let mut camera = Self {
            base: ComponentBase::new(entity),
            projection: Projection::default(),
            fov_y: utils::deg_to_rad(60.0),
            near: 0.1,
            far: 1000.0,
            aspect_ratio: 16.0 / 9.0,
            ortho_height: 10.0,
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            view: Mat4::identity(),
        };
        camera.base.set_type(Self::TYPE);

        let base = &mut camera.base;
        base.register_attribute(
            "projection",
            |c: &Self| c.projection as u32,
            |c: &mut Self, v| c.projection = Projection::from_u32(v),
        );
        base.register_attribute("fov_y", |c: &Self| c.fov_y, |c: &mut Self, v| c.fov_y = v);
        base.register_attribute("near", |c: &Self| c.near, |c: &mut Self, v| c.near = v);
        base.register_attribute("far", |c: &Self| c.far, |c: &mut Self, v| c.far = v);
        base.register_attribute("aspect_ratio", |c: &Self| c.aspect_ratio, |c: &mut Self, v| c.aspect_ratio = v);
        base.register_attribute("ortho_height", |c: &Self| c.ortho_height, |c: &mut Self, v| c.ortho_height = v);
        base.register_attribute("clear_color", |c: &Self| c.clear_color, |c: &mut Self, v| c.clear_color = v);

        camera
    }
}

impl Camera {
    /// Projection model
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Set the projection model
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Vertical field of view in radians
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Set the vertical field of view in radians
    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    /// Near and far clip distances
    pub fn clip_planes(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    /// Set near and far clip distances
    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Set width over height
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Background color
    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    /// Set the background color
    pub fn set_clear_color(&mut self, clear_color: Vec4) {
        self.clear_color = clear_color;
    }

    /// World-to-view matrix as of the last tick
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective => Mat4::new_perspective(self.aspect_ratio, self.fov_y, self.near, self.far),
            Projection::Orthographic => {
                let half_height = self.ortho_height * 0.5;
                let half_width = half_height * self.aspect_ratio;
                Mat4::new_orthographic(-half_width, half_width, -half_height, half_height, self.near, self.far)
            }
        }
    }

    /// Combined world-to-clip matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view
    }

    fn update_view(&mut self, entity: &Entity) {
        if let Some(transform) = self.transform(entity) {
            let eye = Point3::from(transform.position());
            let target = eye + transform.forward();
            self.view = Mat4::look_at_rh(&eye, &target, &transform.up());
        }
    }
}

impl Component for Camera {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_initialize(&mut self, entity: &Entity) {
        self.update_view(entity);
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_>) {
        self.update_view(ctx.entity());
    }

    fn serialize(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        self.serialize_attributes(sink)
    }

    fn deserialize(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        self.deserialize_attributes(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_follows_transform() {
        let mut entity = Entity::new(EntityId::default(), "viewer");
        entity.transform_mut().unwrap().set_position(Vec3::new(0.0, 0.0, 5.0));
        let camera = entity.add_component::<Camera>().unwrap();

        let origin = camera.view_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(origin.coords, Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_projection() {
        let mut camera = Camera::new(EntityId::default());
        camera.set_projection(Projection::Orthographic);
        camera.set_aspect_ratio(2.0);
        let projection = camera.projection_matrix();
        assert_relative_eq!(projection[(0, 0)], 2.0 / 20.0, epsilon = 1e-6);
        assert_relative_eq!(projection[(1, 1)], 2.0 / 10.0, epsilon = 1e-6);
    }
}
