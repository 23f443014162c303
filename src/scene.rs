//! The owned state of one mounted starfield.
//!
//! A [`Scene`] bundles everything the frame loop touches on the CPU side:
//! camera, rotating group, particle field, point-cloud attribute, connection
//! buffer and pointer target. It is created on mount, passed by reference to
//! the renderer each frame, and dropped on unmount.

use glam::Mat4;

use crate::buffer::{ConnectionBuffer, DynamicAttribute};
use crate::camera::PerspectiveCamera;
use crate::config::{Config, EffectConfig, MotionConfig};
use crate::field::{FrameStats, ParticleField};
use crate::input::Pointer;
use crate::visuals::VisualConfig;

/// Yaw (about +Y) and pitch (about +X) in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

/// Scene-graph node holding the point cloud and line mesh.
#[derive(Clone, Copy, Debug, Default)]
pub struct Group {
    pub rotation: Orientation,
}

impl Group {
    /// Close `factor` of the remaining gap to `target` on each axis.
    pub fn approach(&mut self, target: Orientation, factor: f32) {
        self.rotation.yaw += (target.yaw - self.rotation.yaw) * factor;
        self.rotation.pitch += (target.pitch - self.rotation.pitch) * factor;
    }

    /// Euler XYZ rotation: pitch applied after yaw.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation.pitch) * Mat4::from_rotation_y(self.rotation.yaw)
    }
}

/// CPU-side state of the starfield.
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub group: Group,
    pub field: ParticleField,
    /// Point-cloud positions, one slot per allocated particle.
    pub points: DynamicAttribute,
    pub lines: ConnectionBuffer,
    pub pointer: Pointer,
    effect: EffectConfig,
    motion: MotionConfig,
    visuals: VisualConfig,
}

impl Scene {
    /// Build the scene for a viewport of the given size.
    ///
    /// The config is assumed to have passed [`Config::validate`].
    pub fn new(config: &Config, width: u32, height: u32) -> Self {
        let field = ParticleField::spawn(&config.field);
        let max = config.field.max_particle_count;

        let mut points = DynamicAttribute::new(max as usize, 3);
        field.write_positions(points.as_mut_slice());

        log::debug!(
            "Scene: {} of {} particles, link distance {}",
            field.len(),
            max,
            config.effect.min_distance
        );

        Self {
            camera: PerspectiveCamera::new(&config.camera, width, height),
            group: Group::default(),
            field,
            points,
            lines: ConnectionBuffer::new(max),
            pointer: Pointer::new(&config.motion),
            effect: config.effect,
            motion: config.motion,
            visuals: config.visuals.clone(),
        }
    }

    /// Advance particles and rebuild the connection lines.
    pub fn update(&mut self) -> FrameStats {
        let stats = self.field.step(&self.effect, &mut self.lines);
        self.field.write_positions(self.points.as_mut_slice());
        self.points.mark_dirty();
        stats
    }

    /// Ease the group one frame toward the pointer target.
    pub fn advance_rotation(&mut self) {
        self.group
            .approach(self.pointer.target(), self.motion.rotation_smoothing);
    }

    /// Record a pointer move in logical pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.move_to(x, y);
    }

    /// Viewport resized: refresh the camera projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Points to draw this frame.
    #[inline]
    pub fn point_count(&self) -> u32 {
        self.field.len() as u32
    }

    #[inline]
    pub fn effect(&self) -> &EffectConfig {
        &self.effect
    }

    #[inline]
    pub fn visuals(&self) -> &VisualConfig {
        &self.visuals
    }

    pub fn model_view_projection(&self) -> Mat4 {
        self.camera.view_projection() * self.group.model_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Config {
        let mut config = Config::default();
        config.field.seed = Some(1234);
        config
    }

    #[test]
    fn test_new_scene_allocates_capacity() {
        let scene = Scene::new(&seeded(), 1280, 720);
        assert_eq!(scene.point_count(), 250);
        assert_eq!(scene.points.capacity(), 250);
        assert_eq!(scene.lines.vertex_capacity(), 250 * 250);
        assert!(scene.points.needs_update());
    }

    #[test]
    fn test_update_marks_buffers_dirty() {
        let mut scene = Scene::new(&seeded(), 1280, 720);
        scene.points.take_dirty();

        let stats = scene.update();

        assert!(scene.points.needs_update());
        assert!(scene.lines.positions().needs_update());
        assert!(scene.lines.colors().needs_update());
        assert_eq!(scene.lines.vertex_count(), stats.vertices);
        assert_eq!(stats.vertices % 2, 0);
    }

    #[test]
    fn test_points_mirror_particles() {
        let mut scene = Scene::new(&seeded(), 1280, 720);
        scene.update();
        for (i, p) in scene.field.particles().iter().enumerate() {
            assert_eq!(scene.points.xyz(i), p.position);
        }
    }

    #[test]
    fn test_rotation_eases_without_overshoot() {
        let mut scene = Scene::new(&seeded(), 1280, 720);
        scene.pointer_moved(1000.0, 800.0);

        scene.advance_rotation();
        assert!((scene.group.rotation.yaw - 0.015).abs() < 1e-6);
        assert!((scene.group.rotation.pitch - 0.018).abs() < 1e-6);

        let mut last = scene.group.rotation;
        for _ in 0..500 {
            scene.advance_rotation();
            let now = scene.group.rotation;
            assert!(now.yaw > last.yaw && now.yaw < 1.0);
            assert!(now.pitch > last.pitch && now.pitch < 1.2);
            last = now;
        }
        assert!((last.yaw - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_resize_changes_aspect() {
        let mut scene = Scene::new(&seeded(), 1280, 720);
        scene.resize(1000, 500);
        assert_eq!(scene.camera.aspect, 2.0);
    }

    #[test]
    fn test_group_rotation_is_pitch_after_yaw() {
        let group = Group {
            rotation: Orientation {
                yaw: std::f32::consts::FRAC_PI_2,
                pitch: 0.0,
            },
        };
        // Yawing +X by 90 degrees about +Y lands on -Z.
        let v = group.model_matrix().transform_vector3(glam::Vec3::X);
        assert!((v - glam::Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_identity_rotation_leaves_mvp_as_camera() {
        let scene = Scene::new(&seeded(), 1280, 720);
        assert_eq!(scene.model_view_projection(), scene.camera.view_projection());
    }
}
