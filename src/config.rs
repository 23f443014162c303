//! Starfield configuration.
//!
//! All values are fixed for the lifetime of a mounted scene. Defaults
//! reproduce the classic plexus look: 250 particles in a 450 x 800 x 450
//! volume, linked when closer than 150 units.

use glam::Vec3;

use crate::error::ConfigError;
use crate::visuals::VisualConfig;

/// Connection-graph parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectConfig {
    /// Whether the line mesh is drawn.
    pub show_lines: bool,
    /// Pairs closer than this are connected.
    pub min_distance: f32,
    /// Per-particle connection cap, only honoured when `limit_connections` is set.
    pub max_connections: u32,
    /// Enables the `max_connections` cap. Off by default.
    pub limit_connections: bool,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            show_lines: true,
            min_distance: 150.0,
            max_connections: 10,
            limit_connections: false,
        }
    }
}

impl EffectConfig {
    /// The active per-particle cap, if any.
    #[inline]
    pub fn connection_cap(&self) -> Option<u32> {
        self.limit_connections.then_some(self.max_connections)
    }
}

/// Particle field dimensions and population.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    /// Capacity: particles allocated, and the size basis of every buffer.
    pub max_particle_count: u32,
    /// Particles simulated and drawn (`<= max_particle_count`).
    pub particle_count: u32,
    /// Spawn width and depth. Also the edge length of the bounce cube.
    pub spread: f32,
    /// Spawn height.
    pub spread_long: f32,
    /// RNG seed for the initial state. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_particle_count: 250,
            particle_count: 250,
            spread: 450.0,
            spread_long: 800.0,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Half-size of the bounce cube, shared by all three axes.
    ///
    /// Particles spawn over `spread_long` vertically but bounce at
    /// `spread / 2`. A particle spawned beyond that on y flips its y velocity
    /// every frame and hovers in place vertically.
    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.spread / 2.0
    }

    /// Full spawn box size (width, height, depth).
    #[inline]
    pub fn spawn_extents(&self) -> Vec3 {
        Vec3::new(self.spread, self.spread_long, self.spread)
    }

    /// Size in bytes of one line vertex attribute (positions or colors).
    ///
    /// The line mesh reserves `max_particle_count²` vertices of three floats.
    pub fn line_buffer_size(&self) -> u64 {
        let n = self.max_particle_count as u64;
        n * n * 3 * std::mem::size_of::<f32>() as u64
    }
}

/// Perspective camera parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 20.0,
            near: 1.0,
            far: 4000.0,
            distance: 1750.0,
        }
    }
}

/// Pointer-driven rotation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    /// Fraction of the remaining rotation error closed each frame.
    pub rotation_smoothing: f32,
    /// Radians of yaw target per logical pixel of cursor x.
    pub pointer_yaw_scale: f32,
    /// Radians of pitch target per logical pixel of cursor y.
    pub pointer_pitch_scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            rotation_smoothing: 0.015,
            pointer_yaw_scale: 0.001,
            pointer_pitch_scale: 0.0015,
        }
    }
}

/// Complete starfield configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub effect: EffectConfig,
    pub field: FieldConfig,
    pub camera: CameraConfig,
    pub motion: MotionConfig,
    pub visuals: VisualConfig,
}

impl Config {
    /// Check every value the scene relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.field;
        if field.max_particle_count == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if field.particle_count > field.max_particle_count {
            return Err(ConfigError::ParticleCountExceedsCapacity {
                count: field.particle_count,
                capacity: field.max_particle_count,
            });
        }
        let bytes = field.line_buffer_size();
        let limit = wgpu::Limits::default().max_buffer_size;
        if bytes > limit {
            return Err(ConfigError::CapacityTooLarge {
                capacity: field.max_particle_count,
                bytes,
                limit,
            });
        }
        for spread in [field.spread, field.spread_long] {
            if !(spread.is_finite() && spread > 0.0) {
                return Err(ConfigError::InvalidSpread(spread));
            }
        }

        let min_distance = self.effect.min_distance;
        if !(min_distance.is_finite() && min_distance > 0.0) {
            return Err(ConfigError::InvalidMinDistance(min_distance));
        }

        let camera = &self.camera;
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(ConfigError::InvalidClipPlanes {
                near: camera.near,
                far: camera.far,
            });
        }
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(camera.fov_y_degrees));
        }

        let k = self.motion.rotation_smoothing;
        if !(k > 0.0 && k <= 1.0) {
            return Err(ConfigError::InvalidSmoothing(k));
        }

        Ok(())
    }
}
