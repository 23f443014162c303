//! # Plexus
//!
//! A drifting 3D starfield whose particles are linked by lines whenever two
//! of them come within a threshold distance, with the whole field easing
//! toward a rotation driven by the mouse.
//!
//! The simulation runs on the CPU every frame; wgpu only draws the result.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plexus::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Starfield::new()
//!         .with_particle_count(250)
//!         .with_min_distance(150.0)
//!         .run()
//! }
//! ```
//!
//! ## Frame Update
//!
//! Each frame [`ParticleField::step`] moves every particle by its velocity,
//! reflects the velocity on any axis that left the `[-r/2, r/2]` box, and
//! for every pair closer than `min_distance` appends a segment to the
//! [`ConnectionBuffer`] whose gray level fades from 1 (touching) to 0 (at the
//! threshold). The pair scan is O(n²), which is fine for a few hundred points.
//!
//! ```text
//!   for i in 0..n:
//!       advance(i); bounce(i)
//!       for j in i+1..n:           // j not yet advanced this frame
//!           if |p_i - p_j| < min:  push_segment(p_i, p_j, 1 - d/min)
//! ```
//!
//! ## Connection Cap
//!
//! With [`Starfield::with_connection_limit`] a particle that already holds
//! `max` connections is skipped, both as the outer particle when its scan
//! starts and as a partner. The cap is off by default.
//!
//! ## Ownership
//!
//! All per-window state lives in a [`Scene`] created on mount and dropped on
//! unmount. The redraw chain is gated by a [`FrameLoop`], so closing or
//! suspending the window stops the animation without any callback left
//! behind.

pub mod buffer;
pub mod camera;
pub mod config;
pub mod error;
pub mod field;
mod gpu;
pub mod input;
pub mod lifecycle;
pub mod scene;
mod simulation;
pub mod spawn;
pub mod time;
pub mod visuals;

pub use buffer::{ConnectionBuffer, DynamicAttribute};
pub use camera::PerspectiveCamera;
pub use config::{CameraConfig, Config, EffectConfig, FieldConfig, MotionConfig};
pub use error::{ConfigError, GpuError, SimulationError};
pub use field::{FrameStats, Particle, ParticleField};
pub use glam::{Mat4, Vec2, Vec3};
pub use input::Pointer;
pub use lifecycle::{FrameLoop, LoopState};
pub use scene::{Group, Orientation, Scene};
pub use simulation::Starfield;
pub use spawn::SpawnContext;
pub use time::FrameClock;
pub use visuals::{hex_to_linear, BlendMode, VisualConfig};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use plexus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, EffectConfig, FieldConfig};
    pub use crate::error::SimulationError;
    pub use crate::scene::Scene;
    pub use crate::simulation::Starfield;
    pub use crate::visuals::{BlendMode, VisualConfig};
    pub use crate::{Vec2, Vec3};
}
