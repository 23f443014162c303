//! Particle field: drifting particles and the proximity graph between them.
//!
//! Each frame, every active particle moves by its velocity and bounces off the
//! faces of a cube of half-size `half_extent`. Pairs closer than the configured
//! minimum distance are written into a [`ConnectionBuffer`] as line segments
//! whose gray level fades linearly from 1 (touching) to 0 (at the threshold).
//!
//! The pair scan is a plain O(n²) loop. At a few hundred particles that is
//! about 31k distance checks per frame.

use glam::Vec3;

use crate::buffer::ConnectionBuffer;
use crate::config::{EffectConfig, FieldConfig};
use crate::spawn::SpawnContext;

/// A single drifting point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Units per frame.
    pub velocity: Vec3,
    /// Connections made during the current frame.
    pub connections: u32,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            connections: 0,
        }
    }
}

/// Summary of one frame update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Pairs closer than the minimum distance.
    pub connections: u32,
    /// Line vertices emitted (always `2 * connections`).
    pub vertices: u32,
}

/// Fixed-capacity particle population.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    active: usize,
    half_extent: f32,
}

impl ParticleField {
    /// Spawn `max_particle_count` particles, of which `particle_count` are active.
    pub fn spawn(config: &FieldConfig) -> Self {
        let mut ctx = SpawnContext::new(config.seed);
        let extents = config.spawn_extents();

        let particles = (0..config.max_particle_count)
            .map(|_| {
                let position = ctx.random_in_box(extents);
                let velocity = ctx.random_velocity();
                Particle::new(position, velocity)
            })
            .collect::<Vec<_>>();

        Self {
            active: (config.particle_count as usize).min(particles.len()),
            particles,
            half_extent: config.half_extent(),
        }
    }

    /// Build a field from explicit particles, all active.
    pub fn from_particles(particles: Vec<Particle>, half_extent: f32) -> Self {
        Self {
            active: particles.len(),
            particles,
            half_extent,
        }
    }

    /// Active particles.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles[..self.active]
    }

    /// Number of active particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Number of allocated particles.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Advance one frame and rebuild the proximity graph into `lines`.
    ///
    /// Particle `i` is moved and bounced before it is paired with every
    /// `j > i`; those partners have not moved yet this frame.
    ///
    /// A `lines` buffer too small for this field (see
    /// [`ConnectionBuffer::fits`]) keeps the first segments that fit; later
    /// pairs are neither drawn nor counted, but every particle still moves.
    pub fn step(&mut self, effect: &EffectConfig, lines: &mut ConnectionBuffer) -> FrameStats {
        let n = self.active;
        let h = self.half_extent;
        let cap = effect.connection_cap();
        let min_distance = effect.min_distance;

        for p in &mut self.particles[..n] {
            p.connections = 0;
        }

        lines.begin_frame();
        let mut connected = 0u32;

        for i in 0..n {
            {
                let p = &mut self.particles[i];
                p.position += p.velocity;
                bounce(p, h);
            }

            if !lines.has_room() || cap.is_some_and(|c| self.particles[i].connections >= c) {
                continue;
            }

            let (head, tail) = self.particles[..n].split_at_mut(i + 1);
            let a = &mut head[i];

            for b in tail.iter_mut() {
                if cap.is_some_and(|c| b.connections >= c) {
                    continue;
                }

                let dist = a.position.distance(b.position);
                if dist < min_distance {
                    let alpha = 1.0 - dist / min_distance;
                    if !lines.push_segment(a.position, b.position, alpha) {
                        break;
                    }
                    a.connections += 1;
                    b.connections += 1;
                    connected += 1;
                }
            }
        }

        lines.finish_frame();

        FrameStats {
            connections: connected,
            vertices: connected * 2,
        }
    }

    /// Copy active positions into a flat `xyz` array.
    pub fn write_positions(&self, out: &mut [f32]) {
        for (chunk, p) in out.chunks_exact_mut(3).zip(self.particles()) {
            chunk.copy_from_slice(&p.position.to_array());
        }
    }
}

/// Reflect each velocity component whose coordinate left `[-h, h]`.
#[inline]
fn bounce(p: &mut Particle, h: f32) {
    if p.position.y < -h || p.position.y > h {
        p.velocity.y = -p.velocity.y;
    }
    if p.position.x < -h || p.position.x > h {
        p.velocity.x = -p.velocity.x;
    }
    if p.position.z < -h || p.position.z > h {
        p.velocity.z = -p.velocity.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(x: f32, y: f32, z: f32) -> Particle {
        Particle::new(Vec3::new(x, y, z), Vec3::ZERO)
    }

    #[test]
    fn test_pair_within_distance_connects() {
        let mut field = ParticleField::from_particles(
            vec![still(0.0, 0.0, 0.0), still(100.0, 0.0, 0.0)],
            225.0,
        );
        let mut lines = ConnectionBuffer::new(2);

        let stats = field.step(&EffectConfig::default(), &mut lines);

        assert_eq!(stats, FrameStats { connections: 1, vertices: 2 });
        assert_eq!(lines.draw_range(), 0..2);
        let (a, b, alpha) = lines.segment(0).unwrap();
        assert_eq!(a, Vec3::ZERO);
        assert_eq!(b, Vec3::new(100.0, 0.0, 0.0));
        assert!((alpha - (1.0 - 100.0 / 150.0)).abs() < 1e-6);
        assert!(field.particles().iter().all(|p| p.connections == 1));
    }

    #[test]
    fn test_pair_beyond_distance_does_not_connect() {
        let mut field = ParticleField::from_particles(
            vec![still(0.0, 0.0, 0.0), still(200.0, 0.0, 0.0)],
            225.0,
        );
        let mut lines = ConnectionBuffer::new(2);

        let stats = field.step(&EffectConfig::default(), &mut lines);

        assert_eq!(stats.connections, 0);
        assert_eq!(lines.draw_range(), 0..0);
        assert!(field.particles().iter().all(|p| p.connections == 0));
    }

    #[test]
    fn test_exact_threshold_is_not_connected() {
        let mut field = ParticleField::from_particles(
            vec![still(0.0, 0.0, 0.0), still(0.0, 150.0, 0.0)],
            225.0,
        );
        let mut lines = ConnectionBuffer::new(2);
        assert_eq!(field.step(&EffectConfig::default(), &mut lines).connections, 0);
    }

    #[test]
    fn test_coincident_pair_has_full_alpha() {
        let mut field =
            ParticleField::from_particles(vec![still(5.0, 5.0, 5.0), still(5.0, 5.0, 5.0)], 225.0);
        let mut lines = ConnectionBuffer::new(2);
        field.step(&EffectConfig::default(), &mut lines);
        assert_eq!(lines.segment(0).unwrap().2, 1.0);
    }

    #[test]
    fn test_bounce_reflects_only_crossed_axis() {
        let h = 225.0;
        let mut field = ParticleField::from_particles(
            vec![Particle::new(
                Vec3::new(h + 0.1, 0.0, 0.0),
                Vec3::new(0.5, 0.25, -0.75),
            )],
            h,
        );
        let mut lines = ConnectionBuffer::new(1);

        field.step(&EffectConfig::default(), &mut lines);

        let p = field.particles()[0];
        assert_eq!(p.velocity, Vec3::new(-0.5, 0.25, -0.75));
        // Reflected, not clamped
        assert!(p.position.x > h);

        field.step(&EffectConfig::default(), &mut lines);
        assert!((field.particles()[0].position.x - (h + 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_on_negative_face() {
        let h = 10.0;
        let mut field = ParticleField::from_particles(
            vec![Particle::new(Vec3::new(0.0, -h, 0.0), Vec3::new(0.0, -1.0, 0.0))],
            h,
        );
        let mut lines = ConnectionBuffer::new(1);
        field.step(&EffectConfig::default(), &mut lines);
        assert_eq!(field.particles()[0].velocity.y, 1.0);
    }

    #[test]
    fn test_partners_are_paired_before_they_move() {
        // j has not advanced when i scans it, so the segment uses j's old position.
        let mut field = ParticleField::from_particles(
            vec![
                still(0.0, 0.0, 0.0),
                Particle::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
            ],
            225.0,
        );
        let mut lines = ConnectionBuffer::new(2);
        field.step(&EffectConfig::default(), &mut lines);

        let (_, b, _) = lines.segment(0).unwrap();
        assert_eq!(b, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(field.particles()[1].position, Vec3::new(11.0, 0.0, 0.0));
    }

    #[test]
    fn test_connections_reset_each_frame() {
        let mut field = ParticleField::from_particles(
            vec![still(0.0, 0.0, 0.0), still(1.0, 0.0, 0.0), still(2.0, 0.0, 0.0)],
            225.0,
        );
        let mut lines = ConnectionBuffer::new(3);
        let effect = EffectConfig::default();

        field.step(&effect, &mut lines);
        field.step(&effect, &mut lines);

        assert!(field.particles().iter().all(|p| p.connections == 2));
        assert_eq!(lines.segment_count(), 3);
    }

    #[test]
    fn test_cap_disabled_by_default() {
        let particles = (0..12).map(|i| still(i as f32, 0.0, 0.0)).collect();
        let mut field = ParticleField::from_particles(particles, 225.0);
        let mut lines = ConnectionBuffer::new(12);

        let stats = field.step(&EffectConfig::default(), &mut lines);

        // All 66 pairs are within 12 units
        assert_eq!(stats.connections, 66);
        assert!(field.particles().iter().all(|p| p.connections == 11));
    }

    #[test]
    fn test_cap_skips_saturated_partners() {
        let particles = (0..6).map(|i| still(i as f32, 0.0, 0.0)).collect();
        let mut field = ParticleField::from_particles(particles, 225.0);
        let mut lines = ConnectionBuffer::new(6);
        let effect = EffectConfig {
            max_connections: 2,
            limit_connections: true,
            ..EffectConfig::default()
        };

        let stats = field.step(&effect, &mut lines);

        // A particle is only checked against the cap when its own scan starts,
        // so 0 and 1 both link to everyone after them; 2..5 then sit at the cap.
        let counts: Vec<u32> = field.particles().iter().map(|p| p.connections).collect();
        assert_eq!(counts, vec![5, 5, 2, 2, 2, 2]);
        assert_eq!(stats.connections, 9);
    }

    #[test]
    fn test_undersized_buffer_keeps_first_segments() {
        let mut particles: Vec<Particle> = (0..3).map(|i| still(i as f32, 0.0, 0.0)).collect();
        particles.push(Particle::new(Vec3::new(3.0, 0.0, 0.0), Vec3::X));
        let mut field = ParticleField::from_particles(particles, 225.0);
        let mut lines = ConnectionBuffer::new(2);
        assert!(!lines.fits(field.len()));

        let stats = field.step(&EffectConfig::default(), &mut lines);

        assert_eq!(stats.connections, 2);
        assert_eq!(lines.vertex_count(), 4);
        let counts: Vec<u32> = field.particles().iter().map(|p| p.connections).collect();
        assert_eq!(counts, vec![2, 1, 1, 0]);
        // Unpaired particles are still advanced.
        assert_eq!(field.particles()[3].position, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_spawn_respects_counts_and_box() {
        let config = FieldConfig {
            max_particle_count: 100,
            particle_count: 60,
            seed: Some(3),
            ..FieldConfig::default()
        };
        let field = ParticleField::spawn(&config);

        assert_eq!(field.capacity(), 100);
        assert_eq!(field.len(), 60);
        for p in field.particles() {
            assert!(p.position.x.abs() <= 225.0);
            assert!(p.position.y.abs() <= 400.0);
            assert!(p.position.z.abs() <= 225.0);
            assert!(p.velocity.abs().max_element() <= 1.0);
            assert_eq!(p.connections, 0);
        }
    }

    #[test]
    fn test_write_positions_flattens_active() {
        let field = ParticleField::from_particles(
            vec![still(1.0, 2.0, 3.0), still(4.0, 5.0, 6.0)],
            225.0,
        );
        let mut out = [0.0f32; 9];
        field.write_positions(&mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0, 0.0, 0.0]);
    }
}
