//! Pointer tracking for the group rotation target.
//!
//! The cursor position is kept in logical pixels (what a browser would call
//! CSS pixels), so the same physical gesture produces the same rotation on
//! high-DPI displays. Each move overwrites the target; the scene eases toward
//! it once per frame, independent of how often the pointer reports.

use glam::Vec2;
use winit::event::WindowEvent;

use crate::config::MotionConfig;
use crate::scene::Orientation;

/// Latest pointer position and the rotation it asks for.
#[derive(Debug, Clone)]
pub struct Pointer {
    position: Vec2,
    target: Orientation,
    yaw_scale: f32,
    pitch_scale: f32,
}

impl Pointer {
    pub fn new(motion: &MotionConfig) -> Self {
        Self {
            position: Vec2::ZERO,
            target: Orientation::default(),
            yaw_scale: motion.pointer_yaw_scale,
            pitch_scale: motion.pointer_pitch_scale,
        }
    }

    /// Record a cursor position in logical pixels from the window's top-left.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.target = Orientation {
            yaw: x * self.yaw_scale,
            pitch: y * self.pitch_scale,
        };
    }

    /// Feed a window event. Returns `true` if it was a pointer move.
    pub fn handle_event(&mut self, event: &WindowEvent, scale_factor: f64) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(scale_factor);
                self.move_to(logical.x as f32, logical.y as f32);
                true
            }
            _ => false,
        }
    }

    /// Last recorded position in logical pixels.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Rotation the group should ease toward.
    #[inline]
    pub fn target(&self) -> Orientation {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_scales_cursor() {
        let mut pointer = Pointer::new(&MotionConfig::default());
        pointer.move_to(1000.0, 800.0);

        let target = pointer.target();
        assert!((target.yaw - 1.0).abs() < 1e-6);
        assert!((target.pitch - 1.2).abs() < 1e-6);
        assert_eq!(pointer.position(), Vec2::new(1000.0, 800.0));
    }

    #[test]
    fn test_target_starts_at_rest() {
        let pointer = Pointer::new(&MotionConfig::default());
        assert_eq!(pointer.target(), Orientation::default());
    }

    #[test]
    fn test_latest_move_wins() {
        let mut pointer = Pointer::new(&MotionConfig::default());
        pointer.move_to(500.0, 500.0);
        pointer.move_to(0.0, 100.0);
        assert_eq!(pointer.target().yaw, 0.0);
        assert!((pointer.target().pitch - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_cursor_event_uses_logical_pixels() {
        let mut pointer = Pointer::new(&MotionConfig::default());
        let event = WindowEvent::CursorMoved {
            device_id: unsafe { winit::event::DeviceId::dummy() },
            position: winit::dpi::PhysicalPosition::new(2000.0, 1600.0),
        };

        assert!(pointer.handle_event(&event, 2.0));
        assert_eq!(pointer.position(), Vec2::new(1000.0, 800.0));
        assert!((pointer.target().yaw - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ignores_other_events() {
        let mut pointer = Pointer::new(&MotionConfig::default());
        assert!(!pointer.handle_event(&WindowEvent::CloseRequested, 2.0));
        assert_eq!(pointer.target(), Orientation::default());
    }
}
