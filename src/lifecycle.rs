//! Frame loop ownership.
//!
//! The loop is a value owned by the running app rather than a callback that
//! reschedules itself. The runner asks [`FrameLoop::tick`] before each frame
//! and only requests the next redraw while the loop is running, so stopping
//! it on teardown ends the animation deterministically.
//!
//! ```text
//!   Idle --start--> Running --stop--> Stopped
//!                      ^                  |
//!                      +------start-------+   (re-mount)
//! ```

/// State of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Never started.
    #[default]
    Idle,
    /// Frames are being produced.
    Running,
    /// Stopped on teardown.
    Stopped,
}

/// Cancellable per-frame loop bound to a mounted scene.
#[derive(Debug, Default)]
pub struct FrameLoop {
    state: LoopState,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or resume after a re-mount) producing frames.
    pub fn start(&mut self) {
        if self.state != LoopState::Running {
            log::debug!("Frame loop started ({:?} -> Running)", self.state);
            self.state = LoopState::Running;
        }
    }

    /// Stop producing frames. Idempotent.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            log::debug!("Frame loop stopped after {} frames", self.frames);
            self.state = LoopState::Stopped;
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Claim the next frame. Returns `false` when the loop is not running.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.frames += 1;
        true
    }

    /// Frames produced since creation.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_loop_does_not_tick() {
        let mut frame_loop = FrameLoop::new();
        assert_eq!(frame_loop.state(), LoopState::Idle);
        assert!(!frame_loop.tick());
        assert_eq!(frame_loop.frames(), 0);
    }

    #[test]
    fn test_running_loop_counts_frames() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        assert!(frame_loop.tick());
        assert!(frame_loop.tick());
        assert_eq!(frame_loop.frames(), 2);
    }

    #[test]
    fn test_stop_cancels_further_frames() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        frame_loop.tick();
        frame_loop.stop();

        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert!(!frame_loop.is_running());
        assert!(!frame_loop.tick());
        assert_eq!(frame_loop.frames(), 1);
    }

    #[test]
    fn test_stop_before_start_stays_idle() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.stop();
        assert_eq!(frame_loop.state(), LoopState::Idle);
    }

    #[test]
    fn test_restart_after_stop() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        frame_loop.stop();
        frame_loop.start();
        assert!(frame_loop.tick());
    }
}
