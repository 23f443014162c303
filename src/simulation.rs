//! Starfield builder and runner

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::Config;
use crate::error::SimulationError;
use crate::gpu::Renderer;
use crate::lifecycle::FrameLoop;
use crate::scene::Scene;
use crate::time::FrameClock;
use crate::visuals::VisualConfig;

/// A plexus starfield builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// plexus::Starfield::new()
///     .with_particle_count(180)
///     .with_connection_limit(6)
///     .run()?;
/// ```
pub struct Starfield {
    config: Config,
    title: String,
}

impl Starfield {
    /// Create a starfield with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            title: "Plexus".to_string(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the number of active particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.config.field.particle_count = count;
        self
    }

    /// Set the particle capacity. Buffers are sized from this value.
    pub fn with_max_particle_count(mut self, count: u32) -> Self {
        self.config.field.max_particle_count = count;
        self
    }

    /// Set the distance under which two particles are connected.
    pub fn with_min_distance(mut self, distance: f32) -> Self {
        self.config.effect.min_distance = distance;
        self
    }

    /// Cap the connections per particle and enable the cap.
    pub fn with_connection_limit(mut self, max: u32) -> Self {
        self.config.effect.max_connections = max;
        self.config.effect.limit_connections = true;
        self
    }

    /// Show or hide the connection lines.
    pub fn with_lines(mut self, show: bool) -> Self {
        self.config.effect.show_lines = show;
        self
    }

    /// Seed the spawn RNG for a reproducible field.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.field.seed = Some(seed);
        self
    }

    /// Adjust colours, sizes and blending.
    pub fn with_visuals<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut VisualConfig),
    {
        f(&mut self.config.visuals);
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// The configuration that `run` will use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the starfield. This blocks until the window is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        self.config.validate()?;
        log::debug!("Starting starfield with {:?}", self.config);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config, self.title);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Starfield {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    config: Config,
    title: String,
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
    renderer: Option<Renderer>,
    frame_loop: FrameLoop,
    clock: FrameClock,
    /// First fatal error hit inside the event loop.
    error: Option<SimulationError>,
}

impl App {
    fn new(config: Config, title: String) -> Self {
        Self {
            config,
            title,
            window: None,
            scene: None,
            renderer: None,
            frame_loop: FrameLoop::new(),
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let window = match &self.window {
            Some(window) => window.clone(),
            None => {
                let window_attrs = Window::default_attributes()
                    .with_title(self.title.as_str())
                    .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
                let window = Arc::new(event_loop.create_window(window_attrs)?);
                self.window = Some(window.clone());
                window
            }
        };

        let size = window.inner_size();
        let scene = Scene::new(&self.config, size.width, size.height);
        let renderer = pollster::block_on(Renderer::new(window.clone(), &scene))?;

        self.scene = Some(scene);
        self.renderer = Some(renderer);
        self.clock = FrameClock::new();
        self.frame_loop.start();

        log::info!(
            "Mounted starfield: {} particles, connection distance {}",
            self.config.field.particle_count,
            self.config.effect.min_distance
        );
        window.request_redraw();
        Ok(())
    }

    fn unmount(&mut self) {
        self.frame_loop.stop();
        if self.renderer.take().is_some() {
            log::info!("Unmounted starfield after {} frames", self.frame_loop.frames());
        }
        self.scene = None;
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.frame_loop.tick() {
            return;
        }
        let (Some(window), Some(scene), Some(renderer)) =
            (&self.window, &mut self.scene, &mut self.renderer)
        else {
            return;
        };

        scene.update();
        scene.advance_rotation();
        renderer.sync_size(window.inner_size());

        match renderer.render(scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, stopping");
                self.frame_loop.stop();
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if let Some(fps) = self.clock.tick() {
            log::debug!("{:.1} fps, frame {}", fps, self.clock.frame());
            window.set_title(&format!("{} - {:.0} fps", self.title, fps));
        }

        if self.frame_loop.is_running() {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(e) = self.mount(event_loop) {
            log::error!("{}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(scene) = &mut self.scene {
                    scene.resize(physical_size.width, physical_size.height);
                }
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::CursorMoved { .. } => {
                if let (Some(window), Some(scene)) = (&self.window, &mut self.scene) {
                    scene.pointer.handle_event(&event, window.scale_factor());
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
        self.window = None;
    }
}
