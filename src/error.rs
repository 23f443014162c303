//! Error types for Plexus.
//!
//! This module provides error types for GPU initialization, configuration
//! validation, and running the starfield window.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// The adapter cannot present to the window surface.
    IncompatibleSurface,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::IncompatibleSurface => write!(f, "The GPU adapter reports no usable format for the window surface."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter | GpuError::IncompatibleSurface => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Configuration values rejected by [`Config::validate`](crate::Config::validate).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The particle capacity is zero.
    ZeroCapacity,
    /// More active particles were requested than the field can hold.
    ParticleCountExceedsCapacity { count: u32, capacity: u32 },
    /// The line mesh for this capacity would exceed the GPU buffer size limit.
    CapacityTooLarge { capacity: u32, bytes: u64, limit: u64 },
    /// Connection distance must be finite and greater than zero.
    InvalidMinDistance(f32),
    /// Spawn spread must be finite and greater than zero.
    InvalidSpread(f32),
    /// Camera clip planes must satisfy `0 < near < far`.
    InvalidClipPlanes { near: f32, far: f32 },
    /// Vertical field of view must lie strictly between 0 and 180 degrees.
    InvalidFieldOfView(f32),
    /// Rotation smoothing factor must lie in `(0, 1]`.
    InvalidSmoothing(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "Maximum particle count must be at least 1"),
            ConfigError::ParticleCountExceedsCapacity { count, capacity } => write!(
                f,
                "Particle count {} exceeds the maximum particle count {}",
                count, capacity
            ),
            ConfigError::CapacityTooLarge {
                capacity,
                bytes,
                limit,
            } => write!(
                f,
                "Maximum particle count {} needs a {} byte line buffer, over the {} byte limit",
                capacity, bytes, limit
            ),
            ConfigError::InvalidMinDistance(d) => {
                write!(f, "Minimum connection distance must be positive, got {}", d)
            }
            ConfigError::InvalidSpread(s) => write!(f, "Spawn spread must be positive, got {}", s),
            ConfigError::InvalidClipPlanes { near, far } => write!(
                f,
                "Camera clip planes must satisfy 0 < near < far, got near={} far={}",
                near, far
            ),
            ConfigError::InvalidFieldOfView(fov) => {
                write!(f, "Field of view must be between 0 and 180 degrees, got {}", fov)
            }
            ConfigError::InvalidSmoothing(k) => {
                write!(f, "Rotation smoothing must be in (0, 1], got {}", k)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur when running the starfield.
#[derive(Debug)]
pub enum SimulationError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The configuration was rejected before start-up.
    Config(ConfigError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            SimulationError::Window(e) => write!(f, "Failed to create window: {}", e),
            SimulationError::Gpu(e) => write!(f, "GPU error: {}", e),
            SimulationError::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::EventLoop(e) => Some(e),
            SimulationError::Window(e) => Some(e),
            SimulationError::Gpu(e) => Some(e),
            SimulationError::Config(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for SimulationError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SimulationError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SimulationError {
    fn from(e: winit::error::OsError) -> Self {
        SimulationError::Window(e)
    }
}

impl From<GpuError> for SimulationError {
    fn from(e: GpuError) -> Self {
        SimulationError::Gpu(e)
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_message_names_values() {
        let err = ConfigError::ParticleCountExceedsCapacity {
            count: 300,
            capacity: 250,
        };
        let msg = err.to_string();
        assert!(msg.contains("300"));
        assert!(msg.contains("250"));
    }

    #[test]
    fn test_simulation_error_wraps_config_source() {
        let err = SimulationError::from(ConfigError::InvalidMinDistance(-1.0));
        assert!(err.to_string().starts_with("Invalid configuration"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_no_adapter_has_no_source() {
        assert!(GpuError::NoAdapter.source().is_none());
    }
}
