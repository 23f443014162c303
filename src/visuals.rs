//! Visual configuration for the point cloud and line mesh.
//!
//! Colors are given as `0xRRGGBB` sRGB hex values, the way they are usually
//! written down in a design, and converted to linear RGB when uploaded to an
//! sRGB surface.
//!
//! ```ignore
//! Starfield::new()
//!     .with_visuals(|v| {
//!         v.line_color(0xff66cc);
//!         v.line_opacity(0.5);
//!     })
//!     .run()?;
//! ```

use glam::Vec3;

/// Blend mode for a rendered mesh.
///
/// Controls how colors combine with the background and each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending.
    Alpha,

    /// Additive blending (default).
    ///
    /// Colors are added together, so overlapping lines and points glow
    /// brighter where the field is dense.
    #[default]
    Additive,
}

impl BlendMode {
    /// The matching `wgpu` blend state.
    pub fn to_blend_state(self) -> wgpu::BlendState {
        match self {
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}

/// Configuration for the starfield visuals.
#[derive(Debug, Clone)]
pub struct VisualConfig {
    /// Point sprite diameter in physical pixels, measured at the group
    /// centre when `size_attenuation` is on.
    pub point_size: f32,
    /// Scale sprites with inverse depth so nearer points draw larger.
    pub size_attenuation: bool,
    /// Point color (sRGB hex).
    pub point_color: u32,
    /// Blend mode for the point cloud.
    pub point_blend: BlendMode,
    /// Line tint (sRGB hex), multiplied with each vertex's proximity gray.
    pub line_color: u32,
    /// Line opacity (0.0-1.0).
    pub line_opacity: f32,
    /// Blend mode for the line mesh.
    pub line_blend: BlendMode,
    /// Background clear color (sRGB hex).
    pub background_color: u32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            point_size: 2.0,
            size_attenuation: true,
            point_color: 0xffffff,
            point_blend: BlendMode::Additive,
            line_color: 0x0abdc6,
            line_opacity: 0.3,
            line_blend: BlendMode::Additive,
            background_color: 0x000000,
        }
    }
}

impl VisualConfig {
    /// Create a new visual config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the point sprite size in pixels.
    pub fn point_size(&mut self, size: f32) -> &mut Self {
        self.point_size = size;
        self
    }

    /// Enable or disable depth-based sprite scaling.
    pub fn size_attenuation(&mut self, enabled: bool) -> &mut Self {
        self.size_attenuation = enabled;
        self
    }

    /// Set the point color.
    pub fn point_color(&mut self, hex: u32) -> &mut Self {
        self.point_color = hex;
        self
    }

    /// Set the line tint.
    pub fn line_color(&mut self, hex: u32) -> &mut Self {
        self.line_color = hex;
        self
    }

    /// Set the line opacity, clamped to `[0, 1]`.
    pub fn line_opacity(&mut self, opacity: f32) -> &mut Self {
        self.line_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the background color.
    pub fn background_color(&mut self, hex: u32) -> &mut Self {
        self.background_color = hex;
        self
    }

    /// Set the blend mode for both meshes.
    pub fn blend_mode(&mut self, mode: BlendMode) -> &mut Self {
        self.point_blend = mode;
        self.line_blend = mode;
        self
    }
}

/// Convert an `0xRRGGBB` sRGB hex color to linear RGB.
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
