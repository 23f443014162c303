//! CPU-side vertex data shared with the renderer.
//!
//! A [`DynamicAttribute`] is a fixed-capacity float array with a dirty flag.
//! The simulation writes into it every frame and the renderer re-uploads it
//! (only the active range) when the flag is set.

use std::ops::Range;

use glam::Vec3;

/// Fixed-capacity, per-frame mutable vertex attribute.
#[derive(Debug, Clone)]
pub struct DynamicAttribute {
    data: Vec<f32>,
    item_size: usize,
    needs_update: bool,
}

impl DynamicAttribute {
    /// Allocate `count` zeroed items of `item_size` floats each.
    pub fn new(count: usize, item_size: usize) -> Self {
        Self {
            data: vec![0.0; count * item_size],
            item_size,
            needs_update: true,
        }
    }

    /// Floats per item (3 for positions and RGB colors).
    #[inline]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Number of items the attribute can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len() / self.item_size
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// The first `items` items, as floats.
    #[inline]
    pub fn items(&self, items: usize) -> &[f32] {
        &self.data[..items * self.item_size]
    }

    /// Write one 3-component item.
    #[inline]
    pub fn set_xyz(&mut self, index: usize, v: Vec3) {
        let i = index * self.item_size;
        self.data[i..i + 3].copy_from_slice(&v.to_array());
    }

    /// Read one 3-component item.
    #[inline]
    pub fn xyz(&self, index: usize) -> Vec3 {
        let i = index * self.item_size;
        Vec3::from_slice(&self.data[i..i + 3])
    }

    /// Flag the attribute for re-upload.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.needs_update = true;
    }

    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Clear the dirty flag, returning whether it was set.
    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.needs_update, false)
    }
}

/// Line-segment vertices and proximity colors for one frame.
///
/// Storage is sized once for `max_particle_count²` vertices, which covers
/// every pair of a fully connected field (`2 * n(n-1)/2 < n²`). Each frame
/// only the prefix given by [`draw_range`](Self::draw_range) is meaningful.
#[derive(Debug, Clone)]
pub struct ConnectionBuffer {
    positions: DynamicAttribute,
    colors: DynamicAttribute,
    cursor: usize,
    vertex_count: u32,
}

impl ConnectionBuffer {
    /// Allocate storage for a field of at most `max_particles` particles.
    pub fn new(max_particles: u32) -> Self {
        let segments = max_particles as usize * max_particles as usize;
        Self {
            positions: DynamicAttribute::new(segments, 3),
            colors: DynamicAttribute::new(segments, 3),
            cursor: 0,
            vertex_count: 0,
        }
    }

    /// Number of vertex slots.
    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.positions.capacity()
    }

    /// Whether a field of `particles` particles fits when every pair connects.
    #[inline]
    pub fn fits(&self, particles: usize) -> bool {
        particles * particles.saturating_sub(1) <= self.vertex_capacity()
    }

    /// Reset the write cursor for a new frame.
    pub fn begin_frame(&mut self) {
        self.cursor = 0;
    }

    /// Whether another segment fits before the end of the storage.
    #[inline]
    pub fn has_room(&self) -> bool {
        self.cursor + 2 <= self.vertex_capacity()
    }

    /// Append a segment from `a` to `b` with both vertices colored `alpha` gray.
    ///
    /// Returns `false` and writes nothing once the storage is full.
    pub fn push_segment(&mut self, a: Vec3, b: Vec3, alpha: f32) -> bool {
        if !self.has_room() {
            return false;
        }
        let gray = Vec3::splat(alpha);
        self.positions.set_xyz(self.cursor, a);
        self.colors.set_xyz(self.cursor, gray);
        self.positions.set_xyz(self.cursor + 1, b);
        self.colors.set_xyz(self.cursor + 1, gray);
        self.cursor += 2;
        true
    }

    /// Publish this frame's segments: set the draw range and mark both attributes dirty.
    pub fn finish_frame(&mut self) {
        self.vertex_count = self.cursor as u32;
        self.positions.mark_dirty();
        self.colors.mark_dirty();
    }

    /// Vertices to draw this frame.
    #[inline]
    pub fn draw_range(&self) -> Range<u32> {
        0..self.vertex_count
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Segments published by the last finished frame.
    #[inline]
    pub fn segment_count(&self) -> u32 {
        self.vertex_count / 2
    }

    /// Endpoints and alpha of segment `index` from the last finished frame.
    pub fn segment(&self, index: u32) -> Option<(Vec3, Vec3, f32)> {
        if index >= self.segment_count() {
            return None;
        }
        let v = index as usize * 2;
        Some((
            self.positions.xyz(v),
            self.positions.xyz(v + 1),
            self.colors.xyz(v).x,
        ))
    }

    #[inline]
    pub fn positions(&self) -> &DynamicAttribute {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &DynamicAttribute {
        &self.colors
    }

    #[inline]
    pub(crate) fn attributes_mut(&mut self) -> (&mut DynamicAttribute, &mut DynamicAttribute) {
        (&mut self.positions, &mut self.colors)
    }
}
