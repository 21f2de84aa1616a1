/// CommandList trait - deferred recording of rendering commands

use std::any::Any;
use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{Buffer, IndexType, Pipeline, Texture};

/// Depth attachment: a texture plus the array slice to render into
#[derive(Clone, Copy)]
pub struct DepthTarget<'a> {
    pub texture: &'a Arc<dyn Texture>,
    pub layer: u32,
}

/// A deferred command context
///
/// Lists are recorded on any thread, then handed to
/// `GraphicsDevice::execute_command_list` for submission.
pub trait CommandList: Send {
    /// Open a named debug region (shown in GPU captures)
    fn begin_event(&mut self, name: &str) -> Result<()>;

    /// Close the innermost debug region
    fn end_event(&mut self) -> Result<()>;

    /// Bind color and/or depth targets for the following draws
    fn set_render_targets(
        &mut self,
        color: Option<&Arc<dyn Texture>>,
        depth: Option<DepthTarget<'_>>,
    ) -> Result<()>;

    /// Clear a color target
    fn clear_color(&mut self, texture: &Arc<dyn Texture>, color: [f32; 4]) -> Result<()>;

    /// Clear one slice of a depth target
    fn clear_depth(&mut self, texture: &Arc<dyn Texture>, layer: u32, depth: f32) -> Result<()>;

    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Bind a pipeline
    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()>;

    /// Bind a constant buffer to a slot
    fn bind_constant_buffer(&mut self, slot: u32, buffer: &Arc<dyn Buffer>) -> Result<()>;

    /// Bind (or unbind, with `None`) a sampled texture to a slot
    fn bind_texture(&mut self, slot: u32, texture: Option<&Arc<dyn Texture>>) -> Result<()>;

    /// Bind a structured buffer to a shader-resource slot
    fn bind_structured_buffer(&mut self, slot: u32, buffer: &Arc<dyn Buffer>) -> Result<()>;

    /// Bind a vertex buffer
    ///
    /// * `stride` - bytes between consecutive vertices
    /// * `offset` - offset into the buffer in bytes
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, stride: u32, offset: u64) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, index_type: IndexType) -> Result<()>;

    /// Draw non-indexed vertices
    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()>;

    /// Draw indexed vertices
    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()>;

    /// Draw non-indexed instances
    fn draw_instanced(&mut self, vertex_count: u32, instance_count: u32) -> Result<()>;

    /// Resolve a multisampled texture into a single-sampled one
    fn resolve(&mut self, destination: &Arc<dyn Texture>, source: &Arc<dyn Texture>) -> Result<()>;

    /// Finish recording; the list is then ready for execution
    fn close(&mut self) -> Result<()>;

    /// Drop everything recorded since the last execution and reopen the list
    fn reset(&mut self) -> Result<()>;

    /// Backend downcast hook used on execution
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Viewport dimensions and depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Viewport at `(x, y)` with the full `[0, 1]` depth range
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height, min_depth: 0.0, max_depth: 1.0 }
    }

    /// Viewport covering a whole `width` x `height` surface
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }
}
