/// Mock graphics device for unit tests (no GPU required)
///
/// Every recorded command is kept as a short string. Executing a command
/// list moves its strings into the device's `executed` log, so tests can
/// assert on the order work reached the immediate context.

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{
    Buffer, BufferDesc, BufferUsage, CommandList, DepthConvention, DepthTarget, GraphicsDevice,
    IndexType, Pipeline, PipelineDesc, Texture, TextureDesc, TextureFormat, TextureInfo,
    TextureType, TextureUsage, Viewport,
};

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub name: String,
    pub usage: BufferUsage,
    pub contents: Mutex<Vec<u8>>,
}

impl MockBuffer {
    pub fn new(size: u64, usage: BufferUsage, name: String) -> Self {
        Self { name, usage, contents: Mutex::new(vec![0; size as usize]) }
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.contents.lock().unwrap().len() as u64
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let mut contents = self.contents.lock().unwrap();
        let end = offset as usize + data.len();
        if end > contents.len() {
            engine_bail!(
                "umbra::MockBuffer",
                "Write of {} bytes at {} overflows '{}' ({} bytes)",
                data.len(), offset, self.name, contents.len()
            );
        }
        contents[offset as usize..end].copy_from_slice(data);
        Ok(())
    }
}

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub name: String,
}

impl MockTexture {
    pub fn from_desc(desc: &TextureDesc) -> Self {
        Self { info: TextureInfo::from(desc), name: desc.debug_name.clone() }
    }

    pub fn color_2d(width: u32, height: u32, name: &str) -> Self {
        Self {
            info: TextureInfo {
                width,
                height,
                format: TextureFormat::R8G8B8A8_UNORM,
                usage: TextureUsage::SAMPLED | TextureUsage::RENDER_TARGET,
                texture_type: TextureType::Tex2D,
                array_layers: 1,
                sample_count: 1,
            },
            name: name.to_string(),
        }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

// ============================================================================
// Mock Pipeline
// ============================================================================

#[derive(Debug)]
pub struct MockPipeline {
    pub desc: PipelineDesc,
}

impl Pipeline for MockPipeline {
    fn desc(&self) -> &PipelineDesc {
        &self.desc
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[derive(Debug, Default)]
pub struct MockCommandList {
    pub commands: Vec<String>,
    pub closed: bool,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, command: String) -> Result<()> {
        if self.closed {
            engine_bail!("umbra::MockCommandList", "Recording '{}' into a closed list", command);
        }
        self.commands.push(command);
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn begin_event(&mut self, name: &str) -> Result<()> {
        self.record(format!("begin_event {}", name))
    }

    fn end_event(&mut self) -> Result<()> {
        self.record("end_event".to_string())
    }

    fn set_render_targets(
        &mut self,
        color: Option<&Arc<dyn Texture>>,
        depth: Option<DepthTarget<'_>>,
    ) -> Result<()> {
        let color = color.map(|t| t.info().sample_count).unwrap_or(0);
        let depth = depth.map(|d| d.layer as i64).unwrap_or(-1);
        self.record(format!("set_render_targets color_samples={} depth_layer={}", color, depth))
    }

    fn clear_color(&mut self, _texture: &Arc<dyn Texture>, color: [f32; 4]) -> Result<()> {
        self.record(format!("clear_color {:?}", color))
    }

    fn clear_depth(&mut self, _texture: &Arc<dyn Texture>, layer: u32, depth: f32) -> Result<()> {
        self.record(format!("clear_depth layer={} value={}", layer, depth))
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.record(format!(
            "set_viewport {} {} {} {}",
            viewport.x, viewport.y, viewport.width, viewport.height
        ))
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.record(format!("bind_pipeline {:?}", pipeline.desc().kind))
    }

    fn bind_constant_buffer(&mut self, slot: u32, _buffer: &Arc<dyn Buffer>) -> Result<()> {
        self.record(format!("bind_constant_buffer {}", slot))
    }

    fn bind_texture(&mut self, slot: u32, texture: Option<&Arc<dyn Texture>>) -> Result<()> {
        self.record(format!("bind_texture {} {}", slot, texture.is_some()))
    }

    fn bind_structured_buffer(&mut self, slot: u32, _buffer: &Arc<dyn Buffer>) -> Result<()> {
        self.record(format!("bind_structured_buffer {}", slot))
    }

    fn bind_vertex_buffer(&mut self, _buffer: &Arc<dyn Buffer>, stride: u32, offset: u64) -> Result<()> {
        self.record(format!("bind_vertex_buffer {} {}", stride, offset))
    }

    fn bind_index_buffer(&mut self, _buffer: &Arc<dyn Buffer>, offset: u64, index_type: IndexType) -> Result<()> {
        self.record(format!("bind_index_buffer {} {:?}", offset, index_type))
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.record(format!("draw {} {}", vertex_count, first_vertex))
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()> {
        self.record(format!("draw_indexed {} {} {}", index_count, first_index, vertex_offset))
    }

    fn draw_instanced(&mut self, vertex_count: u32, instance_count: u32) -> Result<()> {
        self.record(format!("draw_instanced {} {}", vertex_count, instance_count))
    }

    fn resolve(&mut self, _destination: &Arc<dyn Texture>, source: &Arc<dyn Texture>) -> Result<()> {
        self.record(format!("resolve samples={}", source.info().sample_count))
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.commands.clear();
        self.closed = false;
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    pub created_textures: Arc<Mutex<Vec<String>>>,
    pub created_buffers: Arc<Mutex<Vec<Arc<MockBuffer>>>>,
    pub created_pipelines: Arc<Mutex<Vec<PipelineDesc>>>,
    pub executed: Arc<Mutex<Vec<String>>>,
    pub present_count: AtomicU32,
    pub fail_texture_creation: AtomicBool,
    /// Texture creation fails when the debug name contains this text
    pub fail_textures_named: Mutex<Option<String>>,
    depth_convention: DepthConvention,
    back_buffer: Arc<dyn Texture>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::with_depth_convention(DepthConvention::Reversed)
    }

    pub fn with_depth_convention(depth_convention: DepthConvention) -> Self {
        Self {
            created_textures: Arc::new(Mutex::new(Vec::new())),
            created_buffers: Arc::new(Mutex::new(Vec::new())),
            created_pipelines: Arc::new(Mutex::new(Vec::new())),
            executed: Arc::new(Mutex::new(Vec::new())),
            present_count: AtomicU32::new(0),
            fail_texture_creation: AtomicBool::new(false),
            fail_textures_named: Mutex::new(None),
            depth_convention,
            back_buffer: Arc::new(MockTexture::color_2d(1280, 720, "back_buffer")),
        }
    }

    /// Snapshot of the executed-command log
    pub fn executed_commands(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn clear_executed(&self) {
        self.executed.lock().unwrap().clear();
    }

    /// Most recently created buffer with the given debug name
    pub fn buffer_named(&self, name: &str) -> Option<Arc<MockBuffer>> {
        self.created_buffers
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|b| b.name == name)
            .cloned()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        if self.fail_texture_creation.load(Ordering::SeqCst) {
            engine_bail!("umbra::MockGraphicsDevice", "Texture creation disabled ('{}')", desc.debug_name);
        }
        if let Some(pattern) = self.fail_textures_named.lock().unwrap().as_deref() {
            if desc.debug_name.contains(pattern) {
                engine_bail!("umbra::MockGraphicsDevice", "Texture creation refused for '{}'", desc.debug_name);
            }
        }
        self.created_textures.lock().unwrap().push(desc.debug_name.clone());
        Ok(Arc::new(MockTexture::from_desc(&desc)))
    }

    fn create_buffer(&self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        let buffer = Arc::new(MockBuffer::new(desc.size, desc.usage, desc.debug_name));
        self.created_buffers.lock().unwrap().push(buffer.clone());
        Ok(buffer)
    }

    fn create_pipeline(&self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        self.created_pipelines.lock().unwrap().push(desc.clone());
        Ok(Arc::new(MockPipeline { desc }))
    }

    fn create_command_list(&self) -> Result<Box<dyn CommandList>> {
        Ok(Box::new(MockCommandList::new()))
    }

    fn execute_command_list(&self, command_list: &mut dyn CommandList) -> Result<()> {
        let Some(list) = command_list.as_any_mut().downcast_mut::<MockCommandList>() else {
            engine_bail!("umbra::MockGraphicsDevice", "Foreign command list type");
        };
        if !list.closed {
            engine_bail!("umbra::MockGraphicsDevice", "Executing a command list that was not closed");
        }
        self.executed.lock().unwrap().append(&mut list.commands);
        list.closed = false;
        Ok(())
    }

    fn depth_convention(&self) -> DepthConvention {
        self.depth_convention
    }

    fn back_buffer(&self) -> Result<Arc<dyn Texture>> {
        Ok(self.back_buffer.clone())
    }

    fn present(&self, _sync_interval: u32) -> Result<()> {
        self.present_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
