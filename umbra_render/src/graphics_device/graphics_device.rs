/// GraphicsDevice trait - the device the renderer records against

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, CommandList, DepthConvention, Pipeline, PipelineDesc, Texture, TextureDesc,
};

/// Graphics device
///
/// Creation methods take `&self` and may be called from any thread.
/// `execute_command_list` is the immediate-context submission; callers
/// serialize it.
pub trait GraphicsDevice: Send + Sync {
    /// Create a texture
    fn create_texture(&self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a buffer
    fn create_buffer(&self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create one of the fixed pipelines
    fn create_pipeline(&self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Create a deferred command list
    fn create_command_list(&self) -> Result<Box<dyn CommandList>>;

    /// Submit a closed command list on the immediate context
    fn execute_command_list(&self, command_list: &mut dyn CommandList) -> Result<()>;

    /// Depth direction this device renders with
    fn depth_convention(&self) -> DepthConvention;

    /// Current swap-chain back buffer
    fn back_buffer(&self) -> Result<Arc<dyn Texture>>;

    /// Present the swap chain
    ///
    /// * `sync_interval` - 0 = immediate, N = wait for N vertical blanks
    fn present(&self, sync_interval: u32) -> Result<()>;
}
