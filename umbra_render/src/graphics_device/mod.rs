/// Graphics device module - the GPU seam the renderer records against

pub mod graphics_device;
pub mod texture;
pub mod buffer;
pub mod pipeline;
pub mod command_list;
pub mod depth_convention;

pub use graphics_device::*;
pub use texture::*;
pub use buffer::*;
pub use pipeline::*;
pub use command_list::*;
pub use depth_convention::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
