/// Render target: where a pass renders to.
///
/// Textures are created from a [`RenderTargetDesc`] through the graphics
/// device. A target needs at least one attachment.

use std::sync::Arc;
use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{
    GraphicsDevice, Texture, TextureDesc, TextureFormat, TextureType, TextureUsage,
};

#[derive(Debug, Clone)]
pub struct RenderTargetDesc {
    pub width: u32,
    pub height: u32,
    pub color_format: Option<TextureFormat>,
    /// 0 for no depth buffer
    pub depth_buffer_bit_count: u8,
    pub stencil_buffer_bit_count: u8,
    pub sample_count: u32,
    pub enable_unordered_access: bool,
    pub debug_name: String,
}

impl Default for RenderTargetDesc {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            color_format: Some(TextureFormat::R8G8B8A8_UNORM),
            depth_buffer_bit_count: 0,
            stencil_buffer_bit_count: 0,
            sample_count: 1,
            enable_unordered_access: false,
            debug_name: String::new(),
        }
    }
}

/// Equality ignores `debug_name`, so two requests for the same layout
/// can share a cached target.
impl PartialEq for RenderTargetDesc {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.color_format == other.color_format
            && self.depth_buffer_bit_count == other.depth_buffer_bit_count
            && self.stencil_buffer_bit_count == other.stencil_buffer_bit_count
            && self.sample_count == other.sample_count
            && self.enable_unordered_access == other.enable_unordered_access
    }
}

impl Eq for RenderTargetDesc {}

pub struct RenderTarget {
    desc: RenderTargetDesc,
    color_texture: Option<Arc<dyn Texture>>,
    depth_stencil_texture: Option<Arc<dyn Texture>>,
}

impl RenderTarget {
    /// Create the attachments described by `desc`.
    ///
    /// # Errors
    ///
    /// Fails when the target would have no attachment, has a zero extent,
    /// asks for a depth/stencil bit combination no format covers, or when
    /// the device fails to create a texture.
    pub fn new(device: &dyn GraphicsDevice, desc: RenderTargetDesc) -> Result<Self> {
        if desc.color_format.is_none() && desc.depth_buffer_bit_count == 0 {
            engine_bail!(
                "umbra::RenderTarget",
                "RenderTarget '{}' has neither a color nor a depth attachment",
                desc.debug_name
            );
        }
        if desc.width == 0 || desc.height == 0 {
            engine_bail!(
                "umbra::RenderTarget",
                "RenderTarget '{}' has a zero extent ({}x{})",
                desc.debug_name, desc.width, desc.height
            );
        }

        let color_texture = match desc.color_format {
            Some(format) => {
                let mut usage = TextureUsage::SAMPLED | TextureUsage::RENDER_TARGET;
                if desc.enable_unordered_access {
                    usage |= TextureUsage::UNORDERED_ACCESS;
                }
                Some(device.create_texture(TextureDesc {
                    width: desc.width,
                    height: desc.height,
                    format,
                    usage,
                    texture_type: TextureType::Tex2D,
                    array_layers: 1,
                    sample_count: desc.sample_count.max(1),
                    debug_name: format!("{} - Color", desc.debug_name),
                })?)
            }
            None => None,
        };

        let depth_stencil_texture = if desc.depth_buffer_bit_count > 0 {
            let Some(format) = TextureFormat::from_depth_stencil_bits(
                desc.depth_buffer_bit_count,
                desc.stencil_buffer_bit_count,
            ) else {
                engine_bail!(
                    "umbra::RenderTarget",
                    "RenderTarget '{}': no depth format with {} depth and {} stencil bits",
                    desc.debug_name, desc.depth_buffer_bit_count, desc.stencil_buffer_bit_count
                );
            };
            Some(device.create_texture(TextureDesc {
                width: desc.width,
                height: desc.height,
                format,
                usage: TextureUsage::DEPTH_STENCIL | TextureUsage::SAMPLED,
                texture_type: TextureType::Tex2D,
                array_layers: 1,
                sample_count: desc.sample_count.max(1),
                debug_name: format!("{} - Depth Stencil", desc.debug_name),
            })?)
        } else {
            None
        };

        Ok(Self { desc, color_texture, depth_stencil_texture })
    }

    pub fn desc(&self) -> &RenderTargetDesc {
        &self.desc
    }

    pub fn color_texture(&self) -> Option<&Arc<dyn Texture>> {
        self.color_texture.as_ref()
    }

    pub fn depth_stencil_texture(&self) -> Option<&Arc<dyn Texture>> {
        self.depth_stencil_texture.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
