/// Texture trait, texture descriptor, and texture info

use bitflags::bitflags;

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Color formats
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R11G11B10_FLOAT,
    R16G16B16A16_FLOAT,
    R32G32B32A32_FLOAT,

    // Depth/stencil formats
    D16_UNORM,
    D24_UNORM_S8_UINT,
    D32_FLOAT,
    D32_FLOAT_S8X24_UINT,
}

impl TextureFormat {
    /// Returns true for depth or depth/stencil formats
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM
                | TextureFormat::D24_UNORM_S8_UINT
                | TextureFormat::D32_FLOAT
                | TextureFormat::D32_FLOAT_S8X24_UINT
        )
    }

    /// Pick the depth/stencil format for a (depth bits, stencil bits) pair.
    ///
    /// Returns `None` for combinations no device format covers.
    pub fn from_depth_stencil_bits(depth_bits: u8, stencil_bits: u8) -> Option<Self> {
        match (depth_bits, stencil_bits) {
            (16, 0) => Some(TextureFormat::D16_UNORM),
            (24, 0) | (24, 8) => Some(TextureFormat::D24_UNORM_S8_UINT),
            (32, 0) => Some(TextureFormat::D32_FLOAT),
            (32, 8) => Some(TextureFormat::D32_FLOAT_S8X24_UINT),
            _ => None,
        }
    }
}

bitflags! {
    /// How a texture may be bound
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// Sampled from shaders
        const SAMPLED = 1 << 0;
        /// Bound as a color render target
        const RENDER_TARGET = 1 << 1;
        /// Bound as a depth/stencil target
        const DEPTH_STENCIL = 1 << 2;
        /// Bound for unordered (storage) access
        const UNORDERED_ACCESS = 1 << 3;
    }
}

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureType {
    /// 2D texture, optionally an array when `array_layers > 1`
    Tex2D,
    /// Six-face cube map
    Cube,
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Dimensionality
    pub texture_type: TextureType,
    /// Number of array layers (1 = simple 2D texture)
    pub array_layers: u32,
    /// MSAA sample count (1 = not multisampled)
    pub sample_count: u32,
    /// Name shown in graphics debuggers
    pub debug_name: String,
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
#[derive(Debug, Clone)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
    pub texture_type: TextureType,
    pub array_layers: u32,
    pub sample_count: u32,
}

impl TextureInfo {
    /// Returns true if this texture is a texture array (array_layers > 1)
    pub fn is_array(&self) -> bool {
        self.array_layers > 1
    }

    pub fn is_multisampled(&self) -> bool {
        self.sample_count > 1
    }
}

impl From<&TextureDesc> for TextureInfo {
    fn from(desc: &TextureDesc) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
            texture_type: desc.texture_type,
            array_layers: desc.array_layers,
            sample_count: desc.sample_count,
        }
    }
}

// ===== TEXTURE TRAIT =====

/// Texture resource trait
///
/// Implemented by backend-specific texture types. The texture is destroyed
/// when the last `Arc` is dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;
}
