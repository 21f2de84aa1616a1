/// Buffer trait and buffer descriptor

use crate::error::Result;

/// Buffer usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex buffer
    Vertex,
    /// Index buffer
    Index,
    /// Constant buffer, rewritten every frame
    Constant,
    /// Structured buffer read by shaders (lights, gizmo lines)
    Structured,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
    /// Element stride in bytes (structured buffers only, 0 otherwise)
    pub stride: u32,
    /// Name shown in graphics debuggers
    pub debug_name: String,
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types. The buffer is destroyed
/// when the last `Arc` is dropped.
pub trait Buffer: Send + Sync {
    /// Size in bytes
    fn size(&self) -> u64;

    /// Overwrite a byte range (map with discard, copy, unmap)
    ///
    /// # Errors
    ///
    /// Fails if the range exceeds the buffer or the map call fails.
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;
}
