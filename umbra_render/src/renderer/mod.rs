/// Renderer module - the rendering context and its frame orchestration

// Module declarations
pub mod renderer;
pub mod renderer_frame;
pub mod renderer_settings;
pub mod shader_types;
pub mod gpu_buffer;
pub mod gizmo_queue;

// Re-export the public surface
pub use renderer::{CameraKey, LightKey, Renderer, SharedCommandList, SkyboxKey, StaticMeshKey};
pub use renderer_settings::{MultisamplingMode, RendererConfig, RendererSettings, ShadowFilteringMode};
pub use shader_types::*;
pub use gpu_buffer::{ConstantBuffer, ConstantBufferPool, StructuredBuffer};
pub use gizmo_queue::GizmoQueue;
