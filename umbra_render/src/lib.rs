/*!
# Umbra Render

Per-frame rendering orchestration for a forward PBR renderer.

The crate sits above a graphics API: it records into the [`GraphicsDevice`]
and [`CommandList`] traits, and a backend (D3D11, Vulkan, ...) implements them.

## Architecture

- **Geometry**: AABB, bounding sphere, plane and frustum math
- **Visibility**: light and static-mesh culling against a frustum
- **Shadow**: cascaded directional shadows and the coverage-ranked punctual shadow atlas
- **RenderTarget**: render targets and the temporary render-target cache
- **Renderer**: the rendering context; registries, per-thread command lists,
  the per-camera frame sequence, gizmos and present

[`GraphicsDevice`]: umbra::device::GraphicsDevice
[`CommandList`]: umbra::device::CommandList
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod geometry;
pub mod scene;
pub mod camera;
pub mod visibility;
pub mod shadow;
pub mod graphics_device;
pub mod render_target;
pub mod renderer;

// Main umbra namespace module
pub mod umbra {
    // Error types
    pub use crate::error::{Error, Result};

    // Global logger access
    pub use crate::engine::Engine;

    // Rendering context
    pub use crate::renderer::{Renderer, RendererConfig, RendererSettings};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    pub mod geometry {
        pub use crate::geometry::*;
    }

    // Scene collaborators, cameras included
    pub mod scene {
        pub use crate::scene::*;
        pub use crate::camera::*;
    }

    pub mod visibility {
        pub use crate::visibility::*;
    }

    pub mod shadow {
        pub use crate::shadow::*;
    }

    // Graphics device seam
    pub mod device {
        pub use crate::graphics_device::*;
    }

    pub mod render_target {
        pub use crate::render_target::*;
    }

    pub mod render {
        pub use crate::renderer::*;
    }
}

// Re-export math library at crate root
pub use glam;
