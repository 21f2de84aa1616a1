//! Render target module
//!
//! A render target bundles an optional color texture with an optional
//! depth/stencil texture. The temporary cache hands out per-frame targets
//! (HDR scene color, MSAA resolve) and frees the ones nobody asked for
//! in a while.

mod render_target;
mod temporary_render_target_cache;

pub use render_target::{RenderTarget, RenderTargetDesc};
pub use temporary_render_target_cache::{TemporaryRenderTargetCache, MAX_TEMP_RENDER_TARGET_AGE_IN_FRAMES};
