/// Pool of render targets reused across frames.
///
/// Lookups are linear: the working set is one HDR target per camera
/// size plus its resolve variant.

use std::sync::{Arc, Mutex, MutexGuard};
use crate::error::Result;
use crate::graphics_device::GraphicsDevice;
use crate::{engine_debug, engine_trace};
use super::{RenderTarget, RenderTargetDesc};

/// Frames an unused target survives before it is destroyed
pub const MAX_TEMP_RENDER_TARGET_AGE_IN_FRAMES: u32 = 10;

struct TempRenderTargetRecord {
    render_target: Arc<RenderTarget>,
    age_in_frames: u32,
}

pub struct TemporaryRenderTargetCache {
    records: Mutex<Vec<TempRenderTargetRecord>>,
}

impl TemporaryRenderTargetCache {
    pub fn new() -> Self {
        Self { records: Mutex::new(Vec::new()) }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TempRenderTargetRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A target matching `desc`, reused if one is cached.
    ///
    /// Resets the entry's age. On a miss the target is created through
    /// `device`; a creation failure leaves the cache unchanged.
    pub fn get(&self, device: &dyn GraphicsDevice, desc: &RenderTargetDesc) -> Result<Arc<RenderTarget>> {
        let mut records = self.lock();

        if let Some(record) = records.iter_mut().find(|r| r.render_target.desc() == desc) {
            record.age_in_frames = 0;
            return Ok(record.render_target.clone());
        }

        let render_target = Arc::new(RenderTarget::new(device, desc.clone())?);
        engine_debug!(
            "umbra::TemporaryRenderTargetCache",
            "Allocated '{}' ({}x{}, {} samples), {} cached",
            desc.debug_name, desc.width, desc.height, desc.sample_count, records.len() + 1
        );
        records.push(TempRenderTargetRecord { render_target: render_target.clone(), age_in_frames: 0 });
        Ok(render_target)
    }

    /// Age every entry by one frame and drop the ones that reached the limit
    pub fn release_unused(&self) {
        let mut records = self.lock();
        records.retain_mut(|record| {
            record.age_in_frames += 1;
            let keep = record.age_in_frames < MAX_TEMP_RENDER_TARGET_AGE_IN_FRAMES;
            if !keep {
                engine_trace!(
                    "umbra::TemporaryRenderTargetCache",
                    "Evicted '{}' after {} unused frames",
                    record.render_target.desc().debug_name, record.age_in_frames
                );
            }
            keep
        });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for TemporaryRenderTargetCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "temporary_render_target_cache_tests.rs"]
mod tests;
