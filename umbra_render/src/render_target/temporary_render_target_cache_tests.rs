/// Tests for TemporaryRenderTargetCache
///
/// These tests validate same-frame reuse, aging, and eviction.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use super::*;
use crate::graphics_device::TextureFormat;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;

fn desc(width: u32, sample_count: u32) -> RenderTargetDesc {
    RenderTargetDesc {
        width,
        height: 256,
        color_format: Some(TextureFormat::R11G11B10_FLOAT),
        depth_buffer_bit_count: 16,
        sample_count,
        debug_name: "Camera HDR RenderTarget".to_string(),
        ..Default::default()
    }
}

// ============================================================================
// Tests: Reuse
// ============================================================================

#[test]
fn test_identical_request_returns_same_target() {
    let device = MockGraphicsDevice::new();
    let cache = TemporaryRenderTargetCache::new();

    let first = cache.get(&device, &desc(512, 1)).unwrap();
    let second = cache.get(&device, &desc(512, 1)).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
    assert_eq!(device.created_textures.lock().unwrap().len(), 2);
}

#[test]
fn test_debug_name_does_not_prevent_reuse() {
    let device = MockGraphicsDevice::new();
    let cache = TemporaryRenderTargetCache::new();

    let first = cache.get(&device, &desc(512, 1)).unwrap();
    let renamed = RenderTargetDesc { debug_name: "Resolve".to_string(), ..desc(512, 1) };
    let second = cache.get(&device, &renamed).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_different_requests_allocate() {
    let device = MockGraphicsDevice::new();
    let cache = TemporaryRenderTargetCache::new();

    let msaa = cache.get(&device, &desc(512, 8)).unwrap();
    let resolve = cache.get(&device, &desc(512, 1)).unwrap();
    let wider = cache.get(&device, &desc(1024, 1)).unwrap();

    assert!(!Arc::ptr_eq(&msaa, &resolve));
    assert!(!Arc::ptr_eq(&resolve, &wider));
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_failed_creation_is_not_cached() {
    let device = MockGraphicsDevice::new();
    let cache = TemporaryRenderTargetCache::new();
    device.fail_texture_creation.store(true, Ordering::SeqCst);

    assert!(cache.get(&device, &desc(512, 1)).is_err());
    assert!(cache.is_empty());
}

// ============================================================================
// Tests: Aging
// ============================================================================

#[test]
fn test_unused_target_is_evicted_after_exactly_max_age() {
    let device = MockGraphicsDevice::new();
    let cache = TemporaryRenderTargetCache::new();
    cache.get(&device, &desc(512, 1)).unwrap();

    for _ in 0..MAX_TEMP_RENDER_TARGET_AGE_IN_FRAMES - 1 {
        cache.release_unused();
        assert_eq!(cache.len(), 1);
    }

    cache.release_unused();
    assert!(cache.is_empty());
}

#[test]
fn test_request_resets_age() {
    let device = MockGraphicsDevice::new();
    let cache = TemporaryRenderTargetCache::new();
    let first = cache.get(&device, &desc(512, 1)).unwrap();

    for _ in 0..5 {
        cache.release_unused();
    }
    let again = cache.get(&device, &desc(512, 1)).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    for _ in 0..MAX_TEMP_RENDER_TARGET_AGE_IN_FRAMES - 1 {
        cache.release_unused();
    }
    assert_eq!(cache.len(), 1);

    cache.release_unused();
    assert!(cache.is_empty());
}

#[test]
fn test_eviction_is_per_entry() {
    let device = MockGraphicsDevice::new();
    let cache = TemporaryRenderTargetCache::new();
    cache.get(&device, &desc(512, 1)).unwrap();

    for frame in 0..MAX_TEMP_RENDER_TARGET_AGE_IN_FRAMES {
        cache.get(&device, &desc(1024, 1)).unwrap();
        if frame == MAX_TEMP_RENDER_TARGET_AGE_IN_FRAMES - 1 {
            break;
        }
        cache.release_unused();
    }
    cache.release_unused();

    assert_eq!(cache.len(), 1);
    let survivor = cache.get(&device, &desc(1024, 1)).unwrap();
    assert_eq!(survivor.width(), 1024);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_clear_drops_everything() {
    let device = MockGraphicsDevice::new();
    let cache = TemporaryRenderTargetCache::new();
    cache.get(&device, &desc(512, 1)).unwrap();
    cache.clear();
    assert!(cache.is_empty());
}
