/// Renderer configuration and runtime tunables
///
/// `RendererConfig` is fixed when the renderer is created. `RendererSettings`
/// can change between frames; setters normalize invalid input instead of
/// failing.

use glam::Vec3;
use crate::shadow::MAX_CASCADE_COUNT;

/// Shadow-map filtering (values match the shader-side encoding)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum ShadowFilteringMode {
    None = 0,
    HardwarePcf = 1,
    Pcf3x3 = 2,
    PcfTent3x3 = 3,
    #[default]
    PcfTent5x5 = 4,
}

/// MSAA level of the HDR scene target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum MultisamplingMode {
    Off = 1,
    X2 = 2,
    X4 = 4,
    #[default]
    X8 = 8,
}

impl MultisamplingMode {
    pub fn sample_count(&self) -> u32 {
        *self as u32
    }

    pub fn is_enabled(&self) -> bool {
        *self != MultisamplingMode::Off
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererSettings {
    shadow_cascade_count: usize,
    normalized_shadow_cascade_splits: [f32; MAX_CASCADE_COUNT - 1],
    shadow_distance: f32,
    shadow_filtering_mode: ShadowFilteringMode,
    multisampling_mode: MultisamplingMode,
    inv_gamma: f32,
    ambient_light_color: Vec3,
    visualize_shadow_cascades: bool,
    sync_interval: u32,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            shadow_cascade_count: MAX_CASCADE_COUNT,
            normalized_shadow_cascade_splits: [0.1, 0.3, 0.6],
            shadow_distance: 100.0,
            shadow_filtering_mode: ShadowFilteringMode::default(),
            multisampling_mode: MultisamplingMode::default(),
            inv_gamma: 1.0 / 2.2,
            ambient_light_color: Vec3::splat(0.03),
            visualize_shadow_cascades: false,
            sync_interval: 0,
        }
    }
}

impl RendererSettings {
    // ===== SHADOWS =====

    pub fn shadow_cascade_count(&self) -> usize {
        self.shadow_cascade_count
    }

    /// Clamped to `1..=MAX_CASCADE_COUNT`; the active splits are made non-decreasing
    pub fn set_shadow_cascade_count(&mut self, count: usize) {
        self.shadow_cascade_count = count.clamp(1, MAX_CASCADE_COUNT);
        let split_count = self.shadow_cascade_count - 1;
        for i in 1..split_count {
            let previous = self.normalized_shadow_cascade_splits[i - 1];
            self.normalized_shadow_cascade_splits[i] = self.normalized_shadow_cascade_splits[i].max(previous);
        }
    }

    /// The `cascade_count - 1` active splits
    pub fn normalized_shadow_cascade_splits(&self) -> &[f32] {
        &self.normalized_shadow_cascade_splits[..self.shadow_cascade_count - 1]
    }

    /// Ignored when `index` is not an active split; otherwise clamped
    /// between its neighbors (0 and 1 at the ends).
    pub fn set_normalized_shadow_cascade_split(&mut self, index: usize, split: f32) {
        let split_count = self.shadow_cascade_count - 1;
        if index >= split_count {
            return;
        }

        let min = if index == 0 { 0.0 } else { self.normalized_shadow_cascade_splits[index - 1] };
        let max = if index == split_count - 1 { 1.0 } else { self.normalized_shadow_cascade_splits[index + 1] };
        self.normalized_shadow_cascade_splits[index] = split.clamp(min, max);
    }

    pub fn shadow_distance(&self) -> f32 {
        self.shadow_distance
    }

    pub fn set_shadow_distance(&mut self, distance: f32) {
        self.shadow_distance = distance.max(0.0);
    }

    pub fn shadow_filtering_mode(&self) -> ShadowFilteringMode {
        self.shadow_filtering_mode
    }

    pub fn set_shadow_filtering_mode(&mut self, mode: ShadowFilteringMode) {
        self.shadow_filtering_mode = mode;
    }

    pub fn is_visualizing_shadow_cascades(&self) -> bool {
        self.visualize_shadow_cascades
    }

    pub fn set_visualize_shadow_cascades(&mut self, visualize: bool) {
        self.visualize_shadow_cascades = visualize;
    }

    // ===== OUTPUT =====

    pub fn multisampling_mode(&self) -> MultisamplingMode {
        self.multisampling_mode
    }

    pub fn set_multisampling_mode(&mut self, mode: MultisamplingMode) {
        self.multisampling_mode = mode;
    }

    pub fn gamma(&self) -> f32 {
        1.0 / self.inv_gamma
    }

    pub fn inv_gamma(&self) -> f32 {
        self.inv_gamma
    }

    /// Non-positive values are ignored
    pub fn set_gamma(&mut self, gamma: f32) {
        if gamma > 0.0 {
            self.inv_gamma = 1.0 / gamma;
        }
    }

    pub fn ambient_light_color(&self) -> Vec3 {
        self.ambient_light_color
    }

    pub fn set_ambient_light_color(&mut self, color: Vec3) {
        self.ambient_light_color = color.max(Vec3::ZERO);
    }

    pub fn sync_interval(&self) -> u32 {
        self.sync_interval
    }

    pub fn set_sync_interval(&mut self, interval: u32) {
        self.sync_interval = interval;
    }
}

/// Creation-time configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Side of each directional cascade slice, power of two
    pub directional_shadow_map_size: u32,
    /// Side of the punctual shadow atlas, power of two
    pub punctual_shadow_atlas_size: u32,
    /// Light buffer capacity before the first grow
    pub initial_light_capacity: usize,
    pub settings: RendererSettings,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            directional_shadow_map_size: 4096,
            punctual_shadow_atlas_size: 4096,
            initial_light_capacity: 64,
            settings: RendererSettings::default(),
        }
    }
}

#[cfg(test)]
#[path = "renderer_settings_tests.rs"]
mod tests;
