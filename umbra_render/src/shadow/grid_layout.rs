/// Square grid subdivision shared by atlases and cells

use glam::Vec2;

/// `subdivision x subdivision` equally sized elements, row-major,
/// in normalized `[0, 1]` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    subdivision: u32,
}

impl GridLayout {
    /// A subdivision of 0 is treated as 1.
    pub fn new(subdivision: u32) -> Self {
        Self { subdivision: subdivision.max(1) }
    }

    /// Elements per side
    pub fn subdivision_size(&self) -> u32 {
        self.subdivision
    }

    pub fn element_count(&self) -> usize {
        (self.subdivision * self.subdivision) as usize
    }

    /// Side length of one element
    pub fn normalized_element_size(&self) -> f32 {
        1.0 / self.subdivision as f32
    }

    /// Top-left corner of element `index`
    pub fn normalized_element_offset(&self, index: usize) -> Vec2 {
        let s = self.subdivision as usize;
        Vec2::new((index % s) as f32, (index / s) as f32) * self.normalized_element_size()
    }
}

#[cfg(test)]
#[path = "grid_layout_tests.rs"]
mod tests;
