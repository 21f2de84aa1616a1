/// Debug lines queued for the next gizmo pass

use glam::{Vec3, Vec4};
use super::shader_types::LineGizmoVertexData;

/// Lines and their colors, cleared on every present.
///
/// Each line owns one color entry; `color_index` in the line data points
/// at it.
#[derive(Debug, Default)]
pub struct GizmoQueue {
    colors: Vec<[f32; 4]>,
    lines: Vec<LineGizmoVertexData>,
}

impl GizmoQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, from: Vec3, to: Vec3, color: Vec4) {
        self.colors.push(color.to_array());
        self.lines.push(LineGizmoVertexData {
            from: from.to_array(),
            color_index: (self.colors.len() - 1) as u32,
            to: to.to_array(),
            _padding: 0,
        });
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    pub fn lines(&self) -> &[LineGizmoVertexData] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.colors.clear();
        self.lines.clear();
    }
}

#[cfg(test)]
#[path = "gizmo_queue_tests.rs"]
mod tests;
