/// Per-pass culling results and the pool they are recycled through

use std::sync::Mutex;

/// A visible submesh: `(index into the mesh snapshot, submesh index)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticMeshSubmeshIndex {
    pub mesh_index: usize,
    pub submesh_index: usize,
}

/// Result of one culling pass
///
/// Cleared and refilled by every culling call; capacity is kept so a
/// recycled instance stops allocating once it has grown to the scene size.
#[derive(Debug, Default, Clone)]
pub struct Visibility {
    /// Indices into the light snapshot, in registration order
    pub light_indices: Vec<usize>,
    pub static_mesh_indices: Vec<StaticMeshSubmeshIndex>,
}

impl Visibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.light_indices.clear();
        self.static_mesh_indices.clear();
    }
}

/// Free list of [`Visibility`] buffers
///
/// Culling runs once per camera and once per shadow view every frame;
/// taking from the pool and giving back avoids re-growing vectors.
#[derive(Debug, Default)]
pub struct VisibilityPool {
    free: Mutex<Vec<Visibility>>,
}

impl VisibilityPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cleared buffer, recycled when one is available
    pub fn take(&self) -> Visibility {
        let mut free = self.free.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut visibility = free.pop().unwrap_or_default();
        visibility.clear();
        visibility
    }

    pub fn give_back(&self, visibility: Visibility) {
        self.free.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(visibility);
    }

    /// Number of idle buffers
    pub fn idle_count(&self) -> usize {
        self.free.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}
