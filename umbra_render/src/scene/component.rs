/// Read access to a registered component

use std::sync::RwLock;

/// A component the renderer reads by value once per drawn camera.
///
/// The owner keeps mutating its copy; the renderer never holds a lock
/// across a frame.
pub trait ComponentSource<T>: Send + Sync {
    fn snapshot(&self) -> T;
}

impl<T: Clone + Send + Sync> ComponentSource<T> for RwLock<T> {
    fn snapshot(&self) -> T {
        self.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}
