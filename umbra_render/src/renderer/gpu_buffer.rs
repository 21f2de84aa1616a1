/// Typed wrappers over device buffers
///
/// Contents are `Pod` and uploaded whole every frame with the
/// map-discard-write pattern of [`Buffer::update`].

use std::marker::PhantomData;
use std::mem::size_of;
use std::sync::Arc;
use bytemuck::Pod;
use crate::error::Result;
use crate::graphics_device::{Buffer, BufferDesc, BufferUsage, GraphicsDevice};

/// Constant buffer holding exactly one `T`
pub struct ConstantBuffer<T: Pod> {
    buffer: Arc<dyn Buffer>,
    _marker: PhantomData<T>,
}

impl<T: Pod> ConstantBuffer<T> {
    pub fn new(device: &dyn GraphicsDevice, debug_name: &str) -> Result<Self> {
        let buffer = device.create_buffer(BufferDesc {
            size: size_of::<T>() as u64,
            usage: BufferUsage::Constant,
            stride: 0,
            debug_name: debug_name.to_string(),
        })?;
        Ok(Self { buffer, _marker: PhantomData })
    }

    pub fn update(&self, value: &T) -> Result<()> {
        self.buffer.update(0, bytemuck::bytes_of(value))
    }

    pub fn buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffer
    }
}

/// Structured buffer of `T` elements that grows on demand
///
/// Growing recreates the device buffer with at least twice the previous
/// capacity; the old buffer is released once nothing binds it anymore.
pub struct StructuredBuffer<T: Pod> {
    buffer: Arc<dyn Buffer>,
    capacity: usize,
    len: usize,
    debug_name: String,
    _marker: PhantomData<T>,
}

impl<T: Pod> StructuredBuffer<T> {
    pub fn new(device: &dyn GraphicsDevice, capacity: usize, debug_name: &str) -> Result<Self> {
        let capacity = capacity.max(1);
        Ok(Self {
            buffer: Self::create(device, capacity, debug_name)?,
            capacity,
            len: 0,
            debug_name: debug_name.to_string(),
            _marker: PhantomData,
        })
    }

    fn create(device: &dyn GraphicsDevice, capacity: usize, debug_name: &str) -> Result<Arc<dyn Buffer>> {
        device.create_buffer(BufferDesc {
            size: (capacity * size_of::<T>()) as u64,
            usage: BufferUsage::Structured,
            stride: size_of::<T>() as u32,
            debug_name: debug_name.to_string(),
        })
    }

    /// Upload `elements`, growing the buffer first if they do not fit.
    ///
    /// An empty slice only resets the element count.
    pub fn update(&mut self, device: &dyn GraphicsDevice, elements: &[T]) -> Result<()> {
        if elements.len() > self.capacity {
            let capacity = elements.len().max(self.capacity * 2);
            self.buffer = Self::create(device, capacity, &self.debug_name)?;
            self.capacity = capacity;
        }

        self.len = elements.len();
        if elements.is_empty() {
            return Ok(());
        }
        self.buffer.update(0, bytemuck::cast_slice(elements))
    }

    pub fn buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffer
    }

    /// Element slots available before the next grow
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Elements written by the last update
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Per-frame ring of constant buffers
///
/// Every draw or view in a frame records its own buffer, so a later update
/// never overwrites constants an earlier command in the same list still
/// reads. Buffers are recycled after [`reset`](Self::reset).
pub struct ConstantBufferPool<T: Pod> {
    buffers: Vec<Arc<ConstantBuffer<T>>>,
    next: usize,
    debug_name: String,
}

impl<T: Pod> ConstantBufferPool<T> {
    pub fn new(debug_name: &str) -> Self {
        Self { buffers: Vec::new(), next: 0, debug_name: debug_name.to_string() }
    }

    /// Next unused buffer of this frame, already holding `value`
    pub fn acquire(&mut self, device: &dyn GraphicsDevice, value: &T) -> Result<Arc<ConstantBuffer<T>>> {
        if self.next == self.buffers.len() {
            let name = format!("{} {}", self.debug_name, self.buffers.len());
            self.buffers.push(Arc::new(ConstantBuffer::new(device, &name)?));
        }
        let buffer = self.buffers[self.next].clone();
        self.next += 1;
        buffer.update(value)?;
        Ok(buffer)
    }

    /// Make every buffer available again
    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Buffers handed out since the last reset
    pub fn in_use(&self) -> usize {
        self.next
    }

    /// Buffers allocated so far
    pub fn allocated(&self) -> usize {
        self.buffers.len()
    }
}

#[cfg(test)]
#[path = "gpu_buffer_tests.rs"]
mod tests;
