//! Pooled string builders for the render hot path.
//!
//! Container nodes compose fragments constantly; the pool hands out reusable
//! `String` buffers so a render touches the allocator as little as possible.
//! Buffers are acquired at render entry, reset on release, and never escape
//! the render call.

use parking_lot::Mutex;

const MAX_POOLED: usize = 32;
const INITIAL_CAPACITY: usize = 128;
const MAX_RETAINED_CAPACITY: usize = 8 * 1024;

/// A pool of reusable string buffers.
#[derive(Debug, Default)]
pub struct BufferPool {
    buffers: Mutex<Vec<String>>,
}

impl BufferPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a cleared buffer out of the pool, allocating when empty.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self
            .buffers
            .lock()
            .pop()
            .unwrap_or_else(|| String::with_capacity(INITIAL_CAPACITY));
        PooledBuffer { pool: self, buf }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.buffers.lock().len()
    }
}

/// A buffer checked out of a [`BufferPool`]; returns itself on drop.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: String,
}

impl PooledBuffer<'_> {
    /// Append a string slice.
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Append a single character.
    #[inline]
    pub fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    /// View the accumulated contents.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Check whether nothing has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Copy the contents out, leaving the buffer to return to the pool.
    #[inline]
    pub fn detach(&self) -> String {
        self.buf.clone()
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.buf.clear();
        // Oversized buffers are dropped rather than pinned in the pool.
        if self.buf.capacity() <= MAX_RETAINED_CAPACITY {
            let mut buffers = self.pool.buffers.lock();
            if buffers.len() < MAX_POOLED {
                buffers.push(std::mem::take(&mut self.buf));
            }
        }
    }
}
