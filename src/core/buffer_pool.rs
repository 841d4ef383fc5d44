//! Reusable line buffers
//!
//! Every log call formats into a `Vec<u8>` checked out of the pool and the
//! writer thread hands it back once the bytes are on the wire. Checkout moves
//! the buffer out of the free list and [`BufferPool::release`] consumes it, so
//! a buffer is never reachable from two places at once.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default capacity of a freshly allocated line buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 256;

/// Buffers that grew beyond this are shrunk before going back to the pool
pub const DEFAULT_RETAIN_LIMIT: usize = 64 * 1024;

/// Thread-safe free list of byte buffers
///
/// # Example
///
/// ```
/// use rust_console_logger::core::BufferPool;
///
/// let pool = BufferPool::new(256, 16);
/// let mut buf = pool.acquire();
/// buf.extend_from_slice(b"hello");
/// pool.release(buf);
///
/// let buf = pool.acquire();
/// assert!(buf.is_empty());
/// assert!(buf.capacity() >= 256);
/// ```
#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    min_capacity: usize,
    max_pooled: usize,
    retain_limit: usize,
    allocations: AtomicU64,
}

impl BufferPool {
    pub fn new(min_capacity: usize, max_pooled: usize) -> Self {
        Self::with_retain_limit(min_capacity, max_pooled, DEFAULT_RETAIN_LIMIT)
    }

    pub fn with_retain_limit(min_capacity: usize, max_pooled: usize, retain_limit: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_pooled.min(1024))),
            min_capacity,
            max_pooled,
            retain_limit: retain_limit.max(min_capacity),
            allocations: AtomicU64::new(0),
        }
    }

    /// Check out an empty buffer with at least the minimum capacity
    pub fn acquire(&self) -> Vec<u8> {
        let recycled = self.free.lock().pop();
        if let Some(mut buf) = recycled {
            buf.clear();
            if buf.capacity() < self.min_capacity {
                buf.reserve(self.min_capacity);
            }
            return buf;
        }

        self.allocations.fetch_add(1, Ordering::Relaxed);
        Vec::with_capacity(self.min_capacity)
    }

    /// Return a buffer for reuse
    pub fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        if buf.capacity() > self.retain_limit {
            buf.shrink_to(self.min_capacity);
        }

        let mut free = self.free.lock();
        if free.len() < self.max_pooled {
            free.push(buf);
        }
    }

    /// Number of buffers currently sitting in the free list
    pub fn pooled(&self) -> usize {
        self.free.lock().len()
    }

    /// Number of buffers allocated because the free list was empty
    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }

    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY, 1024)
    }
}
