//! Reusable query result buffers.
//!
//! A buffer is checked out with [`BufferPool::acquire`] and handed back when the returned
//! [`PooledBuffer`] is dropped, so every exit path of the caller releases it.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Idle buffers kept around by default.
pub const DEFAULT_MAX_IDLE: usize = 8;

pub struct BufferPool<T> {
    idle: Mutex<Vec<Vec<T>>>,
    max_idle: usize,
    outstanding: AtomicUsize,
}

impl<T> BufferPool<T> {
    #[must_use]
    pub fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
            outstanding: AtomicUsize::new(0),
        }
    }

    /// Checks out an empty buffer, reusing an idle one when available.
    pub fn acquire(&self) -> PooledBuffer<'_, T> {
        let buf = self
            .idle
            .lock()
            .ok()
            .and_then(|mut idle| idle.pop())
            .unwrap_or_default();
        self.outstanding.fetch_add(1, Ordering::Relaxed);
        PooledBuffer {
            pool: self,
            buf,
        }
    }

    /// Buffers currently checked out.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Relaxed)
    }

    /// Buffers waiting for reuse.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.idle.lock().map_or(0, |idle| idle.len())
    }

    fn release(&self, mut buf: Vec<T>) {
        buf.clear();
        self.outstanding.fetch_sub(1, Ordering::Relaxed);
        if let Ok(mut idle) = self.idle.lock() {
            if idle.len() < self.max_idle {
                idle.push(buf);
            }
        }
    }
}

impl<T> Default for BufferPool<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE)
    }
}

/// A checked-out buffer. Returns itself to the pool on drop.
pub struct PooledBuffer<'a, T> {
    pool: &'a BufferPool<T>,
    buf: Vec<T>,
}

impl<T> Deref for PooledBuffer<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.buf
    }
}

impl<T> DerefMut for PooledBuffer<'_, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.buf
    }
}

impl<T> Drop for PooledBuffer<'_, T> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
