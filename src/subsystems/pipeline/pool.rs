//! Fixed-capacity buffer pool
//!
//! `N` slots of `SIZE` bytes, allocated at build time. A slot is owned by
//! exactly one [`PoolBuffer`] at a time and returns to the free list when
//! that buffer is dropped, so every path that lets go of a buffer (sent,
//! failed, discarded) gives the slot back. `acquire` waits while every
//! slot is out.
//!
//! Slots are handed out first from a never-used range (tracked by an
//! atomic counter, so `new` stays `const`), then from the free list.

use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicUsize, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::{Mutex, MutexGuard};

/// Buffer pool
pub struct BufferPool<M: RawMutex, const N: usize, const SIZE: usize> {
    slots: [Mutex<M, [u8; SIZE]>; N],
    free: Channel<M, usize, N>,
    fresh: AtomicUsize,
}

impl<M: RawMutex, const N: usize, const SIZE: usize> BufferPool<M, N, SIZE> {
    #[allow(clippy::declare_interior_mutable_const)]
    const SLOT: Mutex<M, [u8; SIZE]> = Mutex::new([0u8; SIZE]);

    /// Pool with every slot free
    pub const fn new() -> Self {
        Self {
            slots: [Self::SLOT; N],
            free: Channel::new(),
            fresh: AtomicUsize::new(0),
        }
    }

    /// Total number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes per slot
    pub const fn slot_size(&self) -> usize {
        SIZE
    }

    /// Slots currently free
    pub fn available(&self) -> usize {
        N - self.fresh.load(Ordering::Acquire) + self.free.len()
    }

    /// Slots currently owned by a [`PoolBuffer`]
    pub fn in_use(&self) -> usize {
        N - self.available()
    }

    fn take_fresh(&self) -> Option<usize> {
        self.fresh
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |next| {
                (next < N).then_some(next + 1)
            })
            .ok()
    }

    /// Take a slot, waiting until one is free
    pub async fn acquire(&self) -> PoolBuffer<'_, M, N, SIZE> {
        let index = match self.take_fresh() {
            Some(index) => index,
            None => self.free.receive().await,
        };
        // Only the holder of `index` locks this slot
        let data = self.slots[index].lock().await;
        PoolBuffer {
            pool: self,
            index,
            data,
        }
    }

    /// Take a slot if one is free right now
    pub fn try_acquire(&self) -> Option<PoolBuffer<'_, M, N, SIZE>> {
        let index = self
            .take_fresh()
            .or_else(|| self.free.try_receive().ok())?;
        match self.slots[index].try_lock() {
            Ok(data) => Some(PoolBuffer {
                pool: self,
                index,
                data,
            }),
            Err(_) => {
                self.release(index);
                None
            }
        }
    }

    fn release(&self, index: usize) {
        if self.free.try_send(index).is_err() {
            // Free list holds at most N indices
            crate::log_error!("Buffer pool: slot {} lost on release", index);
        }
    }
}

impl<M: RawMutex, const N: usize, const SIZE: usize> Default for BufferPool<M, N, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive handle to one pool slot
pub struct PoolBuffer<'a, M: RawMutex, const N: usize, const SIZE: usize> {
    pool: &'a BufferPool<M, N, SIZE>,
    index: usize,
    data: MutexGuard<'a, M, [u8; SIZE]>,
}

impl<M: RawMutex, const N: usize, const SIZE: usize> PoolBuffer<'_, M, N, SIZE> {
    /// Slot index within the pool
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<M: RawMutex, const N: usize, const SIZE: usize> Deref for PoolBuffer<'_, M, N, SIZE> {
    type Target = [u8; SIZE];

    fn deref(&self) -> &Self::Target {
        &*self.data
    }
}

impl<M: RawMutex, const N: usize, const SIZE: usize> DerefMut for PoolBuffer<'_, M, N, SIZE> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.data
    }
}

impl<M: RawMutex, const N: usize, const SIZE: usize> Drop for PoolBuffer<'_, M, N, SIZE> {
    fn drop(&mut self) {
        self.pool.release(self.index);
    }
}
