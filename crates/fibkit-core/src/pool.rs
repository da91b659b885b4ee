//! Generic, thread-safe object pool for computation state.
//!
//! `ObjectPool<T>` keeps idle instances behind a `parking_lot` mutex so
//! calculations running side by side can share it. `acquire` hands out a
//! `Pooled<T>` guard that resets the instance on checkout and returns it to
//! the pool when dropped, on every exit path including early `?` returns.

use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;
use tracing::trace;

use crate::constants::MAX_POOLED_BIT_LEN;

/// State that can live in an [`ObjectPool`].
///
/// `Default` builds a new instance on a pool miss and must produce the same
/// baseline that `reset` restores.
pub trait Poolable: Default + Send {
    /// Restore the baseline condition before reuse.
    fn reset(&mut self);

    /// Largest bit length currently held. States above the pool's limit are
    /// dropped on release rather than pinned in memory.
    fn retained_bits(&self) -> u64 {
        0
    }
}

/// A thread-safe object pool backed by a `Mutex<Vec<T>>`.
///
/// When the pool is empty, `acquire` creates a new object via `Default`;
/// when the pool is full, `release` drops the object.
pub struct ObjectPool<T> {
    pool: Mutex<Vec<T>>,
    max_size: usize,
    max_retained_bits: u64,
}

impl<T> ObjectPool<T> {
    /// Create a new pool with the given maximum capacity.
    #[must_use]
    pub const fn new(max_size: usize) -> Self {
        Self::with_limits(max_size, MAX_POOLED_BIT_LEN)
    }

    /// Create a pool with an explicit size cap on retained states.
    #[must_use]
    pub const fn with_limits(max_size: usize, max_retained_bits: u64) -> Self {
        Self {
            pool: parking_lot::const_mutex(Vec::new()),
            max_size,
            max_retained_bits,
        }
    }

    /// Get the number of objects currently available in the pool.
    #[must_use]
    pub fn available(&self) -> usize {
        self.pool.lock().len()
    }
}

impl<T: Poolable> ObjectPool<T> {
    /// Check out a reset instance, reusing an idle one when possible.
    pub fn acquire(&self) -> Pooled<'_, T> {
        // Pop under the lock, reset outside it.
        let reused = self.pool.lock().pop();
        let item = match reused {
            Some(mut item) => {
                item.reset();
                item
            }
            None => {
                trace!(type_name = std::any::type_name::<T>(), "pool miss");
                T::default()
            }
        };
        Pooled {
            pool: self,
            item: Some(item),
        }
    }

    /// Return an object to the pool. Dropped if the pool is at capacity or
    /// the object holds more than the retained-bits limit.
    pub fn release(&self, item: T) {
        if item.retained_bits() > self.max_retained_bits {
            return;
        }
        let mut pool = self.pool.lock();
        if pool.len() < self.max_size {
            pool.push(item);
        }
    }
}

/// Exclusive handle to a pooled instance. Released on drop.
///
/// `item` is `Some` until the guard drops.
pub struct Pooled<'a, T: Poolable> {
    pool: &'a ObjectPool<T>,
    item: Option<T>,
}

impl<T: Poolable> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.item
            .as_ref()
            .unwrap_or_else(|| unreachable!("pooled item released twice"))
    }
}

impl<T: Poolable> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item
            .as_mut()
            .unwrap_or_else(|| unreachable!("pooled item released twice"))
    }
}

impl<T: Poolable> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Scratch {
        values: Vec<u64>,
        bits: u64,
    }

    impl Poolable for Scratch {
        fn reset(&mut self) {
            self.values.clear();
            self.bits = 0;
        }

        fn retained_bits(&self) -> u64 {
            self.bits
        }
    }

    #[test]
    fn pool_acquire_creates_new_when_empty() {
        let pool: ObjectPool<Scratch> = ObjectPool::new(4);
        let s = pool.acquire();
        assert!(s.values.is_empty());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn pool_guard_releases_on_drop() {
        let pool: ObjectPool<Scratch> = ObjectPool::new(4);
        {
            let mut s = pool.acquire();
            s.values.push(7);
        }
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn pool_acquire_reuses_and_resets() {
        let pool: ObjectPool<Scratch> = ObjectPool::new(4);
        pool.release(Scratch {
            values: vec![10, 20, 30],
            bits: 0,
        });
        assert_eq!(pool.available(), 1);

        let s = pool.acquire();
        assert!(s.values.is_empty());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn pool_release_respects_max_size() {
        let pool: ObjectPool<Scratch> = ObjectPool::new(2);
        pool.release(Scratch::default());
        pool.release(Scratch::default());
        pool.release(Scratch::default()); // Dropped
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn pool_drops_oversized_states() {
        let pool: ObjectPool<Scratch> = ObjectPool::with_limits(4, 100);
        pool.release(Scratch {
            values: Vec::new(),
            bits: 101,
        });
        assert_eq!(pool.available(), 0);
        pool.release(Scratch {
            values: Vec::new(),
            bits: 100,
        });
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn pool_releases_on_early_return() {
        fn failing(pool: &ObjectPool<Scratch>) -> Result<(), ()> {
            let mut s = pool.acquire();
            s.values.push(1);
            Err(())?;
            Ok(())
        }

        let pool: ObjectPool<Scratch> = ObjectPool::new(4);
        assert!(failing(&pool).is_err());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn pool_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ObjectPool<Scratch>>();
    }

    #[test]
    fn pool_multithreaded_acquire_release() {
        use std::sync::Arc;
        let pool = Arc::new(ObjectPool::<Scratch>::new(8));
        let mut handles = vec![];

        for i in 0..4 {
            let p = Arc::clone(&pool);
            handles.push(std::thread::spawn(move || {
                let mut s = p.acquire();
                assert!(s.values.is_empty(), "acquired a dirty state");
                s.values.push(i);
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        let avail = pool.available();
        assert!((1..=4).contains(&avail), "expected 1..=4, got {avail}");
    }

    #[test]
    fn warm_pool_builds_no_new_states() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static BUILT: AtomicUsize = AtomicUsize::new(0);

        struct Counted(Vec<u64>);

        impl Default for Counted {
            fn default() -> Self {
                BUILT.fetch_add(1, Ordering::SeqCst);
                Self(Vec::with_capacity(16))
            }
        }

        impl Poolable for Counted {
            fn reset(&mut self) {
                self.0.clear();
            }
        }

        let pool: ObjectPool<Counted> = ObjectPool::new(2);
        drop(pool.acquire());
        assert_eq!(BUILT.load(Ordering::SeqCst), 1);

        for i in 0..10 {
            let mut s = pool.acquire();
            assert!(s.0.is_empty());
            s.0.push(i);
        }
        assert_eq!(BUILT.load(Ordering::SeqCst), 1, "warm cycles built new states");
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn static_pool_is_const_constructible() {
        static POOL: ObjectPool<Scratch> = ObjectPool::new(1);
        drop(POOL.acquire());
        assert_eq!(POOL.available(), 1);
    }
}
