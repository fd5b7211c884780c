//! Shared-ownership lock wrapper used for the world store and scheduler records.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that can be shared
/// across threads. It uses an `Arc<RwLock<T>>` internally to manage concurrent access.
/// Many workers may read at once; writers get exclusive access.
///
/// A lock poisoned by a panicking holder is recovered instead of propagating the panic,
/// so a single failed worker cannot wedge every other thread touching the resource.
///
/// # Examples
///
/// ```
/// use std::thread;
/// use voxel_streamer::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let counter_clone = counter.clone();
///
/// let handle = thread::spawn(move || {
///     *counter_clone.get_mut() += 1;
/// });
///
/// handle.join().unwrap();
/// assert_eq!(*counter.get(), 1);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard that allows reading the contained value.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a mutable guard that allows modifying the contained value.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<T: Send + Sync + Default> Default for MtResource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_the_same_value() {
        let resource = MtResource::new(Vec::<u32>::new());
        let other = resource.clone();
        other.get_mut().push(7);
        assert_eq!(*resource.get(), vec![7]);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let resource = MtResource::new(1u32);
        let poisoner = resource.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.get_mut();
            panic!("poison the lock");
        })
        .join();

        *resource.get_mut() += 1;
        assert_eq!(*resource.get(), 2);
    }
}
