//! # Generic In-Memory Store
//!
//! Thread-safe, cloneable key-value store backing every record family.
//!
//! All operations are synchronous (the lock is `parking_lot`, not
//! `tokio::sync`) because the lock is never held across `.await`.
//! `parking_lot::RwLock` is non-poisonable: a panicking writer does not
//! permanently wedge the store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records, in no particular order.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Records matching `predicate`, in no particular order.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.data
            .read()
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect()
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure may inspect the current state, validate preconditions,
    /// mutate the record, and return `Ok(R)` or `Err(E)`; it runs under a
    /// single write lock. Returns `None` if the record doesn't exist.
    pub fn try_update<R, E>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Run `f` with exclusive access to the whole map.
    ///
    /// Used for multi-record writes that must land together.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut HashMap<Uuid, T>) -> R) -> R {
        f(&mut self.data.write())
    }

    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Remove every record matching `predicate`, returning how many were removed.
    pub fn remove_where(&self, predicate: impl Fn(&T) -> bool) -> usize {
        let mut guard = self.data.write();
        let before = guard.len();
        guard.retain(|_, v| !predicate(v));
        before - guard.len()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let store: Store<String> = Store::new();
        let id = Uuid::new_v4();
        assert!(store.insert(id, "a".to_string()).is_none());
        assert_eq!(store.get(&id).as_deref(), Some("a"));
        assert!(store.contains(&id));
        assert_eq!(store.remove(&id).as_deref(), Some("a"));
        assert!(store.is_empty());
    }

    #[test]
    fn clones_share_data() {
        let store: Store<i32> = Store::new();
        let other = store.clone();
        store.insert(Uuid::new_v4(), 1);
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn try_update_runs_under_lock_and_reports_missing() {
        let store: Store<i32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 1);
        let result: Option<Result<i32, &str>> = store.try_update(&id, |v| {
            *v += 1;
            Ok(*v)
        });
        assert_eq!(result, Some(Ok(2)));
        let rejected: Option<Result<(), &str>> = store.try_update(&id, |_| Err("no"));
        assert_eq!(rejected, Some(Err("no")));
        assert_eq!(store.get(&id), Some(2));
        assert!(store
            .try_update::<(), ()>(&Uuid::new_v4(), |_| Ok(()))
            .is_none());
    }

    #[test]
    fn filter_and_remove_where() {
        let store: Store<i32> = Store::new();
        for n in 0..10 {
            store.insert(Uuid::new_v4(), n);
        }
        assert_eq!(store.filter(|n| n % 2 == 0).len(), 5);
        assert_eq!(store.remove_where(|n| *n < 3), 3);
        assert_eq!(store.len(), 7);
    }
}
