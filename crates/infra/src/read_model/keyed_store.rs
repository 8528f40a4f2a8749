use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use stockline_inventory::RepositoryError;

/// Key/value store abstraction for inventory records and the stock status index.
///
/// Reads degrade to `None`/empty when the store is unusable; writes report it.
pub trait KeyedStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn upsert(&self, key: K, value: V) -> Result<(), RepositoryError>;
    /// Upsert unless `conflict` reports an error for some stored value; the
    /// scan and the write happen under one write lock.
    fn upsert_checked(
        &self,
        key: K,
        value: V,
        conflict: &dyn Fn(&V) -> Option<RepositoryError>,
    ) -> Result<(), RepositoryError>;
    /// Upsert every entry under one write lock.
    fn upsert_many(&self, entries: Vec<(K, V)>) -> Result<(), RepositoryError>;
    /// All values, ordered by key.
    fn list(&self) -> Vec<V>;
    /// Remove everything (rebuild support).
    fn clear(&self) -> Result<(), RepositoryError>;
}

impl<K, V, S> KeyedStore<K, V> for Arc<S>
where
    S: KeyedStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) -> Result<(), RepositoryError> {
        (**self).upsert(key, value)
    }

    fn upsert_checked(
        &self,
        key: K,
        value: V,
        conflict: &dyn Fn(&V) -> Option<RepositoryError>,
    ) -> Result<(), RepositoryError> {
        (**self).upsert_checked(key, value, conflict)
    }

    fn upsert_many(&self, entries: Vec<(K, V)>) -> Result<(), RepositoryError> {
        (**self).upsert_many(entries)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        (**self).clear()
    }
}

/// In-memory ordered store for tests/dev.
#[derive(Debug)]
pub struct InMemoryKeyedStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
}

impl<K, V> InMemoryKeyedStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryKeyedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".to_string())
}

impl<K, V> KeyedStore<K, V> for InMemoryKeyedStore<K, V>
where
    K: Clone + Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn upsert(&self, key: K, value: V) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(key, value);
        Ok(())
    }

    fn upsert_checked(
        &self,
        key: K,
        value: V,
        conflict: &dyn Fn(&V) -> Option<RepositoryError>,
    ) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if let Some(err) = map.values().find_map(conflict) {
            return Err(err);
        }
        map.insert(key, value);
        Ok(())
    }

    fn upsert_many(&self, entries: Vec<(K, V)>) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.extend(entries);
        Ok(())
    }

    fn list(&self) -> Vec<V> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_existing_key() {
        let store: InMemoryKeyedStore<u32, &str> = InMemoryKeyedStore::new();
        store.upsert(1, "a").unwrap();
        store.upsert(1, "b").unwrap();
        assert_eq!(store.get(&1), Some("b"));
        assert_eq!(store.list(), vec!["b"]);
    }

    #[test]
    fn upsert_checked_rejects_without_writing() {
        let store: InMemoryKeyedStore<u32, u32> = InMemoryKeyedStore::new();
        store.upsert(1, 7).unwrap();

        let taken = |v: &u32| (*v == 7).then(|| RepositoryError::Conflict("7 is taken".into()));
        let err = store.upsert_checked(2, 7, &taken).unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.get(&2), None);

        store.upsert_checked(2, 8, &taken).unwrap();
        assert_eq!(store.list(), vec![7, 8]);
    }

    #[test]
    fn list_is_ordered_by_key() {
        let store: InMemoryKeyedStore<u32, u32> = InMemoryKeyedStore::new();
        store.upsert_many(vec![(3, 30), (1, 10), (2, 20)]).unwrap();
        assert_eq!(store.list(), vec![10, 20, 30]);
    }

    #[test]
    fn clear_removes_everything() {
        let store: InMemoryKeyedStore<u32, u32> = InMemoryKeyedStore::new();
        store.upsert(1, 1).unwrap();
        store.clear().unwrap();
        assert!(store.list().is_empty());
        assert_eq!(store.get(&1), None);
    }
}
