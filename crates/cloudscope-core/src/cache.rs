use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use tokio::sync::Mutex;

/// Whether a lookup was served from the cache or had to run the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Populated,
}

/// Lazily-populated map with single-flight population semantics.
///
/// One lock guards both the existence check and the population of a key, so
/// concurrent lookups of the same key run the resolver at most once; later
/// callers observe the stored value. A failed resolver stores nothing, and the
/// next lookup retries. Entries live for the lifetime of the cache.
pub struct KeyedCache<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, running `resolve` to populate it
    /// on a miss. The cache lock is held across the resolver call.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: K,
        resolve: F,
    ) -> std::result::Result<(V, CacheOutcome), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        let mut entries = self.entries.lock().await;
        if let Some(value) = entries.get(&key) {
            return Ok((value.clone(), CacheOutcome::Hit));
        }

        let value = resolve().await?;
        entries.insert(key, value.clone());
        Ok((value, CacheOutcome::Populated))
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
