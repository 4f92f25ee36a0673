use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased handle to a vendor service client.
///
/// Client factories build concrete SDK clients; the cache and dispatch layers
/// only move the handle around. Sources downcast back to the concrete type
/// they were built for.
#[derive(Clone)]
pub struct ServiceClient {
    inner: Arc<dyn Any + Send + Sync>,
}

impl ServiceClient {
    pub fn new<T: Any + Send + Sync>(client: T) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient").finish_non_exhaustive()
    }
}
