//! Opaque payload handle.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased dataset produced by one process and read by others.
///
/// Cloning a `Dataset` clones the handle, never the payload.
#[derive(Clone)]
pub struct Dataset {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Dataset {
    /// Wrap a payload.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Borrow the payload as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Whether the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Type name of the payload, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether two handles point at the same payload.
    pub fn ptr_eq(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("type", &self.type_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_to_original_type() {
        let ds = Dataset::new(vec!["a".to_string()]);
        assert_eq!(ds.downcast_ref::<Vec<String>>().map(Vec::len), Some(1));
        assert!(ds.downcast_ref::<String>().is_none());
        assert!(ds.is::<Vec<String>>());
    }

    #[test]
    fn clone_shares_payload() {
        let ds = Dataset::new(5u32);
        let copy = ds.clone();
        assert!(ds.ptr_eq(&copy));
        assert!(!ds.ptr_eq(&Dataset::new(5u32)));
    }

    #[test]
    fn debug_shows_type_name() {
        let ds = Dataset::new(1.5f64);
        assert!(format!("{:?}", ds).contains("f64"));
        assert_eq!(ds.type_name(), "f64");
    }
}
