//! Layered key/value context with parent fallback.
//!
//! Contexts form a tree: the runner context is the root, each flow
//! execution gets a child of it, and each process execution gets a child of
//! the flow context. Lookups walk towards the root; writes always land in the
//! layer they are made on.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{FlowError, Result};

/// A type-erased value stored in a [`Context`].
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// One layer of configuration and shared objects.
///
/// # Example
///
/// ```
/// use procflow::context::Context;
///
/// let runner = Context::root("runner");
/// runner.put("region", "eu-west".to_string());
///
/// let flow = runner.child("flow");
/// flow.put("batch_size", 500usize);
///
/// assert_eq!(flow.get::<String>("region").as_deref().map(String::as_str), Some("eu-west"));
/// assert_eq!(flow.get::<usize>("batch_size").as_deref(), Some(&500));
/// assert!(runner.get::<usize>("batch_size").is_none());
/// ```
pub struct Context {
    /// Layer name, for debugging.
    name: String,
    values: RwLock<HashMap<String, ContextValue>>,
    parent: Option<Arc<Context>>,
}

impl Context {
    /// Create a root context with no parent.
    pub fn root(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            values: RwLock::new(HashMap::new()),
            parent: None,
        })
    }

    /// Create an empty layer whose lookups fall back to `self`.
    pub fn child(self: &Arc<Self>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            values: RwLock::new(HashMap::new()),
            parent: Some(Arc::clone(self)),
        })
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The layer this one falls back to.
    pub fn parent(&self) -> Option<&Arc<Context>> {
        self.parent.as_ref()
    }

    /// Number of ancestors above this layer (0 for a root).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut layer = self.parent.as_deref();
        while let Some(ctx) = layer {
            depth += 1;
            layer = ctx.parent.as_deref();
        }
        depth
    }

    /// Store a value in this layer, replacing any local value under `key`.
    ///
    /// Returns `self` so configuration can be chained.
    pub fn put<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) -> &Self {
        self.put_value(key, Arc::new(value))
    }

    /// Store an already type-erased value in this layer.
    pub fn put_value(&self, key: impl Into<String>, value: ContextValue) -> &Self {
        self.write().insert(key.into(), value);
        self
    }

    /// Look up a raw value, walking up the parent chain on a miss.
    pub fn get_value(&self, key: &str) -> Option<ContextValue> {
        let mut layer = Some(self);
        while let Some(ctx) = layer {
            if let Some(value) = ctx.read().get(key) {
                return Some(Arc::clone(value));
            }
            layer = ctx.parent.as_deref();
        }
        None
    }

    /// Look up a value of type `T`.
    ///
    /// Returns `None` when the key is absent or holds another type.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get_value(key)?.downcast::<T>().ok()
    }

    /// Like [`get`](Self::get), but says why the lookup failed.
    pub fn require<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        let value = self.get_value(key).ok_or_else(|| FlowError::MissingKey {
            key: key.to_string(),
        })?;
        value.downcast::<T>().map_err(|_| FlowError::TypeMismatch {
            key: key.to_string(),
            expected: type_name::<T>().to_string(),
        })
    }

    /// Store a singleton keyed by its type rather than by name.
    pub fn put_typed<T: Any + Send + Sync>(&self, value: T) -> &Self {
        self.put(type_name::<T>(), value)
    }

    /// Look up a singleton stored with [`put_typed`](Self::put_typed).
    pub fn get_typed<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.get(type_name::<T>())
    }

    /// Look up a runner setting loaded from configuration.
    pub fn setting(&self, key: &str) -> Option<serde_yaml::Value> {
        self.get::<serde_yaml::Value>(key).map(|v| (*v).clone())
    }

    /// Check whether any layer from here to the root has `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    /// Check whether this layer itself has `key`.
    pub fn contains_local(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Name of the nearest layer holding `key`.
    pub fn source_of(&self, key: &str) -> Option<&str> {
        let mut layer = Some(self);
        while let Some(ctx) = layer {
            if ctx.contains_local(key) {
                return Some(&ctx.name);
            }
            layer = ctx.parent.as_deref();
        }
        None
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ContextValue>> {
        self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ContextValue>> {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort();
        f.debug_struct("Context")
            .field("name", &self.name)
            .field("keys", &keys)
            .field("parent", &self.parent.as_ref().map(|p| p.name.clone()))
            .finish()
    }
}
