//! Dependency stores: typed, hierarchical caches of shared values.
//!
//! A store maps a [`DependencyKey`] to one value of that type. Lookups that
//! miss locally continue through the parent chain; a miss at the root is
//! just `None`, and the [`Injector`](crate::injector::Injector) decides
//! whether that is an error.
//!
//! ```text
//! root store  { Arc<Clock>, Arc<Renderer> }
//!     │ derive
//!     ▼
//! child store { Arc<Clock> }   ← shadows the root's Clock, reads Renderer from root
//! ```
//!
//! Stores hold shared handles only. Services are cached as `Arc<S>` and
//! their lifetime stays with whoever created them.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::key::DependencyKey;

/// A type-erased cached value.
pub type Entry = Arc<dyn Any + Send + Sync>;

/// Local entries for a new store, collected before it is derived.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use wirebox_container::store::{DependencyStore, StoreEntries};
///
/// let root = Arc::new(DependencyStore::new());
/// root.cache(42u32);
///
/// let child = root.derive(StoreEntries::new().with(7u32));
/// assert_eq!(child.get::<u32>(), Some(7));
/// assert_eq!(root.get::<u32>(), Some(42));
/// ```
#[derive(Default, Clone)]
pub struct StoreEntries {
    map: HashMap<DependencyKey, Entry>,
}

impl StoreEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under its own type. Replaces an earlier value of that type.
    pub fn with<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    pub fn insert<T: Clone + Send + Sync + 'static>(&mut self, value: T) {
        self.insert_entry(DependencyKey::of::<T>(), Arc::new(value));
    }

    pub(crate) fn insert_entry(&mut self, key: DependencyKey, entry: Entry) {
        self.map.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for StoreEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.map.keys()).finish()
    }
}

/// A typed cache with parent-chain fallback.
///
/// Built, then frozen, then shared: [`cache`](Self::cache) takes `&self` so a
/// store already behind an `Arc` can still be filled, but values added while
/// resolutions are reading the store may or may not be seen by them.
pub struct DependencyStore {
    entries: RwLock<HashMap<DependencyKey, Entry>>,
    parent: Option<Arc<DependencyStore>>,
}

impl DependencyStore {
    /// Creates an empty root store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            parent: None,
        }
    }

    /// Caches `instance` under its own type `T`.
    ///
    /// Caching a second value of the same type replaces the first.
    /// Cache shared services as `Arc<S>` (or `Arc<dyn Trait>`); the store
    /// clones the handle into each slot it fills.
    pub fn cache<T: Clone + Send + Sync + 'static>(&self, instance: T) {
        self.cache_entry(DependencyKey::of::<T>(), Arc::new(instance));
    }

    pub(crate) fn cache_entry(&self, key: DependencyKey, entry: Entry) {
        let replaced = self.entries.write().insert(key, entry).is_some();
        debug!(key = %key, replaced, "Cached value");
    }

    /// Looks `T` up in this store, then its ancestors.
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.get_entry(&DependencyKey::of::<T>())
            .and_then(|entry| entry.downcast_ref::<T>().cloned())
    }

    /// Type-erased lookup through the parent chain.
    pub fn get_entry(&self, key: &DependencyKey) -> Option<Entry> {
        let mut store = self;
        let mut depth = 0usize;
        loop {
            if let Some(entry) = store.entries.read().get(key) {
                trace!(key = %key, depth, "Store hit");
                return Some(Arc::clone(entry));
            }
            match &store.parent {
                Some(parent) => {
                    store = parent;
                    depth += 1;
                }
                None => {
                    trace!(key = %key, "Store miss");
                    return None;
                }
            }
        }
    }

    /// Returns `true` if `T` is cached in this store itself, ignoring ancestors.
    pub fn contains_local<T: 'static>(&self) -> bool {
        self.entries.read().contains_key(&DependencyKey::of::<T>())
    }

    /// Returns `true` if `T` can be found anywhere in the chain.
    pub fn contains<T: 'static>(&self) -> bool {
        self.get_entry(&DependencyKey::of::<T>()).is_some()
    }

    /// Every type visible from this store, nearest first, without duplicates.
    pub fn known_types(&self) -> Vec<DependencyKey> {
        let mut keys: Vec<DependencyKey> = Vec::new();
        let mut store = Some(self);
        while let Some(current) = store {
            for key in current.entries.read().keys() {
                if !keys.contains(key) {
                    keys.push(*key);
                }
            }
            store = current.parent.as_deref();
        }
        keys
    }

    /// Number of values cached locally.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn parent(&self) -> Option<&Arc<DependencyStore>> {
        self.parent.as_ref()
    }

    /// Number of ancestors above this store (0 for a root).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut store = self;
        while let Some(parent) = &store.parent {
            depth += 1;
            store = parent;
        }
        depth
    }

    /// Creates a child store holding `entries`, with `self` as its parent.
    ///
    /// `self` is left untouched; the child may shadow any of its types.
    pub fn derive(self: &Arc<Self>, entries: StoreEntries) -> DependencyStore {
        debug!(
            local = entries.len(),
            depth = self.depth() + 1,
            "Derived store"
        );
        DependencyStore {
            entries: RwLock::new(entries.map),
            parent: Some(Arc::clone(self)),
        }
    }

    /// Creates an empty child store.
    pub fn child(self: &Arc<Self>) -> DependencyStore {
        self.derive(StoreEntries::new())
    }
}

impl Default for DependencyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DependencyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyStore")
            .field("cached", &self.len())
            .field("depth", &self.depth())
            .finish()
    }
}
