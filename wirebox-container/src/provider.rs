//! Providers and store composition.
//!
//! A [`Provider`] is an object that publishes some of its own values to
//! the objects below it. [`compose`] collects those contributions into a
//! new store derived from a base store, leaving the base untouched.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use wirebox_container::prelude::*;
//!
//! struct Theme;
//!
//! struct Screen {
//!     theme: Arc<Theme>,
//!     scale: Option<f32>,
//! }
//!
//! impl Provider for Screen {
//!     fn register(&self, registry: &mut dyn ProviderRegistry) {
//!         registry.cache(Arc::clone(&self.theme));
//!         registry.cache(self.scale);
//!     }
//! }
//!
//! let base = Arc::new(DependencyStore::new());
//! let screen = Screen { theme: Arc::new(Theme), scale: None };
//!
//! let composed = compose(&screen, &base);
//! assert!(composed.contains::<Arc<Theme>>());
//! assert_eq!(composed.get::<Option<f32>>(), Some(None));
//! assert!(!base.contains::<Arc<Theme>>());
//! ```

use std::any::type_name;
use std::sync::Arc;

use tracing::debug;

use crate::key::DependencyKey;
use crate::store::{DependencyStore, Entry, StoreEntries};

/// An object that contributes values to the stores of its descendants.
///
/// Derive it with `#[derive(Provider)]` and mark contributed fields
/// `#[cached]`, or implement it by hand.
pub trait Provider: Send + Sync {
    /// Publishes this object's contributions into `registry`.
    ///
    /// Called once per [`compose`].
    fn register(&self, registry: &mut dyn ProviderRegistry);

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

/// Where a [`Provider`] publishes its contributions.
///
/// Use the typed [`cache`](trait.ProviderRegistry.html#method.cache) helper;
/// each value is keyed by its declared type, wrapper types included.
pub trait ProviderRegistry {
    fn cache_entry(&mut self, key: DependencyKey, value: Entry);
}

impl dyn ProviderRegistry + '_ {
    /// Contributes `value` under its own type `T`.
    pub fn cache<T: Clone + Send + Sync + 'static>(&mut self, value: T) {
        self.cache_entry(DependencyKey::of::<T>(), Arc::new(value));
    }
}

impl ProviderRegistry for StoreEntries {
    fn cache_entry(&mut self, key: DependencyKey, value: Entry) {
        self.insert_entry(key, value);
    }
}

/// Derives a store from `base` holding everything `provider` contributes.
///
/// `base` is never mutated: contributions are visible through the returned
/// store only.
pub fn compose(provider: &(impl Provider + ?Sized), base: &Arc<DependencyStore>) -> DependencyStore {
    let mut entries = StoreEntries::new();
    provider.register(&mut entries);

    debug!(
        provider = provider.name(),
        contributed = entries.len(),
        "Composed provider store"
    );
    base.derive(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Theme {
        accent: u32,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Bounds {
        width: u32,
        height: u32,
    }

    struct Panel {
        theme: Arc<Theme>,
        bounds: Bounds,
        layer: Option<i32>,
    }

    impl Provider for Panel {
        fn register(&self, registry: &mut dyn ProviderRegistry) {
            registry.cache(Arc::clone(&self.theme));
            registry.cache(self.bounds);
            registry.cache(self.layer);
        }
    }

    fn panel(layer: Option<i32>) -> Panel {
        Panel {
            theme: Arc::new(Theme { accent: 0xff00ff }),
            bounds: Bounds { width: 640, height: 480 },
            layer,
        }
    }

    #[test]
    fn contributions_visible_in_composed_store() {
        let base = Arc::new(DependencyStore::new());
        let panel = panel(Some(3));
        let composed = compose(&panel, &base);

        assert!(Arc::ptr_eq(&composed.get::<Arc<Theme>>().unwrap(), &panel.theme));
        assert_eq!(composed.get::<Bounds>(), Some(Bounds { width: 640, height: 480 }));
        assert_eq!(composed.get::<Option<i32>>(), Some(Some(3)));
        assert_eq!(composed.len(), 3);
    }

    #[test]
    fn absent_optional_is_still_contributed() {
        let base = Arc::new(DependencyStore::new());
        let composed = compose(&panel(None), &base);
        assert_eq!(composed.get::<Option<i32>>(), Some(None));
        assert_eq!(composed.get::<i32>(), None);
    }

    #[test]
    fn base_never_mutated() {
        let base = Arc::new(DependencyStore::new());
        base.cache(Bounds { width: 1, height: 1 });

        let composed = compose(&panel(Some(1)), &base);

        assert!(!base.contains::<Arc<Theme>>());
        assert!(!base.contains::<Option<i32>>());
        assert_eq!(base.get::<Bounds>(), Some(Bounds { width: 1, height: 1 }));
        assert_eq!(base.len(), 1);
        assert_eq!(composed.get::<Bounds>().map(|b| b.width), Some(640));
    }

    #[test]
    fn composed_store_falls_back_to_base() {
        let base = Arc::new(DependencyStore::new());
        base.cache(String::from("config"));
        let composed = compose(&panel(None), &base);

        assert_eq!(composed.get::<String>().as_deref(), Some("config"));
        assert_eq!(composed.depth(), 1);
        assert_eq!(composed.get::<Arc<Theme>>().unwrap().accent, 0xff00ff);
    }

    #[test]
    fn provider_has_name() {
        assert!(panel(None).name().contains("Panel"));
    }
}
