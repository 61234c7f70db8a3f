//! Type identity for cached values and injectable slots.
//!
//! [`DependencyKey`] is what a [`DependencyStore`](crate::store::DependencyStore)
//! is indexed by and what every [`MemberDescriptor`](crate::member::MemberDescriptor)
//! looks up. It wraps a [`TypeId`] and keeps the readable type name around
//! for error messages.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies one value type.
///
/// There are no named keys: a store holds at most one value per type.
///
/// # Examples
/// ```
/// use wirebox_container::key::DependencyKey;
/// use std::sync::Arc;
///
/// let key = DependencyKey::of::<Arc<String>>();
/// assert!(key.type_name().contains("Arc"));
/// assert_ne!(key, DependencyKey::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct DependencyKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl DependencyKey {
    /// Creates a key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of this key.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full type name, as reported by [`std::any::type_name`].
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name with module paths stripped.
    pub fn short_name(&self) -> String {
        wirebox_support::rendering::shorten_type_name(self.type_name)
    }
}

// Names are not guaranteed unique, so only the TypeId takes part.
impl PartialEq for DependencyKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for DependencyKey {}

impl Hash for DependencyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DependencyKey({})", self.type_name)
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Renderer;

    #[test]
    fn key_of_type() {
        let key = DependencyKey::of::<Renderer>();
        assert!(key.type_name().contains("Renderer"));
        assert_eq!(key.short_name(), "Renderer");
    }

    #[test]
    fn optional_wrapper_is_its_own_identity() {
        assert_ne!(DependencyKey::of::<Option<i32>>(), DependencyKey::of::<i32>());
        assert_eq!(DependencyKey::of::<Option<i32>>(), DependencyKey::of::<Option<i32>>());
    }

    #[test]
    fn shared_handle_differs_from_pointee() {
        assert_ne!(DependencyKey::of::<Arc<Renderer>>(), DependencyKey::of::<Renderer>());
    }

    #[test]
    fn key_in_hashmap() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(DependencyKey::of::<String>(), "string");
        map.insert(DependencyKey::of::<i32>(), "i32");
        assert_eq!(map.get(&DependencyKey::of::<String>()), Some(&"string"));
        assert_eq!(map.get(&DependencyKey::of::<bool>()), None);
    }

    #[test]
    fn trait_objects_work_as_keys() {
        trait Clock {}
        let key = DependencyKey::of::<Arc<dyn Clock>>();
        assert!(key.short_name().contains("dyn Clock"));
    }
}
