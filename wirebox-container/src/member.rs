//! Static metadata for one injectable slot.
//!
//! A [`MemberDescriptor`] is produced once per declared slot while a plan is
//! built and never changes afterwards. It says where the slot lives
//! (which declaring level, field or accessor-backed property), what it is
//! looked up by, and how absence is treated.

use std::fmt;

use crate::key::DependencyKey;

/// Declared visibility of a property's set accessor.
///
/// Only [`Visibility::Private`] is accepted for injectable properties:
/// the resolver must be able to write the slot without the slot being
/// writable by arbitrary callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Internal => write!(f, "internal"),
            Visibility::ProtectedInternal => write!(f, "protected internal"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// How a slot is stored on its declaring type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Plain field. Always assignable, whatever its visibility.
    Field,
    /// Accessor-backed slot. `setter` is `None` when no set accessor exists.
    Property { setter: Option<Visibility> },
}

impl StorageKind {
    #[inline]
    pub fn is_property(&self) -> bool {
        matches!(self, StorageKind::Property { .. })
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Field => write!(f, "field"),
            StorageKind::Property { setter: Some(vis) } => write!(f, "property ({vis} set)"),
            StorageKind::Property { setter: None } => write!(f, "property (no set)"),
        }
    }
}

/// Metadata for one injectable slot.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    pub(crate) name: &'static str,
    pub(crate) declaring_type: DependencyKey,
    pub(crate) storage: StorageKind,
    pub(crate) value_type: DependencyKey,
    pub(crate) nullable: bool,
    pub(crate) permit_missing: bool,
}

impl MemberDescriptor {
    pub(crate) fn new(
        name: &'static str,
        declaring_type: DependencyKey,
        value_type: DependencyKey,
        nullable: bool,
    ) -> Self {
        Self {
            name,
            declaring_type,
            storage: StorageKind::Field,
            value_type,
            nullable,
            permit_missing: false,
        }
    }

    /// Slot name as written on the declaring type.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type level that declares this slot.
    #[inline]
    pub fn declaring_type(&self) -> DependencyKey {
        self.declaring_type
    }

    #[inline]
    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// The type this slot is looked up by in a store.
    #[inline]
    pub fn value_type(&self) -> DependencyKey {
        self.value_type
    }

    /// `true` for shared-reference and `Option` slots, whose default is
    /// "absent", and for any slot marked `permit_missing`.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// `true` when a store miss assigns the default instead of failing.
    #[inline]
    pub fn permit_missing(&self) -> bool {
        self.permit_missing
    }
}

/// Handle returned by [`PlanBuilder`](crate::plan::PlanBuilder) declarations
/// for adjusting the slot just declared.
///
/// ```rust,ignore
/// plan.value::<Scale>("scale", |this| &mut this.scale)
///     .permit_missing()
///     .property(Some(Visibility::Private));
/// ```
pub struct MemberDecl<'a> {
    pub(crate) descriptor: &'a mut MemberDescriptor,
}

impl MemberDecl<'_> {
    /// Let resolution fall back to the slot's default when nothing is cached.
    ///
    /// The slot counts as nullable from then on, plain values included.
    pub fn permit_missing(self) -> Self {
        self.descriptor.permit_missing = true;
        self.descriptor.nullable = true;
        self
    }

    /// Mark the slot as accessor-backed with the given set accessor.
    pub fn property(self, setter: Option<Visibility>) -> Self {
        self.descriptor.storage = StorageKind::Property { setter };
        self
    }
}
