//! Error types for plan construction and resolution.
//!
//! Validation errors describe a broken declaration and poison the type's
//! plan for good. A missing dependency only fails the one resolution in
//! progress. Every message names the types involved and ends with a hint.

use std::fmt;

use crate::key::DependencyKey;
use crate::member::Visibility;

/// Main error type for all Wirebox operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WireboxError {
    /// An injectable property has a set accessor broader than private.
    #[error("{}", .0)]
    SetterVisibility(SetterVisibilityError),

    /// An injectable property has no set accessor at all.
    #[error("{}", .0)]
    MissingSetter(MissingSetterError),

    /// One declaring level declared the same slot name twice.
    #[error("{}", .0)]
    DuplicateMember(DuplicateMemberError),

    /// A required slot found nothing anywhere in the store chain.
    #[error("{}", .0)]
    MissingDependency(MissingDependencyError),

    /// A slot writer was handed a target or value of the wrong type.
    #[error("Slot `{member}` on {consumer} was handed something other than a {expected}")]
    SlotTypeMismatch {
        consumer: DependencyKey,
        member: &'static str,
        expected: DependencyKey,
    },

    /// A background resolution task died before returning.
    #[cfg(feature = "async")]
    #[error("Background resolution of {consumer} did not complete: {reason}")]
    Interrupted {
        consumer: DependencyKey,
        reason: String,
    },
}

impl WireboxError {
    /// `true` for errors raised while building a plan.
    ///
    /// These repeat for every instance of the type until the declaration
    /// is fixed.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WireboxError::SetterVisibility(_)
                | WireboxError::MissingSetter(_)
                | WireboxError::DuplicateMember(_)
        )
    }
}

/// An injectable property's setter is visible outside its declaring type.
#[derive(Debug, Clone)]
pub struct SetterVisibilityError {
    pub declaring_type: DependencyKey,
    pub member: &'static str,
    pub visibility: Visibility,
}

impl fmt::Display for SetterVisibilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Injectable property `{}` on {} has a {} setter",
            self.member, self.declaring_type, self.visibility,
        )?;
        write!(f, "\n  Injected slots must not be writable from outside their declaring type")?;
        write!(f, "\n  Hint: make the set accessor private")
    }
}

/// An injectable property cannot be written at all.
#[derive(Debug, Clone)]
pub struct MissingSetterError {
    pub declaring_type: DependencyKey,
    pub member: &'static str,
}

impl fmt::Display for MissingSetterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Injectable property `{}` on {} has no setter",
            self.member, self.declaring_type,
        )?;
        write!(f, "\n  Hint: add a private set accessor")
    }
}

#[derive(Debug, Clone)]
pub struct DuplicateMemberError {
    pub declaring_type: DependencyKey,
    pub member: &'static str,
}

impl fmt::Display for DuplicateMemberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Slot `{}` is declared more than once on {}",
            self.member, self.declaring_type,
        )?;
        write!(f, "\n  Hint: each slot may be declared once per level")
    }
}

/// A required slot could not be filled.
///
/// Includes cached types with similar names as "did you mean?" suggestions.
#[derive(Debug, Clone)]
pub struct MissingDependencyError {
    /// The type the slot is looked up by
    pub requested: DependencyKey,
    /// The object being resolved
    pub consumer: DependencyKey,
    /// The slot's name
    pub member: &'static str,
    /// The level that declares the slot (may be a base of `consumer`)
    pub declared_by: DependencyKey,
    pub suggestions: Vec<String>,
}

impl fmt::Display for MissingDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency not cached: {}", self.requested)?;
        write!(f, "\n  Required by: {} (slot `{}`", self.consumer, self.member)?;
        if self.declared_by != self.consumer {
            write!(f, ", declared on {}", self.declared_by)?;
        }
        write!(f, ")")?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: cache a {} in this store or an ancestor, or mark the slot permit_missing",
            self.requested.short_name(),
        )
    }
}

/// Convenient Result type for Wirebox operations.
pub type Result<T> = std::result::Result<T, WireboxError>;
