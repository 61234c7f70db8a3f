//! Plan validation.
//!
//! Checks every declared slot once, while its plan is being built and
//! before any instance is resolved:
//! - Properties must have a set accessor
//! - That accessor must be private to the declaring type
//! - A declaring level may not declare the same slot name twice
//!
//! Fields are never rejected, whatever their visibility.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{
    DuplicateMemberError, MissingSetterError, SetterVisibilityError, WireboxError,
};
use crate::key::DependencyKey;
use crate::member::{MemberDescriptor, StorageKind, Visibility};

/// Validates the slots of one plan.
///
/// The first offending slot, in plan order, decides the error.
pub(crate) struct PlanValidator {
    consumer: DependencyKey,
    /// (declaring level, slot name) pairs seen so far
    seen: HashSet<(DependencyKey, &'static str)>,
}

impl PlanValidator {
    pub fn new(consumer: DependencyKey) -> Self {
        Self {
            consumer,
            seen: HashSet::new(),
        }
    }

    /// Validates all `members`.
    ///
    /// # Errors
    /// - [`WireboxError::MissingSetter`] — property without a setter
    /// - [`WireboxError::SetterVisibility`] — setter broader than private
    /// - [`WireboxError::DuplicateMember`] — slot declared twice on one level
    pub fn validate<'a>(
        &mut self,
        members: impl IntoIterator<Item = &'a MemberDescriptor>,
    ) -> Result<(), WireboxError> {
        let mut checked = 0usize;
        for member in members {
            self.validate_member(member)?;
            checked += 1;
        }

        debug!(consumer = %self.consumer, checked, "Plan validation passed");
        Ok(())
    }

    fn validate_member(&mut self, member: &MemberDescriptor) -> Result<(), WireboxError> {
        if !self.seen.insert((member.declaring_type(), member.name())) {
            warn!(
                consumer = %self.consumer,
                member = member.name(),
                "Slot declared twice on one level"
            );
            return Err(WireboxError::DuplicateMember(DuplicateMemberError {
                declaring_type: member.declaring_type(),
                member: member.name(),
            }));
        }

        match member.storage() {
            StorageKind::Field => Ok(()),
            StorageKind::Property { setter: Some(Visibility::Private) } => Ok(()),
            StorageKind::Property { setter: None } => {
                warn!(
                    consumer = %self.consumer,
                    member = member.name(),
                    "Injectable property has no setter"
                );
                Err(WireboxError::MissingSetter(MissingSetterError {
                    declaring_type: member.declaring_type(),
                    member: member.name(),
                }))
            }
            StorageKind::Property { setter: Some(visibility) } => {
                warn!(
                    consumer = %self.consumer,
                    member = member.name(),
                    %visibility,
                    "Injectable property setter is not private"
                );
                Err(WireboxError::SetterVisibility(SetterVisibilityError {
                    declaring_type: member.declaring_type(),
                    member: member.name(),
                    visibility,
                }))
            }
        }
    }
}
