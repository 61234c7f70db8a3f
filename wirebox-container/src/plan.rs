//! Injection plans: the per-type list of slots to fill.
//!
//! A type opts in by implementing [`Injectable`] and declaring its slots on
//! a [`PlanBuilder`]. Base levels are folded in through a projection to the
//! embedded base value, so a base's slot and a derived slot with the same
//! name stay two separate storage locations.
//!
//! ```text
//! Injectable::declare ──> PlanBuilder<T> ──validate──> InjectionPlan
//!                              ▲                           │
//!                   base::<B>()│                    type-erased writers
//!                              │                           ▼
//!                      PlanBuilder<B>               Injector::inject
//! ```
//!
//! # Slot flavours
//! | Declared with | Field type       | Looked up by | Default on miss |
//! |---------------|------------------|--------------|-----------------|
//! | `reference`   | `Option<Arc<X>>` | `Arc<X>`     | `None`          |
//! | `optional`    | `Option<V>`      | `Option<V>`  | `None`          |
//! | `value`       | `V`              | `V`          | `V::default()`  |

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};
use wirebox_support::rendering::{SlotRow, render_levels, render_slot_table};

use crate::error::Result;
use crate::key::DependencyKey;
use crate::member::{MemberDecl, MemberDescriptor};
use crate::validate::PlanValidator;

/// A cached value as the store hands it to a slot writer.
pub(crate) type Found<'a> = Option<&'a (dyn Any + Send + Sync)>;

/// A slot writer received a target or value of an unexpected type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotMismatch;

type TypedWriter<C> =
    Arc<dyn Fn(&mut C, Found<'_>) -> std::result::Result<(), SlotMismatch> + Send + Sync>;

pub(crate) type ErasedWriter =
    Arc<dyn Fn(&mut dyn Any, Found<'_>) -> std::result::Result<(), SlotMismatch> + Send + Sync>;

fn typed_writer<C, F>(write: F) -> TypedWriter<C>
where
    F: Fn(&mut C, Found<'_>) -> std::result::Result<(), SlotMismatch> + Send + Sync + 'static,
{
    Arc::new(write)
}

fn erased_writer<F>(write: F) -> ErasedWriter
where
    F: Fn(&mut dyn Any, Found<'_>) -> std::result::Result<(), SlotMismatch> + Send + Sync + 'static,
{
    Arc::new(write)
}

/// A type whose slots are filled from a [`DependencyStore`](crate::store::DependencyStore).
///
/// Implement [`declare`](Injectable::declare) to list the slots, or derive it
/// with `#[derive(Injectable)]`. Types with nothing to inject can rely on the
/// default, which declares no slots.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use wirebox_container::prelude::*;
///
/// struct Clock;
///
/// #[derive(Default)]
/// struct Sprite {
///     clock: Option<Arc<Clock>>,
///     depth: f32,
/// }
///
/// impl Injectable for Sprite {
///     fn declare(plan: &mut PlanBuilder<Self>) {
///         plan.reference::<Clock>("clock", |this| &mut this.clock);
///         plan.value::<f32>("depth", |this| &mut this.depth).permit_missing();
///     }
/// }
///
/// let store = DependencyStore::new();
/// store.cache(Arc::new(Clock));
///
/// let mut sprite = Sprite::default();
/// resolve(&mut sprite, &store).unwrap();
/// assert!(sprite.clock.is_some());
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Declares this type's slots, including any base levels.
    fn declare(_plan: &mut PlanBuilder<Self>) {}
}

struct PlanMember<C> {
    descriptor: MemberDescriptor,
    write: TypedWriter<C>,
}

/// Collects the slots of one consumer type `C`.
pub struct PlanBuilder<C> {
    inherited: Vec<PlanMember<C>>,
    own: Vec<PlanMember<C>>,
    levels: Vec<DependencyKey>,
}

impl<C: Injectable> PlanBuilder<C> {
    fn new() -> Self {
        Self {
            inherited: Vec::new(),
            own: Vec::new(),
            levels: Vec::new(),
        }
    }

    /// Folds in the slots of a base level embedded in `C`.
    ///
    /// Base slots are always ordered before `C`'s own slots, whatever the
    /// order of the calls.
    pub fn base<B: Injectable>(&mut self, project: fn(&mut C) -> &mut B) -> &mut Self {
        let mut base = PlanBuilder::<B>::new();
        B::declare(&mut base);
        let (members, levels) = base.finish();

        for member in members {
            let write = member.write;
            self.inherited.push(PlanMember {
                descriptor: member.descriptor,
                write: typed_writer(move |target: &mut C, found| write(project(target), found)),
            });
        }
        for level in levels {
            if !self.levels.contains(&level) {
                self.levels.push(level);
            }
        }
        self
    }

    /// Declares a shared-reference slot, filled with the cached `Arc<X>`.
    pub fn reference<X>(
        &mut self,
        name: &'static str,
        slot: fn(&mut C) -> &mut Option<Arc<X>>,
    ) -> MemberDecl<'_>
    where
        X: ?Sized + Send + Sync + 'static,
    {
        self.push(
            name,
            DependencyKey::of::<Arc<X>>(),
            true,
            typed_writer(move |target: &mut C, found| {
                let value = match found {
                    Some(value) => Some(Arc::clone(
                        value.downcast_ref::<Arc<X>>().ok_or(SlotMismatch)?,
                    )),
                    None => None,
                };
                *slot(target) = value;
                Ok(())
            }),
        )
    }

    /// Declares an optional slot, filled with a cached `Option<V>`.
    ///
    /// The wrapper is part of the identity: an `Option<V>` slot never
    /// matches a cached plain `V`, and a cached `None` is a hit.
    pub fn optional<V>(
        &mut self,
        name: &'static str,
        slot: fn(&mut C) -> &mut Option<V>,
    ) -> MemberDecl<'_>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.push(
            name,
            DependencyKey::of::<Option<V>>(),
            true,
            typed_writer(move |target: &mut C, found| {
                let value = match found {
                    Some(value) => value.downcast_ref::<Option<V>>().ok_or(SlotMismatch)?.clone(),
                    None => None,
                };
                *slot(target) = value;
                Ok(())
            }),
        )
    }

    /// Declares a plain value slot, filled with a clone of the cached `V`.
    ///
    /// On a permitted miss the slot is reset to `V::default()`, overwriting
    /// whatever it held before.
    pub fn value<V>(&mut self, name: &'static str, slot: fn(&mut C) -> &mut V) -> MemberDecl<'_>
    where
        V: Clone + Default + Send + Sync + 'static,
    {
        self.push(
            name,
            DependencyKey::of::<V>(),
            false,
            typed_writer(move |target: &mut C, found| {
                let value = match found {
                    Some(value) => value.downcast_ref::<V>().ok_or(SlotMismatch)?.clone(),
                    None => V::default(),
                };
                *slot(target) = value;
                Ok(())
            }),
        )
    }

    fn push(
        &mut self,
        name: &'static str,
        value_type: DependencyKey,
        nullable: bool,
        write: TypedWriter<C>,
    ) -> MemberDecl<'_> {
        let descriptor =
            MemberDescriptor::new(name, DependencyKey::of::<C>(), value_type, nullable);
        self.own.push(PlanMember { descriptor, write });

        let index = self.own.len() - 1;
        MemberDecl {
            descriptor: &mut self.own[index].descriptor,
        }
    }

    fn finish(mut self) -> (Vec<PlanMember<C>>, Vec<DependencyKey>) {
        let own_level = DependencyKey::of::<C>();
        if !self.levels.contains(&own_level) {
            self.levels.push(own_level);
        }

        let mut members = self.inherited;
        members.append(&mut self.own);
        (members, self.levels)
    }
}

/// One slot of a built plan: its descriptor and a writer bound to the consumer type.
pub(crate) struct PlanSlot {
    pub(crate) descriptor: MemberDescriptor,
    pub(crate) write: ErasedWriter,
}

/// The validated, immutable list of slots for one consumer type.
///
/// Built once per type and shared through [`PlanCache`](crate::cache::PlanCache).
pub struct InjectionPlan {
    consumer: DependencyKey,
    levels: Vec<DependencyKey>,
    slots: Vec<PlanSlot>,
}

impl InjectionPlan {
    /// The type this plan resolves.
    #[inline]
    pub fn consumer(&self) -> DependencyKey {
        self.consumer
    }

    /// Declaring levels, base first, ending with the consumer itself.
    pub fn levels(&self) -> &[DependencyKey] {
        &self.levels
    }

    /// Slot descriptors in resolution order (base levels first).
    pub fn descriptors(&self) -> impl Iterator<Item = &MemberDescriptor> + '_ {
        self.slots.iter().map(|slot| &slot.descriptor)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn slots(&self) -> &[PlanSlot] {
        &self.slots
    }

    /// Renders the plan as a header line and one row per slot.
    pub fn render(&self) -> String {
        let names: Vec<&str> = self.levels.iter().map(|l| l.type_name()).collect();
        let rows: Vec<SlotRow> = self
            .descriptors()
            .map(|d| SlotRow {
                level: d.declaring_type().short_name(),
                name: d.name().to_string(),
                storage: d.storage().to_string(),
                value_type: d.value_type().short_name(),
                policy: if d.permit_missing() { "permit_missing" } else { "required" }.to_string(),
            })
            .collect();

        let mut out = format!(
            "{} ({} slots; levels: {})\n",
            self.consumer.short_name(),
            self.len(),
            render_levels(&names),
        );
        out.push_str(&render_slot_table(&rows));
        out
    }
}

impl fmt::Debug for InjectionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPlan")
            .field("consumer", &self.consumer)
            .field("levels", &self.levels)
            .field("slots", &self.descriptors().collect::<Vec<_>>())
            .finish()
    }
}

/// Builds and validates the plan for `T` without consulting any cache.
///
/// # Errors
/// - [`WireboxError::SetterVisibility`](crate::error::WireboxError::SetterVisibility) — a property setter broader than private
/// - [`WireboxError::MissingSetter`](crate::error::WireboxError::MissingSetter) — a property without a setter
/// - [`WireboxError::DuplicateMember`](crate::error::WireboxError::DuplicateMember) — a slot declared twice on one level
#[instrument(skip_all, name = "build_plan", fields(consumer = type_name::<T>()))]
pub fn build_plan<T: Injectable>() -> Result<InjectionPlan> {
    let mut builder = PlanBuilder::<T>::new();
    T::declare(&mut builder);
    let (members, levels) = builder.finish();

    let consumer = DependencyKey::of::<T>();
    PlanValidator::new(consumer).validate(members.iter().map(|m| &m.descriptor))?;

    let slots: Vec<PlanSlot> = members
        .into_iter()
        .map(|member| {
            let write = member.write;
            PlanSlot {
                descriptor: member.descriptor,
                write: erased_writer(move |target: &mut dyn Any, found| {
                    let target = target.downcast_mut::<T>().ok_or(SlotMismatch)?;
                    write(target, found)
                }),
            }
        })
        .collect();

    debug!(
        slots = slots.len(),
        levels = levels.len(),
        "Built injection plan"
    );

    Ok(InjectionPlan {
        consumer,
        levels,
        slots,
    })
}
