//! # The Injector: fills consumer slots from a store
//!
//! ```text
//! InjectorBuilder ──build()──> Injector ──inject(target, store)──> slots filled
//!                                 │
//!                         PlanCache::plan_for::<T>()   (once per type)
//! ```
//!
//! For each slot of the target's plan, base levels first:
//! 1. look the slot's value type up in the store chain
//! 2. on a hit, assign the cached value
//! 3. on a miss, assign the slot's default if it permits missing values,
//!    otherwise stop with [`WireboxError::MissingDependency`]
//!
//! Slots assigned before a failure keep their new values.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use wirebox_container::prelude::*;
//!
//! struct AudioManager;
//!
//! #[derive(Default)]
//! struct Button {
//!     audio: Option<Arc<AudioManager>>,
//! }
//!
//! impl Injectable for Button {
//!     fn declare(plan: &mut PlanBuilder<Self>) {
//!         plan.reference::<AudioManager>("audio", |this| &mut this.audio);
//!     }
//! }
//!
//! let store = DependencyStore::new();
//! let mut button = Button::default();
//!
//! let injector = Injector::builder().max_suggestions(5).build();
//! assert!(injector.inject(&mut button, &store).is_err());
//!
//! store.cache(Arc::new(AudioManager));
//! injector.inject(&mut button, &store).expect("audio is cached now");
//! assert!(button.audio.is_some());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{trace, warn};
use wirebox_support::rendering::suggest_similar;

use crate::cache::PlanCache;
use crate::error::{MissingDependencyError, Result, WireboxError};
use crate::key::DependencyKey;
use crate::member::MemberDescriptor;
use crate::plan::{Injectable, InjectionPlan};
use crate::provider::{Provider, compose};
use crate::store::DependencyStore;

const DEFAULT_MAX_SUGGESTIONS: usize = 3;

static DEFAULT_INJECTOR: Lazy<Injector> = Lazy::new(Injector::new);

// ============================================================
// InjectTarget
// ============================================================

/// Object-safe view of an [`Injectable`], so heterogeneous trees
/// (`Vec<Box<dyn InjectTarget>>`) can be resolved node by node.
///
/// Implemented for every `Injectable`; there is no reason to implement it
/// by hand.
pub trait InjectTarget: Any + Send + Sync {
    /// Fetches (or builds) the plan of the concrete type.
    fn plan_in(&self, plans: &PlanCache) -> Result<Arc<InjectionPlan>>;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Injectable> InjectTarget for T {
    fn plan_in(&self, plans: &PlanCache) -> Result<Arc<InjectionPlan>> {
        plans.plan_for::<T>()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================
// InjectorBuilder
// ============================================================

/// Configures an [`Injector`].
///
/// # Examples
/// ```rust
/// use std::sync::Arc;
/// use wirebox_container::prelude::*;
///
/// let plans = Arc::new(PlanCache::new());
/// let injector = Injector::builder()
///     .plan_cache(Arc::clone(&plans))
///     .max_suggestions(1)
///     .build();
/// assert!(Arc::ptr_eq(injector.plans(), &plans));
/// ```
pub struct InjectorBuilder {
    plans: Option<Arc<PlanCache>>,
    max_suggestions: usize,
}

impl InjectorBuilder {
    fn new() -> Self {
        Self {
            plans: None,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    /// Use `plans` instead of the process-wide [`PlanCache::global`].
    pub fn plan_cache(mut self, plans: Arc<PlanCache>) -> Self {
        self.plans = Some(plans);
        self
    }

    /// Cap on "did you mean?" suggestions in missing-dependency errors.
    /// `0` turns suggestions off.
    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn build(self) -> Injector {
        Injector {
            plans: self
                .plans
                .unwrap_or_else(|| Arc::clone(PlanCache::global())),
            max_suggestions: self.max_suggestions,
        }
    }
}

// ============================================================
// Injector
// ============================================================

/// Fills the slots of consumer objects from a [`DependencyStore`].
///
/// Cheap to clone; clones share the plan cache.
#[derive(Clone)]
pub struct Injector {
    plans: Arc<PlanCache>,
    max_suggestions: usize,
}

impl Injector {
    /// An injector on the global plan cache with default settings.
    pub fn new() -> Self {
        InjectorBuilder::new().build()
    }

    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    pub fn plans(&self) -> &Arc<PlanCache> {
        &self.plans
    }

    /// The plan for `T`, from this injector's cache.
    ///
    /// # Errors
    /// `T`'s validation error, if its declaration is invalid.
    pub fn plan_for<T: Injectable>(&self) -> Result<Arc<InjectionPlan>> {
        self.plans.plan_for::<T>()
    }

    /// Fills every slot of `target` from `store`.
    ///
    /// # Errors
    /// - validation errors of the target type's plan
    /// - [`WireboxError::MissingDependency`] — a required slot found nothing;
    ///   slots before it are already assigned
    pub fn inject<T: InjectTarget + ?Sized>(
        &self,
        target: &mut T,
        store: &DependencyStore,
    ) -> Result<()> {
        let plan = target.plan_in(&self.plans)?;
        if plan.is_empty() {
            return Ok(());
        }

        let consumer = plan.consumer();
        let slots = target.as_any_mut();

        for slot in plan.slots() {
            let descriptor = &slot.descriptor;
            let found = store.get_entry(&descriptor.value_type());

            match &found {
                Some(_) => trace!(
                    consumer = %consumer,
                    member = descriptor.name(),
                    "Assigning cached value"
                ),
                None if descriptor.permit_missing() => trace!(
                    consumer = %consumer,
                    member = descriptor.name(),
                    "Not cached; assigning default"
                ),
                None => return Err(self.missing(consumer, descriptor, store)),
            }

            (slot.write)(&mut *slots, found.as_deref()).map_err(|_| {
                WireboxError::SlotTypeMismatch {
                    consumer,
                    member: descriptor.name(),
                    expected: descriptor.value_type(),
                }
            })?;
        }

        Ok(())
    }

    /// Resolves `target` from `parent`, then derives the store its
    /// descendants should resolve from: `parent` plus `target`'s own
    /// contributions.
    ///
    /// # Errors
    /// Same as [`inject`](Self::inject); no store is derived on failure.
    pub fn inject_and_compose<T: Injectable + Provider>(
        &self,
        target: &mut T,
        parent: &Arc<DependencyStore>,
    ) -> Result<DependencyStore> {
        self.inject(target, parent)?;
        Ok(compose(&*target, parent))
    }

    fn missing(
        &self,
        consumer: DependencyKey,
        descriptor: &MemberDescriptor,
        store: &DependencyStore,
    ) -> WireboxError {
        let requested = descriptor.value_type();
        let suggestions = if self.max_suggestions == 0 {
            Vec::new()
        } else {
            let known = store.known_types();
            let names: Vec<&str> = known.iter().map(|k| k.type_name()).collect();
            suggest_similar(requested.type_name(), &names, self.max_suggestions)
        };

        warn!(
            consumer = %consumer,
            member = descriptor.name(),
            requested = %requested,
            "Required dependency not cached"
        );

        WireboxError::MissingDependency(MissingDependencyError {
            requested,
            consumer,
            member: descriptor.name(),
            declared_by: descriptor.declaring_type(),
            suggestions,
        })
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("plans", &self.plans)
            .field("max_suggestions", &self.max_suggestions)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Free functions
// ═══════════════════════════════════════════

/// Fills `target` from `store` using the global plan cache.
///
/// ```rust,ignore
/// resolve(&mut sprite, &store)?;
/// ```
pub fn resolve<T: InjectTarget + ?Sized>(target: &mut T, store: &DependencyStore) -> Result<()> {
    DEFAULT_INJECTOR.inject(target, store)
}

/// Runs [`resolve`] on tokio's blocking pool and hands the target back.
///
/// Resolution itself stays synchronous; this only moves it off the
/// calling task.
#[cfg(feature = "async")]
pub async fn resolve_in_background<T: InjectTarget>(
    mut target: T,
    store: Arc<DependencyStore>,
) -> Result<T> {
    let consumer = DependencyKey::of::<T>();
    tokio::task::spawn_blocking(move || {
        resolve(&mut target, &store)?;
        Ok(target)
    })
    .await
    .map_err(|err| WireboxError::Interrupted {
        consumer,
        reason: err.to_string(),
    })?
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Visibility;
    use crate::plan::PlanBuilder;
    use crate::provider::ProviderRegistry;
    use crate::store::StoreEntries;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("wirebox_container=trace")
            .with_test_writer()
            .try_init();
    }

    fn isolated() -> Injector {
        Injector::builder().plan_cache(Arc::new(PlanCache::new())).build()
    }

    #[derive(Debug)]
    struct BaseObject;

    // ── Receivers ──

    #[derive(Default)]
    struct NoSlots {
        obj: Option<Arc<BaseObject>>,
    }
    impl Injectable for NoSlots {}

    #[derive(Default)]
    struct Required {
        obj: Option<Arc<BaseObject>>,
    }
    impl Injectable for Required {
        fn declare(plan: &mut PlanBuilder<Self>) {
            plan.reference::<BaseObject>("obj", |this| &mut this.obj)
                .property(Some(Visibility::Private));
        }
    }

    #[derive(Default)]
    struct Nullable {
        obj: Option<Arc<BaseObject>>,
    }
    impl Injectable for Nullable {
        fn declare(plan: &mut PlanBuilder<Self>) {
            plan.reference::<BaseObject>("obj", |this| &mut this.obj).permit_missing();
        }
    }

    #[derive(Default)]
    struct Derived {
        base: Required,
        obj: Option<Arc<BaseObject>>,
    }
    impl Injectable for Derived {
        fn declare(plan: &mut PlanBuilder<Self>) {
            plan.base::<Required>(|this| &mut this.base);
            plan.reference::<BaseObject>("obj", |this| &mut this.obj)
                .property(Some(Visibility::Private));
        }
    }

    // One type per visibility so each gets its own plan.
    macro_rules! property_receiver {
        ($name:ident, $setter:expr) => {
            #[derive(Default)]
            struct $name {
                obj: Option<Arc<BaseObject>>,
            }
            impl Injectable for $name {
                fn declare(plan: &mut PlanBuilder<Self>) {
                    plan.reference::<BaseObject>("obj", |this| &mut this.obj)
                        .permit_missing()
                        .property($setter);
                }
            }
        };
    }

    property_receiver!(PublicSetter, Some(Visibility::Public));
    property_receiver!(ProtectedSetter, Some(Visibility::Protected));
    property_receiver!(InternalSetter, Some(Visibility::Internal));
    property_receiver!(ProtectedInternalSetter, Some(Visibility::ProtectedInternal));
    property_receiver!(PrivateSetter, Some(Visibility::Private));
    property_receiver!(NoSetter, None);

    #[derive(Default)]
    struct InheritsPrivateSetter {
        base: PrivateSetter,
    }
    impl Injectable for InheritsPrivateSetter {
        fn declare(plan: &mut PlanBuilder<Self>) {
            plan.base::<PrivateSetter>(|this| &mut this.base);
        }
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct CachedStruct {
        value: i32,
    }

    #[derive(Default)]
    struct StructReceiver {
        obj: CachedStruct,
    }
    impl Injectable for StructReceiver {
        fn declare(plan: &mut PlanBuilder<Self>) {
            plan.value::<CachedStruct>("obj", |this| &mut this.obj)
                .property(Some(Visibility::Private));
        }
    }

    #[derive(Default)]
    struct OptionalReceiver {
        obj: Option<i32>,
    }
    impl Injectable for OptionalReceiver {
        fn declare(plan: &mut PlanBuilder<Self>) {
            plan.optional::<i32>("obj", |this| &mut this.obj)
                .property(Some(Visibility::Private));
        }
    }

    #[derive(Default)]
    struct ValueRequired {
        obj: i32,
    }
    impl Injectable for ValueRequired {
        fn declare(plan: &mut PlanBuilder<Self>) {
            plan.value::<i32>("obj", |this| &mut this.obj)
                .property(Some(Visibility::Private));
        }
    }

    struct ValuePermitted {
        obj: i32,
    }
    impl Default for ValuePermitted {
        fn default() -> Self {
            Self { obj: 1 }
        }
    }
    impl Injectable for ValuePermitted {
        fn declare(plan: &mut PlanBuilder<Self>) {
            plan.value::<i32>("obj", |this| &mut this.obj)
                .permit_missing()
                .property(Some(Visibility::Private));
        }
    }

    fn store_with(obj: &Arc<BaseObject>) -> DependencyStore {
        let store = DependencyStore::new();
        store.cache(Arc::clone(obj));
        store
    }

    // ── Resolution ──

    #[test]
    fn type_without_slots_is_untouched() {
        init_tracing();
        let mut receiver = NoSlots::default();
        isolated().inject(&mut receiver, &DependencyStore::new()).unwrap();
        assert!(receiver.obj.is_none());
    }

    #[test]
    fn required_slot_gets_cached_instance() {
        let obj = Arc::new(BaseObject);
        let mut receiver = Required::default();
        isolated().inject(&mut receiver, &store_with(&obj)).unwrap();
        assert!(Arc::ptr_eq(receiver.obj.as_ref().unwrap(), &obj));
    }

    #[test]
    fn required_slot_missing_fails() {
        init_tracing();
        let mut receiver = Required::default();
        match isolated().inject(&mut receiver, &DependencyStore::new()) {
            Err(WireboxError::MissingDependency(err)) => {
                assert_eq!(err.requested, DependencyKey::of::<Arc<BaseObject>>());
                assert_eq!(err.consumer, DependencyKey::of::<Required>());
                assert_eq!(err.member, "obj");
            }
            other => panic!("Expected MissingDependency, got: {other:?}"),
        }
    }

    #[test]
    fn permitted_reference_missing_is_none() {
        let mut receiver = Nullable {
            obj: Some(Arc::new(BaseObject)),
        };
        isolated().inject(&mut receiver, &DependencyStore::new()).unwrap();
        assert!(receiver.obj.is_none());
    }

    #[test]
    fn base_and_derived_slots_filled_independently() {
        let obj = Arc::new(BaseObject);
        let mut receiver = Derived::default();
        isolated().inject(&mut receiver, &store_with(&obj)).unwrap();

        assert!(Arc::ptr_eq(receiver.base.obj.as_ref().unwrap(), &obj));
        assert!(Arc::ptr_eq(receiver.obj.as_ref().unwrap(), &obj));
    }

    #[test]
    fn missing_base_slot_names_declaring_level() {
        let mut receiver = Derived::default();
        match isolated().inject(&mut receiver, &DependencyStore::new()) {
            Err(WireboxError::MissingDependency(err)) => {
                assert_eq!(err.consumer, DependencyKey::of::<Derived>());
                assert_eq!(err.declared_by, DependencyKey::of::<Required>());
            }
            other => panic!("Expected MissingDependency, got: {other:?}"),
        }
    }

    // ── Setter visibility matrix ──

    fn assert_setter_rejected<T: Injectable + Default>() {
        let mut receiver = T::default();
        match isolated().inject(&mut receiver, &DependencyStore::new()) {
            Err(WireboxError::SetterVisibility(_)) => {}
            other => panic!(
                "Expected SetterVisibility for {}, got: {other:?}",
                std::any::type_name::<T>()
            ),
        }
    }

    #[test]
    fn broad_setters_rejected() {
        assert_setter_rejected::<PublicSetter>();
        assert_setter_rejected::<ProtectedSetter>();
        assert_setter_rejected::<InternalSetter>();
        assert_setter_rejected::<ProtectedInternalSetter>();
    }

    #[test]
    fn private_setter_accepted() {
        let mut receiver = PrivateSetter::default();
        assert!(isolated().inject(&mut receiver, &DependencyStore::new()).is_ok());
    }

    #[test]
    fn missing_setter_rejected() {
        let mut receiver = NoSetter::default();
        assert!(matches!(
            isolated().inject(&mut receiver, &DependencyStore::new()),
            Err(WireboxError::MissingSetter(_))
        ));
    }

    #[test]
    fn base_with_private_setter_writable_from_derived() {
        let obj = Arc::new(BaseObject);
        let mut receiver = InheritsPrivateSetter::default();
        isolated().inject(&mut receiver, &store_with(&obj)).unwrap();
        assert!(Arc::ptr_eq(receiver.base.obj.as_ref().unwrap(), &obj));
    }

    #[test]
    fn fields_of_any_visibility_accepted() {
        struct PublicField {
            obj: Option<Arc<BaseObject>>,
        }
        impl Injectable for PublicField {
            fn declare(plan: &mut PlanBuilder<Self>) {
                plan.reference::<BaseObject>("obj", |this| &mut this.obj).permit_missing();
            }
        }

        let mut receiver = PublicField { obj: None };
        assert!(isolated().inject(&mut receiver, &DependencyStore::new()).is_ok());
    }

    #[test]
    fn validation_runs_once_per_type() {
        let injector = isolated();
        for _ in 0..50 {
            let mut receiver = PublicSetter::default();
            assert!(injector.inject(&mut receiver, &DependencyStore::new()).is_err());
        }
        for _ in 0..50 {
            let mut receiver = Required::default();
            let _ = injector.inject(&mut receiver, &DependencyStore::new());
        }
        assert_eq!(injector.plans().constructions(), 2);
    }

    // ── Value and optional slots ──

    #[test]
    fn struct_from_provider() {
        struct StructProvider {
            cached: CachedStruct,
        }
        impl Provider for StructProvider {
            fn register(&self, registry: &mut dyn ProviderRegistry) {
                registry.cache(self.cached);
            }
        }

        let provider = StructProvider {
            cached: CachedStruct { value: 10 },
        };
        let store = compose(&provider, &Arc::new(DependencyStore::new()));

        let mut receiver = StructReceiver::default();
        isolated().inject(&mut receiver, &store).unwrap();
        assert_eq!(receiver.obj, provider.cached);
    }

    #[test]
    fn optional_from_provider() {
        struct OptionalProvider {
            cached: Option<i32>,
        }
        impl Provider for OptionalProvider {
            fn register(&self, registry: &mut dyn ProviderRegistry) {
                registry.cache(self.cached);
            }
        }

        for value in [None, Some(10i32)] {
            let provider = OptionalProvider { cached: value };
            let store = compose(&provider, &Arc::new(DependencyStore::new()));

            let mut receiver = OptionalReceiver { obj: Some(-1) };
            isolated().inject(&mut receiver, &store).unwrap();
            assert_eq!(receiver.obj, value);
        }
    }

    #[test]
    fn plain_value_does_not_satisfy_optional_slot() {
        let store = DependencyStore::new();
        store.cache(10i32);
        let mut receiver = OptionalReceiver::default();
        assert!(matches!(
            isolated().inject(&mut receiver, &store),
            Err(WireboxError::MissingDependency(_))
        ));
    }

    #[test]
    fn value_without_permit_missing_fails() {
        let mut receiver = ValueRequired::default();
        assert!(matches!(
            isolated().inject(&mut receiver, &DependencyStore::new()),
            Err(WireboxError::MissingDependency(_))
        ));
    }

    #[test]
    fn permitted_value_overwritten_with_default() {
        let mut receiver = ValuePermitted::default();
        assert_eq!(receiver.obj, 1);
        isolated().inject(&mut receiver, &DependencyStore::new()).unwrap();
        assert_eq!(receiver.obj, 0);
    }

    // ── Store chain ──

    #[test]
    fn parent_store_satisfies_child() {
        let obj = Arc::new(BaseObject);
        let root = Arc::new(store_with(&obj));
        let child = root.child();

        let mut receiver = Required::default();
        isolated().inject(&mut receiver, &child).unwrap();
        assert!(Arc::ptr_eq(receiver.obj.as_ref().unwrap(), &obj));
    }

    #[test]
    fn child_store_shadows_parent() {
        let outer = Arc::new(BaseObject);
        let inner = Arc::new(BaseObject);
        let root = Arc::new(store_with(&outer));
        let child = root.derive(StoreEntries::new().with(Arc::clone(&inner)));

        let mut receiver = Required::default();
        isolated().inject(&mut receiver, &child).unwrap();
        assert!(Arc::ptr_eq(receiver.obj.as_ref().unwrap(), &inner));

        let mut other = Required::default();
        isolated().inject(&mut other, &root).unwrap();
        assert!(Arc::ptr_eq(other.obj.as_ref().unwrap(), &outer));
    }

    #[test]
    fn instances_do_not_share_slots() {
        let obj = Arc::new(BaseObject);
        let store = store_with(&obj);
        let injector = isolated();

        let mut first = Required::default();
        let mut second = Required::default();
        injector.inject(&mut first, &store).unwrap();
        first.obj = None;
        injector.inject(&mut second, &store).unwrap();

        assert!(first.obj.is_none());
        assert!(Arc::ptr_eq(second.obj.as_ref().unwrap(), &obj));
    }

    // ── Trait objects, composition, suggestions ──

    #[test]
    fn heterogeneous_targets() {
        let obj = Arc::new(BaseObject);
        let store = store_with(&obj);
        let mut nodes: Vec<Box<dyn InjectTarget>> = vec![
            Box::new(Required::default()),
            Box::new(Derived::default()),
            Box::new(NoSlots::default()),
        ];

        let injector = isolated();
        for node in nodes.iter_mut() {
            injector.inject(&mut **node, &store).unwrap();
        }
        assert_eq!(injector.plans().len(), 3);
    }

    #[test]
    fn inject_and_compose_feeds_descendants() {
        #[derive(Default)]
        struct Screen {
            obj: Option<Arc<BaseObject>>,
            depth: u8,
        }
        impl Injectable for Screen {
            fn declare(plan: &mut PlanBuilder<Self>) {
                plan.reference::<BaseObject>("obj", |this| &mut this.obj);
            }
        }
        impl Provider for Screen {
            fn register(&self, registry: &mut dyn ProviderRegistry) {
                registry.cache(self.depth + 1);
            }
        }

        let parent = Arc::new(store_with(&Arc::new(BaseObject)));
        let mut screen = Screen::default();
        let subtree = isolated().inject_and_compose(&mut screen, &parent).unwrap();

        assert!(screen.obj.is_some());
        assert_eq!(subtree.get::<u8>(), Some(1));
        assert!(!parent.contains::<u8>());
    }

    #[test]
    fn missing_dependency_suggests_cached_types() {
        struct BaseObjectPool;

        let store = DependencyStore::new();
        store.cache(Arc::new(BaseObjectPool));

        let mut receiver = Required::default();
        match isolated().inject(&mut receiver, &store) {
            Err(WireboxError::MissingDependency(err)) => {
                assert_eq!(err.suggestions.len(), 1);
                assert!(err.suggestions[0].contains("BaseObjectPool"));
            }
            other => panic!("Expected MissingDependency, got: {other:?}"),
        }

        let quiet = Injector::builder()
            .plan_cache(Arc::new(PlanCache::new()))
            .max_suggestions(0)
            .build();
        match quiet.inject(&mut receiver, &store) {
            Err(WireboxError::MissingDependency(err)) => assert!(err.suggestions.is_empty()),
            other => panic!("Expected MissingDependency, got: {other:?}"),
        }
    }

    #[test]
    fn free_resolve_uses_global_cache() {
        let obj = Arc::new(BaseObject);
        let mut receiver = Derived::default();
        resolve(&mut receiver, &store_with(&obj)).unwrap();
        assert!(PlanCache::global().contains::<Derived>());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn background_resolution_returns_target() {
        let obj = Arc::new(BaseObject);
        let store = Arc::new(store_with(&obj));

        let receiver = resolve_in_background(Required::default(), Arc::clone(&store))
            .await
            .unwrap();
        assert!(Arc::ptr_eq(receiver.obj.as_ref().unwrap(), &obj));

        let failed = resolve_in_background(Required::default(), Arc::new(DependencyStore::new())).await;
        assert!(matches!(failed, Err(WireboxError::MissingDependency(_))));
    }
}
