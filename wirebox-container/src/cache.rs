//! Process-wide memoization of injection plans.
//!
//! Each consumer type gets one [`OnceCell`] slot in a [`DashMap`]. The map
//! lock is only held long enough to fetch or insert that slot; the plan is
//! then built inside the cell, so two threads racing on a new type build it
//! at most once and never observe a half-built plan.
//!
//! Validation failures are cached like successes: a type whose declaration
//! is broken fails identically on every later request.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, trace};

use crate::error::Result;
use crate::plan::{Injectable, InjectionPlan, build_plan};

type PlanOutcome = Result<Arc<InjectionPlan>>;

static GLOBAL: Lazy<Arc<PlanCache>> = Lazy::new(|| Arc::new(PlanCache::new()));

/// Type → plan memo, populated on first demand and never evicted.
pub struct PlanCache {
    plans: DashMap<TypeId, Arc<OnceCell<PlanOutcome>>>,
    constructions: AtomicUsize,
}

impl PlanCache {
    /// Creates an empty, isolated cache.
    pub fn new() -> Self {
        Self {
            plans: DashMap::new(),
            constructions: AtomicUsize::new(0),
        }
    }

    /// The shared cache used by [`resolve`](crate::injector::resolve) and
    /// default-built injectors. Created on first use.
    pub fn global() -> &'static Arc<PlanCache> {
        &GLOBAL
    }

    /// Returns the plan for `T`, building and validating it on first request.
    ///
    /// # Errors
    /// The validation error of `T`'s plan, on this and every later call.
    pub fn plan_for<T: Injectable>(&self) -> PlanOutcome {
        let cell = Arc::clone(
            self.plans
                .entry(TypeId::of::<T>())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        );

        cell.get_or_init(|| {
            self.constructions.fetch_add(1, Ordering::Relaxed);
            debug!(consumer = std::any::type_name::<T>(), "Plan cache miss");
            build_plan::<T>().map(Arc::new)
        })
        .clone()
    }

    /// Returns `true` if a plan (or its failure) is memoized for `T`.
    pub fn contains<T: Injectable>(&self) -> bool {
        self.plans
            .get(&TypeId::of::<T>())
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Number of types with a memoized outcome.
    pub fn len(&self) -> usize {
        self.plans.iter().filter(|entry| entry.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of plan builds this cache has run since creation or [`reset`](Self::reset).
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }

    /// Forgets every memoized plan. Intended for test isolation.
    pub fn reset(&self) {
        trace!(cached = self.plans.len(), "Resetting plan cache");
        self.plans.clear();
        self.constructions.store(0, Ordering::Relaxed);
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanCache")
            .field("plans", &self.len())
            .field("constructions", &self.constructions())
            .finish()
    }
}
