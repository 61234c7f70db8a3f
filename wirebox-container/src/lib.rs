//! Core injection engine for Wirebox.
//!
//! Consumers declare slots once per type; the [`Injector`] fills them from
//! a hierarchical [`DependencyStore`], reusing one validated
//! [`InjectionPlan`] per type.

pub mod cache;
pub mod error;
pub mod injector;
pub mod key;
pub mod member;
pub mod plan;
pub mod provider;
pub mod store;
mod validate;

pub use cache::PlanCache;
pub use error::{Result, WireboxError};
pub use injector::{InjectTarget, Injector, InjectorBuilder, resolve};
#[cfg(feature = "async")]
pub use injector::resolve_in_background;
pub use key::DependencyKey;
pub use member::{MemberDecl, MemberDescriptor, StorageKind, Visibility};
pub use plan::{Injectable, InjectionPlan, PlanBuilder, build_plan};
pub use provider::{Provider, ProviderRegistry, compose};
pub use store::{DependencyStore, StoreEntries};

pub mod prelude {
    pub use crate::cache::PlanCache;
    pub use crate::error::{Result, WireboxError};
    pub use crate::injector::{InjectTarget, Injector, resolve};
    pub use crate::key::DependencyKey;
    pub use crate::member::Visibility;
    pub use crate::plan::{Injectable, PlanBuilder};
    pub use crate::provider::{Provider, ProviderRegistry, compose};
    pub use crate::store::{DependencyStore, StoreEntries};
}
