//! # Wirebox: slot injection for object trees
//!
//! Objects declare the slots they want filled. An [`Injector`] fills them
//! from a hierarchical [`DependencyStore`], and a [`Provider`] can publish
//! values for everything resolved beneath it.
//!
//! ```rust
//! use std::sync::Arc;
//! use wirebox::{DependencyStore, Injectable, resolve};
//!
//! struct Clock {
//!     rate: u32,
//! }
//!
//! #[derive(Default, Injectable)]
//! struct Sprite {
//!     #[resolved]
//!     clock: Option<Arc<Clock>>,
//!     #[resolved(permit_missing)]
//!     depth: f32,
//! }
//!
//! let store = DependencyStore::new();
//! store.cache(Arc::new(Clock { rate: 60 }));
//!
//! let mut sprite = Sprite::default();
//! resolve(&mut sprite, &store).unwrap();
//! assert_eq!(sprite.clock.unwrap().rate, 60);
//! assert_eq!(sprite.depth, 0.0);
//! ```

pub use wirebox_container::*;
pub use wirebox_derive::*;
pub use wirebox_support::*;
