//! # Ward Registry
//!
//! A thread-safe set of distinct objects shared across threads.
//!
//! - Membership is by allocation identity, not by value.
//! - [`Ownership::Weak`] registries do not keep their members alive; dropped
//!   members vanish from every read without an explicit removal.
//! - A non-zero lock timeout bounds how long any operation waits for the
//!   registry's single lock.
//!
//! ```
//! use std::sync::Arc;
//! use ward_registry::Registry;
//!
//! let registry: Registry<String> = Registry::weak();
//! let listener = Arc::new(String::from("listener"));
//! registry.add(&listener);
//! assert!(registry.contains(&listener));
//!
//! drop(listener);
//! assert_eq!(registry.count(), 0);
//! ```

pub mod config;
pub mod error;
pub mod holder;
pub mod registry;

pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use holder::{Holder, Ownership, Slot, identity};
pub use registry::Registry;
