//! # Ward Resource
//!
//! Deterministic release of resources bound to a single lexical scope.
//!
//! A [`Disposable`] resource is produced by a factory, handed to exactly one
//! body by exclusive reference, and disposed exactly once afterwards, whether
//! the body returns `Ok`, returns `Err`, or unwinds.
//!
//! ```
//! use ward_resource::{Disposable, using};
//!
//! struct Handle { open: bool }
//!
//! impl Disposable for Handle {
//!     fn dispose(&mut self) {
//!         self.open = false;
//!     }
//! }
//!
//! let len = using(
//!     || Ok::<_, std::io::Error>(Handle { open: true }),
//!     |handle| Ok(usize::from(handle.open)),
//! )?;
//! assert_eq!(len, 1);
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod disposable;
pub mod guard;

pub use disposable::{Disposable, OnDispose, defer, using, using_optional};
pub use guard::Guard;
