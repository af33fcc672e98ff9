//! # Ward Event
//!
//! Multicast event lists. Each handler is a [`Callback`]: either a plain
//! closure, or a method bound to a weakly-held target that expires once the
//! target is dropped.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use ward_event::EventList;
//!
//! #[derive(Default)]
//! struct Badge(AtomicUsize);
//!
//! impl Badge {
//!     fn on_message(&self, _text: &str) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let messages: EventList<str> = EventList::new();
//! let badge = Arc::new(Badge::default());
//! messages.add_method(&badge, Badge::on_message);
//!
//! assert_eq!(messages.invoke("hello"), 1);
//! drop(badge);
//! assert_eq!(messages.invoke("anyone?"), 0);
//! assert!(messages.is_empty());
//! ```

pub mod callback;
pub mod list;

pub use callback::{Callback, Closure, Delivery, Method};
pub use list::{EventList, HandlerId};
