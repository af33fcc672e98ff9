//! Callback capabilities stored in an [`EventList`](crate::EventList).

use std::fmt;
use std::sync::{Arc, Weak};

/// Outcome of invoking a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The callback ran.
    Delivered,
    /// The callback's target is gone; it will never run again.
    Expired,
}

/// Something an event can be delivered to.
pub trait Callback<A: ?Sized>: Send + Sync {
    /// Deliver `args`.
    fn invoke(&self, args: &A) -> Delivery;

    /// Whether this callback can no longer be delivered to.
    fn is_expired(&self) -> bool {
        false
    }
}

/// A plain closure callback. Never expires.
pub struct Closure<F>(F);

impl<F> Closure<F> {
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<A: ?Sized, F> Callback<A> for Closure<F>
where
    F: Fn(&A) + Send + Sync,
{
    fn invoke(&self, args: &A) -> Delivery {
        (self.0)(args);
        Delivery::Delivered
    }
}

impl<F> fmt::Debug for Closure<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure").finish_non_exhaustive()
    }
}

/// A method bound to a weakly-held target.
///
/// Expires as soon as the target has no strong references left.
pub struct Method<T, A: ?Sized> {
    target: Weak<T>,
    method: fn(&T, &A),
}

impl<T, A: ?Sized> Method<T, A> {
    /// Bind `method` to `target` without keeping `target` alive.
    pub fn new(target: &Arc<T>, method: fn(&T, &A)) -> Self {
        Self {
            target: Arc::downgrade(target),
            method,
        }
    }
}

impl<T, A> Callback<A> for Method<T, A>
where
    T: Send + Sync,
    A: ?Sized,
{
    fn invoke(&self, args: &A) -> Delivery {
        match self.target.upgrade() {
            Some(target) => {
                (self.method)(&target, args);
                Delivery::Delivered
            }
            None => Delivery::Expired,
        }
    }

    fn is_expired(&self) -> bool {
        self.target.strong_count() == 0
    }
}

impl<T, A: ?Sized> fmt::Debug for Method<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("target", &std::any::type_name::<T>())
            .field("alive", &(self.target.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Counter {
        fn bump(&self, by: &usize) {
            self.0.fetch_add(*by, Ordering::SeqCst);
        }
    }

    #[test]
    fn closure_always_delivers() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_c = Arc::clone(&seen);
        let callback = Closure::new(move |n: &usize| {
            seen_c.fetch_add(*n, Ordering::SeqCst);
        });
        assert_eq!(callback.invoke(&3usize), Delivery::Delivered);
        assert!(!Callback::<usize>::is_expired(&callback));
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn method_expires_with_target() {
        let target = Arc::new(Counter::default());
        let callback = Method::new(&target, Counter::bump);

        assert_eq!(callback.invoke(&2usize), Delivery::Delivered);
        assert_eq!(target.0.load(Ordering::SeqCst), 2);

        drop(target);
        assert!(callback.is_expired());
        assert_eq!(callback.invoke(&2usize), Delivery::Expired);
    }

    #[test]
    fn method_does_not_keep_target_alive() {
        let target = Arc::new(Counter::default());
        let probe = Arc::downgrade(&target);
        let _callback = Method::new(&target, Counter::bump);
        drop(target);
        assert!(probe.upgrade().is_none());
    }
}
