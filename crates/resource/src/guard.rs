//! RAII guard for scoped resources

use crate::disposable::Disposable;

/// RAII guard that wraps a resource.
///
/// When the guard is dropped, the on-drop callback receives the resource
/// (typically to dispose it). Use `into_inner()` to take ownership without
/// triggering the callback.
pub struct Guard<T, F = fn(T)>
where
    F: FnOnce(T),
{
    resource: Option<T>,
    on_drop: Option<F>,
}

impl<T, F> Guard<T, F>
where
    F: FnOnce(T),
{
    /// Create a new guard wrapping `resource` with a drop callback.
    pub fn new(resource: T, on_drop: F) -> Self {
        Self {
            resource: Some(resource),
            on_drop: Some(on_drop),
        }
    }

    /// Take the resource out of the guard, preventing the drop callback.
    #[must_use]
    pub fn into_inner(mut self) -> T {
        self.on_drop.take();
        self.resource.take().expect("guard used after into_inner")
    }
}

impl<R: Disposable> Guard<R> {
    /// Guard that calls [`Disposable::dispose`] when dropped.
    pub fn disposing(resource: R) -> Self {
        Self::new(resource, dispose_now::<R>)
    }
}

fn dispose_now<R: Disposable>(mut resource: R) {
    tracing::trace!(
        resource = std::any::type_name::<R>(),
        "disposing scoped resource"
    );
    resource.dispose();
}

impl<T, F> std::ops::Deref for Guard<T, F>
where
    F: FnOnce(T),
{
    type Target = T;

    fn deref(&self) -> &T {
        self.resource.as_ref().expect("guard used after into_inner")
    }
}

impl<T, F> std::ops::DerefMut for Guard<T, F>
where
    F: FnOnce(T),
{
    fn deref_mut(&mut self) -> &mut T {
        self.resource.as_mut().expect("guard used after into_inner")
    }
}

impl<T, F> Drop for Guard<T, F>
where
    F: FnOnce(T),
{
    fn drop(&mut self) {
        if let (Some(resource), Some(on_drop)) = (self.resource.take(), self.on_drop.take()) {
            on_drop(resource);
        }
    }
}

impl<T: std::fmt::Debug, F> std::fmt::Debug for Guard<T, F>
where
    F: FnOnce(T),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("resource", &self.resource)
            .field("armed", &self.on_drop.is_some())
            .finish()
    }
}
