//! The [`Disposable`] capability and the scoped `using` helpers.

use crate::guard::Guard;

/// A resource with an explicit, deterministic release step.
///
/// `dispose` is infallible. Resources whose release can fail are expected to
/// handle or log the failure themselves; the scope helpers never observe it.
pub trait Disposable {
    /// Release the underlying handle.
    fn dispose(&mut self);
}

impl<R: Disposable + ?Sized> Disposable for Box<R> {
    fn dispose(&mut self) {
        (**self).dispose();
    }
}

impl<R: Disposable + ?Sized> Disposable for &mut R {
    fn dispose(&mut self) {
        (**self).dispose();
    }
}

/// A deferred action run on disposal, at most once.
///
/// Built with [`defer`].
pub struct OnDispose<F: FnOnce()> {
    action: Option<F>,
}

/// Wrap `action` so it runs when the returned value is disposed.
pub fn defer<F: FnOnce()>(action: F) -> OnDispose<F> {
    OnDispose {
        action: Some(action),
    }
}

impl<F: FnOnce()> OnDispose<F> {
    /// Whether the action has already run.
    pub fn is_disposed(&self) -> bool {
        self.action.is_none()
    }
}

impl<F: FnOnce()> Disposable for OnDispose<F> {
    fn dispose(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

impl<F: FnOnce()> std::fmt::Debug for OnDispose<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnDispose")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Acquire a resource, run `body` with it, then dispose it.
///
/// `factory` runs exactly once. If it fails, the error is returned and
/// neither `body` nor `dispose` runs. Otherwise `dispose` runs exactly once
/// after `body` returns, whether it returned `Ok` or `Err`, and also while
/// unwinding if `body` panics. The result of `body` is returned unchanged.
pub fn using<R, T, E>(
    factory: impl FnOnce() -> Result<R, E>,
    body: impl FnOnce(&mut R) -> Result<T, E>,
) -> Result<T, E>
where
    R: Disposable,
{
    let mut resource = Guard::disposing(factory()?);
    body(&mut *resource)
}

/// Like [`using`], for factories that may produce no resource.
///
/// `body` always runs once (unless `factory` fails), receiving `None` when
/// there is no resource. Disposal only happens for a present resource.
pub fn using_optional<R, T, E>(
    factory: impl FnOnce() -> Result<Option<R>, E>,
    body: impl FnOnce(Option<&mut R>) -> Result<T, E>,
) -> Result<T, E>
where
    R: Disposable,
{
    let mut resource = factory()?.map(Guard::disposing);
    body(resource.as_deref_mut())
}
