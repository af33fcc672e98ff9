//! Runtime filter changes

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing_subscriber::{EnvFilter, Registry, layer::Layer, reload};

use crate::error::{LogError, LogResult};

/// Handle for changing the active filter after the logger is installed
#[derive(Clone)]
pub struct ReloadHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    current_filter: Arc<ArcSwap<String>>,
}

impl ReloadHandle {
    /// Replace the active filter
    ///
    /// # Errors
    /// Returns [`LogError::Filter`] if `filter` does not parse, and
    /// [`LogError::Config`] if the subscriber it belongs to is gone. The
    /// previous filter stays active in both cases.
    pub fn reload(&self, filter: &str) -> LogResult<()> {
        let new_filter = parse_filter(filter)?;
        self.filter
            .reload(new_filter)
            .map_err(|e| LogError::Config(format!("failed to reload filter: {e}")))?;
        self.current_filter.store(Arc::new(filter.to_string()));
        tracing::debug!(filter, "log filter reloaded");
        Ok(())
    }

    /// The directive string of the active filter
    #[must_use]
    pub fn current_filter(&self) -> Arc<String> {
        self.current_filter.load_full()
    }
}

impl std::fmt::Debug for ReloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadHandle")
            .field("current_filter", &self.current_filter.load_full())
            .finish_non_exhaustive()
    }
}

pub(super) fn parse_filter(directives: &str) -> LogResult<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| LogError::Filter(format!("{directives}: {e}")))
}

/// Wrap the filter in a reload layer when requested.
pub(super) fn create_filter_layer(
    filter: EnvFilter,
    directives: &str,
    reloadable: bool,
) -> (
    Box<dyn Layer<Registry> + Send + Sync + 'static>,
    Option<ReloadHandle>,
) {
    if reloadable {
        let (layer, handle) = reload::Layer::new(filter);
        let reload_handle = ReloadHandle {
            filter: handle,
            current_filter: Arc::new(ArcSwap::from_pointee(directives.to_string())),
        };
        (Box::new(layer), Some(reload_handle))
    } else {
        (Box::new(filter), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_subscriber::layer::SubscriberExt;

    fn reloadable(directives: &str) -> (impl tracing::Subscriber, ReloadHandle) {
        let filter = parse_filter(directives).unwrap();
        let (layer, handle) = create_filter_layer(filter, directives, true);
        (Registry::default().with(layer), handle.unwrap())
    }

    #[test]
    fn reload_swaps_filter() {
        let (subscriber, handle) = reloadable("info");
        assert_eq!(*handle.current_filter(), "info");

        handle.reload("ward_registry=debug,warn").unwrap();
        assert_eq!(*handle.current_filter(), "ward_registry=debug,warn");
        drop(subscriber);
    }

    #[test]
    fn invalid_filter_keeps_previous() {
        let (subscriber, handle) = reloadable("info");

        let err = handle.reload("ward=[[").unwrap_err();
        assert!(matches!(err, LogError::Filter(_)), "{err:?}");
        assert_eq!(*handle.current_filter(), "info");
        drop(subscriber);
    }

    #[test]
    fn reload_after_subscriber_dropped_fails() {
        let (subscriber, handle) = reloadable("info");
        drop(subscriber);

        let err = handle.reload("debug").unwrap_err();
        assert!(matches!(err, LogError::Config(_)), "{err:?}");
        assert_eq!(*handle.current_filter(), "info");
    }

    #[test]
    fn static_filter_has_no_handle() {
        let (_, handle) = create_filter_layer(parse_filter("info").unwrap(), "info", false);
        assert!(handle.is_none());
    }
}
