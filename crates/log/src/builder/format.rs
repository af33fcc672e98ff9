//! Format layer macros
//!
//! Every combination of format and timestamp setting yields a different
//! layer type, so the subscriber is assembled and installed inside the
//! macro rather than returned.

/// Install `Registry + filter + fmt` with the text formatter `$style`
/// (`pretty` or `compact`).
macro_rules! install_fmt_layer {
    ($style:ident, $display:expr, $writer:expr, $filter_layer:expr) => {{
        let display = $display;
        let layer = tracing_subscriber::fmt::layer()
            .$style()
            .with_writer($writer)
            .with_ansi(display.colors)
            .with_target(display.target)
            .with_file(display.source)
            .with_line_number(display.source)
            .with_thread_ids(display.thread_ids);
        if display.time {
            Registry::default().with($filter_layer).with(layer).try_init()
        } else {
            Registry::default()
                .with($filter_layer)
                .with(layer.without_time())
                .try_init()
        }
    }};
}

/// Install `Registry + filter + fmt` with the JSON formatter.
macro_rules! install_json_layer {
    ($display:expr, $writer:expr, $filter_layer:expr) => {{
        let display = $display;
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer($writer)
            .with_ansi(false)
            .with_target(display.target)
            .with_file(display.source)
            .with_line_number(display.source)
            .with_thread_ids(display.thread_ids);
        if display.time {
            Registry::default().with($filter_layer).with(layer).try_init()
        } else {
            Registry::default()
                .with($filter_layer)
                .with(layer.without_time())
                .try_init()
        }
    }};
}
