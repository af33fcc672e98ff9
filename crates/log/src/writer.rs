//! Output destinations

use tracing_subscriber::fmt::{TestWriter, writer::BoxMakeWriter};

use crate::config::Writer;

/// Build the make-writer for the configured destination.
pub(crate) fn make_writer(writer: Writer) -> BoxMakeWriter {
    match writer {
        Writer::Stderr => BoxMakeWriter::new(std::io::stderr),
        Writer::Stdout => BoxMakeWriter::new(std::io::stdout),
        Writer::Test => BoxMakeWriter::new(TestWriter::new()),
    }
}
