//! Operator log sink.
//!
//! Every progress and diagnostic line the client produces goes through one
//! registered callback, so embedders can route client output into their own
//! logging. Without a callback, lines go to stderr.

use std::sync::Arc;

use parking_lot::Mutex;

type Sink = Arc<dyn Fn(&str) + Send + Sync>;

/// Routes diagnostic lines to the registered callback, or stderr.
#[derive(Default)]
pub(crate) struct LogSink {
    sink: Mutex<Option<Sink>>,
}

impl LogSink {
    /// Register a callback, replacing any previous one.
    pub(crate) fn set(&self, sink: impl Fn(&str) + Send + Sync + 'static) {
        *self.sink.lock() = Some(Arc::new(sink));
    }

    /// Emit one line.
    ///
    /// The callback runs outside the internal lock, so it may re-enter the
    /// client freely.
    pub(crate) fn emit(&self, line: &str) {
        let sink = self.sink.lock().clone();
        match sink {
            Some(sink) => sink(line),
            None => eprintln!("{line}"),
        }
    }
}
