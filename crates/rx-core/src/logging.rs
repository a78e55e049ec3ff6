//! Injected diagnostic sink.
//!
//! Every `rx-*` crate logs through the [`log`] facade.  Applications that
//! already run a `log` backend (`env_logger`, `tracing-log`, …) need nothing
//! from this module.  Hosts that want raw `(severity, source, message)`
//! triples, e.g. to forward them across an FFI boundary, implement
//! [`LogSink`] and call [`set_sink`] once at process start.
//!
//! ```
//! use log::{Level, LevelFilter};
//!
//! rx_core::set_sink(
//!     |level: Level, target: &str, message: &str| eprintln!("[{level}] {target}: {message}"),
//!     LevelFilter::Info,
//! )
//! .unwrap();
//! ```

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::LoggingResult;

/// Receiver of diagnostic records.
///
/// `target` is the emitting module path (e.g. `rx_osm::restriction`).
pub trait LogSink: Send + Sync + 'static {
    fn log(&self, level: Level, target: &str, message: &str);

    /// Flush any buffered records.  Default: no-op.
    fn flush(&self) {}
}

impl<F> LogSink for F
where
    F: Fn(Level, &str, &str) + Send + Sync + 'static,
{
    fn log(&self, level: Level, target: &str, message: &str) {
        self(level, target, message)
    }
}

/// Adapter from a [`LogSink`] to the `log` facade.
struct SinkLogger<S> {
    sink:      S,
    max_level: LevelFilter,
}

impl<S: LogSink> Log for SinkLogger<S> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let message = record.args().to_string();
            self.sink.log(record.level(), record.target(), &message);
        }
    }

    fn flush(&self) {
        self.sink.flush();
    }
}

/// Install `sink` as the process-wide logger, forwarding records at or above
/// `max_level`.
///
/// May succeed at most once per process; later calls return
/// [`LoggingError::AlreadySet`](crate::LoggingError::AlreadySet) and leave the first sink in place.
pub fn set_sink<S: LogSink>(sink: S, max_level: LevelFilter) -> LoggingResult<()> {
    log::set_boxed_logger(Box::new(SinkLogger { sink, max_level }))?;
    log::set_max_level(max_level);
    Ok(())
}
