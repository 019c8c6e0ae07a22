// Licensed under the Apache-2.0 license

//! Logging through an injected [`log::Log`] handle.
//!
//! The converter does not depend on a process-wide logger. Callers pass the
//! sink they own (a `simplelog` combined logger, `log::logger()`, or a test
//! capture) and records are dispatched to it directly.

use log::{Level, Log, Record};
use std::fmt;

const TARGET: &str = "registers_cpsw_yaml";

pub(crate) fn emit(sink: &dyn Log, level: Level, args: fmt::Arguments<'_>) {
    sink.log(
        &Record::builder()
            .args(args)
            .level(level)
            .target(TARGET)
            .build(),
    );
}

macro_rules! sink_debug {
    ($sink:expr, $($arg:tt)+) => {
        $crate::sink::emit($sink, log::Level::Debug, format_args!($($arg)+))
    };
}

macro_rules! sink_warn {
    ($sink:expr, $($arg:tt)+) => {
        $crate::sink::emit($sink, log::Level::Warn, format_args!($($arg)+))
    };
}

pub(crate) use sink_debug;
pub(crate) use sink_warn;
