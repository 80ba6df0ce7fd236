#![deny(warnings)]

use tracing_core::LevelFilter;
use tracing_subscriber::{
    self,
    EnvFilter,
    fmt,
};

pub fn init() {
    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::TRACE.into());

    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_thread_names(true)
        .compact();

    let _ = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_test_writer()
        .event_format(format)
        .with_env_filter(filter)
        .try_init();
}
