//! Log setup for the command-line harness.
//!
//! The library crates only emit through the `log` facade. The binary picks a
//! backend here: `env_logger` by default, or a `tracing-subscriber` pipeline
//! (spans from the re-centering entry point, optional JSON lines) with the
//! `tracing` feature. Both write to stderr so stdout stays free for reports,
//! and both let `RUST_LOG` override the level chosen on the command line.

use log::LevelFilter;

/// Map `-v` / `-q` counts to a level: warnings about degenerate rotations
/// stay visible unless `--quiet` is given.
pub fn verbosity(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install `env_logger` on stderr at `level`. Returns `false` if a logger was
/// already installed.
pub fn init(level: LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .target(env_logger::Target::Stderr)
        .try_init()
        .is_ok()
}

/// Install a `tracing` subscriber on stderr at `level`, bridging `log`
/// records into it. Span close events carry the time spent re-centering.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) -> bool {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().flatten_event(true).finish().try_init().is_ok()
    } else {
        builder.finish().try_init().is_ok()
    };
    // No-op when the subscriber already bridged `log`.
    let _ = tracing_log::LogTracer::init();
    installed
}
