//! Utilities: logging setup (tracing, stderr).
//!
//! Key items:
//!   init_logging / derive_level

/// Logging helpers.
pub mod logging {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    /// Map `-v` / `-q` onto a level. Quiet wins over verbose.
    pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::ERROR;
        }
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Directive used when RUST_LOG is unset: our crate at `level`, deps at warn.
    pub fn default_directive(level: LevelFilter) -> String {
        let ours = level.to_string().to_lowercase();
        let deps = std::cmp::min(level, LevelFilter::WARN).to_string().to_lowercase();
        format!("{deps},cgql={ours}")
    }

    /// Install the global subscriber on stderr. RUST_LOG overrides `level`.
    /// Safe to call more than once; later calls are no-ops.
    pub fn init_logging(level: LevelFilter) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init();
    }

}

pub use logging::{derive_level, init_logging};
