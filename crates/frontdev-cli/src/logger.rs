//! Logging setup for the frontdev CLI.
//!
//! Built on `tracing`: `--verbose` turns on debug output for the frontdev
//! crates, `--quiet` shows errors only, and otherwise `RUST_LOG` applies with
//! `info` as the fallback.
//!
//! ```rust,no_run
//! use frontdev_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("serving dist");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "frontdev_cli=debug,frontdev_bundler=debug,tower_http=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "frontdev_cli=info,frontdev_bundler=info,warn";

/// Pick the filter directives for the given flags.
///
/// `verbose` wins over `quiet`; `RUST_LOG` is only consulted when neither
/// flag is set.
pub fn filter_directives(verbose: bool, quiet: bool) -> String {
    if verbose {
        VERBOSE_FILTER.to_string()
    } else if quiet {
        QUIET_FILTER.to_string()
    } else {
        std::env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

/// Initialize the global tracing subscriber. Call once, before any logging.
///
/// Invalid `RUST_LOG` directives fall back to the default filter.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = EnvFilter::try_new(filter_directives(verbose, quiet))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .with_writer(std::io::stderr)
        .compact();

    // A second initialization (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Whether colored log output makes sense for stderr.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_verbose_wins_over_quiet() {
        assert_eq!(filter_directives(true, true), VERBOSE_FILTER);
        assert_eq!(filter_directives(false, true), QUIET_FILTER);
    }

    #[test]
    #[serial]
    fn test_rust_log_used_by_default() {
        unsafe {
            std::env::set_var("RUST_LOG", "frontdev_cli=trace");
        }
        let directives = filter_directives(false, false);
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        assert_eq!(directives, "frontdev_cli=trace");
    }

    #[test]
    #[serial]
    fn test_should_use_colors_env() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(!should_use_colors());
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
        assert!(should_use_colors());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    fn test_filters_parse() {
        assert!(EnvFilter::try_new(VERBOSE_FILTER).is_ok());
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
