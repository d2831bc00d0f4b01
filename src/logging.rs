//! Log subscriber setup for the binary.
//!
//! The library crates log through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter, which also receives `log` records, and
//! writes to stderr so stdout stays free for the run summary.

use tracing_subscriber::EnvFilter;

/// Filter directive for the given command-line verbosity.
///
/// # Examples
///
/// ```
/// use dist_stage::logging::default_directive;
///
/// assert_eq!(default_directive(0, false), "info");
/// assert_eq!(default_directive(0, true), "warn");
/// assert_eq!(default_directive(3, false), "trace");
/// ```
#[must_use]
pub const fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Build the filter, letting `RUST_LOG` take precedence when it is set and
/// valid.
#[must_use]
pub fn env_filter(verbosity: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)))
}

/// Install the global subscriber.
///
/// A second call leaves the first subscriber in place and only logs a debug
/// line.
pub fn init(verbosity: u8, quiet: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(error) = result {
        log::debug!("log subscriber already installed: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default(0, false, "info")]
    #[case::verbose(1, false, "debug")]
    #[case::very_verbose(2, false, "trace")]
    #[case::saturates(9, false, "trace")]
    #[case::quiet(0, true, "warn")]
    fn maps_flags_to_directive(#[case] verbosity: u8, #[case] quiet: bool, #[case] expected: &str) {
        assert_eq!(default_directive(verbosity, quiet), expected);
    }

    #[rstest]
    fn init_twice_does_not_panic() {
        init(0, false);
        init(1, false);
    }
}
