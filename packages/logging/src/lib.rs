#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Logger initialization for the regex-extract crates.
//!
//! The extraction crates only emit through the [`log`] facade: usage errors
//! at `error`, the "no match" fallback at `warn`, scan summaries at `debug`.
//! Nothing is printed until a binary (or test) installs a backend by
//! calling [`init_logger()`].

/// Installs `pretty_env_logger` as the global logger, filtered by
/// `RUST_LOG`.
///
/// Calling this more than once is harmless; later calls leave the first
/// logger in place.
pub fn init_logger() {
    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
