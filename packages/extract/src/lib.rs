#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Capture-group extraction over regex matches.
//!
//! The primary entry point is [`extract_groups`], which scans a subject
//! string and collects every match's capture groups into a
//! [`ResultIndex`]. The query helpers in [`query`] and the reshaping in
//! [`table`] are thin layers on top of it:
//!
//! - [`to_table`] turns the matches into a dense row-per-match table.
//! - [`count_matches`] counts them.
//! - [`get_match_by_index`] and [`get_match_group_by_index`] select one
//!   match, falling back to the last one when the index is not present.
//! - [`get_match_string`] does the same but never fails on an empty
//!   result, logging a warning instead.
//!
//! Extractions can also be described in TOML and run through
//! [`ExtractionDefinition`].

pub mod definition;
pub mod groups;
pub mod pattern;
pub mod query;
pub mod table;

#[cfg(test)]
mod test_log;

pub use definition::ExtractionDefinition;
pub use groups::extract_groups;
pub use query::{
    count_matches, get_match_by_index, get_match_group_by_index, get_match_string,
    selector_from_json,
};
pub use regex_extract_models::{
    GroupKey, GroupMap, GroupSelector, GroupValue, MatchFlag, MatchFlags, MatchIndex, ResultIndex,
};
pub use table::{Row, Table, to_table};

/// Errors that can occur while extracting capture groups.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The pattern failed to compile.
    #[error("Invalid regex pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A single match was requested but the pattern matched nothing.
    #[error("No match found to select from")]
    EmptyResult,

    /// An extraction definition could not be parsed.
    #[error("Invalid extraction definition: {0}")]
    Config(#[from] toml::de::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a table as CSV failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
