//! Pattern compilation.

use regex::{Regex, RegexBuilder};
use regex_extract_models::{MatchFlag, MatchFlags};

use crate::ExtractError;

/// Compiles `pattern` with the engine options named by `flags`.
///
/// Nothing is cached; every call builds a fresh [`Regex`].
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] if the pattern fails to compile.
pub fn compile(pattern: &str, flags: &MatchFlags) -> Result<Regex, ExtractError> {
    let mut builder = RegexBuilder::new(pattern);

    for flag in flags.iter() {
        match flag {
            MatchFlag::Multiline => builder.multi_line(true),
            MatchFlag::CaseInsensitive => builder.case_insensitive(true),
            MatchFlag::DotMatchesNewLine => builder.dot_matches_new_line(true),
            MatchFlag::IgnoreWhitespace => builder.ignore_whitespace(true),
            MatchFlag::SwapGreed => builder.swap_greed(true),
            MatchFlag::Crlf => builder.crlf(true),
        };
    }

    Ok(builder.build()?)
}
