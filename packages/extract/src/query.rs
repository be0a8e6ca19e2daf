//! Single-match queries built on [`extract_groups`].
//!
//! Every query runs a fresh scan and then picks one match with the
//! clamp-to-last policy: the requested index if it exists, otherwise the
//! last match.
//!
//! The failure modes differ on purpose. [`get_match_by_index`] and
//! [`get_match_group_by_index`] return [`ExtractError::EmptyResult`] when
//! nothing matched, while [`get_match_string`] logs a warning and returns
//! `None`. A group selector that does not name a group is logged and
//! answered with `None` by both single-group queries.

use regex_extract_models::{GroupMap, GroupSelector, GroupValue, MatchFlags, MatchIndex};

use crate::ExtractError;
use crate::groups::extract_groups;

/// Counts the matches of `pattern` in `text`.
///
/// `group_names` only shapes the extracted maps; it never changes the count.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] if the pattern fails to compile.
pub fn count_matches(
    pattern: &str,
    text: &str,
    group_names: Option<&[&str]>,
    flags: &MatchFlags,
) -> Result<usize, ExtractError> {
    Ok(extract_groups(pattern, text, group_names, flags)?.len())
}

/// Returns the groups of the match at `match_index`, or of the last match
/// if that index is not present.
///
/// # Errors
///
/// * [`ExtractError::Pattern`] if the pattern fails to compile.
/// * [`ExtractError::EmptyResult`] if the pattern matched nothing.
pub fn get_match_by_index(
    pattern: &str,
    text: &str,
    group_names: Option<&[&str]>,
    match_index: MatchIndex,
    flags: &MatchFlags,
) -> Result<GroupMap, ExtractError> {
    extract_groups(pattern, text, group_names, flags)?
        .into_selected(match_index)
        .map(|(_, groups)| groups)
        .ok_or(ExtractError::EmptyResult)
}

/// Returns what the group named by `group_name` captured in the match at
/// `match_index` (or the last match).
///
/// Only the first name of a [`GroupSelector::Sequence`] is used. An invalid
/// selector is logged and yields `Ok(None)` without scanning.
///
/// # Errors
///
/// * [`ExtractError::Pattern`] if the pattern fails to compile.
/// * [`ExtractError::EmptyResult`] if the pattern matched nothing.
pub fn get_match_group_by_index(
    pattern: &str,
    text: &str,
    group_name: &GroupSelector,
    match_index: MatchIndex,
    flags: &MatchFlags,
) -> Result<GroupValue, ExtractError> {
    let Some(name) = resolve_selector(group_name) else {
        return Ok(None);
    };

    let groups = get_match_by_index(
        pattern,
        text,
        Some(std::slice::from_ref(&name)),
        match_index,
        flags,
    )?;

    Ok(groups.get_name(name).cloned().flatten())
}

/// Like [`get_match_group_by_index`], but never fails on an empty result.
///
/// With no `group_name`, the value of the first capture group of the
/// selected match is returned. When nothing matched, a warning is logged
/// and `Ok(None)` is returned.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] if the pattern fails to compile.
pub fn get_match_string(
    pattern: &str,
    text: &str,
    group_name: Option<&GroupSelector>,
    match_index: MatchIndex,
    flags: &MatchFlags,
) -> Result<GroupValue, ExtractError> {
    let name = match group_name {
        Some(selector) => match resolve_selector(selector) {
            Some(name) => Some(name),
            None => return Ok(None),
        },
        None => None,
    };

    let index = extract_groups(
        pattern,
        text,
        name.as_ref().map(std::slice::from_ref),
        flags,
    )?;

    let Some((key, groups)) = index.select(match_index) else {
        log::warn!("There was no match found!");
        return Ok(None);
    };

    match name {
        Some(name) => Ok(groups.get_name(name).cloned().flatten()),
        None => groups.first().cloned().map_or_else(
            || {
                log::error!("Match {key} of pattern '{pattern}' has no capture groups to return");
                Ok(None)
            },
            Ok,
        ),
    }
}

/// Interprets a dynamically typed group selector.
///
/// Strings select a single group and arrays whose first element is a
/// string select by that first element. Anything else, including `null`,
/// becomes [`GroupSelector::Invalid`]. Callers that treat `null` as "no
/// group" should check for it before calling [`get_match_string`].
#[must_use]
pub fn selector_from_json(value: &serde_json::Value) -> GroupSelector {
    match value {
        serde_json::Value::String(name) => GroupSelector::Single(name.clone()),
        serde_json::Value::Array(items) => match items.first() {
            None => GroupSelector::Sequence(Vec::new()),
            Some(serde_json::Value::String(_)) => GroupSelector::Sequence(
                items
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .map(ToOwned::to_owned)
                    .collect(),
            ),
            Some(first) => GroupSelector::invalid(format!("a list starting with {first}")),
        },
        other => GroupSelector::invalid(other.to_string()),
    }
}

fn resolve_selector(selector: &GroupSelector) -> Option<&str> {
    let name = selector.effective_name();

    if name.is_none() {
        let got = match selector {
            GroupSelector::Invalid(description) => description.as_str(),
            GroupSelector::Single(_) | GroupSelector::Sequence(_) => "an empty list",
        };
        log::error!("The group name parameter expects a single group name, got {got}");
        log::error!("If a list of names is provided, only the first name is used");
    }

    name
}
