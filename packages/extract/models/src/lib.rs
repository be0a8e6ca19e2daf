#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data types for regex capture-group extraction.
//!
//! A scan over a subject string produces a [`ResultIndex`]: one
//! [`GroupMap`] per match, keyed by the match's zero-based position in
//! scan order. Each [`GroupMap`] maps a [`GroupKey`] (a group name or a
//! positional index) to a [`GroupValue`], where `None` marks a group that
//! did not participate in the match or does not exist in the pattern.

use std::collections::BTreeSet;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The value captured by a group. `None` is the absence-marker and is
/// distinct from `Some("")`, a group that matched the empty string.
pub type GroupValue = Option<String>;

/// Identifies a capture group within a [`GroupMap`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    /// A named group, e.g. `year` in `(?P<year>\d{4})`.
    Name(String),
    /// A zero-based position over the explicit capture groups. Position `0`
    /// is the first parenthesized group, not the whole match.
    Position(usize),
}

impl GroupKey {
    /// Returns the group name if this key is [`GroupKey::Name`].
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Position(_) => None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Position(pos) => write!(f, "{pos}"),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for GroupKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for GroupKey {
    fn from(pos: usize) -> Self {
        Self::Position(pos)
    }
}

/// Insertion-ordered mapping from [`GroupKey`] to [`GroupValue`] for a
/// single match.
///
/// Inserting a key that is already present overwrites its value in place,
/// keeping the key's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMap {
    entries: Vec<(GroupKey, GroupValue)>,
}

impl GroupMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty map with room for `capacity` groups.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts `value` under `key`, returning the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: impl Into<GroupKey>, value: GroupValue) -> Option<GroupValue> {
        let key = key.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Returns the entry stored under `key`.
    ///
    /// The outer `Option` says whether the key is present at all; the inner
    /// one is the absence-marker for a group that captured nothing.
    #[must_use]
    pub fn get(&self, key: &GroupKey) -> Option<&GroupValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the entry stored under the group name `name`.
    #[must_use]
    pub fn get_name(&self, name: &str) -> Option<&GroupValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_name() == Some(name))
            .map(|(_, v)| v)
    }

    /// Returns the captured text under `key`, collapsing "missing key" and
    /// "group did not participate" into `None`.
    #[must_use]
    pub fn value(&self, key: &GroupKey) -> Option<&str> {
        self.get(key).and_then(Option::as_deref)
    }

    /// Returns the value of the first entry in insertion order.
    #[must_use]
    pub fn first(&self) -> Option<&GroupValue> {
        self.entries.first().map(|(_, v)| v)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &GroupValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Number of groups in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no groups, as for a pattern without captures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<GroupKey>> FromIterator<(K, GroupValue)> for GroupMap {
    fn from_iter<I: IntoIterator<Item = (K, GroupValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for GroupMap {
    type Item = (GroupKey, GroupValue);
    type IntoIter = std::vec::IntoIter<(GroupKey, GroupValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for GroupMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

/// Every match of a scan, keyed by its zero-based position in scan order.
///
/// Keys are always the contiguous range `0..len()`; they are assigned as
/// matches are pushed and never renumbered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultIndex {
    matches: Vec<GroupMap>,
}

impl ResultIndex {
    /// Creates an index with no matches.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            matches: Vec::new(),
        }
    }

    /// Appends the next match and returns the key it was assigned.
    pub fn push(&mut self, groups: GroupMap) -> usize {
        self.matches.push(groups);
        self.matches.len() - 1
    }

    /// Number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether the scan found no matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Returns the groups of the match with key `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&GroupMap> {
        self.matches.get(index)
    }

    /// The largest key present, i.e. the last match in scan order.
    #[must_use]
    pub fn last_key(&self) -> Option<usize> {
        self.matches.len().checked_sub(1)
    }

    /// Selects a match using the clamp-to-last policy: the requested index
    /// if present, otherwise the last match. `None` only when empty.
    #[must_use]
    pub fn select(&self, index: MatchIndex) -> Option<(usize, &GroupMap)> {
        let key = index.resolve(self.len())?;
        self.matches.get(key).map(|groups| (key, groups))
    }

    /// Takes the match chosen by [`ResultIndex::select`] out of the index.
    #[must_use]
    pub fn into_selected(mut self, index: MatchIndex) -> Option<(usize, GroupMap)> {
        let key = index.resolve(self.len())?;
        Some((key, self.matches.swap_remove(key)))
    }

    /// Keys in scan order.
    pub fn keys(&self) -> impl Iterator<Item = usize> {
        0..self.matches.len()
    }

    /// `(key, groups)` pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &GroupMap)> {
        self.matches.iter().enumerate()
    }
}

impl FromIterator<GroupMap> for ResultIndex {
    fn from_iter<I: IntoIterator<Item = GroupMap>>(iter: I) -> Self {
        Self {
            matches: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResultIndex {
    type Item = (usize, GroupMap);
    type IntoIter = std::iter::Enumerate<std::vec::IntoIter<GroupMap>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter().enumerate()
    }
}

impl Serialize for ResultIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.matches.len()))?;
        for (key, groups) in self.iter() {
            map.serialize_entry(&key, groups)?;
        }
        map.end()
    }
}

/// Which match to select from a [`ResultIndex`].
///
/// Any index that is not a present key falls back to the last match, so
/// [`MatchIndex::Last`] and an out-of-range [`MatchIndex::At`] behave the
/// same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum MatchIndex {
    /// The last match in scan order.
    #[default]
    Last,
    /// The match with this zero-based key.
    At(usize),
}

impl MatchIndex {
    /// Resolves to a key in `0..len`, or `None` when `len` is zero.
    #[must_use]
    pub fn resolve(self, len: usize) -> Option<usize> {
        match self {
            Self::At(index) if index < len => Some(index),
            Self::At(_) | Self::Last => len.checked_sub(1),
        }
    }
}

impl From<usize> for MatchIndex {
    fn from(index: usize) -> Self {
        Self::At(index)
    }
}

impl From<i64> for MatchIndex {
    fn from(index: i64) -> Self {
        usize::try_from(index).map_or(Self::Last, Self::At)
    }
}

impl From<MatchIndex> for i64 {
    fn from(index: MatchIndex) -> Self {
        match index {
            MatchIndex::Last => -1,
            MatchIndex::At(i) => Self::try_from(i).unwrap_or(-1),
        }
    }
}

/// How the caller asked for a single group.
///
/// Only the first name of a [`GroupSelector::Sequence`] is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSelector {
    /// One group name.
    Single(String),
    /// Several names, of which only the first is used.
    Sequence(Vec<String>),
    /// Something that is not a group name, described for the error log.
    Invalid(String),
}

impl GroupSelector {
    /// Creates an [`GroupSelector::Invalid`] describing what was supplied.
    #[must_use]
    pub fn invalid(description: impl Into<String>) -> Self {
        Self::Invalid(description.into())
    }

    /// The one group name this selector stands for. `None` for
    /// [`GroupSelector::Invalid`] and for an empty sequence.
    #[must_use]
    pub fn effective_name(&self) -> Option<&str> {
        match self {
            Self::Single(name) => Some(name),
            Self::Sequence(names) => names.first().map(String::as_str),
            Self::Invalid(_) => None,
        }
    }
}

impl From<&str> for GroupSelector {
    fn from(name: &str) -> Self {
        Self::Single(name.to_owned())
    }
}

impl From<String> for GroupSelector {
    fn from(name: String) -> Self {
        Self::Single(name)
    }
}

impl From<Vec<String>> for GroupSelector {
    fn from(names: Vec<String>) -> Self {
        Self::Sequence(names)
    }
}

impl From<&[&str]> for GroupSelector {
    fn from(names: &[&str]) -> Self {
        Self::Sequence(names.iter().map(|&n| n.to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for GroupSelector {
    fn from(names: [&str; N]) -> Self {
        Self::from(names.as_slice())
    }
}

/// A regex engine option.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchFlag {
    /// `^` and `$` match at line boundaries, not only at the ends of the
    /// subject.
    Multiline,
    /// Letters match regardless of case.
    CaseInsensitive,
    /// `.` also matches `\n`.
    DotMatchesNewLine,
    /// Whitespace in the pattern is ignored and `#` starts a comment.
    IgnoreWhitespace,
    /// `a*` is lazy and `a*?` is greedy.
    SwapGreed,
    /// Line anchors treat `\r\n` as a line terminator.
    Crlf,
}

/// The set of [`MatchFlag`]s applied when compiling a pattern.
///
/// Defaults to `{multiline}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchFlags(BTreeSet<MatchFlag>);

impl MatchFlags {
    /// No flags at all; `^` and `$` only match at the ends of the subject.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Adds `flag` to the set.
    #[must_use]
    pub fn with(mut self, flag: MatchFlag) -> Self {
        self.0.insert(flag);
        self
    }

    /// Whether `flag` is in the set.
    #[must_use]
    pub fn contains(&self, flag: MatchFlag) -> bool {
        self.0.contains(&flag)
    }

    /// Flags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = MatchFlag> + '_ {
        self.0.iter().copied()
    }
}

impl Default for MatchFlags {
    fn default() -> Self {
        Self::empty().with(MatchFlag::Multiline)
    }
}

impl FromIterator<MatchFlag> for MatchFlags {
    fn from_iter<I: IntoIterator<Item = MatchFlag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<MatchFlag> for MatchFlags {
    fn from(flag: MatchFlag) -> Self {
        Self::empty().with(flag)
    }
}
