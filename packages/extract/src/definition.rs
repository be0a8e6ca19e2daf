//! Config-driven extraction definitions.
//!
//! [`ExtractionDefinition`] captures a pattern together with the group
//! names, flags and match index to use with it, so that an extraction can
//! be described in a TOML file instead of code. The definitions shipped in
//! `packages/extract/definitions/` are baked in at compile time via
//! [`include_str!`]; others can be loaded from disk at runtime.

use std::path::Path;

use regex_extract_models::{
    GroupMap, GroupSelector, GroupValue, MatchFlags, MatchIndex, ResultIndex,
};
use serde::Deserialize;

use crate::ExtractError;
use crate::groups::extract_groups;
use crate::query::{count_matches, get_match_by_index, get_match_group_by_index, get_match_string};
use crate::table::{Table, to_table};

/// TOML definitions embedded at compile time.
const BUILTIN_TOMLS: &[(&str, &str)] = &[
    ("iso_dates", include_str!("../definitions/iso_dates.toml")),
    ("key_values", include_str!("../definitions/key_values.toml")),
    ("log_levels", include_str!("../definitions/log_levels.toml")),
];

/// A named, reusable extraction.
///
/// ```toml
/// id = "iso_dates"
/// pattern = '(?P<year>\d{4})-(?P<month>\d{2})'
/// group_names = ["year", "month"]   # optional, positional groups if omitted
/// flags = ["multiline"]             # optional, defaults to ["multiline"]
/// match_index = 0                   # optional, defaults to the last match
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractionDefinition {
    /// Unique identifier (e.g., `"iso_dates"`).
    pub id: String,
    /// Free-form description of what the pattern extracts.
    #[serde(default)]
    pub description: Option<String>,
    /// The regular expression to scan with.
    pub pattern: String,
    /// Group names to extract, in order. `None` extracts positional groups.
    #[serde(default)]
    pub group_names: Option<Vec<String>>,
    /// Engine options applied when compiling `pattern`.
    #[serde(default)]
    pub flags: MatchFlags,
    /// Which match the single-match queries select.
    #[serde(default)]
    pub match_index: MatchIndex,
}

impl ExtractionDefinition {
    /// Parses a definition from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Config`] if the TOML is malformed or missing
    /// required fields.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ExtractError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads and parses the definition at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the file cannot be read, or
    /// [`ExtractError::Config`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let contents = std::fs::read_to_string(path)?;
        let definition = Self::from_toml_str(&contents)?;
        log::debug!("Loaded extraction '{}' from {}", definition.id, path.display());
        Ok(definition)
    }

    /// Loads every `*.toml` file in `dir`, ordered by file name.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the directory or a file cannot be
    /// read, or [`ExtractError::Config`] if any file does not parse.
    pub fn load_all(dir: &Path) -> Result<Vec<Self>, ExtractError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let definitions = paths
            .iter()
            .map(|path| Self::load(path))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "Loaded {} extraction definition(s) from {}",
            definitions.len(),
            dir.display()
        );

        Ok(definitions)
    }

    /// Returns the definitions shipped with this crate.
    ///
    /// # Panics
    ///
    /// Panics if an embedded TOML file is malformed. The files are part of
    /// the crate and covered by its tests.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        BUILTIN_TOMLS
            .iter()
            .map(|(name, toml)| {
                Self::from_toml_str(toml)
                    .unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
            })
            .collect()
    }

    /// Looks up a shipped definition by id.
    #[must_use]
    pub fn builtin_by_id(id: &str) -> Option<Self> {
        Self::builtin().into_iter().find(|d| d.id == id)
    }

    /// The configured group names as borrowed slices.
    #[must_use]
    pub fn names(&self) -> Option<Vec<&str>> {
        self.group_names
            .as_ref()
            .map(|names| names.iter().map(String::as_str).collect())
    }

    /// Runs [`extract_groups`] with this definition.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Pattern`] if the pattern fails to compile.
    pub fn extract(&self, text: &str) -> Result<ResultIndex, ExtractError> {
        extract_groups(&self.pattern, text, self.names().as_deref(), &self.flags)
    }

    /// Runs [`to_table`] with this definition.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Pattern`] if the pattern fails to compile.
    pub fn to_table(&self, text: &str) -> Result<Table, ExtractError> {
        to_table(&self.pattern, text, self.names().as_deref(), &self.flags)
    }

    /// Runs [`count_matches`] with this definition.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Pattern`] if the pattern fails to compile.
    pub fn count(&self, text: &str) -> Result<usize, ExtractError> {
        count_matches(&self.pattern, text, self.names().as_deref(), &self.flags)
    }

    /// Runs [`get_match_by_index`] at the configured match index.
    ///
    /// # Errors
    ///
    /// * [`ExtractError::Pattern`] if the pattern fails to compile.
    /// * [`ExtractError::EmptyResult`] if the pattern matched nothing.
    pub fn match_by_index(&self, text: &str) -> Result<GroupMap, ExtractError> {
        get_match_by_index(
            &self.pattern,
            text,
            self.names().as_deref(),
            self.match_index,
            &self.flags,
        )
    }

    /// Runs [`get_match_group_by_index`] for the first configured group
    /// name. Without group names this is a usage error and yields `None`.
    ///
    /// # Errors
    ///
    /// * [`ExtractError::Pattern`] if the pattern fails to compile.
    /// * [`ExtractError::EmptyResult`] if the pattern matched nothing.
    pub fn match_group(&self, text: &str) -> Result<GroupValue, ExtractError> {
        let selector = self.group_names.clone().map_or_else(
            || GroupSelector::invalid(format!("no group names in extraction '{}'", self.id)),
            GroupSelector::Sequence,
        );

        get_match_group_by_index(&self.pattern, text, &selector, self.match_index, &self.flags)
    }

    /// Runs [`get_match_string`] for the first configured group name, or
    /// for the first capture group when no names are configured.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Pattern`] if the pattern fails to compile.
    pub fn match_string(&self, text: &str) -> Result<GroupValue, ExtractError> {
        let selector = self.group_names.clone().map(GroupSelector::Sequence);

        get_match_string(
            &self.pattern,
            text,
            selector.as_ref(),
            self.match_index,
            &self.flags,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use regex_extract_models::{GroupKey, MatchFlag};

    use super::*;

    const EXPECTED_BUILTIN_COUNT: usize = 3;

    fn definitions_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("definitions")
    }

    #[test]
    fn parses_minimal_definition_with_defaults() {
        let def = ExtractionDefinition::from_toml_str(
            r#"
            id = "numbers"
            pattern = '(\d+)'
            "#,
        )
        .unwrap();

        assert_eq!(def.id, "numbers");
        assert_eq!(def.group_names, None);
        assert_eq!(def.flags, MatchFlags::default());
        assert_eq!(def.match_index, MatchIndex::Last);
    }

    #[test]
    fn negative_match_index_means_last() {
        let def = ExtractionDefinition::from_toml_str(
            r#"
            id = "numbers"
            pattern = '(\d+)'
            match_index = -1
            "#,
        )
        .unwrap();
        assert_eq!(def.match_index, MatchIndex::Last);
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = ExtractionDefinition::from_toml_str(
            r#"
            id = "bad"
            pattern = 'x'
            flags = ["sticky"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn rejects_missing_pattern() {
        let err = ExtractionDefinition::from_toml_str(r#"id = "bad""#).unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn loads_builtin_definitions() {
        let definitions = ExtractionDefinition::builtin();
        assert_eq!(definitions.len(), EXPECTED_BUILTIN_COUNT);

        let mut ids: Vec<&str> = definitions.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_BUILTIN_COUNT);
    }

    #[test]
    fn builtin_patterns_compile() {
        for def in ExtractionDefinition::builtin() {
            assert!(def.count("").is_ok(), "{}: pattern does not compile", def.id);
        }
    }

    #[test]
    fn loads_definitions_from_disk_in_name_order() {
        crate::test_log::init();

        let definitions = ExtractionDefinition::load_all(&definitions_dir()).unwrap();
        let ids: Vec<&str> = definitions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["iso_dates", "key_values", "log_levels"]);
        assert_eq!(definitions, ExtractionDefinition::builtin());
        assert!(crate::test_log::logged(
            log::Level::Info,
            "Loaded 3 extraction definition(s)"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ExtractionDefinition::load(&definitions_dir().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn iso_dates_extracts_optional_day() {
        let def = ExtractionDefinition::builtin_by_id("iso_dates").unwrap();
        let text = "released 2021-05-17, patched 2022-11";

        let table = def.to_table(text).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column(&GroupKey::from("day")),
            Some(vec![Some("17"), None])
        );
        assert_eq!(def.count(text).unwrap(), 2);
        assert_eq!(def.match_string(text).unwrap(), Some("2022".to_owned()));
        assert_eq!(def.match_group(text).unwrap(), Some("2022".to_owned()));
    }

    #[test]
    fn key_values_uses_positional_groups() {
        let def = ExtractionDefinition::builtin_by_id("key_values").unwrap();
        let text = "name = crime map\n  region=md  \n# comment\nempty =\n";

        let index = def.extract(text).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.get(1).unwrap().value(&GroupKey::Position(1)),
            Some("md")
        );
        assert_eq!(
            index.get(2).unwrap().value(&GroupKey::Position(1)),
            Some("")
        );
        assert_eq!(def.match_string(text).unwrap(), Some("empty".to_owned()));
    }

    #[test]
    fn key_values_has_no_group_for_match_group() {
        let def = ExtractionDefinition::builtin_by_id("key_values").unwrap();
        assert_eq!(def.match_group("a = 1").unwrap(), None);
    }

    #[test]
    fn log_levels_selects_first_match() {
        let def = ExtractionDefinition::builtin_by_id("log_levels").unwrap();
        assert!(def.flags.contains(MatchFlag::CaseInsensitive));

        let text = "[INFO] starting\n[warn] slow scan\n[error] gave up";
        let groups = def.match_by_index(text).unwrap();
        assert_eq!(groups.get_name("level"), Some(&Some("INFO".to_owned())));
        assert_eq!(
            groups.get_name("message"),
            Some(&Some("starting".to_owned()))
        );
    }

    #[test]
    fn empty_text_keeps_hard_and_soft_paths() {
        let def = ExtractionDefinition::builtin_by_id("log_levels").unwrap();
        assert!(matches!(
            def.match_by_index(""),
            Err(ExtractError::EmptyResult)
        ));
        assert!(matches!(def.match_group(""), Err(ExtractError::EmptyResult)));
        assert_eq!(def.match_string("").unwrap(), None);
    }
}
