//! Match enumeration and group resolution.
//!
//! Applies a pattern against the full subject text. Each match becomes a
//! [`GroupMap`] keyed either by the caller's group names or, when none are
//! given, by the position of each explicit capture group.

use regex::Captures;
use regex_extract_models::{GroupMap, MatchFlags, ResultIndex};

use crate::ExtractError;
use crate::pattern::compile;

/// Scans `text` for every non-overlapping match of `pattern` and collects
/// their capture groups, keyed `0..n` in scan order.
///
/// With `group_names`, each match maps those names (in the given order) to
/// what they captured. A name the pattern does not define maps to `None`
/// rather than failing. Without `group_names`, each match maps the
/// zero-based position of every explicit capture group to its capture.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] if the pattern fails to compile.
pub fn extract_groups(
    pattern: &str,
    text: &str,
    group_names: Option<&[&str]>,
    flags: &MatchFlags,
) -> Result<ResultIndex, ExtractError> {
    let re = compile(pattern, flags)?;

    let mut index = ResultIndex::new();

    for caps in re.captures_iter(text) {
        let groups = match group_names {
            Some(names) => named_groups(&caps, names),
            None => positional_groups(&caps),
        };
        index.push(groups);
    }

    log::debug!(
        "Regex pattern matched {} times ({} groups per match)",
        index.len(),
        group_names.map_or_else(|| re.captures_len() - 1, <[&str]>::len)
    );

    Ok(index)
}

fn positional_groups(caps: &Captures<'_>) -> GroupMap {
    caps.iter()
        .skip(1) // the implicit whole-match group
        .enumerate()
        .map(|(pos, m)| (pos, m.map(|m| m.as_str().to_owned())))
        .collect()
}

fn named_groups(caps: &Captures<'_>, names: &[&str]) -> GroupMap {
    let mut groups = GroupMap::with_capacity(names.len());
    for &name in names {
        groups.insert(name, caps.name(name).map(|m| m.as_str().to_owned()));
    }
    groups
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use regex_extract_models::{GroupKey, MatchFlag};

    use super::*;

    const DATES: &str = r"(?P<year>\d{4})-(?P<month>\d{2})";

    fn some(s: &str) -> Option<String> {
        Some(s.to_owned())
    }

    #[test]
    fn extracts_named_groups_per_match() {
        let index = extract_groups(
            DATES,
            "2021-05\n2022-11",
            Some(["year", "month"].as_slice()),
            &MatchFlags::default(),
        )
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0).unwrap().get_name("year"), Some(&some("2021")));
        assert_eq!(index.get(0).unwrap().get_name("month"), Some(&some("05")));
        assert_eq!(index.get(1).unwrap().get_name("year"), Some(&some("2022")));
        assert_eq!(index.get(1).unwrap().get_name("month"), Some(&some("11")));
    }

    #[test]
    fn named_groups_follow_requested_order() {
        let index = extract_groups(
            DATES,
            "2021-05",
            Some(["month", "year"].as_slice()),
            &MatchFlags::default(),
        )
        .unwrap();

        let keys: Vec<String> = index
            .get(0)
            .unwrap()
            .keys()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, ["month", "year"]);
    }

    #[test]
    fn positional_groups_skip_whole_match() {
        let index =
            extract_groups(r"(\w+)=(\d+)", "a=1 b=22", None, &MatchFlags::default()).unwrap();

        let first = index.get(0).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first.get(&GroupKey::Position(0)), Some(&some("a")));
        assert_eq!(first.get(&GroupKey::Position(1)), Some(&some("1")));
        assert_eq!(
            index.get(1).unwrap().get(&GroupKey::Position(1)),
            Some(&some("22"))
        );
    }

    #[test]
    fn positional_groups_mark_non_participating_groups() {
        let index = extract_groups(r"(a)|(b)", "ab", None, &MatchFlags::default()).unwrap();

        assert_eq!(index.get(0).unwrap().get(&GroupKey::Position(1)), Some(&None));
        assert_eq!(index.get(1).unwrap().get(&GroupKey::Position(0)), Some(&None));
        assert_eq!(index.get(1).unwrap().get(&GroupKey::Position(1)), Some(&some("b")));
    }

    #[test]
    fn pattern_without_groups_yields_empty_maps() {
        let index = extract_groups(r"\d+", "1 2 3", None, &MatchFlags::default()).unwrap();

        assert_eq!(index.len(), 3);
        assert!(index.iter().all(|(_, groups)| groups.is_empty()));
    }

    #[test]
    fn unknown_group_names_are_absent_not_errors() {
        let index = extract_groups(
            DATES,
            "2021-05",
            Some(["year", "day"].as_slice()),
            &MatchFlags::default(),
        )
        .unwrap();

        let groups = index.get(0).unwrap();
        assert_eq!(groups.get_name("year"), Some(&some("2021")));
        assert_eq!(groups.get_name("day"), Some(&None));
    }

    #[test]
    fn empty_capture_is_not_absent() {
        let index = extract_groups(
            r"(?P<key>\w+)=(?P<value>\w*)",
            "a=",
            Some(["value"].as_slice()),
            &MatchFlags::default(),
        )
        .unwrap();

        assert_eq!(index.get(0).unwrap().get_name("value"), Some(&some("")));
    }

    #[test]
    fn multiline_is_the_default() {
        let text = "2021-05\n2022-11";
        let anchored = r"^(?P<year>\d{4})-(?P<month>\d{2})$";

        let with_default = extract_groups(anchored, text, None, &MatchFlags::default()).unwrap();
        let without = extract_groups(anchored, text, None, &MatchFlags::empty()).unwrap();

        assert_eq!(with_default.len(), 2);
        assert_eq!(without.len(), 0);
    }

    #[test]
    fn flags_are_forwarded_to_the_engine() {
        let flags = MatchFlags::default().with(MatchFlag::CaseInsensitive);
        let index = extract_groups(r"(?P<kind>theft)", "THEFT Theft", None, &flags).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn no_matches_yields_empty_index() {
        let index = extract_groups(DATES, "no dates here", None, &MatchFlags::default()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn invalid_pattern_propagates() {
        let err = extract_groups(r"(\d+", "123", None, &MatchFlags::default()).unwrap_err();
        assert!(matches!(err, ExtractError::Pattern(_)));
    }

    #[test]
    fn repeated_calls_scan_afresh() {
        let first = extract_groups(DATES, "2021-05", None, &MatchFlags::default()).unwrap();
        let second = extract_groups(DATES, "2021-05", None, &MatchFlags::default()).unwrap();
        assert_eq!(first, second);
    }

    quickcheck! {
        fn prop_one_entry_per_number(numbers: Vec<u32>) -> bool {
            let text = numbers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            let index = extract_groups(r"^(\d+)$", &text, None, &MatchFlags::default()).unwrap();

            index.len() == numbers.len()
                && index.keys().eq(0..numbers.len())
                && index.iter().all(|(key, groups)| {
                    groups.value(&GroupKey::Position(0)) == Some(numbers[key].to_string().as_str())
                })
        }

        fn prop_unknown_names_do_not_change_count(numbers: Vec<u16>) -> bool {
            let text = numbers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            let flags = MatchFlags::default();
            let plain = extract_groups(r"(?P<n>\d+)", &text, None, &flags).unwrap();
            let named = extract_groups(r"(?P<n>\d+)", &text, Some(["missing"].as_slice()), &flags)
                .unwrap();

            plain.len() == named.len()
                && named.iter().all(|(_, groups)| groups.get_name("missing") == Some(&None))
        }
    }
}
