pub mod types;

pub use types::{GroupedIssues, IssueRef, VersionGroup};

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::jira::types::Issue;
use crate::releases::parse_release_name;

/// Partition issues into per-fix-version groups.
///
/// Groups are created lazily in first-seen order; the first issue to name a
/// version fixes the group's `released` flag. An issue listing the same
/// version twice contributes a single membership. Output ordering: versions
/// with parseable `<year> <month>` names descending by recency, then
/// unparseable names lexicographically.
pub fn group_by_fix_version(issues: &[Issue], browse_url: impl Fn(&str) -> String) -> Vec<VersionGroup> {
    let mut groups: Vec<VersionGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for issue in issues {
        let mut seen: HashSet<&str> = HashSet::new();
        for version in &issue.fields.fix_versions {
            if !seen.insert(version.name.as_str()) {
                continue;
            }
            let slot = *index.entry(version.name.clone()).or_insert_with(|| {
                groups.push(VersionGroup {
                    fix_version: version.name.clone(),
                    released: version.released,
                    issues: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].issues.push(IssueRef {
                key: issue.key.clone(),
                summary: issue.fields.summary.clone().unwrap_or_default(),
                url: browse_url(&issue.key),
            });
        }
    }

    groups.sort_by(|a, b| compare_groups(&a.fix_version, &b.fix_version));
    groups
}

/// Most recent parseable release first; unparseable names after all
/// parseable ones, alphabetically among themselves.
fn compare_groups(a: &str, b: &str) -> Ordering {
    match (parse_release_name(a), parse_release_name(b)) {
        (Some(ka), Some(kb)) => kb.sort_key().cmp(&ka.sort_key()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::types::{FixVersion, Issue, IssueFields};

    fn issue(key: &str, summary: &str, versions: &[(&str, Option<bool>)]) -> Issue {
        Issue {
            key: key.to_string(),
            fields: IssueFields {
                summary: Some(summary.to_string()),
                fix_versions: versions
                    .iter()
                    .map(|(name, released)| FixVersion {
                        name: name.to_string(),
                        released: *released,
                    })
                    .collect(),
            },
        }
    }

    fn browse(key: &str) -> String {
        format!("https://jira.example.com/browse/{key}")
    }

    #[test]
    fn test_groups_sorted_most_recent_first() {
        let issues = [
            issue("R-1", "one", &[("2024 Sausis", None)]),
            issue("R-2", "two", &[("2024 Vasaris", None)]),
            issue("R-3", "three", &[("2023 Gruodis", None)]),
        ];
        let groups = group_by_fix_version(&issues, browse);
        let names: Vec<&str> = groups.iter().map(|g| g.fix_version.as_str()).collect();
        assert_eq!(names, ["2024 Vasaris", "2024 Sausis", "2023 Gruodis"]);
    }

    #[test]
    fn test_unparseable_groups_sort_last_alphabetically() {
        let issues = [
            issue("R-1", "one", &[("Backlog", None)]),
            issue("R-2", "two", &[("2024 Sausis", None)]),
            issue("R-3", "three", &[("Ad hoc", None)]),
        ];
        let groups = group_by_fix_version(&issues, browse);
        let names: Vec<&str> = groups.iter().map(|g| g.fix_version.as_str()).collect();
        assert_eq!(names, ["2024 Sausis", "Ad hoc", "Backlog"]);
    }

    #[test]
    fn test_duplicate_version_on_one_issue_counts_once() {
        let issues = [issue(
            "R-1",
            "dup",
            &[("2024 Sausis", None), ("2024 Sausis", None)],
        )];
        let groups = group_by_fix_version(&issues, browse);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].issues.len(), 1);
        assert_eq!(groups[0].issues[0].key, "R-1");
    }

    #[test]
    fn test_issue_in_multiple_versions() {
        let issues = [issue(
            "R-1",
            "both",
            &[("2024 Sausis", None), ("2024 Vasaris", None)],
        )];
        let groups = group_by_fix_version(&issues, browse);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.issues.len() == 1));
    }

    #[test]
    fn test_first_seen_released_flag_wins() {
        let issues = [
            issue("R-1", "one", &[("2024 Sausis", Some(false))]),
            issue("R-2", "two", &[("2024 Sausis", Some(true))]),
        ];
        let groups = group_by_fix_version(&issues, browse);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].released, Some(false));
        assert_eq!(groups[0].issues.len(), 2);
    }

    #[test]
    fn test_members_keep_search_order() {
        let issues = [
            issue("R-2", "newer", &[("2024 Sausis", None)]),
            issue("R-1", "older", &[("2024 Sausis", None)]),
        ];
        let groups = group_by_fix_version(&issues, browse);
        let keys: Vec<&str> = groups[0].issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["R-2", "R-1"]);
    }

    #[test]
    fn test_projection_carries_browse_url() {
        let issues = [issue("R-9", "link me", &[("2024 Sausis", None)])];
        let groups = group_by_fix_version(&issues, browse);
        assert_eq!(groups[0].issues[0].url, "https://jira.example.com/browse/R-9");
        assert_eq!(groups[0].issues[0].summary, "link me");
    }

    #[test]
    fn test_issue_without_versions_joins_no_group() {
        let issues = [issue("R-1", "floating", &[])];
        assert!(group_by_fix_version(&issues, browse).is_empty());
    }
}
