use std::collections::HashMap;
use std::sync::OnceLock;

/// Sortable key parsed from a release name like "2024 Sausis".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseKey {
    pub year: i32,
    pub month: u32,
}

impl ReleaseKey {
    /// Integer-comparable key: January 2024 (202401) < December 2024
    /// (202412) < January 2025 (202501).
    pub fn sort_key(&self) -> i32 {
        self.year * 100 + self.month as i32
    }
}

/// Lithuanian month names, plus ASCII-folded spellings for the months that
/// contain accented letters, since release names are hand-typed.
static MONTHS: OnceLock<HashMap<&'static str, u32>> = OnceLock::new();

fn month_table() -> &'static HashMap<&'static str, u32> {
    MONTHS.get_or_init(|| {
        HashMap::from([
            ("sausis", 1),
            ("vasaris", 2),
            ("kovas", 3),
            ("balandis", 4),
            ("gegužė", 5),
            ("geguze", 5),
            ("birželis", 6),
            ("birzelis", 6),
            ("liepa", 7),
            ("rugpjūtis", 8),
            ("rugpjutis", 8),
            ("rugsėjis", 9),
            ("rugsejis", 9),
            ("spalis", 10),
            ("lapkritis", 11),
            ("gruodis", 12),
        ])
    })
}

/// Parse a free-text release name of the form `"<year> <monthname>"`.
///
/// Returns `None` for anything that does not fit: fewer than two tokens, a
/// first token that is not a year in [2000, 2100], or an unrecognized month
/// name. Unparseable names still form groups; they just sort last.
pub fn parse_release_name(name: &str) -> Option<ReleaseKey> {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }

    let year: i32 = tokens[0].parse().ok()?;
    if !(2000..=2100).contains(&year) {
        return None;
    }

    let table = month_table();
    let joined = tokens[1..].join(" ").to_lowercase();
    let month = table
        .get(joined.as_str())
        .or_else(|| table.get(tokens[1].to_lowercase().as_str()))
        .copied()?;

    Some(ReleaseKey { year, month })
}
