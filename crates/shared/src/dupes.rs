//! Advisory duplicate detection over the admin response table.
//!
//! Two passes: count normalized access names, place-card names and
//! (access, place-card) pairs across every row, then flag each row against
//! those counts. Flags never block anything; they only draw the admin's eye.

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DupeFlag {
    DupeName,
    DupePlace,
    DupePair,
    EqWithin,
    NameInPlace,
    PlaceInName,
}

/// A response row as the heuristic sees it.
pub trait NamedRow {
    fn access_name(&self) -> Option<&str>;
    fn place_card_name(&self) -> Option<&str>;
}

impl<'a> NamedRow for (Option<&'a str>, Option<&'a str>) {
    fn access_name(&self) -> Option<&str> {
        self.0
    }

    fn place_card_name(&self) -> Option<&str> {
        self.1
    }
}

fn norm(raw: Option<&str>) -> String {
    raw.unwrap_or_default().trim().to_lowercase()
}

fn bump<K: std::hash::Hash + Eq>(counts: &mut HashMap<K, usize>, key: K) {
    *counts.entry(key).or_insert(0) += 1;
}

/// Flags for every row, in input order.
pub fn flag_duplicates<R: NamedRow>(rows: &[R]) -> Vec<Vec<DupeFlag>> {
    let mut name_counts: HashMap<String, usize> = HashMap::new();
    let mut place_counts: HashMap<String, usize> = HashMap::new();
    let mut pair_counts: HashMap<(String, String), usize> = HashMap::new();

    for row in rows {
        let n = norm(row.access_name());
        let p = norm(row.place_card_name());
        if !n.is_empty() {
            bump(&mut name_counts, n.clone());
        }
        if !p.is_empty() {
            bump(&mut place_counts, p.clone());
        }
        if !n.is_empty() || !p.is_empty() {
            bump(&mut pair_counts, (n, p));
        }
    }

    let count = |counts: &HashMap<String, usize>, key: &str| counts.get(key).copied().unwrap_or(0);

    rows.iter()
        .map(|row| {
            let n = norm(row.access_name());
            let p = norm(row.place_card_name());
            let mut flags = Vec::new();

            if !n.is_empty() && count(&name_counts, &n) > 1 {
                flags.push(DupeFlag::DupeName);
            }
            if !p.is_empty() && count(&place_counts, &p) > 1 {
                flags.push(DupeFlag::DupePlace);
            }
            if (!n.is_empty() || !p.is_empty())
                && pair_counts.get(&(n.clone(), p.clone())).copied().unwrap_or(0) > 1
            {
                flags.push(DupeFlag::DupePair);
            }

            // Exact (case-sensitive) match after trimming only.
            let raw_name = row.access_name().map(str::trim).unwrap_or_default();
            let raw_place = row.place_card_name().map(str::trim).unwrap_or_default();
            if !raw_name.is_empty() && !raw_place.is_empty() && raw_name == raw_place {
                flags.push(DupeFlag::EqWithin);
            }

            // A row whose own place card matches its name already contributes one hit.
            let self_equal = !n.is_empty() && n == p;
            if !n.is_empty() && count(&place_counts, &n) > usize::from(self_equal) {
                flags.push(DupeFlag::NameInPlace);
            }
            if !p.is_empty() && count(&name_counts, &p) > usize::from(self_equal) {
                flags.push(DupeFlag::PlaceInName);
            }

            flags
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use DupeFlag::*;

    fn flags(rows: &[(Option<&str>, Option<&str>)]) -> Vec<Vec<DupeFlag>> {
        flag_duplicates(rows)
    }

    #[test]
    fn test_anchor_scenario() {
        let result = flags(&[(Some("Jo"), Some("Jo")), (Some("Jo"), Some("Sam"))]);
        assert_eq!(result[0], vec![DupeName, EqWithin, PlaceInName]);
        assert_eq!(result[1], vec![DupeName, NameInPlace]);
    }

    #[test]
    fn test_empty_names_never_flag() {
        let result = flags(&[(None, None), (Some("  "), None), (None, Some(""))]);
        assert!(result.iter().all(Vec::is_empty));
        assert!(flag_duplicates::<(Option<&str>, Option<&str>)>(&[]).is_empty());
    }

    #[test]
    fn test_pairs_are_case_insensitive() {
        let result = flags(&[
            (Some("Ann Lee"), Some("Ann")),
            (Some(" ann lee "), Some("ANN")),
            (Some("Bo"), None),
        ]);
        assert_eq!(result[0], vec![DupeName, DupePlace, DupePair]);
        assert_eq!(result[1], vec![DupeName, DupePlace, DupePair]);
        assert!(result[2].is_empty());
    }

    #[test]
    fn test_eq_within_is_case_sensitive() {
        let result = flags(&[(Some("Kim"), Some("kim"))]);
        // Self-equal after normalization: the row's own hit does not count.
        assert!(result[0].is_empty());

        let result = flags(&[(Some("Kim"), Some(" Kim "))]);
        assert_eq!(result[0], vec![EqWithin]);
    }

    #[test]
    fn test_cross_row_name_and_place() {
        let result = flags(&[(Some("Alex"), None), (Some("Robin"), Some("Alex"))]);
        assert_eq!(result[0], vec![NameInPlace]);
        assert_eq!(result[1], vec![PlaceInName]);
    }

    #[test]
    fn test_flags_serialize_snake_case() {
        let json = serde_json::to_string(&vec![DupeName, NameInPlace]).unwrap();
        assert_eq!(json, r#"["dupe_name","name_in_place"]"#);
    }
}
