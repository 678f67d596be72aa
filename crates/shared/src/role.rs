use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical invite group. Every access check compares against one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Bridesmaids,
    Groomsmen,
    Family,
    Guest,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Bridesmaids, Role::Groomsmen, Role::Family, Role::Guest];

    /// Canonicalize a stored or submitted group string.
    ///
    /// Singular and legacy spellings map to their plural group; anything
    /// unrecognized (including empty input) is a plain guest.
    pub fn normalize(raw: &str) -> Role {
        match raw.trim().to_lowercase().as_str() {
            "bridesmaid" | "bridesmaids" => Role::Bridesmaids,
            "groomsman" | "groom" | "groomsmen" => Role::Groomsmen,
            "family" => Role::Family,
            _ => Role::Guest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Bridesmaids => "bridesmaids",
            Role::Groomsmen => "groomsmen",
            Role::Family => "family",
            Role::Guest => "guest",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Guest
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<&str>> for Role {
    fn from(raw: Option<&str>) -> Self {
        raw.map(Role::normalize).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_table() {
        let cases = [
            ("bridesmaid", Role::Bridesmaids),
            ("bridesmaids", Role::Bridesmaids),
            ("groomsman", Role::Groomsmen),
            ("groom", Role::Groomsmen),
            ("groomsmen", Role::Groomsmen),
            ("family", Role::Family),
            ("X", Role::Guest),
            ("", Role::Guest),
        ];
        for (raw, expected) in cases {
            assert_eq!(Role::normalize(raw), expected, "normalizing {:?}", raw);
        }
    }

    #[test]
    fn test_normalize_ignores_case_and_whitespace() {
        assert_eq!(Role::normalize("  Bridesmaid "), Role::Bridesmaids);
        assert_eq!(Role::normalize("FAMILY"), Role::Family);
        assert_eq!(Role::from(None), Role::Guest);
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::normalize(role.as_str()), role);
        }
        let json = serde_json::to_string(&Role::Groomsmen).unwrap();
        assert_eq!(json, "\"groomsmen\"");
    }
}
