//! Recently used partner names, offered as quick-select suggestions.

use serde::{Deserialize, Serialize};

pub const MAX_NAMES: usize = 10;

/// Most-recent-first list of distinct partner names, at most [`MAX_NAMES`] long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct NameHistory {
    names: Vec<String>,
}

impl NameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as the most recent entry, coalescing an earlier occurrence.
    /// Blank names are ignored.
    pub fn push(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.names.retain(|n| n != name);
        self.names.insert(0, name.to_string());
        self.names.truncate(MAX_NAMES);
    }

    /// Returns whether the name was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<Vec<String>> for NameHistory {
    /// Stored lists are re-normalised: oldest entries are replayed first so
    /// the first occurrence in the stored order stays the most recent.
    fn from(stored: Vec<String>) -> Self {
        let mut history = Self::new();
        for name in stored.iter().rev() {
            history.push(name);
        }
        history
    }
}

impl From<NameHistory> for Vec<String> {
    fn from(history: NameHistory) -> Self {
        history.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_is_most_recent_first() {
        let mut h = NameHistory::new();
        h.push("Aoi");
        h.push("Ren");
        assert_eq!(h.names(), ["Ren", "Aoi"]);
    }

    #[test]
    fn duplicates_coalesce_to_front() {
        let mut h = NameHistory::new();
        h.push("Aoi");
        h.push("Ren");
        h.push("Mio");
        h.push("Aoi");
        assert_eq!(h.names(), ["Aoi", "Mio", "Ren"]);
    }

    #[test]
    fn bounded_to_ten() {
        let mut h = NameHistory::new();
        for i in 0..15 {
            h.push(&format!("name{i}"));
        }
        assert_eq!(h.len(), MAX_NAMES);
        assert_eq!(h.names()[0], "name14");
        assert_eq!(h.names()[9], "name5");
        assert!(!h.contains("name4"));
    }

    #[test]
    fn blank_names_ignored_and_trimmed() {
        let mut h = NameHistory::new();
        h.push("   ");
        assert!(h.is_empty());
        h.push(" Aoi ");
        assert_eq!(h.names(), ["Aoi"]);
    }

    #[test]
    fn remove_single_name() {
        let mut h = NameHistory::new();
        h.push("Aoi");
        h.push("Ren");
        assert!(h.remove("Aoi"));
        assert!(!h.remove("Aoi"));
        assert_eq!(h.names(), ["Ren"]);
    }

    #[test]
    fn stored_list_is_normalised() {
        let stored = vec!["Aoi".to_string(), "Ren".to_string(), "Aoi".to_string()];
        let json = serde_json::to_string(&stored).unwrap();
        let h: NameHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(h.names(), ["Aoi", "Ren"]);
        assert_eq!(serde_json::to_string(&h).unwrap(), r#"["Aoi","Ren"]"#);
    }
}
