//! Pseudonym allocation for speaker anonymization.
//!
//! Every raw speaker name observed during one compaction run is replaced by a
//! short, unique pseudonym. Allocation prefers the shortest unused prefix of
//! the raw name ("Alice" becomes "A" unless "A" is taken, then "Al", ...);
//! when every prefix collides the raw name gets a numeric suffix
//! ("Alice2", "Alice3", ...).
//!
//! [`allocate`] is stateless given the used-set; [`NicknameMap`] is the
//! caller-owned memo that keeps the raw-name → pseudonym mapping stable and
//! insertion-ordered for the duration of a run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Picks a pseudonym for `raw_name` that is not present in `used`.
///
/// Tries increasing-length character prefixes of the raw name first, then
/// falls back to `raw_name2`, `raw_name3`, ... The result is deterministic
/// given the same raw name and used-set.
///
/// An empty raw name skips the prefix loop entirely, so its fallback chain is
/// `""`, `"2"`, `"3"`, ... — the numeric suffix is appended to the (empty)
/// raw name, matching the historical behavior of this allocator.
///
/// # Example
///
/// ```rust
/// use std::collections::HashSet;
/// use chatshrink::nickname::allocate;
///
/// let mut used = HashSet::new();
/// assert_eq!(allocate("Alice", &used), "A");
///
/// used.insert("A".to_string());
/// assert_eq!(allocate("Anna", &used), "An");
/// ```
pub fn allocate(raw_name: &str, used: &HashSet<String>) -> String {
    // Prefix candidates, shortest first. char_indices keeps the slices on
    // UTF-8 boundaries.
    for (idx, ch) in raw_name.char_indices() {
        let end = idx + ch.len_utf8();
        let candidate = &raw_name[..end];
        if !used.contains(candidate) {
            return candidate.to_string();
        }
    }

    // Every prefix (including the full name) collided, or the name is empty.
    if !used.contains(raw_name) {
        return raw_name.to_string();
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{raw_name}{n}");
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Insertion-ordered raw-name → pseudonym mapping for one compaction run.
///
/// The map is append-only: once a raw name has been assigned a pseudonym it
/// keeps it for the rest of the run, and pseudonyms are unique within the
/// run. Iteration order is first-seen order.
///
/// Callers that want explicit name substitution pre-seed the map before
/// shrinking:
///
/// ```rust
/// use chatshrink::nickname::NicknameMap;
///
/// let mut names = NicknameMap::new();
/// names.insert("Joey", "J");
/// names.insert("Norma Saganeiti", "N");
/// assert_eq!(names.resolve("Joey"), "J");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    from = "Vec<(String, String)>",
    into = "Vec<(String, String)>"
)]
pub struct NicknameMap {
    entries: Vec<(String, String)>,
    used: HashSet<String>,
}

// Serialized form is the entry list alone; the used-set is rebuilt on the
// way back in so uniqueness still holds for later resolve calls.
impl From<Vec<(String, String)>> for NicknameMap {
    fn from(entries: Vec<(String, String)>) -> Self {
        let used = entries.iter().map(|(_, nick)| nick.clone()).collect();
        Self { entries, used }
    }
}

impl From<NicknameMap> for Vec<(String, String)> {
    fn from(map: NicknameMap) -> Self {
        map.entries
    }
}

impl NicknameMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pseudonym for `raw_name`, allocating one on first sight.
    pub fn resolve(&mut self, raw_name: &str) -> String {
        if let Some((_, nick)) = self.entries.iter().find(|(raw, _)| raw == raw_name) {
            return nick.clone();
        }
        let nick = allocate(raw_name, &self.used);
        self.used.insert(nick.clone());
        self.entries.push((raw_name.to_string(), nick.clone()));
        nick
    }

    /// Pre-seeds a fixed raw-name → pseudonym pair.
    ///
    /// A raw name that is already present keeps its existing pseudonym.
    pub fn insert(&mut self, raw_name: impl Into<String>, nickname: impl Into<String>) {
        let raw_name = raw_name.into();
        if self.entries.iter().any(|(raw, _)| *raw == raw_name) {
            return;
        }
        let nickname = nickname.into();
        self.used.insert(nickname.clone());
        self.entries.push((raw_name, nickname));
    }

    /// Returns the pseudonym previously assigned to `raw_name`, if any.
    pub fn get(&self, raw_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(raw, _)| raw == raw_name)
            .map(|(_, nick)| nick.as_str())
    }

    /// Number of distinct speakers seen so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no speaker has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw names in first-seen order.
    pub fn raw_names(&self) -> Vec<String> {
        self.entries.iter().map(|(raw, _)| raw.clone()).collect()
    }

    /// Pseudonyms in first-seen order.
    pub fn nicknames(&self) -> Vec<String> {
        self.entries.iter().map(|(_, nick)| nick.clone()).collect()
    }
}
