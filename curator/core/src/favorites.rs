//! Favorites
//!
//! A persistent list of favorite cards, keyed by lowercase title (the feed
//! has no stable row ids, so the title is the identity - matching the data
//! the site stores). Persisted as a plain JSON array of strings under the
//! XDG data dir, so it survives reboots, unlike the session store.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Set of favorite cards, keyed by lowercase title
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    titles: BTreeSet<String>,
}

impl FavoriteSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored titles, normalizing as it goes
    pub fn from_titles<I>(titles: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let titles = titles
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { titles }
    }

    /// Whether a title is a favorite (case-insensitive)
    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(&title.trim().to_lowercase())
    }

    /// Toggle a title; returns whether it is a favorite afterwards
    ///
    /// Blank titles are ignored and report `false`.
    pub fn toggle(&mut self, title: &str) -> bool {
        let key = title.trim().to_lowercase();
        if key.is_empty() {
            return false;
        }
        if self.titles.remove(&key) {
            false
        } else {
            self.titles.insert(key);
            true
        }
    }

    /// Stored titles in sorted order
    pub fn titles(&self) -> Vec<String> {
        self.titles.iter().cloned().collect()
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// JSON-array-on-disk persistence for favorites
#[derive(Clone, Debug)]
pub struct FavoritesFile {
    path: PathBuf,
}

impl FavoritesFile {
    /// Persistence against a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default path: `$XDG_DATA_HOME/cardwall/favorites.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("cardwall").join("favorites.json"))
    }

    /// Persistence against the default path, when one exists
    #[must_use]
    pub fn open_default() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    /// The backing path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load favorites; a missing or unreadable file is an empty set
    pub fn load(&self) -> FavoriteSet {
        let body = match std::fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(_) => return FavoriteSet::new(),
        };
        match serde_json::from_str::<Vec<String>>(&body) {
            Ok(titles) => FavoriteSet::from_titles(titles),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Ignoring corrupt favorites file: {e}");
                FavoriteSet::new()
            }
        }
    }

    /// Save the full set, creating parent directories as needed
    pub fn save(&self, favorites: &FavoriteSet) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body =
            serde_json::to_string(&favorites.titles()).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_toggle_round_trip() {
        let mut favorites = FavoriteSet::new();
        assert!(favorites.toggle("Midnight Run"));
        assert!(favorites.contains("midnight run"));
        assert!(favorites.contains("MIDNIGHT RUN"));
        assert!(!favorites.toggle("midnight run"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_blank_title_ignored() {
        let mut favorites = FavoriteSet::new();
        assert!(!favorites.toggle("   "));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_titles_are_lowercase_sorted() {
        let mut favorites = FavoriteSet::new();
        favorites.toggle("Zeta");
        favorites.toggle("Alpha");
        assert_eq!(favorites.titles(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = FavoritesFile::new(dir.path().join("favorites.json"));

        let mut favorites = FavoriteSet::new();
        favorites.toggle("Starlit Alley");
        favorites.toggle("Daybreak");
        file.save(&favorites).expect("save favorites");

        let loaded = file.load();
        assert_eq!(loaded.titles(), vec!["daybreak", "starlit alley"]);

        // On-disk shape is a plain JSON array of lowercase strings
        let body = std::fs::read_to_string(file.path()).expect("read file");
        let raw: Vec<String> = serde_json::from_str(&body).expect("json array");
        assert_eq!(raw, vec!["daybreak", "starlit alley"]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let file = FavoritesFile::new("/nonexistent/cardwall/favorites.json");
        assert!(file.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, "not json").expect("write");
        let file = FavoritesFile::new(path);
        assert!(file.load().is_empty());
    }
}
