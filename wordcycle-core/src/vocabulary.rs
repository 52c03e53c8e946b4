//! Vocabulary dataset
//!
//! The dataset is a JSON array of objects, each carrying at least a string
//! `term`. Every other field is passed through untouched, in file order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CycleError;

/// One dispensable entry. `term` is the uniqueness key within a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct VocabularyEntry {
    term: String,
    fields: Map<String, Value>,
}

impl VocabularyEntry {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for VocabularyEntry {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let term = match fields.get("term") {
            Some(Value::String(term)) => term.clone(),
            Some(other) => return Err(format!("`term` must be a string, got {other}")),
            None => return Err("entry is missing the `term` field".to_string()),
        };
        Ok(Self { term, fields })
    }
}

impl From<VocabularyEntry> for Map<String, Value> {
    fn from(entry: VocabularyEntry) -> Self {
        entry.fields
    }
}

/// Immutable, cheaply cloneable ordered list of entries.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Arc<[VocabularyEntry]>,
}

impl Vocabulary {
    pub fn new(entries: Vec<VocabularyEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<VocabularyEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// Build from bare terms. Handy for fixtures.
    pub fn from_terms<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let entries = terms
            .into_iter()
            .map(|term| {
                let term = term.into();
                let mut fields = Map::new();
                fields.insert("term".to_string(), Value::String(term.clone()));
                VocabularyEntry { term, fields }
            })
            .collect();
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VocabularyEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VocabularyEntry> {
        self.entries.iter()
    }

    /// Number of entries whose term already appeared earlier in the list.
    pub fn duplicate_terms(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries
            .iter()
            .filter(|entry| !seen.insert(entry.term()))
            .count()
    }
}

/// Loads the vocabulary from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct VocabularySource {
    path: PathBuf,
}

impl VocabularySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vocabulary, CycleError> {
        let unavailable = |reason: String| CycleError::DataUnavailable {
            path: self.path.display().to_string(),
            reason,
        };

        let data = std::fs::read_to_string(&self.path).map_err(|e| unavailable(e.to_string()))?;
        let vocabulary = Vocabulary::from_json_str(&data).map_err(|e| unavailable(e.to_string()))?;

        let duplicates = vocabulary.duplicate_terms();
        if duplicates > 0 {
            tracing::warn!(
                path = %self.path.display(),
                duplicates,
                "vocabulary contains duplicate terms"
            );
        }
        tracing::info!(
            path = %self.path.display(),
            entries = vocabulary.len(),
            "vocabulary loaded"
        );
        Ok(vocabulary)
    }

    /// Load, or log the failure and fall back to an empty vocabulary so the
    /// service stays up and reports `NoData` per request.
    pub fn load_or_empty(&self) -> Vocabulary {
        match self.load() {
            Ok(vocabulary) => vocabulary,
            Err(e) => {
                tracing::error!("Error loading vocabulary: {}", e);
                Vocabulary::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_preserves_extra_fields_in_order() {
        let file = write_dataset(
            r#"[{"word_class":"noun","term":"lantern","gloss":"a lamp","level":2}]"#,
        );
        let vocabulary = VocabularySource::new(file.path()).load().unwrap();

        assert_eq!(vocabulary.len(), 1);
        let entry = vocabulary.get(0).unwrap();
        assert_eq!(entry.term(), "lantern");
        assert_eq!(entry.get("level"), Some(&Value::from(2)));

        let out = serde_json::to_string(entry).unwrap();
        assert_eq!(
            out,
            r#"{"word_class":"noun","term":"lantern","gloss":"a lamp","level":2}"#
        );
    }

    #[test]
    fn test_load_missing_file_is_data_unavailable() {
        let source = VocabularySource::new("/definitely/not/here/words.json");
        match source.load() {
            Err(CycleError::DataUnavailable { path, .. }) => {
                assert!(path.ends_with("words.json"));
            }
            other => panic!("expected DataUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_json_is_data_unavailable() {
        let file = write_dataset("{ not json");
        let result = VocabularySource::new(file.path()).load();
        assert!(matches!(result, Err(CycleError::DataUnavailable { .. })));
    }

    #[test]
    fn test_load_rejects_entry_without_term() {
        let file = write_dataset(r#"[{"term":"a"},{"gloss":"orphan"}]"#);
        let err = VocabularySource::new(file.path()).load().unwrap_err();
        assert!(err.to_string().contains("term"), "got: {err}");
    }

    #[test]
    fn test_load_rejects_non_string_term() {
        let file = write_dataset(r#"[{"term":42}]"#);
        let result = VocabularySource::new(file.path()).load();
        assert!(matches!(result, Err(CycleError::DataUnavailable { .. })));
    }

    #[test]
    fn test_load_or_empty_falls_back() {
        let vocabulary = VocabularySource::new("/nope.json").load_or_empty();
        assert!(vocabulary.is_empty());
    }

    #[test]
    fn test_duplicate_terms_counted() {
        let vocabulary = Vocabulary::from_terms(["a", "b", "a", "a"]);
        assert_eq!(vocabulary.duplicate_terms(), 2);
        assert_eq!(Vocabulary::from_terms(["a", "b"]).duplicate_terms(), 0);
    }

    #[test]
    fn test_clone_shares_entries() {
        let vocabulary = Vocabulary::from_terms(["x", "y"]);
        let copy = vocabulary.clone();
        assert!(Arc::ptr_eq(&vocabulary.entries, &copy.entries));
    }
}
