//! Persisted per-file status entries.

use gtd_scan::TaskStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last-known state of one tracked project file.
///
/// Both flags always come from a single scan of one content snapshot; they
/// may be stale against the file on disk, never against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFileStatus {
    /// Last observed modification time, unix milliseconds.
    pub mtime: u64,
    pub next_step: bool,
    pub waiting_for: bool,
}

impl ProjectFileStatus {
    #[must_use]
    pub fn new(mtime: u64, flags: TaskStatus) -> Self {
        Self {
            mtime,
            next_step: flags.next_step,
            waiting_for: flags.waiting_for,
        }
    }

    #[must_use]
    pub fn flags(&self) -> TaskStatus {
        TaskStatus {
            next_step: self.next_step,
            waiting_for: self.waiting_for,
        }
    }
}

/// Mapping from vault-relative path to [`ProjectFileStatus`].
///
/// A `BTreeMap` keeps serialization deterministic; insertion order is
/// irrelevant. Flushing is the engine's job via the settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCache {
    entries: BTreeMap<String, ProjectFileStatus>,
}

impl StatusCache {
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ProjectFileStatus> {
        self.entries.get(path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn put(&mut self, path: impl Into<String>, status: ProjectFileStatus) {
        self.entries.insert(path.into(), status);
    }

    pub fn remove(&mut self, path: &str) -> Option<ProjectFileStatus> {
        self.entries.remove(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ProjectFileStatus)> {
        self.entries.iter().map(|(path, status)| (path.as_str(), status))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(mtime: u64, next_step: bool, waiting_for: bool) -> ProjectFileStatus {
        ProjectFileStatus {
            mtime,
            next_step,
            waiting_for,
        }
    }

    #[test]
    fn put_get_remove() {
        let mut cache = StatusCache::default();
        cache.put("Projects/a.md", entry(10, true, false));
        assert!(cache.contains("Projects/a.md"));
        assert_eq!(cache.get("Projects/a.md"), Some(&entry(10, true, false)));

        cache.put("Projects/a.md", entry(20, false, true));
        assert_eq!(cache.get("Projects/a.md"), Some(&entry(20, false, true)));
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.remove("Projects/a.md"), Some(entry(20, false, true)));
        assert!(cache.is_empty());
        assert_eq!(cache.remove("Projects/a.md"), None);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut cache = StatusCache::default();
        cache.put("Projects/a.md", entry(123, true, false));
        let json = serde_json::to_value(&cache).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Projects/a.md": {"mtime": 123, "nextStep": true, "waitingFor": false}
            })
        );
    }
}
