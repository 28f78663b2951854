//! The flat settings blob: configuration strings plus the status cache,
//! loaded once at startup and rewritten wholesale on every mutation.

use crate::cache::StatusCache;
use crate::error::Result;
use gtd_scan::{
    TagConfig, DEFAULT_NEXT_STEP_TAG, DEFAULT_PROJECTS_FOLDER_PREFIX, DEFAULT_WAITING_FOR_TAG,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Persisted layout. Per-field serde defaults merge a loaded blob over the
/// built-in defaults: explicit fields override, missing fields stay default,
/// unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerSettings {
    pub projects_folder_prefix: String,
    pub next_step_tag: String,
    pub waiting_for_tag: String,

    /// Fingerprint of the configuration the cache was built with. Absent in
    /// blobs written before configuration-change invalidation existed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_config_fingerprint: Option<u64>,

    pub project_file_cache: StatusCache,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            projects_folder_prefix: DEFAULT_PROJECTS_FOLDER_PREFIX.to_string(),
            next_step_tag: DEFAULT_NEXT_STEP_TAG.to_string(),
            waiting_for_tag: DEFAULT_WAITING_FOR_TAG.to_string(),
            tag_config_fingerprint: None,
            project_file_cache: StatusCache::default(),
        }
    }
}

impl TrackerSettings {
    /// The immutable-per-load configuration half of the blob.
    #[must_use]
    pub fn tag_config(&self) -> TagConfig {
        TagConfig {
            projects_folder_prefix: self.projects_folder_prefix.clone(),
            next_step_tag: self.next_step_tag.clone(),
            waiting_for_tag: self.waiting_for_tag.clone(),
        }
    }

    /// Recompose a blob from the engine's two halves, stamping the cache with
    /// the fingerprint of the configuration it was built under.
    #[must_use]
    pub fn from_parts(config: &TagConfig, cache: StatusCache) -> Self {
        Self {
            projects_folder_prefix: config.projects_folder_prefix.clone(),
            next_step_tag: config.next_step_tag.clone(),
            waiting_for_tag: config.waiting_for_tag.clone(),
            tag_config_fingerprint: Some(config_fingerprint(config)),
            project_file_cache: cache,
        }
    }
}

/// Stable 64-bit fingerprint of the three configuration strings.
#[must_use]
pub fn config_fingerprint(config: &TagConfig) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(config.projects_folder_prefix.as_bytes());
    hasher.update([0]);
    hasher.update(config.next_step_tag.as_bytes());
    hasher.update([0]);
    hasher.update(config.waiting_for_tag.as_bytes());
    let digest = hasher.finalize();
    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

/// Loads and saves the settings blob at a fixed path.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing blob yields the defaults; an unreadable one is an error.
    pub fn load(&self) -> Result<TrackerSettings> {
        if !self.path.exists() {
            return Ok(TrackerSettings::default());
        }
        let bytes = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Like [`load`](Self::load), but a corrupt blob logs a warning and falls
    /// back to the defaults instead of failing startup.
    #[must_use]
    pub fn load_or_default(&self) -> TrackerSettings {
        match self.load() {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!(
                    "failed to load settings from {}: {err}; using defaults",
                    self.path.display()
                );
                TrackerSettings::default()
            }
        }
    }

    /// Full-blob overwrite via tmp-file-then-rename.
    pub fn save(&self, settings: &TrackerSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(settings)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
