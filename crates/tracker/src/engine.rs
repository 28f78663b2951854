//! Sync engine: full-vault reconciliation plus incremental event updates.
//!
//! Per-file life cycle: `Unknown` → scanned → `Cached-Fresh` (cache mtime ≥
//! file mtime) → `Cached-Stale` (file newer) → rescanned → `Cached-Fresh`;
//! deletion or leaving project scope removes the entry. The engine never
//! touches the presentation surface — it enqueues [`RepaintRequest`]s that
//! the host drains on its next tick.

use crate::badge::{BadgeState, RepaintRequest};
use crate::cache::{ProjectFileStatus, StatusCache};
use crate::error::Result;
use crate::settings::{config_fingerprint, SettingsStore, TrackerSettings};
use crate::vault::{FileMeta, Vault};
use gtd_scan::{classify, TagConfig, TagPatterns};
use std::collections::VecDeque;

/// A change notification from the host, as a tagged variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    Deleted { path: String },
    Renamed { old_path: String, path: String, mtime: u64 },
    Modified { path: String, mtime: u64 },
}

impl VaultEvent {
    /// The (new) path the event is about.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            VaultEvent::Deleted { path }
            | VaultEvent::Renamed { path, .. }
            | VaultEvent::Modified { path, .. } => path,
        }
    }
}

/// Outcome counters for one full reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Project files currently in the vault.
    pub tracked: usize,
    /// Files whose content was read and classified this pass.
    pub scanned: usize,
    /// Cache entries dropped because their file vanished or left scope.
    pub dropped: usize,
}

/// Composes the immutable-per-load [`TagConfig`] with the mutable
/// [`StatusCache`], persisting both through one settings blob.
pub struct SyncEngine {
    config: TagConfig,
    patterns: TagPatterns,
    cache: StatusCache,
    store: SettingsStore,
    pending_repaints: VecDeque<RepaintRequest>,
}

impl SyncEngine {
    /// Load the blob from the store (falling back to defaults on a corrupt
    /// one) and build an engine.
    pub fn from_store(store: SettingsStore) -> Result<Self> {
        let settings = store.load_or_default();
        Self::new(settings, store)
    }

    /// Build an engine from already-loaded settings.
    ///
    /// When the cache was built under a different tag configuration (the
    /// stored fingerprint mismatches, or a pre-fingerprint blob carries a
    /// non-empty cache), every entry is dropped so the next reconciliation
    /// rescans the whole vault.
    pub fn new(settings: TrackerSettings, store: SettingsStore) -> Result<Self> {
        let config = settings.tag_config();
        let patterns = TagPatterns::compile(&config)?;
        let mut cache = settings.project_file_cache;

        let stale_config = match settings.tag_config_fingerprint {
            Some(stored) => stored != config_fingerprint(&config),
            None => !cache.is_empty(),
        };
        if stale_config {
            log::info!(
                "tag configuration changed; dropping {} cached entries for a full rescan",
                cache.len()
            );
            cache.clear();
        }

        Ok(Self {
            config,
            patterns,
            cache,
            store,
            pending_repaints: VecDeque::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &StatusCache {
        &self.cache
    }

    /// Badge for a path right now; untracked paths are `Clear`.
    #[must_use]
    pub fn badge_state(&self, path: &str) -> BadgeState {
        match self.cache.get(path) {
            Some(status) => BadgeState::from_flags(status.flags()),
            None => BadgeState::Clear,
        }
    }

    /// Take every queued repaint request, oldest first.
    #[must_use]
    pub fn drain_repaints(&mut self) -> Vec<RepaintRequest> {
        self.pending_repaints.drain(..).collect()
    }

    /// Full-vault reconciliation (startup pass).
    ///
    /// Fresh cache entries are reused without a read; stale or unknown files
    /// are read and classified; entries for vanished files are dropped. When
    /// anything was added, changed, or dropped, the blob is persisted once
    /// and a status repaint is enqueued for every project file in the final
    /// map. An unchanged pass persists nothing and repaints nothing.
    pub fn reconcile(&mut self, vault: &dyn Vault) -> Result<ReconcileStats> {
        let files = vault.list_markdown_files()?;
        let mut fresh = StatusCache::default();
        let mut stats = ReconcileStats::default();
        let mut dirty = false;

        for FileMeta { path, mtime } in files {
            if !self.config.is_project_file(&path) {
                continue;
            }
            stats.tracked += 1;
            match self.cache.get(&path) {
                Some(cached) if cached.mtime >= mtime => {
                    let cached = *cached;
                    fresh.put(path, cached);
                }
                previous => match vault.read(&path) {
                    Ok(content) => {
                        let flags = classify(&content, &self.patterns);
                        fresh.put(path, ProjectFileStatus::new(mtime, flags));
                        stats.scanned += 1;
                        dirty = true;
                    }
                    Err(err) => {
                        log::error!(
                            "failed to read {path}: {err}; keeping previous status this cycle"
                        );
                        if let Some(previous) = previous {
                            let previous = *previous;
                            fresh.put(path, previous);
                        }
                    }
                },
            }
        }

        for (path, _) in self.cache.entries() {
            if !fresh.contains(path) {
                stats.dropped += 1;
                dirty = true;
            }
        }

        if dirty {
            self.cache = fresh;
            self.flush()?;
            let repaints: Vec<RepaintRequest> = self
                .cache
                .entries()
                .map(|(path, status)| RepaintRequest::Status {
                    path: path.to_string(),
                    state: BadgeState::from_flags(status.flags()),
                })
                .collect();
            self.pending_repaints.extend(repaints);
        }

        Ok(stats)
    }

    /// Incremental update for one host change event.
    ///
    /// Events whose paths fall entirely outside project scope are ignored
    /// without touching the cache or the queue. Content-read failures are
    /// logged and leave the cached entry untouched; the file is retried on
    /// its next event.
    pub fn handle_event(&mut self, vault: &dyn Vault, event: VaultEvent) -> Result<()> {
        match event {
            VaultEvent::Deleted { path } => {
                if !self.config.is_project_file(&path) {
                    return Ok(());
                }
                self.remove_paths(vec![path])
            }
            VaultEvent::Renamed {
                old_path,
                path,
                mtime,
            } => {
                let old_in_scope = self.config.is_project_file(&old_path);
                let new_in_scope = self.config.is_project_file(&path);
                if !old_in_scope && !new_in_scope {
                    return Ok(());
                }
                if !new_in_scope {
                    return self.remove_paths(vec![old_path, path]);
                }
                self.rescan(vault, Some(&old_path), path, mtime)
            }
            VaultEvent::Modified { path, mtime } => {
                if !self.config.is_project_file(&path) {
                    return Ok(());
                }
                self.rescan(vault, None, path, mtime)
            }
        }
    }

    /// Drop entries for paths leaving the tracked set, persist if anything
    /// was actually removed, and request unconditional clear repaints.
    fn remove_paths(&mut self, paths: Vec<String>) -> Result<()> {
        let mut removed_any = false;
        for path in &paths {
            if self.cache.remove(path).is_some() {
                removed_any = true;
            }
        }
        if removed_any {
            self.flush()?;
        }
        for path in paths {
            self.pending_repaints.push_back(RepaintRequest::Clear { path });
        }
        Ok(())
    }

    fn rescan(
        &mut self,
        vault: &dyn Vault,
        old_path: Option<&str>,
        path: String,
        mtime: u64,
    ) -> Result<()> {
        let content = match vault.read(&path) {
            Ok(content) => content,
            Err(err) => {
                log::error!("failed to read {path}: {err}; keeping cached status until the next event");
                return Ok(());
            }
        };

        let flags = classify(&content, &self.patterns);
        let previous = match old_path {
            Some(old) => self
                .cache
                .remove(old)
                .or_else(|| self.cache.get(&path).copied()),
            None => self.cache.get(&path).copied(),
        };
        self.cache.put(path.clone(), ProjectFileStatus::new(mtime, flags));
        self.flush()?;

        let changed = previous.map(|p| p.flags() != flags).unwrap_or(true);
        if changed {
            self.pending_repaints.push_back(RepaintRequest::Status {
                path,
                state: BadgeState::from_flags(flags),
            });
        }
        Ok(())
    }

    /// Full-blob overwrite of the settings store.
    fn flush(&mut self) -> Result<()> {
        let settings = TrackerSettings::from_parts(&self.config, self.cache.clone());
        self.store.save(&settings)
    }
}
