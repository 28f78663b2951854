//! Filesystem watcher bridging host change notifications into engine events.
//!
//! Raw notify events are debounced into batches, deduplicated per path, and
//! translated by looking at the filesystem: a path that still exists is a
//! `Modified`, a vanished one a `Deleted`. OS-level renames therefore arrive
//! as a delete of the old path plus a modification of the new one; the richer
//! `Renamed` event stays available to hosts that track file identity.

use crate::badge::{apply_repaints, BadgeSurface};
use crate::engine::{SyncEngine, VaultEvent};
use crate::error::{Result, TrackerError};
use crate::vault::{unix_ms, FsVault};
use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

#[derive(Debug, Clone, Copy)]
pub struct WatchConfig {
    /// Window for collapsing bursts of events into one batch.
    pub debounce: Duration,
    /// Poll interval for notify's fallback backend.
    pub poll_interval: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Owns the engine and a recursive watch on the vault root.
pub struct VaultWatcher {
    vault: FsVault,
    engine: SyncEngine,
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    _watcher: RecommendedWatcher,
    config: WatchConfig,
}

impl VaultWatcher {
    pub fn start(vault: FsVault, engine: SyncEngine, config: WatchConfig) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel(1024);
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = event_tx.blocking_send(res);
            },
            NotifyConfig::default().with_poll_interval(config.poll_interval),
        )
        .map_err(|e| TrackerError::Watch(format!("watcher init failed: {e}")))?;
        watcher
            .watch(vault.root(), RecursiveMode::Recursive)
            .map_err(|e| {
                TrackerError::Watch(format!(
                    "failed to watch {}: {e}",
                    vault.root().display()
                ))
            })?;

        Ok(Self {
            vault,
            engine,
            event_rx,
            _watcher: watcher,
            config,
        })
    }

    #[must_use]
    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Run until the event channel closes, applying repaints to `surface`
    /// after every processed batch.
    pub async fn run(&mut self, surface: &mut dyn BadgeSurface) -> Result<()> {
        while self.tick(Some(&mut *surface)).await? {}
        Ok(())
    }

    /// Wait for one debounced batch of events and process it. Returns `false`
    /// once the event channel has closed.
    pub async fn tick(&mut self, surface: Option<&mut dyn BadgeSurface>) -> Result<bool> {
        let Some(first) = self.event_rx.recv().await else {
            return Ok(false);
        };
        let mut raw = vec![first];

        let deadline = time::sleep(self.config.debounce);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                more = self.event_rx.recv() => match more {
                    Some(event) => raw.push(event),
                    None => break,
                },
                () = &mut deadline => break,
            }
        }

        for event in translate_events(&self.vault, raw) {
            log::debug!("vault event: {event:?}");
            if let Err(err) = self.engine.handle_event(&self.vault, event) {
                log::warn!("failed to process vault event: {err}");
            }
        }

        let repaints = self.engine.drain_repaints();
        apply_repaints(surface, &repaints);
        Ok(true)
    }
}

/// Collapse a debounced batch into at most one engine event per path.
fn translate_events(vault: &FsVault, raw: Vec<notify::Result<Event>>) -> Vec<VaultEvent> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut paths: Vec<PathBuf> = Vec::new();
    for result in raw {
        match result {
            Ok(event) => {
                for path in event.paths {
                    if seen.insert(path.clone()) {
                        paths.push(path);
                    }
                }
            }
            Err(err) => log::warn!("watch error: {err}"),
        }
    }

    let mut events = Vec::new();
    for path in paths {
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            continue;
        }
        let Some(relative) = vault.relative_path(&path) else {
            continue;
        };
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                let mtime = meta.modified().map(unix_ms).unwrap_or(0);
                events.push(VaultEvent::Modified {
                    path: relative,
                    mtime,
                });
            }
            Ok(_) => {}
            Err(_) => events.push(VaultEvent::Deleted { path: relative }),
        }
    }
    events
}
