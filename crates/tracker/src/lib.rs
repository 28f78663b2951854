//! # gtd-tracker
//!
//! Incremental status tracking for project markdown files.
//!
//! ## Pipeline
//!
//! ```text
//! Vault change event
//!     │
//!     ├──> File Filter gate
//!     │
//!     ├──> Sync Engine ──> read ──> Task Classifier (gtd-scan)
//!     │        │
//!     │        ├─> Status Cache update ──> settings blob flush
//!     │        └─> RepaintRequest queue ──> BadgeSurface (next tick)
//!     │
//!     └──> startup: full-vault reconciliation in one pass
//! ```
//!
//! ## Example
//!
//! ```
//! use gtd_tracker::{MemoryVault, SettingsStore, SyncEngine, BadgeState};
//!
//! # fn main() -> gtd_tracker::Result<()> {
//! let dir = tempfile::tempdir().unwrap();
//! let store = SettingsStore::new(dir.path().join("settings.json"));
//! let mut engine = SyncEngine::from_store(store)?;
//!
//! let vault = MemoryVault::new().add("Projects/a.md", 10, "- [ ] call back #next-step");
//! engine.reconcile(&vault)?;
//!
//! assert_eq!(engine.badge_state("Projects/a.md"), BadgeState::Clear);
//! # Ok(())
//! # }
//! ```

mod badge;
mod cache;
mod engine;
mod error;
mod settings;
mod vault;
mod watch;

pub use badge::{apply_repaints, BadgeState, BadgeSurface, RepaintRequest};
pub use cache::{ProjectFileStatus, StatusCache};
pub use engine::{ReconcileStats, SyncEngine, VaultEvent};
pub use error::{Result, TrackerError};
pub use settings::{config_fingerprint, SettingsStore, TrackerSettings};
pub use vault::{FileMeta, FsVault, MemoryVault, Vault};
pub use watch::{VaultWatcher, WatchConfig};
