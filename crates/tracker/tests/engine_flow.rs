use gtd_tracker::{BadgeState, FsVault, SettingsStore, SyncEngine, Vault, VaultEvent};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn vault_with_fixtures() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    write(
        temp.path(),
        "Projects/alpha.md",
        "# Alpha\n\n- [ ] draft proposal #next-step\n",
    );
    write(
        temp.path(),
        "Projects/beta.md",
        "# Beta\n\nno open tasks here\n- [x] shipped #next-step\n",
    );
    write(
        temp.path(),
        "Projects/_archive/old.md",
        "- [ ] never scanned #next-step\n",
    );
    write(temp.path(), "Inbox/scratch.md", "- [ ] out of scope #next-step\n");
    temp
}

fn engine_for(temp: &TempDir) -> SyncEngine {
    let store = SettingsStore::new(temp.path().join(".gtd-tracker/settings.json"));
    SyncEngine::from_store(store).expect("engine")
}

#[test]
fn startup_reconciliation_tracks_only_project_files() {
    let temp = vault_with_fixtures();
    let vault = FsVault::new(temp.path()).unwrap();
    let mut engine = engine_for(&temp);

    let stats = engine.reconcile(&vault).unwrap();
    assert_eq!(stats.tracked, 2);
    assert_eq!(stats.scanned, 2);

    assert_eq!(engine.badge_state("Projects/alpha.md"), BadgeState::Clear);
    assert_eq!(
        engine.badge_state("Projects/beta.md"),
        BadgeState::NeedsNextStep
    );
    assert!(!engine.cache().contains("Projects/_archive/old.md"));
    assert!(!engine.cache().contains("Inbox/scratch.md"));

    // The blob landed on disk with the documented layout.
    let blob = fs::read_to_string(temp.path().join(".gtd-tracker/settings.json")).unwrap();
    assert!(blob.contains("projectFileCache"));
    assert!(blob.contains("Projects/alpha.md"));
    assert!(blob.contains("nextStep"));
}

#[test]
fn cache_survives_an_engine_restart() {
    let temp = vault_with_fixtures();
    let vault = FsVault::new(temp.path()).unwrap();

    let mut engine = engine_for(&temp);
    engine.reconcile(&vault).unwrap();
    let cache_before = engine.cache().clone();
    drop(engine);

    let mut engine = engine_for(&temp);
    let stats = engine.reconcile(&vault).unwrap();
    assert_eq!(engine.cache(), &cache_before);
    // Nothing changed on disk, so nothing was rescanned and nothing repaints.
    assert_eq!(stats.scanned, 0);
    assert!(engine.drain_repaints().is_empty());
}

#[test]
fn modify_and_delete_events_flow_through_the_cache() {
    let temp = vault_with_fixtures();
    let vault = FsVault::new(temp.path()).unwrap();
    let mut engine = engine_for(&temp);
    engine.reconcile(&vault).unwrap();
    let _ = engine.drain_repaints();

    // Flip alpha from next-step to waiting-for.
    write(
        temp.path(),
        "Projects/alpha.md",
        "# Alpha\n\n- [ ] waiting on legal #waiting-for\n",
    );
    let mtime = vault
        .list_markdown_files()
        .unwrap()
        .into_iter()
        .find(|f| f.path == "Projects/alpha.md")
        .unwrap()
        .mtime;
    engine
        .handle_event(
            &vault,
            VaultEvent::Modified {
                path: "Projects/alpha.md".to_string(),
                mtime,
            },
        )
        .unwrap();
    assert_eq!(
        engine.badge_state("Projects/alpha.md"),
        BadgeState::WaitingFor
    );
    assert_eq!(engine.drain_repaints().len(), 1);

    // Delete beta.
    fs::remove_file(temp.path().join("Projects/beta.md")).unwrap();
    engine
        .handle_event(
            &vault,
            VaultEvent::Deleted {
                path: "Projects/beta.md".to_string(),
            },
        )
        .unwrap();
    assert!(!engine.cache().contains("Projects/beta.md"));

    // A fresh engine over the persisted blob agrees with the live one.
    let restarted = engine_for(&temp);
    assert_eq!(restarted.cache(), engine.cache());
}
